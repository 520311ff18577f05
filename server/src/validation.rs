pub fn validate_account_name(name: &str) -> Result<(), String> {
    if !(2..=20).contains(&name.len()) {
        return Err(format!(
            "Failed account name length check: 2 <= length={} <= 20",
            name.len()
        ));
    }
    for c in name.chars() {
        if !char_allowed(c) {
            return Err(format!(
                "Disallowed characters found in account name: '{c}' code={:x}",
                c as u32
            ));
        }
    }
    Ok(())
}

pub fn validate_event_key(key: &str) -> Result<(), String> {
    const MAX: usize = 30;
    if !(1..=MAX).contains(&key.len()) {
        return Err(format!("Event key length must be in range [1..{MAX}]"));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Event key contains disallowed characters: {key}"));
    }
    Ok(())
}

fn char_allowed(c: char) -> bool {
    c.is_alphanumeric() && c.is_ascii() || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_names() {
        assert!(validate_account_name("scout_7").is_ok());
        assert!(validate_account_name("a").is_err());
        assert!(validate_account_name("has space").is_err());
        assert!(validate_account_name(&"x".repeat(21)).is_err());
    }

    #[test]
    fn event_keys() {
        assert!(validate_event_key("2025casj").is_ok());
        assert!(validate_event_key("").is_err());
        assert!(validate_event_key("2025/casj").is_err());
    }
}
