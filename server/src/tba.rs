// Schedule/roster provider adapter. Every fetch maps a nested response
// into a flat record and degrades to None on any failure; callers treat
// None as "no data available", never as a fatal error.
use serde::Deserialize;

use crate::config::TbaConfig;

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventInfo {
    pub name: String,
    pub event_code: Option<String>,
    pub city: Option<String>,
    pub state_prov: Option<String>,
    pub country: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub week: Option<i32>,
    pub event_type: Option<i32>,
    pub event_type_string: Option<String>,
}

impl EventInfo {
    pub fn location(&self) -> String {
        format!(
            "{}, {}, {}",
            self.city.as_deref().unwrap_or_default(),
            self.state_prov.as_deref().unwrap_or_default(),
            self.country.as_deref().unwrap_or_default()
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TeamInfo {
    pub team_number: i32,
    pub name: Option<String>,
    pub nickname: Option<String>,
    pub city: Option<String>,
    pub state_prov: Option<String>,
    pub country: Option<String>,
    pub rookie_year: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AllianceInfo {
    #[serde(default)]
    pub team_keys: Vec<String>,
    pub score: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Alliances {
    pub red: AllianceInfo,
    pub blue: AllianceInfo,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MatchInfo {
    pub key: String,
    pub comp_level: String,
    pub set_number: Option<i32>,
    pub match_number: i32,
    pub alliances: Alliances,
    // Unix timestamps.
    pub time: Option<i64>,
    pub actual_time: Option<i64>,
    pub predicted_time: Option<i64>,
}

impl MatchInfo {
    pub fn is_playoff(&self) -> bool {
        matches!(self.comp_level.as_str(), "qf" | "sf" | "f")
    }
}

/// Extracts the team number from a provider team key, e.g. "frc254" -> 254.
pub fn team_number_from_key(key: &str) -> Option<i32> {
    key.strip_prefix("frc")?.parse().ok()
}

impl Client {
    pub fn new(config: &TbaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    pub async fn event(&self, event_key: &str) -> Option<EventInfo> {
        self.get_json(&format!("/event/{event_key}")).await
    }

    pub async fn event_teams(&self, event_key: &str) -> Option<Vec<TeamInfo>> {
        self.get_json(&format!("/event/{event_key}/teams")).await
    }

    pub async fn event_matches(&self, event_key: &str) -> Option<Vec<MatchInfo>> {
        self.get_json(&format!("/event/{event_key}/matches")).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Option<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("X-TBA-Auth-Key", &self.api_key)
            .send()
            .await;
        let response = match response {
            Ok(r) => r,
            Err(e) => {
                log::error!("Schedule provider request {url} failed: {e:?}");
                return None;
            }
        };
        if !response.status().is_success() {
            log::warn!(
                "Schedule provider request {url} returned status {}",
                response.status()
            );
            return None;
        }
        match response.json::<T>().await {
            Ok(v) => Some(v),
            Err(e) => {
                log::error!("Schedule provider response {url} failed to parse: {e:?}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_numbers_from_keys() {
        assert_eq!(team_number_from_key("frc254"), Some(254));
        assert_eq!(team_number_from_key("frc1678"), Some(1678));
        assert_eq!(team_number_from_key("254"), None);
        assert_eq!(team_number_from_key("frcabc"), None);
    }

    #[test]
    fn playoff_levels() {
        let m = |level: &str| MatchInfo {
            key: "k".to_owned(),
            comp_level: level.to_owned(),
            set_number: Some(1),
            match_number: 1,
            alliances: Alliances {
                red: AllianceInfo {
                    team_keys: vec![],
                    score: None,
                },
                blue: AllianceInfo {
                    team_keys: vec![],
                    score: None,
                },
            },
            time: None,
            actual_time: None,
            predicted_time: None,
        };
        assert!(!m("qm").is_playoff());
        assert!(m("qf").is_playoff());
        assert!(m("sf").is_playoff());
        assert!(m("f").is_playoff());
    }
}
