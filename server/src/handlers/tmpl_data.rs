// Template data shared between handlers plus the small db lookups
// every page needs.
use crate::handlers::prelude::*;

#[derive(Serialize, Clone, Debug)]
pub struct EventRowTmplData {
    pub event_id: i64,
    pub name: String,
    pub event_code: String,
    pub location: String,
    pub dates: String,
    pub event_type: String,
}

pub fn event_row(e: &db::events::Model) -> EventRowTmplData {
    EventRowTmplData {
        event_id: e.id,
        name: e.name.clone(),
        event_code: e.event_code.clone(),
        location: e.location.clone(),
        dates: format!("{} - {}", format_date(e.start_date), format_date(e.end_date)),
        event_type: e.event_type_string.clone(),
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct MatchRowTmplData {
    pub match_id: i64,
    pub label: String,
    pub scheduled_time: String,
    pub red_teams: Vec<i32>,
    pub blue_teams: Vec<i32>,
    pub red_score: String,
    pub blue_score: String,
    pub winner: String,
    pub status: String,
    pub all_submitted: bool,
}

pub fn match_label(m: &db::matches::Model) -> String {
    match m.match_type {
        db::matches::MatchType::Qual => format!("Qual {}", m.match_number),
        db::matches::MatchType::Playoff => format!(
            "{} {}-{}",
            m.comp_level.to_uppercase(),
            m.set_number,
            m.match_number
        ),
    }
}

pub fn match_row(m: &db::matches::Model, team_numbers: &HashMap<i64, i32>) -> MatchRowTmplData {
    let number = |id: i64| team_numbers.get(&id).copied().unwrap_or_default();
    MatchRowTmplData {
        match_id: m.id,
        label: match_label(m),
        scheduled_time: format_time(m.scheduled_time),
        red_teams: m.red_team_ids().map(number).to_vec(),
        blue_teams: m.blue_team_ids().map(number).to_vec(),
        red_score: m.red_score.map(|s| s.to_string()).unwrap_or_default(),
        blue_score: m.blue_score.map(|s| s.to_string()).unwrap_or_default(),
        winner: m.winner.map(winner_label).unwrap_or_default().to_owned(),
        status: status_label(m.status).to_owned(),
        all_submitted: m.all_submitted,
    }
}

pub fn status_label(s: db::matches::Status) -> &'static str {
    match s {
        db::matches::Status::Upcoming => "Upcoming",
        db::matches::Status::InProgress => "In progress",
        db::matches::Status::Completed => "Completed",
    }
}

pub fn winner_label(w: db::common::Winner) -> &'static str {
    match w {
        db::common::Winner::Red => "Red",
        db::common::Winner::Blue => "Blue",
        db::common::Winner::Tie => "Tie",
    }
}

pub fn role_label(r: db::profiles::Role) -> &'static str {
    match r {
        db::profiles::Role::Admin => "Admin",
        db::profiles::Role::Strategist => "Strategist",
        db::profiles::Role::Scouter => "Scouter",
    }
}

pub async fn db_event(db: &DatabaseConnection, event_id: i64) -> Result<db::events::Model, AppHttpError> {
    db::events::Entity::find_by_id(event_id)
        .one(db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch event {event_id}: {e:?}");
            AppHttpError::Internal
        })?
        .ok_or(AppHttpError::NotFound)
}

pub async fn db_match(db: &DatabaseConnection, match_id: i64) -> Result<db::matches::Model, AppHttpError> {
    db::matches::Entity::find_by_id(match_id)
        .one(db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch match {match_id}: {e:?}");
            AppHttpError::Internal
        })?
        .ok_or(AppHttpError::NotFound)
}

pub async fn db_team_numbers(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<HashMap<i64, i32>, AppHttpError> {
    Ok(db::teams::Entity::find()
        .filter(db::teams::Column::EventId.eq(event_id))
        .all(db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch teams of event {event_id}: {e:?}");
            AppHttpError::Internal
        })?
        .into_iter()
        .map(|t| (t.id, t.team_number))
        .collect())
}

pub async fn db_usernames(
    db: &DatabaseConnection,
    ids: impl Iterator<Item = i64>,
) -> Result<HashMap<i64, String>, DbErr> {
    Ok(db::accounts::Entity::find()
        .filter(db::accounts::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|acc| (acc.id, acc.name))
        .collect())
}

pub fn render_html<T: Serialize>(
    state: &ServerState,
    template: &str,
    data: &T,
) -> Result<HttpResponse, AppHttpError> {
    let html = state.tmpl.render(template, data).map_err(|e| {
        log::error!("Failed to render {template} template: {e}");
        AppHttpError::Internal
    })?;
    Ok(HttpResponse::Ok()
        .append_header(ContentType(mime::TEXT_HTML))
        .body(html))
}

pub fn redirect(req: &HttpRequest, url: String) -> HttpResponse<()> {
    web::Redirect::to(url).see_other().respond_to(req)
}

pub fn redirect_with_notice(
    req: &HttpRequest,
    path: String,
    notice: &str,
) -> HttpResponse<()> {
    redirect(req, format!("{path}?notice={}", encode_query(notice)))
}

// Minimal percent-encoding for the notice query value.
pub fn encode_query(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

pub fn format_time(time: time::OffsetDateTime) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    time.format(&format).unwrap_or_default()
}

pub fn format_date(date: time::Date) -> String {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    date.format(&format).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_encoding() {
        assert_eq!(encode_query("report saved"), "report+saved");
        assert_eq!(encode_query("50%"), "50%25");
        assert_eq!(encode_query("a&b=c"), "a%26b%3Dc");
    }

    #[test]
    fn match_labels() {
        let mut m = db::matches::Model {
            id: 1,
            event_id: 1,
            match_number: 12,
            match_type: db::matches::MatchType::Qual,
            comp_level: "qm".to_owned(),
            set_number: 1,
            external_key: None,
            scheduled_time: time::OffsetDateTime::UNIX_EPOCH,
            actual_time: None,
            predicted_time: None,
            red_1: 1,
            red_2: 2,
            red_3: 3,
            blue_1: 4,
            blue_2: 5,
            blue_3: 6,
            status: db::matches::Status::Upcoming,
            all_submitted: false,
            red_score: None,
            blue_score: None,
            winner: None,
        };
        assert_eq!(match_label(&m), "Qual 12");
        m.match_type = db::matches::MatchType::Playoff;
        m.comp_level = "sf".to_owned();
        m.set_number = 2;
        m.match_number = 1;
        assert_eq!(match_label(&m), "SF 2-1");
    }
}
