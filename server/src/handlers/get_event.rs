use crate::handlers::prelude::*;

#[derive(Serialize)]
struct TeamRowTmplData {
    team_number: i32,
    nickname: String,
    location: String,
    epa: String,
}

#[derive(Serialize)]
struct EventTmplData<'a> {
    base_url_path: &'a str,
    event: EventRowTmplData,
    teams: Vec<TeamRowTmplData>,
    matches: Vec<MatchRowTmplData>,
    notice: String,
}

#[get("/event/{event_id}")]
pub async fn get_event(
    req: HttpRequest,
    path: web::Path<i64>,
    info: web::Query<NoticeQuery>,
) -> HttpResult {
    let event_id = *path;
    let state = server_state(&req)?;
    let event = db_event(&state.db, event_id).await?;
    let teams = db::teams::Entity::find()
        .filter(db::teams::Column::EventId.eq(event_id))
        .order_by_asc(db::teams::Column::TeamNumber)
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch teams of event {event_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let team_numbers: HashMap<i64, i32> = teams.iter().map(|t| (t.id, t.team_number)).collect();
    let matches = db::matches::Entity::find()
        .filter(db::matches::Column::EventId.eq(event_id))
        .order_by_asc(db::matches::Column::ScheduledTime)
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch matches of event {event_id}: {e:?}");
            AppHttpError::Internal
        })?;
    render_html(
        state,
        "event",
        &EventTmplData {
            base_url_path: &state.config.site_base_url_path,
            event: event_row(&event),
            teams: teams
                .iter()
                .map(|t| TeamRowTmplData {
                    team_number: t.team_number,
                    nickname: t.nickname.clone(),
                    location: format!("{}, {}", t.city, t.country),
                    epa: t.epa.map(|e| format!("{e:.1}")).unwrap_or_default(),
                })
                .collect(),
            matches: matches.iter().map(|m| match_row(m, &team_numbers)).collect(),
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}
