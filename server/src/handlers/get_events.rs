use crate::handlers::prelude::*;

#[derive(Serialize)]
struct EventsTmplData<'a> {
    base_url_path: &'a str,
    events: Vec<EventRowTmplData>,
    notice: String,
}

#[get("/events")]
pub async fn get_events(req: HttpRequest, info: web::Query<NoticeQuery>) -> HttpResult {
    let state = server_state(&req)?;
    let events = db::events::Entity::find()
        .order_by_desc(db::events::Column::StartDate)
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch events: {e:?}");
            AppHttpError::Internal
        })?;
    render_html(
        state,
        "events",
        &EventsTmplData {
            base_url_path: &state.config.site_base_url_path,
            events: events.iter().map(event_row).collect(),
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}
