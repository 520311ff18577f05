use crate::handlers::prelude::*;

#[derive(Serialize)]
struct IndexTmplData<'a> {
    base_url_path: &'a str,
    authenticated: bool,
    username: String,
    events: Vec<EventRowTmplData>,
}

#[get("/")]
pub async fn get_index(req: HttpRequest, session: Session) -> HttpResult {
    let state = server_state(&req)?;
    let account_id = crate::auth::authenticate(&req, &session).await?;
    let username = match account_id {
        Some(id) => db_usernames(&state.db, std::iter::once(id))
            .await
            .map_err(|e| {
                log::error!("Failed to fetch account {id}: {e:?}");
                AppHttpError::Internal
            })?
            .remove(&id)
            .unwrap_or_default(),
        None => String::new(),
    };
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
        "index",
        &IndexTmplData {
            base_url_path: &state.config.site_base_url_path,
            authenticated: account_id.is_some(),
            username,
            events: events.iter().map(event_row).collect(),
        },
    )
}
