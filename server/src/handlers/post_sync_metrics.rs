use crate::handlers::prelude::*;
use crate::engine;

#[post("/event/{event_id}/sync_metrics")]
pub async fn post_sync_metrics(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let event_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ManageEvents).await?;
    let event = db_event(&state.db, event_id).await?;
    let summary = engine::sync_event_metrics(&state.db, &state.statbotics, &event)
        .await
        .map_err(|e| {
            log::error!("Failed to sync metrics of event {event_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let base = &state.config.site_base_url_path;
    Ok(redirect_with_notice(
        &req,
        format!("{base}/event/{event_id}"),
        &format!(
            "Metrics updated for {} teams ({} without provider data).",
            summary.teams_updated, summary.teams_missing
        ),
    ))
}
