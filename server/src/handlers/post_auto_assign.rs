use crate::handlers::prelude::*;
use crate::engine;

#[post("/event/{event_id}/auto_assign")]
pub async fn post_auto_assign(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let event_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::AssignScouters).await?;
    let event = db_event(&state.db, event_id).await?;
    let outcome = engine::auto_assign_scouters(&state.db, &event)
        .await
        .map_err(|e| {
            log::error!("Failed to auto-assign scouters for event {event_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let base = &state.config.site_base_url_path;
    match outcome {
        engine::AutoAssignOutcome::Assigned { matches_assigned } => Ok(redirect_with_notice(
            &req,
            format!("{base}/event/{event_id}"),
            &format!("Scouters assigned to {matches_assigned} upcoming matches."),
        )),
        engine::AutoAssignOutcome::NotEnoughScouters { available } => {
            Err(AppHttpError::NotEnoughScouters(available))
        }
    }
}
