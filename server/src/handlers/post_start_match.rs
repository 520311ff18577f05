use crate::handlers::prelude::*;
use crate::engine;

#[post("/match/{match_id}/start")]
pub async fn post_start_match(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let match_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::CompleteMatches).await?;
    let m = db_match(&state.db, match_id).await?;
    engine::start_match(&state.db, m).await.map_err(|e| {
        log::error!("Failed to start match {match_id}: {e:?}");
        AppHttpError::Internal
    })?;
    let base = &state.config.site_base_url_path;
    Ok(redirect(&req, format!("{base}/match/{match_id}")))
}
