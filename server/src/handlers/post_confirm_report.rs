use crate::handlers::prelude::*;
use crate::engine;

#[post("/report/{report_id}/confirm")]
pub async fn post_confirm_report(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let report_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    let profile = roles::check(&state.db, requester, Capability::ConfirmReports).await?;
    let report = db::reports::Entity::find_by_id(report_id)
        .one(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch report {report_id}: {e:?}");
            AppHttpError::Internal
        })?
        .ok_or(AppHttpError::NotFound)?;
    let match_id = report.match_id;
    let outcome = engine::confirm_report(&state.db, &state.scoring, report, profile.account_id)
        .await
        .map_err(|e| {
            log::error!("Failed to confirm report {report_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let base = &state.config.site_base_url_path;
    let notice = match outcome {
        engine::ConfirmOutcome::Confirmed { .. } => "Report confirmed.",
        engine::ConfirmOutcome::AlreadyConfirmed => "Report was already confirmed.",
    };
    Ok(redirect_with_notice(
        &req,
        format!("{base}/match/{match_id}/reports"),
        notice,
    ))
}
