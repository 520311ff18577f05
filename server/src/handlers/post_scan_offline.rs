use crate::handlers::prelude::*;
use crate::engine;

#[derive(Deserialize)]
pub struct ScanForm {
    payload: String,
}

#[post("/scan_offline")]
pub async fn post_scan_offline(
    req: HttpRequest,
    session: Session,
    form: web::Form<ScanForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ConfirmReports).await?;
    let scan = engine::process_offline(&state.db, &form.payload)
        .await
        .map_err(|e| {
            log::error!("Failed to process offline payload: {e:?}");
            AppHttpError::Internal
        })?;
    let base = &state.config.site_base_url_path;
    let notice = match scan {
        engine::OfflineScan::Saved { report_id } => {
            format!("Report {report_id} saved from offline payload.")
        }
        engine::OfflineScan::AlreadyProcessed { report_id } => {
            format!("Report {report_id} was already saved; payload ignored.")
        }
        engine::OfflineScan::Rejected(e) => e.to_string(),
    };
    Ok(redirect_with_notice(
        &req,
        format!("{base}/scan_offline"),
        &notice,
    ))
}
