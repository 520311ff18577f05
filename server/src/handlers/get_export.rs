use crate::handlers::prelude::*;
use crate::export::{self, ExportKind};

#[get("/event/{event_id}/export/{kind}")]
pub async fn get_export(
    req: HttpRequest,
    session: Session,
    path: web::Path<(i64, String)>,
) -> HttpResult {
    let (event_id, kind_str) = path.into_inner();
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ViewAnalytics).await?;
    let kind = ExportKind::from_str(&kind_str).ok_or(AppHttpError::BadClientData)?;
    let event = db_event(&state.db, event_id).await?;
    let csv = export::export(&state.db, &state.scoring, &event, kind)
        .await
        .map_err(|e| {
            log::error!("Failed to export {kind_str} of event {event_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let file_name = kind.file_name(&event.event_code);
    Ok(HttpResponse::Ok()
        .append_header(ContentType(mime::TEXT_CSV))
        .append_header((
            actix_web::http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ))
        .body(csv))
}
