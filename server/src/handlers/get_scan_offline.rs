use crate::handlers::prelude::*;

#[derive(Serialize)]
struct ScanOfflineTmplData<'a> {
    base_url_path: &'a str,
    notice: String,
}

#[get("/scan_offline")]
pub async fn get_scan_offline(
    req: HttpRequest,
    session: Session,
    info: web::Query<NoticeQuery>,
) -> HttpResult {
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ConfirmReports).await?;
    render_html(
        state,
        "scan_offline",
        &ScanOfflineTmplData {
            base_url_path: &state.config.site_base_url_path,
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}
