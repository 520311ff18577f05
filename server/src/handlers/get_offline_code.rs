use crate::handlers::prelude::*;
use crate::engine::ReportFields;
use crate::offline;

#[derive(Serialize)]
struct OfflineCodeTmplData<'a> {
    base_url_path: &'a str,
    match_id: i64,
    team_number: i32,
    payload: String,
    pattern_svg: String,
}

// Renders the copyable payload (and its visual pattern) for a report
// that was saved on this device, so it can be carried to a scanner
// elsewhere.
#[get("/report/{report_id}/offline_code")]
pub async fn get_offline_code(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
) -> HttpResult {
    let report_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    let profile = roles::check(&state.db, requester, Capability::SubmitReports).await?;
    let report = db::reports::Entity::find_by_id(report_id)
        .one(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch report {report_id}: {e:?}");
            AppHttpError::Internal
        })?
        .ok_or(AppHttpError::NotFound)?;
    if report.account_id != profile.account_id {
        return Err(AppHttpError::Unauthorized);
    }
    let m = db_match(&state.db, report.match_id).await?;
    let team_numbers = db_team_numbers(&state.db, m.event_id).await?;
    let team_number = team_numbers.get(&report.team_id).copied().unwrap_or_default();
    let scouter = db_usernames(&state.db, std::iter::once(report.account_id))
        .await
        .map_err(|e| {
            log::error!("Failed to fetch scouter of report {report_id}: {e:?}");
            AppHttpError::Internal
        })?
        .remove(&report.account_id)
        .unwrap_or_default();
    let payload = offline::encode(&offline::OfflinePayload {
        report_id: Some(report.id),
        match_id: report.match_id,
        team_number,
        scouter,
        fields: ReportFields::from_model(&report),
    });
    let pattern_svg = offline::pattern_svg(&payload);
    render_html(
        state,
        "offline_code",
        &OfflineCodeTmplData {
            base_url_path: &state.config.site_base_url_path,
            match_id: report.match_id,
            team_number,
            payload,
            pattern_svg,
        },
    )
}
