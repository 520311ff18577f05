use crate::handlers::prelude::*;

#[derive(Serialize)]
struct ReportRowTmplData {
    report_id: i64,
    team_number: i32,
    scouter: String,
    auto_points: i32,
    teleop_pieces: i32,
    endgame_points: i32,
    overall_rating: i32,
    submitted_time: String,
    submitted_offline: bool,
    confirmed: bool,
    confirmed_by: String,
}

#[derive(Serialize)]
struct MatchReportsTmplData<'a> {
    base_url_path: &'a str,
    match_id: i64,
    label: String,
    submitted_count: usize,
    confirmed_count: usize,
    expected_count: usize,
    all_submitted: bool,
    reports: Vec<ReportRowTmplData>,
    can_confirm: bool,
    notice: String,
}

#[get("/match/{match_id}/reports")]
pub async fn get_match_reports(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    info: web::Query<NoticeQuery>,
) -> HttpResult {
    let match_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    let can_confirm = match requester {
        Requester::Account(_) => {
            roles::check(&state.db, requester, Capability::ConfirmReports)
                .await
                .is_ok()
        }
        Requester::Unauthenticated => false,
    };
    let m = db_match(&state.db, match_id).await?;
    let team_numbers = db_team_numbers(&state.db, m.event_id).await?;
    let reports = db::reports::Entity::find()
        .filter(db::reports::Column::MatchId.eq(match_id))
        .order_by_asc(db::reports::Column::SubmittedTime)
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reports of match {match_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let usernames = db_usernames(
        &state.db,
        reports
            .iter()
            .flat_map(|r| [r.account_id].into_iter().chain(r.confirmed_by)),
    )
    .await
    .map_err(|e| {
        log::error!("Failed to fetch scouter names of match {match_id}: {e:?}");
        AppHttpError::Internal
    })?;
    let confirmed_count = reports.iter().filter(|r| r.confirmed).count();
    render_html(
        state,
        "match_reports",
        &MatchReportsTmplData {
            base_url_path: &state.config.site_base_url_path,
            match_id,
            label: match_label(&m),
            submitted_count: reports.len(),
            confirmed_count,
            expected_count: 6,
            all_submitted: m.all_submitted,
            reports: reports
                .iter()
                .map(|r| ReportRowTmplData {
                    report_id: r.id,
                    team_number: team_numbers.get(&r.team_id).copied().unwrap_or_default(),
                    scouter: usernames.get(&r.account_id).cloned().unwrap_or_default(),
                    auto_points: r.auto_points_estimate,
                    teleop_pieces: r.teleop_pieces_scored,
                    endgame_points: r.endgame_points_estimate,
                    overall_rating: r.overall_rating,
                    submitted_time: format_time(r.submitted_time),
                    submitted_offline: r.submitted_offline,
                    confirmed: r.confirmed,
                    confirmed_by: r
                        .confirmed_by
                        .and_then(|id| usernames.get(&id).cloned())
                        .unwrap_or_default(),
                })
                .collect(),
            can_confirm,
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}
