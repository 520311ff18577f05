use crate::handlers::prelude::*;

#[derive(Serialize)]
struct SubmitReportTmplData<'a> {
    base_url_path: &'a str,
    match_id: i64,
    label: String,
    team_number: i32,
    position: String,
    already_submitted: bool,
    notice: String,
}

#[get("/match/{match_id}/submit_report")]
pub async fn get_submit_report(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    info: web::Query<NoticeQuery>,
) -> HttpResult {
    let match_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    let profile = roles::check(&state.db, requester, Capability::SubmitReports).await?;
    let m = db_match(&state.db, match_id).await?;
    let assignment = db::assignments::Entity::find()
        .filter(
            Condition::all()
                .add(db::assignments::Column::MatchId.eq(match_id))
                .add(db::assignments::Column::AccountId.eq(profile.account_id)),
        )
        .one(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch assignment of match {match_id}: {e:?}");
            AppHttpError::Internal
        })?
        .ok_or(AppHttpError::NotAssigned)?;
    // Same identity check the write enforces, so the scout learns before
    // filling out the form.
    let already_submitted = db::reports::Entity::find()
        .filter(
            Condition::all()
                .add(db::reports::Column::MatchId.eq(match_id))
                .add(db::reports::Column::AccountId.eq(profile.account_id))
                .add(db::reports::Column::TeamId.eq(assignment.team_id)),
        )
        .one(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to look up report of match {match_id}: {e:?}");
            AppHttpError::Internal
        })?
        .is_some();
    let team_numbers = db_team_numbers(&state.db, m.event_id).await?;
    render_html(
        state,
        "submit_report",
        &SubmitReportTmplData {
            base_url_path: &state.config.site_base_url_path,
            match_id,
            label: match_label(&m),
            team_number: team_numbers
                .get(&assignment.team_id)
                .copied()
                .unwrap_or_default(),
            position: format!("{:?}", assignment.position),
            already_submitted,
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}
