use crate::handlers::prelude::*;

#[derive(Serialize)]
struct DashboardAssignmentTmplData {
    match_id: i64,
    label: String,
    scheduled_time: String,
    team_number: i32,
    position: String,
    submitted: bool,
    confirmed: bool,
}

#[derive(Serialize)]
struct DashboardTmplData<'a> {
    base_url_path: &'a str,
    username: String,
    level: i64,
    experience_points: i64,
    prediction_points: i64,
    assignments: Vec<DashboardAssignmentTmplData>,
    notice: String,
}

#[get("/dashboard")]
pub async fn get_scouter_dashboard(
    req: HttpRequest,
    session: Session,
    info: web::Query<NoticeQuery>,
) -> HttpResult {
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    let profile = roles::check(&state.db, requester, Capability::SubmitReports).await?;
    let account_id = profile.account_id;
    let username = db_usernames(&state.db, std::iter::once(account_id))
        .await
        .map_err(|e| {
            log::error!("Failed to fetch account {account_id}: {e:?}");
            AppHttpError::Internal
        })?
        .remove(&account_id)
        .unwrap_or_default();
    let assignments = db::assignments::Entity::find()
        .filter(db::assignments::Column::AccountId.eq(account_id))
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch assignments of account {account_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let matches = db::matches::Entity::find()
        .filter(db::matches::Column::Id.is_in(assignments.iter().map(|a| a.match_id)))
        .order_by_asc(db::matches::Column::ScheduledTime)
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch assigned matches of account {account_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let reports = db::reports::Entity::find()
        .filter(db::reports::Column::AccountId.eq(account_id))
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch reports of account {account_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let mut rows = Vec::new();
    for m in &matches {
        let Some(a) = assignments.iter().find(|a| a.match_id == m.id) else {
            continue;
        };
        let team_numbers = db_team_numbers(&state.db, m.event_id).await?;
        let report = reports
            .iter()
            .find(|r| r.match_id == m.id && r.team_id == a.team_id);
        rows.push(DashboardAssignmentTmplData {
            match_id: m.id,
            label: match_label(m),
            scheduled_time: format_time(m.scheduled_time),
            team_number: team_numbers.get(&a.team_id).copied().unwrap_or_default(),
            position: format!("{:?}", a.position),
            submitted: report.is_some(),
            confirmed: report.map_or(false, |r| r.confirmed),
        });
    }
    render_html(
        state,
        "dashboard",
        &DashboardTmplData {
            base_url_path: &state.config.site_base_url_path,
            username,
            level: profile.level,
            experience_points: profile.experience_points,
            prediction_points: profile.prediction_points,
            assignments: rows,
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}
