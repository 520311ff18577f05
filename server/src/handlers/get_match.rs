use crate::handlers::prelude::*;

#[derive(Serialize)]
struct AssignmentTmplData {
    position: String,
    team_number: i32,
    scouter: String,
}

#[derive(Serialize)]
struct MatchTmplData<'a> {
    base_url_path: &'a str,
    event_id: i64,
    m: MatchRowTmplData,
    assignments: Vec<AssignmentTmplData>,
    own_prediction: String,
    can_predict: bool,
    notice: String,
}

#[get("/match/{match_id}")]
pub async fn get_match(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    info: web::Query<NoticeQuery>,
) -> HttpResult {
    let match_id = *path;
    let state = server_state(&req)?;
    let m = db_match(&state.db, match_id).await?;
    let team_numbers = db_team_numbers(&state.db, m.event_id).await?;
    let assignments = db::assignments::Entity::find()
        .filter(db::assignments::Column::MatchId.eq(match_id))
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch assignments of match {match_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let usernames = db_usernames(&state.db, assignments.iter().map(|a| a.account_id))
        .await
        .map_err(|e| {
            log::error!("Failed to fetch scouter names of match {match_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let account_id = crate::auth::authenticate(&req, &session).await?;
    let own_prediction = match account_id {
        Some(account_id) => db::predictions::Entity::find()
            .filter(
                Condition::all()
                    .add(db::predictions::Column::AccountId.eq(account_id))
                    .add(db::predictions::Column::MatchId.eq(match_id)),
            )
            .one(&state.db)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch prediction of match {match_id}: {e:?}");
                AppHttpError::Internal
            })?
            .map(|p| alliance_label(p.predicted_winner).to_owned())
            .unwrap_or_default(),
        None => String::new(),
    };
    let assignments = db::assignments::Position::ALL
        .iter()
        .filter_map(|pos| {
            assignments
                .iter()
                .find(|a| a.position == *pos)
                .map(|a| AssignmentTmplData {
                    position: format!("{pos:?}"),
                    team_number: team_numbers.get(&a.team_id).copied().unwrap_or_default(),
                    scouter: usernames.get(&a.account_id).cloned().unwrap_or_default(),
                })
        })
        .collect();
    render_html(
        state,
        "match",
        &MatchTmplData {
            base_url_path: &state.config.site_base_url_path,
            event_id: m.event_id,
            can_predict: account_id.is_some() && m.status == db::matches::Status::Upcoming,
            m: match_row(&m, &team_numbers),
            assignments,
            own_prediction,
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}

fn alliance_label(a: db::common::Alliance) -> &'static str {
    match a {
        db::common::Alliance::Red => "Red",
        db::common::Alliance::Blue => "Blue",
    }
}
