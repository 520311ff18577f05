use crate::handlers::prelude::*;
use sea_orm::QuerySelect;

#[derive(Serialize)]
struct LeaderboardRowTmplData {
    rank: usize,
    username: String,
    role: String,
    prediction_points: i64,
    level: i64,
    experience_points: i64,
}

#[derive(Serialize)]
struct LeaderboardTmplData<'a> {
    base_url_path: &'a str,
    rows: Vec<LeaderboardRowTmplData>,
}

const MAX_ROWS: u64 = 100;

#[get("/leaderboard")]
pub async fn get_leaderboard(req: HttpRequest, session: Session) -> HttpResult {
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ViewAnalytics).await?;
    let profiles = db::profiles::Entity::find()
        .order_by_desc(db::profiles::Column::PredictionPoints)
        .order_by_desc(db::profiles::Column::ExperiencePoints)
        .limit(MAX_ROWS)
        .all(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch profiles for leaderboard: {e:?}");
            AppHttpError::Internal
        })?;
    let usernames = db_usernames(&state.db, profiles.iter().map(|p| p.account_id))
        .await
        .map_err(|e| {
            log::error!("Failed to fetch usernames for leaderboard: {e:?}");
            AppHttpError::Internal
        })?;
    render_html(
        state,
        "leaderboard",
        &LeaderboardTmplData {
            base_url_path: &state.config.site_base_url_path,
            rows: profiles
                .iter()
                .enumerate()
                .map(|(i, p)| LeaderboardRowTmplData {
                    rank: i + 1,
                    username: usernames.get(&p.account_id).cloned().unwrap_or_default(),
                    role: role_label(p.role).to_owned(),
                    prediction_points: p.prediction_points,
                    level: p.level,
                    experience_points: p.experience_points,
                })
                .collect(),
        },
    )
}
