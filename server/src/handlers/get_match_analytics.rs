use crate::handlers::prelude::*;
use crate::stats;

#[derive(Serialize)]
struct MatchAnalyticsTmplData<'a> {
    base_url_path: &'a str,
    match_id: i64,
    label: String,
    available: bool,
    red_auto: i32,
    red_teleop: i32,
    red_endgame: i32,
    red_predicted: i32,
    blue_auto: i32,
    blue_teleop: i32,
    blue_endgame: i32,
    blue_predicted: i32,
    calculated_time: String,
}

#[get("/match/{match_id}/analytics")]
pub async fn get_match_analytics(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
) -> HttpResult {
    let match_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ViewAnalytics).await?;
    let m = db_match(&state.db, match_id).await?;
    // Refresh on view once the full set of confirmed reports is in; the
    // recompute is a no-op below six.
    if m.all_submitted {
        stats::recompute_match_stats(&state.db, &state.scoring, &m)
            .await
            .map_err(|e| {
                log::error!("Failed to recompute stats of match {match_id}: {e:?}");
                AppHttpError::Internal
            })?;
    }
    let row = db::match_stats::Entity::find()
        .filter(db::match_stats::Column::MatchId.eq(match_id))
        .one(&state.db)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch stats of match {match_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let data = match row {
        Some(s) => MatchAnalyticsTmplData {
            base_url_path: &state.config.site_base_url_path,
            match_id,
            label: match_label(&m),
            available: true,
            red_auto: s.red_total_auto_points,
            red_teleop: s.red_total_teleop_points,
            red_endgame: s.red_total_endgame_points,
            red_predicted: s.red_predicted_score,
            blue_auto: s.blue_total_auto_points,
            blue_teleop: s.blue_total_teleop_points,
            blue_endgame: s.blue_total_endgame_points,
            blue_predicted: s.blue_predicted_score,
            calculated_time: format_time(s.calculated_time),
        },
        None => MatchAnalyticsTmplData {
            base_url_path: &state.config.site_base_url_path,
            match_id,
            label: match_label(&m),
            available: false,
            red_auto: 0,
            red_teleop: 0,
            red_endgame: 0,
            red_predicted: 0,
            blue_auto: 0,
            blue_teleop: 0,
            blue_endgame: 0,
            blue_predicted: 0,
            calculated_time: String::new(),
        },
    };
    render_html(state, "match_analytics", &data)
}
