use crate::handlers::prelude::*;
use crate::stats;

#[derive(Serialize)]
struct TeamStatsRowTmplData {
    team_number: i32,
    nickname: String,
    matches_scouted: i64,
    avg_auto_points: String,
    auto_mobility_rate: String,
    avg_teleop_pieces: String,
    avg_defense_rating: String,
    avg_speed_rating: String,
    climb_success_rate: String,
    avg_endgame_points: String,
    avg_overall_rating: String,
    reliability_score: String,
    epa: String,
    external_win_rate: String,
    external_rank: String,
}

#[derive(Serialize)]
struct TeamStatsTmplData<'a> {
    base_url_path: &'a str,
    event_id: i64,
    event_name: String,
    rows: Vec<TeamStatsRowTmplData>,
    notice: String,
}

#[get("/event/{event_id}/team_stats")]
pub async fn get_team_stats(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    info: web::Query<NoticeQuery>,
) -> HttpResult {
    let event_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ViewAnalytics).await?;
    let event = db_event(&state.db, event_id).await?;
    // Recompute-on-view; the pick list query refreshes every aggregate.
    let entries = stats::event_pick_list(&state.db, &state.scoring, event_id)
        .await
        .map_err(|e| {
            log::error!("Failed to compute team stats of event {event_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let mut rows: Vec<TeamStatsRowTmplData> = entries
        .iter()
        .map(|e| {
            let s = e.stats.as_ref();
            TeamStatsRowTmplData {
                team_number: e.team.team_number,
                nickname: e.team.nickname.clone(),
                matches_scouted: s.map(|s| s.matches_scouted).unwrap_or_default(),
                avg_auto_points: fmt1(s.map(|s| s.avg_auto_points)),
                auto_mobility_rate: fmt0(s.map(|s| s.auto_mobility_rate)),
                avg_teleop_pieces: fmt1(s.map(|s| s.avg_teleop_pieces)),
                avg_defense_rating: fmt1(s.map(|s| s.avg_defense_rating)),
                avg_speed_rating: fmt1(s.map(|s| s.avg_speed_rating)),
                climb_success_rate: fmt0(s.map(|s| s.climb_success_rate)),
                avg_endgame_points: fmt1(s.map(|s| s.avg_endgame_points)),
                avg_overall_rating: fmt1(s.map(|s| s.avg_overall_rating)),
                reliability_score: fmt1(s.map(|s| s.reliability_score)),
                epa: fmt1(s.and_then(|s| s.epa)),
                external_win_rate: s
                    .and_then(|s| s.external_win_rate)
                    .map(|w| format!("{w:.2}"))
                    .unwrap_or_default(),
                external_rank: s
                    .and_then(|s| s.external_rank)
                    .map(|r| r.to_string())
                    .unwrap_or_default(),
            }
        })
        .collect();
    rows.sort_by_key(|r| r.team_number);
    render_html(
        state,
        "team_stats",
        &TeamStatsTmplData {
            base_url_path: &state.config.site_base_url_path,
            event_id,
            event_name: event.name,
            rows,
            notice: info.notice.clone().unwrap_or_default(),
        },
    )
}

fn fmt1(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.1}")).unwrap_or_default()
}

fn fmt0(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.0}")).unwrap_or_default()
}
