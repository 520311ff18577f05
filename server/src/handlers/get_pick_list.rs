use crate::handlers::prelude::*;
use crate::stats;

#[derive(Serialize)]
struct PickListRowTmplData {
    rank: usize,
    team_number: i32,
    nickname: String,
    combined_score: String,
    avg_overall_rating: String,
    matches_scouted: i64,
    epa: String,
    reliability_score: String,
}

#[derive(Serialize)]
struct PickListTmplData<'a> {
    base_url_path: &'a str,
    event_id: i64,
    event_name: String,
    rows: Vec<PickListRowTmplData>,
}

#[get("/event/{event_id}/pick_list")]
pub async fn get_pick_list(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
) -> HttpResult {
    let event_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::ViewAnalytics).await?;
    let event = db_event(&state.db, event_id).await?;
    let entries = stats::event_pick_list(&state.db, &state.scoring, event_id)
        .await
        .map_err(|e| {
            log::error!("Failed to compute pick list of event {event_id}: {e:?}");
            AppHttpError::Internal
        })?;
    render_html(
        state,
        "pick_list",
        &PickListTmplData {
            base_url_path: &state.config.site_base_url_path,
            event_id,
            event_name: event.name,
            rows: entries
                .iter()
                .map(|e| {
                    let s = e.stats.as_ref();
                    PickListRowTmplData {
                        rank: e.rank,
                        team_number: e.team.team_number,
                        nickname: e.team.nickname.clone(),
                        combined_score: format!("{:.1}", e.combined_score),
                        avg_overall_rating: s
                            .map(|s| format!("{:.1}", s.avg_overall_rating))
                            .unwrap_or_default(),
                        matches_scouted: s.map(|s| s.matches_scouted).unwrap_or_default(),
                        epa: s
                            .and_then(|s| s.epa)
                            .map(|e| format!("{e:.1}"))
                            .unwrap_or_default(),
                        reliability_score: s
                            .map(|s| format!("{:.1}", s.reliability_score))
                            .unwrap_or_default(),
                    }
                })
                .collect(),
        },
    )
}
