use crate::handlers::prelude::*;
use crate::engine;

// Scores arrive as strings so that an empty input maps to MissingScores
// instead of a deserialization failure.
#[derive(Deserialize)]
pub struct CompleteForm {
    #[serde(default)]
    red_score: String,
    #[serde(default)]
    blue_score: String,
}

fn parse_score(v: &str) -> Result<Option<i32>, AppHttpError> {
    let v = v.trim();
    if v.is_empty() {
        return Ok(None);
    }
    v.parse().map(Some).map_err(|_| AppHttpError::InvalidScores)
}

#[post("/match/{match_id}/complete")]
pub async fn post_complete_match(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<CompleteForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let match_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::CompleteMatches).await?;
    let (Some(red_score), Some(blue_score)) =
        (parse_score(&form.red_score)?, parse_score(&form.blue_score)?)
    else {
        return Err(AppHttpError::MissingScores);
    };
    if red_score < 0 || blue_score < 0 {
        return Err(AppHttpError::InvalidScores);
    }
    let m = db_match(&state.db, match_id).await?;
    let summary = engine::complete_match(&state.db, &state.scoring, m, red_score, blue_score)
        .await
        .map_err(|e| {
            log::error!("Failed to complete match {match_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let base = &state.config.site_base_url_path;
    Ok(redirect_with_notice(
        &req,
        format!("{base}/match/{match_id}"),
        &format!(
            "Match completed ({} win). {} predictions resolved, {} correct.",
            winner_label(summary.winner),
            summary.predictions_resolved,
            summary.predictions_correct
        ),
    ))
}
