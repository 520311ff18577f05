use crate::handlers::prelude::*;
use crate::engine;

#[derive(Deserialize)]
pub struct PredictionForm {
    alliance: String,
}

#[post("/match/{match_id}/predict")]
pub async fn post_submit_prediction(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<PredictionForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let match_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    let Requester::Account(account_id) = requester else {
        return Err(AppHttpError::Unauthenticated);
    };
    let predicted_winner = match form.alliance.as_str() {
        "red" | "RED" => db::common::Alliance::Red,
        "blue" | "BLUE" => db::common::Alliance::Blue,
        _ => return Err(AppHttpError::BadClientData),
    };
    let m = db_match(&state.db, match_id).await?;
    let outcome = engine::submit_prediction(&state.db, account_id, &m, predicted_winner)
        .await
        .map_err(|e| {
            log::error!("Failed to save prediction for match {match_id}: {e:?}");
            AppHttpError::Internal
        })?;
    match outcome {
        engine::PredictionOutcome::Locked => Err(AppHttpError::PredictionLocked),
        engine::PredictionOutcome::Saved => {
            let base = &state.config.site_base_url_path;
            Ok(redirect_with_notice(
                &req,
                format!("{base}/match/{match_id}"),
                "Prediction saved.",
            ))
        }
    }
}
