use crate::handlers::prelude::*;
use crate::engine;

// One account per alliance position; empty fields leave the position as
// it was. Values arrive as strings because browsers submit empty inputs.
#[derive(Deserialize)]
pub struct AssignForm {
    #[serde(default)]
    pub red_1: String,
    #[serde(default)]
    pub red_2: String,
    #[serde(default)]
    pub red_3: String,
    #[serde(default)]
    pub blue_1: String,
    #[serde(default)]
    pub blue_2: String,
    #[serde(default)]
    pub blue_3: String,
}

fn parse_account(v: &str) -> Result<Option<i64>, AppHttpError> {
    let v = v.trim();
    if v.is_empty() {
        return Ok(None);
    }
    v.parse().map(Some).map_err(|_| AppHttpError::BadClientData)
}

#[post("/match/{match_id}/assign")]
pub async fn post_assign_scouters(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<AssignForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let match_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    roles::check(&state.db, requester, Capability::AssignScouters).await?;
    let m = db_match(&state.db, match_id).await?;
    use db::assignments::Position;
    let requested = [
        (Position::Red1, parse_account(&form.red_1)?),
        (Position::Red2, parse_account(&form.red_2)?),
        (Position::Red3, parse_account(&form.red_3)?),
        (Position::Blue1, parse_account(&form.blue_1)?),
        (Position::Blue2, parse_account(&form.blue_2)?),
        (Position::Blue3, parse_account(&form.blue_3)?),
    ];
    for (position, account_id) in requested {
        let Some(account_id) = account_id else {
            continue;
        };
        engine::assign_scouter(&state.db, &m, position, account_id)
            .await
            .map_err(|e| {
                log::error!("Failed to assign scouter for match {match_id}: {e:?}");
                AppHttpError::Internal
            })?;
    }
    let base = &state.config.site_base_url_path;
    Ok(redirect_with_notice(
        &req,
        format!("{base}/match/{match_id}"),
        "Scouters assigned.",
    ))
}
