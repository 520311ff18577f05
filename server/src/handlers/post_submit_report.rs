use crate::handlers::prelude::*;
use crate::engine::{self, ReportFields};

// HTML checkboxes arrive as "on" or are absent entirely, so every
// checkbox is an Option<String> here and numeric fields default to 0.
#[derive(Deserialize, Debug)]
pub struct ReportForm {
    #[serde(default)]
    pub pre_match_notes: String,
    #[serde(default)]
    pub starting_position: String,
    pub auto_mobility: Option<String>,
    #[serde(default)]
    pub auto_pieces_scored: i32,
    #[serde(default)]
    pub auto_pieces_missed: i32,
    #[serde(default)]
    pub auto_points_estimate: i32,
    #[serde(default)]
    pub auto_notes: String,
    #[serde(default)]
    pub teleop_pieces_scored: i32,
    #[serde(default)]
    pub teleop_pieces_missed: i32,
    #[serde(default)]
    pub teleop_defense_rating: i32,
    #[serde(default)]
    pub teleop_speed_rating: i32,
    #[serde(default)]
    pub teleop_notes: String,
    pub endgame_climb_attempted: Option<String>,
    pub endgame_climb_success: Option<String>,
    pub endgame_park: Option<String>,
    #[serde(default)]
    pub endgame_points_estimate: i32,
    #[serde(default)]
    pub endgame_notes: String,
    pub robot_disabled: Option<String>,
    pub robot_tippy: Option<String>,
    #[serde(default)]
    pub fouls_committed: i32,
    #[serde(default)]
    pub overall_rating: i32,
    #[serde(default)]
    pub post_match_notes: String,
}

impl ReportForm {
    pub fn into_fields(self) -> ReportFields {
        let checked = |v: &Option<String>| v.is_some();
        ReportFields {
            pre_match_notes: self.pre_match_notes,
            starting_position: self.starting_position,
            auto_mobility: checked(&self.auto_mobility),
            auto_pieces_scored: self.auto_pieces_scored,
            auto_pieces_missed: self.auto_pieces_missed,
            auto_points_estimate: self.auto_points_estimate,
            auto_notes: self.auto_notes,
            teleop_pieces_scored: self.teleop_pieces_scored,
            teleop_pieces_missed: self.teleop_pieces_missed,
            teleop_defense_rating: self.teleop_defense_rating,
            teleop_speed_rating: self.teleop_speed_rating,
            teleop_notes: self.teleop_notes,
            endgame_climb_attempted: checked(&self.endgame_climb_attempted),
            endgame_climb_success: checked(&self.endgame_climb_success),
            endgame_park: checked(&self.endgame_park),
            endgame_points_estimate: self.endgame_points_estimate,
            endgame_notes: self.endgame_notes,
            robot_disabled: checked(&self.robot_disabled),
            robot_tippy: checked(&self.robot_tippy),
            fouls_committed: self.fouls_committed,
            overall_rating: self.overall_rating,
            post_match_notes: self.post_match_notes,
        }
    }
}

#[post("/match/{match_id}/submit_report")]
pub async fn post_submit_report(
    req: HttpRequest,
    session: Session,
    path: web::Path<i64>,
    form: web::Form<ReportForm>,
) -> Result<HttpResponse<()>, AppHttpError> {
    let match_id = *path;
    let state = server_state(&req)?;
    let requester = requester(&req, &session).await?;
    let profile = roles::check(&state.db, requester, Capability::SubmitReports).await?;
    let fields = form.into_inner().into_fields();
    let outcome = engine::submit_report(&state.db, profile.account_id, match_id, &fields, false)
        .await
        .map_err(|e| {
            log::error!("Failed to submit report for match {match_id}: {e:?}");
            AppHttpError::Internal
        })?;
    let base = &state.config.site_base_url_path;
    Ok(match outcome {
        engine::SubmitOutcome::Created { .. } => redirect_with_notice(
            &req,
            format!("{base}/dashboard"),
            "Report submitted.",
        ),
        engine::SubmitOutcome::Duplicate { .. } => redirect_with_notice(
            &req,
            format!("{base}/dashboard"),
            "You already submitted a report for this match.",
        ),
        engine::SubmitOutcome::NotAssigned => return Err(AppHttpError::NotAssigned),
    })
}
