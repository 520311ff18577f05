// Event and match lifecycle: provider import, scout assignment, report
// intake (online and offline), confirmation, completion and prediction
// resolution. Handlers validate access and then call in here; everything
// that mutates more than one row lives in this module so the rules stay
// in one place.
use anyhow::Context;
use derive_more::Display;
use rand::seq::SliceRandom;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TryIntoModel,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use time::macros::format_description;

use crate::config::ScoringConfig;
use crate::offline::{self, OfflinePayload};
use crate::{gamify, statbotics, stats, tba};
use scoutdeck_db as db;

/// The scouter-entered portion of a report, shared between the online
/// form and the offline payload. Every field defaults so partial
/// payloads decode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFields {
    pub pre_match_notes: String,
    pub starting_position: String,

    pub auto_mobility: bool,
    pub auto_pieces_scored: i32,
    pub auto_pieces_missed: i32,
    pub auto_points_estimate: i32,
    pub auto_notes: String,

    pub teleop_pieces_scored: i32,
    pub teleop_pieces_missed: i32,
    pub teleop_defense_rating: i32,
    pub teleop_speed_rating: i32,
    pub teleop_notes: String,

    pub endgame_climb_attempted: bool,
    pub endgame_climb_success: bool,
    pub endgame_park: bool,
    pub endgame_points_estimate: i32,
    pub endgame_notes: String,

    pub robot_disabled: bool,
    pub robot_tippy: bool,
    pub fouls_committed: i32,
    pub overall_rating: i32,
    pub post_match_notes: String,
}

impl ReportFields {
    pub fn from_model(m: &db::reports::Model) -> Self {
        Self {
            pre_match_notes: m.pre_match_notes.clone(),
            starting_position: m.starting_position.clone(),
            auto_mobility: m.auto_mobility,
            auto_pieces_scored: m.auto_pieces_scored,
            auto_pieces_missed: m.auto_pieces_missed,
            auto_points_estimate: m.auto_points_estimate,
            auto_notes: m.auto_notes.clone(),
            teleop_pieces_scored: m.teleop_pieces_scored,
            teleop_pieces_missed: m.teleop_pieces_missed,
            teleop_defense_rating: m.teleop_defense_rating,
            teleop_speed_rating: m.teleop_speed_rating,
            teleop_notes: m.teleop_notes.clone(),
            endgame_climb_attempted: m.endgame_climb_attempted,
            endgame_climb_success: m.endgame_climb_success,
            endgame_park: m.endgame_park,
            endgame_points_estimate: m.endgame_points_estimate,
            endgame_notes: m.endgame_notes.clone(),
            robot_disabled: m.robot_disabled,
            robot_tippy: m.robot_tippy,
            fouls_committed: m.fouls_committed,
            overall_rating: m.overall_rating,
            post_match_notes: m.post_match_notes.clone(),
        }
    }

    fn to_active_model(&self) -> db::reports::ActiveModel {
        db::reports::ActiveModel {
            pre_match_notes: Set(self.pre_match_notes.clone()),
            starting_position: Set(self.starting_position.clone()),
            auto_mobility: Set(self.auto_mobility),
            auto_pieces_scored: Set(self.auto_pieces_scored),
            auto_pieces_missed: Set(self.auto_pieces_missed),
            auto_points_estimate: Set(self.auto_points_estimate),
            auto_notes: Set(self.auto_notes.clone()),
            teleop_pieces_scored: Set(self.teleop_pieces_scored),
            teleop_pieces_missed: Set(self.teleop_pieces_missed),
            teleop_defense_rating: Set(self.teleop_defense_rating),
            teleop_speed_rating: Set(self.teleop_speed_rating),
            teleop_notes: Set(self.teleop_notes.clone()),
            endgame_climb_attempted: Set(self.endgame_climb_attempted),
            endgame_climb_success: Set(self.endgame_climb_success),
            endgame_park: Set(self.endgame_park),
            endgame_points_estimate: Set(self.endgame_points_estimate),
            endgame_notes: Set(self.endgame_notes.clone()),
            robot_disabled: Set(self.robot_disabled),
            robot_tippy: Set(self.robot_tippy),
            fouls_committed: Set(self.fouls_committed),
            overall_rating: Set(self.overall_rating),
            post_match_notes: Set(self.post_match_notes.clone()),
            ..Default::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ImportSummary {
    pub teams_created: usize,
    pub teams_updated: usize,
    pub matches_created: usize,
    pub matches_updated: usize,
    pub matches_skipped: usize,
}

/// Imports or refreshes an event from the schedule provider: event row,
/// team roster, then the match schedule. Idempotent; rows are keyed by
/// the provider key and re-imports update in place. A match referring to
/// a team missing from the roster is skipped with a warning, never fatal
/// for the rest of the import.
pub async fn import_event<C: ConnectionTrait>(
    db: &C,
    client: &tba::Client,
    event_key: &str,
) -> anyhow::Result<Option<(db::events::Model, ImportSummary)>> {
    let Some(info) = client.event(event_key).await else {
        return Ok(None);
    };
    let date_format = format_description!("[year]-[month]-[day]");
    let start_date = time::Date::parse(&info.start_date, &date_format)
        .context(format!("Bad event start date {:?}", info.start_date))?;
    let end_date = time::Date::parse(&info.end_date, &date_format)
        .context(format!("Bad event end date {:?}", info.end_date))?;
    let now = time::OffsetDateTime::now_utc();

    let existing = db::events::Entity::find()
        .filter(db::events::Column::ExternalKey.eq(event_key))
        .one(db)
        .await
        .context("Failed to look up event by key")?;
    let mut event: db::events::ActiveModel = match existing {
        Some(model) => model.into(),
        None => db::events::ActiveModel {
            external_key: Set(Some(event_key.to_owned())),
            auto_rotation_enabled: Set(false),
            rotation_interval: Set(1),
            creation_time: Set(now),
            ..Default::default()
        },
    };
    event.name = Set(info.name.clone());
    event.event_code = Set(info.event_code.clone().unwrap_or_default());
    event.location = Set(info.location());
    event.start_date = Set(start_date);
    event.end_date = Set(end_date);
    event.week = Set(info.week);
    event.event_type = Set(info.event_type);
    event.event_type_string = Set(info.event_type_string.clone().unwrap_or_default());
    let event = event
        .save(db)
        .await
        .context("Failed to save event")?
        .try_into_model()
        .context("Failed to read back saved event")?;

    let mut summary = ImportSummary::default();
    let mut team_ids: HashMap<i32, i64> = HashMap::new();
    for team in client.event_teams(event_key).await.unwrap_or_default() {
        let id = upsert_team(db, event.id, &team, &mut summary).await?;
        team_ids.insert(team.team_number, id);
    }
    for m in client.event_matches(event_key).await.unwrap_or_default() {
        upsert_match(db, &event, &m, &team_ids, &mut summary).await?;
    }
    Ok(Some((event, summary)))
}

async fn upsert_team<C: ConnectionTrait>(
    db: &C,
    event_id: i64,
    info: &tba::TeamInfo,
    summary: &mut ImportSummary,
) -> anyhow::Result<i64> {
    let existing = db::teams::Entity::find()
        .filter(
            Condition::all()
                .add(db::teams::Column::EventId.eq(event_id))
                .add(db::teams::Column::TeamNumber.eq(info.team_number)),
        )
        .one(db)
        .await
        .context(format!("Failed to look up team {}", info.team_number))?;
    let creating = existing.is_none();
    let mut team: db::teams::ActiveModel = match existing {
        Some(model) => model.into(),
        None => db::teams::ActiveModel {
            event_id: Set(event_id),
            team_number: Set(info.team_number),
            ..Default::default()
        },
    };
    team.name = Set(info.name.clone().unwrap_or_default());
    team.nickname = Set(info.nickname.clone().unwrap_or_default());
    team.city = Set(info.city.clone().unwrap_or_default());
    team.state_prov = Set(info.state_prov.clone().unwrap_or_default());
    team.country = Set(info.country.clone().unwrap_or_default());
    team.rookie_year = Set(info.rookie_year);
    let team = team
        .save(db)
        .await
        .context(format!("Failed to save team {}", info.team_number))?
        .try_into_model()
        .context("Failed to read back saved team")?;
    if creating {
        summary.teams_created += 1;
    } else {
        summary.teams_updated += 1;
    }
    Ok(team.id)
}

async fn upsert_match<C: ConnectionTrait>(
    db: &C,
    event: &db::events::Model,
    info: &tba::MatchInfo,
    team_ids: &HashMap<i32, i64>,
    summary: &mut ImportSummary,
) -> anyhow::Result<()> {
    let alliance_ids = |keys: &[String]| -> Option<[i64; 3]> {
        let resolved: Vec<i64> = keys
            .iter()
            .filter_map(|k| tba::team_number_from_key(k))
            .filter_map(|n| team_ids.get(&n).copied())
            .collect();
        resolved.try_into().ok()
    };
    let (Some(red), Some(blue)) = (
        alliance_ids(&info.alliances.red.team_keys),
        alliance_ids(&info.alliances.blue.team_keys),
    ) else {
        log::warn!(
            "Skipping match {}: alliance teams not in the event roster",
            info.key
        );
        summary.matches_skipped += 1;
        return Ok(());
    };
    let scheduled_time = info
        .time
        .and_then(|t| time::OffsetDateTime::from_unix_timestamp(t).ok())
        .unwrap_or_else(|| event.start_date.midnight().assume_utc());
    let from_unix = |t: Option<i64>| t.and_then(|t| time::OffsetDateTime::from_unix_timestamp(t).ok());

    let existing = db::matches::Entity::find()
        .filter(db::matches::Column::ExternalKey.eq(&info.key))
        .one(db)
        .await
        .context(format!("Failed to look up match {}", info.key))?;
    let creating = existing.is_none();
    // Local state (status, all_submitted) survives re-import.
    let mut m: db::matches::ActiveModel = match existing {
        Some(model) => model.into(),
        None => db::matches::ActiveModel {
            event_id: Set(event.id),
            external_key: Set(Some(info.key.clone())),
            status: Set(db::matches::Status::Upcoming),
            all_submitted: Set(false),
            ..Default::default()
        },
    };
    m.match_number = Set(info.match_number);
    m.match_type = Set(if info.is_playoff() {
        db::matches::MatchType::Playoff
    } else {
        db::matches::MatchType::Qual
    });
    m.comp_level = Set(info.comp_level.clone());
    m.set_number = Set(info.set_number.unwrap_or(1));
    m.scheduled_time = Set(scheduled_time);
    m.actual_time = Set(from_unix(info.actual_time));
    m.predicted_time = Set(from_unix(info.predicted_time));
    m.red_1 = Set(red[0]);
    m.red_2 = Set(red[1]);
    m.red_3 = Set(red[2]);
    m.blue_1 = Set(blue[0]);
    m.blue_2 = Set(blue[1]);
    m.blue_3 = Set(blue[2]);
    // The provider reports -1 for a score not yet posted.
    if let (Some(red_score), Some(blue_score)) =
        (info.alliances.red.score, info.alliances.blue.score)
    {
        if red_score >= 0 && blue_score >= 0 {
            m.red_score = Set(Some(red_score));
            m.blue_score = Set(Some(blue_score));
            m.winner = Set(Some(db::common::Winner::from_scores(red_score, blue_score)));
            m.status = Set(db::matches::Status::Completed);
        }
    }
    m.save(db)
        .await
        .context(format!("Failed to save match {}", info.key))?;
    if creating {
        summary.matches_created += 1;
    } else {
        summary.matches_updated += 1;
    }
    Ok(())
}

/// Assigns (or reassigns) an account to one scouting position of a
/// match. The team follows from the position.
pub async fn assign_scouter<C: ConnectionTrait>(
    db: &C,
    m: &db::matches::Model,
    position: db::assignments::Position,
    account_id: i64,
) -> anyhow::Result<()> {
    let existing = db::assignments::Entity::find()
        .filter(
            Condition::all()
                .add(db::assignments::Column::MatchId.eq(m.id))
                .add(db::assignments::Column::Position.eq(position)),
        )
        .one(db)
        .await
        .context(format!("Failed to look up assignment of match {}", m.id))?;
    let mut a: db::assignments::ActiveModel = match existing {
        Some(model) => model.into(),
        None => db::assignments::ActiveModel {
            match_id: Set(m.id),
            position: Set(position),
            ..Default::default()
        },
    };
    a.account_id = Set(account_id);
    a.team_id = Set(position.team_id(m));
    a.assigned_time = Set(time::OffsetDateTime::now_utc());
    a.save(db)
        .await
        .context(format!("Failed to save assignment of match {}", m.id))?;
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoAssignOutcome {
    Assigned { matches_assigned: usize },
    NotEnoughScouters { available: usize },
}

/// Rotates the scouter pool across the event's upcoming matches. The
/// pool is shuffled once, then shifted by one slot every
/// `rotation_interval` matches so nobody watches the same alliance
/// station all day. Needs at least six scouters.
pub async fn auto_assign_scouters<C: ConnectionTrait>(
    db: &C,
    event: &db::events::Model,
) -> anyhow::Result<AutoAssignOutcome> {
    let scouters = db::profiles::Entity::find()
        .filter(db::profiles::Column::Role.eq(db::profiles::Role::Scouter))
        .all(db)
        .await
        .context("Failed to fetch scouter profiles")?;
    let mut pool: Vec<i64> = scouters.iter().map(|p| p.account_id).collect();
    if pool.len() < 6 {
        return Ok(AutoAssignOutcome::NotEnoughScouters {
            available: pool.len(),
        });
    }
    pool.shuffle(&mut rand::thread_rng());
    let matches = db::matches::Entity::find()
        .filter(
            Condition::all()
                .add(db::matches::Column::EventId.eq(event.id))
                .add(db::matches::Column::Status.eq(db::matches::Status::Upcoming)),
        )
        .order_by_asc(db::matches::Column::ScheduledTime)
        .all(db)
        .await
        .context(format!("Failed to fetch matches of event {}", event.id))?;
    let interval = event.rotation_interval.max(1) as usize;
    for (idx, m) in matches.iter().enumerate() {
        let offset = idx / interval;
        db::assignments::Entity::delete_many()
            .filter(db::assignments::Column::MatchId.eq(m.id))
            .exec(db)
            .await
            .context(format!("Failed to clear assignments of match {}", m.id))?;
        for (slot, position) in db::assignments::Position::ALL.iter().enumerate() {
            let account_id = pool[(offset + slot) % pool.len()];
            assign_scouter(db, m, *position, account_id).await?;
        }
    }
    Ok(AutoAssignOutcome::Assigned {
        matches_assigned: matches.len(),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { report_id: i64 },
    Duplicate { report_id: i64 },
    NotAssigned,
}

/// Saves a scout report for the submitter's assigned team in the match.
/// A second submission for the same (match, account, team) is rejected
/// as a duplicate, never overwritten.
pub async fn submit_report<C: ConnectionTrait>(
    db: &C,
    account_id: i64,
    match_id: i64,
    fields: &ReportFields,
    submitted_offline: bool,
) -> anyhow::Result<SubmitOutcome> {
    let Some(assignment) = db_assignment(db, match_id, account_id).await? else {
        return Ok(SubmitOutcome::NotAssigned);
    };
    let mut report = fields.to_active_model();
    report.assignment_id = Set(assignment.id);
    report.match_id = Set(match_id);
    report.account_id = Set(account_id);
    report.team_id = Set(assignment.team_id);
    report.submitted_time = Set(time::OffsetDateTime::now_utc());
    report.submitted_offline = Set(submitted_offline);
    report.confirmed = Set(false);
    // The insert races against concurrent submissions; the unique report
    // index is the arbiter, and a rejected write maps to Duplicate.
    let report = match report.save(db).await {
        Ok(saved) => saved
            .try_into_model()
            .context("Failed to read back saved report")?,
        Err(e) => {
            if let Some(existing) = db_report(db, match_id, account_id, assignment.team_id).await? {
                return Ok(SubmitOutcome::Duplicate {
                    report_id: existing.id,
                });
            }
            return Err(e).context(format!("Failed to save report for match {match_id}"));
        }
    };
    Ok(SubmitOutcome::Created {
        report_id: report.id,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Confirmed { new_level: Option<i64> },
    AlreadyConfirmed,
}

/// Marks a report confirmed and credits the scouter. Confirmation is
/// one-way; repeating it is a no-op so the XP can never be granted
/// twice. Derived caches for the team and the match are refreshed.
pub async fn confirm_report<C: ConnectionTrait>(
    db: &C,
    scoring: &ScoringConfig,
    report: db::reports::Model,
    confirmer_account_id: i64,
) -> anyhow::Result<ConfirmOutcome> {
    if report.confirmed {
        return Ok(ConfirmOutcome::AlreadyConfirmed);
    }
    let match_id = report.match_id;
    let team_id = report.team_id;
    let scouter_account_id = report.account_id;
    let mut update: db::reports::ActiveModel = report.into();
    update.confirmed = Set(true);
    update.confirmed_by = Set(Some(confirmer_account_id));
    update
        .update(db)
        .await
        .context(format!("Failed to confirm report of match {match_id}"))?;
    let new_level = gamify::add_experience(db, scoring, scouter_account_id, scoring.confirm_xp)
        .await?;
    stats::recompute_team_stats(db, team_id).await?;
    let m = db_match(db, match_id).await?;
    refresh_all_submitted(db, &m).await?;
    stats::recompute_match_stats(db, scoring, &m).await?;
    Ok(ConfirmOutcome::Confirmed { new_level })
}

/// Re-derives the match's `all_submitted` flag: set once six confirmed
/// reports exist, independent of the match status.
pub async fn refresh_all_submitted<C: ConnectionTrait>(
    db: &C,
    m: &db::matches::Model,
) -> anyhow::Result<bool> {
    let confirmed = db::reports::Entity::find()
        .filter(
            Condition::all()
                .add(db::reports::Column::MatchId.eq(m.id))
                .add(db::reports::Column::Confirmed.eq(true)),
        )
        .count(db)
        .await
        .context(format!("Failed to count reports of match {}", m.id))?;
    let all_submitted = confirmed >= 6;
    if all_submitted != m.all_submitted {
        let mut update: db::matches::ActiveModel = m.clone().into();
        update.all_submitted = Set(all_submitted);
        update
            .update(db)
            .await
            .context(format!("Failed to update match {}", m.id))?;
    }
    Ok(all_submitted)
}

pub async fn start_match<C: ConnectionTrait>(
    db: &C,
    m: db::matches::Model,
) -> anyhow::Result<()> {
    if m.status != db::matches::Status::Upcoming {
        return Ok(());
    }
    let mut update: db::matches::ActiveModel = m.into();
    update.status = Set(db::matches::Status::InProgress);
    update.actual_time = Set(Some(time::OffsetDateTime::now_utc()));
    update.update(db).await.context("Failed to start match")?;
    Ok(())
}

#[derive(Clone, Copy, Debug)]
pub struct CompletionSummary {
    pub winner: db::common::Winner,
    pub predictions_resolved: usize,
    pub predictions_correct: usize,
    pub scouters_awarded: usize,
}

/// Records final scores, resolves outstanding predictions and awards
/// completion XP to every scouter whose report on this match was
/// confirmed. Re-completing a match re-saves the scores but predictions
/// already resolved and XP already granted stay untouched.
pub async fn complete_match<C: ConnectionTrait>(
    db: &C,
    scoring: &ScoringConfig,
    m: db::matches::Model,
    red_score: i32,
    blue_score: i32,
) -> anyhow::Result<CompletionSummary> {
    let winner = db::common::Winner::from_scores(red_score, blue_score);
    let match_id = m.id;
    let first_completion = m.status != db::matches::Status::Completed;
    let mut update: db::matches::ActiveModel = m.into();
    update.red_score = Set(Some(red_score));
    update.blue_score = Set(Some(blue_score));
    update.winner = Set(Some(winner));
    update.status = Set(db::matches::Status::Completed);
    if first_completion {
        update.actual_time = Set(Some(time::OffsetDateTime::now_utc()));
    }
    update
        .update(db)
        .await
        .context(format!("Failed to complete match {match_id}"))?;

    let mut summary = CompletionSummary {
        winner,
        predictions_resolved: 0,
        predictions_correct: 0,
        scouters_awarded: 0,
    };
    let unresolved = db::predictions::Entity::find()
        .filter(
            Condition::all()
                .add(db::predictions::Column::MatchId.eq(match_id))
                .add(db::predictions::Column::IsCorrect.is_null()),
        )
        .all(db)
        .await
        .context(format!("Failed to fetch predictions of match {match_id}"))?;
    for prediction in unresolved {
        let correct = prediction.predicted_winner.matches_winner(winner);
        let account_id = prediction.account_id;
        let mut update: db::predictions::ActiveModel = prediction.into();
        update.is_correct = Set(Some(correct));
        update.points_awarded = Set(if correct { 1 } else { 0 });
        update
            .update(db)
            .await
            .context(format!("Failed to resolve prediction of match {match_id}"))?;
        if correct {
            gamify::add_prediction_point(db, account_id).await?;
            summary.predictions_correct += 1;
        }
        summary.predictions_resolved += 1;
    }

    if first_completion {
        let confirmed = db::reports::Entity::find()
            .filter(
                Condition::all()
                    .add(db::reports::Column::MatchId.eq(match_id))
                    .add(db::reports::Column::Confirmed.eq(true)),
            )
            .all(db)
            .await
            .context(format!("Failed to fetch reports of match {match_id}"))?;
        let accounts: HashSet<i64> = confirmed.iter().map(|r| r.account_id).collect();
        for account_id in accounts {
            gamify::add_experience(db, scoring, account_id, scoring.completion_xp).await?;
            summary.scouters_awarded += 1;
        }
    }
    Ok(summary)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PredictionOutcome {
    Saved,
    Locked,
}

/// Saves or replaces the account's prediction for an upcoming match.
/// Once the match leaves the Upcoming state the prediction is locked.
pub async fn submit_prediction<C: ConnectionTrait>(
    db: &C,
    account_id: i64,
    m: &db::matches::Model,
    predicted_winner: db::common::Alliance,
) -> anyhow::Result<PredictionOutcome> {
    if m.status != db::matches::Status::Upcoming {
        return Ok(PredictionOutcome::Locked);
    }
    let existing = db::predictions::Entity::find()
        .filter(
            Condition::all()
                .add(db::predictions::Column::AccountId.eq(account_id))
                .add(db::predictions::Column::MatchId.eq(m.id)),
        )
        .one(db)
        .await
        .context(format!("Failed to look up prediction of match {}", m.id))?;
    let mut prediction: db::predictions::ActiveModel = match existing {
        Some(model) => model.into(),
        None => db::predictions::ActiveModel {
            account_id: Set(account_id),
            match_id: Set(m.id),
            points_awarded: Set(0),
            creation_time: Set(time::OffsetDateTime::now_utc()),
            ..Default::default()
        },
    };
    prediction.predicted_winner = Set(predicted_winner);
    prediction
        .save(db)
        .await
        .context(format!("Failed to save prediction of match {}", m.id))?;
    Ok(PredictionOutcome::Saved)
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum OfflineError {
    #[display(fmt = "Invalid payload format (not valid base64).")]
    Base64,
    #[display(fmt = "Invalid payload data (not valid JSON).")]
    Json,
    #[display(fmt = "Match {_0} does not exist.")]
    UnknownMatch(i64),
    #[display(fmt = "Team {_0} is not registered for this event.")]
    UnknownTeam(i32),
    #[display(fmt = "Scouter {_0:?} does not exist.")]
    UnknownScouter(String),
    #[display(fmt = "The scouter is not assigned to this team in this match.")]
    NotAssigned,
    #[display(fmt = "A different report for this match and team already exists.")]
    Conflict,
}

impl std::error::Error for OfflineError {}

#[derive(Debug, PartialEq, Eq)]
pub enum OfflineScan {
    Saved { report_id: i64 },
    AlreadyProcessed { report_id: i64 },
    Rejected(OfflineError),
}

/// Ingests a scanned offline payload. Every lookup failure maps to a
/// distinct rejection so the admin doing the scanning can fix the right
/// thing. A rescan of a payload whose report was already saved is a
/// harmless no-op; a payload that collides with a different report is a
/// conflict and is never merged.
pub async fn process_offline<C: ConnectionTrait>(
    db: &C,
    data: &str,
) -> anyhow::Result<OfflineScan> {
    let payload = match offline::decode(data) {
        Ok(p) => p,
        Err(offline::DecodeError::Base64) => return Ok(OfflineScan::Rejected(OfflineError::Base64)),
        Err(offline::DecodeError::Json) => return Ok(OfflineScan::Rejected(OfflineError::Json)),
    };
    match resolve_offline(db, &payload).await? {
        Ok(scan) => Ok(scan),
        Err(e) => Ok(OfflineScan::Rejected(e)),
    }
}

async fn resolve_offline<C: ConnectionTrait>(
    db: &C,
    payload: &OfflinePayload,
) -> anyhow::Result<Result<OfflineScan, OfflineError>> {
    let Some(m) = db::matches::Entity::find_by_id(payload.match_id)
        .one(db)
        .await
        .context("Failed to look up match")?
    else {
        return Ok(Err(OfflineError::UnknownMatch(payload.match_id)));
    };
    let Some(team) = db::teams::Entity::find()
        .filter(
            Condition::all()
                .add(db::teams::Column::EventId.eq(m.event_id))
                .add(db::teams::Column::TeamNumber.eq(payload.team_number)),
        )
        .one(db)
        .await
        .context("Failed to look up team")?
    else {
        return Ok(Err(OfflineError::UnknownTeam(payload.team_number)));
    };
    let Some(account) = db::accounts::Entity::find()
        .filter(db::accounts::Column::Name.eq(&payload.scouter))
        .one(db)
        .await
        .context("Failed to look up account")?
    else {
        return Ok(Err(OfflineError::UnknownScouter(payload.scouter.clone())));
    };
    let Some(assignment) = db_assignment(db, m.id, account.id).await? else {
        return Ok(Err(OfflineError::NotAssigned));
    };
    if assignment.team_id != team.id {
        return Ok(Err(OfflineError::NotAssigned));
    }
    if let Some(existing) = db_report(db, m.id, account.id, team.id).await? {
        // The same payload scanned twice carries the saved report's id.
        if payload.report_id == Some(existing.id) {
            log::warn!(
                "Offline payload for report {} scanned again; ignoring",
                existing.id
            );
            return Ok(Ok(OfflineScan::AlreadyProcessed {
                report_id: existing.id,
            }));
        }
        return Ok(Err(OfflineError::Conflict));
    }
    let outcome = submit_report(db, account.id, m.id, &payload.fields, true).await?;
    Ok(Ok(match outcome {
        SubmitOutcome::Created { report_id } => OfflineScan::Saved { report_id },
        SubmitOutcome::Duplicate { report_id } => OfflineScan::AlreadyProcessed { report_id },
        SubmitOutcome::NotAssigned => return Ok(Err(OfflineError::NotAssigned)),
    }))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MetricsSummary {
    pub teams_updated: usize,
    pub teams_missing: usize,
}

/// Pulls predictive metrics for every team of the event: event-scoped
/// first, season-wide as the fallback. A team the provider knows nothing
/// about is counted and left untouched.
pub async fn sync_event_metrics<C: ConnectionTrait>(
    db: &C,
    client: &statbotics::Client,
    event: &db::events::Model,
) -> anyhow::Result<MetricsSummary> {
    let teams = db::teams::Entity::find()
        .filter(db::teams::Column::EventId.eq(event.id))
        .all(db)
        .await
        .context(format!("Failed to fetch teams of event {}", event.id))?;
    let year = event.start_date.year();
    let mut summary = MetricsSummary::default();
    for team in teams {
        let mut metrics = match &event.external_key {
            Some(key) => client.team_event(team.team_number, key).await,
            None => None,
        };
        if metrics.map_or(true, |m| m == statbotics::TeamMetrics::default()) {
            metrics = client.team_year(team.team_number, year).await;
        }
        let Some(metrics) = metrics else {
            summary.teams_missing += 1;
            continue;
        };
        let now = time::OffsetDateTime::now_utc();
        let team_id = team.id;
        let mut update: db::teams::ActiveModel = team.into();
        update.epa = Set(metrics.epa);
        update.win_rate = Set(metrics.win_rate);
        update.metrics_update_time = Set(Some(now));
        update
            .update(db)
            .await
            .context(format!("Failed to update metrics of team {team_id}"))?;
        store_external_metrics(db, team_id, &metrics, now).await?;
        summary.teams_updated += 1;
    }
    Ok(summary)
}

/// Writes provider metrics into the team's stats cache row, creating a
/// zeroed row when the team has not been scouted yet.
pub async fn store_external_metrics<C: ConnectionTrait>(
    db: &C,
    team_id: i64,
    metrics: &statbotics::TeamMetrics,
    now: time::OffsetDateTime,
) -> anyhow::Result<()> {
    let existing = db::team_stats::Entity::find()
        .filter(db::team_stats::Column::TeamId.eq(team_id))
        .one(db)
        .await
        .context(format!("Failed to fetch stats row of team {team_id}"))?;
    let mut row: db::team_stats::ActiveModel = match existing {
        Some(model) => model.into(),
        // No reports confirmed yet; start every aggregate at zero so the
        // ranking ignores them until matches_scouted moves off zero.
        None => db::team_stats::ActiveModel {
            team_id: Set(team_id),
            avg_auto_pieces: Set(0.0),
            avg_auto_points: Set(0.0),
            auto_mobility_rate: Set(0.0),
            avg_teleop_pieces: Set(0.0),
            avg_defense_rating: Set(0.0),
            avg_speed_rating: Set(0.0),
            climb_success_rate: Set(0.0),
            avg_endgame_points: Set(0.0),
            avg_overall_rating: Set(0.0),
            reliability_score: Set(0.0),
            matches_scouted: Set(0),
            update_time: Set(now),
            ..Default::default()
        },
    };
    row.epa = Set(metrics.epa);
    row.auto_epa = Set(metrics.auto_epa);
    row.teleop_epa = Set(metrics.teleop_epa);
    row.endgame_epa = Set(metrics.endgame_epa);
    row.external_win_rate = Set(metrics.win_rate);
    row.external_rank = Set(metrics.rank);
    row.metrics_update_time = Set(Some(now));
    row.save(db)
        .await
        .context(format!("Failed to save stats row of team {team_id}"))?;
    Ok(())
}

async fn db_assignment<C: ConnectionTrait>(
    db: &C,
    match_id: i64,
    account_id: i64,
) -> anyhow::Result<Option<db::assignments::Model>> {
    db::assignments::Entity::find()
        .filter(
            Condition::all()
                .add(db::assignments::Column::MatchId.eq(match_id))
                .add(db::assignments::Column::AccountId.eq(account_id)),
        )
        .one(db)
        .await
        .context(format!("Failed to look up assignment of match {match_id}"))
}

async fn db_report<C: ConnectionTrait>(
    db: &C,
    match_id: i64,
    account_id: i64,
    team_id: i64,
) -> anyhow::Result<Option<db::reports::Model>> {
    db::reports::Entity::find()
        .filter(
            Condition::all()
                .add(db::reports::Column::MatchId.eq(match_id))
                .add(db::reports::Column::AccountId.eq(account_id))
                .add(db::reports::Column::TeamId.eq(team_id)),
        )
        .one(db)
        .await
        .context(format!("Failed to look up report of match {match_id}"))
}

pub async fn db_match<C: ConnectionTrait>(
    db: &C,
    match_id: i64,
) -> anyhow::Result<db::matches::Model> {
    db::matches::Entity::find_by_id(match_id)
        .one(db)
        .await
        .context(format!("Failed to fetch match {match_id}"))?
        .ok_or_else(|| anyhow::anyhow!("Match {match_id} does not exist"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_fields_round_trip_through_model() {
        let fields = ReportFields {
            auto_mobility: true,
            auto_pieces_scored: 3,
            teleop_pieces_scored: 5,
            overall_rating: 8,
            post_match_notes: "strong defense".to_owned(),
            ..Default::default()
        };
        let mut am = fields.to_active_model();
        am.id = Set(1);
        am.assignment_id = Set(1);
        am.match_id = Set(1);
        am.account_id = Set(1);
        am.team_id = Set(1);
        am.submitted_time = Set(time::OffsetDateTime::UNIX_EPOCH);
        am.submitted_offline = Set(false);
        am.confirmed = Set(false);
        am.confirmed_by = Set(None);
        let model = sea_orm::TryIntoModel::try_into_model(am).unwrap();
        assert_eq!(ReportFields::from_model(&model), fields);
    }

    #[test]
    fn provider_scores_detect_unplayed_matches() {
        // -1 scores must not mark a match completed; exercised through
        // Winner::from_scores which only runs on non-negative pairs.
        assert_eq!(
            db::common::Winner::from_scores(85, 60),
            db::common::Winner::Red
        );
        assert_eq!(
            db::common::Winner::from_scores(10, 10),
            db::common::Winner::Tie
        );
    }
}
