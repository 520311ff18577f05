// Aggregation and ranking engines. The arithmetic lives in pure
// functions over in-memory report slices; the async wrappers only fetch
// rows and write the derived cache back. Caches are recomputed in full,
// never incrementally, and tolerate being stale or absent.
use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::{HashMap, HashSet};

use crate::config::ScoringConfig;
use scoutdeck_db as db;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TeamAggregate {
    pub avg_auto_pieces: f64,
    pub avg_auto_points: f64,
    pub auto_mobility_rate: f64,
    pub avg_teleop_pieces: f64,
    pub avg_defense_rating: f64,
    pub avg_speed_rating: f64,
    pub climb_success_rate: f64,
    pub avg_endgame_points: f64,
    pub avg_overall_rating: f64,
    pub reliability_score: f64,
    pub matches_scouted: i64,
}

/// Computes per-team aggregates from confirmed reports. Returns None
/// for an empty slice; the caller must then leave any cached row as-is.
pub fn team_aggregate(reports: &[db::reports::Model]) -> Option<TeamAggregate> {
    if reports.is_empty() {
        return None;
    }
    let n = reports.len() as f64;
    let mean = |f: fn(&db::reports::Model) -> i32| -> f64 {
        reports.iter().map(|r| f(r) as f64).sum::<f64>() / n
    };
    let count = |f: fn(&db::reports::Model) -> bool| reports.iter().filter(|r| f(r)).count() as f64;

    let climb_attempts = count(|r| r.endgame_climb_attempted);
    let climb_success_rate = if climb_attempts > 0.0 {
        count(|r| r.endgame_climb_success) / climb_attempts * 100.0
    } else {
        0.0
    };
    let disable_rate = count(|r| r.robot_disabled) / n;
    let avg_fouls = mean(|r| r.fouls_committed);
    Some(TeamAggregate {
        avg_auto_pieces: mean(|r| r.auto_pieces_scored),
        avg_auto_points: mean(|r| r.auto_points_estimate),
        auto_mobility_rate: count(|r| r.auto_mobility) / n * 100.0,
        avg_teleop_pieces: mean(|r| r.teleop_pieces_scored),
        avg_defense_rating: mean(|r| r.teleop_defense_rating),
        avg_speed_rating: mean(|r| r.teleop_speed_rating),
        climb_success_rate,
        avg_endgame_points: mean(|r| r.endgame_points_estimate),
        avg_overall_rating: mean(|r| r.overall_rating),
        // Unclamped: can go negative or above 100. Kept as-is.
        reliability_score: 100.0 - disable_rate * 50.0 - avg_fouls * 5.0,
        matches_scouted: reports.len() as i64,
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllianceTotals {
    pub auto: i32,
    pub teleop: i32,
    pub endgame: i32,
    pub predicted: i32,
}

pub fn alliance_totals<'a>(
    reports: impl Iterator<Item = &'a db::reports::Model>,
    teleop_piece_points: i32,
) -> AllianceTotals {
    let mut totals = AllianceTotals::default();
    for r in reports {
        totals.auto += r.auto_points_estimate;
        totals.teleop += r.teleop_pieces_scored * teleop_piece_points;
        totals.endgame += r.endgame_points_estimate;
    }
    totals.predicted = totals.auto + totals.teleop + totals.endgame;
    totals
}

/// Blends the internal scouting rating with the external predictive
/// metric. Internal data counts as present when at least one match was
/// scouted; an EPA present with value 0.0 still counts as present.
pub fn combined_score(
    avg_overall_rating: f64,
    matches_scouted: i64,
    epa: Option<f64>,
    scoring: &ScoringConfig,
) -> f64 {
    // Rescale the 0-10 internal rating to 0-100.
    let internal = avg_overall_rating * 10.0;
    match (matches_scouted > 0, epa) {
        (true, Some(external)) => {
            internal * scoring.internal_weight + external * scoring.external_weight
        }
        (true, None) => internal,
        (false, Some(external)) => external,
        (false, None) => 0.0,
    }
}

/// Recomputes the team's aggregate cache from its confirmed reports.
/// A team with zero confirmed reports is left untouched (returns false).
pub async fn recompute_team_stats<C: ConnectionTrait>(db: &C, team_id: i64) -> anyhow::Result<bool> {
    let reports = db::reports::Entity::find()
        .filter(
            sea_orm::Condition::all()
                .add(db::reports::Column::TeamId.eq(team_id))
                .add(db::reports::Column::Confirmed.eq(true)),
        )
        .all(db)
        .await
        .context(format!("Failed to fetch reports of team {team_id}"))?;
    let Some(agg) = team_aggregate(&reports) else {
        return Ok(false);
    };
    let existing = db::team_stats::Entity::find()
        .filter(db::team_stats::Column::TeamId.eq(team_id))
        .one(db)
        .await
        .context(format!("Failed to fetch stats row of team {team_id}"))?;
    let now = time::OffsetDateTime::now_utc();
    let mut row: db::team_stats::ActiveModel = match existing {
        // Keep the externally-sourced predictive fields; they are
        // refreshed by the metrics sync, not by this recompute.
        Some(model) => model.into(),
        None => db::team_stats::ActiveModel {
            team_id: Set(team_id),
            ..Default::default()
        },
    };
    row.avg_auto_pieces = Set(agg.avg_auto_pieces);
    row.avg_auto_points = Set(agg.avg_auto_points);
    row.auto_mobility_rate = Set(agg.auto_mobility_rate);
    row.avg_teleop_pieces = Set(agg.avg_teleop_pieces);
    row.avg_defense_rating = Set(agg.avg_defense_rating);
    row.avg_speed_rating = Set(agg.avg_speed_rating);
    row.climb_success_rate = Set(agg.climb_success_rate);
    row.avg_endgame_points = Set(agg.avg_endgame_points);
    row.avg_overall_rating = Set(agg.avg_overall_rating);
    row.reliability_score = Set(agg.reliability_score);
    row.matches_scouted = Set(agg.matches_scouted);
    row.update_time = Set(now);
    row.save(db)
        .await
        .context(format!("Failed to save stats row of team {team_id}"))?;
    Ok(true)
}

/// Recomputes per-alliance totals for a match. Only proceeds once six
/// confirmed reports exist (returns false otherwise).
pub async fn recompute_match_stats<C: ConnectionTrait>(
    db: &C,
    scoring: &ScoringConfig,
    m: &db::matches::Model,
) -> anyhow::Result<bool> {
    let reports = db::reports::Entity::find()
        .filter(
            sea_orm::Condition::all()
                .add(db::reports::Column::MatchId.eq(m.id))
                .add(db::reports::Column::Confirmed.eq(true)),
        )
        .all(db)
        .await
        .context(format!("Failed to fetch reports of match {}", m.id))?;
    if reports.len() < 6 {
        return Ok(false);
    }
    let red: HashSet<i64> = m.red_team_ids().into_iter().collect();
    let blue: HashSet<i64> = m.blue_team_ids().into_iter().collect();
    let red_totals = alliance_totals(
        reports.iter().filter(|r| red.contains(&r.team_id)),
        scoring.teleop_piece_points,
    );
    let blue_totals = alliance_totals(
        reports.iter().filter(|r| blue.contains(&r.team_id)),
        scoring.teleop_piece_points,
    );
    let existing = db::match_stats::Entity::find()
        .filter(db::match_stats::Column::MatchId.eq(m.id))
        .one(db)
        .await
        .context(format!("Failed to fetch stats row of match {}", m.id))?;
    let mut row: db::match_stats::ActiveModel = match existing {
        Some(model) => model.into(),
        None => db::match_stats::ActiveModel {
            match_id: Set(m.id),
            ..Default::default()
        },
    };
    row.red_total_auto_points = Set(red_totals.auto);
    row.red_total_teleop_points = Set(red_totals.teleop);
    row.red_total_endgame_points = Set(red_totals.endgame);
    row.red_predicted_score = Set(red_totals.predicted);
    row.blue_total_auto_points = Set(blue_totals.auto);
    row.blue_total_teleop_points = Set(blue_totals.teleop);
    row.blue_total_endgame_points = Set(blue_totals.endgame);
    row.blue_predicted_score = Set(blue_totals.predicted);
    row.calculated_time = Set(time::OffsetDateTime::now_utc());
    row.save(db)
        .await
        .context(format!("Failed to save stats row of match {}", m.id))?;
    Ok(true)
}

#[derive(Clone, Debug)]
pub struct PickListEntry {
    pub rank: usize,
    pub team: db::teams::Model,
    pub combined_score: f64,
    pub stats: Option<db::team_stats::Model>,
}

/// Full pick-list ranking for an event. Recomputes every team's
/// aggregate first (O(teams x reports); fine at event scale), then
/// sorts by combined score descending with team number ascending as the
/// deterministic tie-break.
pub async fn event_pick_list<C: ConnectionTrait>(
    db: &C,
    scoring: &ScoringConfig,
    event_id: i64,
) -> anyhow::Result<Vec<PickListEntry>> {
    let teams = db::teams::Entity::find()
        .filter(db::teams::Column::EventId.eq(event_id))
        .order_by_asc(db::teams::Column::TeamNumber)
        .all(db)
        .await
        .context(format!("Failed to fetch teams of event {event_id}"))?;
    for team in teams.iter() {
        recompute_team_stats(db, team.id).await?;
    }
    let mut stats_by_team: HashMap<i64, db::team_stats::Model> = db::team_stats::Entity::find()
        .filter(db::team_stats::Column::TeamId.is_in(teams.iter().map(|t| t.id)))
        .all(db)
        .await
        .context(format!("Failed to fetch stats of event {event_id}"))?
        .into_iter()
        .map(|s| (s.team_id, s))
        .collect();
    let mut entries: Vec<PickListEntry> = teams
        .into_iter()
        .map(|team| {
            let stats = stats_by_team.remove(&team.id);
            let score = stats
                .as_ref()
                .map(|s| combined_score(s.avg_overall_rating, s.matches_scouted, s.epa, scoring))
                .unwrap_or(0.0);
            PickListEntry {
                rank: 0,
                team,
                combined_score: score,
                stats,
            }
        })
        .collect();
    entries.sort_by(|a, b| {
        b.combined_score
            .total_cmp(&a.combined_score)
            .then(a.team.team_number.cmp(&b.team.team_number))
    });
    for (i, e) in entries.iter_mut().enumerate() {
        e.rank = i + 1;
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(team_id: i64) -> db::reports::Model {
        db::reports::Model {
            id: 0,
            assignment_id: 0,
            match_id: 1,
            account_id: 1,
            team_id,
            pre_match_notes: String::new(),
            starting_position: String::new(),
            auto_mobility: false,
            auto_pieces_scored: 0,
            auto_pieces_missed: 0,
            auto_points_estimate: 0,
            auto_notes: String::new(),
            teleop_pieces_scored: 0,
            teleop_pieces_missed: 0,
            teleop_defense_rating: 0,
            teleop_speed_rating: 0,
            teleop_notes: String::new(),
            endgame_climb_attempted: false,
            endgame_climb_success: false,
            endgame_park: false,
            endgame_points_estimate: 0,
            endgame_notes: String::new(),
            robot_disabled: false,
            robot_tippy: false,
            fouls_committed: 0,
            overall_rating: 0,
            post_match_notes: String::new(),
            submitted_time: time::OffsetDateTime::UNIX_EPOCH,
            submitted_offline: false,
            confirmed: true,
            confirmed_by: None,
        }
    }

    #[test]
    fn empty_slice_yields_none() {
        assert_eq!(team_aggregate(&[]), None);
    }

    #[test]
    fn climb_rate_is_zero_without_attempts() {
        // Success without an attempt is bad data; the rate stays 0.
        let mut r = report(1);
        r.endgame_climb_success = true;
        let agg = team_aggregate(&[r]).unwrap();
        assert_eq!(agg.climb_success_rate, 0.0);
    }

    #[test]
    fn climb_rate_counts_attempts_only() {
        let mut attempted_ok = report(1);
        attempted_ok.endgame_climb_attempted = true;
        attempted_ok.endgame_climb_success = true;
        let mut attempted_fail = report(1);
        attempted_fail.endgame_climb_attempted = true;
        let no_attempt = report(1);
        let agg = team_aggregate(&[attempted_ok, attempted_fail, no_attempt]).unwrap();
        assert_eq!(agg.climb_success_rate, 50.0);
    }

    #[test]
    fn clean_team_has_full_reliability() {
        let agg = team_aggregate(&[report(1), report(1)]).unwrap();
        assert_eq!(agg.reliability_score, 100.0);
    }

    #[test]
    fn reliability_decreases_with_disables_and_fouls() {
        let mut disabled = report(1);
        disabled.robot_disabled = true;
        let clean = report(1);
        let half_disabled = team_aggregate(&[disabled.clone(), clean.clone()]).unwrap();
        assert_eq!(half_disabled.reliability_score, 75.0);

        let mut fouler = report(1);
        fouler.fouls_committed = 4;
        let with_fouls = team_aggregate(&[fouler, clean]).unwrap();
        assert_eq!(with_fouls.reliability_score, 90.0);

        // Unclamped: heavy foul counts push the score negative.
        let mut heavy = report(1);
        heavy.fouls_committed = 30;
        heavy.robot_disabled = true;
        let negative = team_aggregate(&[heavy]).unwrap();
        assert!(negative.reliability_score < 0.0);
    }

    #[test]
    fn mobility_rate_is_a_percentage() {
        let mut moved = report(1);
        moved.auto_mobility = true;
        let stayed = report(1);
        let agg = team_aggregate(&[moved, stayed.clone(), stayed]).unwrap();
        assert!((agg.auto_mobility_rate - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn alliance_totals_scenario() {
        let mk = |auto: i32, teleop_pieces: i32, endgame: i32| {
            let mut r = report(1);
            r.auto_points_estimate = auto;
            r.teleop_pieces_scored = teleop_pieces;
            r.endgame_points_estimate = endgame;
            r
        };
        let red = [mk(3, 4, 0), mk(7, 6, 0), mk(1, 2, 5)];
        let totals = alliance_totals(red.iter(), 2);
        assert_eq!(totals.auto, 11);
        assert_eq!(totals.teleop, 24);
        assert_eq!(totals.endgame, 5);
        assert_eq!(totals.predicted, 40);
    }

    #[test]
    fn combined_score_blend_rules() {
        let scoring = ScoringConfig::default();
        // Internal only: 8.0/10 rescales to 80.
        assert_eq!(combined_score(8.0, 3, None, &scoring), 80.0);
        // Both present: 0.6*80 + 0.4*50.
        assert_eq!(combined_score(8.0, 3, Some(50.0), &scoring), 68.0);
        // External present as zero still blends.
        assert_eq!(combined_score(8.0, 3, Some(0.0), &scoring), 48.0);
        // External only.
        assert_eq!(combined_score(0.0, 0, Some(42.0), &scoring), 42.0);
        // Neither.
        assert_eq!(combined_score(0.0, 0, None, &scoring), 0.0);
    }
}
