// CSV exports for an event: the match schedule with results, confirmed
// scouting reports and the team stats table. One header row, one row
// per record, text fields escaped.
use anyhow::Context;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

use crate::config::ScoringConfig;
use crate::stats;
use scoutdeck_db as db;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportKind {
    Matches,
    Reports,
    TeamStats,
}

impl ExportKind {
    pub fn from_str(s: &str) -> Option<ExportKind> {
        match s {
            "matches" => Some(ExportKind::Matches),
            "reports" => Some(ExportKind::Reports),
            "team_stats" => Some(ExportKind::TeamStats),
            _ => None,
        }
    }

    pub fn file_name(self, event_code: &str) -> String {
        let kind = match self {
            ExportKind::Matches => "matches",
            ExportKind::Reports => "reports",
            ExportKind::TeamStats => "team_stats",
        };
        format!("{event_code}_{kind}.csv")
    }
}

pub async fn export<C: ConnectionTrait>(
    db: &C,
    scoring: &ScoringConfig,
    event: &db::events::Model,
    kind: ExportKind,
) -> anyhow::Result<String> {
    match kind {
        ExportKind::Matches => matches_csv(db, event).await,
        ExportKind::Reports => reports_csv(db, event).await,
        ExportKind::TeamStats => team_stats_csv(db, scoring, event).await,
    }
}

async fn matches_csv<C: ConnectionTrait>(
    db: &C,
    event: &db::events::Model,
) -> anyhow::Result<String> {
    let matches = db::matches::Entity::find()
        .filter(db::matches::Column::EventId.eq(event.id))
        .order_by_asc(db::matches::Column::ScheduledTime)
        .all(db)
        .await
        .context("Failed to fetch matches for export")?;
    let numbers = team_numbers(db, event.id).await?;
    let number = |team_id: i64| {
        numbers
            .get(&team_id)
            .map(|n| n.to_string())
            .unwrap_or_default()
    };
    let mut out = String::from(
        "match_number,match_type,comp_level,set_number,\
         red_1,red_2,red_3,blue_1,blue_2,blue_3,\
         red_score,blue_score,winner,status\n",
    );
    for m in matches {
        let row = [
            m.match_number.to_string(),
            match_type_str(m.match_type).to_owned(),
            m.comp_level.clone(),
            m.set_number.to_string(),
            number(m.red_1),
            number(m.red_2),
            number(m.red_3),
            number(m.blue_1),
            number(m.blue_2),
            number(m.blue_3),
            opt_i32(m.red_score),
            opt_i32(m.blue_score),
            m.winner.map(winner_str).unwrap_or_default().to_owned(),
            status_str(m.status).to_owned(),
        ];
        push_row(&mut out, &row);
    }
    Ok(out)
}

async fn reports_csv<C: ConnectionTrait>(
    db: &C,
    event: &db::events::Model,
) -> anyhow::Result<String> {
    let matches = db::matches::Entity::find()
        .filter(db::matches::Column::EventId.eq(event.id))
        .all(db)
        .await
        .context("Failed to fetch matches for export")?;
    let match_numbers: HashMap<i64, i32> =
        matches.iter().map(|m| (m.id, m.match_number)).collect();
    let reports = db::reports::Entity::find()
        .filter(
            sea_orm::Condition::all()
                .add(db::reports::Column::MatchId.is_in(matches.iter().map(|m| m.id)))
                .add(db::reports::Column::Confirmed.eq(true)),
        )
        .order_by_asc(db::reports::Column::SubmittedTime)
        .all(db)
        .await
        .context("Failed to fetch reports for export")?;
    let numbers = team_numbers(db, event.id).await?;
    let names = account_names(db, reports.iter().map(|r| r.account_id)).await?;
    let mut out = String::from(
        "match_number,team_number,scouter,auto_points,teleop_pieces,\
         endgame_points,overall_rating,confirmed\n",
    );
    for r in reports {
        let row = [
            match_numbers
                .get(&r.match_id)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            numbers
                .get(&r.team_id)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            names.get(&r.account_id).cloned().unwrap_or_default(),
            r.auto_points_estimate.to_string(),
            r.teleop_pieces_scored.to_string(),
            r.endgame_points_estimate.to_string(),
            r.overall_rating.to_string(),
            "yes".to_owned(),
        ];
        push_row(&mut out, &row);
    }
    Ok(out)
}

async fn team_stats_csv<C: ConnectionTrait>(
    db: &C,
    scoring: &ScoringConfig,
    event: &db::events::Model,
) -> anyhow::Result<String> {
    let entries = stats::event_pick_list(db, scoring, event.id).await?;
    let mut out = String::from(
        "rank,team_number,nickname,combined_score,matches_scouted,\
         avg_auto_points,avg_teleop_pieces,avg_endgame_points,\
         avg_overall_rating,avg_defense_rating,avg_speed_rating,\
         climb_success_rate,reliability_score,epa,external_win_rate,external_rank\n",
    );
    for e in entries {
        let s = e.stats.as_ref();
        let row = [
            e.rank.to_string(),
            e.team.team_number.to_string(),
            e.team.nickname.clone(),
            format!("{:.1}", e.combined_score),
            s.map(|s| s.matches_scouted.to_string()).unwrap_or_default(),
            fmt1(s.map(|s| s.avg_auto_points)),
            fmt1(s.map(|s| s.avg_teleop_pieces)),
            fmt1(s.map(|s| s.avg_endgame_points)),
            fmt1(s.map(|s| s.avg_overall_rating)),
            fmt1(s.map(|s| s.avg_defense_rating)),
            fmt1(s.map(|s| s.avg_speed_rating)),
            s.map(|s| format!("{:.0}", s.climb_success_rate))
                .unwrap_or_default(),
            fmt1(s.map(|s| s.reliability_score)),
            fmt1(s.and_then(|s| s.epa)),
            s.and_then(|s| s.external_win_rate)
                .map(|w| format!("{w:.2}"))
                .unwrap_or_default(),
            s.and_then(|s| s.external_rank)
                .map(|r| r.to_string())
                .unwrap_or_default(),
        ];
        push_row(&mut out, &row);
    }
    Ok(out)
}

async fn team_numbers<C: ConnectionTrait>(
    db: &C,
    event_id: i64,
) -> anyhow::Result<HashMap<i64, i32>> {
    Ok(db::teams::Entity::find()
        .filter(db::teams::Column::EventId.eq(event_id))
        .all(db)
        .await
        .context("Failed to fetch teams for export")?
        .into_iter()
        .map(|t| (t.id, t.team_number))
        .collect())
}

async fn account_names<C: ConnectionTrait>(
    db: &C,
    account_ids: impl Iterator<Item = i64>,
) -> anyhow::Result<HashMap<i64, String>> {
    Ok(db::accounts::Entity::find()
        .filter(db::accounts::Column::Id.is_in(account_ids))
        .all(db)
        .await
        .context("Failed to fetch accounts for export")?
        .into_iter()
        .map(|a| (a.id, a.name))
        .collect())
}

fn opt_i32(v: Option<i32>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn fmt1(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.1}")).unwrap_or_default()
}

fn match_type_str(t: db::matches::MatchType) -> &'static str {
    match t {
        db::matches::MatchType::Qual => "QUAL",
        db::matches::MatchType::Playoff => "PLAYOFF",
    }
}

fn status_str(s: db::matches::Status) -> &'static str {
    match s {
        db::matches::Status::Upcoming => "UPCOMING",
        db::matches::Status::InProgress => "IN_PROGRESS",
        db::matches::Status::Completed => "COMPLETED",
    }
}

fn winner_str(w: db::common::Winner) -> &'static str {
    match w {
        db::common::Winner::Red => "RED",
        db::common::Winner::Blue => "BLUE",
        db::common::Winner::Tie => "TIE",
    }
}

fn push_row(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape(field));
    }
    out.push('\n');
}

// Quote only when the field needs it.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_only_when_needed() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn rows_join_with_commas() {
        let mut out = String::new();
        push_row(
            &mut out,
            &["1".to_owned(), "x,y".to_owned(), String::new()],
        );
        assert_eq!(out, "1,\"x,y\",\n");
    }

    #[test]
    fn fixed_decimal_helpers() {
        assert_eq!(fmt1(Some(7.25)), "7.2");
        assert_eq!(fmt1(None), "");
        assert_eq!(opt_i32(Some(85)), "85");
        assert_eq!(opt_i32(None), "");
    }

    #[test]
    fn export_file_names() {
        assert_eq!(
            ExportKind::TeamStats.file_name("CASJ"),
            "CASJ_team_stats.csv"
        );
        assert_eq!(ExportKind::from_str("matches"), Some(ExportKind::Matches));
        assert_eq!(ExportKind::from_str("bogus"), None);
    }
}
