// Recomputes every derived stats cache of an event from its confirmed
// reports. Useful after editing reports by hand or changing scoring
// constants.
use clap::Parser;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use scoutdeck_db as db;
use scoutdeck_server::config::ScoringConfig;
use scoutdeck_server::{engine, stats};

#[derive(Parser, Debug)]
struct Config {
    #[arg(long)]
    db: String,
    #[arg(long)]
    event_id: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::parse();
    let db = sea_orm::Database::connect(cfg.db).await?;
    let scoring = ScoringConfig::default();
    let teams = db::teams::Entity::find()
        .filter(db::teams::Column::EventId.eq(cfg.event_id))
        .order_by_asc(db::teams::Column::TeamNumber)
        .all(&db)
        .await?;
    for team in teams {
        let recomputed = stats::recompute_team_stats(&db, team.id).await?;
        println!(
            "Team {}: {}",
            team.team_number,
            if recomputed { "updated" } else { "no confirmed reports" }
        );
    }
    let matches = db::matches::Entity::find()
        .filter(db::matches::Column::EventId.eq(cfg.event_id))
        .order_by_asc(db::matches::Column::ScheduledTime)
        .all(&db)
        .await?;
    for m in matches {
        engine::refresh_all_submitted(&db, &m).await?;
        let recomputed = stats::recompute_match_stats(&db, &scoring, &m).await?;
        println!(
            "Match {}: {}",
            m.id,
            if recomputed { "updated" } else { "not enough confirmed reports" }
        );
    }
    Ok(())
}
