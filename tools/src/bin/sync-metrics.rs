// Pulls external predictive metrics for every team of an event without
// going through the web UI.
use clap::Parser;
use sea_orm::EntityTrait;

use scoutdeck_db as db;
use scoutdeck_server::config::StatboticsConfig;
use scoutdeck_server::{engine, statbotics};

#[derive(Parser, Debug)]
struct Config {
    #[arg(long)]
    db: String,
    #[arg(long)]
    event_id: i64,
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::parse();
    let db = sea_orm::Database::connect(cfg.db).await?;
    let mut provider_config = StatboticsConfig::default();
    if let Some(base_url) = cfg.base_url {
        provider_config.base_url = base_url;
    }
    let client = statbotics::Client::new(&provider_config);
    let event = db::events::Entity::find_by_id(cfg.event_id)
        .one(&db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Event {} does not exist", cfg.event_id))?;
    let summary = engine::sync_event_metrics(&db, &client, &event).await?;
    println!(
        "Updated {} teams, {} without provider data.",
        summary.teams_updated, summary.teams_missing
    );
    Ok(())
}
