use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::{App, HttpServer};
use anyhow::Context;
use sea_orm::Database;

use crate::config::Config;
use crate::handlers::*;
use crate::server_state::ServerState;
use crate::{statbotics, tba};

pub struct Handle {
    pub server: actix_web::dev::Server,
    pub addrs: Vec<std::net::SocketAddr>,
}

pub async fn run(config: Config) -> anyhow::Result<()> {
    let handle = create(config).await?;
    handle.server.await?;
    Ok(())
}

pub async fn create(config: Config) -> anyhow::Result<Handle> {
    let mut db_options = sea_orm::ConnectOptions::new(&config.db_path);
    db_options.max_connections(32);
    let db = Database::connect(db_options).await?;
    let mut tmpl = handlebars::Handlebars::new();
    tmpl.set_strict_mode(true);
    tmpl.set_dev_mode(true);
    let tf = |t: &str| -> std::path::PathBuf {
        std::path::Path::new(&config.server_config.fs_root_dir)
            .join("templates")
            .join(format!("{t}.hbs"))
    };
    for name in [
        "index",
        "events",
        "event",
        "match",
        "dashboard",
        "submit_report",
        "match_reports",
        "offline_code",
        "scan_offline",
        "team_stats",
        "match_analytics",
        "pick_list",
        "leaderboard",
        "login",
    ] {
        tmpl.register_template_file(name, tf(name))
            .context(format!("Failed to register {name} template"))?;
    }
    let port = config.server_config.port;

    let app_state = ServerState {
        tmpl,
        db,
        tba: tba::Client::new(&config.tba_config),
        statbotics: statbotics::Client::new(&config.statbotics_config),
        scoring: config.scoring_config,
        config: config.server_config,
    };

    let secret_key = actix_web::cookie::Key::generate();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                secret_key.clone(),
            ))
            .app_data(app_state.clone())
            .service(get_index::get_index)
            .service(get_events::get_events)
            .service(get_event::get_event)
            .service(get_match::get_match)
            .service(get_scouter_dashboard::get_scouter_dashboard)
            .service(get_submit_report::get_submit_report)
            .service(get_match_reports::get_match_reports)
            .service(get_offline_code::get_offline_code)
            .service(get_scan_offline::get_scan_offline)
            .service(get_team_stats::get_team_stats)
            .service(get_match_analytics::get_match_analytics)
            .service(get_pick_list::get_pick_list)
            .service(get_leaderboard::get_leaderboard)
            .service(get_export::get_export)
            .service(get_login::get_login)
            .service(get_logout::get_logout)
            .service(post_login::post_login)
            .service(post_register::post_register)
            .service(post_create_event::post_create_event)
            .service(post_sync_metrics::post_sync_metrics)
            .service(post_assign_scouters::post_assign_scouters)
            .service(post_auto_assign::post_auto_assign)
            .service(post_start_match::post_start_match)
            .service(post_submit_report::post_submit_report)
            .service(post_submit_prediction::post_submit_prediction)
            .service(post_confirm_report::post_confirm_report)
            .service(post_complete_match::post_complete_match)
            .service(post_scan_offline::post_scan_offline)
            .service(post_set_role::post_set_role)
            .service(actix_files::Files::new(
                "/static",
                std::path::Path::new(&app_state.config.fs_root_dir).join("static"),
            ))
    })
    .workers(8)
    .bind(("::", port))?;
    let addrs = server.addrs();
    let server = server.run(); // Does not actually run the server but creates a future.
    Ok(Handle { server, addrs })
}
