// End-to-end lifecycle tests against an in-memory sqlite database:
// report intake, confirmation, completion and the derived caches.
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;

use scoutdeck_db as db;
use scoutdeck_server::auth::Requester;
use scoutdeck_server::config::ScoringConfig;
use scoutdeck_server::engine::{self, ReportFields};
use scoutdeck_server::roles::{self, Capability};
use scoutdeck_server::{gamify, offline, statbotics, stats};

async fn test_db() -> DatabaseConnection {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Applying migrations failed");
    db
}

async fn mk_account(db: &DatabaseConnection, name: &str) -> i64 {
    let now = time::OffsetDateTime::now_utc();
    let account_id = db::accounts::Entity::insert(db::accounts::ActiveModel {
        name: Set(name.to_owned()),
        email: Set(None),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("insert account")
    .last_insert_id;
    db::profiles::Entity::insert(db::profiles::ActiveModel {
        account_id: Set(account_id),
        role: Set(db::profiles::Role::Scouter),
        prediction_points: Set(0),
        experience_points: Set(0),
        level: Set(1),
        creation_time: Set(now),
        update_time: Set(now),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("insert profile");
    account_id
}

async fn mk_event(db: &DatabaseConnection) -> db::events::Model {
    let event_id = db::events::Entity::insert(db::events::ActiveModel {
        name: Set("Test Regional".to_owned()),
        event_code: Set("TEST".to_owned()),
        location: Set("Testville".to_owned()),
        start_date: Set(time::macros::date!(2026 - 03 - 06)),
        end_date: Set(time::macros::date!(2026 - 03 - 08)),
        external_key: Set(None),
        week: Set(Some(1)),
        event_type: Set(Some(0)),
        event_type_string: Set("Regional".to_owned()),
        auto_rotation_enabled: Set(false),
        rotation_interval: Set(1),
        creation_time: Set(time::OffsetDateTime::now_utc()),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("insert event")
    .last_insert_id;
    db::events::Entity::find_by_id(event_id)
        .one(db)
        .await
        .expect("fetch event")
        .expect("event exists")
}

async fn mk_team(db: &DatabaseConnection, event_id: i64, team_number: i32) -> i64 {
    db::teams::Entity::insert(db::teams::ActiveModel {
        team_number: Set(team_number),
        event_id: Set(event_id),
        name: Set(format!("Team {team_number}")),
        nickname: Set(format!("Nick {team_number}")),
        city: Set(String::new()),
        state_prov: Set(String::new()),
        country: Set(String::new()),
        rookie_year: Set(None),
        epa: Set(None),
        win_rate: Set(None),
        metrics_update_time: Set(None),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("insert team")
    .last_insert_id
}

async fn mk_match(db: &DatabaseConnection, event_id: i64, teams: &[i64; 6]) -> db::matches::Model {
    let match_id = db::matches::Entity::insert(db::matches::ActiveModel {
        event_id: Set(event_id),
        match_number: Set(1),
        match_type: Set(db::matches::MatchType::Qual),
        comp_level: Set("qm".to_owned()),
        set_number: Set(1),
        external_key: Set(None),
        scheduled_time: Set(time::OffsetDateTime::now_utc()),
        actual_time: Set(None),
        predicted_time: Set(None),
        red_1: Set(teams[0]),
        red_2: Set(teams[1]),
        red_3: Set(teams[2]),
        blue_1: Set(teams[3]),
        blue_2: Set(teams[4]),
        blue_3: Set(teams[5]),
        status: Set(db::matches::Status::Upcoming),
        all_submitted: Set(false),
        red_score: Set(None),
        blue_score: Set(None),
        winner: Set(None),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("insert match")
    .last_insert_id;
    db::matches::Entity::find_by_id(match_id)
        .one(db)
        .await
        .expect("fetch match")
        .expect("match exists")
}

struct Fixture {
    event: db::events::Model,
    m: db::matches::Model,
    teams: [i64; 6],
    scouters: Vec<i64>,
}

// One match, six teams, six scouters assigned one per position.
async fn full_match_fixture(db: &DatabaseConnection) -> Fixture {
    let event = mk_event(db).await;
    let mut teams = [0i64; 6];
    for (i, t) in teams.iter_mut().enumerate() {
        *t = mk_team(db, event.id, 100 + i as i32).await;
    }
    let m = mk_match(db, event.id, &teams).await;
    let mut scouters = Vec::new();
    for (i, position) in db::assignments::Position::ALL.iter().enumerate() {
        let account_id = mk_account(db, &format!("scout{i}")).await;
        engine::assign_scouter(db, &m, *position, account_id)
            .await
            .expect("assign scouter");
        scouters.push(account_id);
    }
    Fixture {
        event,
        m,
        teams,
        scouters,
    }
}

async fn submit_and_confirm_all(
    db: &DatabaseConnection,
    scoring: &ScoringConfig,
    f: &Fixture,
    confirmer: i64,
) {
    for account_id in &f.scouters {
        let outcome = engine::submit_report(db, *account_id, f.m.id, &some_fields(), false)
            .await
            .expect("submit report");
        let engine::SubmitOutcome::Created { report_id } = outcome else {
            panic!("expected report creation, got {outcome:?}");
        };
        let report = db::reports::Entity::find_by_id(report_id)
            .one(db)
            .await
            .expect("fetch report")
            .expect("report exists");
        engine::confirm_report(db, scoring, report, confirmer)
            .await
            .expect("confirm report");
    }
}

fn some_fields() -> ReportFields {
    ReportFields {
        auto_mobility: true,
        auto_pieces_scored: 2,
        auto_points_estimate: 8,
        teleop_pieces_scored: 5,
        teleop_defense_rating: 6,
        teleop_speed_rating: 7,
        endgame_points_estimate: 10,
        overall_rating: 7,
        ..Default::default()
    }
}

#[tokio::test]
async fn all_submitted_flips_at_sixth_confirmation() {
    let db = test_db().await;
    let scoring = ScoringConfig::default();
    let f = full_match_fixture(&db).await;
    let confirmer = mk_account(&db, "strategist").await;

    for (i, account_id) in f.scouters.iter().enumerate() {
        let outcome = engine::submit_report(&db, *account_id, f.m.id, &some_fields(), false)
            .await
            .expect("submit report");
        let engine::SubmitOutcome::Created { report_id } = outcome else {
            panic!("expected report creation");
        };
        let report = db::reports::Entity::find_by_id(report_id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        engine::confirm_report(&db, &scoring, report, confirmer)
            .await
            .expect("confirm report");
        let m = db::matches::Entity::find_by_id(f.m.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.all_submitted, i == 5, "after {} confirmations", i + 1);
    }
}

#[tokio::test]
async fn reconfirmation_is_a_noop_and_xp_granted_once() {
    let db = test_db().await;
    let scoring = ScoringConfig::default();
    let f = full_match_fixture(&db).await;
    let confirmer = mk_account(&db, "strategist").await;
    let scouter = f.scouters[0];

    let engine::SubmitOutcome::Created { report_id } =
        engine::submit_report(&db, scouter, f.m.id, &some_fields(), false)
            .await
            .unwrap()
    else {
        panic!("expected report creation");
    };
    let report = db::reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let first = engine::confirm_report(&db, &scoring, report.clone(), confirmer)
        .await
        .unwrap();
    assert!(matches!(first, engine::ConfirmOutcome::Confirmed { .. }));

    let report = db::reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(report.confirmed);
    assert_eq!(report.confirmed_by, Some(confirmer));
    let second = engine::confirm_report(&db, &scoring, report, confirmer)
        .await
        .unwrap();
    assert_eq!(second, engine::ConfirmOutcome::AlreadyConfirmed);

    let profile = db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(scouter))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.experience_points, scoring.confirm_xp);
}

#[tokio::test]
async fn duplicate_online_submission_is_rejected() {
    let db = test_db().await;
    let f = full_match_fixture(&db).await;
    let scouter = f.scouters[0];

    let first = engine::submit_report(&db, scouter, f.m.id, &some_fields(), false)
        .await
        .unwrap();
    let engine::SubmitOutcome::Created { report_id } = first else {
        panic!("expected report creation");
    };
    let second = engine::submit_report(&db, scouter, f.m.id, &some_fields(), false)
        .await
        .unwrap();
    assert_eq!(second, engine::SubmitOutcome::Duplicate { report_id });
    let count = db::reports::Entity::find()
        .filter(db::reports::Column::MatchId.eq(f.m.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn unassigned_scouter_cannot_submit() {
    let db = test_db().await;
    let f = full_match_fixture(&db).await;
    let outsider = mk_account(&db, "outsider").await;
    let outcome = engine::submit_report(&db, outsider, f.m.id, &some_fields(), false)
        .await
        .unwrap();
    assert_eq!(outcome, engine::SubmitOutcome::NotAssigned);
}

#[tokio::test]
async fn completion_resolves_predictions_and_awards_once() {
    let db = test_db().await;
    let scoring = ScoringConfig::default();
    let f = full_match_fixture(&db).await;
    let confirmer = mk_account(&db, "strategist").await;
    let red_fan = mk_account(&db, "redfan").await;
    let blue_fan = mk_account(&db, "bluefan").await;

    engine::submit_prediction(&db, red_fan, &f.m, db::common::Alliance::Red)
        .await
        .unwrap();
    engine::submit_prediction(&db, blue_fan, &f.m, db::common::Alliance::Blue)
        .await
        .unwrap();
    submit_and_confirm_all(&db, &scoring, &f, confirmer).await;

    let m = db::matches::Entity::find_by_id(f.m.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let summary = engine::complete_match(&db, &scoring, m, 85, 60).await.unwrap();
    assert_eq!(summary.winner, db::common::Winner::Red);
    assert_eq!(summary.predictions_resolved, 2);
    assert_eq!(summary.predictions_correct, 1);
    assert_eq!(summary.scouters_awarded, 6);

    let red_profile = db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(red_fan))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(red_profile.prediction_points, 1);
    let blue_profile = db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(blue_fan))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(blue_profile.prediction_points, 0);

    // Scouters got confirm XP plus completion XP, exactly once.
    let scouter_profile = db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(f.scouters[0]))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        scouter_profile.experience_points,
        scoring.confirm_xp + scoring.completion_xp
    );

    // Re-completing corrects the score but awards nothing new.
    let m = db::matches::Entity::find_by_id(f.m.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let summary = engine::complete_match(&db, &scoring, m, 60, 85).await.unwrap();
    assert_eq!(summary.winner, db::common::Winner::Blue);
    assert_eq!(summary.predictions_resolved, 0);
    assert_eq!(summary.scouters_awarded, 0);
    let red_profile = db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(red_fan))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(red_profile.prediction_points, 1);
}

#[tokio::test]
async fn predictions_lock_when_match_starts() {
    let db = test_db().await;
    let f = full_match_fixture(&db).await;
    let fan = mk_account(&db, "fan").await;
    engine::start_match(&db, f.m.clone()).await.unwrap();
    let m = db::matches::Entity::find_by_id(f.m.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(m.status, db::matches::Status::InProgress);
    let outcome = engine::submit_prediction(&db, fan, &m, db::common::Alliance::Red)
        .await
        .unwrap();
    assert_eq!(outcome, engine::PredictionOutcome::Locked);
}

#[tokio::test]
async fn zero_report_recompute_leaves_cache_untouched() {
    let db = test_db().await;
    let event = mk_event(&db).await;
    let team_id = mk_team(&db, event.id, 254).await;
    let recomputed = stats::recompute_team_stats(&db, team_id).await.unwrap();
    assert!(!recomputed);
    let row = db::team_stats::Entity::find()
        .filter(db::team_stats::Column::TeamId.eq(team_id))
        .one(&db)
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn match_stats_require_six_confirmed_reports() {
    let db = test_db().await;
    let scoring = ScoringConfig::default();
    let f = full_match_fixture(&db).await;
    let recomputed = stats::recompute_match_stats(&db, &scoring, &f.m).await.unwrap();
    assert!(!recomputed);
    let confirmer = mk_account(&db, "strategist").await;
    submit_and_confirm_all(&db, &scoring, &f, confirmer).await;
    let m = db::matches::Entity::find_by_id(f.m.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    let recomputed = stats::recompute_match_stats(&db, &scoring, &m).await.unwrap();
    assert!(recomputed);
    let row = db::match_stats::Entity::find()
        .filter(db::match_stats::Column::MatchId.eq(f.m.id))
        .one(&db)
        .await
        .unwrap()
        .expect("stats row exists");
    // Three identical reports per alliance.
    assert_eq!(row.red_total_auto_points, 24);
    assert_eq!(
        row.red_total_teleop_points,
        3 * 5 * scoring.teleop_piece_points
    );
    assert_eq!(row.red_total_endgame_points, 30);
    assert_eq!(row.red_predicted_score, 24 + 30 + 30);
    assert_eq!(row.blue_predicted_score, row.red_predicted_score);
}

#[tokio::test]
async fn offline_payload_round_trip_and_conflicts() {
    let db = test_db().await;
    let f = full_match_fixture(&db).await;

    // The first scouter is on position Red1 scouting the first team.
    let payload = offline::OfflinePayload {
        report_id: None,
        match_id: f.m.id,
        team_number: 100,
        scouter: "scout0".to_owned(),
        fields: some_fields(),
    };
    let scan = engine::process_offline(&db, &offline::encode(&payload))
        .await
        .unwrap();
    let engine::OfflineScan::Saved { report_id } = scan else {
        panic!("expected offline save, got {scan:?}");
    };
    let report = db::reports::Entity::find_by_id(report_id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert!(report.submitted_offline);
    assert_eq!(report.team_id, f.teams[0]);

    // The same payload re-exported from the saved report is a no-op.
    let rescan = offline::OfflinePayload {
        report_id: Some(report_id),
        ..payload.clone()
    };
    let scan = engine::process_offline(&db, &offline::encode(&rescan))
        .await
        .unwrap();
    assert_eq!(scan, engine::OfflineScan::AlreadyProcessed { report_id });

    // A different payload for the same slot is a conflict.
    let mut conflicting = payload.clone();
    conflicting.fields.overall_rating = 1;
    let scan = engine::process_offline(&db, &offline::encode(&conflicting))
        .await
        .unwrap();
    assert_eq!(
        scan,
        engine::OfflineScan::Rejected(engine::OfflineError::Conflict)
    );
}

#[tokio::test]
async fn offline_rejections_name_the_failure() {
    let db = test_db().await;
    let f = full_match_fixture(&db).await;
    let encode = |p: &offline::OfflinePayload| offline::encode(p);
    let base = offline::OfflinePayload {
        report_id: None,
        match_id: f.m.id,
        team_number: 100,
        scouter: "scout0".to_owned(),
        fields: ReportFields::default(),
    };

    let scan = engine::process_offline(&db, "!!!not-base64!!!").await.unwrap();
    assert_eq!(scan, engine::OfflineScan::Rejected(engine::OfflineError::Base64));

    let mut p = base.clone();
    p.match_id = 9999;
    assert_eq!(
        engine::process_offline(&db, &encode(&p)).await.unwrap(),
        engine::OfflineScan::Rejected(engine::OfflineError::UnknownMatch(9999))
    );

    let mut p = base.clone();
    p.team_number = 9999;
    assert_eq!(
        engine::process_offline(&db, &encode(&p)).await.unwrap(),
        engine::OfflineScan::Rejected(engine::OfflineError::UnknownTeam(9999))
    );

    let mut p = base.clone();
    p.scouter = "nobody".to_owned();
    assert_eq!(
        engine::process_offline(&db, &encode(&p)).await.unwrap(),
        engine::OfflineScan::Rejected(engine::OfflineError::UnknownScouter(
            "nobody".to_owned()
        ))
    );

    // Assigned to a different team than the payload claims.
    let mut p = base.clone();
    p.team_number = 101;
    assert_eq!(
        engine::process_offline(&db, &encode(&p)).await.unwrap(),
        engine::OfflineScan::Rejected(engine::OfflineError::NotAssigned)
    );
}

#[tokio::test]
async fn level_up_awards_a_single_achievement() {
    let db = test_db().await;
    let scoring = ScoringConfig::default();
    let account_id = mk_account(&db, "grinder").await;

    let level = gamify::add_experience(&db, &scoring, account_id, 95)
        .await
        .unwrap();
    assert_eq!(level, None);
    let level = gamify::add_experience(&db, &scoring, account_id, 10)
        .await
        .unwrap();
    assert_eq!(level, Some(2));

    let profile = db::profiles::Entity::find()
        .filter(db::profiles::Column::AccountId.eq(account_id))
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.experience_points, 105);
    assert_eq!(profile.level, 2);
    let achievements = db::achievements::Entity::find()
        .filter(db::achievements::Column::ProfileId.eq(profile.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].description, "Reached Level 2");

    // A jump over several levels still produces one achievement.
    let level = gamify::add_experience(&db, &scoring, account_id, 250)
        .await
        .unwrap();
    assert_eq!(level, Some(4));
    let achievements = db::achievements::Entity::find()
        .filter(db::achievements::Column::ProfileId.eq(profile.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(achievements.len(), 2);
}

#[tokio::test]
async fn metrics_sync_seeds_stats_for_unscouted_team() {
    let db = test_db().await;
    let scoring = ScoringConfig::default();
    let event = mk_event(&db).await;
    let team_id = mk_team(&db, event.id, 1323).await;

    let metrics = statbotics::TeamMetrics {
        epa: Some(30.0),
        win_rate: Some(0.5),
        rank: Some(4),
        ..Default::default()
    };
    engine::store_external_metrics(&db, team_id, &metrics, time::OffsetDateTime::now_utc())
        .await
        .expect("store metrics without prior reports");

    let row = db::team_stats::Entity::find()
        .filter(db::team_stats::Column::TeamId.eq(team_id))
        .one(&db)
        .await
        .unwrap()
        .expect("stats row created");
    assert_eq!(row.matches_scouted, 0);
    assert_eq!(row.epa, Some(30.0));
    assert_eq!(row.external_win_rate, Some(0.5));
    assert_eq!(row.external_rank, Some(4));
    assert_eq!(row.avg_overall_rating, 0.0);
    assert_eq!(row.reliability_score, 0.0);

    // With nothing scouted the ranking uses the external metric alone.
    let entries = stats::event_pick_list(&db, &scoring, event.id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].combined_score, 30.0);
}

#[tokio::test]
async fn analytics_views_require_an_account() {
    let db = test_db().await;
    let account_id = mk_account(&db, "viewer").await;

    let denied = roles::check(&db, Requester::Unauthenticated, Capability::ViewAnalytics).await;
    assert!(denied.is_err());

    let profile = roles::check(&db, Requester::Account(account_id), Capability::ViewAnalytics)
        .await
        .expect("any account may view analytics");
    assert_eq!(profile.account_id, account_id);
}

#[tokio::test]
async fn auto_assignment_needs_six_scouters() {
    let db = test_db().await;
    let f = full_match_fixture(&db).await;
    // The fixture created six scouters already; a fresh event with none
    // of its own still sees them, so build the shortage first.
    for account_id in &f.scouters[1..] {
        let profile = db::profiles::Entity::find()
            .filter(db::profiles::Column::AccountId.eq(*account_id))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut update: db::profiles::ActiveModel = profile.into();
        update.role = Set(db::profiles::Role::Strategist);
        sea_orm::ActiveModelTrait::update(update, &db).await.unwrap();
    }
    let outcome = engine::auto_assign_scouters(&db, &f.event).await.unwrap();
    assert_eq!(
        outcome,
        engine::AutoAssignOutcome::NotEnoughScouters { available: 1 }
    );

    for i in 0..5 {
        mk_account(&db, &format!("extra{i}")).await;
    }
    let outcome = engine::auto_assign_scouters(&db, &f.event).await.unwrap();
    assert_eq!(
        outcome,
        engine::AutoAssignOutcome::Assigned {
            matches_assigned: 1
        }
    );
    let assignments = db::assignments::Entity::find()
        .filter(db::assignments::Column::MatchId.eq(f.m.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(assignments.len(), 6);
    let accounts: std::collections::HashSet<i64> =
        assignments.iter().map(|a| a.account_id).collect();
    assert_eq!(accounts.len(), 6, "six distinct scouters");
    for a in &assignments {
        assert_eq!(a.team_id, a.position.team_id(&f.m));
    }
}
