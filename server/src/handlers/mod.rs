pub mod prelude;
pub mod tmpl_data;

pub mod get_event;
pub mod get_events;
pub mod get_export;
pub mod get_index;
pub mod get_leaderboard;
pub mod get_login;
pub mod get_logout;
pub mod get_match;
pub mod get_match_analytics;
pub mod get_match_reports;
pub mod get_offline_code;
pub mod get_pick_list;
pub mod get_scan_offline;
pub mod get_scouter_dashboard;
pub mod get_submit_report;
pub mod get_team_stats;
pub mod post_assign_scouters;
pub mod post_auto_assign;
pub mod post_complete_match;
pub mod post_confirm_report;
pub mod post_create_event;
pub mod post_login;
pub mod post_register;
pub mod post_scan_offline;
pub mod post_set_role;
pub mod post_start_match;
pub mod post_submit_prediction;
pub mod post_submit_report;
pub mod post_sync_metrics;
