pub mod prelude;

pub mod accounts;
pub mod achievements;
pub mod assignments;
pub mod common;
pub mod events;
pub mod match_stats;
pub mod matches;
pub mod predictions;
pub mod profiles;
pub mod reports;
pub mod team_stats;
pub mod teams;
