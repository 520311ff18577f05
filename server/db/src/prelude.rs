pub use super::accounts::Entity as Accounts;
pub use super::achievements::Entity as Achievements;
pub use super::assignments::Entity as Assignments;
pub use super::events::Entity as Events;
pub use super::match_stats::Entity as MatchStats;
pub use super::matches::Entity as Matches;
pub use super::predictions::Entity as Predictions;
pub use super::profiles::Entity as Profiles;
pub use super::reports::Entity as Reports;
pub use super::team_stats::Entity as TeamStats;
pub use super::teams::Entity as Teams;
