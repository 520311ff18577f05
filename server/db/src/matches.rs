use sea_orm::entity::prelude::*;

use super::common::Winner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum MatchType {
    #[sea_orm(string_value = "QUAL")]
    Qual,
    #[sea_orm(string_value = "PLAYOFF")]
    Playoff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum Status {
    #[sea_orm(string_value = "UPCOMING")]
    Upcoming,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
}

// Unique on (event_id, match_number, match_type, comp_level, set_number);
// the index lives in the migration. `all_submitted` is orthogonal to
// `status`: it flips once six confirmed reports exist, which can happen
// before or after completion.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "matches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub event_id: i64,
    pub match_number: i32,
    pub match_type: MatchType,
    pub comp_level: String,
    pub set_number: i32,
    #[sea_orm(unique, indexed)]
    pub external_key: Option<String>,
    #[sea_orm(indexed)]
    pub scheduled_time: TimeDateTimeWithTimeZone,
    pub actual_time: Option<TimeDateTimeWithTimeZone>,
    pub predicted_time: Option<TimeDateTimeWithTimeZone>,
    pub red_1: i64,
    pub red_2: i64,
    pub red_3: i64,
    pub blue_1: i64,
    pub blue_2: i64,
    pub blue_3: i64,
    pub status: Status,
    pub all_submitted: bool,
    pub red_score: Option<i32>,
    pub blue_score: Option<i32>,
    pub winner: Option<Winner>,
}

impl Model {
    pub fn red_team_ids(&self) -> [i64; 3] {
        [self.red_1, self.red_2, self.red_3]
    }

    pub fn blue_team_ids(&self) -> [i64; 3] {
        [self.blue_1, self.blue_2, self.blue_3]
    }

    pub fn all_team_ids(&self) -> [i64; 6] {
        [
            self.red_1, self.red_2, self.red_3, self.blue_1, self.blue_2, self.blue_3,
        ]
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Events,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
    #[sea_orm(has_many = "super::predictions::Entity")]
    Predictions,
    #[sea_orm(has_one = "super::match_stats::Entity")]
    MatchStats,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl Related<super::predictions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Predictions.def()
    }
}

impl Related<super::match_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MatchStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
