use sea_orm::entity::prelude::*;

use super::common::Alliance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum Position {
    #[sea_orm(string_value = "RED_1")]
    Red1,
    #[sea_orm(string_value = "RED_2")]
    Red2,
    #[sea_orm(string_value = "RED_3")]
    Red3,
    #[sea_orm(string_value = "BLUE_1")]
    Blue1,
    #[sea_orm(string_value = "BLUE_2")]
    Blue2,
    #[sea_orm(string_value = "BLUE_3")]
    Blue3,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Red1,
        Position::Red2,
        Position::Red3,
        Position::Blue1,
        Position::Blue2,
        Position::Blue3,
    ];

    pub fn alliance(self) -> Alliance {
        match self {
            Position::Red1 | Position::Red2 | Position::Red3 => Alliance::Red,
            Position::Blue1 | Position::Blue2 | Position::Blue3 => Alliance::Blue,
        }
    }

    // Team occupying this position in the given match.
    pub fn team_id(self, m: &super::matches::Model) -> i64 {
        match self {
            Position::Red1 => m.red_1,
            Position::Red2 => m.red_2,
            Position::Red3 => m.red_3,
            Position::Blue1 => m.blue_1,
            Position::Blue2 => m.blue_2,
            Position::Blue3 => m.blue_3,
        }
    }
}

// Unique on (match_id, position); the index lives in the migration.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub match_id: i64,
    #[sea_orm(indexed)]
    pub account_id: i64,
    pub position: Position,
    pub team_id: i64,
    pub assigned_time: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::matches::Entity",
        from = "Column::MatchId",
        to = "super::matches::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Matches,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Teams,
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matches.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
