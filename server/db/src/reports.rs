use sea_orm::entity::prelude::*;

// One submission per (match_id, account_id, team_id); the unique index
// lives in the migration and the engine re-checks before every insert.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub assignment_id: i64,
    #[sea_orm(indexed)]
    pub match_id: i64,
    #[sea_orm(indexed)]
    pub account_id: i64,
    #[sea_orm(indexed)]
    pub team_id: i64,

    pub pre_match_notes: String,
    pub starting_position: String,

    pub auto_mobility: bool,
    pub auto_pieces_scored: i32,
    pub auto_pieces_missed: i32,
    pub auto_points_estimate: i32,
    pub auto_notes: String,

    pub teleop_pieces_scored: i32,
    pub teleop_pieces_missed: i32,
    pub teleop_defense_rating: i32,
    pub teleop_speed_rating: i32,
    pub teleop_notes: String,

    pub endgame_climb_attempted: bool,
    pub endgame_climb_success: bool,
    pub endgame_park: bool,
    pub endgame_points_estimate: i32,
    pub endgame_notes: String,

    pub robot_disabled: bool,
    pub robot_tippy: bool,
    pub fouls_committed: i32,
    pub overall_rating: i32,
    pub post_match_notes: String,

    #[sea_orm(indexed)]
    pub submitted_time: TimeDateTimeWithTimeZone,
    pub submitted_offline: bool,
    #[sea_orm(indexed)]
    pub confirmed: bool,
    pub confirmed_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Assignments,
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
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
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

impl ActiveModelBehavior for ActiveModel {}
