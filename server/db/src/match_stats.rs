use sea_orm::entity::prelude::*;

// Derived cache, recomputed only once six confirmed reports exist.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "match_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique, indexed)]
    pub match_id: i64,

    pub red_total_auto_points: i32,
    pub red_total_teleop_points: i32,
    pub red_total_endgame_points: i32,
    pub red_predicted_score: i32,

    pub blue_total_auto_points: i32,
    pub blue_total_teleop_points: i32,
    pub blue_total_endgame_points: i32,
    pub blue_predicted_score: i32,

    pub calculated_time: TimeDateTimeWithTimeZone,
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
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
