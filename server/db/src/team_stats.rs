use sea_orm::entity::prelude::*;

// Derived cache, fully recomputed from confirmed reports. The
// externally-sourced predictive fields are refreshed independently by
// the metrics sync and survive aggregate recomputation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "team_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique, indexed)]
    pub team_id: i64,

    pub avg_auto_pieces: f64,
    pub avg_auto_points: f64,
    pub auto_mobility_rate: f64,

    pub avg_teleop_pieces: f64,
    pub avg_defense_rating: f64,
    pub avg_speed_rating: f64,

    pub climb_success_rate: f64,
    pub avg_endgame_points: f64,

    pub avg_overall_rating: f64,
    // 100 - disable_rate*50 - mean_fouls*5, intentionally unclamped.
    pub reliability_score: f64,

    pub epa: Option<f64>,
    pub auto_epa: Option<f64>,
    pub teleop_epa: Option<f64>,
    pub endgame_epa: Option<f64>,
    pub external_win_rate: Option<f64>,
    pub external_rank: Option<i32>,
    pub metrics_update_time: Option<TimeDateTimeWithTimeZone>,

    pub matches_scouted: i64,
    pub update_time: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teams::Entity",
        from = "Column::TeamId",
        to = "super::teams::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Teams,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
