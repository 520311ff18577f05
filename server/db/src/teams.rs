use sea_orm::entity::prelude::*;

// Unique on (team_number, event_id); the index lives in the migration.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub team_number: i32,
    #[sea_orm(indexed)]
    pub event_id: i64,
    pub name: String,
    pub nickname: String,
    pub city: String,
    pub state_prov: String,
    pub country: String,
    pub rookie_year: Option<i32>,
    // Cached predictive metrics, refreshed by the metrics sync.
    pub epa: Option<f64>,
    pub win_rate: Option<f64>,
    pub metrics_update_time: Option<TimeDateTimeWithTimeZone>,
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
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
    #[sea_orm(has_many = "super::team_stats::Entity")]
    TeamStats,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl Related<super::team_stats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamStats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
