use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub event_code: String,
    pub location: String,
    pub start_date: TimeDate,
    pub end_date: TimeDate,
    // Schedule-provider key, e.g. "2025casj". Absent for hand-created events.
    #[sea_orm(unique, indexed)]
    pub external_key: Option<String>,
    pub week: Option<i32>,
    pub event_type: Option<i32>,
    pub event_type_string: String,
    pub auto_rotation_enabled: bool,
    pub rotation_interval: i32,
    pub creation_time: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::teams::Entity")]
    Teams,
    #[sea_orm(has_many = "super::matches::Entity")]
    Matches,
}

impl Related<super::teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teams.def()
    }
}

impl Related<super::matches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
