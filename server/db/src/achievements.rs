use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
pub enum BadgeType {
    #[sea_orm(string_value = "LEVEL")]
    Level,
    #[sea_orm(string_value = "PREDICTION")]
    Prediction,
    #[sea_orm(string_value = "REPORTS")]
    Reports,
    #[sea_orm(string_value = "ACCURACY")]
    Accuracy,
}

// Append-only badge log. Rows are never updated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "achievements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(indexed)]
    pub profile_id: i64,
    pub badge_type: BadgeType,
    pub description: String,
    pub level_achieved: Option<i32>,
    #[sea_orm(indexed)]
    pub earned_time: TimeDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ProfileId",
        to = "super::profiles::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Profiles,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
