use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "music", table_name = "chart_row")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub chart_row_id: i32,
    pub chart_release_id: i32,
    pub position: i16,
    pub trackid: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chart_release::Entity",
        from = "Column::ChartReleaseId",
        to = "super::chart_release::Column::ChartReleaseId"
    )]
    ChartRelease,
    #[sea_orm(
        belongs_to = "super::rec_track::Entity",
        from = "Column::Trackid",
        to = "super::rec_track::Column::Trackid"
    )]
    Track,
}

impl Related<super::chart_release::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartRelease.def()
    }
}

impl Related<super::rec_track::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Track.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
