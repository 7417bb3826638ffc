use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "music", table_name = "chart_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub chart_type_id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::chart_release::Entity")]
    ChartRelease,
}

impl Related<super::chart_release::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartRelease.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
