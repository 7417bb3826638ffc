use sea_orm::entity::prelude::*;

/// Record library track; only the columns the charts display are mapped
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rec_track")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub trackid: i32,
    pub recordid: i32,
    pub title: String,
    pub artist: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
