use sea_orm::entity::prelude::*;

/// Academic terms; lives in the public schema
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "terms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub termid: i32,
    pub start: DateTimeWithTimeZone,
    pub finish: DateTimeWithTimeZone,
    pub descr: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
