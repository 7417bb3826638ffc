use sea_orm::entity::prelude::*;

/// Studio messages shown to presenters in SIS
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "sis2", table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub commid: i32,
    pub commtypeid: i32,
    pub sender: String,
    pub timeslotid: i32,
    pub subject: String,
    pub content: String,
    pub date: DateTimeWithTimeZone,
    pub statusid: i32,
    pub comm_source: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
