use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "uryplayer", table_name = "podcast")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub podcast_id: i32,
    pub file: String,
    pub memberid: i32,
    pub submitted: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
