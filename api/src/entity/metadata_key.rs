use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "metadata", table_name = "metadata_key")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub metadata_key_id: i32,
    pub name: String,
    pub description: String,
    pub allow_multiple: Option<bool>,
    pub cache_duration: Option<i32>,
    pub searchable: bool,
    pub plural: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
