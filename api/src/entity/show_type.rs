use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "schedule", table_name = "show_type")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub show_type_id: i32,
    pub name: String,
    pub description: String,
    pub public: Option<bool>,
    pub has_showdb_entry: Option<bool>,
    pub is_collapsible: Option<bool>,
    pub can_be_messaged: Option<bool>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::show::Entity")]
    Show,
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Show.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
