use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "schedule", table_name = "show")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub show_id: i32,
    pub show_type_id: i32,
    pub memberid: i32,
    pub submitted: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::show_type::Entity",
        from = "Column::ShowTypeId",
        to = "super::show_type::Column::ShowTypeId"
    )]
    ShowType,
    #[sea_orm(has_many = "super::show_season::Entity")]
    ShowSeason,
}

impl Related<super::show_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowType.def()
    }
}

impl Related<super::show_season::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShowSeason.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
