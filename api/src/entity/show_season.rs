use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "schedule", table_name = "show_season")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub show_season_id: i32,
    pub show_id: i32,
    pub termid: Option<i32>,
    pub memberid: i32,
    pub submitted: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::show::Entity",
        from = "Column::ShowId",
        to = "super::show::Column::ShowId"
    )]
    Show,
    #[sea_orm(
        belongs_to = "super::terms::Entity",
        from = "Column::Termid",
        to = "super::terms::Column::Termid"
    )]
    Term,
}

impl Related<super::show::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Show.def()
    }
}

impl Related<super::terms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Term.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
