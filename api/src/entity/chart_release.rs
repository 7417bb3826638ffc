use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(schema_name = "music", table_name = "chart_release")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub chart_release_id: i32,
    pub chart_type_id: i32,
    pub submitted: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::chart_type::Entity",
        from = "Column::ChartTypeId",
        to = "super::chart_type::Column::ChartTypeId"
    )]
    ChartType,
    #[sea_orm(has_many = "super::chart_row::Entity")]
    ChartRow,
}

impl Related<super::chart_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartType.def()
    }
}

impl Related<super::chart_row::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChartRow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
