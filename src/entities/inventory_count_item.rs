use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_count_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub count_id: Uuid,
    pub item_name: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub expected_qty: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub counted_qty: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub variance: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_count::Entity",
        from = "Column::CountId",
        to = "super::inventory_count::Column::Id",
        on_delete = "Cascade"
    )]
    Count,
}

impl Related<super::inventory_count::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Count.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
