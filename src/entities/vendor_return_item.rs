use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_return_items")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub vendor_return_id: Uuid,
    pub item_name: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendor_return::Entity",
        from = "Column::VendorReturnId",
        to = "super::vendor_return::Column::Id",
        on_delete = "Cascade"
    )]
    VendorReturn,
}

impl Related<super::vendor_return::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorReturn.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
