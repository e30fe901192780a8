use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock row. Rows are matched to menu items and count lines by name.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub quantity: Decimal,
    pub unit: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub min_threshold: Decimal,
    pub category: String,
}

impl Model {
    pub fn is_low_stock(&self) -> bool {
        self.quantity < self.min_threshold
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
