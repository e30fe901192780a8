use crate::{
    db::{self, DbPool},
    entities::{inventory, menu_item, notification::NotificationType},
    errors::ServiceError,
    repositories::EntityRepository,
    services::notifications,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Unit given to rows created from purchase-order receipts
pub const DEFAULT_UNIT: &str = "units";
/// Reorder threshold given to rows created from purchase-order receipts
pub const DEFAULT_MIN_THRESHOLD: Decimal = dec!(10);
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInventoryRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[schema(value_type = f64)]
    pub quantity: Decimal,
    #[validate(length(min = 1, message = "unit is required"))]
    pub unit: String,
    #[schema(value_type = f64)]
    pub min_threshold: Decimal,
    pub category: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventoryRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub quantity: Option<Decimal>,
    #[validate(length(min = 1))]
    pub unit: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub min_threshold: Option<Decimal>,
    pub category: Option<String>,
}

impl UpdateInventoryRequest {
    fn apply(self, active: &mut inventory::ActiveModel) {
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(quantity) = self.quantity {
            active.quantity = Set(quantity);
        }
        if let Some(unit) = self.unit {
            active.unit = Set(unit);
        }
        if let Some(min_threshold) = self.min_threshold {
            active.min_threshold = Set(min_threshold);
        }
        if let Some(category) = self.category {
            active.category = Set(category);
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkInventoryItem {
    pub id: i32,
    #[serde(flatten)]
    #[validate]
    pub changes: UpdateInventoryRequest,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkUpdateRequest {
    #[validate]
    pub items: Vec<BulkInventoryItem>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkUpdateResult {
    pub updated: usize,
}

pub fn low_stock_message(item: &inventory::Model) -> String {
    format!("Low stock: {} ({})", item.name, item.quantity.normalize())
}

async fn find_by_name<C>(db: &C, name: &str) -> Result<Option<inventory::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    inventory::Entity::find()
        .filter(inventory::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(ServiceError::db_error)
}

/// Adds `quantity` of `item` to the stock row carrying the item's name,
/// creating the row when the item has never been stocked.
pub async fn add_stock<C>(
    db: &C,
    item: &menu_item::Model,
    quantity: Decimal,
) -> Result<inventory::Model, ServiceError>
where
    C: ConnectionTrait,
{
    match find_by_name(db, &item.name).await? {
        Some(row) => {
            let new_quantity = row.quantity + quantity;
            let mut active: inventory::ActiveModel = row.into();
            active.quantity = Set(new_quantity);
            debug!(name = %item.name, %new_quantity, "stock increased");
            active.update(db).await.map_err(ServiceError::db_error)
        }
        None => {
            debug!(name = %item.name, %quantity, "stock row created");
            inventory::ActiveModel {
                name: Set(item.name.clone()),
                quantity: Set(quantity),
                unit: Set(DEFAULT_UNIT.to_string()),
                min_threshold: Set(DEFAULT_MIN_THRESHOLD),
                category: Set(item.category.clone()),
                ..Default::default()
            }
            .insert(db)
            .await
            .map_err(ServiceError::db_error)
        }
    }
}

/// Subtracts `quantity` from the row named `name`. Returns `None` when no such row exists.
pub async fn remove_stock<C>(
    db: &C,
    name: &str,
    quantity: Decimal,
) -> Result<Option<inventory::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    let Some(row) = find_by_name(db, name).await? else {
        warn!(%name, "no stock row to decrement");
        return Ok(None);
    };
    let new_quantity = row.quantity - quantity;
    let mut active: inventory::ActiveModel = row.into();
    active.quantity = Set(new_quantity);
    let updated = active.update(db).await.map_err(ServiceError::db_error)?;
    Ok(Some(updated))
}

/// Overwrites the quantity of the row named `name`, if there is one.
pub async fn set_stock<C>(
    db: &C,
    name: &str,
    quantity: Decimal,
) -> Result<Option<inventory::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    let Some(row) = find_by_name(db, name).await? else {
        return Ok(None);
    };
    let mut active: inventory::ActiveModel = row.into();
    active.quantity = Set(quantity);
    let updated = active.update(db).await.map_err(ServiceError::db_error)?;
    Ok(Some(updated))
}

/// Stock levels
#[derive(Clone, Debug)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<inventory::Entity>,
}

impl InventoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Inventory item"),
            db_pool,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<inventory::Model>, ServiceError> {
        inventory::Entity::find()
            .order_by_asc(inventory::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<inventory::Model, ServiceError> {
        self.repo.get(id).await
    }

    /// Rows whose quantity has dropped below their reorder threshold
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<inventory::Model>, ServiceError> {
        inventory::Entity::find()
            .filter(
                Expr::col(inventory::Column::Quantity).lt(Expr::col(inventory::Column::MinThreshold)),
            )
            .order_by_asc(inventory::Column::Name)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateInventoryRequest,
    ) -> Result<inventory::Model, ServiceError> {
        let created = self
            .repo
            .insert(inventory::ActiveModel {
                name: Set(request.name),
                quantity: Set(request.quantity),
                unit: Set(request.unit),
                min_threshold: Set(request.min_threshold),
                category: Set(request
                    .category
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
                ..Default::default()
            })
            .await?;
        info!(inventory_id = created.id, "inventory item created");
        Ok(created)
    }

    /// Field merge. Raises a low-stock warning when the row ends up below threshold.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateInventoryRequest,
    ) -> Result<inventory::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let mut active: inventory::ActiveModel = existing.into();
        request.apply(&mut active);
        let updated = self.repo.update(active).await?;

        if updated.is_low_stock() {
            notifications::record(
                &*self.db_pool,
                NotificationType::Warning,
                low_stock_message(&updated),
            )
            .await?;
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        info!(inventory_id = id, "inventory item deleted");
        Ok(())
    }

    /// Applies each change to its row; unknown ids are skipped.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn bulk_update(
        &self,
        request: BulkUpdateRequest,
    ) -> Result<BulkUpdateResult, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let mut updated = 0;
        for item in request.items {
            let Some(row) = inventory::Entity::find_by_id(item.id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
            else {
                debug!(inventory_id = item.id, "skipping unknown inventory row");
                continue;
            };
            let mut active: inventory::ActiveModel = row.into();
            item.changes.apply(&mut active);
            active.update(&txn).await.map_err(ServiceError::db_error)?;
            updated += 1;
        }

        db::commit(txn, started).await?;
        info!(updated, "inventory bulk update");
        Ok(BulkUpdateResult { updated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_stock_message_drops_trailing_zeros() {
        let item = inventory::Model {
            id: 1,
            name: "Tomatoes".into(),
            quantity: dec!(3.00),
            unit: "kg".into(),
            min_threshold: dec!(5),
            category: "Produce".into(),
        };
        assert!(item.is_low_stock());
        assert_eq!(low_stock_message(&item), "Low stock: Tomatoes (3)");
    }
}
