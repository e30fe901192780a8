use crate::{
    db::{self, DbPool},
    entities::{
        inventory,
        inventory_count::{self, CountStatus},
        inventory_count_item,
    },
    errors::ServiceError,
    services::inventory as stock,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, LoaderTrait, ModelTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartCountRequest {
    pub comment: Option<String>,
    /// User performing the count
    pub performed_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct FinalizeCountRequest {
    /// Counted quantity per count item id
    #[schema(value_type = Object)]
    pub counted: HashMap<Uuid, Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountView {
    #[serde(flatten)]
    pub count: inventory_count::Model,
    pub items: Vec<inventory_count_item::Model>,
}

/// Difference between what was found on the shelf and what the books said
pub fn variance(expected: Decimal, counted: Decimal) -> Decimal {
    counted - expected
}

/// Physical stock takes
#[derive(Clone, Debug)]
pub struct InventoryCountService {
    db_pool: Arc<DbPool>,
}

impl InventoryCountService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Newest first, with items
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<CountView>, ServiceError> {
        let db = &*self.db_pool;
        let counts = inventory_count::Entity::find()
            .order_by_desc(inventory_count::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let items = counts
            .load_many(inventory_count_item::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(counts
            .into_iter()
            .zip(items)
            .map(|(count, items)| CountView { count, items })
            .collect())
    }

    /// Opens a count with one line per inventory row, expecting the current quantity.
    #[instrument(skip(self, request))]
    pub async fn start(&self, request: StartCountRequest) -> Result<CountView, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let count = inventory_count::ActiveModel {
            id: Set(Uuid::new_v4()),
            status: Set(CountStatus::InProgress),
            comment: Set(request.comment),
            performed_by_id: Set(request.performed_by),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let rows = inventory::Entity::find()
            .order_by_asc(inventory::Column::Name)
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let item = inventory_count_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                count_id: Set(count.id),
                item_name: Set(row.name),
                expected_qty: Set(row.quantity),
                counted_qty: Set(Decimal::ZERO),
                variance: Set(Decimal::ZERO),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
            items.push(item);
        }

        db::commit(txn, started).await?;
        info!(count_id = %count.id, items = items.len(), "inventory count started");
        Ok(CountView { count, items })
    }

    /// Records what was counted, overwrites live stock and closes the count.
    ///
    /// Every line of the count needs a counted quantity.
    #[instrument(skip(self, request))]
    pub async fn finalize(
        &self,
        id: Uuid,
        request: FinalizeCountRequest,
    ) -> Result<CountView, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let count = inventory_count::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Inventory count", id))?;
        let lines = count
            .find_related(inventory_count_item::Entity)
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let counted = *request.counted.get(&line.id).ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Missing counted quantity for {}",
                    line.item_name
                ))
            })?;

            stock::set_stock(&txn, &line.item_name, counted).await?;

            let expected = line.expected_qty;
            let mut active: inventory_count_item::ActiveModel = line.into();
            active.counted_qty = Set(counted);
            active.variance = Set(variance(expected, counted));
            items.push(active.update(&txn).await.map_err(ServiceError::db_error)?);
        }

        let mut active: inventory_count::ActiveModel = count.into();
        active.status = Set(CountStatus::Completed);
        let count = active.update(&txn).await.map_err(ServiceError::db_error)?;

        db::commit(txn, started).await?;
        info!(count_id = %id, items = items.len(), "inventory count finalized");
        Ok(CountView { count, items })
    }
}
