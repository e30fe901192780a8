//! Purchase orders and vendor returns.
//!
//! Line and order totals are recomputed on every write: each line is
//! `quantity * price`, the subtotal sums the lines, tax is the VAT share of
//! the subtotal and the total adds both. Receiving goods and completing an
//! order feed stock into inventory by menu-item name; vendor returns take
//! it back out.

use crate::{
    db::{self, DbPool},
    entities::{
        menu_item,
        purchase_order::{self, PurchaseOrderStatus},
        purchase_order_item, supplier, vendor_return, vendor_return_item,
    },
    errors::ServiceError,
    repositories::EntityRepository,
    services::inventory,
};
use rust_decimal::{prelude::FromPrimitive, Decimal};
use rust_decimal_macros::dec;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    LoaderTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_VAT_RATE: Decimal = dec!(0.16);

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("must not be negative"));
    }
    Ok(())
}

fn positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(ValidationError::new("must be positive"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLineRequest {
    /// Menu item being restocked
    pub id: i32,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom = "non_negative")]
    #[schema(value_type = f64)]
    pub price: Decimal,
}

/// Body of both create and update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderRequest {
    pub supplier_id: Uuid,
    #[serde(default)]
    #[validate]
    pub items: Vec<PurchaseOrderLineRequest>,
    pub notes: Option<String>,
    pub status: Option<PurchaseOrderStatus>,
    pub created_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    pub status: PurchaseOrderStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReceiveRequest {
    /// Quantity received per purchase-order line id
    #[serde(default)]
    #[schema(value_type = Object)]
    pub received: HashMap<Uuid, i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorReturnLineRequest {
    #[validate(length(min = 1, message = "itemName is required"))]
    pub item_name: String,
    #[validate(custom = "positive")]
    #[schema(value_type = f64)]
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VendorReturnRequest {
    #[serde(default)]
    #[validate]
    pub items: Vec<VendorReturnLineRequest>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLineView {
    #[serde(flatten)]
    pub item: purchase_order_item::Model,
    pub menu_item: Option<menu_item::Model>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderView {
    #[serde(flatten)]
    pub order: purchase_order::Model,
    pub supplier: Option<supplier::Model>,
    pub items: Vec<PurchaseOrderLineView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorReturnView {
    #[serde(flatten)]
    pub vendor_return: vendor_return::Model,
    pub supplier: Option<supplier::Model>,
    pub items: Vec<vendor_return_item::Model>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

pub fn line_total(quantity: i32, price: Decimal) -> Decimal {
    (Decimal::from(quantity) * price).round_dp(2)
}

pub fn totals<I>(line_totals: I, vat_rate: Decimal) -> Totals
where
    I: IntoIterator<Item = Decimal>,
{
    let subtotal = line_totals.into_iter().sum::<Decimal>().round_dp(2);
    let tax = (subtotal * vat_rate).round_dp(2);
    Totals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

/// Status after a receipt: complete once every line has all its goods.
pub fn receipt_status(lines: &[purchase_order_item::Model]) -> PurchaseOrderStatus {
    if lines.iter().all(|line| line.is_fully_received()) {
        PurchaseOrderStatus::Completed
    } else {
        PurchaseOrderStatus::PartiallyReceived
    }
}

/// Purchasing from suppliers
#[derive(Clone, Debug)]
pub struct ProcurementService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<purchase_order::Entity>,
    vat_rate: Decimal,
}

impl ProcurementService {
    pub fn new(db_pool: Arc<DbPool>, vat_rate: f64) -> Self {
        let vat_rate = Decimal::from_f64(vat_rate)
            .map(|rate| rate.round_dp(4))
            .unwrap_or(DEFAULT_VAT_RATE);
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Purchase order"),
            db_pool,
            vat_rate,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<PurchaseOrderView>, ServiceError> {
        let orders = purchase_order::Entity::find()
            .order_by_desc(purchase_order::Column::CreatedAt)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        self.hydrate(orders).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<PurchaseOrderView, ServiceError> {
        let order = self.repo.get(id).await?;
        self.hydrate(vec![order])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::not_found("Purchase order", id))
    }

    async fn hydrate(
        &self,
        orders: Vec<purchase_order::Model>,
    ) -> Result<Vec<PurchaseOrderView>, ServiceError> {
        let db = &*self.db_pool;
        let suppliers = orders
            .load_one(supplier::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;
        let lines = orders
            .load_many(purchase_order_item::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;

        let menu_ids: Vec<i32> = lines.iter().flatten().map(|l| l.menu_item_id).collect();
        let menu: HashMap<i32, menu_item::Model> = menu_item::Entity::find()
            .filter(menu_item::Column::Id.is_in(menu_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(orders
            .into_iter()
            .zip(suppliers)
            .zip(lines)
            .map(|((order, supplier), lines)| PurchaseOrderView {
                order,
                supplier,
                items: lines
                    .into_iter()
                    .map(|item| PurchaseOrderLineView {
                        menu_item: menu.get(&item.menu_item_id).cloned(),
                        item,
                    })
                    .collect(),
            })
            .collect())
    }

    /// Checks the supplier and every menu item, then writes fresh lines for
    /// `order_id` and returns the recomputed totals.
    async fn write_lines(
        &self,
        txn: &DatabaseTransaction,
        order_id: Uuid,
        lines: &[PurchaseOrderLineRequest],
    ) -> Result<Totals, ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one item is required".to_string(),
            ));
        }

        let mut line_totals = Vec::with_capacity(lines.len());
        for line in lines {
            find_menu_item(txn, line.id).await?;
            let total = line_total(line.quantity, line.price);
            purchase_order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                purchase_order_id: Set(order_id),
                menu_item_id: Set(line.id),
                quantity: Set(line.quantity),
                price: Set(line.price.round_dp(2)),
                total: Set(total),
                received_qty: Set(0),
            }
            .insert(txn)
            .await
            .map_err(ServiceError::db_error)?;
            line_totals.push(total);
        }
        Ok(totals(line_totals, self.vat_rate))
    }

    #[instrument(skip(self, request), fields(supplier_id = %request.supplier_id))]
    pub async fn create(
        &self,
        request: PurchaseOrderRequest,
    ) -> Result<PurchaseOrderView, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;
        find_supplier(&txn, request.supplier_id).await?;

        let id = Uuid::new_v4();
        let now = chrono::Utc::now();
        purchase_order::ActiveModel {
            id: Set(id),
            supplier_id: Set(request.supplier_id),
            order_date: Set(now),
            status: Set(request.status.unwrap_or(PurchaseOrderStatus::Draft)),
            subtotal: Set(Decimal::ZERO),
            tax: Set(Decimal::ZERO),
            total: Set(Decimal::ZERO),
            notes: Set(request.notes),
            created_by_id: Set(request.created_by),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let totals = self.write_lines(&txn, id, &request.items).await?;
        set_totals(&txn, id, totals).await?;

        db::commit(txn, started).await?;
        info!(purchase_order_id = %id, total = %totals.total, "purchase order created");
        self.get(id).await
    }

    /// Replaces supplier, notes and every line; status changes only when given.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: Uuid,
        request: PurchaseOrderRequest,
    ) -> Result<PurchaseOrderView, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;
        let existing = find_order(&txn, id).await?;
        find_supplier(&txn, request.supplier_id).await?;

        purchase_order_item::Entity::delete_many()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(id))
            .exec(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        let totals = self.write_lines(&txn, id, &request.items).await?;

        let mut active: purchase_order::ActiveModel = existing.into();
        active.supplier_id = Set(request.supplier_id);
        active.notes = Set(request.notes);
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        active.subtotal = Set(totals.subtotal);
        active.tax = Set(totals.tax);
        active.total = Set(totals.total);
        active.update(&txn).await.map_err(ServiceError::db_error)?;

        db::commit(txn, started).await?;
        info!(purchase_order_id = %id, "purchase order updated");
        self.get(id).await
    }

    /// Sets any status. Completing an order stocks every line in full.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: Uuid,
        status: PurchaseOrderStatus,
    ) -> Result<purchase_order::Model, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;
        let existing = find_order(&txn, id).await?;

        if status == PurchaseOrderStatus::Completed
            && existing.status != PurchaseOrderStatus::Completed
        {
            let lines = find_lines(&txn, id).await?;
            for line in &lines {
                let item = find_menu_item(&txn, line.menu_item_id).await?;
                inventory::add_stock(&txn, &item, Decimal::from(line.quantity)).await?;
            }
            info!(purchase_order_id = %id, lines = lines.len(), "purchase order stocked");
        }

        let previous = existing.status;
        let mut active: purchase_order::ActiveModel = existing.into();
        active.status = Set(status);
        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        db::commit(txn, started).await?;
        info!(purchase_order_id = %id, from = ?previous, to = ?status, "purchase order status changed");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn approve(&self, id: Uuid) -> Result<purchase_order::Model, ServiceError> {
        self.decide(id, PurchaseOrderStatus::Approved, "approved")
            .await
    }

    #[instrument(skip(self))]
    pub async fn reject(&self, id: Uuid) -> Result<purchase_order::Model, ServiceError> {
        self.decide(id, PurchaseOrderStatus::Rejected, "rejected")
            .await
    }

    async fn decide(
        &self,
        id: Uuid,
        outcome: PurchaseOrderStatus,
        verb: &str,
    ) -> Result<purchase_order::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        if existing.status != PurchaseOrderStatus::PendingApproval {
            return Err(ServiceError::InvalidOperation(format!(
                "Only POs pending approval can be {}.",
                verb
            )));
        }
        let mut active: purchase_order::ActiveModel = existing.into();
        active.status = Set(outcome);
        let updated = self.repo.update(active).await?;
        info!(purchase_order_id = %id, status = ?outcome, "purchase order decided");
        Ok(updated)
    }

    /// Books received quantities against lines and stocks them.
    #[instrument(skip(self, request))]
    pub async fn receive(
        &self,
        id: Uuid,
        request: ReceiveRequest,
    ) -> Result<PurchaseOrderView, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;
        let existing = find_order(&txn, id).await?;

        let mut lines = find_lines(&txn, id).await?;
        for line in lines.iter_mut() {
            let quantity = request.received.get(&line.id).copied().unwrap_or(0);
            if quantity <= 0 {
                continue;
            }
            let item = find_menu_item(&txn, line.menu_item_id).await?;
            inventory::add_stock(&txn, &item, Decimal::from(quantity)).await?;

            let mut active: purchase_order_item::ActiveModel = line.clone().into();
            active.received_qty = Set(line.received_qty + quantity);
            *line = active.update(&txn).await.map_err(ServiceError::db_error)?;
        }

        let unknown = request
            .received
            .keys()
            .filter(|key| !lines.iter().any(|line| line.id == **key))
            .count();
        if unknown > 0 {
            warn!(purchase_order_id = %id, unknown, "receipt names lines outside this order");
        }

        let status = receipt_status(&lines);
        let mut active: purchase_order::ActiveModel = existing.into();
        active.status = Set(status);
        active.update(&txn).await.map_err(ServiceError::db_error)?;

        db::commit(txn, started).await?;
        info!(purchase_order_id = %id, status = ?status, "goods received");
        self.get(id).await
    }

    /// Records goods sent back to the supplier and takes them out of stock.
    #[instrument(skip(self, request))]
    pub async fn create_vendor_return(
        &self,
        id: Uuid,
        request: VendorReturnRequest,
    ) -> Result<VendorReturnView, ServiceError> {
        let order = self.repo.get(id).await?;
        if request.items.is_empty() {
            return Err(ServiceError::ValidationError("No items to return".to_string()));
        }

        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let return_id = Uuid::new_v4();
        vendor_return::ActiveModel {
            id: Set(return_id),
            purchase_order_id: Set(order.id),
            supplier_id: Set(order.supplier_id),
            reason: Set(request.reason),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        for line in request.items {
            vendor_return_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                vendor_return_id: Set(return_id),
                item_name: Set(line.item_name.clone()),
                quantity: Set(line.quantity),
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
            inventory::remove_stock(&txn, &line.item_name, line.quantity).await?;
        }

        db::commit(txn, started).await?;
        info!(purchase_order_id = %id, vendor_return_id = %return_id, "vendor return recorded");

        self.vendor_returns(id)
            .await?
            .into_iter()
            .find(|view| view.vendor_return.id == return_id)
            .ok_or_else(|| ServiceError::not_found("Vendor return", return_id))
    }

    #[instrument(skip(self))]
    pub async fn vendor_returns(&self, id: Uuid) -> Result<Vec<VendorReturnView>, ServiceError> {
        let db = &*self.db_pool;
        let returns = vendor_return::Entity::find()
            .filter(vendor_return::Column::PurchaseOrderId.eq(id))
            .order_by_desc(vendor_return::Column::CreatedAt)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let items = returns
            .load_many(vendor_return_item::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;
        let suppliers = returns
            .load_one(supplier::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(returns
            .into_iter()
            .zip(items)
            .zip(suppliers)
            .map(|((vendor_return, items), supplier)| VendorReturnView {
                vendor_return,
                supplier,
                items,
            })
            .collect())
    }
}

async fn find_order<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<purchase_order::Model, ServiceError> {
    purchase_order::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found("Purchase order", id))
}

async fn find_supplier<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<supplier::Model, ServiceError> {
    supplier::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found("Supplier", id))
}

async fn find_menu_item<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<menu_item::Model, ServiceError> {
    menu_item::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found("Menu item", id))
}

async fn find_lines<C: ConnectionTrait>(
    db: &C,
    order_id: Uuid,
) -> Result<Vec<purchase_order_item::Model>, ServiceError> {
    purchase_order_item::Entity::find()
        .filter(purchase_order_item::Column::PurchaseOrderId.eq(order_id))
        .all(db)
        .await
        .map_err(ServiceError::db_error)
}

async fn set_totals<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    totals: Totals,
) -> Result<(), ServiceError> {
    purchase_order::ActiveModel {
        id: Set(id),
        subtotal: Set(totals.subtotal),
        tax: Set(totals.tax),
        total: Set(totals.total),
        ..Default::default()
    }
    .update(db)
    .await
    .map_err(ServiceError::db_error)?;
    Ok(())
}
