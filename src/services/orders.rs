use crate::{
    config::HotelConfig,
    db::{self, DbPool},
    entities::{
        menu_item,
        notification::NotificationType,
        order::{self, OrderStatus, OrderType},
        order_item, payment, room, user,
    },
    errors::ServiceError,
    repositories::EntityRepository,
    services::notifications,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, LoaderTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc, time::Instant};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;
use validator::Validate;

pub const DEFAULT_LOCATION: &str = "indoor";

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineRequest {
    pub menu_item_id: i32,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub room_id: Option<i32>,
    /// Staff user who took the order
    pub created_by: Option<i32>,
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub status: Option<OrderStatus>,
    pub location: Option<String>,
    #[serde(default)]
    #[validate]
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(rename = "type")]
    pub order_type: Option<OrderType>,
    pub room_id: Option<i32>,
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub status: Option<OrderStatus>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
    #[serde(flatten)]
    pub item: order_item::Model,
    pub menu_item: Option<menu_item::Model>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<OrderLineView>,
    pub payments: Vec<payment::Model>,
    pub room: Option<room::Model>,
    pub created_by: Option<user::Model>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiptHotel {
    pub name: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiptLine {
    pub name: Option<String>,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptOrder {
    pub id: i32,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Room number for room orders
    pub room: Option<String>,
    pub table_number: Option<String>,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub staff: String,
    pub items: Vec<ReceiptLine>,
    #[schema(value_type = f64)]
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub hotel: ReceiptHotel,
    pub order: ReceiptOrder,
    #[schema(value_type = Vec<Object>)]
    pub payments: Vec<payment::Model>,
    pub thank_you: String,
}

pub fn order_placed_message(table_number: Option<&str>, customer_name: Option<&str>) -> String {
    format!(
        "New order placed: Table {} by {}",
        table_number.filter(|t| !t.is_empty()).unwrap_or("-"),
        customer_name.filter(|c| !c.is_empty()).unwrap_or("Guest")
    )
}

fn subtotal(lines: &[ReceiptLine]) -> Decimal {
    lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum::<Decimal>()
        .round_dp(2)
}

/// Restaurant, room and takeaway orders
#[derive(Clone, Debug)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<order::Entity>,
    hotel: HotelConfig,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>, hotel: HotelConfig) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Order"),
            db_pool,
            hotel,
        }
    }

    /// Newest first, with lines, payments, room and staff
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<OrderView>, ServiceError> {
        let orders = order::Entity::find()
            .order_by_desc(order::Column::CreatedAt)
            .order_by_desc(order::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        self.hydrate(orders).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<OrderView, ServiceError> {
        let order = self.repo.get(id).await?;
        let mut views = self.hydrate(vec![order]).await?;
        views
            .pop()
            .ok_or_else(|| ServiceError::not_found("Order", id))
    }

    async fn hydrate(&self, orders: Vec<order::Model>) -> Result<Vec<OrderView>, ServiceError> {
        let db = &*self.db_pool;
        let items = orders
            .load_many(order_item::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;
        let payments = orders
            .load_many(payment::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;
        let rooms = orders
            .load_one(room::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;
        let staff = orders
            .load_one(user::Entity, db)
            .await
            .map_err(ServiceError::db_error)?;

        let menu_ids: Vec<i32> = items.iter().flatten().map(|i| i.menu_item_id).collect();
        let menu = menu_items_by_id(db, menu_ids).await?;

        Ok(orders
            .into_iter()
            .zip(items)
            .zip(payments)
            .zip(rooms)
            .zip(staff)
            .map(|((((order, items), payments), room), created_by)| OrderView {
                order,
                items: items
                    .into_iter()
                    .map(|item| OrderLineView {
                        menu_item: menu.get(&item.menu_item_id).cloned(),
                        item,
                    })
                    .collect(),
                payments,
                room,
                created_by,
            })
            .collect())
    }

    /// Places an order. Lines whose menu item does not exist are dropped.
    #[instrument(skip(self, request), fields(order_type = ?request.order_type, lines = request.items.len()))]
    pub async fn create(&self, request: CreateOrderRequest) -> Result<OrderView, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let message = order_placed_message(
            request.table_number.as_deref(),
            request.customer_name.as_deref(),
        );

        let created = order::ActiveModel {
            order_type: Set(request.order_type),
            room_id: Set(request.room_id),
            created_by_id: Set(request.created_by),
            table_number: Set(request.table_number),
            customer_name: Set(request.customer_name),
            status: Set(request.status.unwrap_or(OrderStatus::Pending)),
            location: Set(request
                .location
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string())),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let menu_ids: Vec<i32> = request.items.iter().map(|l| l.menu_item_id).collect();
        let known = menu_items_by_id(&txn, menu_ids).await?;
        for line in request.items {
            if !known.contains_key(&line.menu_item_id) {
                debug!(menu_item_id = line.menu_item_id, "skipping unknown menu item");
                continue;
            }
            order_item::ActiveModel {
                order_id: Set(created.id),
                menu_item_id: Set(line.menu_item_id),
                quantity: Set(line.quantity),
                price: Set(line.price.round_dp(2)),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        }

        notifications::record(&txn, NotificationType::Info, message).await?;
        db::commit(txn, started).await?;

        info!(order_id = created.id, "order placed");
        self.get(created.id).await
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateOrderRequest,
    ) -> Result<order::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let mut active: order::ActiveModel = existing.into();
        if let Some(order_type) = request.order_type {
            active.order_type = Set(order_type);
        }
        if request.room_id.is_some() {
            active.room_id = Set(request.room_id);
        }
        if request.table_number.is_some() {
            active.table_number = Set(request.table_number);
        }
        if request.customer_name.is_some() {
            active.customer_name = Set(request.customer_name);
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if let Some(location) = request.location {
            active.location = Set(location);
        }
        self.repo.update(active).await
    }

    /// Hard delete; lines and payments cascade
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        info!(order_id = id, "order deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn receipt(&self, id: i32) -> Result<Receipt, ServiceError> {
        let view = self.get(id).await?;
        let lines: Vec<ReceiptLine> = view
            .items
            .into_iter()
            .map(|line| ReceiptLine {
                name: line.menu_item.map(|m| m.name),
                quantity: line.item.quantity,
                price: line.item.price,
            })
            .collect();

        Ok(Receipt {
            hotel: ReceiptHotel {
                name: self.hotel.name.clone(),
                address: self.hotel.address.clone(),
                phone: self.hotel.phone.clone(),
            },
            order: ReceiptOrder {
                id: view.order.id,
                order_type: view.order.order_type,
                room: view.room.map(|r| r.number),
                table_number: view.order.table_number,
                customer_name: view.order.customer_name,
                created_at: view.order.created_at,
                staff: view
                    .created_by
                    .map(|u| u.name)
                    .unwrap_or_else(|| "Staff".to_string()),
                subtotal: subtotal(&lines),
                items: lines,
            },
            payments: view.payments,
            thank_you: format!("Thank you for choosing {}!", self.hotel.name),
        })
    }
}

async fn menu_items_by_id<C>(
    db: &C,
    ids: Vec<i32>,
) -> Result<HashMap<i32, menu_item::Model>, ServiceError>
where
    C: ConnectionTrait,
{
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = menu_item::Entity::find()
        .filter(menu_item::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(ServiceError::db_error)?;
    Ok(rows.into_iter().map(|m| (m.id, m)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn notification_falls_back_for_missing_table_and_customer() {
        assert_eq!(
            order_placed_message(None, None),
            "New order placed: Table - by Guest"
        );
        assert_eq!(
            order_placed_message(Some("7"), Some("Wanjiru")),
            "New order placed: Table 7 by Wanjiru"
        );
    }

    #[test]
    fn subtotal_multiplies_price_by_quantity() {
        let lines = vec![
            ReceiptLine {
                name: Some("Tilapia".into()),
                quantity: 2,
                price: dec!(850.50),
            },
            ReceiptLine {
                name: None,
                quantity: 3,
                price: dec!(120),
            },
        ];
        assert_eq!(subtotal(&lines), dec!(2061.00));
    }
}
