use crate::{
    db::{self, DbPool},
    entities::{
        order::{self, OrderStatus},
        payment::{self, PaymentMethod, PaymentStatus},
    },
    errors::ServiceError,
    repositories::EntityRepository,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_id: i32,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_ref: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    #[schema(value_type = Option<f64>)]
    pub amount: Option<Decimal>,
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,
    pub transaction_ref: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentWithOrder {
    #[serde(flatten)]
    pub payment: payment::Model,
    pub order: Option<order::Model>,
}

/// Completed payments always carry a payment time.
fn settle_time(
    status: PaymentStatus,
    paid_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match (status, paid_at) {
        (PaymentStatus::Completed, None) => Some(now),
        (_, paid_at) => paid_at,
    }
}

/// Payments against orders
#[derive(Clone, Debug)]
pub struct PaymentService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<payment::Entity>,
}

impl PaymentService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Payment"),
            db_pool,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<PaymentWithOrder>, ServiceError> {
        let rows = payment::Entity::find()
            .find_also_related(order::Entity)
            .order_by_desc(payment::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .map(|(payment, order)| PaymentWithOrder { payment, order })
            .collect())
    }

    /// Records a payment. A completed payment closes its order.
    #[instrument(skip(self, request), fields(order_id = request.order_id))]
    pub async fn create(&self, request: CreatePaymentRequest) -> Result<payment::Model, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let order = order::Entity::find_by_id(request.order_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Order", request.order_id))?;

        let created = payment::ActiveModel {
            order_id: Set(order.id),
            amount: Set(request.amount.round_dp(2)),
            method: Set(request.method),
            status: Set(request.status),
            transaction_ref: Set(request.transaction_ref),
            paid_at: Set(settle_time(request.status, request.paid_at, Utc::now())),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        if created.status == PaymentStatus::Completed {
            let mut order: order::ActiveModel = order.into();
            order.status = Set(OrderStatus::Completed);
            order.update(&txn).await.map_err(ServiceError::db_error)?;
            info!(order_id = created.order_id, "order completed by payment");
        }

        db::commit(txn, started).await?;
        info!(payment_id = created.id, method = ?created.method, "payment recorded");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdatePaymentRequest,
    ) -> Result<payment::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let status = request.status.unwrap_or(existing.status);
        let paid_at = settle_time(status, request.paid_at.or(existing.paid_at), Utc::now());

        let mut active: payment::ActiveModel = existing.into();
        if let Some(amount) = request.amount {
            active.amount = Set(amount.round_dp(2));
        }
        if let Some(method) = request.method {
            active.method = Set(method);
        }
        if request.transaction_ref.is_some() {
            active.transaction_ref = Set(request.transaction_ref);
        }
        active.status = Set(status);
        active.paid_at = Set(paid_at);
        self.repo.update(active).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await
    }

    /// Settles the payment whose pending reference is `reference` with the
    /// gateway `receipt`. Unknown references are logged and ignored.
    #[instrument(skip(self))]
    pub async fn settle_by_reference(
        &self,
        reference: &str,
        receipt: Option<String>,
    ) -> Result<Option<payment::Model>, ServiceError> {
        let Some(existing) = payment::Entity::find()
            .filter(payment::Column::TransactionRef.eq(reference))
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?
        else {
            warn!(%reference, "no payment matches gateway reference");
            return Ok(None);
        };

        let mut active: payment::ActiveModel = existing.into();
        active.status = Set(PaymentStatus::Completed);
        if let Some(receipt) = receipt {
            active.transaction_ref = Set(Some(receipt));
        }
        active.paid_at = Set(Some(Utc::now()));
        let settled = self.repo.update(active).await?;
        info!(payment_id = settled.id, "payment settled by gateway");
        Ok(Some(settled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn completed_payments_get_a_paid_time() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 2, 28, 9, 30, 0).unwrap();

        assert_eq!(settle_time(PaymentStatus::Completed, None, now), Some(now));
        assert_eq!(
            settle_time(PaymentStatus::Completed, Some(earlier), now),
            Some(earlier)
        );
        assert_eq!(settle_time(PaymentStatus::Pending, None, now), None);
    }
}
