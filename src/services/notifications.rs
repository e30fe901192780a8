use crate::{
    db::DbPool,
    entities::notification::{self, NotificationType},
    errors::ServiceError,
    repositories::EntityRepository,
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    #[serde(rename = "type")]
    #[validate(required(message = "type is required"))]
    pub notification_type: Option<NotificationType>,
    #[serde(default)]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

/// Writes a notification on `db`, which may be a pool or an open transaction.
pub async fn record<C>(
    db: &C,
    notification_type: NotificationType,
    message: impl Into<String>,
) -> Result<notification::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let message = message.into();
    info!(?notification_type, %message, "notification");
    notification::ActiveModel {
        notification_type: Set(notification_type),
        message: Set(message),
        read: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(ServiceError::db_error)
}

/// Staff-facing notification feed
#[derive(Clone, Debug)]
pub struct NotificationService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<notification::Entity>,
}

impl NotificationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Notification"),
            db_pool,
        }
    }

    /// Newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<notification::Model>, ServiceError> {
        notification::Entity::find()
            .order_by_desc(notification::Column::CreatedAt)
            .order_by_desc(notification::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn create(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<notification::Model, ServiceError> {
        let notification_type = request
            .notification_type
            .ok_or_else(|| ServiceError::ValidationError("type is required".into()))?;
        record(&*self.db_pool, notification_type, request.message).await
    }

    #[instrument(skip(self))]
    pub async fn mark_read(&self, id: i32) -> Result<notification::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let mut active: notification::ActiveModel = existing.into();
        active.read = Set(true);
        self.repo.update(active).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await
    }

    /// Clears the feed, returning how many rows were removed
    #[instrument(skip(self))]
    pub async fn delete_all(&self) -> Result<u64, ServiceError> {
        let result = notification::Entity::delete_many()
            .exec(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        info!(removed = result.rows_affected, "notifications cleared");
        Ok(result.rows_affected)
    }
}
