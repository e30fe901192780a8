use crate::{
    db::{self, DbPool},
    entities::{
        notification::NotificationType,
        room::{self, MaintenanceStatus, RoomStatus},
        room_service::{self, RoomServiceStatus, RoomServiceType},
    },
    errors::ServiceError,
    repositories::EntityRepository,
    services::notifications,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomServiceRequest {
    pub room_id: i32,
    #[serde(rename = "type")]
    pub service_type: RoomServiceType,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomServiceRequest {
    pub status: Option<RoomServiceStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomServiceWithRoom {
    #[serde(flatten)]
    pub request: room_service::Model,
    pub room: Option<room::Model>,
}

/// Room status a pending request of this type puts the room into, if any.
fn holding_status(service_type: RoomServiceType) -> Option<RoomStatus> {
    match service_type {
        RoomServiceType::Housekeeping => Some(RoomStatus::Cleaning),
        RoomServiceType::Maintenance => Some(RoomStatus::Maintenance),
        RoomServiceType::RoomService => None,
    }
}

/// Housekeeping, maintenance and in-room dining requests
#[derive(Clone, Debug)]
pub struct RoomRequestService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<room_service::Entity>,
}

impl RoomRequestService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Room service"),
            db_pool,
        }
    }

    /// Newest request first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<RoomServiceWithRoom>, ServiceError> {
        self.list_filtered(None).await
    }

    #[instrument(skip(self))]
    pub async fn list_for_room(&self, room_id: i32) -> Result<Vec<RoomServiceWithRoom>, ServiceError> {
        self.list_filtered(Some(room_id)).await
    }

    async fn list_filtered(&self, room_id: Option<i32>) -> Result<Vec<RoomServiceWithRoom>, ServiceError> {
        let mut query = room_service::Entity::find().find_also_related(room::Entity);
        if let Some(room_id) = room_id {
            query = query.filter(room_service::Column::RoomId.eq(room_id));
        }
        let rows = query
            .order_by_desc(room_service::Column::RequestedAt)
            .order_by_desc(room_service::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .map(|(request, room)| RoomServiceWithRoom { request, room })
            .collect())
    }

    #[instrument(skip(self, request), fields(room_id = request.room_id))]
    pub async fn create(
        &self,
        request: CreateRoomServiceRequest,
    ) -> Result<room_service::Model, ServiceError> {
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let room = find_room(&txn, request.room_id).await?;
        let now = Utc::now();
        let created = room_service::ActiveModel {
            room_id: Set(room.id),
            service_type: Set(request.service_type),
            status: Set(RoomServiceStatus::Pending),
            requested_at: Set(now),
            completed_at: Set(None),
            notes: Set(request.notes),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        if let Some(status) = holding_status(request.service_type) {
            let number = room.number.clone();
            let mut room: room::ActiveModel = room.into();
            room.status = Set(status);
            room.update(&txn).await.map_err(ServiceError::db_error)?;

            notifications::record(
                &txn,
                NotificationType::Info,
                format!("{} requested: Room {}", request.service_type.label(), number),
            )
            .await?;
        }

        db::commit(txn, started).await?;
        info!(request_id = created.id, "room service requested");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateRoomServiceRequest,
    ) -> Result<room_service::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let service_type = existing.service_type;
        let room_id = existing.room_id;
        let mut active: room_service::ActiveModel = existing.into();
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if request.notes.is_some() {
            active.notes = Set(request.notes);
        }

        if request.status == Some(RoomServiceStatus::Completed) {
            let now = Utc::now();
            active.completed_at = Set(Some(now));

            if holding_status(service_type).is_some() {
                let room = find_room(&txn, room_id).await?;
                let mut room: room::ActiveModel = room.into();
                room.status = Set(RoomStatus::Vacant);
                match service_type {
                    RoomServiceType::Housekeeping => room.last_cleaned = Set(Some(now)),
                    RoomServiceType::Maintenance => {
                        room.maintenance_status = Set(Some(MaintenanceStatus::Completed))
                    }
                    RoomServiceType::RoomService => {}
                }
                room.update(&txn).await.map_err(ServiceError::db_error)?;
            }
        }

        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;
        db::commit(txn, started).await?;
        Ok(updated)
    }

    /// Marks the request cancelled and frees the room if the request still holds it.
    #[instrument(skip(self))]
    pub async fn cancel(&self, id: i32) -> Result<room_service::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        if let Some(held) = holding_status(existing.service_type) {
            let room = find_room(&txn, existing.room_id).await?;
            if room.status == held {
                let mut room: room::ActiveModel = room.into();
                room.status = Set(RoomStatus::Vacant);
                room.update(&txn).await.map_err(ServiceError::db_error)?;
            }
        }

        let mut active: room_service::ActiveModel = existing.into();
        active.status = Set(RoomServiceStatus::Cancelled);
        let cancelled = active.update(&txn).await.map_err(ServiceError::db_error)?;

        db::commit(txn, started).await?;
        info!(request_id = id, "room service cancelled");
        Ok(cancelled)
    }
}

async fn find_room<C: ConnectionTrait>(db: &C, id: i32) -> Result<room::Model, ServiceError> {
    room::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found("Room", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_housekeeping_and_maintenance_hold_the_room() {
        assert_eq!(
            holding_status(RoomServiceType::Housekeeping),
            Some(RoomStatus::Cleaning)
        );
        assert_eq!(
            holding_status(RoomServiceType::Maintenance),
            Some(RoomStatus::Maintenance)
        );
        assert_eq!(holding_status(RoomServiceType::RoomService), None);
    }
}
