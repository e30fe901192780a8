use crate::{
    db::{self, DbPool},
    entities::{
        reservation::{self, ReservationStatus},
        room::{self, RoomStatus},
    },
    errors::ServiceError,
    repositories::EntityRepository,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Instant};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub room_id: i32,
    #[validate(length(min = 1, message = "guestName is required"))]
    pub guest_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub contact_info: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationRequest {
    pub status: Option<ReservationStatus>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationWithRoom {
    #[serde(flatten)]
    pub reservation: reservation::Model,
    pub room: Option<room::Model>,
}

fn check_dates(check_in: NaiveDate, check_out: NaiveDate) -> Result<(), ServiceError> {
    if check_out < check_in {
        return Err(ServiceError::ValidationError(
            "checkOut must not be before checkIn".to_string(),
        ));
    }
    Ok(())
}

/// Guest bookings. Booking a room marks it occupied; releasing the booking frees it.
#[derive(Clone, Debug)]
pub struct ReservationService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<reservation::Entity>,
}

impl ReservationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Reservation"),
            db_pool,
        }
    }

    /// Newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ReservationWithRoom>, ServiceError> {
        let rows = reservation::Entity::find()
            .find_also_related(room::Entity)
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows
            .into_iter()
            .map(|(reservation, room)| ReservationWithRoom { reservation, room })
            .collect())
    }

    #[instrument(skip(self, request), fields(room_id = request.room_id))]
    pub async fn create(
        &self,
        request: CreateReservationRequest,
    ) -> Result<reservation::Model, ServiceError> {
        check_dates(request.check_in, request.check_out)?;

        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let room = room::Entity::find_by_id(request.room_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found("Room", request.room_id))?;

        let created = reservation::ActiveModel {
            room_id: Set(room.id),
            guest_name: Set(request.guest_name),
            check_in: Set(request.check_in),
            check_out: Set(request.check_out),
            contact_info: Set(request.contact_info),
            special_requests: Set(request.special_requests),
            status: Set(ReservationStatus::Reserved),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let mut room: room::ActiveModel = room.into();
        room.status = Set(RoomStatus::Occupied);
        room.update(&txn).await.map_err(ServiceError::db_error)?;

        db::commit(txn, started).await?;
        info!(reservation_id = created.id, "reservation created");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateReservationRequest,
    ) -> Result<reservation::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        let check_in = request.check_in.unwrap_or(existing.check_in);
        let check_out = request.check_out.unwrap_or(existing.check_out);
        check_dates(check_in, check_out)?;

        let started = Instant::now();
        let txn = db::begin(&self.db_pool).await?;

        let room_id = existing.room_id;
        let mut active: reservation::ActiveModel = existing.into();
        active.check_in = Set(check_in);
        active.check_out = Set(check_out);
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if request.special_requests.is_some() {
            active.special_requests = Set(request.special_requests);
        }
        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        if matches!(
            request.status,
            Some(ReservationStatus::Cancelled | ReservationStatus::CheckedOut)
        ) {
            if let Some(room) = room::Entity::find_by_id(room_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
            {
                let mut room: room::ActiveModel = room.into();
                room.status = Set(RoomStatus::Vacant);
                room.update(&txn).await.map_err(ServiceError::db_error)?;
                info!(room_id, "room released");
            }
        }

        db::commit(txn, started).await?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_day_stay_is_allowed() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(check_dates(day, day).is_ok());
    }

    #[test]
    fn check_out_before_check_in_is_rejected() {
        let check_in = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(matches!(
            check_dates(check_in, check_out),
            Err(ServiceError::ValidationError(_))
        ));
    }
}
