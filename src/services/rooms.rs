use crate::{
    db::DbPool,
    entities::{
        reservation::{self, ReservationStatus},
        room::{self, MaintenanceStatus, RoomStatus},
    },
    errors::ServiceError,
    repositories::EntityRepository,
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use std::{collections::HashMap, sync::Arc};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, message = "number is required"))]
    pub number: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type is required"))]
    pub room_type: String,
    pub status: Option<RoomStatus>,
    pub guest_name: Option<String>,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub facilities: Option<String>,
    pub bed_type: Option<String>,
    #[serde(flatten)]
    pub amenities: Amenities,
}

/// Amenity flags; absent flags are left untouched on update and default to false on create
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Amenities {
    pub balcony: Option<bool>,
    pub view: Option<bool>,
    pub air_conditioning: Option<bool>,
    pub flat_screen_tv: Option<bool>,
    pub free_wifi: Option<bool>,
    pub electric_kettle: Option<bool>,
    pub wardrobe: Option<bool>,
    pub clothes_rack: Option<bool>,
    pub fan: Option<bool>,
}

impl Amenities {
    fn apply(self, active: &mut room::ActiveModel) {
        if let Some(value) = self.balcony {
            active.balcony = Set(value);
        }
        if let Some(value) = self.view {
            active.view = Set(value);
        }
        if let Some(value) = self.air_conditioning {
            active.air_conditioning = Set(value);
        }
        if let Some(value) = self.flat_screen_tv {
            active.flat_screen_tv = Set(value);
        }
        if let Some(value) = self.free_wifi {
            active.free_wifi = Set(value);
        }
        if let Some(value) = self.electric_kettle {
            active.electric_kettle = Set(value);
        }
        if let Some(value) = self.wardrobe {
            active.wardrobe = Set(value);
        }
        if let Some(value) = self.clothes_rack {
            active.clothes_rack = Set(value);
        }
        if let Some(value) = self.fan {
            active.fan = Set(value);
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1))]
    pub number: Option<String>,
    #[serde(rename = "type")]
    pub room_type: Option<String>,
    pub status: Option<RoomStatus>,
    pub guest_name: Option<String>,
    pub maintenance_status: Option<MaintenanceStatus>,
    pub last_cleaned: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub description: Option<String>,
    pub facilities: Option<String>,
    pub bed_type: Option<String>,
    #[serde(flatten)]
    pub amenities: Amenities,
}

/// Rooms and their housekeeping state
#[derive(Clone, Debug)]
pub struct RoomService {
    db_pool: Arc<DbPool>,
    repo: EntityRepository<room::Entity>,
}

impl RoomService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            repo: EntityRepository::new(db_pool.clone(), "Room"),
            db_pool,
        }
    }

    /// All rooms. Occupied rooms carry the id of their latest live reservation.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<room::Model>, ServiceError> {
        let db = &*self.db_pool;
        let mut rooms = room::Entity::find()
            .order_by_asc(room::Column::Number)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let occupied: Vec<i32> = rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Occupied)
            .map(|r| r.id)
            .collect();
        if occupied.is_empty() {
            return Ok(rooms);
        }

        let live = reservation::Entity::find()
            .filter(reservation::Column::RoomId.is_in(occupied))
            .filter(reservation::Column::Status.is_in([
                ReservationStatus::Reserved,
                ReservationStatus::CheckedIn,
            ]))
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut latest: HashMap<i32, i32> = HashMap::new();
        for r in live {
            latest.entry(r.room_id).or_insert(r.id);
        }
        for room in rooms.iter_mut() {
            if let Some(reservation_id) = latest.get(&room.id) {
                room.reservation_id = Some(*reservation_id);
            }
        }
        Ok(rooms)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<room::Model, ServiceError> {
        self.repo.get(id).await
    }

    #[instrument(skip(self, request), fields(number = %request.number))]
    pub async fn create(&self, request: CreateRoomRequest) -> Result<room::Model, ServiceError> {
        self.ensure_number_free(&request.number, None).await?;

        let mut active = room::ActiveModel {
            number: Set(request.number),
            room_type: Set(request.room_type),
            status: Set(request.status.unwrap_or(RoomStatus::Vacant)),
            guest_name: Set(request.guest_name),
            reservation_id: Set(None),
            maintenance_status: Set(None),
            last_cleaned: Set(None),
            notes: Set(request.notes),
            description: Set(request.description),
            facilities: Set(request.facilities),
            bed_type: Set(request.bed_type),
            balcony: Set(false),
            view: Set(false),
            air_conditioning: Set(false),
            flat_screen_tv: Set(false),
            free_wifi: Set(false),
            electric_kettle: Set(false),
            wardrobe: Set(false),
            clothes_rack: Set(false),
            fan: Set(false),
            ..Default::default()
        };
        request.amenities.apply(&mut active);

        let created = self.repo.insert(active).await?;
        info!(room_id = created.id, "room created");
        Ok(created)
    }

    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        id: i32,
        request: UpdateRoomRequest,
    ) -> Result<room::Model, ServiceError> {
        let existing = self.repo.get(id).await?;
        if let Some(number) = request.number.as_deref() {
            self.ensure_number_free(number, Some(id)).await?;
        }

        let mut active: room::ActiveModel = existing.into();
        if let Some(number) = request.number {
            active.number = Set(number);
        }
        if let Some(room_type) = request.room_type {
            active.room_type = Set(room_type);
        }
        if let Some(status) = request.status {
            active.status = Set(status);
        }
        if request.guest_name.is_some() {
            active.guest_name = Set(request.guest_name);
        }
        if request.maintenance_status.is_some() {
            active.maintenance_status = Set(request.maintenance_status);
        }
        if request.last_cleaned.is_some() {
            active.last_cleaned = Set(request.last_cleaned);
        }
        if request.notes.is_some() {
            active.notes = Set(request.notes);
        }
        if request.description.is_some() {
            active.description = Set(request.description);
        }
        if request.facilities.is_some() {
            active.facilities = Set(request.facilities);
        }
        if request.bed_type.is_some() {
            active.bed_type = Set(request.bed_type);
        }
        request.amenities.apply(&mut active);

        self.repo.update(active).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        info!(room_id = id, "room deleted");
        Ok(())
    }

    /// Inserts or overwrites type and status of the room with `number`.
    #[instrument(skip(self))]
    pub async fn upsert_by_number(
        &self,
        number: &str,
        room_type: &str,
        status: RoomStatus,
    ) -> Result<room::Model, ServiceError> {
        let existing = room::Entity::find()
            .filter(room::Column::Number.eq(number))
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;

        match existing {
            Some(found) => {
                let mut active: room::ActiveModel = found.into();
                active.room_type = Set(room_type.to_string());
                active.status = Set(status);
                self.repo.update(active).await
            }
            None => {
                let request = CreateRoomRequest {
                    number: number.to_string(),
                    room_type: room_type.to_string(),
                    status: Some(status),
                    guest_name: None,
                    notes: None,
                    description: None,
                    facilities: None,
                    bed_type: None,
                    amenities: Amenities::default(),
                };
                self.create(request).await
            }
        }
    }

    async fn ensure_number_free(&self, number: &str, except: Option<i32>) -> Result<(), ServiceError> {
        let mut query = room::Entity::find().filter(room::Column::Number.eq(number));
        if let Some(id) = except {
            query = query.filter(room::Column::Id.ne(id));
        }
        let taken = query
            .one(&*self.db_pool)
            .await
            .map_err(ServiceError::db_error)?;
        if taken.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Room number {} already exists",
                number
            )));
        }
        Ok(())
    }
}
