use async_trait::async_trait;
use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    #[sea_orm(string_value = "occupied")]
    Occupied,
    #[sea_orm(string_value = "vacant")]
    Vacant,
    #[sea_orm(string_value = "cleaning")]
    Cleaning,
    #[sea_orm(string_value = "maintenance")]
    Maintenance,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub number: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub room_type: String,
    pub status: RoomStatus,
    pub guest_name: Option<String>,
    pub reservation_id: Option<i32>,
    pub maintenance_status: Option<MaintenanceStatus>,
    pub last_cleaned: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Comma-separated list
    #[sea_orm(column_type = "Text", nullable)]
    pub facilities: Option<String>,
    pub bed_type: Option<String>,
    pub balcony: bool,
    pub view: bool,
    pub air_conditioning: bool,
    pub flat_screen_tv: bool,
    pub free_wifi: bool,
    pub electric_kettle: bool,
    pub wardrobe: bool,
    pub clothes_rack: bool,
    pub fan: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation::Entity")]
    Reservations,
    #[sea_orm(has_many = "super::room_service::Entity")]
    RoomServices,
    #[sea_orm(has_many = "super::order::Entity")]
    Orders,
}

impl Related<super::reservation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

impl Related<super::room_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomServices.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
