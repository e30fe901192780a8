use crate::{
    config::PmsConfig, entities::room::RoomStatus, errors::ServiceError,
    services::{mpesa::gateway_client, rooms::RoomService},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Room as reported by the property-management system
#[derive(Debug, Deserialize)]
pub struct PmsRoom {
    pub number: RoomNumber,
    #[serde(rename = "type")]
    pub room_type: String,
    pub status: String,
}

impl PmsRoom {
    /// Status in our vocabulary, `None` for anything we do not track.
    pub fn room_status(&self) -> Option<RoomStatus> {
        match self.status.trim().to_ascii_lowercase().as_str() {
            "occupied" => Some(RoomStatus::Occupied),
            "vacant" => Some(RoomStatus::Vacant),
            "cleaning" => Some(RoomStatus::Cleaning),
            "maintenance" => Some(RoomStatus::Maintenance),
            _ => None,
        }
    }
}

/// Some PMS vendors send room numbers as JSON numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RoomNumber {
    Text(String),
    Numeric(i64),
}

impl std::fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoomNumber::Text(s) => f.write_str(s),
            RoomNumber::Numeric(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RoomsPayload {
    Wrapped { rooms: Vec<PmsRoom> },
    Bare(Vec<PmsRoom>),
}

impl RoomsPayload {
    fn into_rooms(self) -> Vec<PmsRoom> {
        match self {
            RoomsPayload::Wrapped { rooms } | RoomsPayload::Bare(rooms) => rooms,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SyncResult {
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct PmsService {
    config: PmsConfig,
    client: Client,
    rooms: RoomService,
}

impl PmsService {
    pub fn new(config: PmsConfig, rooms: RoomService) -> Self {
        Self {
            config,
            client: gateway_client(),
            rooms,
        }
    }

    /// Pulls the room list from the PMS and upserts each room by number.
    #[instrument(skip(self))]
    pub async fn sync_rooms(&self) -> Result<SyncResult, ServiceError> {
        let (Some(url), Some(key)) = (
            self.config.api_url.as_deref().filter(|s| !s.is_empty()),
            self.config.api_key.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(ServiceError::ServiceUnavailable(
                "PMS API config missing".to_string(),
            ));
        };

        let response = self
            .client
            .get(format!("{}/rooms", url.trim_end_matches('/')))
            .bearer_auth(key)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "PMS room list failed with status {}",
                response.status()
            )));
        }
        let rooms = response.json::<RoomsPayload>().await?.into_rooms();

        let mut synced = 0;
        for room in &rooms {
            let Some(status) = room.room_status() else {
                warn!(number = %room.number, status = %room.status, "skipping PMS room with unknown status");
                continue;
            };
            self.rooms
                .upsert_by_number(&room.number.to_string(), &room.room_type, status)
                .await?;
            synced += 1;
        }

        info!(count = synced, skipped = rooms.len() - synced, "rooms synced from PMS");
        Ok(SyncResult {
            message: format!("Synced {} rooms from PMS.", synced),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_wrapped_and_bare_room_lists() {
        let wrapped: RoomsPayload = serde_json::from_str(
            r#"{"rooms":[{"number":"101","type":"double","status":"vacant"}]}"#,
        )
        .unwrap();
        let bare: RoomsPayload =
            serde_json::from_str(r#"[{"number":102,"type":"single","status":"occupied"}]"#)
                .unwrap();

        let wrapped = wrapped.into_rooms();
        assert_eq!(wrapped[0].number.to_string(), "101");
        let bare = bare.into_rooms();
        assert_eq!(bare[0].number.to_string(), "102");
        assert_eq!(bare[0].room_status(), Some(RoomStatus::Occupied));
    }

    #[test]
    fn unknown_statuses_are_not_mapped() {
        let rooms: RoomsPayload = serde_json::from_str(
            r#"[{"number":"103","type":"double","status":"dirty"},{"number":"104","type":"single","status":"Vacant"}]"#,
        )
        .unwrap();
        let rooms = rooms.into_rooms();
        assert_eq!(rooms[0].room_status(), None);
        assert_eq!(rooms[1].room_status(), Some(RoomStatus::Vacant));
    }

    #[tokio::test]
    async fn missing_config_is_unavailable() {
        let rooms = RoomService::new(std::sync::Arc::new(
            sea_orm::DatabaseConnection::Disconnected,
        ));
        let service = PmsService::new(PmsConfig::default(), rooms);
        let err = service.sync_rooms().await.unwrap_err();
        assert!(matches!(err, ServiceError::ServiceUnavailable(_)));
    }
}
