mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

async fn room(app: &TestApp, id: i64) -> Value {
    let (_, rooms) = app.get("/api/rooms").await;
    rooms
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"].as_i64() == Some(id))
        .cloned()
        .expect("room listed")
}

#[tokio::test]
async fn room_numbers_are_unique() {
    let app = TestApp::new().await;
    let first = app.seed_room("101").await;

    let (status, body) = app
        .post("/api/rooms", json!({ "number": "101", "type": "single" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let second = app.seed_room("102").await;
    let (status, _) = app
        .put(&format!("/api/rooms/{second}"), json!({ "number": "101" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = app
        .put(
            &format!("/api/rooms/{first}"),
            json!({ "notes": "sea facing", "balcony": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["number"], "101");
    assert_eq!(updated["notes"], "sea facing");
    assert_eq!(updated["balcony"], true);
    assert_eq!(updated["fan"], false);
}

#[tokio::test]
async fn delete_room_and_missing_room() {
    let app = TestApp::new().await;
    let id = app.seed_room("101").await;

    let (status, body) = app.delete(&format!("/api/rooms/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Room deleted");

    let (status, _) = app.delete(&format!("/api/rooms/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reservation_occupies_room_until_checkout() {
    let app = TestApp::new().await;
    let room_id = app.seed_room("201").await;

    let (status, reservation) = app
        .post(
            "/api/reservations",
            json!({
                "roomId": room_id,
                "guestName": "Wanjiru",
                "checkIn": "2026-03-01",
                "checkOut": "2026-03-04",
                "contactInfo": "+254711000000"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{reservation}");
    assert_eq!(reservation["status"], "reserved");

    let occupied = room(&app, room_id).await;
    assert_eq!(occupied["status"], "occupied");
    assert_eq!(occupied["reservationId"], reservation["id"]);

    let (_, reservations) = app.get("/api/reservations").await;
    assert_eq!(reservations[0]["room"]["number"], "201");

    let (status, updated) = app
        .put(
            &format!("/api/reservations/{}", reservation["id"]),
            json!({ "status": "checked_out" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "checked_out");
    assert_eq!(room(&app, room_id).await["status"], "vacant");
}

#[tokio::test]
async fn reservation_rejects_inverted_dates_and_unknown_room() {
    let app = TestApp::new().await;
    let room_id = app.seed_room("201").await;

    let (status, _) = app
        .post(
            "/api/reservations",
            json!({
                "roomId": room_id,
                "guestName": "Wanjiru",
                "checkIn": "2026-03-04",
                "checkOut": "2026-03-01"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/reservations",
            json!({
                "roomId": 999,
                "guestName": "Wanjiru",
                "checkIn": "2026-03-01",
                "checkOut": "2026-03-02"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn housekeeping_cycle_cleans_room() {
    let app = TestApp::new().await;
    let room_id = app.seed_room("101").await;

    let (status, request) = app
        .post(
            "/api/room-services",
            json!({ "roomId": room_id, "type": "housekeeping", "notes": "extra towels" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "pending");
    assert_eq!(room(&app, room_id).await["status"], "cleaning");

    let (_, notifications) = app.get("/api/notifications").await;
    assert_eq!(notifications[0]["message"], "Housekeeping requested: Room 101");

    let (status, done) = app
        .put(
            &format!("/api/room-services/{}", request["id"]),
            json!({ "status": "completed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(done["completedAt"].is_string());

    let cleaned = room(&app, room_id).await;
    assert_eq!(cleaned["status"], "vacant");
    assert!(cleaned["lastCleaned"].is_string());
}

#[tokio::test]
async fn cancelled_maintenance_frees_room() {
    let app = TestApp::new().await;
    let room_id = app.seed_room("305").await;

    let (_, request) = app
        .post(
            "/api/room-services",
            json!({ "roomId": room_id, "type": "maintenance" }),
        )
        .await;
    let blocked = room(&app, room_id).await;
    assert_eq!(blocked["status"], "maintenance");
    assert!(blocked["maintenanceStatus"].is_null());

    let (_, for_room) = app
        .get(&format!("/api/room-services/room/{room_id}"))
        .await;
    assert_eq!(for_room.as_array().map(Vec::len), Some(1));
    assert_eq!(for_room[0]["room"]["number"], "305");

    let (status, body) = app
        .delete(&format!("/api/room-services/{}", request["id"]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Service request cancelled");
    assert_eq!(room(&app, room_id).await["status"], "vacant");

    let (_, all) = app.get("/api/room-services").await;
    assert_eq!(all[0]["status"], "cancelled");
}

#[tokio::test]
async fn room_service_requires_existing_room() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(
            "/api/room-services",
            json!({ "roomId": 42, "type": "room_service" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
