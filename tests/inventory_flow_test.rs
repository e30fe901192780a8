mod common;

use axum::http::StatusCode;
use hotel_pos_api::entities::menu_item;
use sea_orm::EntityTrait;
use serde_json::{json, Value};
use uuid::Uuid;

use common::TestApp;

async fn create_stock(app: &TestApp, name: &str, quantity: f64, min_threshold: f64) -> i64 {
    let (status, body) = app
        .post(
            "/api/inventory",
            json!({
                "name": name,
                "quantity": quantity,
                "unit": "kg",
                "minThreshold": min_threshold,
                "category": "Dry goods"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "inventory create failed: {body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn menu_delete_is_soft() {
    let app = TestApp::new().await;
    let id = app.seed_menu_item("Mandazi", "Bakery", 60.0).await;

    let (status, body) = app.delete(&format!("/api/menu/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Menu item removed successfully");

    let (_, menu) = app.get("/api/menu").await;
    assert_eq!(menu.as_array().map(Vec::len), Some(0));

    let row = menu_item::Entity::find_by_id(id as i32)
        .one(&*app.state.db)
        .await
        .unwrap()
        .expect("row is kept");
    assert!(row.is_deleted);
    assert!(!row.is_available);
}

#[tokio::test]
async fn menu_update_merges_and_rejects_negative_price() {
    let app = TestApp::new().await;
    let id = app.seed_menu_item("Mandazi", "Bakery", 60.0).await;

    let (status, item) = app
        .put(&format!("/api/menu/{id}"), json!({ "price": 70 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["price"].as_f64(), Some(70.0));
    assert_eq!(item["name"], "Mandazi");

    let (status, _) = app
        .post(
            "/api/menu",
            json!({ "name": "Broken", "category": "Bakery", "price": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_below_threshold_raises_warning() {
    let app = TestApp::new().await;
    let id = create_stock(&app, "Flour", 20.0, 5.0).await;

    let (status, item) = app
        .put(&format!("/api/inventory/{id}"), json!({ "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["quantity"].as_f64(), Some(3.0));

    let (_, notifications) = app.get("/api/notifications").await;
    assert_eq!(notifications[0]["type"], "warning");
    assert_eq!(notifications[0]["message"], "Low stock: Flour (3)");

    let (_, low) = app.get("/api/inventory/low-stock").await;
    let names: Vec<&str> = low
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|row| row["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Flour"]);
}

#[tokio::test]
async fn bulk_update_skips_unknown_ids() {
    let app = TestApp::new().await;
    let flour = create_stock(&app, "Flour", 20.0, 5.0).await;
    let sugar = create_stock(&app, "Sugar", 10.0, 5.0).await;

    let (status, body) = app
        .put(
            "/api/inventory/bulk",
            json!({
                "items": [
                    { "id": flour, "quantity": 25 },
                    { "id": sugar, "unit": "bags" },
                    { "id": 9999, "quantity": 1 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 2);

    let (_, flour_row) = app.get(&format!("/api/inventory/{flour}")).await;
    assert_eq!(flour_row["quantity"].as_f64(), Some(25.0));
    let (_, sugar_row) = app.get(&format!("/api/inventory/{sugar}")).await;
    assert_eq!(sugar_row["unit"], "bags");
    assert_eq!(sugar_row["quantity"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn inventory_delete_and_missing_rows() {
    let app = TestApp::new().await;
    let id = create_stock(&app, "Flour", 20.0, 5.0).await;

    let (status, body) = app.delete(&format!("/api/inventory/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Inventory item deleted");

    let (status, _) = app.get(&format!("/api/inventory/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn count_item_ids(count: &Value) -> Vec<(String, String)> {
    count["items"]
        .as_array()
        .expect("count items")
        .iter()
        .map(|item| {
            (
                item["itemName"].as_str().unwrap().to_string(),
                item["id"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

#[tokio::test]
async fn count_finalize_overwrites_live_quantities() {
    let app = TestApp::new().await;
    let flour = create_stock(&app, "Flour", 20.0, 5.0).await;
    let sugar = create_stock(&app, "Sugar", 10.0, 5.0).await;

    let (status, count) = app
        .post(
            "/api/inventory-counts",
            json!({ "comment": "month end" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(count["status"], "In Progress");
    assert_eq!(count["comment"], "month end");

    let ids = count_item_ids(&count);
    assert_eq!(ids.len(), 2);
    let counted: serde_json::Map<String, Value> = ids
        .iter()
        .map(|(name, id)| {
            let qty = if name == "Flour" { 18.5 } else { 12.0 };
            (id.clone(), json!(qty))
        })
        .collect();

    let count_id = count["id"].as_str().unwrap();
    let (status, done) = app
        .put(
            &format!("/api/inventory-counts/{count_id}/finalize"),
            json!({ "counted": counted }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "Completed");

    let flour_line = done["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["itemName"] == "Flour")
        .unwrap();
    assert_eq!(flour_line["expectedQty"].as_f64(), Some(20.0));
    assert_eq!(flour_line["countedQty"].as_f64(), Some(18.5));
    assert_eq!(flour_line["variance"].as_f64(), Some(-1.5));

    let (_, flour_row) = app.get(&format!("/api/inventory/{flour}")).await;
    assert_eq!(flour_row["quantity"].as_f64(), Some(18.5));
    let (_, sugar_row) = app.get(&format!("/api/inventory/{sugar}")).await;
    assert_eq!(sugar_row["quantity"].as_f64(), Some(12.0));

    let (_, counts) = app.get("/api/inventory-counts").await;
    assert_eq!(counts[0]["status"], "Completed");
}

#[tokio::test]
async fn count_start_without_body_and_incomplete_finalize() {
    let app = TestApp::new().await;
    create_stock(&app, "Flour", 20.0, 5.0).await;

    let (status, count) = app
        .request(axum::http::Method::POST, "/api/inventory-counts", None)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let count_id = count["id"].as_str().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/inventory-counts/{count_id}/finalize"),
            json!({ "counted": {} }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing counted quantity for Flour");

    let (status, _) = app
        .put(
            &format!("/api/inventory-counts/{}/finalize", Uuid::new_v4()),
            json!({ "counted": {} }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
