mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::TestApp;

async fn create_po(app: &TestApp, supplier_id: &str, lines: Value) -> Value {
    let (status, body) = app
        .post(
            "/api/purchase-orders",
            json!({ "supplierId": supplier_id, "items": lines, "notes": "weekly restock" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}

fn line_ids(po: &Value) -> Vec<String> {
    po["items"]
        .as_array()
        .expect("items")
        .iter()
        .map(|line| line["id"].as_str().expect("line id").to_string())
        .collect()
}

async fn stock_of(app: &TestApp, name: &str) -> Option<f64> {
    let (_, items) = app.get("/api/inventory").await;
    items
        .as_array()
        .expect("inventory list")
        .iter()
        .find(|row| row["name"] == name)
        .and_then(|row| row["quantity"].as_f64())
}

#[tokio::test]
async fn create_computes_totals_with_vat() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let beans = app.seed_menu_item("Beans", "Dry goods", 90.0).await;

    let po = create_po(
        &app,
        &supplier,
        json!([
            { "id": rice, "quantity": 10, "price": 50 },
            { "id": beans, "quantity": 4, "price": 25 }
        ]),
    )
    .await;

    assert_eq!(po["status"], "Draft");
    assert_eq!(po["subtotal"].as_f64(), Some(600.0));
    assert_eq!(po["tax"].as_f64(), Some(96.0));
    assert_eq!(po["total"].as_f64(), Some(696.0));
    assert_eq!(po["supplier"]["name"], "Highland Produce");
    assert_eq!(po["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(po["items"][0]["receivedQty"], 0);
}

#[tokio::test]
async fn create_rejects_unknown_supplier_and_empty_lines() {
    let app = TestApp::new().await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;

    let (status, _) = app
        .post(
            "/api/purchase-orders",
            json!({ "supplierId": Uuid::new_v4(), "items": [{ "id": rice, "quantity": 1, "price": 10 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let supplier = app.seed_supplier("Highland Produce").await;
    let (status, _) = app
        .post(
            "/api/purchase-orders",
            json!({ "supplierId": supplier, "items": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn full_receipt_completes_order_and_creates_stock() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let po = create_po(&app, &supplier, json!([{ "id": rice, "quantity": 10, "price": 50 }])).await;
    let po_id = po["id"].as_str().unwrap();
    let line = &line_ids(&po)[0];

    let (status, received) = app
        .post(
            &format!("/api/purchase-orders/{po_id}/receive"),
            json!({ "received": { line: 10 } }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(received["status"], "Completed");
    assert_eq!(received["items"][0]["receivedQty"], 10);
    assert_eq!(stock_of(&app, "Rice").await, Some(10.0));

    let (_, items) = app.get("/api/inventory").await;
    let rice_row = items
        .as_array()
        .unwrap()
        .iter()
        .find(|row| row["name"] == "Rice")
        .unwrap();
    assert_eq!(rice_row["unit"], "units");
    assert_eq!(rice_row["minThreshold"].as_f64(), Some(10.0));
    assert_eq!(rice_row["category"], "Dry goods");
}

#[tokio::test]
async fn partial_receipt_then_remainder() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let beans = app.seed_menu_item("Beans", "Dry goods", 90.0).await;
    let po = create_po(
        &app,
        &supplier,
        json!([
            { "id": rice, "quantity": 10, "price": 50 },
            { "id": beans, "quantity": 4, "price": 25 }
        ]),
    )
    .await;
    let po_id = po["id"].as_str().unwrap();
    let lines = line_ids(&po);

    let (status, partial) = app
        .post(
            &format!("/api/purchase-orders/{po_id}/receive"),
            json!({ "received": { &lines[0]: 6 } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(partial["status"], "Partially Received");
    assert_eq!(stock_of(&app, "Rice").await, Some(6.0));
    assert_eq!(stock_of(&app, "Beans").await, None);

    let (_, done) = app
        .post(
            &format!("/api/purchase-orders/{po_id}/receive"),
            json!({ "received": { &lines[0]: 4, &lines[1]: 4 } }),
        )
        .await;
    assert_eq!(done["status"], "Completed");
    assert_eq!(stock_of(&app, "Rice").await, Some(10.0));
    assert_eq!(stock_of(&app, "Beans").await, Some(4.0));
}

#[tokio::test]
async fn approval_only_from_pending_approval() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let po = create_po(&app, &supplier, json!([{ "id": rice, "quantity": 1, "price": 50 }])).await;
    let po_id = po["id"].as_str().unwrap();

    let (status, body) = app.patch(&format!("/api/purchase-orders/{po_id}/approve")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only POs pending approval can be approved.");

    let (status, body) = app
        .request(
            axum::http::Method::PATCH,
            &format!("/api/purchase-orders/{po_id}/status"),
            Some(json!({ "status": "Pending Approval" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Pending Approval");

    let (status, body) = app.patch(&format!("/api/purchase-orders/{po_id}/approve")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Approved");

    let (status, body) = app.patch(&format!("/api/purchase-orders/{po_id}/reject")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Only POs pending approval can be rejected.");
}

#[tokio::test]
async fn reject_pending_order() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let (_, po) = app
        .post(
            "/api/purchase-orders",
            json!({
                "supplierId": supplier,
                "status": "Pending Approval",
                "items": [{ "id": rice, "quantity": 1, "price": 50 }]
            }),
        )
        .await;
    let po_id = po["id"].as_str().unwrap();

    let (status, body) = app.patch(&format!("/api/purchase-orders/{po_id}/reject")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Rejected");
}

#[tokio::test]
async fn status_completed_adds_full_quantities() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let po = create_po(&app, &supplier, json!([{ "id": rice, "quantity": 12, "price": 50 }])).await;
    let po_id = po["id"].as_str().unwrap();

    let (status, body) = app
        .request(
            axum::http::Method::PATCH,
            &format!("/api/purchase-orders/{po_id}/status"),
            Some(json!({ "status": "Completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Completed");
    assert_eq!(stock_of(&app, "Rice").await, Some(12.0));

    let (status, _) = app
        .request(
            axum::http::Method::PATCH,
            &format!("/api/purchase-orders/{po_id}/status"),
            Some(json!({ "status": "Completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock_of(&app, "Rice").await, Some(12.0));
}

#[tokio::test]
async fn completing_after_partial_receipt_adds_full_ordered_quantity() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let po = create_po(&app, &supplier, json!([{ "id": rice, "quantity": 12, "price": 50 }])).await;
    let po_id = po["id"].as_str().unwrap();
    let line = line_ids(&po).remove(0);

    let (status, received) = app
        .post(
            &format!("/api/purchase-orders/{po_id}/receive"),
            json!({ "received": { line: 4 } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(received["status"], "Partially Received");
    assert_eq!(stock_of(&app, "Rice").await, Some(4.0));

    let (status, body) = app
        .request(
            axum::http::Method::PATCH,
            &format!("/api/purchase-orders/{po_id}/status"),
            Some(json!({ "status": "Completed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Completed");
    assert_eq!(stock_of(&app, "Rice").await, Some(16.0));
}

#[tokio::test]
async fn update_replaces_lines_and_recomputes_totals() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let beans = app.seed_menu_item("Beans", "Dry goods", 90.0).await;
    let po = create_po(&app, &supplier, json!([{ "id": rice, "quantity": 10, "price": 50 }])).await;
    let po_id = po["id"].as_str().unwrap();

    let (status, updated) = app
        .put(
            &format!("/api/purchase-orders/{po_id}"),
            json!({ "supplierId": supplier, "items": [{ "id": beans, "quantity": 2, "price": 100 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Draft");
    assert_eq!(updated["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(updated["items"][0]["menuItemId"].as_i64(), Some(beans));
    assert_eq!(updated["subtotal"].as_f64(), Some(200.0));
    assert_eq!(updated["total"].as_f64(), Some(232.0));
}

#[tokio::test]
async fn vendor_return_decrements_stock() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let po = create_po(&app, &supplier, json!([{ "id": rice, "quantity": 10, "price": 50 }])).await;
    let po_id = po["id"].as_str().unwrap();
    let line = &line_ids(&po)[0];
    app.post(
        &format!("/api/purchase-orders/{po_id}/receive"),
        json!({ "received": { line: 10 } }),
    )
    .await;

    let (status, body) = app
        .post(
            &format!("/api/purchase-orders/{po_id}/vendor-return"),
            json!({
                "items": [
                    { "itemName": "Rice", "quantity": 3 },
                    { "itemName": "Not stocked", "quantity": 1 }
                ],
                "reason": "damaged sacks"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Vendor return created");
    assert_eq!(body["vendorReturn"]["supplierId"].as_str(), Some(supplier.as_str()));
    assert_eq!(stock_of(&app, "Rice").await, Some(7.0));

    let (_, returns) = app
        .get(&format!("/api/purchase-orders/{po_id}/vendor-returns"))
        .await;
    let returns = returns.as_array().expect("returns");
    assert_eq!(returns.len(), 1);
    assert_eq!(returns[0]["reason"], "damaged sacks");
    assert_eq!(returns[0]["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(returns[0]["supplier"]["name"], "Highland Produce");

    // receipt lines are untouched
    let (_, po) = app.get(&format!("/api/purchase-orders/{po_id}")).await;
    assert_eq!(po["items"][0]["receivedQty"], 10);
}

#[tokio::test]
async fn vendor_return_errors() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Highland Produce").await;
    let rice = app.seed_menu_item("Rice", "Dry goods", 120.0).await;
    let po = create_po(&app, &supplier, json!([{ "id": rice, "quantity": 1, "price": 50 }])).await;
    let po_id = po["id"].as_str().unwrap();

    let (status, body) = app
        .post(
            &format!("/api/purchase-orders/{po_id}/vendor-return"),
            json!({ "items": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No items to return");

    let (status, _) = app
        .post(
            &format!("/api/purchase-orders/{}/vendor-return", Uuid::new_v4()),
            json!({ "items": [{ "itemName": "Rice", "quantity": 1 }] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_purchase_order_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app
        .get(&format!("/api/purchase-orders/{}", Uuid::new_v4()))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}
