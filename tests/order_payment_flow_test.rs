mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn order_create_loads_lines_and_notifies_staff() {
    let app = TestApp::new().await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;

    let (status, order) = app
        .post(
            "/api/orders",
            json!({
                "type": "restaurant",
                "tableNumber": "T4",
                "customerName": "Amina",
                "items": [
                    { "menuItemId": pilau, "quantity": 2, "price": 850 },
                    { "menuItemId": 9999, "quantity": 1, "price": 10 }
                ]
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["type"], "restaurant");
    let items = order["items"].as_array().expect("items");
    assert_eq!(items.len(), 1, "unknown menu items are skipped");
    assert_eq!(items[0]["menuItem"]["name"], "Chicken Pilau");

    let (_, notifications) = app.get("/api/notifications").await;
    assert_eq!(
        notifications[0]["message"],
        "New order placed: Table T4 by Amina"
    );
    assert_eq!(notifications[0]["type"], "info");
}

#[tokio::test]
async fn order_notification_falls_back_for_missing_fields() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post("/api/orders", json!({ "type": "takeaway", "items": [] }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, notifications) = app.get("/api/notifications").await;
    assert_eq!(notifications[0]["message"], "New order placed: Table - by Guest");
}

#[tokio::test]
async fn completed_payment_stamps_paid_at_and_completes_order() {
    let app = TestApp::new().await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;
    let order_id = app.seed_order(pilau, 2, 850.0).await;

    let (status, payment) = app
        .post(
            "/api/payments",
            json!({ "orderId": order_id, "amount": 1700, "method": "cash", "status": "completed" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(payment["paidAt"].is_string(), "paidAt missing: {payment}");
    assert_eq!(payment["amount"].as_f64(), Some(1700.0));

    let (_, order) = app.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(order["status"], "completed");
    assert_eq!(order["payments"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn pending_payment_leaves_order_alone_until_updated() {
    let app = TestApp::new().await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;
    let order_id = app.seed_order(pilau, 1, 850.0).await;

    let (_, payment) = app
        .post(
            "/api/payments",
            json!({ "orderId": order_id, "amount": 850, "method": "card", "status": "pending" }),
        )
        .await;
    assert!(payment["paidAt"].is_null());
    let (_, order) = app.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(order["status"], "pending");

    let payment_id = payment["id"].as_i64().unwrap();
    let (status, updated) = app
        .put(
            &format!("/api/payments/{payment_id}"),
            json!({ "status": "completed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "completed");
    assert!(updated["paidAt"].is_string());
}

#[tokio::test]
async fn payment_for_missing_order_is_not_found() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(
            "/api/payments",
            json!({ "orderId": 404, "amount": 10, "method": "cash", "status": "completed" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn payments_list_includes_order_and_delete_is_hard() {
    let app = TestApp::new().await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;
    let order_id = app.seed_order(pilau, 1, 850.0).await;
    let (_, payment) = app
        .post(
            "/api/payments",
            json!({ "orderId": order_id, "amount": 850, "method": "wallet", "status": "pending" }),
        )
        .await;

    let (_, payments) = app.get("/api/payments").await;
    assert_eq!(payments[0]["order"]["id"].as_i64(), Some(order_id));

    let (status, body) = app
        .delete(&format!("/api/payments/{}", payment["id"]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Payment deleted");
    let (_, payments) = app.get("/api/payments").await;
    assert_eq!(payments.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn receipt_sums_lines_and_names_the_hotel() {
    let app = TestApp::with_config(|cfg| {
        cfg.hotel.name = "Lakeview Hotel".to_string();
        cfg.hotel.phone = "+254 700 000 000".to_string();
    })
    .await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;
    let chai = app.seed_menu_item("Masala Chai", "Drinks", 120.0).await;
    let (_, order) = app
        .post(
            "/api/orders",
            json!({
                "type": "restaurant",
                "tableNumber": "T1",
                "items": [
                    { "menuItemId": pilau, "quantity": 2, "price": 850 },
                    { "menuItemId": chai, "quantity": 3, "price": 120 }
                ]
            }),
        )
        .await;
    let order_id = order["id"].as_i64().unwrap();

    let (status, receipt) = app.get(&format!("/api/orders/{order_id}/receipt")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["hotel"]["name"], "Lakeview Hotel");
    assert_eq!(receipt["hotel"]["phone"], "+254 700 000 000");
    assert_eq!(receipt["order"]["staff"], "Staff");
    assert_eq!(receipt["order"]["subtotal"].as_f64(), Some(2060.0));
    assert_eq!(receipt["order"]["items"][0]["name"], "Chicken Pilau");
    assert!(receipt["thankYou"].is_string());
}

#[tokio::test]
async fn delete_order_removes_it() {
    let app = TestApp::new().await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;
    let order_id = app.seed_order(pilau, 1, 850.0).await;
    app.post(
        "/api/payments",
        json!({ "orderId": order_id, "amount": 850, "method": "cash", "status": "completed" }),
    )
    .await;

    let (status, body) = app.delete(&format!("/api/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Order deleted");

    let (status, _) = app.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, payments) = app.get("/api/payments").await;
    assert_eq!(payments.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn update_order_merges_fields() {
    let app = TestApp::new().await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;
    let order_id = app.seed_order(pilau, 1, 850.0).await;

    let (status, order) = app
        .put(
            &format!("/api/orders/{order_id}"),
            json!({ "status": "preparing" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "preparing");
    assert_eq!(order["tableNumber"], "T4");
    assert_eq!(order["customerName"], "Amina");
}
