mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use common::TestApp;

async fn app_with_mpesa(server: &MockServer) -> TestApp {
    let base = server.uri();
    TestApp::with_config(move |cfg| {
        cfg.mpesa.base_url = base;
        cfg.mpesa.consumer_key = Some("key".into());
        cfg.mpesa.consumer_secret = Some("secret".into());
        cfg.mpesa.shortcode = Some("174379".into());
        cfg.mpesa.passkey = Some("passkey".into());
        cfg.mpesa.callback_url = Some("https://pos.example/api/payments/mpesa/callback".into());
    })
    .await
}

#[tokio::test]
async fn stk_push_passes_gateway_response_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/v1/generate"))
        .and(query_param("grant_type", "client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-123",
            "expires_in": "3599"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/mpesa/stkpush/v1/processrequest"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_partial_json(json!({
            "BusinessShortCode": "174379",
            "AccountReference": "ORDER7",
            "PhoneNumber": "254712345678"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MerchantRequestID": "29115-34620561-1",
            "CheckoutRequestID": "ws_CO_191220191020363925",
            "ResponseCode": "0"
        })))
        .mount(&server)
        .await;
    let app = app_with_mpesa(&server).await;

    let (status, body) = app
        .post(
            "/api/payments/mpesa/initiate",
            json!({ "amount": 1700, "phone": "254712345678", "orderId": 7 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ResponseCode"], "0");
    assert_eq!(body["MerchantRequestID"], "29115-34620561-1");
}

#[tokio::test]
async fn stk_push_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/oauth/v1/generate"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let app = app_with_mpesa(&server).await;

    let (status, _) = app
        .post(
            "/api/payments/mpesa/initiate",
            json!({ "amount": 100, "phone": "254712345678", "orderId": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn stk_push_without_credentials_is_unavailable() {
    let app = TestApp::new().await;
    let (status, _) = app
        .post(
            "/api/payments/mpesa/initiate",
            json!({ "amount": 100, "phone": "254712345678", "orderId": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn successful_callback_settles_matching_payment() {
    let app = TestApp::new().await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;
    let order_id = app.seed_order(pilau, 1, 850.0).await;
    let (_, payment) = app
        .post(
            "/api/payments",
            json!({
                "orderId": order_id,
                "amount": 850,
                "method": "mpesa",
                "status": "pending",
                "transactionRef": "29115-34620561-1"
            }),
        )
        .await;

    let (status, ack) = app
        .post(
            "/api/payments/mpesa/callback",
            json!({
                "Body": {
                    "stkCallback": {
                        "MerchantRequestID": "29115-34620561-1",
                        "CheckoutRequestID": "ws_CO_191220191020363925",
                        "ResultCode": 0,
                        "ResultDesc": "The service request is processed successfully.",
                        "CallbackMetadata": {
                            "Item": [
                                { "Name": "Amount", "Value": 850 },
                                { "Name": "MpesaReceiptNumber", "Value": "NLJ7RT61SV" },
                                { "Name": "PhoneNumber", "Value": 254712345678u64 }
                            ]
                        }
                    }
                }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack, json!({ "status": "ok" }));

    let (_, payments) = app.get("/api/payments").await;
    let settled = payments
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == payment["id"])
        .unwrap();
    assert_eq!(settled["status"], "completed");
    assert_eq!(settled["transactionRef"], "NLJ7RT61SV");
    assert!(settled["paidAt"].is_string());
}

#[tokio::test]
async fn callback_without_receipt_keeps_the_reference() {
    let app = TestApp::new().await;
    let pilau = app.seed_menu_item("Chicken Pilau", "Mains", 850.0).await;
    let order_id = app.seed_order(pilau, 1, 850.0).await;
    let (_, payment) = app
        .post(
            "/api/payments",
            json!({
                "orderId": order_id,
                "amount": 850,
                "method": "mpesa",
                "status": "pending",
                "transactionRef": "29115-34620561-2"
            }),
        )
        .await;

    let (status, ack) = app
        .post(
            "/api/payments/mpesa/callback",
            json!({
                "Body": {
                    "stkCallback": {
                        "MerchantRequestID": "29115-34620561-2",
                        "ResultCode": 0,
                        "ResultDesc": "The service request is processed successfully."
                    }
                }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");

    let (_, payments) = app.get("/api/payments").await;
    let settled = payments
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == payment["id"])
        .unwrap();
    assert_eq!(settled["status"], "completed");
    assert_eq!(settled["transactionRef"], "29115-34620561-2");
    assert!(settled["paidAt"].is_string());
}

#[tokio::test]
async fn failed_or_unmatched_callbacks_are_still_acknowledged() {
    let app = TestApp::new().await;

    let (status, ack) = app
        .post(
            "/api/payments/mpesa/callback",
            json!({ "Body": { "stkCallback": { "MerchantRequestID": "x", "ResultCode": 1032 } } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");

    let (status, ack) = app
        .post(
            "/api/payments/mpesa/callback",
            json!({ "Body": { "stkCallback": { "MerchantRequestID": "unknown", "ResultCode": 0 } } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");
}

#[tokio::test]
async fn pms_sync_upserts_rooms_by_number() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rooms"))
        .and(header("authorization", "Bearer pms-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rooms": [
                { "number": 101, "type": "suite", "status": "occupied" },
                { "number": "102", "type": "single", "status": "vacant" }
            ]
        })))
        .mount(&server)
        .await;
    let base = server.uri();
    let app = TestApp::with_config(move |cfg| {
        cfg.pms.api_url = Some(base);
        cfg.pms.api_key = Some("pms-key".into());
    })
    .await;
    app.seed_room("101").await;

    let (status, body) = app.post("/api/pms/sync", json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Synced 2 rooms from PMS.");

    let (_, rooms) = app.get("/api/rooms").await;
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 2);
    let room_101 = rooms.iter().find(|r| r["number"] == "101").unwrap();
    assert_eq!(room_101["type"], "suite");
    assert_eq!(room_101["status"], "occupied");
}

#[tokio::test]
async fn pms_sync_skips_rooms_with_unknown_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rooms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "number": "201", "type": "double", "status": "dirty" },
            { "number": "202", "type": "double", "status": "vacant" }
        ])))
        .mount(&server)
        .await;
    let base = server.uri();
    let app = TestApp::with_config(move |cfg| {
        cfg.pms.api_url = Some(base);
        cfg.pms.api_key = Some("pms-key".into());
    })
    .await;

    let (status, body) = app.post("/api/pms/sync", json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Synced 1 rooms from PMS.");

    let (_, rooms) = app.get("/api/rooms").await;
    let rooms = rooms.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["number"], "202");
}

#[tokio::test]
async fn pms_sync_without_config_is_unavailable() {
    let app = TestApp::new().await;
    let (status, body) = app.post("/api/pms/sync", json!({})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "PMS API config missing");
}
