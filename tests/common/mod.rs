#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use hotel_pos_api::{
    app_router,
    config::AppConfig,
    db::{self, DbConfig},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

/// Application harness backed by a private in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Builds the app after letting the caller adjust configuration, e.g. to
    /// point the M-Pesa or PMS clients at a mock server.
    pub async fn with_config(configure: impl FnOnce(&mut AppConfig)) -> Self {
        let mut cfg = AppConfig::new("sqlite::memory:", "development");
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        configure(&mut cfg);

        // A single connection keeps every query on the same in-memory database.
        let pool = db::connect(&DbConfig {
            url: cfg.database_url.clone(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        })
        .await
        .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());
        Self { router, state }
    }

    /// Sends a request and returns the status with the decoded JSON body
    /// (`Value::Null` when the body is empty or not JSON).
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Creates a menu item through the API and returns its id.
    pub async fn seed_menu_item(&self, name: &str, category: &str, price: f64) -> i64 {
        let (status, body) = self
            .post(
                "/api/menu",
                serde_json::json!({ "name": name, "category": category, "price": price }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "menu create failed: {body}");
        body["id"].as_i64().expect("menu item id")
    }

    pub async fn seed_room(&self, number: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/rooms",
                serde_json::json!({ "number": number, "type": "double" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "room create failed: {body}");
        body["id"].as_i64().expect("room id")
    }

    pub async fn seed_supplier(&self, name: &str) -> String {
        let (status, body) = self
            .post("/api/suppliers", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "supplier create failed: {body}");
        body["id"].as_str().expect("supplier id").to_string()
    }

    pub async fn seed_order(&self, menu_item_id: i64, quantity: i64, price: f64) -> i64 {
        let (status, body) = self
            .post(
                "/api/orders",
                serde_json::json!({
                    "type": "restaurant",
                    "tableNumber": "T4",
                    "customerName": "Amina",
                    "items": [{ "menuItemId": menu_item_id, "quantity": quantity, "price": price }]
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "order create failed: {body}");
        body["id"].as_i64().expect("order id")
    }
}
