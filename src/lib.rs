//! Hotel POS API Library
//!
//! Back-office services for a hotel with a restaurant: rooms and
//! reservations, orders and receipts, stock, purchasing and payments.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Builds the service layer around an existing pool.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), &config);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Every resource router, to be nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/health", handlers::health::health_routes())
        .nest("/users", handlers::users::users_routes())
        .nest("/rooms", handlers::rooms::rooms_routes())
        .nest("/menu", handlers::menu::menu_routes())
        .nest("/orders", handlers::orders::orders_routes())
        .nest("/inventory", handlers::inventory::inventory_routes())
        .nest("/payments", handlers::payments::payments_routes())
        .nest("/reports", handlers::reports::reports_routes())
        .nest("/pms", handlers::pms::pms_routes())
        .nest("/room-services", handlers::room_services::room_services_routes())
        .nest("/reservations", handlers::reservations::reservations_routes())
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_orders_routes(),
        )
        .nest("/suppliers", handlers::suppliers::suppliers_routes())
        .nest(
            "/inventory-counts",
            handlers::inventory_counts::inventory_counts_routes(),
        )
        .nest(
            "/notifications",
            handlers::notifications::notifications_routes(),
        )
}

/// Full application router with docs, tracing and request ids.
///
/// CORS and compression are added by the binary so tests can drive this
/// router directly.
pub fn app_router(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/", get(|| async { "hotel-pos-api up" }))
        .nest("/api", api_routes())
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
