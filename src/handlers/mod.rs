pub mod common;
pub mod health;
pub mod inventory;
pub mod inventory_counts;
pub mod menu;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod pms;
pub mod purchase_orders;
pub mod reports;
pub mod reservations;
pub mod room_services;
pub mod rooms;
pub mod suppliers;
pub mod users;

use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        inventory::InventoryService, inventory_counts::InventoryCountService, menu::MenuService,
        mpesa::MpesaService, notifications::NotificationService, orders::OrderService,
        payments::PaymentService, pms::PmsService, procurement::ProcurementService,
        reports::ReportService, reservations::ReservationService,
        room_services::RoomRequestService, rooms::RoomService, suppliers::SupplierService,
        users::UserService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub rooms: Arc<RoomService>,
    pub reservations: Arc<ReservationService>,
    pub room_requests: Arc<RoomRequestService>,
    pub menu: Arc<MenuService>,
    pub orders: Arc<OrderService>,
    pub payments: Arc<PaymentService>,
    pub inventory: Arc<InventoryService>,
    pub inventory_counts: Arc<InventoryCountService>,
    pub procurement: Arc<ProcurementService>,
    pub suppliers: Arc<SupplierService>,
    pub notifications: Arc<NotificationService>,
    pub users: Arc<UserService>,
    pub reports: Arc<ReportService>,
    pub mpesa: Arc<MpesaService>,
    pub pms: Arc<PmsService>,
}

impl AppServices {
    /// Wires every service against one pool and the loaded configuration.
    pub fn new(db_pool: Arc<DbPool>, config: &AppConfig) -> Self {
        let rooms = RoomService::new(db_pool.clone());
        let payments = PaymentService::new(db_pool.clone());

        Self {
            reservations: Arc::new(ReservationService::new(db_pool.clone())),
            room_requests: Arc::new(RoomRequestService::new(db_pool.clone())),
            menu: Arc::new(MenuService::new(db_pool.clone())),
            orders: Arc::new(OrderService::new(db_pool.clone(), config.hotel.clone())),
            inventory: Arc::new(InventoryService::new(db_pool.clone())),
            inventory_counts: Arc::new(InventoryCountService::new(db_pool.clone())),
            procurement: Arc::new(ProcurementService::new(db_pool.clone(), config.vat_rate)),
            suppliers: Arc::new(SupplierService::new(db_pool.clone())),
            notifications: Arc::new(NotificationService::new(db_pool.clone())),
            users: Arc::new(UserService::new(db_pool.clone())),
            reports: Arc::new(ReportService::new(db_pool)),
            mpesa: Arc::new(MpesaService::new(config.mpesa.clone(), payments.clone())),
            pms: Arc::new(PmsService::new(config.pms.clone(), rooms.clone())),
            rooms: Arc::new(rooms),
            payments: Arc::new(payments),
        }
    }
}
