//! sea-orm entities for the hotel back office.
//!
//! Integer-keyed tables use database sequences; purchasing and stock-take
//! tables are keyed by UUID v4 generated in the service layer.

pub mod inventory;
pub mod inventory_count;
pub mod inventory_count_item;
pub mod menu_item;
pub mod notification;
pub mod order;
pub mod order_item;
pub mod payment;
pub mod purchase_order;
pub mod purchase_order_item;
pub mod reservation;
pub mod room;
pub mod room_service;
pub mod supplier;
pub mod user;
pub mod vendor_return;
pub mod vendor_return_item;
