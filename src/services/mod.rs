//! Business logic. Each service owns a shared pool handle and is cheap to clone.

// Rooms and guests
pub mod reservations;
pub mod room_services;
pub mod rooms;

// Food and beverage
pub mod menu;
pub mod orders;
pub mod payments;

// Stock and purchasing
pub mod inventory;
pub mod inventory_counts;
pub mod procurement;
pub mod suppliers;

// Back office
pub mod notifications;
pub mod reports;
pub mod users;

// External systems
pub mod mpesa;
pub mod pms;
