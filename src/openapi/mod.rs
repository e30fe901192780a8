use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hotel POS API",
        version = "0.1.0",
        description = r#"
# Hotel POS back office

Rooms and reservations, restaurant orders and receipts, stock, purchasing
and payments for a single property.

## Error Handling

Failures share one body:

```json
{
  "error": "Bad Request",
  "message": "Only POs pending approval can be approved.",
  "request_id": "0b0c5b4e-6b0e-4f43-9d54-6c1f3b1f3a52",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

Every response echoes an `x-request-id` header.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "health", description = "Liveness and database check"),
        (name = "users", description = "Staff accounts"),
        (name = "rooms", description = "Rooms and their housekeeping state"),
        (name = "reservations", description = "Room bookings"),
        (name = "room-services", description = "Room service, housekeeping and maintenance requests"),
        (name = "menu", description = "Restaurant menu"),
        (name = "orders", description = "Orders and receipts"),
        (name = "payments", description = "Payments and M-Pesa"),
        (name = "inventory", description = "Stock levels"),
        (name = "inventory-counts", description = "Physical stock takes"),
        (name = "purchase-orders", description = "Purchasing, receiving and vendor returns"),
        (name = "suppliers", description = "Suppliers"),
        (name = "notifications", description = "Staff notification feed"),
        (name = "reports", description = "Sales reporting"),
        (name = "pms", description = "Property-management-system sync")
    ),
    paths(
        crate::handlers::health::health_check,

        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,

        crate::handlers::rooms::list_rooms,
        crate::handlers::rooms::create_room,
        crate::handlers::rooms::update_room,
        crate::handlers::rooms::delete_room,

        crate::handlers::reservations::list_reservations,
        crate::handlers::reservations::create_reservation,
        crate::handlers::reservations::update_reservation,

        crate::handlers::room_services::list_room_services,
        crate::handlers::room_services::list_room_services_for_room,
        crate::handlers::room_services::create_room_service,
        crate::handlers::room_services::update_room_service,
        crate::handlers::room_services::cancel_room_service,

        crate::handlers::menu::list_menu,
        crate::handlers::menu::create_menu_item,
        crate::handlers::menu::update_menu_item,
        crate::handlers::menu::delete_menu_item,

        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::create_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,
        crate::handlers::orders::order_receipt,

        crate::handlers::payments::list_payments,
        crate::handlers::payments::create_payment,
        crate::handlers::payments::update_payment,
        crate::handlers::payments::delete_payment,
        crate::handlers::payments::initiate_mpesa,
        crate::handlers::payments::mpesa_callback,

        crate::handlers::inventory::list_inventory,
        crate::handlers::inventory::low_stock,
        crate::handlers::inventory::get_inventory_item,
        crate::handlers::inventory::create_inventory_item,
        crate::handlers::inventory::update_inventory_item,
        crate::handlers::inventory::delete_inventory_item,
        crate::handlers::inventory::bulk_update_inventory,

        crate::handlers::inventory_counts::list_counts,
        crate::handlers::inventory_counts::start_count,
        crate::handlers::inventory_counts::finalize_count,

        crate::handlers::purchase_orders::list_purchase_orders,
        crate::handlers::purchase_orders::get_purchase_order,
        crate::handlers::purchase_orders::create_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order,
        crate::handlers::purchase_orders::update_purchase_order_status,
        crate::handlers::purchase_orders::approve_purchase_order,
        crate::handlers::purchase_orders::reject_purchase_order,
        crate::handlers::purchase_orders::receive_purchase_order,
        crate::handlers::purchase_orders::create_vendor_return,
        crate::handlers::purchase_orders::list_vendor_returns,

        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::get_supplier,
        crate::handlers::suppliers::create_supplier,

        crate::handlers::notifications::list_notifications,
        crate::handlers::notifications::create_notification,
        crate::handlers::notifications::mark_notification_read,
        crate::handlers::notifications::delete_notification,
        crate::handlers::notifications::delete_all_notifications,

        crate::handlers::reports::daily_report,
        crate::handlers::reports::summary_report,

        crate::handlers::pms::sync_rooms,
    ),
    components(
        schemas(
            crate::handlers::common::MessageResponse,
            crate::services::orders::Receipt,
            crate::services::reports::DailyReport,
            crate::services::reports::SummaryReport,
            crate::services::inventory::BulkUpdateResult,
            crate::services::pms::SyncResult,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
