use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_and_rooms::Migration),
            Box::new(m20240101_000002_create_menu_and_orders::Migration),
            Box::new(m20240101_000003_create_inventory_tables::Migration),
            Box::new(m20240101_000004_create_reservations_and_room_services::Migration),
            Box::new(m20240101_000005_create_procurement_tables::Migration),
            Box::new(m20240101_000006_create_notifications_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_users_and_rooms {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_and_rooms"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Rooms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Rooms::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Rooms::Number).string().not_null().unique_key())
                        .col(ColumnDef::new(Rooms::Type).string().not_null())
                        .col(ColumnDef::new(Rooms::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Rooms::GuestName).string().null())
                        .col(ColumnDef::new(Rooms::ReservationId).integer().null())
                        .col(ColumnDef::new(Rooms::MaintenanceStatus).string_len(20).null())
                        .col(
                            ColumnDef::new(Rooms::LastCleaned)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Rooms::Notes).text().null())
                        .col(ColumnDef::new(Rooms::Description).text().null())
                        .col(ColumnDef::new(Rooms::Facilities).text().null())
                        .col(ColumnDef::new(Rooms::BedType).string().null())
                        .col(flag(Rooms::Balcony))
                        .col(flag(Rooms::View))
                        .col(flag(Rooms::AirConditioning))
                        .col(flag(Rooms::FlatScreenTv))
                        .col(flag(Rooms::FreeWifi))
                        .col(flag(Rooms::ElectricKettle))
                        .col(flag(Rooms::Wardrobe))
                        .col(flag(Rooms::ClothesRack))
                        .col(flag(Rooms::Fan))
                        .col(
                            ColumnDef::new(Rooms::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Rooms::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_rooms_status")
                        .table(Rooms::Table)
                        .col(Rooms::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Rooms::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    fn flag(column: Rooms) -> ColumnDef {
        ColumnDef::new(column)
            .boolean()
            .not_null()
            .default(false)
            .to_owned()
    }

    #[derive(DeriveIden)]
    pub enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        Role,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum Rooms {
        Table,
        Id,
        Number,
        Type,
        Status,
        GuestName,
        ReservationId,
        MaintenanceStatus,
        LastCleaned,
        Notes,
        Description,
        Facilities,
        BedType,
        Balcony,
        View,
        AirConditioning,
        FlatScreenTv,
        FreeWifi,
        ElectricKettle,
        Wardrobe,
        ClothesRack,
        Fan,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_menu_and_orders {
    use super::m20240101_000001_create_users_and_rooms::{Rooms, Users};
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_menu_and_orders"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MenuItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MenuItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(MenuItems::Name).string().not_null())
                        .col(ColumnDef::new(MenuItems::Category).string().not_null())
                        .col(ColumnDef::new(MenuItems::Price).decimal_len(10, 2).not_null())
                        .col(
                            ColumnDef::new(MenuItems::IsAvailable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(MenuItems::IsDeleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Orders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Orders::Type).string_len(20).not_null())
                        .col(ColumnDef::new(Orders::RoomId).integer().null())
                        .col(ColumnDef::new(Orders::CreatedById).integer().null())
                        .col(ColumnDef::new(Orders::TableNumber).string().null())
                        .col(ColumnDef::new(Orders::CustomerName).string().null())
                        .col(ColumnDef::new(Orders::Status).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Orders::Location)
                                .string_len(20)
                                .not_null()
                                .default("indoor"),
                        )
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_room_id")
                                .from(Orders::Table, Orders::RoomId)
                                .to(Rooms::Table, Rooms::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_orders_created_by_id")
                                .from(Orders::Table, Orders::CreatedById)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_created_at")
                        .table(Orders::Table)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(OrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::MenuItemId).integer().not_null())
                        .col(ColumnDef::new(OrderItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(OrderItems::Price).decimal_len(10, 2).not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_order_id")
                                .from(OrderItems::Table, OrderItems::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_order_items_menu_item_id")
                                .from(OrderItems::Table, OrderItems::MenuItemId)
                                .to(MenuItems::Table, MenuItems::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Payments::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Payments::OrderId).integer().not_null())
                        .col(ColumnDef::new(Payments::Amount).decimal_len(10, 2).not_null())
                        .col(ColumnDef::new(Payments::Method).string_len(20).not_null())
                        .col(ColumnDef::new(Payments::Status).string_len(20).not_null())
                        .col(ColumnDef::new(Payments::TransactionRef).string().null())
                        .col(
                            ColumnDef::new(Payments::PaidAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payments_order_id")
                                .from(Payments::Table, Payments::OrderId)
                                .to(Orders::Table, Orders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payments_transaction_ref")
                        .table(Payments::Table)
                        .col(Payments::TransactionRef)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(Payments::Table)
                        .table(OrderItems::Table)
                        .table(Orders::Table)
                        .table(MenuItems::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum MenuItems {
        Table,
        Id,
        Name,
        Category,
        Price,
        IsAvailable,
        IsDeleted,
    }

    #[derive(DeriveIden)]
    enum Orders {
        Table,
        Id,
        Type,
        RoomId,
        CreatedById,
        TableNumber,
        CustomerName,
        Status,
        Location,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum OrderItems {
        Table,
        Id,
        OrderId,
        MenuItemId,
        Quantity,
        Price,
    }

    #[derive(DeriveIden)]
    enum Payments {
        Table,
        Id,
        OrderId,
        Amount,
        Method,
        Status,
        TransactionRef,
        PaidAt,
    }
}

mod m20240101_000003_create_inventory_tables {
    use super::m20240101_000001_create_users_and_rooms::Users;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Inventory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Inventory::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Inventory::Name).string().not_null())
                        .col(
                            ColumnDef::new(Inventory::Quantity)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Inventory::Unit).string().not_null())
                        .col(
                            ColumnDef::new(Inventory::MinThreshold)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Inventory::Category)
                                .string()
                                .not_null()
                                .default("General"),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_inventory_name")
                        .table(Inventory::Table)
                        .col(Inventory::Name)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryCounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryCounts::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryCounts::Status)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryCounts::Comment).text().null())
                        .col(ColumnDef::new(InventoryCounts::PerformedById).integer().null())
                        .col(
                            ColumnDef::new(InventoryCounts::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_counts_performed_by_id")
                                .from(InventoryCounts::Table, InventoryCounts::PerformedById)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(InventoryCountItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryCountItems::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(InventoryCountItems::CountId).uuid().not_null())
                        .col(ColumnDef::new(InventoryCountItems::ItemName).string().not_null())
                        .col(
                            ColumnDef::new(InventoryCountItems::ExpectedQty)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryCountItems::CountedQty)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(InventoryCountItems::Variance)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_count_items_count_id")
                                .from(InventoryCountItems::Table, InventoryCountItems::CountId)
                                .to(InventoryCounts::Table, InventoryCounts::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(InventoryCountItems::Table)
                        .table(InventoryCounts::Table)
                        .table(Inventory::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Inventory {
        Table,
        Id,
        Name,
        Quantity,
        Unit,
        MinThreshold,
        Category,
    }

    #[derive(DeriveIden)]
    enum InventoryCounts {
        Table,
        Id,
        Status,
        Comment,
        PerformedById,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum InventoryCountItems {
        Table,
        Id,
        CountId,
        ItemName,
        ExpectedQty,
        CountedQty,
        Variance,
    }
}

mod m20240101_000004_create_reservations_and_room_services {
    use super::m20240101_000001_create_users_and_rooms::Rooms;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_reservations_and_room_services"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Reservations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Reservations::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Reservations::RoomId).integer().not_null())
                        .col(ColumnDef::new(Reservations::GuestName).string().not_null())
                        .col(ColumnDef::new(Reservations::CheckIn).date().not_null())
                        .col(ColumnDef::new(Reservations::CheckOut).date().not_null())
                        .col(ColumnDef::new(Reservations::ContactInfo).string().null())
                        .col(ColumnDef::new(Reservations::SpecialRequests).text().null())
                        .col(
                            ColumnDef::new(Reservations::Status)
                                .string_len(20)
                                .not_null()
                                .default("reserved"),
                        )
                        .col(
                            ColumnDef::new(Reservations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reservations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_reservations_room_id")
                                .from(Reservations::Table, Reservations::RoomId)
                                .to(Rooms::Table, Rooms::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reservations_room_id")
                        .table(Reservations::Table)
                        .col(Reservations::RoomId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(RoomServices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RoomServices::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(RoomServices::RoomId).integer().not_null())
                        .col(ColumnDef::new(RoomServices::Type).string_len(20).not_null())
                        .col(ColumnDef::new(RoomServices::Status).string_len(20).not_null())
                        .col(
                            ColumnDef::new(RoomServices::RequestedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RoomServices::CompletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(RoomServices::Notes).text().null())
                        .col(
                            ColumnDef::new(RoomServices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RoomServices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_room_services_room_id")
                                .from(RoomServices::Table, RoomServices::RoomId)
                                .to(Rooms::Table, Rooms::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RoomServices::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Reservations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Reservations {
        Table,
        Id,
        RoomId,
        GuestName,
        CheckIn,
        CheckOut,
        ContactInfo,
        SpecialRequests,
        Status,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum RoomServices {
        Table,
        Id,
        RoomId,
        Type,
        Status,
        RequestedAt,
        CompletedAt,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_procurement_tables {
    use super::m20240101_000001_create_users_and_rooms::Users;
    use super::m20240101_000002_create_menu_and_orders::MenuItems;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_procurement_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Suppliers::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactName).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::SupplierId).uuid().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Status)
                                .string_len(32)
                                .not_null()
                                .default("Draft"),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Subtotal)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Tax)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Total)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Notes).text().null())
                        .col(ColumnDef::new(PurchaseOrders::CreatedById).integer().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_supplier_id")
                                .from(PurchaseOrders::Table, PurchaseOrders::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_created_by_id")
                                .from(PurchaseOrders::Table, PurchaseOrders::CreatedById)
                                .to(Users::Table, Users::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::PurchaseOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::MenuItemId)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrderItems::Quantity).integer().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Price)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::Total)
                                .decimal_len(12, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrderItems::ReceivedQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_order_items_purchase_order_id")
                                .from(PurchaseOrderItems::Table, PurchaseOrderItems::PurchaseOrderId)
                                .to(PurchaseOrders::Table, PurchaseOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_order_items_menu_item_id")
                                .from(PurchaseOrderItems::Table, PurchaseOrderItems::MenuItemId)
                                .to(MenuItems::Table, MenuItems::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(VendorReturns::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(VendorReturns::Id).uuid().not_null().primary_key())
                        .col(ColumnDef::new(VendorReturns::PurchaseOrderId).uuid().not_null())
                        .col(ColumnDef::new(VendorReturns::SupplierId).uuid().not_null())
                        .col(ColumnDef::new(VendorReturns::Reason).text().null())
                        .col(
                            ColumnDef::new(VendorReturns::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vendor_returns_purchase_order_id")
                                .from(VendorReturns::Table, VendorReturns::PurchaseOrderId)
                                .to(PurchaseOrders::Table, PurchaseOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vendor_returns_supplier_id")
                                .from(VendorReturns::Table, VendorReturns::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(VendorReturnItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(VendorReturnItems::Id)
                                .uuid()
                                .not_null()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(VendorReturnItems::VendorReturnId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(VendorReturnItems::ItemName).string().not_null())
                        .col(
                            ColumnDef::new(VendorReturnItems::Quantity)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vendor_return_items_vendor_return_id")
                                .from(VendorReturnItems::Table, VendorReturnItems::VendorReturnId)
                                .to(VendorReturns::Table, VendorReturns::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(VendorReturnItems::Table)
                        .table(VendorReturns::Table)
                        .table(PurchaseOrderItems::Table)
                        .table(PurchaseOrders::Table)
                        .table(Suppliers::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        Name,
        ContactName,
        Email,
        Phone,
        Address,
    }

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        Id,
        SupplierId,
        OrderDate,
        Status,
        Subtotal,
        Tax,
        Total,
        Notes,
        CreatedById,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseOrderItems {
        Table,
        Id,
        PurchaseOrderId,
        MenuItemId,
        Quantity,
        Price,
        Total,
        ReceivedQty,
    }

    #[derive(DeriveIden)]
    enum VendorReturns {
        Table,
        Id,
        PurchaseOrderId,
        SupplierId,
        Reason,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum VendorReturnItems {
        Table,
        Id,
        VendorReturnId,
        ItemName,
        Quantity,
    }
}

mod m20240101_000006_create_notifications_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_notifications_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Notifications::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Notifications::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Notifications::Type).string_len(16).not_null())
                        .col(ColumnDef::new(Notifications::Message).text().not_null())
                        .col(
                            ColumnDef::new(Notifications::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Notifications::Read)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notifications::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Notifications {
        Table,
        Id,
        Type,
        Message,
        CreatedAt,
        Read,
    }
}
