//! Operator CLI: apply migrations and load demo data.
//!
//! ```text
//! hotel-pos-cli migrate
//! hotel-pos-cli seed
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use hotel_pos_api::{
    config::{self, AppConfig},
    db::{self, DbPool},
    entities::room::RoomStatus,
    errors::ServiceError,
    services::{
        menu::{CreateMenuItemRequest, MenuService},
        rooms::{Amenities, CreateRoomRequest, RoomService},
        suppliers::{CreateSupplierRequest, SupplierService},
    },
};

#[derive(Parser)]
#[command(name = "hotel-pos-cli", about = "Hotel POS database administration", version)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Database URL; defaults to the configured database_url"
    )]
    database_url: Option<String>,
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Skip migrations before seeding"
    )]
    no_migrate: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Insert demo rooms, menu items and a supplier
    Seed,
}

const DEMO_ROOMS: &[(&str, &str, &str)] = &[
    ("101", "single", "Single"),
    ("102", "double", "Queen"),
    ("103", "double", "Queen"),
    ("201", "suite", "King"),
    ("202", "family", "Twin"),
];

const DEMO_MENU: &[(&str, &str, Decimal)] = &[
    ("Chicken Pilau", "Mains", dec!(850)),
    ("Beef Stew", "Mains", dec!(780)),
    ("Vegetable Samosa", "Starters", dec!(150)),
    ("Masala Chai", "Drinks", dec!(120)),
    ("Fresh Passion Juice", "Drinks", dec!(250)),
    ("Mandazi", "Bakery", dec!(60)),
];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), false);
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }

    let pool = Arc::new(
        db::connect_with(&cfg)
            .await
            .context("failed to connect to database")?,
    );

    match cli.command {
        Commands::Migrate => {
            db::run_migrations(&pool).await.context("migrations failed")?;
            println!("Migrations applied");
        }
        Commands::Seed => {
            if !cli.no_migrate {
                db::run_migrations(&pool).await.context("migrations failed")?;
            }
            seed(pool, &cfg).await?;
        }
    }

    Ok(())
}

async fn seed(pool: Arc<DbPool>, cfg: &AppConfig) -> Result<()> {
    info!(hotel = %cfg.hotel.name, "seeding demo data");

    let rooms = RoomService::new(pool.clone());
    let mut created_rooms = 0;
    for (number, room_type, bed_type) in DEMO_ROOMS {
        let request = CreateRoomRequest {
            number: number.to_string(),
            room_type: room_type.to_string(),
            status: Some(RoomStatus::Vacant),
            guest_name: None,
            notes: None,
            description: Some(format!("{} room", room_type)),
            facilities: Some("Wi-Fi, TV, Kettle".to_string()),
            bed_type: Some(bed_type.to_string()),
            amenities: Amenities {
                free_wifi: Some(true),
                flat_screen_tv: Some(true),
                electric_kettle: Some(true),
                ..Default::default()
            },
        };
        match rooms.create(request).await {
            Ok(_) => created_rooms += 1,
            Err(ServiceError::Conflict(_)) => {}
            Err(e) => return Err(e).context("failed to seed rooms"),
        }
    }

    let menu = MenuService::new(pool.clone());
    let existing: Vec<String> = menu
        .list()
        .await
        .context("failed to read menu")?
        .into_iter()
        .map(|item| item.name)
        .collect();
    let mut created_items = 0;
    for (name, category, price) in DEMO_MENU {
        if existing.iter().any(|n| n == name) {
            continue;
        }
        menu.create(CreateMenuItemRequest {
            name: name.to_string(),
            category: category.to_string(),
            price: *price,
            is_available: Some(true),
        })
        .await
        .context("failed to seed menu")?;
        created_items += 1;
    }

    let suppliers = SupplierService::new(pool);
    let has_supplier = suppliers
        .list()
        .await
        .context("failed to read suppliers")?
        .iter()
        .any(|s| s.name == "Highland Fresh Produce");
    if !has_supplier {
        suppliers
            .create(CreateSupplierRequest {
                name: "Highland Fresh Produce".to_string(),
                contact_name: Some("Purchasing Desk".to_string()),
                email: Some("orders@highlandfresh.example".to_string()),
                phone: Some("+254700000100".to_string()),
                address: Some("Wakulima Market, Nairobi".to_string()),
            })
            .await
            .context("failed to seed supplier")?;
    }

    println!(
        "Seeded {} rooms, {} menu items{}",
        created_rooms,
        created_items,
        if has_supplier { "" } else { " and 1 supplier" }
    );
    Ok(())
}
