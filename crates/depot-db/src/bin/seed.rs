//! # Seed Data Generator
//!
//! Populates an empty database with demo warehouses for development.
//!
//! ## Usage
//! ```bash
//! # Seed the database named by DEPOT_DATABASE_PATH (default ./depot.db)
//! cargo run -p depot-db --bin seed
//!
//! # Specify database path
//! cargo run -p depot-db --bin seed -- --db ./data/depot.db
//!
//! # Print the resulting active warehouses as JSON
//! cargo run -p depot-db --bin seed -- --json
//! ```
//!
//! ## Generated Warehouses
//! Every record goes through the lifecycle, so the location limits hold:
//! - `MWH.001` at VETSBY-001, capacity 90, stock 10
//! - `MWH.012` at AMSTERDAM-001, capacity 50, stock 5
//! - `MWH.023` at TILBURG-001, capacity 30, stock 27

use std::env;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use depot_core::{NewWarehouse, Warehouse};
use depot_db::{Database, DepotConfig};

/// Demo warehouses: (code, location, capacity, stock)
const DEMO_WAREHOUSES: &[(&str, &str, u32, u32)] = &[
    ("MWH.001", "VETSBY-001", 90, 10),
    ("MWH.012", "AMSTERDAM-001", 50, 5),
    ("MWH.023", "TILBURG-001", 30, 27),
];

/// Printed with `--json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedSummary {
    database: String,
    created: usize,
    skipped: bool,
    active: Vec<Warehouse>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config = DepotConfig::load()?;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("Depot Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: $DEPOT_DATABASE_PATH or ./depot.db)");
                println!("      --json         Print the active warehouses as JSON");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let database = config.database.database_path.display().to_string();
    if !json {
        println!("🌱 Depot Seed Data Generator");
        println!("============================");
        println!("Database: {}", database);
        println!();
    }

    // Migrations are always needed before seeding
    let db = Database::new(config.database.run_migrations(true)).await?;
    let lifecycle = db.lifecycle(config.lifecycle);

    let existing = db.warehouses().count().await?;
    let mut created = 0;

    if existing > 0 {
        info!(existing, "Database already seeded");
        if !json {
            println!("⚠ Database already has {} warehouses", existing);
            println!("  Skipping seed to avoid duplicates.");
            println!("  Delete the database file to regenerate.");
        }
    } else {
        for (code, location, capacity, stock) in DEMO_WAREHOUSES {
            match lifecycle
                .create(NewWarehouse::new(*code, *location, *capacity, *stock))
                .await
            {
                Ok(warehouse) => {
                    created += 1;
                    if !json {
                        println!(
                            "✓ {} at {} (capacity {}, stock {})",
                            warehouse.business_unit_code,
                            warehouse.location,
                            warehouse.capacity,
                            warehouse.stock
                        );
                    }
                }
                Err(e) => eprintln!("Failed to create {}: {}", code, e),
            }
        }
    }

    let active = lifecycle.list_active().await?;

    if json {
        let summary = SeedSummary {
            database,
            created,
            skipped: existing > 0,
            active,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        println!("✓ Seed complete: {} created, {} active", created, active.len());
    }

    db.close().await;
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=depot_core=trace` - Show trace for the lifecycle only
/// - Default: `info,depot=debug,sqlx=warn`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,depot=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
