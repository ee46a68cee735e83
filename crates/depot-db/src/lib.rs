//! # depot-db: Database Layer for Depot
//!
//! SQLite persistence for warehouse records, implementing the repository
//! ports of depot-core with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Depot Data Flow                                  │
//! │                                                                         │
//! │  lifecycle.replace("MWH.001", candidate)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     depot-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (warehouse.rs)│    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ UnitOfWork =  │    │ 001_ware-    │  │   │
//! │  │   │ DbConfig      │    │ Transaction   │    │ houses.sql   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`config`] - Environment configuration
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use depot_core::NewWarehouse;
//! use depot_db::{Database, DepotConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DepotConfig::load()?;
//! let db = Database::new(config.database).await?;
//! let lifecycle = db.lifecycle(config.lifecycle);
//!
//! lifecycle
//!     .create(NewWarehouse::new("MWH.001", "ZWOLLE-001", 40, 0))
//!     .await?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, DepotConfig};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::warehouse::{SqliteReader, SqliteUnitOfWork, SqliteWarehouseRepository};
