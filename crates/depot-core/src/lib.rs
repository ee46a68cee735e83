//! # depot-core: Warehouse Lifecycle Rules
//!
//! Everything that decides whether a warehouse may be created, archived or
//! replaced. Persistence is reached only through the async ports in
//! [`store`]; this crate performs no I/O of its own.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Depot Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Callers (HTTP handlers, seed, jobs)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ depot-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ lifecycle │  │ validator │  │ location  │  │   locks   │  │   │
//! │  │   │  create   │  │  unique   │  │  catalog  │  │  keyed    │  │   │
//! │  │   │  archive  │  │  room     │  │  resolve  │  │  mutexes  │  │   │
//! │  │   │  replace  │  │  archived │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   store (ports) ◄── memory (in-process implementation)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    depot-db (Database Layer)                    │   │
//! │  │        SQLite pool, migrations, transactional repository        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Warehouse, NewWarehouse, Location, WarehouseRef
//! - [`error`] - Lifecycle errors and their API shape
//! - [`validation`] - Input shape checks (code format, required fields)
//! - [`location`] - Location Catalog
//! - [`store`] - Repository and unit-of-work ports
//! - [`memory`] - In-memory repository
//! - [`validator`] - Business-rule checks against repository state
//! - [`locks`] - Per-key async locks
//! - [`lifecycle`] - Create / Archive / Replace
//! - [`clock`] - Time source
//!
//! ## Example Usage
//!
//! ```rust
//! use depot_core::{LocationCatalog, LocationResolver};
//!
//! let catalog = LocationCatalog::standard();
//! let amsterdam = catalog.resolve("AMSTERDAM-001").unwrap();
//!
//! assert_eq!(amsterdam.max_number_of_warehouses, 5);
//! assert_eq!(amsterdam.max_capacity, 100);
//! assert!(catalog.resolve("INVALID-001").is_none());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod location;
pub mod locks;
pub mod memory;
pub mod store;
pub mod types;
pub mod validation;
pub mod validator;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    ErrorCategory, ErrorCode, ErrorResponse, ValidationError, WarehouseError, WarehouseResult,
};
pub use lifecycle::{LifecycleConfig, Replacement, WarehouseLifecycle};
pub use location::{LocationCatalog, LocationResolver};
pub use memory::InMemoryWarehouseRepository;
pub use store::{
    StoreError, StoreResult, UnitOfWork, WarehouseReader, WarehouseRepository, WarehouseStore,
};
pub use types::*;
pub use validator::WarehouseValidator;
