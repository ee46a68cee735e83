//! # Repository Module
//!
//! SQLite adapters for the depot-core repository ports.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  WarehouseLifecycle (depot-core)                                        │
//! │       │                                                                 │
//! │       │  repository.begin() → unit of work                              │
//! │       ▼                                                                 │
//! │  SqliteWarehouseRepository                                              │
//! │  ├── begin(&self)                 → SqliteUnitOfWork (one transaction)  │
//! │  ├── count / count_active_at      (diagnostics, pool-level reads)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteUnitOfWork                                                       │
//! │  ├── find_by_business_unit_code / find_by_id / list_all                 │
//! │  ├── insert / update                                                    │
//! │  └── commit                                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`warehouse::SqliteWarehouseRepository`] - Warehouse records

pub mod warehouse;
