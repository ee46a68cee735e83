//! # Repository Ports
//!
//! The only abstractions between the lifecycle rules and storage.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WarehouseRepository::begin()          WarehouseRepository::read()      │
//! │       │                                     │                           │
//! │       ▼                                     ▼                           │
//! │  UnitOfWork (impl WarehouseStore)      Reader (impl WarehouseReader)    │
//! │  ├── find_by_business_unit_code /      └── the same reads over the      │
//! │  │   find_by_id / list_all  (reads)        last committed state; never  │
//! │  ├── insert / update        (writes)       waits on an open unit        │
//! │  │                                                                      │
//! │  ├── commit()  → every write becomes visible at once                    │
//! │  └── drop      → every write is discarded                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations: `InMemoryWarehouseRepository` (this crate) and the
//! SQLite repository in `depot-db`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{NewWarehouse, Warehouse};

// =============================================================================
// Error Types
// =============================================================================

/// Repository failures. These are infrastructure problems, never business
/// rule violations, and the lifecycle propagates them unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Storage could not be reached (closed pool, exhausted connections).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A storage-level constraint rejected the write.
    #[error("Store constraint violated: {0}")]
    Constraint(String),

    /// An update targeted a record that does not exist.
    #[error("Record {0} not found in store")]
    MissingRecord(i64),

    /// Any other backend failure.
    #[error("Store error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Ports
// =============================================================================

/// Read access to warehouse records.
#[async_trait]
pub trait WarehouseReader: Send {
    /// Looks up by business unit code.
    ///
    /// The lookup is not filtered by archival state. When several records
    /// share a code (a replaced record and its successor) the active one is
    /// returned, otherwise the most recently created one.
    async fn find_by_business_unit_code(&mut self, code: &str) -> StoreResult<Option<Warehouse>>;

    /// Looks up by surrogate id.
    async fn find_by_id(&mut self, id: i64) -> StoreResult<Option<Warehouse>>;

    /// Every record, active and archived, ordered by id.
    async fn list_all(&mut self) -> StoreResult<Vec<Warehouse>>;
}

/// Reads and writes warehouse records inside one unit of work.
#[async_trait]
pub trait WarehouseStore: WarehouseReader {
    /// Persists a candidate and returns it with its assigned id.
    async fn insert(
        &mut self,
        candidate: &NewWarehouse,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Warehouse>;

    /// Overwrites the mutable fields of an existing record.
    async fn update(&mut self, warehouse: &Warehouse) -> StoreResult<()>;
}

/// A store that can be committed.
#[async_trait]
pub trait UnitOfWork: WarehouseStore {
    /// Makes every write of this unit visible. Dropping without committing
    /// discards them.
    async fn commit(self) -> StoreResult<()>;
}

/// Opens units of work and read-only views.
#[async_trait]
pub trait WarehouseRepository: Send + Sync {
    type Unit: UnitOfWork + Send;
    type Reader: WarehouseReader + Send;

    /// Opens a unit of work. Units are serialized per repository.
    async fn begin(&self) -> StoreResult<Self::Unit>;

    /// Opens a read-only view of the committed records. Does not wait for
    /// an open unit of work.
    async fn read(&self) -> StoreResult<Self::Reader>;
}
