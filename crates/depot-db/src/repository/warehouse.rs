//! # Warehouse Repository
//!
//! SQLite implementation of the depot-core repository ports.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SqliteWarehouseRepository::begin()                                     │
//! │       │                                                                 │
//! │       ├── wait for the write gate (one open unit at a time)             │
//! │       └── pool.begin()  → BEGIN                                         │
//! │                                                                         │
//! │  SqliteUnitOfWork                                                       │
//! │       ├── SELECT / INSERT / UPDATE on the transaction                   │
//! │       ├── commit()  → COMMIT, gate released                             │
//! │       └── drop      → ROLLBACK, gate released                           │
//! │                                                                         │
//! │  SqliteWarehouseRepository::read()                                      │
//! │       └── SqliteReader: single SELECTs on the pool, no gate             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite admits a single writer. Units are serialized in-process so a
//! deferred transaction never has to upgrade a read snapshot another
//! connection has since committed over. Readers only see committed rows
//! (WAL), so they skip the gate.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use depot_core::{
    NewWarehouse, StoreError, StoreResult, UnitOfWork, Warehouse, WarehouseReader,
    WarehouseRepository, WarehouseStore,
};

use crate::error::{DbError, DbResult};

const FIND_BY_CODE: &str = r#"
    SELECT id, business_unit_code, location, capacity, stock, created_at, archived_at
    FROM warehouses
    WHERE business_unit_code = ?1
    ORDER BY (archived_at IS NULL) DESC, id DESC
    LIMIT 1
"#;

const FIND_BY_ID: &str = r#"
    SELECT id, business_unit_code, location, capacity, stock, created_at, archived_at
    FROM warehouses
    WHERE id = ?1
"#;

const LIST_ALL: &str = r#"
    SELECT id, business_unit_code, location, capacity, stock, created_at, archived_at
    FROM warehouses
    ORDER BY id
"#;

fn store_error(err: sqlx::Error) -> StoreError {
    DbError::from(err).into()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for warehouse records.
///
/// Clones share the pool and the write gate.
#[derive(Debug, Clone)]
pub struct SqliteWarehouseRepository {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
}

impl SqliteWarehouseRepository {
    /// Creates a new SqliteWarehouseRepository with its own write gate.
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_write_gate(pool, Arc::new(Mutex::new(())))
    }

    /// Creates a repository whose units serialize with every other holder
    /// of `write_gate`.
    pub fn with_write_gate(pool: SqlitePool, write_gate: Arc<Mutex<()>>) -> Self {
        SqliteWarehouseRepository { pool, write_gate }
    }

    /// Number of records, active and archived.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM warehouses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of active records at `location`.
    pub async fn count_active_at(&self, location: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM warehouses WHERE location = ?1 AND archived_at IS NULL",
        )
        .bind(location)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

#[async_trait]
impl WarehouseRepository for SqliteWarehouseRepository {
    type Unit = SqliteUnitOfWork;
    type Reader = SqliteReader;

    async fn begin(&self) -> StoreResult<SqliteUnitOfWork> {
        let gate = Arc::clone(&self.write_gate).lock_owned().await;
        let tx = self.pool.begin().await.map_err(store_error)?;

        Ok(SqliteUnitOfWork { tx, _gate: gate })
    }

    async fn read(&self) -> StoreResult<SqliteReader> {
        Ok(SqliteReader {
            pool: self.pool.clone(),
        })
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Reads committed rows straight from the pool, one statement each.
#[derive(Debug, Clone)]
pub struct SqliteReader {
    pool: SqlitePool,
}

#[async_trait]
impl WarehouseReader for SqliteReader {
    async fn find_by_business_unit_code(&mut self, code: &str) -> StoreResult<Option<Warehouse>> {
        sqlx::query_as::<_, Warehouse>(FIND_BY_CODE)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn find_by_id(&mut self, id: i64) -> StoreResult<Option<Warehouse>> {
        sqlx::query_as::<_, Warehouse>(FIND_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)
    }

    async fn list_all(&mut self) -> StoreResult<Vec<Warehouse>> {
        sqlx::query_as::<_, Warehouse>(LIST_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)
    }
}

// =============================================================================
// Unit of Work
// =============================================================================

/// One SQLite transaction. Dropping it without [`UnitOfWork::commit`] rolls
/// back.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
    _gate: OwnedMutexGuard<()>,
}

#[async_trait]
impl WarehouseReader for SqliteUnitOfWork {
    async fn find_by_business_unit_code(&mut self, code: &str) -> StoreResult<Option<Warehouse>> {
        sqlx::query_as::<_, Warehouse>(FIND_BY_CODE)
            .bind(code)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_error)
    }

    async fn find_by_id(&mut self, id: i64) -> StoreResult<Option<Warehouse>> {
        sqlx::query_as::<_, Warehouse>(FIND_BY_ID)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(store_error)
    }

    async fn list_all(&mut self) -> StoreResult<Vec<Warehouse>> {
        sqlx::query_as::<_, Warehouse>(LIST_ALL)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl WarehouseStore for SqliteUnitOfWork {
    async fn insert(
        &mut self,
        candidate: &NewWarehouse,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Warehouse> {
        debug!(
            code = %candidate.business_unit_code,
            location = %candidate.location,
            "Inserting warehouse"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO warehouses (
                business_unit_code, location, capacity, stock, created_at, archived_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, NULL)
            "#,
        )
        .bind(&candidate.business_unit_code)
        .bind(&candidate.location)
        .bind(candidate.capacity)
        .bind(candidate.stock)
        .bind(created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(store_error)?;

        Ok(candidate
            .clone()
            .into_warehouse(result.last_insert_rowid(), created_at))
    }

    async fn update(&mut self, warehouse: &Warehouse) -> StoreResult<()> {
        debug!(id = warehouse.id, code = %warehouse.business_unit_code, "Updating warehouse");

        let result = sqlx::query(
            r#"
            UPDATE warehouses
            SET location = ?1, capacity = ?2, stock = ?3, archived_at = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&warehouse.location)
        .bind(warehouse.capacity)
        .bind(warehouse.stock)
        .bind(warehouse.archived_at)
        .bind(warehouse.id)
        .execute(&mut *self.tx)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::MissingRecord(warehouse.id));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for SqliteUnitOfWork {
    async fn commit(self) -> StoreResult<()> {
        let SqliteUnitOfWork { tx, _gate } = self;
        tx.commit().await.map_err(store_error)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
