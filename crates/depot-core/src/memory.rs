//! # In-Memory Repository
//!
//! A [`WarehouseRepository`] kept entirely in process memory.
//!
//! Each unit of work holds the write gate for its whole lifetime and writes
//! to a staged copy, so units are fully serialized and a dropped unit leaves
//! no trace. Readers copy the committed records and never wait on a unit.
//! Used by the tests of this crate and by anything that needs the lifecycle
//! without a database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::store::{
    StoreError, StoreResult, UnitOfWork, WarehouseReader, WarehouseRepository, WarehouseStore,
};
use crate::types::{NewWarehouse, Warehouse};

#[derive(Debug, Clone)]
struct MemoryState {
    records: Vec<Warehouse>,
    next_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        MemoryState {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

/// Repository backed by a `Vec<Warehouse>`.
///
/// Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWarehouseRepository {
    committed: Arc<RwLock<MemoryState>>,
    write_gate: Arc<Mutex<()>>,
    fail_inserts: Arc<AtomicBool>,
}

impl InMemoryWarehouseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing records, stored verbatim (ids and timestamps
    /// included). No lifecycle rule is applied to them.
    pub fn with_records(records: Vec<Warehouse>) -> Self {
        let next_id = records.iter().map(|w| w.id).max().unwrap_or(0) + 1;
        InMemoryWarehouseRepository {
            committed: Arc::new(RwLock::new(MemoryState { records, next_id })),
            ..Self::default()
        }
    }

    /// Committed records, ordered by id.
    pub async fn snapshot(&self) -> Vec<Warehouse> {
        self.committed.read().await.records.clone()
    }

    /// Makes every subsequent insert fail with `StoreError::Unavailable`.
    ///
    /// Lets callers observe how an operation behaves when its last write fails.
    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl WarehouseRepository for InMemoryWarehouseRepository {
    type Unit = InMemoryUnitOfWork;
    type Reader = InMemoryReader;

    async fn begin(&self) -> StoreResult<InMemoryUnitOfWork> {
        let gate = Arc::clone(&self.write_gate).lock_owned().await;
        let staged = self.committed.read().await.clone();
        Ok(InMemoryUnitOfWork {
            committed: Arc::clone(&self.committed),
            staged,
            fail_inserts: self.fail_inserts.load(Ordering::SeqCst),
            _gate: gate,
        })
    }

    async fn read(&self) -> StoreResult<InMemoryReader> {
        Ok(InMemoryReader {
            records: self.snapshot().await,
        })
    }
}

fn find_by_code(records: &[Warehouse], code: &str) -> Option<Warehouse> {
    records
        .iter()
        .filter(|w| w.business_unit_code == code)
        .max_by_key(|w| (w.is_active(), w.id))
        .cloned()
}

fn find_by_id(records: &[Warehouse], id: i64) -> Option<Warehouse> {
    records.iter().find(|w| w.id == id).cloned()
}

/// Copy of the committed records taken by [`WarehouseRepository::read`].
#[derive(Debug, Clone)]
pub struct InMemoryReader {
    records: Vec<Warehouse>,
}

#[async_trait]
impl WarehouseReader for InMemoryReader {
    async fn find_by_business_unit_code(&mut self, code: &str) -> StoreResult<Option<Warehouse>> {
        Ok(find_by_code(&self.records, code))
    }

    async fn find_by_id(&mut self, id: i64) -> StoreResult<Option<Warehouse>> {
        Ok(find_by_id(&self.records, id))
    }

    async fn list_all(&mut self) -> StoreResult<Vec<Warehouse>> {
        Ok(self.records.clone())
    }
}

/// Unit of work over the in-memory state.
pub struct InMemoryUnitOfWork {
    committed: Arc<RwLock<MemoryState>>,
    staged: MemoryState,
    fail_inserts: bool,
    _gate: OwnedMutexGuard<()>,
}

#[async_trait]
impl WarehouseReader for InMemoryUnitOfWork {
    async fn find_by_business_unit_code(&mut self, code: &str) -> StoreResult<Option<Warehouse>> {
        Ok(find_by_code(&self.staged.records, code))
    }

    async fn find_by_id(&mut self, id: i64) -> StoreResult<Option<Warehouse>> {
        Ok(find_by_id(&self.staged.records, id))
    }

    async fn list_all(&mut self) -> StoreResult<Vec<Warehouse>> {
        Ok(self.staged.records.clone())
    }
}

#[async_trait]
impl WarehouseStore for InMemoryUnitOfWork {
    async fn insert(
        &mut self,
        candidate: &NewWarehouse,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Warehouse> {
        if self.fail_inserts {
            return Err(StoreError::Unavailable("inserts disabled".to_string()));
        }

        let id = self.staged.next_id;
        self.staged.next_id += 1;

        let warehouse = candidate.clone().into_warehouse(id, created_at);
        self.staged.records.push(warehouse.clone());
        Ok(warehouse)
    }

    async fn update(&mut self, warehouse: &Warehouse) -> StoreResult<()> {
        let existing = self
            .staged
            .records
            .iter_mut()
            .find(|w| w.id == warehouse.id)
            .ok_or(StoreError::MissingRecord(warehouse.id))?;

        existing.location = warehouse.location.clone();
        existing.capacity = warehouse.capacity;
        existing.stock = warehouse.stock;
        existing.archived_at = warehouse.archived_at;
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self) -> StoreResult<()> {
        let InMemoryUnitOfWork {
            committed,
            staged,
            _gate,
            ..
        } = self;
        *committed.write().await = staged;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = InMemoryWarehouseRepository::new();
        let now = Utc::now();

        let mut unit = repo.begin().await.unwrap();
        let a = unit
            .insert(&NewWarehouse::new("MWH.001", "ZWOLLE-001", 40, 0), now)
            .await
            .unwrap();
        let b = unit
            .insert(&NewWarehouse::new("MWH.002", "ZWOLLE-002", 20, 0), now)
            .await
            .unwrap();
        unit.commit().await.unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(repo.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn test_dropped_unit_discards_writes() {
        let repo = InMemoryWarehouseRepository::new();

        {
            let mut unit = repo.begin().await.unwrap();
            unit.insert(&NewWarehouse::new("MWH.001", "ZWOLLE-001", 40, 0), Utc::now())
                .await
                .unwrap();
        }

        assert!(repo.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_code_prefers_active_record() {
        let now = Utc::now();
        let archived = Warehouse {
            id: 5,
            business_unit_code: "MWH.001".to_string(),
            location: "ZWOLLE-001".to_string(),
            capacity: 100,
            stock: 10,
            created_at: now,
            archived_at: Some(now),
        };
        let active = Warehouse {
            id: 3,
            archived_at: None,
            ..archived.clone()
        };
        let repo = InMemoryWarehouseRepository::with_records(vec![active, archived.clone()]);

        let mut unit = repo.begin().await.unwrap();
        let found = unit.find_by_business_unit_code("MWH.001").await.unwrap().unwrap();
        assert_eq!(found.id, 3);

        // Without an active record, the newest archived one wins
        let repo = InMemoryWarehouseRepository::with_records(vec![
            Warehouse { id: 1, ..archived.clone() },
            archived,
        ]);
        let mut unit = repo.begin().await.unwrap();
        let found = unit.find_by_business_unit_code("MWH.001").await.unwrap().unwrap();
        assert_eq!(found.id, 5);
        assert!(unit.find_by_business_unit_code("MWH.999").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_record() {
        let repo = InMemoryWarehouseRepository::new();
        let mut unit = repo.begin().await.unwrap();
        let ghost = NewWarehouse::new("MWH.404", "ZWOLLE-001", 1, 0).into_warehouse(42, Utc::now());

        assert_eq!(
            unit.update(&ghost).await.unwrap_err(),
            StoreError::MissingRecord(42)
        );
    }

    #[tokio::test]
    async fn test_with_records_continues_id_sequence() {
        let seeded = NewWarehouse::new("MWH.023", "TILBURG-001", 30, 27).into_warehouse(23, Utc::now());
        let repo = InMemoryWarehouseRepository::with_records(vec![seeded]);

        let mut unit = repo.begin().await.unwrap();
        let next = unit
            .insert(&NewWarehouse::new("MWH.024", "HELMOND-001", 10, 0), Utc::now())
            .await
            .unwrap();
        assert_eq!(next.id, 24);
    }

    #[tokio::test]
    async fn test_reader_sees_committed_state_while_unit_is_open() {
        let seeded = NewWarehouse::new("MWH.001", "ZWOLLE-001", 40, 0).into_warehouse(1, Utc::now());
        let repo = InMemoryWarehouseRepository::with_records(vec![seeded.clone()]);

        let mut unit = repo.begin().await.unwrap();
        unit.insert(&NewWarehouse::new("MWH.002", "ZWOLLE-002", 20, 0), Utc::now())
            .await
            .unwrap();

        let mut reader = tokio::time::timeout(Duration::from_millis(500), repo.read())
            .await
            .expect("read waited on the open unit")
            .unwrap();
        assert_eq!(reader.list_all().await.unwrap(), vec![seeded.clone()]);
        assert!(reader.find_by_business_unit_code("MWH.002").await.unwrap().is_none());
        assert_eq!(reader.find_by_id(1).await.unwrap(), Some(seeded));

        unit.commit().await.unwrap();
        let mut reader = repo.read().await.unwrap();
        assert_eq!(reader.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_fail_inserts() {
        let repo = InMemoryWarehouseRepository::new();
        repo.fail_inserts(true);

        let mut unit = repo.begin().await.unwrap();
        let err = unit
            .insert(&NewWarehouse::new("MWH.001", "ZWOLLE-001", 40, 0), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
