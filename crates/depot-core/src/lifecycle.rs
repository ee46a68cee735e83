//! # Warehouse Lifecycle
//!
//! Create, Archive and Replace, plus the read accessors.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Warehouse Lifecycle (per code)                      │
//! │                                                                         │
//! │  create ──► Active₁ ──replace──► Archived₁ + Active₂ ──replace──► ...   │
//! │                │                                                        │
//! │                └──archive──► Archived₁ (terminal)                       │
//! │                                                                         │
//! │  Every operation:                                                       │
//! │    1. validate input shape                                              │
//! │    2. lock code / location keys                                         │
//! │    3. begin unit of work                                                │
//! │    4. run Validator checks against the unit                             │
//! │    5. write, commit   (any failure → unit dropped → nothing written)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `*_warehouse` functions are the operations themselves and run inside a
//! caller-provided store. [`WarehouseLifecycle`] adds locking and the unit of
//! work around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{WarehouseError, WarehouseResult};
use crate::location::LocationResolver;
use crate::locks::{code_key, location_key, KeyedLocks};
use crate::store::{UnitOfWork, WarehouseReader, WarehouseRepository, WarehouseStore};
use crate::types::{NewWarehouse, Warehouse, WarehouseRef};
use crate::validation::{validate_business_unit_code, validate_candidate, validate_location_identifier};
use crate::validator::WarehouseValidator;

// =============================================================================
// Configuration
// =============================================================================

/// Policy switches for the lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleConfig {
    /// Re-run the count/capacity check at the replacement's location,
    /// ignoring the record being replaced. Off by default: Replace only
    /// checks that the new location exists.
    pub enforce_replacement_headroom: bool,
}

impl LifecycleConfig {
    pub fn enforce_replacement_headroom(mut self, enforce: bool) -> Self {
        self.enforce_replacement_headroom = enforce;
        self
    }
}

// =============================================================================
// Operations
// =============================================================================

/// Result of a replacement: the archived predecessor and its successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub archived: Warehouse,
    pub created: Warehouse,
}

async fn find<S: WarehouseReader + ?Sized>(
    store: &mut S,
    target: &WarehouseRef,
) -> WarehouseResult<Option<Warehouse>> {
    let found = match target {
        WarehouseRef::Id(id) => store.find_by_id(*id).await?,
        WarehouseRef::Code(code) => store.find_by_business_unit_code(code).await?,
    };
    Ok(found)
}

/// Creates a warehouse.
///
/// ## Steps
/// 1. Business unit code is unused (active or archived)
/// 2. Location exists
/// 3. Location has room for one more warehouse of this capacity
/// 4. Stamp `created_at`, insert
pub async fn create_warehouse<S, L>(
    store: &mut S,
    validator: &WarehouseValidator<'_, L>,
    candidate: NewWarehouse,
    now: DateTime<Utc>,
) -> WarehouseResult<Warehouse>
where
    S: WarehouseStore + ?Sized,
    L: LocationResolver + ?Sized,
{
    validator
        .ensure_business_unit_code_unique(store, &candidate.business_unit_code)
        .await?;

    let location = validator.resolve_location_or_fail(&candidate.location)?;

    validator
        .ensure_location_has_room(store, &candidate.location, &location, candidate.capacity)
        .await?;

    Ok(store.insert(&candidate, now).await?)
}

/// Archives a warehouse and returns the archived record.
pub async fn archive_warehouse<S, L>(
    store: &mut S,
    validator: &WarehouseValidator<'_, L>,
    target: &WarehouseRef,
    now: DateTime<Utc>,
) -> WarehouseResult<Warehouse>
where
    S: WarehouseStore + ?Sized,
    L: LocationResolver + ?Sized,
{
    let mut existing = find(store, target)
        .await?
        .ok_or_else(|| WarehouseError::not_found(target))?;

    validator.ensure_not_archived(&existing)?;

    existing.archived_at = Some(now);
    store.update(&existing).await?;

    Ok(existing)
}

/// Replaces the active warehouse carrying `code` with `candidate`.
///
/// The candidate takes over `code`. Its stock must equal the predecessor's
/// stock and its capacity must hold that stock.
///
/// ## Steps
/// 1. Predecessor exists and is active
/// 2. New location exists
/// 3. `candidate.capacity >= existing.stock`
/// 4. `candidate.stock == existing.stock`
/// 5. (policy) new location has room, ignoring the predecessor
/// 6. Archive predecessor, insert successor
pub async fn replace_warehouse<S, L>(
    store: &mut S,
    validator: &WarehouseValidator<'_, L>,
    code: &str,
    candidate: NewWarehouse,
    config: &LifecycleConfig,
    now: DateTime<Utc>,
) -> WarehouseResult<Replacement>
where
    S: WarehouseStore + ?Sized,
    L: LocationResolver + ?Sized,
{
    let candidate = candidate.with_business_unit_code(code);

    let mut existing = store
        .find_by_business_unit_code(code)
        .await?
        .ok_or_else(|| WarehouseError::not_found(WarehouseRef::code(code)))?;

    validator.ensure_not_archived(&existing)?;

    let location = validator.resolve_location_or_fail(&candidate.location)?;

    if candidate.capacity < existing.stock {
        return Err(WarehouseError::CapacityTooSmall {
            capacity: candidate.capacity,
            stock: existing.stock,
        });
    }

    if candidate.stock != existing.stock {
        return Err(WarehouseError::StockMismatch {
            expected: existing.stock,
            actual: candidate.stock,
        });
    }

    if config.enforce_replacement_headroom {
        validator
            .ensure_location_has_room_excluding(
                store,
                &candidate.location,
                &location,
                candidate.capacity,
                existing.id,
            )
            .await?;
    }

    existing.archived_at = Some(now);
    store.update(&existing).await?;

    let created = store.insert(&candidate, now).await?;

    Ok(Replacement {
        archived: existing,
        created,
    })
}

// =============================================================================
// Lifecycle Service
// =============================================================================

/// Entry point for callers (HTTP handlers, CLIs, jobs).
///
/// ## Usage
/// ```rust
/// use depot_core::{InMemoryWarehouseRepository, LocationCatalog, NewWarehouse, WarehouseLifecycle};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let lifecycle = WarehouseLifecycle::new(
///     InMemoryWarehouseRepository::new(),
///     LocationCatalog::standard(),
/// );
///
/// let created = lifecycle
///     .create(NewWarehouse::new("MWH.001", "ZWOLLE-001", 40, 0))
///     .await
///     .unwrap();
/// assert!(created.is_active());
/// # });
/// ```
#[derive(Debug)]
pub struct WarehouseLifecycle<R, L, C = SystemClock> {
    repository: R,
    locations: L,
    clock: C,
    config: LifecycleConfig,
    locks: KeyedLocks,
}

impl<R, L> WarehouseLifecycle<R, L, SystemClock> {
    pub fn new(repository: R, locations: L) -> Self {
        WarehouseLifecycle {
            repository,
            locations,
            clock: SystemClock,
            config: LifecycleConfig::default(),
            locks: KeyedLocks::new(),
        }
    }
}

impl<R, L, C> WarehouseLifecycle<R, L, C> {
    /// Swaps the clock used for `created_at` / `archived_at`.
    pub fn with_clock<C2>(self, clock: C2) -> WarehouseLifecycle<R, L, C2> {
        WarehouseLifecycle {
            repository: self.repository,
            locations: self.locations,
            clock,
            config: self.config,
            locks: self.locks,
        }
    }

    pub fn with_config(mut self, config: LifecycleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn locations(&self) -> &L {
        &self.locations
    }
}

impl<R, L, C> WarehouseLifecycle<R, L, C>
where
    R: WarehouseRepository,
    L: LocationResolver,
    C: Clock,
{
    /// Creates a warehouse. See [`create_warehouse`].
    pub async fn create(&self, candidate: NewWarehouse) -> WarehouseResult<Warehouse> {
        validate_candidate(&candidate)?;

        let _locks = self
            .locks
            .acquire([
                code_key(&candidate.business_unit_code),
                location_key(&candidate.location),
            ])
            .await;

        let code = candidate.business_unit_code.clone();
        let validator = WarehouseValidator::new(&self.locations);
        let mut unit = self.repository.begin().await?;

        let created = create_warehouse(&mut unit, &validator, candidate, self.clock.now())
            .await
            .map_err(|err| rejected("create", &code, err))?;
        unit.commit().await?;

        info!(
            id = created.id,
            code = %created.business_unit_code,
            location = %created.location,
            capacity = created.capacity,
            "Warehouse created"
        );
        Ok(created)
    }

    /// Archives a warehouse addressed by id or business unit code.
    pub async fn archive(&self, target: WarehouseRef) -> WarehouseResult<()> {
        let code = match &target {
            WarehouseRef::Code(code) => code.clone(),
            WarehouseRef::Id(_) => {
                // The code is immutable, so it can be read before locking
                let mut reader = self.repository.read().await?;
                find(&mut reader, &target)
                    .await?
                    .ok_or_else(|| WarehouseError::not_found(&target))?
                    .business_unit_code
            }
        };

        let _locks = self.locks.acquire([code_key(&code)]).await;

        let validator = WarehouseValidator::new(&self.locations);
        let mut unit = self.repository.begin().await?;

        let archived = archive_warehouse(&mut unit, &validator, &target, self.clock.now())
            .await
            .map_err(|err| rejected("archive", &code, err))?;
        unit.commit().await?;

        info!(
            id = archived.id,
            code = %archived.business_unit_code,
            location = %archived.location,
            "Warehouse archived"
        );
        Ok(())
    }

    /// Replaces the active warehouse carrying `code`. See [`replace_warehouse`].
    pub async fn replace(&self, code: &str, candidate: NewWarehouse) -> WarehouseResult<Warehouse> {
        validate_business_unit_code(code)?;
        validate_location_identifier(&candidate.location)?;

        let _locks = self
            .locks
            .acquire([code_key(code), location_key(&candidate.location)])
            .await;

        let validator = WarehouseValidator::new(&self.locations);
        let mut unit = self.repository.begin().await?;

        let replacement = replace_warehouse(
            &mut unit,
            &validator,
            code,
            candidate,
            &self.config,
            self.clock.now(),
        )
        .await
        .map_err(|err| rejected("replace", code, err))?;
        unit.commit().await?;

        info!(
            code = %code,
            archived_id = replacement.archived.id,
            created_id = replacement.created.id,
            location = %replacement.created.location,
            stock = replacement.created.stock,
            "Warehouse replaced"
        );
        Ok(replacement.created)
    }

    /// Active warehouses, ordered by id.
    pub async fn list_active(&self) -> WarehouseResult<Vec<Warehouse>> {
        let mut reader = self.repository.read().await?;
        let active: Vec<Warehouse> = reader
            .list_all()
            .await?
            .into_iter()
            .filter(Warehouse::is_active)
            .collect();

        debug!(count = active.len(), "Listed active warehouses");
        Ok(active)
    }

    /// A single record, active or archived.
    pub async fn get(&self, target: &WarehouseRef) -> WarehouseResult<Warehouse> {
        let mut reader = self.repository.read().await?;
        find(&mut reader, target)
            .await?
            .ok_or_else(|| WarehouseError::not_found(target))
    }
}

fn rejected(operation: &str, code: &str, err: WarehouseError) -> WarehouseError {
    if err.is_rejection() {
        warn!(operation, code = %code, reason = %err, "Lifecycle operation rejected");
    }
    err
}

// =============================================================================
// Unit Tests
// =============================================================================
