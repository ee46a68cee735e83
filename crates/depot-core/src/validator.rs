//! # Warehouse Validator
//!
//! Decides whether a proposed create/archive/replace is admissible given the
//! current repository state and the Location Catalog.
//!
//! Each check returns a typed [`WarehouseError`] instead of a boolean so the
//! caller can surface the reason.
//!
//! ## Location Headroom
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ensure_location_has_room("AMSTERDAM-001", location, 30)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  tally active records at AMSTERDAM-001  → count = 1, capacity = 80      │
//! │       │                                                                 │
//! │       ├── count >= max warehouses (5)?   → TooManyWarehouses            │
//! │       │                                                                 │
//! │       ├── 80 + 30 > max capacity (100)?  → CapacityExceeded             │
//! │       │                                                                 │
//! │       └── OK                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::{WarehouseError, WarehouseResult};
use crate::location::LocationResolver;
use crate::store::WarehouseReader;
use crate::types::{Location, Warehouse};

// =============================================================================
// Location Usage
// =============================================================================

/// Aggregate over the active warehouses of one location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationUsage {
    pub active_warehouses: u32,
    pub total_capacity: u64,
}

impl LocationUsage {
    /// Tallies the active records at `identifier`, skipping the record whose id
    /// is `excluding`.
    pub fn tally<'a>(
        warehouses: impl IntoIterator<Item = &'a Warehouse>,
        identifier: &str,
        excluding: Option<i64>,
    ) -> Self {
        warehouses
            .into_iter()
            .filter(|w| w.is_active_at(identifier) && Some(w.id) != excluding)
            .fold(LocationUsage::default(), |usage, w| LocationUsage {
                active_warehouses: usage.active_warehouses + 1,
                total_capacity: usage.total_capacity + u64::from(w.capacity),
            })
    }

    /// Checks that one more warehouse with `additional_capacity` fits.
    ///
    /// The count check runs first; either failing rejects the candidate.
    pub fn admit(&self, location: &Location, additional_capacity: u32) -> WarehouseResult<()> {
        if self.active_warehouses >= location.max_number_of_warehouses {
            return Err(WarehouseError::TooManyWarehouses {
                location: location.identification.clone(),
                max: location.max_number_of_warehouses,
            });
        }

        let requested_total = self.total_capacity + u64::from(additional_capacity);
        if requested_total > u64::from(location.max_capacity) {
            return Err(WarehouseError::CapacityExceeded {
                location: location.identification.clone(),
                requested_total,
                max: location.max_capacity,
            });
        }

        Ok(())
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Business-rule checks shared by the lifecycle operations.
#[derive(Debug)]
pub struct WarehouseValidator<'a, L: ?Sized> {
    locations: &'a L,
}

impl<'a, L: LocationResolver + ?Sized> WarehouseValidator<'a, L> {
    pub fn new(locations: &'a L) -> Self {
        WarehouseValidator { locations }
    }

    /// Fails with `DuplicateCode` if any record, active or archived, carries
    /// `code`.
    pub async fn ensure_business_unit_code_unique<S: WarehouseReader + ?Sized>(
        &self,
        store: &mut S,
        code: &str,
    ) -> WarehouseResult<()> {
        if store.find_by_business_unit_code(code).await?.is_some() {
            return Err(WarehouseError::DuplicateCode {
                code: code.to_string(),
            });
        }
        Ok(())
    }

    /// Returns the location, or fails with `UnknownLocation`.
    pub fn resolve_location_or_fail(&self, identifier: &str) -> WarehouseResult<Location> {
        self.locations
            .resolve(identifier)
            .ok_or_else(|| WarehouseError::UnknownLocation {
                location: identifier.to_string(),
            })
    }

    /// Fails with `AlreadyArchived` if the record is archived.
    pub fn ensure_not_archived(&self, warehouse: &Warehouse) -> WarehouseResult<()> {
        if warehouse.is_archived() {
            return Err(WarehouseError::AlreadyArchived {
                code: warehouse.business_unit_code.clone(),
            });
        }
        Ok(())
    }

    /// Fails with `TooManyWarehouses` or `CapacityExceeded` if one more
    /// warehouse with `additional_capacity` does not fit at `identifier`.
    pub async fn ensure_location_has_room<S: WarehouseReader + ?Sized>(
        &self,
        store: &mut S,
        identifier: &str,
        location: &Location,
        additional_capacity: u32,
    ) -> WarehouseResult<()> {
        self.check_room(store, identifier, location, additional_capacity, None)
            .await
    }

    /// Same as [`Self::ensure_location_has_room`], ignoring the record `excluding`
    /// (a record about to be archived in the same unit of work).
    pub async fn ensure_location_has_room_excluding<S: WarehouseReader + ?Sized>(
        &self,
        store: &mut S,
        identifier: &str,
        location: &Location,
        additional_capacity: u32,
        excluding: i64,
    ) -> WarehouseResult<()> {
        self.check_room(store, identifier, location, additional_capacity, Some(excluding))
            .await
    }

    async fn check_room<S: WarehouseReader + ?Sized>(
        &self,
        store: &mut S,
        identifier: &str,
        location: &Location,
        additional_capacity: u32,
        excluding: Option<i64>,
    ) -> WarehouseResult<()> {
        let all = store.list_all().await?;
        let usage = LocationUsage::tally(&all, identifier, excluding);

        debug!(
            location = %identifier,
            active = usage.active_warehouses,
            capacity = usage.total_capacity,
            additional = additional_capacity,
            "Checking location headroom"
        );

        usage.admit(location, additional_capacity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationCatalog;
    use crate::memory::InMemoryWarehouseRepository;
    use crate::store::WarehouseRepository;
    use chrono::Utc;

    fn record(id: i64, code: &str, location: &str, capacity: u32, archived: bool) -> Warehouse {
        let now = Utc::now();
        Warehouse {
            id,
            business_unit_code: code.to_string(),
            location: location.to_string(),
            capacity,
            stock: 0,
            created_at: now,
            archived_at: archived.then_some(now),
        }
    }

    #[test]
    fn test_tally_ignores_archived_and_other_locations() {
        let records = vec![
            record(1, "MWH.001", "AMSTERDAM-001", 50, false),
            record(2, "MWH.002", "AMSTERDAM-001", 30, false),
            record(3, "MWH.003", "AMSTERDAM-001", 90, true),
            record(4, "MWH.004", "ZWOLLE-001", 40, false),
        ];

        let usage = LocationUsage::tally(&records, "AMSTERDAM-001", None);
        assert_eq!(usage.active_warehouses, 2);
        assert_eq!(usage.total_capacity, 80);

        let usage = LocationUsage::tally(&records, "AMSTERDAM-001", Some(1));
        assert_eq!(usage.active_warehouses, 1);
        assert_eq!(usage.total_capacity, 30);
    }

    #[test]
    fn test_admit_count_checked_before_capacity() {
        let zwolle = Location::new("ZWOLLE-001", 1, 40);
        let full = LocationUsage {
            active_warehouses: 1,
            total_capacity: 40,
        };

        // Both limits are hit; the count wins
        assert!(matches!(
            full.admit(&zwolle, 10),
            Err(WarehouseError::TooManyWarehouses { max: 1, .. })
        ));
    }

    #[test]
    fn test_admit_capacity_boundary() {
        let amsterdam = Location::new("AMSTERDAM-001", 5, 100);
        let usage = LocationUsage {
            active_warehouses: 1,
            total_capacity: 80,
        };

        assert!(usage.admit(&amsterdam, 20).is_ok());
        assert!(matches!(
            usage.admit(&amsterdam, 30),
            Err(WarehouseError::CapacityExceeded {
                requested_total: 110,
                max: 100,
                ..
            })
        ));
    }

    #[test]
    fn test_admit_does_not_overflow() {
        let location = Location::new("VETSBY-001", 10, u32::MAX);
        let usage = LocationUsage {
            active_warehouses: 1,
            total_capacity: u64::from(u32::MAX),
        };
        assert!(matches!(
            usage.admit(&location, u32::MAX),
            Err(WarehouseError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_resolve_location_and_archival_checks() {
        let catalog = LocationCatalog::standard();
        let validator = WarehouseValidator::new(&catalog);

        assert_eq!(
            validator.resolve_location_or_fail("TILBURG-001").unwrap().max_capacity,
            40
        );
        assert!(matches!(
            validator.resolve_location_or_fail("INVALID-001"),
            Err(WarehouseError::UnknownLocation { .. })
        ));

        assert!(validator
            .ensure_not_archived(&record(1, "MWH.001", "ZWOLLE-001", 40, false))
            .is_ok());
        assert!(matches!(
            validator.ensure_not_archived(&record(1, "MWH.001", "ZWOLLE-001", 40, true)),
            Err(WarehouseError::AlreadyArchived { .. })
        ));
    }

    #[tokio::test]
    async fn test_code_uniqueness_includes_archived_records() {
        let repo = InMemoryWarehouseRepository::with_records(vec![
            record(1, "MWH.001", "ZWOLLE-001", 40, true),
            record(2, "MWH.012", "AMSTERDAM-001", 50, false),
        ]);
        let catalog = LocationCatalog::standard();
        let validator = WarehouseValidator::new(&catalog);
        let mut unit = repo.begin().await.unwrap();

        assert!(matches!(
            validator
                .ensure_business_unit_code_unique(&mut unit, "MWH.001")
                .await,
            Err(WarehouseError::DuplicateCode { .. })
        ));
        assert!(matches!(
            validator
                .ensure_business_unit_code_unique(&mut unit, "MWH.012")
                .await,
            Err(WarehouseError::DuplicateCode { .. })
        ));
        assert!(validator
            .ensure_business_unit_code_unique(&mut unit, "MWH.NEW")
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_location_has_room_against_store() {
        let repo = InMemoryWarehouseRepository::with_records(vec![record(
            1,
            "MWH.001",
            "ZWOLLE-001",
            10,
            false,
        )]);
        let catalog = LocationCatalog::standard();
        let validator = WarehouseValidator::new(&catalog);
        let zwolle = validator.resolve_location_or_fail("ZWOLLE-001").unwrap();
        let mut unit = repo.begin().await.unwrap();

        assert!(matches!(
            validator
                .ensure_location_has_room(&mut unit, "ZWOLLE-001", &zwolle, 10)
                .await,
            Err(WarehouseError::TooManyWarehouses { .. })
        ));
        // Ignoring the only occupant frees the slot
        assert!(validator
            .ensure_location_has_room_excluding(&mut unit, "ZWOLLE-001", &zwolle, 40, 1)
            .await
            .is_ok());
    }
}
