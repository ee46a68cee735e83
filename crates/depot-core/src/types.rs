//! # Domain Types
//!
//! Core domain types used throughout Depot.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  NewWarehouse   │   │   Warehouse     │   │    Location     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code           │──►│  id (assigned)  │   │  identification │       │
//! │  │  location       │   │  code, location │──►│  max warehouses │       │
//! │  │  capacity       │   │  capacity/stock │   │  max capacity   │       │
//! │  │  stock          │   │  created_at     │   └─────────────────┘       │
//! │  └─────────────────┘   │  archived_at?   │                             │
//! │     (candidate)        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every warehouse record has:
//! - `id`: surrogate key assigned by the repository at insert
//! - `business_unit_code`: human-readable business identity, shared by a
//!   replaced record and its successor

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Warehouse
// =============================================================================

/// A persisted warehouse record.
///
/// A record is **active** while `archived_at` is `None`. Archival is
/// irreversible; records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Warehouse {
    /// Surrogate identifier assigned by the repository.
    pub id: i64,

    /// Business identity (e.g. `MWH.001`).
    pub business_unit_code: String,

    /// Location Catalog identifier (e.g. `ZWOLLE-001`).
    pub location: String,

    /// Maximum stock this unit may hold.
    pub capacity: u32,

    /// Current stock level.
    pub stock: u32,

    /// When the record was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the record was archived, if it was.
    #[ts(as = "Option<String>")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Warehouse {
    /// Checks if the record is still active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }

    /// Checks if the record is archived.
    #[inline]
    pub fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// Checks if this record counts towards `location`'s active aggregate.
    #[inline]
    pub fn is_active_at(&self, location: &str) -> bool {
        self.is_active() && self.location == location
    }
}

// =============================================================================
// New Warehouse (candidate)
// =============================================================================

/// A warehouse that has not been persisted yet.
///
/// Used as input to both Create and Replace. For Replace, the business unit
/// code is overwritten with the code of the record being replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewWarehouse {
    pub business_unit_code: String,
    pub location: String,
    pub capacity: u32,
    pub stock: u32,
}

impl NewWarehouse {
    pub fn new(
        business_unit_code: impl Into<String>,
        location: impl Into<String>,
        capacity: u32,
        stock: u32,
    ) -> Self {
        NewWarehouse {
            business_unit_code: business_unit_code.into(),
            location: location.into(),
            capacity,
            stock,
        }
    }

    /// Returns the same candidate carrying a different business unit code.
    pub fn with_business_unit_code(mut self, code: impl Into<String>) -> Self {
        self.business_unit_code = code.into();
        self
    }

    /// Materializes the persisted record once the repository assigned an id.
    pub fn into_warehouse(self, id: i64, created_at: DateTime<Utc>) -> Warehouse {
        Warehouse {
            id,
            business_unit_code: self.business_unit_code,
            location: self.location,
            capacity: self.capacity,
            stock: self.stock,
            created_at,
            archived_at: None,
        }
    }
}

// =============================================================================
// Location
// =============================================================================

/// A named place with fixed ceilings on its active warehouses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Location {
    /// Identifier referenced by `Warehouse::location`.
    pub identification: String,

    /// Maximum number of simultaneously active warehouses.
    pub max_number_of_warehouses: u32,

    /// Maximum combined capacity of active warehouses.
    pub max_capacity: u32,
}

impl Location {
    pub fn new(identification: impl Into<String>, max_number_of_warehouses: u32, max_capacity: u32) -> Self {
        Location {
            identification: identification.into(),
            max_number_of_warehouses,
            max_capacity,
        }
    }
}

// =============================================================================
// Warehouse Reference
// =============================================================================

/// How a caller addresses an existing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarehouseRef {
    /// Surrogate id.
    Id(i64),
    /// Business unit code (resolves to the active record when one exists).
    Code(String),
}

impl WarehouseRef {
    pub fn code(code: impl Into<String>) -> Self {
        WarehouseRef::Code(code.into())
    }
}

impl fmt::Display for WarehouseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarehouseRef::Id(id) => write!(f, "with id {}", id),
            WarehouseRef::Code(code) => write!(f, "with business unit code {}", code),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn stamped(archived: bool) -> Warehouse {
        let now = Utc::now();
        Warehouse {
            id: 1,
            business_unit_code: "MWH.001".to_string(),
            location: "ZWOLLE-001".to_string(),
            capacity: 40,
            stock: 10,
            created_at: now,
            archived_at: archived.then_some(now),
        }
    }

    #[test]
    fn test_active_state() {
        assert!(stamped(false).is_active());
        assert!(stamped(false).is_active_at("ZWOLLE-001"));
        assert!(!stamped(false).is_active_at("AMSTERDAM-001"));

        let archived = stamped(true);
        assert!(archived.is_archived());
        assert!(!archived.is_active_at("ZWOLLE-001"));
    }

    #[test]
    fn test_candidate_into_warehouse() {
        let now = Utc::now();
        let warehouse = NewWarehouse::new("MWH.NEW", "AMSTERDAM-001", 20, 0).into_warehouse(7, now);

        assert_eq!(warehouse.id, 7);
        assert_eq!(warehouse.created_at, now);
        assert!(warehouse.is_active());
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = serde_json::to_value(stamped(false)).unwrap();
        assert_eq!(json["businessUnitCode"], "MWH.001");
        assert!(json["archivedAt"].is_null());

        let candidate: NewWarehouse = serde_json::from_str(
            r#"{"businessUnitCode":"MWH.NEW","location":"AMSTERDAM-001","capacity":10,"stock":0}"#,
        )
        .unwrap();
        assert_eq!(candidate.location, "AMSTERDAM-001");
    }

    #[test]
    fn test_reference_display() {
        assert_eq!(WarehouseRef::Id(2).to_string(), "with id 2");
        assert_eq!(
            WarehouseRef::code("MWH.012").to_string(),
            "with business unit code MWH.012"
        );
    }
}
