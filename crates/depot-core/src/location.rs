//! # Location Catalog
//!
//! Read-only reference data: which locations exist and how much they may hold.
//!
//! The catalog is built once at startup and handed to the lifecycle
//! explicitly; there is no global instance.

use std::collections::HashMap;

use crate::types::Location;

/// Resolves a location identifier to its constraints.
///
/// Implementations must be deterministic and side-effect free.
pub trait LocationResolver: Send + Sync {
    /// Returns the location, or `None` if the identifier is unknown.
    fn resolve(&self, identifier: &str) -> Option<Location>;
}

/// The standard set of locations: `(identification, max warehouses, max capacity)`.
const STANDARD_LOCATIONS: &[(&str, u32, u32)] = &[
    ("ZWOLLE-001", 1, 40),
    ("ZWOLLE-002", 2, 50),
    ("AMSTERDAM-001", 5, 100),
    ("AMSTERDAM-002", 3, 75),
    ("TILBURG-001", 1, 40),
    ("HELMOND-001", 1, 45),
    ("EINDHOVEN-001", 2, 70),
    ("VETSBY-001", 1, 90),
];

/// Immutable map-backed catalog.
///
/// ## Example
/// ```rust
/// use depot_core::location::{LocationCatalog, LocationResolver};
///
/// let catalog = LocationCatalog::standard();
/// let zwolle = catalog.resolve("ZWOLLE-001").unwrap();
/// assert_eq!(zwolle.max_number_of_warehouses, 1);
/// assert!(catalog.resolve("UNKNOWN-001").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    entries: HashMap<String, Location>,
}

impl LocationCatalog {
    /// Builds the catalog from an explicit list.
    ///
    /// Later entries with the same identification replace earlier ones.
    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        let entries = locations
            .into_iter()
            .map(|location| (location.identification.clone(), location))
            .collect();
        LocationCatalog { entries }
    }

    /// The standard reference set.
    pub fn standard() -> Self {
        Self::from_locations(
            STANDARD_LOCATIONS
                .iter()
                .map(|(id, max_warehouses, max_capacity)| {
                    Location::new(*id, *max_warehouses, *max_capacity)
                }),
        )
    }

    /// All locations, sorted by identification.
    pub fn locations(&self) -> Vec<&Location> {
        let mut locations: Vec<&Location> = self.entries.values().collect();
        locations.sort_by(|a, b| a.identification.cmp(&b.identification));
        locations
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LocationResolver for LocationCatalog {
    fn resolve(&self, identifier: &str) -> Option<Location> {
        self.entries.get(identifier).cloned()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_existing_location() {
        let catalog = LocationCatalog::standard();

        let location = catalog.resolve("ZWOLLE-001").unwrap();
        assert_eq!(location.identification, "ZWOLLE-001");
        assert_eq!(location.max_number_of_warehouses, 1);
        assert_eq!(location.max_capacity, 40);

        let amsterdam = catalog.resolve("AMSTERDAM-001").unwrap();
        assert_eq!(amsterdam.max_number_of_warehouses, 5);
        assert_eq!(amsterdam.max_capacity, 100);
    }

    #[test]
    fn test_resolve_unknown_location() {
        let catalog = LocationCatalog::standard();
        assert!(catalog.resolve("UNKNOWN-001").is_none());
        // Identifiers are exact matches
        assert!(catalog.resolve("zwolle-001").is_none());
    }

    #[test]
    fn test_standard_catalog_listing() {
        let catalog = LocationCatalog::standard();
        assert_eq!(catalog.len(), 8);

        let ids: Vec<&str> = catalog
            .locations()
            .iter()
            .map(|l| l.identification.as_str())
            .collect();
        assert_eq!(ids.first(), Some(&"AMSTERDAM-001"));
        assert_eq!(ids.last(), Some(&"ZWOLLE-002"));
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = LocationCatalog::from_locations([
            Location::new("TILBURG-001", 1, 40),
            Location::new("TILBURG-001", 2, 80),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve("TILBURG-001").unwrap().max_capacity, 80);
        assert!(LocationCatalog::default().is_empty());
    }
}
