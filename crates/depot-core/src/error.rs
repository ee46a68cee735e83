//! # Error Types
//!
//! Domain-specific error types for depot-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  depot-core errors (this file)                                         │
//! │  ├── WarehouseError   - Lifecycle rejections + propagated store errors │
//! │  └── ValidationError  - Malformed input                                │
//! │                                                                         │
//! │  depot-core ports (store.rs)                                           │
//! │  └── StoreError       - Repository failures, passed through unchanged  │
//! │                                                                         │
//! │  depot-db errors (separate crate)                                      │
//! │  └── DbError          - sqlx failures, converted into StoreError       │
//! │                                                                         │
//! │  Flow: DbError → StoreError → WarehouseError → ErrorResponse           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transport Mapping
//! Every [`WarehouseError`] carries a stable [`ErrorCode`] and an HTTP-like
//! status. Business-rule rejections and malformed input map to `400`, a
//! missing target to `404`, store failures to `500`.

use serde::Serialize;
use thiserror::Error;
use ts_rs::TS;

use crate::store::StoreError;

// =============================================================================
// Warehouse Error
// =============================================================================

/// Errors returned by the lifecycle operations.
///
/// All business variants are detected before any write happens, so receiving
/// one of them guarantees the repository was not mutated.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Archive, replace or get target does not exist.
    #[error("Warehouse {reference} does not exist")]
    NotFound { reference: String },

    /// A record with this business unit code already exists (active or archived).
    #[error("Warehouse with business unit code {code} already exists")]
    DuplicateCode { code: String },

    /// The location identifier is not in the catalog.
    #[error("Location {location} does not exist")]
    UnknownLocation { location: String },

    /// The location already holds its maximum number of active warehouses.
    #[error("Location {location} has reached its maximum number of warehouses ({max})")]
    TooManyWarehouses { location: String, max: u32 },

    /// Adding the capacity would push the location over its ceiling.
    ///
    /// ## Example
    /// ```text
    /// AMSTERDAM-001: maxCapacity = 100
    /// active: [80]          candidate: 30
    /// 80 + 30 = 110 > 100   → CapacityExceeded { requested_total: 110, max: 100 }
    /// ```
    #[error(
        "Warehouse capacity exceeds the maximum allowed capacity for location {location}: \
         {requested_total} > {max}"
    )]
    CapacityExceeded {
        location: String,
        requested_total: u64,
        max: u32,
    },

    /// The targeted record is already archived.
    #[error("Warehouse with business unit code {code} is already archived")]
    AlreadyArchived { code: String },

    /// Replacement cannot hold the stock carried over from the predecessor.
    #[error("New warehouse capacity {capacity} cannot accommodate the current stock of {stock}")]
    CapacityTooSmall { capacity: u32, stock: u32 },

    /// Replacement stock must equal the predecessor's stock.
    #[error("New warehouse stock {actual} must match the existing warehouse stock of {expected}")]
    StockMismatch { expected: u32, actual: u32 },

    /// Malformed input, rejected before any lookup.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Repository failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WarehouseError {
    /// Creates a NotFound error for the given reference (code or id).
    pub fn not_found(reference: impl ToString) -> Self {
        WarehouseError::NotFound {
            reference: reference.to_string(),
        }
    }

    /// Machine-readable code, stable across releases.
    pub fn code(&self) -> ErrorCode {
        match self {
            WarehouseError::NotFound { .. } => ErrorCode::NotFound,
            WarehouseError::DuplicateCode { .. } => ErrorCode::DuplicateCode,
            WarehouseError::UnknownLocation { .. } => ErrorCode::UnknownLocation,
            WarehouseError::TooManyWarehouses { .. } => ErrorCode::TooManyWarehouses,
            WarehouseError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,
            WarehouseError::AlreadyArchived { .. } => ErrorCode::AlreadyArchived,
            WarehouseError::CapacityTooSmall { .. } => ErrorCode::CapacityTooSmall,
            WarehouseError::StockMismatch { .. } => ErrorCode::StockMismatch,
            WarehouseError::Validation(_) => ErrorCode::ValidationError,
            WarehouseError::Store(_) => ErrorCode::StoreError,
        }
    }

    /// Coarse grouping used by transports.
    pub fn category(&self) -> ErrorCategory {
        match self {
            WarehouseError::NotFound { .. } => ErrorCategory::NotFound,
            WarehouseError::Validation(_) => ErrorCategory::InvalidInput,
            WarehouseError::Store(_) => ErrorCategory::Unavailable,
            _ => ErrorCategory::Conflict,
        }
    }

    /// HTTP-like status for this error.
    pub fn status_code(&self) -> u16 {
        self.category().status_code()
    }

    /// Returns true for business-rule rejections (not infrastructure failures).
    pub fn is_rejection(&self) -> bool {
        !matches!(self, WarehouseError::Store(_))
    }
}

// =============================================================================
// Error Codes & Categories
// =============================================================================

/// Error codes for API responses.
///
/// ## Serialization
/// ```json
/// "CAPACITY_EXCEEDED"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    NotFound,
    DuplicateCode,
    UnknownLocation,
    TooManyWarehouses,
    CapacityExceeded,
    AlreadyArchived,
    CapacityTooSmall,
    StockMismatch,
    ValidationError,
    StoreError,
}

/// Error category, the unit a transport maps to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Target record missing (404).
    NotFound,
    /// Business-rule violation (400, as the existing HTTP contract returns).
    Conflict,
    /// Malformed input (400).
    InvalidInput,
    /// Repository failure (500).
    Unavailable,
}

impl ErrorCategory {
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::NotFound => 404,
            ErrorCategory::Conflict | ErrorCategory::InvalidInput => 400,
            ErrorCategory::Unavailable => 500,
        }
    }
}

/// Error body handed to a transport layer.
///
/// ```json
/// { "code": "STOCK_MISMATCH", "status": 400, "error": "New warehouse stock 99 must match ..." }
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub status: u16,
    pub error: String,
}

impl From<&WarehouseError> for ErrorResponse {
    fn from(err: &WarehouseError) -> Self {
        let error = match err {
            // Infrastructure details stay in the logs
            WarehouseError::Store(inner) => {
                tracing::error!(error = %inner, "Repository operation failed");
                "Warehouse storage is unavailable".to_string()
            }
            other => other.to_string(),
        };

        ErrorResponse {
            code: err.code(),
            status: err.status_code(),
            error,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a candidate is malformed, before any business rule runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., illegal characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for lifecycle results.
pub type WarehouseResult<T> = Result<T, WarehouseError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WarehouseError::CapacityExceeded {
            location: "AMSTERDAM-001".to_string(),
            requested_total: 110,
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "Warehouse capacity exceeds the maximum allowed capacity for location AMSTERDAM-001: 110 > 100"
        );

        let err = WarehouseError::StockMismatch {
            expected: 10,
            actual: 99,
        };
        assert_eq!(
            err.to_string(),
            "New warehouse stock 99 must match the existing warehouse stock of 10"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(WarehouseError::not_found("MWH.404").status_code(), 404);
        assert_eq!(
            WarehouseError::DuplicateCode {
                code: "MWH.001".to_string()
            }
            .status_code(),
            400
        );
        assert_eq!(
            WarehouseError::Store(StoreError::Unavailable("down".to_string())).status_code(),
            500
        );

        let err: WarehouseError = ValidationError::Required {
            field: "businessUnitCode".to_string(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_business_errors_are_conflicts() {
        let err = WarehouseError::TooManyWarehouses {
            location: "ZWOLLE-001".to_string(),
            max: 1,
        };
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(err.is_rejection());
        assert!(!WarehouseError::Store(StoreError::Backend("x".to_string())).is_rejection());
    }

    #[test]
    fn test_error_response_serialization() {
        let err = WarehouseError::AlreadyArchived {
            code: "MWH.001".to_string(),
        };
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();

        assert_eq!(json["code"], "ALREADY_ARCHIVED");
        assert_eq!(json["status"], 400);
        assert_eq!(
            json["error"],
            "Warehouse with business unit code MWH.001 is already archived"
        );
    }

    #[test]
    fn test_store_details_are_not_exposed() {
        let err = WarehouseError::Store(StoreError::Backend("disk I/O error".to_string()));
        let response = ErrorResponse::from(&err);

        assert_eq!(response.code, ErrorCode::StoreError);
        assert!(!response.error.contains("disk"));
    }
}
