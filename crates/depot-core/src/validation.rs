//! # Validation Module
//!
//! Input validation for warehouse candidates.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE - shape of the input                             │
//! │  ├── Business unit code present, bounded, legal characters             │
//! │  └── Location identifier present                                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Validator (validator.rs) - rules against repository state    │
//! │  ├── Code uniqueness, location exists                                  │
//! │  └── Count / capacity headroom                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (capacity >= 0, stock >= 0)                                 │
//! │  └── UNIQUE business_unit_code WHERE archived_at IS NULL               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Capacity and stock are unsigned, so non-negativity is carried by the type.

use crate::error::ValidationError;
use crate::types::NewWarehouse;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted business unit code.
pub const MAX_BUSINESS_UNIT_CODE_LEN: usize = 50;

/// Validates a business unit code.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - ASCII letters, digits, `.`, `-` and `_` only
///
/// ## Example
/// ```rust
/// use depot_core::validation::validate_business_unit_code;
///
/// assert!(validate_business_unit_code("MWH.001").is_ok());
/// assert!(validate_business_unit_code("").is_err());
/// assert!(validate_business_unit_code("MWH 001").is_err());
/// ```
pub fn validate_business_unit_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "businessUnitCode".to_string(),
        });
    }

    if code.chars().count() > MAX_BUSINESS_UNIT_CODE_LEN {
        return Err(ValidationError::TooLong {
            field: "businessUnitCode".to_string(),
            max: MAX_BUSINESS_UNIT_CODE_LEN,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "businessUnitCode".to_string(),
            reason: "must contain only ASCII letters, digits, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

/// Validates a location identifier.
///
/// Only presence is checked here; whether the location exists is the
/// Validator's job, so that unknown locations surface as `UnknownLocation`.
pub fn validate_location_identifier(identifier: &str) -> ValidationResult<()> {
    if identifier.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "location".to_string(),
        });
    }

    Ok(())
}

/// Validates every field of a candidate.
pub fn validate_candidate(candidate: &NewWarehouse) -> ValidationResult<()> {
    validate_business_unit_code(&candidate.business_unit_code)?;
    validate_location_identifier(&candidate.location)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
