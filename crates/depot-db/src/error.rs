//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (depot-core port) ← Unavailable / Constraint / Backend      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WarehouseError::Store ← Returned unchanged by the lifecycle            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use depot_core::StoreError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - A second active row for the same business unit code
    #[error("Duplicate value for {field}")]
    UniqueViolation { field: String },

    /// CHECK constraint violation (negative capacity or stock).
    #[error("Check constraint failed: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file doesn't exist and can't be created
    /// - File permissions issue
    /// - Pool already closed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A value read from a row is out of range for the domain type.
    #[error("Invalid row data: {0}")]
    InvalidRow(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// sqlx::Error::PoolClosed     → DbError::ConnectionFailed
/// sqlx::Error::ColumnDecode   → DbError::InvalidRow
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite reports "UNIQUE constraint failed: <table>.<column>"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::ColumnDecode { .. } => DbError::InvalidRow(err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Hands database failures to the lifecycle through its repository port.
impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                StoreError::Unavailable(err.to_string())
            }
            DbError::UniqueViolation { .. } | DbError::CheckViolation { .. } => {
                StoreError::Constraint(err.to_string())
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_errors_become_unavailable() {
        let store: StoreError = DbError::from(sqlx::Error::PoolTimedOut).into();
        assert!(matches!(store, StoreError::Unavailable(_)));

        let store: StoreError = DbError::from(sqlx::Error::PoolClosed).into();
        assert!(matches!(store, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_constraint_errors_become_constraint() {
        let store: StoreError = DbError::UniqueViolation {
            field: "warehouses.business_unit_code".to_string(),
        }
        .into();
        assert_eq!(
            store,
            StoreError::Constraint(
                "Duplicate value for warehouses.business_unit_code".to_string()
            )
        );
    }

    #[test]
    fn test_other_errors_become_backend() {
        let store: StoreError = DbError::MigrationFailed("bad checksum".to_string()).into();
        assert!(matches!(store, StoreError::Backend(_)));
    }
}
