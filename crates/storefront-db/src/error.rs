//! # Database Error Types
//!
//! Error types for catalog persistence.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)        ValidationError (storefront-core)   │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  DbError (this module) ← categorized store failure / Validation        │
//! │       │                                                                 │
//! │       ├── list/get/create: returned as-is                              │
//! │       │                                                                 │
//! │       └── edit/destroy: NotFound and Validation as-is,                 │
//! │           anything else logged and wrapped in EditFailed/DeleteFailed  │
//! │           (cause kept as source())                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::ValidationError;
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `edit` or `destroy` on an id that was never stored
    /// - `destroy` called twice on the same id
    #[error("No {entity} found with id {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - `create` with a client-supplied id that already exists
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed (includes CHECK/NOT NULL constraint failures).
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started or committed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Payload rejected before reaching the database.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An edit failed for a reason other than NotFound or Validation.
    ///
    /// The message stays generic; the cause is logged and kept as `source()`.
    #[error("Failed to edit product")]
    EditFailed {
        id: String,
        #[source]
        source: Box<DbError>,
    },

    /// A delete failed for a reason other than NotFound.
    #[error("Failed to delete product")]
    DeleteFailed {
        id: String,
        #[source]
        source: Box<DbError>,
    },

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Wraps a failure that happened while editing `id`.
    pub fn edit_failed(id: impl Into<String>, source: DbError) -> Self {
        DbError::EditFailed {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Wraps a failure that happened while deleting `id`.
    pub fn delete_failed(id: impl Into<String>, source: DbError) -> Self {
        DbError::DeleteFailed {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Returns true for the NotFound variant.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // "UNIQUE constraint failed: products.id"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
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
    use std::error::Error as _;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("product", "abc");
        assert_eq!(err.to_string(), "No product found with id abc");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_wrapped_errors_keep_source() {
        let err = DbError::edit_failed("abc", DbError::PoolExhausted);
        assert_eq!(err.to_string(), "Failed to edit product");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("Connection pool exhausted".to_string())
        );

        let err = DbError::delete_failed("abc", DbError::QueryFailed("disk I/O error".into()));
        assert_eq!(err.to_string(), "Failed to delete product");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_validation_is_transparent() {
        let err: DbError = ValidationError::NegativeLikes.into();
        assert_eq!(err.to_string(), "Likes cannot be negative");
    }
}
