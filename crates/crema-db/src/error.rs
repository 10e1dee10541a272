//! # Storage Errors
//!
//! One error type for both `OrderStore` adapters. `MemoryStore` produces the
//! same variants as SQLite so callers never branch on the backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sqlx::Error ──────────┐                                                │
//! │  MigrateError ─────────┼──► DbError ──► ApiError (storefront)           │
//! │  CoreError (rules) ────┘                                                │
//! │                                                                         │
//! │  "UNIQUE constraint failed: discount_codes.code"                        │
//! │        └──► UniqueViolation { field: "discount_codes.code", .. }        │
//! │             repositories then restate it with the offending value       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crema_core::CoreError;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No order, menu item or discount with that id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A discount code text or order id is already taken.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// An order line pointing at an order that doesn't exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// The file couldn't be opened or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored row no longer parses, e.g. an unknown order status.
    #[error("Corrupt {entity} row: {reason}")]
    Corrupt { entity: String, reason: String },

    /// Every connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Rejected by a domain rule, such as completing a completed order.
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn corrupt(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        DbError::Corrupt {
            entity: entity.into(),
            reason: reason.into(),
        }
    }
}

/// Column named in a SQLite constraint message, e.g.
/// `"UNIQUE constraint failed: orders.id"` → `"orders.id"`.
fn constrained_column(message: &str) -> &str {
    message
        .rsplit_once(": ")
        .map(|(_, column)| column.trim())
        .unwrap_or("unknown")
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    // The value isn't in the message; repositories fill it in
                    DbError::duplicate(constrained_column(db_err.message()), "unknown")
                }
                ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                    message: db_err.message().to_string(),
                },
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("store is closed".to_string()),
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::corrupt("row", format!("column {}: {}", index, source))
            }

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
