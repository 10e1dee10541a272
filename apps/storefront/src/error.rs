//! # Command Errors
//!
//! What a guest screen or the staff console gets back when a command fails:
//! a stable code to branch on and a message that can be shown as-is.
//! Storage details stay in the log.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command (OrderingFlow / StaffConsole)                                 │
//! │  Result<T, ApiError>                                                   │
//! │         │                                                               │
//! │         ├── DbError::NotFound ───────────────► NOT_FOUND                │
//! │         ├── DbError::UniqueViolation ────────► VALIDATION_ERROR         │
//! │         ├── DbError (other) ─────────────────► DATABASE_ERROR           │
//! │         ├── CoreError::Validation ───────────► VALIDATION_ERROR         │
//! │         ├── CoreError::InvalidOrderStatus ───► BUSINESS_LOGIC           │
//! │         ├── CoreError (cart limits) ─────────► CART_ERROR               │
//! │         └── bad staff password ──────────────► UNAUTHORIZED             │
//! │                                                                         │
//! │  Frontend receives { "code": "...", "message": "..." }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crema_core::{CoreError, ValidationError};
use crema_db::DbError;

/// Serialized for the frontend as:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Cart is empty"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

/// Rough HTTP equivalents in parentheses, for a future web frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown order, menu item or discount id (404)
    NotFound,

    /// Bad guest or staff input (400)
    ValidationError,

    /// Staff password missing or wrong (401)
    Unauthorized,

    /// (500)
    DatabaseError,

    /// e.g. completing an order twice (409)
    BusinessLogic,

    /// Unavailable item or cart limit reached (422)
    CartError,

    /// (500)
    Internal,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Storage failures are logged in full and reported generically.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => {
                ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::Domain(core) => ApiError::from(core),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference")
            }
            DbError::QueryFailed(e) | DbError::Internal(e) => {
                tracing::error!("Database operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Corrupt { entity, reason } => {
                tracing::error!(entity = %entity, "Corrupt row: {}", reason);
                ApiError::new(ErrorCode::DatabaseError, "Stored data is unreadable")
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotInCart(id) => ApiError::not_found("Cart item", &id),
            CoreError::ItemUnavailable(id) => {
                ApiError::cart(format!("{} is not available right now", id))
            }
            CoreError::InvalidOrderStatus {
                order_id,
                current_status,
            } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Order {} is already {}", order_id, current_status),
            ),
            e @ CoreError::CartTooLarge { .. } => ApiError::cart(e.to_string()),
            e @ CoreError::QuantityTooLarge { .. } => ApiError::validation(e.to_string()),
            CoreError::AmountOverflow(what) => {
                ApiError::validation(format!("Order {} is too large", what))
            }
            CoreError::Validation(e) => ApiError::from(e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
