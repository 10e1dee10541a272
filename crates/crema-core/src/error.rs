//! # Pricing and Validation Errors
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  validate_menu_item / validate_discount ──► ValidationError             │
//! │                                                   │ (#[from])            │
//! │  Cart, build_order_at, Order::complete ───► CoreError                   │
//! │                                                   │                      │
//! │                          crema-db wraps it as DbError::Domain           │
//! │                          storefront maps it to an ErrorCode             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Messages are shown to guests and staff as-is, so they name the field or
//! item involved rather than internal details.

use thiserror::Error;

/// A cart, pricing or order lifecycle rule was broken.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Menu item not in cart: {0}")]
    NotInCart(String),

    /// Staff switched the item off; it stays on the menu but can't be added.
    #[error("Menu item is unavailable: {0}")]
    ItemUnavailable(String),

    /// Only pending orders can be completed.
    #[error("Order {order_id} is {current_status}, cannot perform operation")]
    InvalidOrderStatus {
        order_id: String,
        current_status: String,
    },

    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Cents arithmetic left `i64`; names the figure being computed.
    #[error("Amount overflow while computing {0}")]
    AmountOverflow(&'static str),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Guest or staff input rejected before anything is priced or saved.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// e.g. a percentage discount above 100%.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Prices and fixed discounts may be zero but never below.
    #[error("{field} must not be negative")]
    Negative { field: String },

    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    pub fn negative(field: impl Into<String>) -> Self {
        ValidationError::Negative {
            field: field.into(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
