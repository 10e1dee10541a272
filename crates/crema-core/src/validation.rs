//! # Validation Module
//!
//! Input validation utilities for Crema.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                     │
//! │  ├── Basic format checks (empty name/table)                            │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Storefront commands + pricing engine (Rust)                  │
//! │  └── THIS MODULE: negative prices, bad quantities, code format         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE discount codes                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use crema_core::validation::{validate_discount_code, validate_quantity};
//!
//! assert!(validate_discount_code("SAVE10").is_ok());
//! assert!(validate_quantity(2).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::BPS_SCALE;
use crate::types::{DiscountCode, DiscountKind, MenuItem};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted discount code.
pub const MAX_DISCOUNT_CODE_LEN: usize = 32;

// =============================================================================
// String Validators
// =============================================================================

fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a menu item name (1-200 characters).
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_required("name", name, 200)
}

/// Validates a menu category (1-100 characters).
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_required("category", category, 100)
}

/// Validates the customer name captured at the welcome prompt.
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_required("customer name", name, 100)
}

/// Validates the table label captured at the welcome prompt.
pub fn validate_table_number(table: &str) -> ValidationResult<()> {
    validate_required("table number", table, 20)
}

/// Validates a discount code string.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 32 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use crema_core::validation::validate_discount_code;
///
/// assert!(validate_discount_code("WELCOME-5").is_ok());
/// assert!(validate_discount_code("").is_err());
/// assert!(validate_discount_code("TEN OFF").is_err());
/// ```
pub fn validate_discount_code(code: &str) -> ValidationResult<()> {
    validate_required("code", code, MAX_DISCOUNT_CODE_LEN)?;

    if !code
        .trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (free refills).
///
/// ```rust
/// use crema_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(350).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::negative("price"));
    }

    Ok(())
}

/// Validates the value a discount carries into pricing.
///
/// Only negativity is rejected here. A percent value above 100% or a fixed
/// value above the subtotal is clamped by the pricing engine.
pub fn validate_discount_value(value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::negative("discount value"));
    }

    Ok(())
}

/// Validates a tax rate in basis points (0-10000).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if i64::from(bps) > BPS_SCALE {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: BPS_SCALE,
        });
    }

    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates a menu item before it is saved by staff.
pub fn validate_menu_item(item: &MenuItem) -> ValidationResult<()> {
    validate_required("id", &item.id, 64)?;
    validate_item_name(&item.name)?;
    validate_category(&item.category)?;
    validate_price_cents(item.price_cents)?;
    Ok(())
}

/// Validates a discount code before it is saved by staff.
///
/// Stricter than [`validate_discount_value`]: staff cannot create a
/// percent code above 100%.
pub fn validate_discount(discount: &DiscountCode) -> ValidationResult<()> {
    validate_discount_code(&discount.code)?;
    validate_discount_value(discount.value)?;

    if discount.kind == DiscountKind::Percent && discount.value > BPS_SCALE {
        return Err(ValidationError::OutOfRange {
            field: "percent".to_string(),
            min: 0,
            max: BPS_SCALE,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates cart size (number of distinct lines) before adding one more.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 0,
            max: MAX_CART_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates an order ID (UUID format).
///
/// ```rust
/// use crema_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
