//! # crema-core: Pure Business Logic for Crema
//!
//! Pricing, cart math, validation and reporting for the Crema ordering
//! kiosk, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Crema Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront (apps/storefront)                 │   │
//! │  │    Menu ──► Cart ──► Discount ──► Checkout ──► Staff Console    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ crema-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  pricing  │  │   money   │  │   cart    │  │   stats   │  │   │
//! │  │   │ discount  │  │   Money   │  │   Cart    │  │ OrderStats│  │   │
//! │  │   │  tax      │  │  TaxRate  │  │ CartLine  │  │  periods  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    crema-db (Order Store)                       │   │
//! │  │          SQLite repositories, in-memory store, migrations       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (MenuItem, CartLine, DiscountCode, Order)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Subtotal, discount, tax and total; order assembly
//! - [`cart`] - The customer's in-progress cart
//! - [`receipt`] - Receipt view and text rendering
//! - [`stats`] - Revenue statistics and reporting periods
//! - [`menu`] - Category listing and filtering
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **No I/O**: persistence lives in `crema-db`
//! 3. **Integer Money**: amounts in cents (i64), rates in basis points
//! 4. **Explicit Errors**: all errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use crema_core::money::Money;
//! use crema_core::STANDARD_TAX_RATE;
//!
//! let price = Money::from_cents(475); // $4.75
//!
//! // 10% of $4.75 = 47.5 cents, half-up → 48
//! assert_eq!(price.calculate_tax(STANDARD_TAX_RATE).cents(), 48);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod menu;
pub mod money;
pub mod pricing;
pub mod receipt;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{build_order, price_cart, price_cart_with_rate, PriceBreakdown};
pub use receipt::Receipt;
pub use stats::{OrderStats, StatsPeriod};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every order: 10%, charged after the discount.
pub const STANDARD_TAX_RATE: TaxRate = TaxRate::from_bps(1000);

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against fat-finger orders (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
