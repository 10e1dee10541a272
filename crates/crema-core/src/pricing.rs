//! # Pricing Engine
//!
//! Turns a cart snapshot and an optional discount into subtotal, discount,
//! tax and total, and assembles the `Order` record at checkout.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Pricing Pipeline                             │
//! │                                                                         │
//! │  lines ──► compute_subtotal ──► Σ unit_price × quantity                │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  discount ─► compute_discount ──► percent: subtotal × bps / 10000      │
//! │                │                  fixed:   value                        │
//! │                │                  clamp:   min(amount, subtotal)        │
//! │                ▼                                                        │
//! │  subtotal − discount ──► compute_tax(rate) ──► base × 10%               │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  compute_total ──► subtotal − discount + tax                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure: same input, same output, no I/O. The
//! storefront calls `build_order` and hands the result to an `OrderStore`.
//!
//! ## Example
//! ```rust
//! use crema_core::pricing::price_cart;
//! use crema_core::{CartLine, DiscountCode};
//!
//! let lines = vec![CartLine {
//!     menu_item_id: "brk-2".into(),
//!     name: "Acai Bowl".into(),
//!     unit_price_cents: 10_000,
//!     quantity: 1,
//! }];
//! let ten_off = DiscountCode::percent("TEN", 1000);
//!
//! let price = price_cart(&lines, Some(&ten_off)).unwrap();
//! assert_eq!(price.discount.cents(), 1000);
//! assert_eq!(price.tax.cents(), 900);
//! assert_eq!(price.total.cents(), 9900);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, BPS_SCALE};
use crate::types::{CartLine, DiscountCode, DiscountKind, Order, OrderStatus, TaxRate};
use crate::validation::{
    validate_discount_value, validate_price_cents, validate_quantity, validate_tax_rate_bps,
};
use crate::STANDARD_TAX_RATE;

// =============================================================================
// Price Breakdown
// =============================================================================

/// The four amounts shown in the cart drawer and on the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub total: Money,
}

impl PriceBreakdown {
    /// The amount tax is charged on (`subtotal − discount`).
    #[inline]
    pub fn taxable_base(&self) -> Money {
        self.subtotal - self.discount
    }
}

// =============================================================================
// Discount Codes
// =============================================================================

/// Normalizes a discount code for lookup and storage: trimmed, uppercase.
///
/// ```rust
/// use crema_core::pricing::normalize_discount_code;
///
/// assert_eq!(normalize_discount_code("  save10 "), "SAVE10");
/// ```
pub fn normalize_discount_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Returns the normalized code to look up, or `None` when the customer
/// left the field blank. A blank code means "no discount", not an error.
pub fn requested_discount_code(raw: &str) -> Option<String> {
    let code = normalize_discount_code(raw);
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

// =============================================================================
// Pricing Steps
// =============================================================================

/// Sums `unit_price × quantity` across all lines. Empty → zero.
///
/// ## Errors
/// - `ValidationError::Negative` for a negative price
/// - `ValidationError::MustBePositive` / `OutOfRange` for a quantity outside 1-999
/// - `CoreError::AmountOverflow` if the sum leaves the i64 range
pub fn compute_subtotal(lines: &[CartLine]) -> CoreResult<Money> {
    lines.iter().try_fold(Money::zero(), |acc, line| {
        validate_price_cents(line.unit_price_cents)?;
        validate_quantity(line.quantity)?;

        line.unit_price()
            .checked_mul(line.quantity)
            .and_then(|line_total| acc.checked_add(line_total))
            .ok_or(CoreError::AmountOverflow("subtotal"))
    })
}

/// Computes the discount amount for a subtotal.
///
/// - no discount → 0
/// - percent → `subtotal × value / 10000`, half-up to the cent
/// - fixed → `value`
///
/// The result is clamped to `[0, subtotal]`: a discount never makes an
/// order negative.
///
/// ## Errors
/// `ValidationError::Negative` for a negative discount value.
pub fn compute_discount(subtotal: Money, discount: Option<&DiscountCode>) -> CoreResult<Money> {
    let Some(discount) = discount else {
        return Ok(Money::zero());
    };

    validate_discount_value(discount.value)?;

    let amount = match discount.kind {
        // ≥100% short-circuits so huge values can't overflow the i128 → i64 narrowing
        DiscountKind::Percent if discount.value >= BPS_SCALE => subtotal,
        DiscountKind::Percent => subtotal.percentage(discount.value),
        DiscountKind::Fixed => Money::from_cents(discount.value),
    };

    Ok(amount.min(subtotal).max(Money::zero()))
}

/// Tax on the post-discount amount: `taxable_base × rate`, half-up to the cent.
#[inline]
pub fn compute_tax(taxable_base: Money, rate: TaxRate) -> Money {
    taxable_base.calculate_tax(rate)
}

/// `subtotal − discount + tax`.
///
/// ## Errors
/// `CoreError::AmountOverflow` if the result leaves the i64 range.
pub fn compute_total(subtotal: Money, discount: Money, tax: Money) -> CoreResult<Money> {
    subtotal
        .checked_sub(discount)
        .and_then(|base| base.checked_add(tax))
        .ok_or(CoreError::AmountOverflow("total"))
}

// =============================================================================
// Cart Pricing
// =============================================================================

/// Prices a cart at the standard 10% rate.
pub fn price_cart(lines: &[CartLine], discount: Option<&DiscountCode>) -> CoreResult<PriceBreakdown> {
    price_cart_with_rate(lines, discount, STANDARD_TAX_RATE)
}

/// Prices a cart at an explicit tax rate.
///
/// ## Errors
/// `ValidationError::OutOfRange` for a rate above 100%.
pub fn price_cart_with_rate(
    lines: &[CartLine],
    discount: Option<&DiscountCode>,
    rate: TaxRate,
) -> CoreResult<PriceBreakdown> {
    validate_tax_rate_bps(rate.bps())?;

    let subtotal = compute_subtotal(lines)?;
    let discount = compute_discount(subtotal, discount)?;
    let tax = compute_tax(subtotal - discount, rate);
    let total = compute_total(subtotal, discount, tax)?;

    Ok(PriceBreakdown {
        subtotal,
        discount,
        tax,
        total,
    })
}

// =============================================================================
// Order Assembly
// =============================================================================

/// Builds the order record for a checkout at the standard rate, stamped now.
///
/// ## Checkout Flow
/// ```text
/// Cart lines + applied code
///      │
///      ▼
/// build_order ← THIS FUNCTION (pure)
///      │   • new UUID + timestamp
///      │   • copies lines (cart can change afterwards)
///      │   • prices them
///      │   • keeps only the code label
///      ▼
/// OrderStore::create_order (I/O, in crema-db)
/// ```
pub fn build_order(
    lines: &[CartLine],
    discount: Option<&DiscountCode>,
    customer_name: &str,
    table_number: &str,
) -> CoreResult<Order> {
    build_order_at(
        lines,
        discount,
        customer_name,
        table_number,
        STANDARD_TAX_RATE,
        Utc::now(),
    )
}

/// Builds an order with an explicit tax rate and creation time.
pub fn build_order_at(
    lines: &[CartLine],
    discount: Option<&DiscountCode>,
    customer_name: &str,
    table_number: &str,
    rate: TaxRate,
    created_at: DateTime<Utc>,
) -> CoreResult<Order> {
    let price = price_cart_with_rate(lines, discount, rate)?;

    Ok(Order {
        id: Uuid::new_v4().to_string(),
        created_at,
        lines: lines.to_vec(),
        subtotal_cents: price.subtotal.cents(),
        discount_code: discount.map(|d| d.code.clone()),
        discount_cents: price.discount.cents(),
        tax_cents: price.tax.cents(),
        total_cents: price.total.cents(),
        table_number: table_number.trim().to_string(),
        customer_name: customer_name.trim().to_string(),
        status: OrderStatus::Pending,
        completed_at: None,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn line(id: &str, unit_price_cents: i64, quantity: i64) -> CartLine {
        CartLine {
            menu_item_id: id.to_string(),
            name: format!("Item {}", id),
            unit_price_cents,
            quantity,
        }
    }

    fn single(subtotal_cents: i64) -> Vec<CartLine> {
        vec![line("x", subtotal_cents, 1)]
    }

    fn sample_carts() -> Vec<Vec<CartLine>> {
        vec![
            vec![],
            vec![line("a", 0, 3)],
            vec![line("a", 1, 1)],
            vec![line("a", 5, 1)],
            vec![line("a", 350, 2), line("b", 475, 1)],
            vec![line("a", 999, 7), line("b", 1, 999), line("c", 1100, 3)],
            single(123_456_789),
        ]
    }

    fn sample_discounts() -> Vec<Option<DiscountCode>> {
        vec![
            None,
            Some(DiscountCode::percent("ZERO", 0)),
            Some(DiscountCode::percent("TEN", 1000)),
            Some(DiscountCode::percent("THIRD", 3333)),
            Some(DiscountCode::percent("ALL", 10_000)),
            Some(DiscountCode::percent("SILLY", 25_000)),
            Some(DiscountCode::fixed("ONE", Money::from_cents(1))),
            Some(DiscountCode::fixed("FIVE", Money::from_cents(500))),
            Some(DiscountCode::fixed("HUGE", Money::from_cents(i64::MAX))),
        ]
    }

    // -------------------------------------------------------------------------
    // Scenarios
    // -------------------------------------------------------------------------

    #[test]
    fn test_subtotal_sums_lines() {
        // 5.00 × 2 + 3.00 × 1 = 13.00
        let lines = vec![line("a", 500, 2), line("b", 300, 1)];
        assert_eq!(compute_subtotal(&lines).unwrap().cents(), 1300);
    }

    #[test]
    fn test_percent_discount_on_hundred() {
        let price = price_cart(&single(10_000), Some(&DiscountCode::percent("TEN", 1000))).unwrap();

        assert_eq!(price.subtotal.cents(), 10_000);
        assert_eq!(price.discount.cents(), 1000);
        assert_eq!(price.tax.cents(), 900);
        assert_eq!(price.total.cents(), 9900);
    }

    #[test]
    fn test_fixed_discount_larger_than_subtotal_is_clamped() {
        let twenty = DiscountCode::fixed("TWENTY", Money::from_cents(2000));
        let price = price_cart(&single(1000), Some(&twenty)).unwrap();

        assert_eq!(price.discount.cents(), 1000);
        assert_eq!(price.tax.cents(), 0);
        assert_eq!(price.total.cents(), 0);
    }

    #[test]
    fn test_no_discount() {
        let price = price_cart(&single(5000), None).unwrap();

        assert_eq!(price.discount.cents(), 0);
        assert_eq!(price.tax.cents(), 500);
        assert_eq!(price.total.cents(), 5500);
    }

    #[test]
    fn test_blank_code_is_no_discount() {
        assert_eq!(requested_discount_code(""), None);
        assert_eq!(requested_discount_code("   "), None);
        assert_eq!(requested_discount_code(" test10 "), Some("TEST10".to_string()));

        let lines = single(5000);
        let order = build_order(&lines, None, "Ana", "4").unwrap();
        let expected = price_cart(&lines, None).unwrap();

        assert_eq!(order.discount_code, None);
        assert_eq!(order.discount_cents, 0);
        assert_eq!(order.tax_cents, expected.tax.cents());
        assert_eq!(order.total_cents, 5500);
    }

    #[test]
    fn test_empty_cart_prices_to_zero() {
        let price = price_cart(&[], Some(&DiscountCode::fixed("FIVE", Money::from_cents(500)))).unwrap();
        assert_eq!(price.subtotal, Money::zero());
        assert_eq!(price.discount, Money::zero());
        assert_eq!(price.total, Money::zero());
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    #[test]
    fn test_pricing_invariants_hold_across_samples() {
        let rate = STANDARD_TAX_RATE;

        for lines in sample_carts() {
            let expected_subtotal: i64 = lines.iter().map(|l| l.unit_price_cents * l.quantity).sum();

            for discount in sample_discounts() {
                let price = price_cart(&lines, discount.as_ref()).unwrap();

                assert!(price.subtotal.cents() >= 0);
                assert_eq!(price.subtotal.cents(), expected_subtotal);

                assert!(price.discount >= Money::zero());
                assert!(price.discount <= price.subtotal);

                assert_eq!(price.tax, (price.subtotal - price.discount).calculate_tax(rate));
                assert_eq!(price.total, price.subtotal - price.discount + price.tax);

                assert!(price.total >= price.subtotal - price.discount);
                assert!(price.total <= price.subtotal + price.subtotal.calculate_tax(rate));
            }
        }
    }

    #[test]
    fn test_price_cart_is_idempotent() {
        let lines = vec![line("a", 350, 2), line("b", 475, 1)];
        let code = DiscountCode::percent("THIRD", 3333);

        let first = price_cart(&lines, Some(&code)).unwrap();
        let second = price_cart(&lines, Some(&code)).unwrap();
        assert_eq!(first, second);
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    #[test]
    fn test_negative_inputs_are_rejected() {
        let err = compute_subtotal(&[line("a", -100, 1)]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::Negative { .. })));

        let err = compute_subtotal(&[line("a", 100, -1)]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::MustBePositive { .. })));

        let mut bad = DiscountCode::fixed("BAD", Money::zero());
        bad.value = -1;
        let err = compute_discount(Money::from_cents(1000), Some(&bad)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn test_zero_quantity_line_is_rejected() {
        let lines = vec![line("hc-1", 350, 1), line("bak-1", 450, 0)];

        let err = compute_subtotal(&lines).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::MustBePositive { .. })));

        // No order is built from it either
        assert!(build_order(&lines, None, "Ana", "4").is_err());
    }

    #[test]
    fn test_quantity_above_limit_is_rejected() {
        let err = compute_subtotal(&[line("a", 100, 1000)]).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_tax_rate_above_hundred_percent_is_rejected() {
        let err = price_cart_with_rate(&single(i64::MAX / 2), None, TaxRate::from_bps(u32::MAX))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));

        let full = price_cart_with_rate(&single(1000), None, TaxRate::from_bps(10_000)).unwrap();
        assert_eq!(full.tax.cents(), 1000);
    }

    #[test]
    fn test_subtotal_overflow_is_reported() {
        let lines = vec![line("a", i64::MAX, 2)];
        let err = compute_subtotal(&lines).unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow("subtotal")));
    }

    #[test]
    fn test_percent_discount_rounds_to_cent() {
        // 15% of $4.75 = $0.7125 → $0.71
        let fifteen = DiscountCode::percent("FIFTEEN", 1500);
        let discount = compute_discount(Money::from_cents(475), Some(&fifteen)).unwrap();
        assert_eq!(discount.cents(), 71);
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    #[test]
    fn test_build_order_snapshots_cart() {
        let mut lines = vec![line("hc-1", 350, 2), line("bak-1", 450, 1)];
        let code = DiscountCode::fixed("welcome", Money::from_cents(100));
        let at = Utc::now();

        let order = build_order_at(&lines, Some(&code), " Ana ", "7", STANDARD_TAX_RATE, at).unwrap();

        // Mutating the cart afterwards does not touch the order
        lines[0].quantity = 9;
        lines.pop();

        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.created_at, at);
        assert_eq!(order.customer_name, "Ana");
        assert_eq!(order.table_number, "7");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.completed_at, None);
        assert_eq!(order.discount_code.as_deref(), Some("WELCOME"));
        assert_eq!(order.subtotal_cents, 1150);
        assert_eq!(order.discount_cents, 100);
        assert_eq!(order.tax_cents, 105);
        assert_eq!(order.total_cents, 1155);
        assert!(uuid::Uuid::parse_str(&order.id).is_ok());
    }

    #[test]
    fn test_build_order_ids_are_unique() {
        let lines = single(500);
        let a = build_order(&lines, None, "A", "1").unwrap();
        let b = build_order(&lines, None, "A", "1").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_custom_tax_rate() {
        let price = price_cart_with_rate(&single(1000), None, TaxRate::from_bps(825)).unwrap();
        // $10.00 × 8.25% = $0.825 → $0.83
        assert_eq!(price.tax.cents(), 83);
        assert_eq!(price.total.cents(), 1083);
        assert_eq!(price.taxable_base().cents(), 1000);
    }
}
