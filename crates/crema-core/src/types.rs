//! # Domain Types
//!
//! Core domain types used throughout Crema.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │    CartLine     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  menu_item_id   │──►│  id (UUID)      │       │
//! │  │  name           │   │  name (frozen)  │   │  lines (frozen) │       │
//! │  │  price_cents    │   │  unit_price     │   │  total_cents    │       │
//! │  │  category       │   │  quantity       │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  DiscountCode   │   │  OrderStatus    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  code (UPPER)   │   │  Pending        │       │
//! │  │  1000 = 10%     │   │  Percent|Fixed  │   │  Completed      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `CartLine` freezes the menu item's name and price at the moment it is
//! added. The `Order` copies those lines at checkout, so later menu edits
//! never rewrite order history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::STANDARD_TAX_RATE
    }
}

// =============================================================================
// Menu Item
// =============================================================================

/// An item on the menu. Staff-owned reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MenuItem {
    /// Business identifier, e.g. `hc-1`.
    pub id: String,

    /// Display name shown on the menu and the receipt.
    pub name: String,

    pub description: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Free-form category ("Hot Coffee", "Bakery", ...).
    pub category: String,

    /// Image reference (URL or asset key).
    pub image: String,

    /// Calorie count, when known.
    pub calories: Option<u32>,

    /// Whether the item can currently be ordered.
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One menu item plus the quantity the customer intends to order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub menu_item_id: String,
    /// Name at time of adding (frozen).
    pub name: String,
    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
}

impl CartLine {
    /// Snapshots a menu item with the given quantity.
    pub fn from_menu_item(item: &MenuItem, quantity: i64) -> Self {
        CartLine {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price_cents: item.price_cents,
            quantity,
        }
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Discount Code
// =============================================================================

/// How a discount code reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// `value` is basis points of the subtotal (1000 = 10% off).
    Percent,
    /// `value` is a flat amount in cents.
    Fixed,
}

impl DiscountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKind::Percent => "percent",
            DiscountKind::Fixed => "fixed",
        }
    }
}

/// A named reduction applied to the subtotal before tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountCode {
    pub id: String,
    /// Always stored uppercase; matched case-insensitively.
    pub code: String,
    pub kind: DiscountKind,
    /// Basis points for [`DiscountKind::Percent`], cents for [`DiscountKind::Fixed`].
    pub value: i64,
    pub active: bool,
}

impl DiscountCode {
    /// Creates an active percentage code. `bps` is basis points (1000 = 10%).
    pub fn percent(code: &str, bps: i64) -> Self {
        Self::new(code, DiscountKind::Percent, bps)
    }

    /// Creates an active fixed-amount code.
    pub fn fixed(code: &str, amount: Money) -> Self {
        Self::new(code, DiscountKind::Fixed, amount.cents())
    }

    fn new(code: &str, kind: DiscountKind, value: i64) -> Self {
        DiscountCode {
            id: Uuid::new_v4().to_string(),
            code: crate::pricing::normalize_discount_code(code),
            kind,
            value,
            active: true,
        }
    }

    /// Human-readable value, e.g. `10%` or `$5.00`.
    pub fn describe_value(&self) -> String {
        match self.kind {
            DiscountKind::Percent => {
                let whole = self.value / 100;
                let frac = self.value % 100;
                if frac == 0 {
                    format!("{}%", whole)
                } else {
                    format!("{}.{:02}%", whole, frac)
                }
            }
            DiscountKind::Fixed => Money::from_cents(self.value).to_string(),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Fulfillment status of an order. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed by the customer, waiting for staff.
    Pending,
    /// Fulfilled by staff.
    Completed,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Order
// =============================================================================

/// The immutable record created at checkout.
///
/// Only `status` (and `completed_at`) change after creation, through
/// [`Order::complete`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Cart lines at the moment of checkout (frozen).
    pub lines: Vec<CartLine>,
    pub subtotal_cents: i64,
    /// Label of the applied discount code, if any.
    pub discount_code: Option<String>,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub table_number: String,
    pub customer_name: String,
    pub status: OrderStatus,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Transitions `pending → completed`.
    ///
    /// ## Errors
    /// `CoreError::InvalidOrderStatus` if the order is already completed.
    pub fn complete(&mut self, at: DateTime<Utc>) -> CoreResult<()> {
        if self.status != OrderStatus::Pending {
            return Err(CoreError::InvalidOrderStatus {
                order_id: self.id.clone(),
                current_status: self.status.to_string(),
            });
        }

        self.status = OrderStatus::Completed;
        self.completed_at = Some(at);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_order() -> Order {
        Order {
            id: "ord-1".to_string(),
            created_at: Utc::now(),
            lines: vec![CartLine {
                menu_item_id: "hc-1".to_string(),
                name: "Espresso Silk".to_string(),
                unit_price_cents: 350,
                quantity: 2,
            }],
            subtotal_cents: 700,
            discount_code: None,
            discount_cents: 0,
            tax_cents: 70,
            total_cents: 770,
            table_number: "4".to_string(),
            customer_name: "Ana".to_string(),
            status: OrderStatus::Pending,
            completed_at: None,
        }
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(10.0);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_default_tax_rate_is_ten_percent() {
        assert_eq!(TaxRate::default().bps(), 1000);
    }

    #[test]
    fn test_discount_code_is_uppercased() {
        let code = DiscountCode::percent("  save10 ", 1000);
        assert_eq!(code.code, "SAVE10");
        assert!(code.active);
        assert_eq!(code.describe_value(), "10%");

        let code = DiscountCode::fixed("fiver", Money::from_cents(500));
        assert_eq!(code.describe_value(), "$5.00");

        let code = DiscountCode::percent("odd", 1250);
        assert_eq!(code.describe_value(), "12.50%");
    }

    #[test]
    fn test_order_status_serializes_lowercase() {
        let json = serde_json::to_string(&OrderStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        let kind: DiscountKind = serde_json::from_str("\"fixed\"").unwrap();
        assert_eq!(kind, DiscountKind::Fixed);
    }

    #[test]
    fn test_menu_item_available_defaults_true() {
        let json = r#"{
            "id": "bak-1",
            "name": "Almond Croissant",
            "description": "Flaky",
            "price_cents": 450,
            "category": "Bakery",
            "image": "croissant.jpg",
            "calories": 380
        }"#;
        let item: MenuItem = serde_json::from_str(json).unwrap();
        assert!(item.available);
        assert_eq!(item.price().cents(), 450);
    }

    #[test]
    fn test_order_complete_is_terminal() {
        let mut order = sample_order();
        let now = Utc::now();

        order.complete(now).unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.completed_at, Some(now));

        let err = order.complete(Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOrderStatus { .. }));
        assert_eq!(order.completed_at, Some(now));
    }

    #[test]
    fn test_order_item_count() {
        assert_eq!(sample_order().item_count(), 2);
    }
}
