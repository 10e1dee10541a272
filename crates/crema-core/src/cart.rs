//! # Cart
//!
//! The customer's in-progress order. Never persisted; `build_order` turns a
//! snapshot of it into an `Order` at checkout.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer Action          Cart Method             Effect                │
//! │  ───────────────          ───────────             ──────                │
//! │                                                                         │
//! │  Tap menu item ──────────► add_item() ──────────► +1 (or new line)     │
//! │                                                                         │
//! │  Tap + / − ──────────────► update_quantity() ───► qty + delta,         │
//! │                                                   line dropped at 0     │
//! │                                                                         │
//! │  Swipe away ─────────────► remove_item() ───────► line removed         │
//! │                                                                         │
//! │  Order placed ───────────► clear() ─────────────► empty                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `menu_item_id`
//! - Every line has `quantity > 0`
//! - At most `MAX_CART_ITEMS` lines, `MAX_ITEM_QUANTITY` per line

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::pricing::{price_cart_with_rate, PriceBreakdown};
use crate::types::{CartLine, DiscountCode, MenuItem, TaxRate};
use crate::validation::validate_cart_size;
use crate::MAX_ITEM_QUANTITY;

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a menu item.
    pub fn add_item(&mut self, item: &MenuItem) -> CoreResult<()> {
        self.add_quantity(item, 1)
    }

    /// Adds `quantity` units of a menu item, merging with an existing line.
    ///
    /// ## Errors
    /// - `CoreError::ItemUnavailable` when the item is switched off
    /// - `CoreError::QuantityTooLarge` past 999 units
    /// - `CoreError::CartTooLarge` past 100 distinct lines
    pub fn add_quantity(&mut self, item: &MenuItem, quantity: i64) -> CoreResult<()> {
        if !item.available {
            return Err(CoreError::ItemUnavailable(item.id.clone()));
        }
        crate::validation::validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.menu_item_id == item.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        validate_cart_size(self.lines.len()).map_err(|_| CoreError::CartTooLarge {
            max: crate::MAX_CART_ITEMS,
        })?;

        self.lines.push(CartLine::from_menu_item(item, quantity));
        Ok(())
    }

    /// Applies a signed quantity change to a line.
    ///
    /// The result is clamped at zero; a line that reaches zero is removed.
    pub fn update_quantity(&mut self, menu_item_id: &str, delta: i64) -> CoreResult<()> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.menu_item_id == menu_item_id)
            .ok_or_else(|| CoreError::NotInCart(menu_item_id.to_string()))?;

        let new_qty = self.lines[idx].quantity.saturating_add(delta).max(0);
        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if new_qty == 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = new_qty;
        }
        Ok(())
    }

    /// Removes a line entirely.
    pub fn remove_item(&mut self, menu_item_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.menu_item_id != menu_item_id);

        if self.lines.len() == initial_len {
            Err(CoreError::NotInCart(menu_item_id.to_string()))
        } else {
            Ok(())
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Total units across all lines (the header badge count).
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Prices the current contents.
    pub fn price(&self, discount: Option<&DiscountCode>, rate: TaxRate) -> CoreResult<PriceBreakdown> {
        price_cart_with_rate(&self.lines, discount, rate)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::STANDARD_TAX_RATE;

    fn menu_item(id: &str, price_cents: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            description: String::new(),
            price_cents,
            category: "Hot Coffee".to_string(),
            image: String::new(),
            calories: None,
            available: true,
        }
    }

    #[test]
    fn test_add_same_item_increments() {
        let mut cart = Cart::new();
        let espresso = menu_item("hc-1", 350);

        cart.add_item(&espresso).unwrap();
        cart.add_item(&espresso).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.lines()[0].line_total().cents(), 700);
    }

    #[test]
    fn test_update_quantity_drops_line_at_zero() {
        let mut cart = Cart::new();
        cart.add_quantity(&menu_item("hc-1", 350), 2).unwrap();
        cart.add_item(&menu_item("bak-1", 450)).unwrap();

        cart.update_quantity("hc-1", -1).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);

        // Overshooting clamps at zero and removes the line
        cart.update_quantity("hc-1", -5).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.lines()[0].menu_item_id, "bak-1");

        assert!(matches!(
            cart.update_quantity("hc-1", 1),
            Err(CoreError::NotInCart(_))
        ));
    }

    #[test]
    fn test_unavailable_item_rejected() {
        let mut cart = Cart::new();
        let mut item = menu_item("cc-1", 500);
        item.available = false;

        assert!(matches!(cart.add_item(&item), Err(CoreError::ItemUnavailable(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::new();
        let item = menu_item("hc-1", 350);
        cart.add_quantity(&item, MAX_ITEM_QUANTITY).unwrap();

        assert!(matches!(
            cart.add_item(&item),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(matches!(
            cart.update_quantity("hc-1", 1),
            Err(CoreError::QuantityTooLarge { .. })
        ));
    }

    #[test]
    fn test_cart_line_limit() {
        let mut cart = Cart::new();
        for i in 0..crate::MAX_CART_ITEMS {
            cart.add_item(&menu_item(&format!("item-{}", i), 100)).unwrap();
        }

        assert!(matches!(
            cart.add_item(&menu_item("one-too-many", 100)),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("hc-1", 350)).unwrap();
        cart.add_item(&menu_item("hc-2", 550)).unwrap();

        cart.remove_item("hc-1").unwrap();
        assert!(cart.remove_item("hc-1").is_err());
        assert_eq!(cart.item_count(), 1);

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_price() {
        let mut cart = Cart::new();
        cart.add_quantity(&menu_item("a", 500), 2).unwrap();
        cart.add_item(&menu_item("b", 300)).unwrap();

        let price = cart.price(None, STANDARD_TAX_RATE).unwrap();
        assert_eq!(price.subtotal.cents(), 1300);
        assert_eq!(price.tax.cents(), 130);
        assert_eq!(price.total.cents(), 1430);
    }
}
