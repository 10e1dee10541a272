//! # Ordering Flow
//!
//! The guest-facing commands: browse the menu, build a cart, apply a promo
//! code and place the order.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout()                                      │
//! │                                                                         │
//! │  1. Snapshot session ──► lines, applied code, guest                     │
//! │         │                                                               │
//! │         ├── no guest ────────────► VALIDATION_ERROR                     │
//! │         ├── empty cart ──────────► VALIDATION_ERROR "Cart is empty"     │
//! │         ▼                                                               │
//! │  2. build_order_at() ──► pure pricing in crema-core                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  3. store.create_order() ──┬── Err ──► returned, cart untouched         │
//! │                            │                                            │
//! │                            ▼ Ok                                         │
//! │  4. Settle session ──► ordered lines out, code cleared if unchanged    │
//! │         │              (items added during the save stay in the cart)  │
//! │         ▼                                                               │
//! │  5. Receipt                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::{CartState, Guest, Session, StoreConfig};
use crema_core::menu::{available_items, items_in_category};
use crema_core::pricing::{build_order_at, requested_discount_code};
use crema_core::validation::{validate_customer_name, validate_table_number};
use crema_core::{CartLine, DiscountCode, MenuItem, Order, PriceBreakdown, Receipt};
use crema_db::OrderStore;

// =============================================================================
// Response Types
// =============================================================================

/// Cart contents with live totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub item_count: usize,
    pub total_quantity: i64,
    pub discount_code: Option<String>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order: Order,
    pub receipt: Receipt,
}

// =============================================================================
// Ordering Flow
// =============================================================================

/// Guest ordering session bound to a store.
#[derive(Debug, Clone)]
pub struct OrderingFlow<S: OrderStore> {
    store: S,
    session: CartState,
    config: StoreConfig,
}

impl<S: OrderStore> OrderingFlow<S> {
    pub fn new(store: S, session: CartState, config: StoreConfig) -> Self {
        OrderingFlow {
            store,
            session,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Menu
    // -------------------------------------------------------------------------

    /// Items a guest can order, optionally limited to one category.
    pub async fn menu(&self, category: Option<&str>) -> ApiResult<Vec<MenuItem>> {
        let menu = self.store.menu().await?;
        let in_category = items_in_category(&menu, category)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        Ok(available_items(&in_category).into_iter().cloned().collect())
    }

    pub async fn categories(&self) -> ApiResult<Vec<String>> {
        Ok(self.store.categories().await?)
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    /// Records who is ordering and at which table.
    pub fn welcome(&self, customer_name: &str, table_number: &str) -> ApiResult<Guest> {
        validate_customer_name(customer_name)?;
        validate_table_number(table_number)?;

        let guest = Guest {
            customer_name: customer_name.trim().to_string(),
            table_number: table_number.trim().to_string(),
        };
        self.session.with_session_mut(|s| s.guest = Some(guest.clone()));

        debug!(table = %guest.table_number, "Guest seated");
        Ok(guest)
    }

    pub fn guest(&self) -> Option<Guest> {
        self.session.with_session(|s| s.guest.clone())
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    /// Current cart with totals at the configured rate.
    pub fn cart(&self) -> ApiResult<CartView> {
        self.session.with_session(|s| self.view(s))
    }

    /// Adds one unit of a menu item.
    ///
    /// ## Errors
    /// - `NOT_FOUND` if the id is not on the menu
    /// - `CART_ERROR` if the item is switched off or the cart is full
    pub async fn add_to_cart(&self, menu_item_id: &str) -> ApiResult<CartView> {
        debug!(menu_item_id = %menu_item_id, "add_to_cart");

        let menu = self.store.menu().await?;
        let item = menu
            .into_iter()
            .find(|m| m.id == menu_item_id)
            .ok_or_else(|| ApiError::not_found("Menu item", menu_item_id))?;

        self.session.with_session_mut(|s| {
            s.cart.add_item(&item)?;
            self.view(s)
        })
    }

    /// Applies `delta` to a line; a line that reaches zero is removed.
    pub fn update_quantity(&self, menu_item_id: &str, delta: i64) -> ApiResult<CartView> {
        self.session.with_session_mut(|s| {
            s.cart.update_quantity(menu_item_id, delta)?;
            self.view(s)
        })
    }

    pub fn remove_from_cart(&self, menu_item_id: &str) -> ApiResult<CartView> {
        self.session.with_session_mut(|s| {
            s.cart.remove_item(menu_item_id)?;
            self.view(s)
        })
    }

    pub fn clear_cart(&self) {
        self.session.with_session_mut(Session::reset_order);
    }

    /// Prices the cart with the applied code at the configured rate.
    pub fn price_cart(&self) -> ApiResult<PriceBreakdown> {
        self.session.with_session(|s| {
            Ok(s.cart.price(s.discount.as_ref(), self.config.tax_rate)?)
        })
    }

    // -------------------------------------------------------------------------
    // Discounts
    // -------------------------------------------------------------------------

    /// Looks up `code` and makes it the session's only applied code.
    ///
    /// A blank, unknown or inactive code is not an error: the applied code
    /// is cleared and the order is priced in full. Returns the code that is
    /// now applied.
    pub async fn apply_discount(&self, code: &str) -> ApiResult<Option<DiscountCode>> {
        let found = match requested_discount_code(code) {
            Some(code) => self.store.find_active_discount(&code).await?,
            None => None,
        };

        match &found {
            Some(d) => info!(code = %d.code, value = %d.describe_value(), "Discount applied"),
            None if !code.trim().is_empty() => debug!(code = %code.trim(), "Discount code not recognised"),
            None => {}
        }

        self.session.with_session_mut(|s| s.discount = found.clone());
        Ok(found)
    }

    pub fn applied_discount(&self) -> Option<DiscountCode> {
        self.session.with_session(|s| s.discount.clone())
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Prices and persists the cart as a pending order.
    ///
    /// The ordered lines and code leave the session only after the store
    /// accepts the order; on any error the session is left as it was.
    /// Anything the guest added while the order was saving stays in the cart.
    pub async fn checkout(&self) -> ApiResult<CheckoutResponse> {
        let (lines, discount, guest) = self
            .session
            .with_session(|s| (s.cart.lines().to_vec(), s.discount.clone(), s.guest.clone()));

        let guest = guest.ok_or_else(|| ApiError::validation("Enter your name and table number first"))?;
        if lines.is_empty() {
            return Err(ApiError::validation("Cart is empty"));
        }
        validate_customer_name(&guest.customer_name)?;
        validate_table_number(&guest.table_number)?;

        let order = build_order_at(
            &lines,
            discount.as_ref(),
            &guest.customer_name,
            &guest.table_number,
            self.config.tax_rate,
            Utc::now(),
        )?;

        if let Err(e) = self.store.create_order(&order).await {
            warn!(order_id = %order.id, error = %e, "Order not saved, cart kept");
            return Err(e.into());
        }

        self.session.with_session_mut(|s| {
            s.settle_order(&lines, discount.as_ref().map(|d| d.code.as_str()))
        });

        info!(
            order_id = %order.id,
            table = %order.table_number,
            total = %order.total(),
            items = order.item_count(),
            "Order placed"
        );

        let receipt = Receipt::from_order(&order, &self.config.store_name);
        Ok(CheckoutResponse { order, receipt })
    }

    /// Every order, newest first.
    pub async fn order_history(&self) -> ApiResult<Vec<Order>> {
        Ok(self.store.orders().await?)
    }

    fn view(&self, session: &Session) -> ApiResult<CartView> {
        let price = session.cart.price(session.discount.as_ref(), self.config.tax_rate)?;
        Ok(CartView {
            lines: session.cart.lines().to_vec(),
            item_count: session.cart.item_count(),
            total_quantity: session.cart.total_quantity(),
            discount_code: session.discount.as_ref().map(|d| d.code.clone()),
            subtotal_cents: price.subtotal.cents(),
            discount_cents: price.discount.cents(),
            tax_cents: price.tax.cents(),
            total_cents: price.total.cents(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
