//! # Cart State
//!
//! Holds the guest's ordering session: the cart, the applied discount code
//! and who is ordering from which table.
//!
//! ## Thread Safety
//! The session is wrapped in `Arc<Mutex<T>>`; several commands may touch it
//! and only one may modify it at a time.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session State Operations                             │
//! │                                                                         │
//! │  Guest Action             OrderingFlow            Session Change        │
//! │  ────────────             ────────────            ──────────────        │
//! │                                                                         │
//! │  Enter name + table ─────► welcome() ───────────► guest = Some(..)      │
//! │                                                                         │
//! │  Tap menu item ──────────► add_to_cart() ───────► cart.add_item()       │
//! │                                                                         │
//! │  +/- buttons ────────────► update_quantity() ───► cart.update_quantity()│
//! │                                                                         │
//! │  Enter promo code ───────► apply_discount() ────► discount = Some/None  │
//! │                                                                         │
//! │  Place order ────────────► checkout() ──────────► ordered lines and     │
//! │                                                  code settled           │
//! │                                                  (only on success)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crema_core::{Cart, CartLine, DiscountCode};

/// Who is ordering and where to bring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub customer_name: String,
    pub table_number: String,
}

/// Everything a single guest session accumulates before checkout.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub cart: Cart,

    /// At most one code per order; applying another replaces it.
    pub discount: Option<DiscountCode>,

    pub guest: Option<Guest>,
}

impl Session {
    /// Drops the cart and the applied code after a successful checkout.
    /// The guest stays so they can order again.
    pub fn reset_order(&mut self) {
        self.cart.clear();
        self.discount = None;
    }

    /// Takes a placed order's lines out of the cart.
    ///
    /// Checkout saves a snapshot without holding the lock, so the guest may
    /// have added items or changed the code meanwhile. Only the ordered
    /// quantities are subtracted, and the code is cleared only if it is
    /// still the one the order used.
    pub fn settle_order(&mut self, ordered: &[CartLine], code: Option<&str>) {
        for line in ordered {
            // Already removed by the guest during the save
            let _ = self.cart.update_quantity(&line.menu_item_id, -line.quantity);
        }
        if self.discount.as_ref().map(|d| d.code.as_str()) == code {
            self.discount = None;
        }
    }
}

/// Thread-safe wrapper for the session.
///
/// Clones share the same session.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    session: Arc<Mutex<Session>>,
}

impl CartState {
    /// Creates a new empty session.
    pub fn new() -> Self {
        CartState::default()
    }

    /// Executes a closure with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&session)
    }

    /// Executes a closure with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Session) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    }

    /// Executes a closure with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        self.with_session(|s| f(&s.cart))
    }

    /// Executes a closure with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        self.with_session_mut(|s| f(&mut s.cart))
    }
}
