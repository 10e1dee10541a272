//! # In-Memory Store
//!
//! An `OrderStore` that keeps everything in process memory. Used by tests
//! and the demo kiosk; clones share the same state.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::store::OrderStore;
use crema_core::menu::{categories, sort_for_display};
use crema_core::pricing::normalize_discount_code;
use crema_core::{DiscountCode, MenuItem, Order};

#[derive(Debug, Default)]
struct MemoryState {
    menu: Vec<MenuItem>,
    /// Oldest first; reversed on read.
    orders: Vec<Order>,
    discounts: Vec<DiscountCode>,
}

/// Shared in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded with a menu.
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        MemoryStore {
            state: Arc::new(RwLock::new(MemoryState {
                menu,
                ..MemoryState::default()
            })),
        }
    }
}

impl OrderStore for MemoryStore {
    async fn menu(&self) -> DbResult<Vec<MenuItem>> {
        let mut menu = self.state.read().await.menu.clone();
        sort_for_display(&mut menu);
        Ok(menu)
    }

    async fn save_menu_item(&self, item: &MenuItem) -> DbResult<()> {
        debug!(id = %item.id, "Saving menu item (memory)");
        let mut state = self.state.write().await;

        match state.menu.iter_mut().find(|m| m.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => state.menu.push(item.clone()),
        }
        Ok(())
    }

    async fn delete_menu_item(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.write().await;
        let before = state.menu.len();
        state.menu.retain(|m| m.id != id);

        if state.menu.len() == before {
            return Err(DbError::not_found("MenuItem", id));
        }
        Ok(())
    }

    async fn categories(&self) -> DbResult<Vec<String>> {
        Ok(categories(&self.state.read().await.menu))
    }

    async fn orders(&self) -> DbResult<Vec<Order>> {
        let mut orders = self.state.read().await.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn orders_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .state
            .read()
            .await
            .orders
            .iter()
            .filter(|o| o.created_at >= start && o.created_at < end)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn create_order(&self, order: &Order) -> DbResult<()> {
        debug!(id = %order.id, total_cents = order.total_cents, "Inserting order (memory)");
        let mut state = self.state.write().await;

        if state.orders.iter().any(|o| o.id == order.id) {
            return Err(DbError::duplicate("order id", &order.id));
        }
        state.orders.push(order.clone());
        Ok(())
    }

    async fn complete_order(&self, id: &str, at: DateTime<Utc>) -> DbResult<Order> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| DbError::not_found("Order", id))?;

        order.complete(at)?;
        Ok(order.clone())
    }

    async fn discounts(&self) -> DbResult<Vec<DiscountCode>> {
        let mut discounts = self.state.read().await.discounts.clone();
        discounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(discounts)
    }

    async fn save_discount(&self, discount: &DiscountCode) -> DbResult<DiscountCode> {
        let mut saved = discount.clone();
        saved.code = normalize_discount_code(&discount.code);

        let mut state = self.state.write().await;
        if state
            .discounts
            .iter()
            .any(|d| d.code == saved.code && d.id != saved.id)
        {
            return Err(DbError::duplicate("code", &saved.code));
        }

        match state.discounts.iter_mut().find(|d| d.id == saved.id) {
            Some(existing) => *existing = saved.clone(),
            None => state.discounts.push(saved.clone()),
        }
        Ok(saved)
    }

    async fn delete_discount(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.write().await;
        let before = state.discounts.len();
        state.discounts.retain(|d| d.id != id);

        if state.discounts.len() == before {
            return Err(DbError::not_found("DiscountCode", id));
        }
        Ok(())
    }

    async fn find_active_discount(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        let code = normalize_discount_code(code);
        if code.is_empty() {
            return Ok(None);
        }

        Ok(self
            .state
            .read()
            .await
            .discounts
            .iter()
            .find(|d| d.active && d.code == code)
            .cloned())
    }
}
