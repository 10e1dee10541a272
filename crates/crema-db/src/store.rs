//! # Order Store
//!
//! The storage interface the storefront is written against.
//!
//! ## Adapters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   OrderingFlow / StaffConsole                                          │
//! │            │                                                            │
//! │            │  S: OrderStore                                             │
//! │            ▼                                                            │
//! │   ┌─────────────────────┐        ┌─────────────────────┐               │
//! │   │  Database (SQLite)  │        │  MemoryStore        │               │
//! │   │  file or :memory:   │        │  Arc<RwLock<..>>    │               │
//! │   │  production         │        │  tests, demos       │               │
//! │   └─────────────────────┘        └─────────────────────┘               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both adapters share these semantics:
//! - `menu` is ordered by category then name
//! - `orders` is newest first
//! - `save_discount` stores the code uppercase and rejects duplicate text
//! - `find_active_discount` is case-insensitive and ignores inactive codes

use chrono::{DateTime, Utc};

use crate::error::DbResult;
use crate::pool::Database;
use crema_core::{DiscountCode, MenuItem, Order};

/// Persistence for menu, orders and discount codes.
///
/// Handles are cheap to clone and passed explicitly; there is no global
/// store.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone + Send + Sync {
    /// Full menu, ordered by category then name.
    async fn menu(&self) -> DbResult<Vec<MenuItem>>;

    /// Inserts or replaces a menu item by id.
    async fn save_menu_item(&self, item: &MenuItem) -> DbResult<()>;

    async fn delete_menu_item(&self, id: &str) -> DbResult<()>;

    /// Distinct menu categories, sorted.
    async fn categories(&self) -> DbResult<Vec<String>>;

    /// Order history, newest first.
    async fn orders(&self) -> DbResult<Vec<Order>>;

    /// Orders created in `[start, end)`, newest first.
    async fn orders_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<Vec<Order>>;

    /// Persists a new order. Visible to `orders` once this returns `Ok`.
    async fn create_order(&self, order: &Order) -> DbResult<()>;

    /// `pending → completed`. Returns the updated order.
    async fn complete_order(&self, id: &str, at: DateTime<Utc>) -> DbResult<Order>;

    async fn discounts(&self) -> DbResult<Vec<DiscountCode>>;

    /// Inserts or replaces a code by id; returns it as stored.
    async fn save_discount(&self, discount: &DiscountCode) -> DbResult<DiscountCode>;

    async fn delete_discount(&self, id: &str) -> DbResult<()>;

    /// Active code matching `code` case-insensitively, if any.
    async fn find_active_discount(&self, code: &str) -> DbResult<Option<DiscountCode>>;
}

impl OrderStore for Database {
    async fn menu(&self) -> DbResult<Vec<MenuItem>> {
        self.menu_items().list().await
    }

    async fn save_menu_item(&self, item: &MenuItem) -> DbResult<()> {
        self.menu_items().upsert(item).await
    }

    async fn delete_menu_item(&self, id: &str) -> DbResult<()> {
        self.menu_items().delete(id).await
    }

    async fn categories(&self) -> DbResult<Vec<String>> {
        self.menu_items().categories().await
    }

    async fn orders(&self) -> DbResult<Vec<Order>> {
        self.order_history().list().await
    }

    async fn orders_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> DbResult<Vec<Order>> {
        self.order_history().list_between(start, end).await
    }

    async fn create_order(&self, order: &Order) -> DbResult<()> {
        self.order_history().insert(order).await
    }

    async fn complete_order(&self, id: &str, at: DateTime<Utc>) -> DbResult<Order> {
        self.order_history().complete(id, at).await
    }

    async fn discounts(&self) -> DbResult<Vec<DiscountCode>> {
        self.discount_codes().list().await
    }

    async fn save_discount(&self, discount: &DiscountCode) -> DbResult<DiscountCode> {
        self.discount_codes().upsert(discount).await
    }

    async fn delete_discount(&self, id: &str) -> DbResult<()> {
        self.discount_codes().delete(id).await
    }

    async fn find_active_discount(&self, code: &str) -> DbResult<Option<DiscountCode>> {
        self.discount_codes().find_active(code).await
    }
}
