//! # Staff Console
//!
//! Order fulfillment, menu and discount management, and revenue metrics.
//!
//! ## Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  password ──► AdminGate::verify ──► argon2 check against the           │
//! │                     │               CREMA_ADMIN_PASSWORD_HASH           │
//! │                     │                                                   │
//! │            ┌────────┴────────┐                                          │
//! │            ▼                 ▼                                          │
//! │       UNAUTHORIZED      StaffConsole<S>                                 │
//! │                           • dashboard(period)                           │
//! │                           • complete_order(id)                          │
//! │                           • save/delete menu items                      │
//! │                           • save/delete discount codes                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `StaffConsole` can only be obtained through [`StaffConsole::login`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::StoreConfig;
use crema_core::stats::{pending_queue, recently_completed};
use crema_core::validation::{validate_discount, validate_menu_item};
use crema_core::{DiscountCode, MenuItem, Order, OrderStats, Receipt, StatsPeriod};
use crema_db::OrderStore;

/// Completed orders shown on the dashboard.
const RECENT_COMPLETED_LIMIT: usize = 10;

// =============================================================================
// Admin Gate
// =============================================================================

/// Verifies the staff password against a stored argon2 hash.
#[derive(Clone)]
pub struct AdminGate {
    password_hash: Option<String>,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.password_hash.is_some())
            .finish()
    }
}

impl AdminGate {
    pub fn new(password_hash: Option<String>) -> Self {
        AdminGate { password_hash }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        AdminGate::new(config.admin_password_hash.clone())
    }

    /// ## Errors
    /// `UNAUTHORIZED` when no hash is configured or the password is wrong.
    pub fn verify(&self, password: &str) -> ApiResult<()> {
        let hash = self
            .password_hash
            .as_deref()
            .ok_or_else(|| ApiError::unauthorized("Staff password is not configured"))?;

        if verify_password(password, hash) {
            Ok(())
        } else {
            Err(ApiError::unauthorized("Incorrect password"))
        }
    }
}

fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hashes a staff password for `CREMA_ADMIN_PASSWORD_HASH`.
pub fn hash_password(password: &str) -> ApiResult<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    if password.is_empty() {
        return Err(ApiError::validation("Password must not be empty"));
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub period: StatsPeriod,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    /// Orders created inside the period
    pub stats: OrderStats,
    /// Every pending order, oldest first
    pub pending: Vec<Order>,
    pub recently_completed: Vec<Order>,
}

// =============================================================================
// Staff Console
// =============================================================================

#[derive(Debug, Clone)]
pub struct StaffConsole<S: OrderStore> {
    store: S,
    config: StoreConfig,
}

impl<S: OrderStore> StaffConsole<S> {
    /// Opens the console after checking `password` with `gate`.
    pub fn login(store: S, config: StoreConfig, gate: &AdminGate, password: &str) -> ApiResult<Self> {
        if let Err(e) = gate.verify(password) {
            warn!("Staff login rejected");
            return Err(e);
        }

        info!("Staff login");
        Ok(StaffConsole { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Metrics for `period` plus the fulfillment queues.
    pub async fn dashboard(&self, period: StatsPeriod, now: DateTime<Utc>) -> ApiResult<Dashboard> {
        let (start, end) = period.window(now);
        let in_period = self.store.orders_between(start, end).await?;
        let all = self.store.orders().await?;

        Ok(Dashboard {
            period,
            period_start: start,
            period_end: end,
            stats: OrderStats::from_orders(&in_period),
            pending: pending_queue(&all).into_iter().cloned().collect(),
            recently_completed: recently_completed(&all, RECENT_COMPLETED_LIMIT)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Every order, newest first.
    pub async fn orders(&self) -> ApiResult<Vec<Order>> {
        Ok(self.store.orders().await?)
    }

    /// Looks up an order by full id or by a prefix of at least 8 characters
    /// (the receipt shows 8).
    ///
    /// ## Errors
    /// - `NOT_FOUND` when nothing matches
    /// - `VALIDATION_ERROR` when the prefix matches more than one order
    pub async fn order(&self, order_id: &str) -> ApiResult<Order> {
        let orders = self.store.orders().await?;

        if let Some(exact) = orders.iter().find(|o| o.id == order_id) {
            return Ok(exact.clone());
        }
        if order_id.len() < 8 {
            return Err(ApiError::not_found("Order", order_id));
        }

        let mut matches = orders.into_iter().filter(|o| o.id.starts_with(order_id));
        match (matches.next(), matches.next()) {
            (Some(order), None) => Ok(order),
            (Some(_), Some(_)) => Err(ApiError::validation(format!(
                "Order id '{}' matches more than one order; use more characters",
                order_id
            ))),
            (None, _) => Err(ApiError::not_found("Order", order_id)),
        }
    }

    pub async fn receipt(&self, order_id: &str) -> ApiResult<Receipt> {
        let order = self.order(order_id).await?;
        Ok(Receipt::from_order(&order, &self.config.store_name))
    }

    /// Marks a pending order as completed.
    ///
    /// ## Errors
    /// - `NOT_FOUND` for an unknown id
    /// - `BUSINESS_LOGIC` if the order is already completed
    pub async fn complete_order(&self, order_id: &str) -> ApiResult<Order> {
        let order = self.order(order_id).await?;
        let done = self.store.complete_order(&order.id, Utc::now()).await?;
        info!(order_id = %done.id, table = %done.table_number, "Order completed");
        Ok(done)
    }

    // -------------------------------------------------------------------------
    // Menu
    // -------------------------------------------------------------------------

    pub async fn menu(&self) -> ApiResult<Vec<MenuItem>> {
        Ok(self.store.menu().await?)
    }

    /// Creates or updates a menu item. A blank id creates a new item.
    pub async fn save_menu_item(&self, mut item: MenuItem) -> ApiResult<MenuItem> {
        if item.id.trim().is_empty() {
            item.id = Uuid::new_v4().to_string();
        }
        item.name = item.name.trim().to_string();
        item.category = item.category.trim().to_string();
        item.description = item.description.trim().to_string();
        validate_menu_item(&item)?;

        self.store.save_menu_item(&item).await?;
        info!(item_id = %item.id, name = %item.name, price = %item.price(), "Menu item saved");
        Ok(item)
    }

    pub async fn set_item_available(&self, item_id: &str, available: bool) -> ApiResult<MenuItem> {
        let mut item = self
            .store
            .menu()
            .await?
            .into_iter()
            .find(|m| m.id == item_id)
            .ok_or_else(|| ApiError::not_found("Menu item", item_id))?;

        item.available = available;
        self.store.save_menu_item(&item).await?;
        Ok(item)
    }

    pub async fn delete_menu_item(&self, item_id: &str) -> ApiResult<()> {
        self.store.delete_menu_item(item_id).await?;
        info!(item_id = %item_id, "Menu item deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Discount Codes
    // -------------------------------------------------------------------------

    pub async fn discounts(&self) -> ApiResult<Vec<DiscountCode>> {
        Ok(self.store.discounts().await?)
    }

    /// Creates or updates a code. A blank id creates a new code; the code
    /// text is stored uppercase.
    pub async fn save_discount(&self, mut discount: DiscountCode) -> ApiResult<DiscountCode> {
        if discount.id.trim().is_empty() {
            discount.id = Uuid::new_v4().to_string();
        }
        validate_discount(&discount)?;

        let saved = self.store.save_discount(&discount).await?;
        info!(code = %saved.code, value = %saved.describe_value(), active = saved.active, "Discount saved");
        Ok(saved)
    }

    pub async fn set_discount_active(&self, discount_id: &str, active: bool) -> ApiResult<DiscountCode> {
        let mut discount = self
            .store
            .discounts()
            .await?
            .into_iter()
            .find(|d| d.id == discount_id)
            .ok_or_else(|| ApiError::not_found("Discount code", discount_id))?;

        discount.active = active;
        Ok(self.store.save_discount(&discount).await?)
    }

    pub async fn delete_discount(&self, discount_id: &str) -> ApiResult<()> {
        self.store.delete_discount(discount_id).await?;
        info!(discount_id = %discount_id, "Discount deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::OrderingFlow;
    use crate::error::ErrorCode;
    use crate::state::CartState;
    use crema_core::pricing::build_order;
    use crema_core::{CartLine, DiscountKind, Money, OrderStatus};
    use crema_db::seed::house_menu;
    use crema_db::{MemoryStore, OrderStore};

    fn console(store: MemoryStore) -> StaffConsole<MemoryStore> {
        let hash = hash_password("espresso").unwrap();
        let gate = AdminGate::new(Some(hash));
        StaffConsole::login(store, StoreConfig::default(), &gate, "espresso").unwrap()
    }

    async fn place_order(store: &MemoryStore, item_id: &str) -> Order {
        let flow = OrderingFlow::new(store.clone(), CartState::new(), StoreConfig::default());
        flow.welcome("Ana", "4").unwrap();
        flow.add_to_cart(item_id).await.unwrap();
        flow.checkout().await.unwrap().order
    }

    #[test]
    fn test_admin_gate() {
        let hash = hash_password("espresso").unwrap();
        assert!(hash.starts_with("$argon2"));

        let gate = AdminGate::new(Some(hash));
        assert!(gate.verify("espresso").is_ok());

        let err = gate.verify("admin123").unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err = AdminGate::new(None).verify("espresso").unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err = AdminGate::new(Some("plaintext".to_string())).verify("plaintext").unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        assert!(!format!("{:?}", AdminGate::new(Some("$argon2id$secret".into()))).contains("secret"));
    }

    #[test]
    fn test_login_rejects_bad_password() {
        let gate = AdminGate::new(Some(hash_password("espresso").unwrap()));
        let result = StaffConsole::login(MemoryStore::new(), StoreConfig::default(), &gate, "latte");
        assert_eq!(result.unwrap_err().code, ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn test_complete_order() {
        let store = MemoryStore::with_menu(house_menu());
        let order = place_order(&store, "hc-1").await;
        let staff = console(store);

        let done = staff.complete_order(&order.id).await.unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        assert!(done.completed_at.is_some());

        let err = staff.complete_order(&order.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let err = staff.complete_order("missing").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let receipt = staff.receipt(&order.id[..8]).await.unwrap();
        assert_eq!(receipt.order_id, order.id);
    }

    #[tokio::test]
    async fn test_ambiguous_order_prefix_is_rejected() {
        let store = MemoryStore::with_menu(house_menu());
        let line = CartLine::from_menu_item(&house_menu()[0], 1);
        for id in ["1a2b3c4d-0000-4000-8000-000000000001", "1a2b3c4d-0000-4000-8000-000000000002"] {
            let mut order = build_order(std::slice::from_ref(&line), None, "Ana", "4").unwrap();
            order.id = id.to_string();
            store.create_order(&order).await.unwrap();
        }
        let staff = console(store);

        let err = staff.complete_order("1a2b3c4d").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(staff
            .orders()
            .await
            .unwrap()
            .iter()
            .all(|o| o.status == OrderStatus::Pending));

        // A longer prefix or the full id picks exactly one
        let done = staff.complete_order("1a2b3c4d-0000-4000-8000-000000000002").await.unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        let receipt = staff.receipt("1a2b3c4d-0000-4000-8000-00000000000").await;
        assert_eq!(receipt.unwrap_err().code, ErrorCode::ValidationError);
        let receipt = staff.receipt("1a2b3c4d-0000-4000-8000-000000000001").await.unwrap();
        assert!(receipt.order_id.ends_with("01"));

        let err = staff.receipt("1a2b").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_dashboard() {
        let store = MemoryStore::with_menu(house_menu());
        let first = place_order(&store, "hc-1").await; // 3.50 + 0.35
        let second = place_order(&store, "brk-1").await; // 9.50 + 0.95
        let staff = console(store);
        staff.complete_order(&first.id).await.unwrap();

        let dash = staff.dashboard(StatsPeriod::Day, Utc::now()).await.unwrap();
        assert_eq!(dash.stats.total_orders, 2);
        assert_eq!(dash.stats.completed_orders, 1);
        assert_eq!(dash.stats.pending_orders, 1);
        assert_eq!(dash.stats.total_revenue, Money::from_cents(385 + 1045));
        assert_eq!(dash.stats.tax_collected, Money::from_cents(130));
        assert_eq!(dash.pending.len(), 1);
        assert_eq!(dash.pending[0].id, second.id);
        assert_eq!(dash.recently_completed[0].id, first.id);
    }

    #[tokio::test]
    async fn test_menu_management() {
        let staff = console(MemoryStore::with_menu(house_menu()));

        let item = staff
            .save_menu_item(MenuItem {
                id: String::new(),
                name: " Cortado ".to_string(),
                description: "Espresso cut with warm milk.".to_string(),
                price_cents: 425,
                category: "Hot Coffee".to_string(),
                image: String::new(),
                calories: Some(60),
                available: true,
            })
            .await
            .unwrap();
        assert!(!item.id.is_empty());
        assert_eq!(item.name, "Cortado");
        assert_eq!(staff.menu().await.unwrap().len(), 12);

        let hidden = staff.set_item_available(&item.id, false).await.unwrap();
        assert!(!hidden.available);

        let bad = MenuItem {
            price_cents: -1,
            ..item.clone()
        };
        assert_eq!(staff.save_menu_item(bad).await.unwrap_err().code, ErrorCode::ValidationError);

        staff.delete_menu_item(&item.id).await.unwrap();
        assert_eq!(staff.delete_menu_item(&item.id).await.unwrap_err().code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_discount_management() {
        let store = MemoryStore::with_menu(house_menu());
        let staff = console(store.clone());

        let saved = staff
            .save_discount(DiscountCode {
                id: String::new(),
                code: "summer5".to_string(),
                kind: DiscountKind::Fixed,
                value: 500,
                active: true,
            })
            .await
            .unwrap();
        assert_eq!(saved.code, "SUMMER5");
        assert!(store.find_active_discount("summer5").await.unwrap().is_some());

        let too_much = DiscountCode::percent("HALFPLUS", 15_000);
        assert_eq!(
            staff.save_discount(too_much).await.unwrap_err().code,
            ErrorCode::ValidationError
        );

        staff.set_discount_active(&saved.id, false).await.unwrap();
        assert!(store.find_active_discount("SUMMER5").await.unwrap().is_none());

        staff.delete_discount(&saved.id).await.unwrap();
        assert!(staff.discounts().await.unwrap().is_empty());
    }
}
