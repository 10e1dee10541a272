//! # crema-db: Persistence Layer for Crema
//!
//! Storage for the menu, order history and discount codes, behind the
//! [`OrderStore`] trait.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Crema Data Flow                                  │
//! │                                                                         │
//! │  OrderingFlow::checkout / StaffConsole::complete_order                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     crema-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │  OrderStore   │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (store.rs)   │    │  (SQLite)     │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ Database      │───►│ MenuRepo      │    │ 001_initial  │  │   │
//! │  │   │ MemoryStore   │    │ OrderRepo     │    │ _schema.sql  │  │   │
//! │  │   │               │    │ DiscountRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   <platform data dir>/crema.db  (or CREMA_DB_PATH)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `OrderStore` trait and its SQLite implementation
//! - [`memory`] - In-memory `OrderStore`
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`repository`] - SQLite repositories (menu, order, discount)
//! - [`seed`] - House menu and welcome code
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use crema_db::{Database, DbConfig, OrderStore};
//!
//! let db = Database::new(DbConfig::new("path/to/crema.db")).await?;
//! let menu = db.menu().await?;
//! let code = db.find_active_discount("welcome10").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig, DbLocation};
pub use store::OrderStore;

pub use repository::discount::DiscountRepository;
pub use repository::menu::MenuRepository;
pub use repository::order::OrderRepository;

// =============================================================================
// Adapter Tests
// =============================================================================
// The same behaviour suite runs against both adapters.

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use crema_core::pricing::build_order_at;
    use crema_core::{CartLine, CoreError, DiscountCode, MenuItem, Money, OrderStatus, STANDARD_TAX_RATE};

    async fn sqlite() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn lines() -> Vec<CartLine> {
        vec![
            CartLine {
                menu_item_id: "hc-1".to_string(),
                name: "Espresso Silk".to_string(),
                unit_price_cents: 350,
                quantity: 2,
            },
            CartLine {
                menu_item_id: "bak-1".to_string(),
                name: "Almond Croissant".to_string(),
                unit_price_cents: 450,
                quantity: 1,
            },
        ]
    }

    fn order_at(hour: u32) -> crema_core::Order {
        let created_at = Utc.with_ymd_and_hms(2026, 10, 18, hour, 15, 0).unwrap();
        build_order_at(&lines(), None, "Ana", "4", STANDARD_TAX_RATE, created_at).unwrap()
    }

    // -------------------------------------------------------------------------
    // Shared suite
    // -------------------------------------------------------------------------

    async fn menu_round_trip<S: OrderStore>(store: S) {
        let loaded = seed::load_house_menu(&store).await.unwrap();
        assert_eq!(loaded, 11);
        // Second run writes nothing
        assert_eq!(seed::load_house_menu(&store).await.unwrap(), 0);

        let menu = store.menu().await.unwrap();
        assert_eq!(menu.len(), 11);
        assert_eq!(menu[0].category, "Bakery");
        assert_eq!(menu[0].name, "Almond Croissant");

        assert_eq!(
            store.categories().await.unwrap(),
            vec!["Bakery", "Breakfast", "Cold Coffee", "Hot Coffee", "Tea"]
        );

        let mut scone: MenuItem = menu.iter().find(|m| m.id == "bak-2").unwrap().clone();
        scone.available = false;
        scone.price_cents = 400;
        store.save_menu_item(&scone).await.unwrap();

        let menu = store.menu().await.unwrap();
        let saved = menu.iter().find(|m| m.id == "bak-2").unwrap();
        assert!(!saved.available);
        assert_eq!(saved.price_cents, 400);
        assert_eq!(saved.calories, Some(320));

        store.delete_menu_item("bak-2").await.unwrap();
        assert_eq!(store.menu().await.unwrap().len(), 10);
        assert!(matches!(
            store.delete_menu_item("bak-2").await,
            Err(DbError::NotFound { .. })
        ));
    }

    async fn order_lifecycle<S: OrderStore>(store: S) {
        let early = order_at(8);
        let late = order_at(11);
        store.create_order(&early).await.unwrap();
        store.create_order(&late).await.unwrap();

        let orders = store.orders().await.unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, late.id);
        assert_eq!(orders[1], early);

        assert!(matches!(
            store.create_order(&early).await,
            Err(DbError::UniqueViolation { .. })
        ));

        let start = Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap();
        let window = store.orders_between(start, start + Duration::hours(3)).await.unwrap();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].lines, late.lines);

        let done_at = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        let done = store.complete_order(&early.id, done_at).await.unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        assert_eq!(done.completed_at, Some(done_at));
        assert_eq!(done.total_cents, early.total_cents);

        let err = store.complete_order(&early.id, done_at).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::InvalidOrderStatus { .. })));

        assert!(matches!(
            store.complete_order("missing", done_at).await,
            Err(DbError::NotFound { .. })
        ));

        let orders = store.orders().await.unwrap();
        let stored = orders.iter().find(|o| o.id == early.id).unwrap();
        assert_eq!(stored.status, OrderStatus::Completed);
    }

    async fn discount_rules<S: OrderStore>(store: S) {
        let saved = store
            .save_discount(&DiscountCode::fixed("fiver", Money::from_cents(500)))
            .await
            .unwrap();
        assert_eq!(saved.code, "FIVER");

        let found = store.find_active_discount(" Fiver ").await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
        assert_eq!(found.value, 500);

        assert!(store.find_active_discount("NOPE").await.unwrap().is_none());
        assert!(store.find_active_discount("").await.unwrap().is_none());

        // Same text under another id
        let clash = DiscountCode::percent("FIVER", 500);
        assert!(matches!(
            store.save_discount(&clash).await,
            Err(DbError::UniqueViolation { .. })
        ));

        let mut inactive = saved.clone();
        inactive.active = false;
        store.save_discount(&inactive).await.unwrap();
        assert!(store.find_active_discount("FIVER").await.unwrap().is_none());
        assert_eq!(store.discounts().await.unwrap().len(), 1);

        store.delete_discount(&saved.id).await.unwrap();
        assert!(store.discounts().await.unwrap().is_empty());
        assert!(store.delete_discount(&saved.id).await.is_err());
    }

    // -------------------------------------------------------------------------
    // SQLite
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_sqlite_menu() {
        menu_round_trip(sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_orders() {
        order_lifecycle(sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_discounts() {
        discount_rules(sqlite().await).await;
    }

    #[tokio::test]
    async fn test_sqlite_welcome_code_seeded() {
        let db = sqlite().await;
        seed::load_house_menu(&db).await.unwrap();

        let code = db.find_active_discount("welcome10").await.unwrap().unwrap();
        assert_eq!(code.value, 1000);
        assert_eq!(db.menu_items().count().await.unwrap(), 11);
    }

    // -------------------------------------------------------------------------
    // Memory
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_memory_menu() {
        menu_round_trip(MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_memory_orders() {
        order_lifecycle(MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_memory_discounts() {
        discount_rules(MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_memory_clones_share_state() {
        let store = MemoryStore::with_menu(seed::house_menu());
        let other = store.clone();

        other.create_order(&order_at(9)).await.unwrap();
        assert_eq!(store.orders().await.unwrap().len(), 1);
        assert_eq!(store.menu().await.unwrap().len(), 11);
    }
}
