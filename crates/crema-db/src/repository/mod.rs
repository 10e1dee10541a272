//! # Repository Module
//!
//! SQLite repositories for Crema.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  OrderStore for Database                                               │
//! │       │                                                                 │
//! │       │  db.order_history().insert(&order)                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── insert(&self, order)       (orders + order_items, one tx)         │
//! │  ├── list(&self)                                                       │
//! │  ├── list_between(&self, start, end)                                   │
//! │  └── complete(&self, id, at)                                           │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository reads rows into a private `FromRow` struct and converts
//! it to the `crema-core` type, so core types stay free of SQL concerns.
//!
//! ## Available Repositories
//!
//! - [`MenuRepository`](menu::MenuRepository) - Menu items and categories
//! - [`OrderRepository`](order::OrderRepository) - Orders and their line snapshots
//! - [`DiscountRepository`](discount::DiscountRepository) - Discount codes

pub mod discount;
pub mod menu;
pub mod order;
