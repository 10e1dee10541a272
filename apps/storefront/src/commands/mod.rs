//! # Commands Module
//!
//! Everything the storefront frontend and the staff CLI can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── checkout.rs  ◄─── Guest flow: menu, cart, promo code, checkout
//! └── staff.rs     ◄─── Admin gate, fulfillment, menu/code CRUD, metrics
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Caller                                                                 │
//! │  ──────                                                                 │
//! │  flow.apply_discount("welcome10").await                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  OrderingFlow<S: OrderStore>                                            │
//! │  ───────────────────────────                                            │
//! │  • state injected at construction (store, CartState, StoreConfig)       │
//! │  • pricing delegated to crema-core                                      │
//! │  • errors converted to ApiError { code, message }                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<T, ApiError>  (T: Serialize, camelCase)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod staff;

pub use checkout::{CartView, CheckoutResponse, OrderingFlow};
pub use staff::{hash_password, AdminGate, Dashboard, StaffConsole};
