//! # State Module
//!
//! Application state for the storefront. Each piece is a separate type so a
//! command takes only what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  S: OrderStore   │  │    CartState     │  │    StoreConfig       │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  Database or     │  │  Arc<Mutex<      │  │  store_name          │  │
//! │  │  MemoryStore     │  │    Session       │  │  tax_rate            │  │
//! │  │  (cloneable)     │  │  >>              │  │  admin hash          │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Stores: internal pool / RwLock                                      │
//! │  • CartState: Arc<Mutex<T>> for exclusive access                       │
//! │  • StoreConfig: read-only after startup                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;

pub use cart::{CartState, Guest, Session};
pub use config::{StoreConfig, DEFAULT_RECEIPT_WIDTH, DEFAULT_STORE_NAME};
