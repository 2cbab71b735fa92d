//! # State Module
//!
//! Shared and per-cashier state for the till.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Till (one per process)                                         │   │
//! │  │  Arc<Mutex<Store>> · Arc<TillConfig> · Arc<ReceiptRenderer>     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │ open_session()                           │
//! │          ┌───────────────────┼───────────────────┐                     │
//! │          ▼                   ▼                   ▼                      │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐                │
//! │  │  Session A   │   │  Session B   │   │  Session C   │                │
//! │  │  uuid        │   │  uuid        │   │  uuid        │                │
//! │  │  cart_1      │   │  cart_2      │   │  cart_3      │                │
//! │  └──────────────┘   └──────────────┘   └──────────────┘                │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • Store: one Mutex guards catalog, open carts and ledger together     │
//! │  • TillConfig / ReceiptRenderer: read-only after startup               │
//! │  • Session: owned by one actor; Drop closes its cart                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;
mod till;

pub use config::{ConfigError, TillConfig, CONFIG_PATH_ENV};
pub use session::Session;
pub use till::Till;
