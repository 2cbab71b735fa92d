//! # duka-store: Till State for Duka POS
//!
//! Catalog, open carts and the sales ledger, plus the checkout engine that
//! ties them together.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Duka POS Data Flow                               │
//! │                                                                         │
//! │  Till command (checkout)                                               │
//! │       │  store.lock()                                                   │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    duka-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Catalog     │    │     Store     │    │    Ledger    │  │   │
//! │  │   │ (catalog.rs)  │◄───│  (store.rs)   │───►│ (ledger.rs)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ products      │    │ open carts    │    │ sales        │  │   │
//! │  │   │ search        │    │ checkout      │    │ CSV export   │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sale → duka-receipt (after the lock is released)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`catalog`] - Product storage, search, inventory reports
//! - [`ledger`] - Append-only sale history and CSV export
//! - [`store`] - Open carts and checkout
//! - [`seed`] - Demo catalog
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust
//! use chrono::Utc;
//! use duka_core::{PaymentMethod, StockPolicy, WALK_IN_CUSTOMER};
//! use duka_store::{seed, Store};
//!
//! let mut store = Store::new(StockPolicy::Reject);
//! seed::seed_demo_catalog(&mut store).unwrap();
//!
//! let cart = store.open_cart();
//! store.add_to_cart(cart, "p1", 2).unwrap();
//!
//! let sale = store
//!     .checkout(cart, "Jane", WALK_IN_CUSTOMER, PaymentMethod::Cash, Utc::now())
//!     .unwrap();
//! assert_eq!(sale.total().minor(), 5000);
//! assert_eq!(store.catalog().get("p1").unwrap().stock, 8);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod ledger;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::Catalog;
pub use error::{StoreError, StoreResult};
pub use ledger::{Ledger, SaleRow, EXPORT_COLUMNS};
pub use store::{CartId, Store};
