//! # Commands Module
//!
//! Every operation the UI collaborator (or the console) can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── product.rs  ◄─── Catalog search, inventory form, inventory report
//! ├── cart.rs     ◄─── Cart manipulation (per session)
//! ├── sale.rs     ◄─── Checkout and receipt documents
//! └── report.rs   ◄─── Sales history, revenue, CSV export
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI collaborator / console                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  async fn add_to_cart(                                                  │
//! │      session: &Session,       ◄── who is asking (owns a cart)          │
//! │      product_id: String,      ◄── from the UI                          │
//! │      quantity: Option<i64>,   ◄── optional param                       │
//! │  ) -> Result<CartResponse, ApiError>                                    │
//! │         │                                                               │
//! │         │ (serde, camelCase)                                            │
//! │         ▼                                                               │
//! │  UI receives: { items: [...], totals: {...}, overStock: [...] }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Catalog and ledger only
//! async fn search_catalog(till: &Till, ...)
//!
//! // A cart: the session reaches the till itself
//! async fn add_to_cart(session: &Session, ...)
//! ```

pub mod cart;
pub mod product;
pub mod report;
pub mod sale;
