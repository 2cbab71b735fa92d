//! # duka-core: Pure Business Logic for Duka POS
//!
//! This crate is the **heart** of Duka POS. It holds the domain types and
//! the rules that do not need any shared state: money arithmetic, cart
//! aggregation, sale snapshots, validation and stock policy.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Duka POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    UI collaborator (external)                   │   │
//! │  │    Products tab ──► Cart tab ──► Checkout ──► Reports tab       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    duka-till (apps/till)                        │   │
//! │  └───────────────┬─────────────────────────────┬───────────────────┘   │
//! │                  │                             │                        │
//! │  ┌───────────────▼───────────────┐   ┌─────────▼──────────────────┐   │
//! │  │ duka-store                    │   │ duka-receipt               │   │
//! │  │ catalog · ledger · checkout   │   │ layout · PDF · summary     │   │
//! │  └───────────────┬───────────────┘   └─────────┬──────────────────┘   │
//! │                  │                             │                        │
//! │  ┌───────────────▼─────────────────────────────▼──────────────────┐   │
//! │  │               ★ duka-core (THIS CRATE) ★                        │   │
//! │  │   types · money · cart · sale · validation · error              │   │
//! │  │   NO I/O • NO LOCKS • PURE FUNCTIONS                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, payment method, stock policy
//! - [`money`] - Integer money and currency formatting
//! - [`cart`] - Cart and cart lines (snapshot semantics)
//! - [`sale`] - Immutable sale records
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level rules
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use duka_core::{Cart, Money, NewProduct, PaymentMethod, Product, Sale, WALK_IN_CUSTOMER};
//!
//! let brace = Product::from_new(
//!     "p1",
//!     NewProduct::new("1001", "Orthopedic Knee Brace", Money::from_minor(2500), 10),
//!     Utc::now(),
//! );
//!
//! let mut cart = Cart::new();
//! cart.add_line(&brace, 2).unwrap();
//! assert_eq!(cart.subtotal().minor(), 5000);
//!
//! let sale = Sale::from_cart_lines("sale_1", cart.lines(), "", WALK_IN_CUSTOMER, PaymentMethod::Cash, Utc::now()).unwrap();
//! assert_eq!(sale.customer(), "Walk-in");
//! assert_eq!(sale.total(), cart.subtotal());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{CurrencyFormat, Money};
pub use sale::{Sale, SaleItem, SALE_DATE_FORMAT, WALK_IN_CUSTOMER};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and keeps receipts printable.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum price of a single unit, in minor units
///
/// ## Business Reason
/// Catches keying errors (a barcode typed into the price field). Also keeps
/// `price × MAX_ITEM_QUANTITY × MAX_CART_ITEMS` far inside i64.
pub const MAX_PRICE_MINOR: i64 = 1_000_000_000;

/// Maximum units on hand for one product, in either direction
///
/// ## Business Reason
/// Keeps `cost × stock` inside i64 for inventory valuation.
pub const MAX_STOCK: i64 = 1_000_000_000;
