//! # Cart Commands
//!
//! Commands for one session's cart.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Checkout │────►│  Sale in │       │
//! │  │  Cart    │     │          │     │          │     │  ledger  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                             │             │
//! │       │           update_cart_quantity                    │             │
//! │       │           remove_from_cart                        │             │
//! │       │                │                                  │             │
//! │       │                ▼                                  │             │
//! │       └──────── clear_cart ◄──────────────────────────────┘             │
//! │                                             (cart emptied on commit)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use duka_core::{Cart, CartLine, CartTotals};

use crate::error::ApiError;
use crate::state::Session;

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLine>,
    pub totals: CartTotals,
    /// Product ids whose quantity exceeds the stock seen when they were
    /// added. Advisory only: checkout checks live stock.
    pub over_stock: Vec<String>,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.lines().to_vec(),
            totals: CartTotals::from(cart),
            over_stock: cart
                .lines()
                .iter()
                .filter(|line| line.exceeds_snapshot_stock())
                .map(|line| line.product_id.clone())
                .collect(),
        }
    }
}

/// Result of removing a line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveResponse {
    /// The removed line, `None` when the product was not in the cart.
    pub removed: Option<CartLine>,
    pub cart: CartResponse,
}

/// Gets the session's cart.
pub async fn get_cart(session: &Session) -> Result<CartResponse, ApiError> {
    debug!(session_id = %session.id(), "get_cart command");
    let cart_id = session.cart_id();
    let response = session
        .till()
        .with_store(|store| store.cart(cart_id).map(CartResponse::from))?;
    Ok(response)
}

/// Adds a product to the cart.
///
/// ## Behavior
/// - If the product is already in the cart: quantity increases
/// - Otherwise: a new line with the current price and stock frozen
///
/// ## Arguments
/// * `product_id` - Catalog id (`p1`, ...)
/// * `quantity` - Quantity to add (default: 1, must be at least 1)
pub async fn add_to_cart(
    session: &Session,
    product_id: String,
    quantity: Option<i64>,
) -> Result<CartResponse, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(session_id = %session.id(), product_id = %product_id, quantity = %quantity, "add_to_cart command");

    let cart_id = session.cart_id();
    let response = session.till().with_store_mut(|store| {
        store.add_to_cart(cart_id, &product_id, quantity)?;
        store.cart(cart_id).map(CartResponse::from)
    })?;
    Ok(response)
}

/// Sets the quantity of a line. Values below 1 become 1.
pub async fn update_cart_quantity(
    session: &Session,
    product_id: String,
    quantity: i64,
) -> Result<CartResponse, ApiError> {
    debug!(session_id = %session.id(), product_id = %product_id, quantity = %quantity, "update_cart_quantity command");

    let cart_id = session.cart_id();
    let response = session.till().with_store_mut(|store| {
        store.update_cart_quantity(cart_id, &product_id, quantity)?;
        store.cart(cart_id).map(CartResponse::from)
    })?;
    Ok(response)
}

/// Removes a line from the cart.
pub async fn remove_from_cart(session: &Session, product_id: String) -> Result<RemoveResponse, ApiError> {
    debug!(session_id = %session.id(), product_id = %product_id, "remove_from_cart command");

    let cart_id = session.cart_id();
    let response = session.till().with_store_mut(|store| {
        let removed = store.remove_from_cart(cart_id, &product_id)?;
        if removed.is_none() {
            debug!(product_id = %product_id, "Product was not in cart");
        }
        store.cart(cart_id).map(|cart| RemoveResponse {
            removed,
            cart: CartResponse::from(cart),
        })
    })?;
    Ok(response)
}

/// Clears all lines from the cart.
pub async fn clear_cart(session: &Session) -> Result<CartResponse, ApiError> {
    debug!(session_id = %session.id(), "clear_cart command");

    let cart_id = session.cart_id();
    let response = session.till().with_store_mut(|store| {
        store.clear_cart(cart_id)?;
        store.cart(cart_id).map(CartResponse::from)
    })?;
    Ok(response)
}

/// Cart subtotal in minor units.
pub async fn cart_subtotal(session: &Session) -> Result<i64, ApiError> {
    let cart_id = session.cart_id();
    let subtotal = session
        .till()
        .with_store(|store| store.cart(cart_id).map(|cart| cart.subtotal().minor()))?;
    Ok(subtotal)
}
