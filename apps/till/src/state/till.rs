//! # Till State
//!
//! The process-wide shared state: one store, one config, one renderer.
//!
//! ## Thread Safety
//! The store is wrapped in `Arc<Mutex<T>>` because:
//! 1. Every session reads and writes the same catalog and ledger
//! 2. Checkout must decrement stock and append the sale as one step
//! 3. Commands run concurrently on the tokio runtime
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Till (cloned into every session)                     │
//! │                                                                         │
//! │  Session A ──┐                                                          │
//! │              ├──► with_store_mut ──► Mutex<Store> ──► catalog           │
//! │  Session B ──┘    (closure, never                    carts             │
//! │                    held across .await)                ledger            │
//! │                                                                         │
//! │  config: Arc<TillConfig>        read-only                              │
//! │  renderer: Arc<ReceiptRenderer> read-only, used on blocking threads    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tracing::info;

use duka_core::CoreResult;
use duka_receipt::ReceiptRenderer;
use duka_store::{seed::seed_demo_catalog, Store};

use super::config::TillConfig;
use super::session::Session;

/// Shared till state. Cloning is cheap and shares everything.
#[derive(Debug, Clone)]
pub struct Till {
    store: Arc<Mutex<Store>>,
    config: Arc<TillConfig>,
    renderer: Arc<ReceiptRenderer>,
}

impl Till {
    /// Builds the till, seeding the demo catalog when configured.
    pub fn new(config: TillConfig) -> CoreResult<Self> {
        let mut store = Store::new(config.stock_policy);
        if config.seed_demo {
            seed_demo_catalog(&mut store)?;
        }

        info!(
            store_name = %config.store.name,
            policy = %config.stock_policy,
            products = store.catalog().len(),
            "Till ready"
        );

        Ok(Till {
            store: Arc::new(Mutex::new(store)),
            renderer: Arc::new(config.renderer()),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &TillConfig {
        &self.config
    }

    pub fn renderer(&self) -> Arc<ReceiptRenderer> {
        Arc::clone(&self.renderer)
    }

    /// Opens a new session with its own empty cart.
    pub fn open_session(&self) -> Session {
        Session::open(self.clone())
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let revenue = till.with_store(|store| store.total_revenue());
    /// ```
    pub fn with_store<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Store) -> R,
    {
        let store = self.store.lock().expect("Store mutex poisoned");
        f(&store)
    }

    /// Executes a function with write access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// till.with_store_mut(|store| store.add_to_cart(cart_id, "p1", 1))?;
    /// ```
    pub fn with_store_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Store) -> R,
    {
        let mut store = self.store.lock().expect("Store mutex poisoned");
        f(&mut store)
    }

    /// Like `with_store_mut`, but gives up instead of panicking when the
    /// mutex is poisoned. Used from `Drop`.
    pub(crate) fn try_with_store_mut<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Store) -> R,
    {
        self.store.lock().ok().map(|mut store| f(&mut store))
    }
}
