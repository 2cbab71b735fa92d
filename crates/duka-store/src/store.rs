//! # Store: Catalog + Open Carts + Ledger
//!
//! The single piece of mutable state behind a till. The application layer
//! wraps it in one mutex, so every method here runs as one critical section.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store::checkout(cart_id, ...)                      │
//! │                                                                         │
//! │  1. Cart empty?  ───────────────────────► EmptyCart (nothing touched)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. For every line, against the LIVE catalog:                           │
//! │     product gone?   ─────────────────────► DanglingReference           │
//! │     policy refuses? ─────────────────────► InsufficientStock           │
//! │       │                                                                 │
//! │       ▼  (all checks passed, nothing mutated yet)                       │
//! │  3. Snapshot lines into a Sale (id = sale_<n>)                          │
//! │  4. Apply every stock decrement                                         │
//! │  5. Prepend sale to ledger                                              │
//! │  6. Clear the cart                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Open Carts
//! Every session's cart lives here, keyed by [`CartId`]. A product is
//! "referenced" while any open cart holds a line for it, and such a product
//! cannot be deleted.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use duka_core::{
    Cart, CartLine, CoreError, CoreResult, Money, NewProduct, PaymentMethod, Product,
    ProductPatch, ProductUpsert, Sale, StockPolicy,
};

use crate::catalog::Catalog;
use crate::ledger::Ledger;

/// Handle to an open cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartId(u64);

impl fmt::Display for CartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cart_{}", self.0)
    }
}

/// Catalog, open carts and ledger under one owner.
#[derive(Debug)]
pub struct Store {
    catalog: Catalog,
    ledger: Ledger,
    carts: HashMap<CartId, Cart>,
    next_cart: u64,
    policy: StockPolicy,
}

impl Store {
    /// Creates an empty store that applies `policy` to every stock change.
    pub fn new(policy: StockPolicy) -> Self {
        Store {
            catalog: Catalog::new(),
            ledger: Ledger::new(),
            carts: HashMap::new(),
            next_cart: 1,
            policy,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    // =========================================================================
    // Catalog Writes
    // =========================================================================

    pub fn insert_product(&mut self, fields: NewProduct, now: DateTime<Utc>) -> CoreResult<Product> {
        self.catalog.insert(fields, self.policy, now)
    }

    pub fn upsert_product(&mut self, upsert: ProductUpsert, now: DateTime<Utc>) -> CoreResult<Product> {
        self.catalog.upsert(upsert, self.policy, now)
    }

    pub fn update_product(
        &mut self,
        id: &str,
        patch: &ProductPatch,
        now: DateTime<Utc>,
    ) -> CoreResult<Product> {
        self.catalog.update_fields(id, patch, self.policy, now)
    }

    /// Adjusts stock under the store's policy.
    pub fn adjust_stock(&mut self, id: &str, delta: i64, now: DateTime<Utc>) -> CoreResult<i64> {
        self.catalog.adjust_stock(id, delta, self.policy, now)
    }

    /// Deletes a product unless an open cart still holds it.
    pub fn delete_product(&mut self, id: &str) -> CoreResult<Product> {
        let carts = self.cart_references(id);
        if carts > 0 {
            warn!(product_id = %id, carts, "Refusing to delete product held by open carts");
            return Err(CoreError::DanglingReference {
                product_id: id.to_string(),
                carts,
            });
        }
        self.catalog.delete(id)
    }

    /// Number of open carts holding a line for `product_id`.
    pub fn cart_references(&self, product_id: &str) -> usize {
        self.carts
            .values()
            .filter(|cart| cart.line(product_id).is_some())
            .count()
    }

    // =========================================================================
    // Open Carts
    // =========================================================================

    pub fn open_cart(&mut self) -> CartId {
        let id = CartId(self.next_cart);
        self.next_cart += 1;
        self.carts.insert(id, Cart::new());
        debug!(cart_id = %id, "Opened cart");
        id
    }

    /// Closes a cart, dropping its lines (and therefore its references).
    pub fn close_cart(&mut self, id: CartId) -> Option<Cart> {
        let cart = self.carts.remove(&id);
        if cart.is_some() {
            debug!(cart_id = %id, "Closed cart");
        }
        cart
    }

    pub fn open_cart_count(&self) -> usize {
        self.carts.len()
    }

    pub fn cart(&self, id: CartId) -> CoreResult<&Cart> {
        self.carts
            .get(&id)
            .ok_or_else(|| CoreError::CartNotFound(id.to_string()))
    }

    /// Adds `quantity` of a catalog product to a cart.
    ///
    /// Returns `true` when a new line was created, `false` on merge.
    pub fn add_to_cart(&mut self, cart_id: CartId, product_id: &str, quantity: i64) -> CoreResult<bool> {
        let product = self.catalog.get(product_id)?;
        let cart = self
            .carts
            .get_mut(&cart_id)
            .ok_or_else(|| CoreError::CartNotFound(cart_id.to_string()))?;

        let created = cart.add_line(product, quantity)?;
        debug!(cart_id = %cart_id, product_id = %product_id, quantity, created, "Added to cart");
        Ok(created)
    }

    pub fn update_cart_quantity(
        &mut self,
        cart_id: CartId,
        product_id: &str,
        quantity: i64,
    ) -> CoreResult<CartLine> {
        let line = self.cart_mut(cart_id)?.update_quantity(product_id, quantity)?;
        Ok(line.clone())
    }

    /// Removes a line. `Ok(None)` means the product was not in the cart.
    pub fn remove_from_cart(&mut self, cart_id: CartId, product_id: &str) -> CoreResult<Option<CartLine>> {
        Ok(self.cart_mut(cart_id)?.remove_line(product_id))
    }

    pub fn clear_cart(&mut self, cart_id: CartId) -> CoreResult<()> {
        self.cart_mut(cart_id)?.clear();
        Ok(())
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Converts a cart into a committed sale.
    ///
    /// Every check runs before the first mutation: on error the catalog,
    /// the cart and the ledger are exactly as they were.
    pub fn checkout(
        &mut self,
        cart_id: CartId,
        customer: &str,
        walk_in_label: &str,
        payment: PaymentMethod,
        at: DateTime<Utc>,
    ) -> CoreResult<Sale> {
        let cart = self
            .carts
            .get(&cart_id)
            .ok_or_else(|| CoreError::CartNotFound(cart_id.to_string()))?;
        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let mut plan: Vec<(String, i64)> = Vec::with_capacity(cart.len());
        for line in cart.lines() {
            let product = self.catalog.find_by_id(&line.product_id).ok_or_else(|| {
                CoreError::DanglingReference {
                    product_id: line.product_id.clone(),
                    carts: 0,
                }
            })?;

            let next = self
                .policy
                .resolve(&product.sku, product.stock, -line.quantity)?;
            plan.push((product.id.clone(), next));
        }

        let sale = Sale::from_cart_lines(
            self.ledger.next_sale_id(),
            cart.lines(),
            customer,
            walk_in_label,
            payment,
            at,
        )?;

        for (product_id, stock) in &plan {
            self.catalog.set_stock(product_id, *stock, at);
        }
        self.ledger.append(sale.clone());
        if let Some(cart) = self.carts.get_mut(&cart_id) {
            cart.clear();
        }

        info!(
            sale_id = %sale.id(),
            total = %sale.total(),
            items = sale.items().len(),
            payment = %sale.payment(),
            "Sale completed"
        );
        Ok(sale)
    }

    // =========================================================================
    // Reports
    // =========================================================================

    pub fn total_revenue(&self) -> Money {
        self.ledger.total_revenue()
    }

    pub fn low_stock(&self) -> Vec<&Product> {
        self.catalog.low_stock()
    }

    pub fn expiring_within(&self, today: NaiveDate, days: i64) -> Vec<&Product> {
        self.catalog.expiring_within(today, days)
    }

    fn cart_mut(&mut self, id: CartId) -> CoreResult<&mut Cart> {
        self.carts
            .get_mut(&id)
            .ok_or_else(|| CoreError::CartNotFound(id.to_string()))
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StockPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duka_core::WALK_IN_CUSTOMER;
    use proptest::prelude::*;

    fn store_with_brace(policy: StockPolicy) -> Store {
        let mut store = Store::new(policy);
        store
            .insert_product(
                NewProduct::new("1001", "Orthopedic Knee Brace", Money::from_minor(2500), 10),
                Utc::now(),
            )
            .unwrap();
        store
    }

    fn checkout(store: &mut Store, cart: CartId, customer: &str) -> CoreResult<Sale> {
        store.checkout(cart, customer, WALK_IN_CUSTOMER, PaymentMethod::Cash, Utc::now())
    }

    #[test]
    fn test_checkout_scenario() {
        let mut store = store_with_brace(StockPolicy::Reject);
        let cart = store.open_cart();

        store.add_to_cart(cart, "p1", 2).unwrap();
        assert_eq!(store.cart(cart).unwrap().subtotal().minor(), 5000);

        let sale = checkout(&mut store, cart, "Jane").unwrap();
        assert_eq!(sale.id(), "sale_1");
        assert_eq!(sale.total().minor(), 5000);
        assert_eq!(sale.customer(), "Jane");
        assert_eq!(store.catalog().get("p1").unwrap().stock, 8);
        assert!(store.cart(cart).unwrap().is_empty());
        assert_eq!(store.ledger().len(), 1);
        assert_eq!(store.ledger().all()[0].id(), "sale_1");

        let err = checkout(&mut store, cart, "Jane").unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
        assert_eq!(store.ledger().len(), 1);
        assert_eq!(store.catalog().get("p1").unwrap().stock, 8);
    }

    #[test]
    fn test_checkout_rejects_oversell_without_mutation() {
        let mut store = store_with_brace(StockPolicy::Reject);
        store
            .insert_product(
                NewProduct::new("1003", "Ankle Walker", Money::from_minor(3200), 5),
                Utc::now(),
            )
            .unwrap();

        let cart = store.open_cart();
        store.add_to_cart(cart, "p1", 3).unwrap();
        store.add_to_cart(cart, "p2", 6).unwrap();

        let err = checkout(&mut store, cart, "").unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { ref sku, available: 5, requested: 6 } if sku == "1003"
        ));

        assert_eq!(store.catalog().get("p1").unwrap().stock, 10);
        assert_eq!(store.catalog().get("p2").unwrap().stock, 5);
        assert_eq!(store.cart(cart).unwrap().len(), 2);
        assert!(store.ledger().is_empty());
    }

    #[test]
    fn test_checkout_allow_negative_backorders() {
        let mut store = store_with_brace(StockPolicy::AllowNegative);
        let cart = store.open_cart();
        store.add_to_cart(cart, "p1", 12).unwrap();

        checkout(&mut store, cart, "").unwrap();
        assert_eq!(store.catalog().get("p1").unwrap().stock, -2);
    }

    #[test]
    fn test_checkout_clamp_to_zero() {
        let mut store = store_with_brace(StockPolicy::ClampToZero);
        let cart = store.open_cart();
        store.add_to_cart(cart, "p1", 12).unwrap();

        let sale = checkout(&mut store, cart, "").unwrap();
        assert_eq!(sale.total().minor(), 30000);
        assert_eq!(store.catalog().get("p1").unwrap().stock, 0);
    }

    #[test]
    fn test_checkout_uses_cart_snapshot_price() {
        let mut store = store_with_brace(StockPolicy::Reject);
        let cart = store.open_cart();
        store.add_to_cart(cart, "p1", 1).unwrap();

        store
            .update_product(
                "p1",
                &ProductPatch {
                    price: Some(Money::from_minor(9999)),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();

        let sale = checkout(&mut store, cart, "").unwrap();
        assert_eq!(sale.total().minor(), 2500);
        assert_eq!(sale.customer(), "Walk-in");
    }

    #[test]
    fn test_delete_blocked_while_in_open_cart() {
        let mut store = store_with_brace(StockPolicy::Reject);
        let a = store.open_cart();
        let b = store.open_cart();
        store.add_to_cart(a, "p1", 1).unwrap();
        store.add_to_cart(b, "p1", 1).unwrap();

        let err = store.delete_product("p1").unwrap_err();
        assert!(matches!(err, CoreError::DanglingReference { carts: 2, .. }));

        store.remove_from_cart(a, "p1").unwrap();
        store.close_cart(b);
        assert_eq!(store.cart_references("p1"), 0);
        assert!(store.delete_product("p1").is_ok());
    }

    #[test]
    fn test_checkout_releases_references() {
        let mut store = store_with_brace(StockPolicy::Reject);
        let cart = store.open_cart();
        store.add_to_cart(cart, "p1", 1).unwrap();
        assert_eq!(store.cart_references("p1"), 1);

        checkout(&mut store, cart, "").unwrap();
        assert_eq!(store.cart_references("p1"), 0);
    }

    #[test]
    fn test_cart_operations_on_unknown_ids() {
        let mut store = store_with_brace(StockPolicy::Reject);
        let cart = store.open_cart();

        assert!(matches!(
            store.add_to_cart(cart, "p9", 1),
            Err(CoreError::ProductNotFound(_))
        ));
        assert!(matches!(
            store.update_cart_quantity(cart, "p1", 2),
            Err(CoreError::NotInCart(_))
        ));
        assert_eq!(store.remove_from_cart(cart, "p1").unwrap(), None);

        store.close_cart(cart);
        assert!(matches!(store.cart(cart), Err(CoreError::CartNotFound(_))));
        assert!(matches!(checkout(&mut store, cart, ""), Err(CoreError::CartNotFound(_))));
    }

    #[test]
    fn test_update_quantity_floors_at_one() {
        let mut store = store_with_brace(StockPolicy::Reject);
        let cart = store.open_cart();
        store.add_to_cart(cart, "p1", 3).unwrap();

        let line = store.update_cart_quantity(cart, "p1", 0).unwrap();
        assert_eq!(line.quantity, 1);
    }

    #[test]
    fn test_adjust_stock_uses_store_policy() {
        let mut store = store_with_brace(StockPolicy::Reject);
        assert!(store.adjust_stock("p1", -11, Utc::now()).is_err());
        assert_eq!(store.adjust_stock("p1", 5, Utc::now()).unwrap(), 15);
    }

    proptest! {
        #[test]
        fn prop_checkout_conserves_stock_and_totals(qtys in prop::collection::vec(1i64..20, 1..6)) {
            let mut store = Store::new(StockPolicy::Reject);
            for (i, _) in qtys.iter().enumerate() {
                store
                    .insert_product(
                        NewProduct::new(format!("SKU{}", i), format!("Item {}", i), Money::from_minor(100 + i as i64), 50),
                        Utc::now(),
                    )
                    .unwrap();
            }

            let cart = store.open_cart();
            for (i, qty) in qtys.iter().enumerate() {
                store.add_to_cart(cart, &format!("p{}", i + 1), *qty).unwrap();
            }
            let subtotal = store.cart(cart).unwrap().subtotal();

            let sale = checkout(&mut store, cart, "").unwrap();
            prop_assert_eq!(sale.total(), subtotal);
            for (i, qty) in qtys.iter().enumerate() {
                let stock = store.catalog().get(&format!("p{}", i + 1)).unwrap().stock;
                prop_assert_eq!(stock, 50 - qty);
            }
            prop_assert!(store.cart(cart).unwrap().is_empty());
        }
    }
}
