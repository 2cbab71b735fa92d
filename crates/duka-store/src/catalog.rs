//! # Catalog Store
//!
//! The set of sellable products, kept in insertion order.
//!
//! ## Key Operations
//! - Exact lookup and filtered search
//! - Insert / upsert / partial update / delete
//! - Stock adjustment under a `StockPolicy`
//! - Inventory reports (low stock, expiry, stock value)
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Catalog Search Matches                           │
//! │                                                                         │
//! │  Cashier types: "belt"                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  name contains "belt" (case-insensitive)   OR                          │
//! │  sku contains "belt"                       OR                          │
//! │  barcode == "belt"                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ 1001 | Orthopedic Knee Brace            │                           │
//! │  │ 1002 | Spine Support Belt               │ ← MATCH!                  │
//! │  │ 1003 | Ankle Walker                     │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  Results keep catalog (insertion) order. Empty query → everything.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use duka_core::validation::ValidationResult;
use duka_core::{
    CoreError, CoreResult, Money, NewProduct, Product, ProductPatch, ProductUpsert,
    StockPolicy, ValidationError,
};

/// In-memory product catalog.
///
/// ## Identity
/// Ids come from a counter that only ever grows (`p1`, `p2`, ...), so a
/// deleted product's id is never handed out again.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    next_seq: u64,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog {
            products: Vec::new(),
            next_seq: 1,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Exact lookup. `None` means "not found", not an error.
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Exact lookup with a typed error.
    pub fn get(&self, id: &str) -> CoreResult<&Product> {
        self.find_by_id(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    /// Exact SKU lookup.
    pub fn find_by_sku(&self, sku: &str) -> Option<&Product> {
        let sku = sku.trim();
        self.products.iter().find(|p| p.sku == sku)
    }

    /// Searches by name (case-insensitive substring), SKU (substring) or
    /// barcode (exact).
    ///
    /// ## Example
    /// ```rust
    /// use duka_store::Catalog;
    /// use duka_core::{Money, NewProduct, StockPolicy};
    /// use chrono::Utc;
    ///
    /// let mut catalog = Catalog::new();
    /// let belt = NewProduct::new("1002", "Spine Support Belt", Money::from_minor(1800), 8);
    /// catalog.insert(belt, StockPolicy::Reject, Utc::now()).unwrap();
    ///
    /// assert_eq!(catalog.search("BELT").len(), 1);
    /// assert_eq!(catalog.search("100").len(), 1);
    /// assert_eq!(catalog.search("").len(), 1);
    /// assert!(catalog.search("walker").is_empty());
    /// ```
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.trim();
        if query.is_empty() {
            return self.products.iter().collect();
        }

        let needle = query.to_lowercase();
        let results: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.sku.contains(query)
                    || p.barcode.as_deref() == Some(query)
            })
            .collect();

        debug!(query = %query, count = results.len(), "Catalog search");
        results
    }

    /// All products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts a new product and assigns it a fresh id.
    ///
    /// ## Rules
    /// - SKU and name must be non-blank
    /// - Money fields and reorder level must be non-negative
    /// - SKU must not already be in use
    /// - Negative stock only under `StockPolicy::AllowNegative`
    pub fn insert(
        &mut self,
        fields: NewProduct,
        policy: StockPolicy,
        now: DateTime<Utc>,
    ) -> CoreResult<Product> {
        fields.validate()?;
        policy.check_level(&fields.sku, fields.stock)?;
        self.ensure_unique_sku(&fields.sku, None)?;

        let id = format!("p{}", self.next_seq);
        self.next_seq += 1;

        let product = Product::from_new(id, fields, now);
        debug!(id = %product.id, sku = %product.sku, "Inserting product");
        self.products.push(product.clone());
        Ok(product)
    }

    /// Inserts when `id` is absent, replaces every editable field otherwise.
    pub fn upsert(
        &mut self,
        upsert: ProductUpsert,
        policy: StockPolicy,
        now: DateTime<Utc>,
    ) -> CoreResult<Product> {
        match upsert.id {
            Some(id) => {
                upsert.fields.validate()?;
                self.update_fields(&id, &ProductPatch::from(upsert.fields), policy, now)
            }
            None => self.insert(upsert.fields, policy, now),
        }
    }

    /// Applies a partial update in place.
    ///
    /// A new stock level goes through `policy` like an inserted one.
    pub fn update_fields(
        &mut self,
        id: &str,
        patch: &ProductPatch,
        policy: StockPolicy,
        now: DateTime<Utc>,
    ) -> CoreResult<Product> {
        patch.validate()?;
        if let Some(stock) = patch.stock {
            let sku = match &patch.sku {
                Some(sku) => sku.trim(),
                None => self.get(id)?.sku.as_str(),
            };
            policy.check_level(sku, stock)?;
        }
        if let Some(sku) = &patch.sku {
            self.ensure_unique_sku(sku, Some(id))?;
        }

        let product = self.get_mut(id)?;
        product.apply_patch(patch, now);
        debug!(id = %id, "Updated product fields");
        Ok(product.clone())
    }

    /// Adds `delta` to the stock of `id` under `policy`, returning the new level.
    ///
    /// ## Policies
    /// - `Reject`: `InsufficientStock` if the result would drop below zero
    /// - `AllowNegative`: backorder, stock may go negative
    /// - `ClampToZero`: floor at zero
    ///
    /// Any policy: `StockOutOfRange` past `MAX_STOCK` in either direction.
    pub fn adjust_stock(
        &mut self,
        id: &str,
        delta: i64,
        policy: StockPolicy,
        now: DateTime<Utc>,
    ) -> CoreResult<i64> {
        let product = self.get_mut(id)?;
        let next = policy.resolve(&product.sku, product.stock, delta)?;

        debug!(id = %id, from = product.stock, to = next, %policy, "Adjusting stock");
        product.stock = next;
        product.updated_at = now;
        Ok(next)
    }

    /// Removes a product. Open-cart references are checked by `Store`.
    pub fn delete(&mut self, id: &str) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        debug!(id = %id, "Deleting product");
        Ok(self.products.remove(index))
    }

    /// Sets stock to a level that has already been checked against policy.
    pub(crate) fn set_stock(&mut self, id: &str, stock: i64, now: DateTime<Utc>) {
        if let Some(product) = self.products.iter_mut().find(|p| p.id == id) {
            product.stock = stock;
            product.updated_at = now;
        }
    }

    // =========================================================================
    // Inventory Reports
    // =========================================================================

    /// Products at or below their reorder level.
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_low_stock()).collect()
    }

    /// Products expiring within `days` days of `today` (not yet expired).
    pub fn expiring_within(&self, today: NaiveDate, days: i64) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.expires_within(today, days))
            .collect()
    }

    /// Products whose expiry date has passed.
    pub fn expired(&self, today: NaiveDate) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_expired(today)).collect()
    }

    /// Total inventory value at cost.
    pub fn stock_value(&self) -> Money {
        self.products.iter().map(Product::stock_value).sum()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn get_mut(&mut self, id: &str) -> CoreResult<&mut Product> {
        self.products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    fn ensure_unique_sku(&self, sku: &str, except_id: Option<&str>) -> ValidationResult<()> {
        let sku = sku.trim();
        let taken = self
            .products
            .iter()
            .any(|p| p.sku == sku && Some(p.id.as_str()) != except_id);

        if taken {
            return Err(ValidationError::Duplicate {
                field: "sku".to_string(),
                value: sku.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duka_core::{MAX_PRICE_MINOR, MAX_STOCK};

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let now = Utc::now();
        catalog
            .insert(NewProduct::new("1001", "Orthopedic Knee Brace", Money::from_minor(2500), 10), StockPolicy::Reject, now)
            .unwrap();
        catalog
            .insert(NewProduct::new("1002", "Spine Support Belt", Money::from_minor(1800), 8), StockPolicy::Reject, now)
            .unwrap();
        catalog
            .insert(NewProduct::new("1003", "Ankle Walker", Money::from_minor(3200), 5), StockPolicy::Reject, now)
            .unwrap();
        catalog
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let mut catalog = catalog();
        catalog.delete("p3").unwrap();

        let product = catalog
            .insert(NewProduct::new("1004", "Wrist Splint", Money::from_minor(1200), 4), StockPolicy::Reject, Utc::now())
            .unwrap();
        assert_eq!(product.id, "p4");
    }

    #[test]
    fn test_insert_rejects_blank_and_duplicate_sku() {
        let mut catalog = catalog();

        let blank = catalog.insert(NewProduct::new(" ", "Thing", Money::from_minor(1), 1), StockPolicy::Reject, Utc::now());
        assert!(matches!(blank, Err(CoreError::Validation(ValidationError::Required { .. }))));

        let dup = catalog.insert(NewProduct::new("1001", "Another", Money::from_minor(1), 1), StockPolicy::Reject, Utc::now());
        assert!(matches!(dup, Err(CoreError::Validation(ValidationError::Duplicate { .. }))));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_search_matches_name_case_insensitively() {
        let catalog = catalog();
        let results = catalog.search("KNEE");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p1");
    }

    #[test]
    fn test_search_matches_sku_substring_in_order() {
        let catalog = catalog();
        let ids: Vec<&str> = catalog.search("100").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_search_empty_query_returns_everything() {
        let catalog = catalog();
        assert_eq!(catalog.search("   ").len(), 3);
    }

    #[test]
    fn test_search_by_barcode() {
        let mut catalog = catalog();
        catalog
            .update_fields(
                "p2",
                &ProductPatch {
                    barcode: Some(Some("5901234123457".to_string())),
                    ..Default::default()
                },
                StockPolicy::Reject,
                Utc::now(),
            )
            .unwrap();

        let results = catalog.search("5901234123457");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "p2");
    }

    #[test]
    fn test_update_fields_not_found() {
        let mut catalog = catalog();
        let err = catalog
            .update_fields("p99", &ProductPatch::default(), StockPolicy::Reject, Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "p99"));
    }

    #[test]
    fn test_update_fields_rejects_sku_collision_but_allows_own_sku() {
        let mut catalog = catalog();

        let same = ProductPatch {
            sku: Some("1001".to_string()),
            ..Default::default()
        };
        assert!(catalog.update_fields("p1", &same, StockPolicy::Reject, Utc::now()).is_ok());
        assert!(catalog.update_fields("p2", &same, StockPolicy::Reject, Utc::now()).is_err());
        assert_eq!(catalog.get("p2").unwrap().sku, "1002");
    }

    #[test]
    fn test_upsert_inserts_then_updates() {
        let mut catalog = catalog();
        let created = catalog
            .upsert(
                ProductUpsert {
                    id: None,
                    fields: NewProduct::new("2001", "Cervical Collar", Money::from_minor(1500), 6),
                },
                StockPolicy::Reject,
                Utc::now(),
            )
            .unwrap();
        assert_eq!(created.id, "p4");

        let mut fields = NewProduct::new("2001", "Cervical Collar (Soft)", Money::from_minor(1650), 6);
        fields.reorder_level = 2;
        let updated = catalog
            .upsert(
                ProductUpsert {
                    id: Some("p4".to_string()),
                    fields,
                },
                StockPolicy::Reject,
                Utc::now(),
            )
            .unwrap();

        assert_eq!(updated.id, "p4");
        assert_eq!(updated.name, "Cervical Collar (Soft)");
        assert_eq!(updated.price.minor(), 1650);
        assert_eq!(updated.reorder_level, 2);
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_upsert_with_unknown_id_is_not_found() {
        let mut catalog = catalog();
        let result = catalog.upsert(
            ProductUpsert {
                id: Some("p42".to_string()),
                fields: NewProduct::new("4200", "Ghost", Money::from_minor(1), 1),
            },
            StockPolicy::Reject,
            Utc::now(),
        );
        assert!(matches!(result, Err(CoreError::ProductNotFound(_))));
    }

    #[test]
    fn test_adjust_stock_policies() {
        let mut catalog = catalog();
        let now = Utc::now();

        assert_eq!(catalog.adjust_stock("p3", -2, StockPolicy::Reject, now).unwrap(), 3);

        let err = catalog.adjust_stock("p3", -4, StockPolicy::Reject, now).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available: 3, requested: 4, .. }
        ));
        assert_eq!(catalog.get("p3").unwrap().stock, 3);

        assert_eq!(catalog.adjust_stock("p3", -4, StockPolicy::AllowNegative, now).unwrap(), -1);
        assert_eq!(catalog.adjust_stock("p3", 6, StockPolicy::Reject, now).unwrap(), 5);
        assert_eq!(catalog.adjust_stock("p3", -9, StockPolicy::ClampToZero, now).unwrap(), 0);
    }

    #[test]
    fn test_adjust_stock_overflow_is_a_typed_error() {
        let mut catalog = catalog();
        let now = Utc::now();

        for policy in [StockPolicy::Reject, StockPolicy::AllowNegative, StockPolicy::ClampToZero] {
            let err = catalog.adjust_stock("p1", i64::MAX, policy, now).unwrap_err();
            assert!(matches!(err, CoreError::StockOutOfRange { on_hand: 10, .. }));
        }
        let err = catalog
            .adjust_stock("p1", MAX_STOCK, StockPolicy::Reject, now)
            .unwrap_err();
        assert!(matches!(err, CoreError::StockOutOfRange { .. }));
        assert_eq!(catalog.get("p1").unwrap().stock, 10);
    }

    #[test]
    fn test_negative_stock_on_insert_follows_policy() {
        let mut catalog = catalog();
        let neg = || NewProduct::new("NEG", "Backordered Sling", Money::from_minor(100), -5);

        let err = catalog.insert(neg(), StockPolicy::Reject, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::NegativeStock { stock: -5, .. }));
        let err = catalog.insert(neg(), StockPolicy::ClampToZero, Utc::now()).unwrap_err();
        assert!(matches!(err, CoreError::NegativeStock { .. }));
        assert_eq!(catalog.len(), 3);

        let product = catalog.insert(neg(), StockPolicy::AllowNegative, Utc::now()).unwrap();
        assert_eq!(product.stock, -5);
    }

    #[test]
    fn test_negative_stock_on_update_follows_policy() {
        let mut catalog = catalog();
        let patch = ProductPatch {
            stock: Some(-3),
            ..Default::default()
        };

        let err = catalog
            .update_fields("p2", &patch, StockPolicy::Reject, Utc::now())
            .unwrap_err();
        assert!(matches!(err, CoreError::NegativeStock { ref sku, .. } if sku == "1002"));
        assert_eq!(catalog.get("p2").unwrap().stock, 8);

        let upsert = ProductUpsert {
            id: Some("p2".to_string()),
            fields: NewProduct::new("1002", "Spine Support Belt", Money::from_minor(1800), -3),
        };
        assert!(catalog.upsert(upsert, StockPolicy::Reject, Utc::now()).is_err());
        assert_eq!(catalog.get("p2").unwrap().stock, 8);

        let updated = catalog
            .update_fields("p2", &patch, StockPolicy::AllowNegative, Utc::now())
            .unwrap();
        assert_eq!(updated.stock, -3);
    }

    #[test]
    fn test_insert_rejects_prices_above_the_limit() {
        let mut catalog = catalog();
        let result = catalog.insert(
            NewProduct::new("BIG", "Overpriced", Money::from_minor(i64::MAX / 2 + 1), 1),
            StockPolicy::Reject,
            Utc::now(),
        );
        assert!(matches!(
            result,
            Err(CoreError::Validation(ValidationError::OutOfRange { max: MAX_PRICE_MINOR, .. }))
        ));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_delete_returns_product_and_reports_missing() {
        let mut catalog = catalog();
        let removed = catalog.delete("p2").unwrap();
        assert_eq!(removed.sku, "1002");
        assert!(catalog.find_by_id("p2").is_none());
        assert!(matches!(catalog.delete("p2"), Err(CoreError::ProductNotFound(_))));
    }

    #[test]
    fn test_inventory_reports() {
        let mut catalog = catalog();
        let now = Utc::now();
        let today = date(2026, 10, 16);

        catalog
            .update_fields(
                "p1",
                &ProductPatch {
                    reorder_level: Some(10),
                    cost_price: Some(Money::from_minor(1500)),
                    ..Default::default()
                },
                StockPolicy::Reject,
                now,
            )
            .unwrap();
        catalog
            .update_fields(
                "p2",
                &ProductPatch {
                    expiry_date: Some(Some(date(2026, 11, 1))),
                    ..Default::default()
                },
                StockPolicy::Reject,
                now,
            )
            .unwrap();
        catalog
            .update_fields(
                "p3",
                &ProductPatch {
                    expiry_date: Some(Some(date(2026, 9, 30))),
                    ..Default::default()
                },
                StockPolicy::Reject,
                now,
            )
            .unwrap();

        let low: Vec<&str> = catalog.low_stock().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(low, vec!["p1"]);

        let expiring: Vec<&str> = catalog
            .expiring_within(today, 30)
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(expiring, vec!["p2"]);

        let expired: Vec<&str> = catalog.expired(today).iter().map(|p| p.id.as_str()).collect();
        assert_eq!(expired, vec!["p3"]);

        assert_eq!(catalog.stock_value().minor(), 15000);
    }
}
