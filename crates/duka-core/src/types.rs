//! # Domain Types
//!
//! Catalog and policy types used throughout Duka POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   NewProduct    │   │  ProductPatch   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (p<n>)      │◄──│  insert fields  │   │  partial edit   │       │
//! │  │  sku (unique)   │   └─────────────────┘   └─────────────────┘       │
//! │  │  prices (Money) │                                                    │
//! │  │  stock, reorder │   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  expiry_date    │   │ PaymentMethod   │   │  StockPolicy    │       │
//! │  └─────────────────┘   │  Cash           │   │  Reject         │       │
//! │                        │  Card           │   │  AllowNegative  │       │
//! │                        │  MobileMoney    │   │  ClampToZero    │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id`: assigned by the catalog, immutable, never reused
//! - `sku`: human-readable display code, editable but unique

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_price, validate_product_name, validate_reorder_level, validate_sku,
    validate_stock, ValidationResult,
};
use crate::MAX_STOCK;

/// Default unit of measure for new products.
pub const DEFAULT_UNIT: &str = "pcs";

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog-assigned identifier (`p1`, `p2`, ...).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    pub category: String,

    pub supplier: String,

    /// What the shop paid per unit.
    pub cost_price: Money,

    /// Retail selling price; this is what the cart snapshots.
    pub price: Money,

    pub wholesale_price: Money,

    /// Units on hand. Only negative under `StockPolicy::AllowNegative`.
    pub stock: i64,

    /// Low-stock threshold.
    pub reorder_level: i64,

    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Unit of measure ("pcs", "box", "pair").
    pub unit: String,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a product from validated insert fields.
    pub fn from_new(id: impl Into<String>, fields: NewProduct, now: DateTime<Utc>) -> Self {
        Product {
            id: id.into(),
            sku: fields.sku.trim().to_string(),
            name: fields.name.trim().to_string(),
            category: fields.category,
            supplier: fields.supplier,
            cost_price: fields.cost_price,
            price: fields.price,
            wholesale_price: fields.wholesale_price,
            stock: fields.stock,
            reorder_level: fields.reorder_level,
            expiry_date: fields.expiry_date,
            barcode: fields.barcode,
            unit: if fields.unit.trim().is_empty() {
                DEFAULT_UNIT.to_string()
            } else {
                fields.unit
            },
            notes: fields.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stock is at or below the reorder level.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.reorder_level
    }

    /// The expiry date has passed.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.is_some_and(|date| date < today)
    }

    /// Not yet expired, but expiring within `days` days of `today`.
    pub fn expires_within(&self, today: NaiveDate, days: i64) -> bool {
        self.expiry_date.is_some_and(|date| {
            let remaining = (date - today).num_days();
            (0..=days).contains(&remaining)
        })
    }

    /// Inventory value at cost. Backordered (negative) stock counts as zero.
    pub fn stock_value(&self) -> Money {
        self.cost_price.multiply_quantity(self.stock.max(0))
    }

    /// Applies a partial update. The caller validates the patch first.
    pub fn apply_patch(&mut self, patch: &ProductPatch, now: DateTime<Utc>) {
        if let Some(sku) = &patch.sku {
            self.sku = sku.trim().to_string();
        }
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(supplier) = &patch.supplier {
            self.supplier = supplier.clone();
        }
        if let Some(cost_price) = patch.cost_price {
            self.cost_price = cost_price;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(wholesale_price) = patch.wholesale_price {
            self.wholesale_price = wholesale_price;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(reorder_level) = patch.reorder_level {
            self.reorder_level = reorder_level;
        }
        if let Some(expiry_date) = patch.expiry_date {
            self.expiry_date = expiry_date;
        }
        if let Some(barcode) = &patch.barcode {
            self.barcode = barcode.clone();
        }
        if let Some(unit) = &patch.unit {
            self.unit = unit.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = notes.clone();
        }
        self.updated_at = now;
    }
}

// =============================================================================
// Product Input Types
// =============================================================================

/// Fields for inserting a new product. The catalog assigns the id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub cost_price: Money,
    pub price: Money,
    pub wholesale_price: Money,
    pub stock: i64,
    pub reorder_level: i64,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    pub barcode: Option<String>,
    pub unit: String,
    pub notes: Option<String>,
}

impl NewProduct {
    /// Shorthand for the fields the till screen cannot live without.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, price: Money, stock: i64) -> Self {
        NewProduct {
            sku: sku.into(),
            name: name.into(),
            price,
            stock,
            unit: DEFAULT_UNIT.to_string(),
            ..Default::default()
        }
    }

    /// Field-level validation (SKU uniqueness is checked by the catalog).
    pub fn validate(&self) -> ValidationResult<()> {
        validate_sku(&self.sku)?;
        validate_product_name(&self.name)?;
        validate_price("cost_price", self.cost_price)?;
        validate_price("price", self.price)?;
        validate_price("wholesale_price", self.wholesale_price)?;
        validate_stock(self.stock)?;
        validate_reorder_level(self.reorder_level)?;
        Ok(())
    }
}

/// A partial product edit; `None` leaves the field untouched.
///
/// Nullable fields use `Option<Option<_>>`: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub supplier: Option<String>,
    pub cost_price: Option<Money>,
    pub price: Option<Money>,
    pub wholesale_price: Option<Money>,
    pub stock: Option<i64>,
    pub reorder_level: Option<i64>,
    #[serde(deserialize_with = "deserialize_some")]
    #[ts(as = "Option<Option<String>>")]
    pub expiry_date: Option<Option<NaiveDate>>,
    #[serde(deserialize_with = "deserialize_some")]
    pub barcode: Option<Option<String>>,
    pub unit: Option<String>,
    #[serde(deserialize_with = "deserialize_some")]
    pub notes: Option<Option<String>>,
}

impl ProductPatch {
    /// Validates every field that is present.
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(sku) = &self.sku {
            validate_sku(sku)?;
        }
        if let Some(name) = &self.name {
            validate_product_name(name)?;
        }
        if let Some(cost_price) = self.cost_price {
            validate_price("cost_price", cost_price)?;
        }
        if let Some(price) = self.price {
            validate_price("price", price)?;
        }
        if let Some(wholesale_price) = self.wholesale_price {
            validate_price("wholesale_price", wholesale_price)?;
        }
        if let Some(stock) = self.stock {
            validate_stock(stock)?;
        }
        if let Some(reorder_level) = self.reorder_level {
            validate_reorder_level(reorder_level)?;
        }
        Ok(())
    }
}

/// Inventory form submission: update when `id` names an existing product,
/// insert otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductUpsert {
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: NewProduct,
}

impl From<NewProduct> for ProductPatch {
    fn from(fields: NewProduct) -> Self {
        ProductPatch {
            sku: Some(fields.sku),
            name: Some(fields.name),
            category: Some(fields.category),
            supplier: Some(fields.supplier),
            cost_price: Some(fields.cost_price),
            price: Some(fields.price),
            wholesale_price: Some(fields.wholesale_price),
            stock: Some(fields.stock),
            reorder_level: Some(fields.reorder_level),
            expiry_date: Some(fields.expiry_date),
            barcode: Some(fields.barcode),
            unit: Some(fields.unit),
            notes: Some(fields.notes),
        }
    }
}

/// Maps a present JSON value (including `null`) to `Some`, so a missing key
/// and an explicit `null` stay distinguishable.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid. A label only; nothing is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    MobileMoney,
}

impl PaymentMethod {
    /// Every method, in the order the checkout form offers them.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::MobileMoney,
    ];

    /// Human label, as printed on receipts and exported to CSV.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::MobileMoney => "Mobile Money",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "mobile money" | "mobile" => Ok(PaymentMethod::MobileMoney),
            _ => Err(ValidationError::NotAllowed {
                field: "payment".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.label().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Stock Policy
// =============================================================================

/// What happens when a stock adjustment would take stock below zero.
///
/// ## Policies
/// ```text
/// on hand: 3, delta: -5
///
///   Reject        → error, stock stays 3        (default)
///   AllowNegative → stock becomes -2 (backorder)
///   ClampToZero   → stock becomes 0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    #[default]
    Reject,
    AllowNegative,
    ClampToZero,
}

impl StockPolicy {
    /// Resolves the stock level after applying `delta`.
    ///
    /// ## Errors
    /// - `InsufficientStock`: `Reject` refuses to go below zero
    /// - `StockOutOfRange`: the result would leave `-MAX_STOCK..=MAX_STOCK`
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::StockPolicy;
    ///
    /// assert_eq!(StockPolicy::Reject.resolve("1001", 10, -2).unwrap(), 8);
    /// assert!(StockPolicy::Reject.resolve("1001", 3, -5).is_err());
    /// assert_eq!(StockPolicy::AllowNegative.resolve("1001", 3, -5).unwrap(), -2);
    /// assert_eq!(StockPolicy::ClampToZero.resolve("1001", 3, -5).unwrap(), 0);
    /// assert!(StockPolicy::Reject.resolve("1001", 10, i64::MAX).is_err());
    /// ```
    pub fn resolve(&self, sku: &str, on_hand: i64, delta: i64) -> CoreResult<i64> {
        let out_of_range = || CoreError::StockOutOfRange {
            sku: sku.to_string(),
            on_hand,
            delta,
            max: MAX_STOCK,
        };

        let next = on_hand.checked_add(delta).ok_or_else(out_of_range)?;
        let resolved = if next >= 0 || delta >= 0 {
            next
        } else {
            match self {
                StockPolicy::Reject => {
                    return Err(CoreError::InsufficientStock {
                        sku: sku.to_string(),
                        available: on_hand,
                        requested: delta.saturating_neg(),
                    })
                }
                StockPolicy::AllowNegative => next,
                StockPolicy::ClampToZero => 0,
            }
        };

        if !(-MAX_STOCK..=MAX_STOCK).contains(&resolved) {
            return Err(out_of_range());
        }
        Ok(resolved)
    }

    /// Checks a stock level written directly by an insert or edit.
    ///
    /// Only `AllowNegative` accepts a level below zero.
    pub fn check_level(&self, sku: &str, stock: i64) -> CoreResult<()> {
        if stock < 0 && *self != StockPolicy::AllowNegative {
            return Err(CoreError::NegativeStock {
                sku: sku.to_string(),
                stock,
                policy: self.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockPolicy::Reject => write!(f, "reject"),
            StockPolicy::AllowNegative => write!(f, "allow_negative"),
            StockPolicy::ClampToZero => write!(f, "clamp_to_zero"),
        }
    }
}

impl FromStr for StockPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "strict" => Ok(StockPolicy::Reject),
            "allow_negative" | "backorder" => Ok(StockPolicy::AllowNegative),
            "clamp_to_zero" | "clamp" => Ok(StockPolicy::ClampToZero),
            other => Err(ValidationError::InvalidFormat {
                field: "stock_policy".to_string(),
                reason: format!(
                    "unknown policy '{}', expected reject, allow_negative or clamp_to_zero",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn brace() -> Product {
        let mut fields = NewProduct::new("1001", "Orthopedic Knee Brace", Money::from_minor(2500), 10);
        fields.cost_price = Money::from_minor(1500);
        fields.reorder_level = 3;
        Product::from_new("p1", fields, Utc::now())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_new_trims_and_defaults_unit() {
        let mut fields = NewProduct::new(" 1001 ", " Knee Brace ", Money::from_minor(2500), 10);
        fields.unit = String::new();
        let product = Product::from_new("p1", fields, Utc::now());

        assert_eq!(product.sku, "1001");
        assert_eq!(product.name, "Knee Brace");
        assert_eq!(product.unit, DEFAULT_UNIT);
    }

    #[test]
    fn test_low_stock_at_reorder_level() {
        let mut product = brace();
        assert!(!product.is_low_stock());

        product.stock = 3;
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_expiry_checks() {
        let mut product = brace();
        let today = date(2026, 10, 16);
        assert!(!product.is_expired(today));
        assert!(!product.expires_within(today, 30));

        product.expiry_date = Some(date(2026, 10, 30));
        assert!(!product.is_expired(today));
        assert!(product.expires_within(today, 30));
        assert!(!product.expires_within(today, 7));

        product.expiry_date = Some(date(2026, 10, 1));
        assert!(product.is_expired(today));
        assert!(!product.expires_within(today, 30));
    }

    #[test]
    fn test_stock_value_ignores_backorders() {
        let mut product = brace();
        assert_eq!(product.stock_value().minor(), 15000);

        product.stock = -4;
        assert!(product.stock_value().is_zero());
    }

    #[test]
    fn test_stock_value_at_the_largest_valid_cost_and_stock() {
        let mut product = brace();
        product.cost_price = Money::from_minor(crate::MAX_PRICE_MINOR);
        product.stock = MAX_STOCK;
        assert_eq!(product.stock_value().minor(), crate::MAX_PRICE_MINOR * MAX_STOCK);

        product.cost_price = Money::from_minor(i64::MAX / 2 + 1);
        assert_eq!(product.stock_value().minor(), i64::MAX);
    }

    #[test]
    fn test_apply_patch_touches_only_present_fields() {
        let mut product = brace();
        let patch = ProductPatch {
            stock: Some(25),
            notes: Some(Some("Restocked".to_string())),
            expiry_date: Some(Some(date(2027, 1, 1))),
            ..Default::default()
        };
        product.apply_patch(&patch, Utc::now());

        assert_eq!(product.stock, 25);
        assert_eq!(product.notes.as_deref(), Some("Restocked"));
        assert_eq!(product.expiry_date, Some(date(2027, 1, 1)));
        assert_eq!(product.price.minor(), 2500);
        assert_eq!(product.name, "Orthopedic Knee Brace");

        let clear = ProductPatch {
            notes: Some(None),
            ..Default::default()
        };
        product.apply_patch(&clear, Utc::now());
        assert!(product.notes.is_none());
    }

    #[test]
    fn test_patch_json_distinguishes_null_from_missing() {
        let patch: ProductPatch = serde_json::from_str(r#"{"notes": null, "stock": 4}"#).unwrap();
        assert_eq!(patch.notes, Some(None));
        assert_eq!(patch.stock, Some(4));
        assert!(patch.barcode.is_none());
    }

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("1001", "Brace", Money::from_minor(2500), 1).validate().is_ok());
        assert!(NewProduct::new("", "Brace", Money::from_minor(2500), 1).validate().is_err());
        assert!(NewProduct::new("1001", " ", Money::from_minor(2500), 1).validate().is_err());
        assert!(NewProduct::new("1001", "Brace", Money::from_minor(-1), 1).validate().is_err());
    }

    #[test]
    fn test_payment_method_parse_and_display() {
        assert_eq!("Cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!(
            "Mobile Money".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MobileMoney
        );
        assert_eq!(
            "mobile_money".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MobileMoney
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());

        assert_eq!(PaymentMethod::MobileMoney.to_string(), "Mobile Money");
    }

    #[test]
    fn test_stock_policy_resolve() {
        assert_eq!(StockPolicy::Reject.resolve("1003", 10, -10).unwrap(), 0);
        assert!(matches!(
            StockPolicy::Reject.resolve("1003", 10, -11),
            Err(CoreError::InsufficientStock { available: 10, requested: 11, .. })
        ));
        assert_eq!(StockPolicy::Reject.resolve("1003", -2, 5).unwrap(), 3);
        assert_eq!(StockPolicy::AllowNegative.resolve("1003", 1, -3).unwrap(), -2);
        assert_eq!(StockPolicy::ClampToZero.resolve("1003", 1, -3).unwrap(), 0);
    }

    #[test]
    fn test_stock_policy_resolve_rejects_overflow_and_out_of_range() {
        for policy in [StockPolicy::Reject, StockPolicy::AllowNegative, StockPolicy::ClampToZero] {
            assert!(matches!(
                policy.resolve("1003", 5, i64::MAX),
                Err(CoreError::StockOutOfRange { on_hand: 5, .. })
            ));
            assert!(matches!(
                policy.resolve("1003", 0, MAX_STOCK + 1),
                Err(CoreError::StockOutOfRange { .. })
            ));
            assert_eq!(policy.resolve("1003", 0, MAX_STOCK).unwrap(), MAX_STOCK);
        }

        assert!(matches!(
            StockPolicy::AllowNegative.resolve("1003", -5, i64::MIN),
            Err(CoreError::StockOutOfRange { .. })
        ));
        assert!(matches!(
            StockPolicy::Reject.resolve("1003", 5, i64::MIN),
            Err(CoreError::InsufficientStock { requested: i64::MAX, .. })
        ));
        assert_eq!(StockPolicy::ClampToZero.resolve("1003", 5, i64::MIN).unwrap(), 0);
    }

    #[test]
    fn test_stock_policy_check_level() {
        assert!(StockPolicy::Reject.check_level("NEG", 0).is_ok());
        assert!(matches!(
            StockPolicy::Reject.check_level("NEG", -5),
            Err(CoreError::NegativeStock { stock: -5, .. })
        ));
        assert!(StockPolicy::ClampToZero.check_level("NEG", -1).is_err());
        assert!(StockPolicy::AllowNegative.check_level("NEG", -5).is_ok());
    }

    #[test]
    fn test_stock_policy_from_str() {
        assert_eq!("backorder".parse::<StockPolicy>().unwrap(), StockPolicy::AllowNegative);
        assert_eq!("CLAMP_TO_ZERO".parse::<StockPolicy>().unwrap(), StockPolicy::ClampToZero);
        assert!("sometimes".parse::<StockPolicy>().is_err());
    }
}
