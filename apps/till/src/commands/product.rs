//! # Product Commands
//!
//! Catalog search, the inventory form and the inventory report.
//!
//! ## Search Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Search Flow                                  │
//! │                                                                         │
//! │  Cashier types "brace" (or scans 6001234500012)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  search_catalog(till, "brace")                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  blank query?  ──► whole catalog          │                         │
//! │  │  otherwise     ──► name contains (any     │                         │
//! │  │                    case), SKU contains,   │                         │
//! │  │                    or barcode equals      │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<ProductDto> in catalog order                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Instant;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use duka_core::validation::validate_search_query;
use duka_core::{Product, ProductPatch, ProductUpsert};

use crate::error::ApiError;
use crate::state::Till;

/// Product DTO (Data Transfer Object) for the UI.
///
/// ## Why DTO?
/// - Money goes out as plain integers in minor units
/// - Derived flags (`lowStock`, `expired`) are computed once, server side
/// - Handles serde rename to camelCase for JS consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub category: String,
    pub supplier: String,
    pub cost_price: i64,
    pub price: i64,
    pub wholesale_price: i64,
    pub stock: i64,
    pub reorder_level: i64,
    pub expiry_date: Option<NaiveDate>,
    pub barcode: Option<String>,
    pub unit: String,
    pub notes: Option<String>,
    pub low_stock: bool,
    pub expired: bool,
}

impl ProductDto {
    fn from_product(p: Product, today: NaiveDate) -> Self {
        let low_stock = p.is_low_stock();
        let expired = p.is_expired(today);
        ProductDto {
            id: p.id,
            sku: p.sku,
            name: p.name,
            category: p.category,
            supplier: p.supplier,
            cost_price: p.cost_price.minor(),
            price: p.price.minor(),
            wholesale_price: p.wholesale_price.minor(),
            stock: p.stock,
            reorder_level: p.reorder_level,
            expiry_date: p.expiry_date,
            barcode: p.barcode,
            unit: p.unit,
            notes: p.notes,
            low_stock,
            expired,
        }
    }
}

impl From<Product> for ProductDto {
    fn from(p: Product) -> Self {
        ProductDto::from_product(p, Local::now().date_naive())
    }
}

/// The inventory tab's warning panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub product_count: usize,
    /// Stock at or below the reorder level.
    pub low_stock: Vec<ProductDto>,
    /// Expiring within `expiry_warning_days`, not yet expired.
    pub expiring_soon: Vec<ProductDto>,
    pub expired: Vec<ProductDto>,
    /// Inventory value at cost, in minor units.
    pub stock_value: i64,
}

/// Searches the catalog.
///
/// ## Arguments
/// * `query` - Matched against name (case-insensitive), SKU and barcode.
///   Blank returns the whole catalog.
pub async fn search_catalog(till: &Till, query: String) -> Result<Vec<ProductDto>, ApiError> {
    let start = Instant::now();
    let query = validate_search_query(&query).map_err(|e| ApiError::validation(e.to_string()))?;
    debug!(query = %query, "search_catalog command");

    let products: Vec<Product> =
        till.with_store(|store| store.catalog().search(&query).into_iter().cloned().collect());
    let dtos: Vec<ProductDto> = products.into_iter().map(ProductDto::from).collect();

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        count = dtos.len(),
        query = %query,
        "search_catalog complete"
    );
    Ok(dtos)
}

/// Gets a single product by id.
pub async fn get_product(till: &Till, id: String) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "get_product command");
    let product = till.with_store(|store| store.catalog().get(&id).cloned())?;
    Ok(ProductDto::from(product))
}

/// Saves the inventory form: updates when `id` names an existing product,
/// inserts otherwise.
pub async fn upsert_product(till: &Till, upsert: ProductUpsert) -> Result<ProductDto, ApiError> {
    debug!(id = ?upsert.id, sku = %upsert.fields.sku, "upsert_product command");
    let product = till.with_store_mut(|store| store.upsert_product(upsert, Utc::now()))?;
    info!(id = %product.id, sku = %product.sku, "Product saved");
    Ok(ProductDto::from(product))
}

/// Applies a partial edit to an existing product.
pub async fn adjust_product_fields(
    till: &Till,
    id: String,
    patch: ProductPatch,
) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "adjust_product_fields command");
    let product = till.with_store_mut(|store| store.update_product(&id, &patch, Utc::now()))?;
    Ok(ProductDto::from(product))
}

/// Receives (positive) or writes off (negative) stock under the till's
/// stock policy. Returns the new level.
pub async fn adjust_stock(till: &Till, id: String, delta: i64) -> Result<i64, ApiError> {
    debug!(id = %id, delta, "adjust_stock command");
    let stock = till.with_store_mut(|store| store.adjust_stock(&id, delta, Utc::now()))?;
    info!(id = %id, delta, stock, "Stock adjusted");
    Ok(stock)
}

/// Deletes a product. Refused while any open cart holds it.
pub async fn delete_product(till: &Till, id: String) -> Result<ProductDto, ApiError> {
    debug!(id = %id, "delete_product command");
    let product = till.with_store_mut(|store| store.delete_product(&id))?;
    info!(id = %product.id, sku = %product.sku, "Product deleted");
    Ok(ProductDto::from(product))
}

/// Builds the low-stock, expiring and expired panels.
pub async fn inventory_report(till: &Till) -> Result<InventoryReport, ApiError> {
    let today = Local::now().date_naive();
    let days = till.config().expiry_warning_days;
    debug!(days, "inventory_report command");

    let dtos = |products: Vec<&Product>| -> Vec<ProductDto> {
        products
            .into_iter()
            .map(|p| ProductDto::from_product(p.clone(), today))
            .collect()
    };

    let report = till.with_store(|store| InventoryReport {
        product_count: store.catalog().len(),
        low_stock: dtos(store.low_stock()),
        expiring_soon: dtos(store.expiring_within(today, days)),
        expired: dtos(store.catalog().expired(today)),
        stock_value: store.catalog().stock_value().minor(),
    });
    Ok(report)
}
