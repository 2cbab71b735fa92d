//! # Demo Catalog
//!
//! A small orthopedic-supplies catalog for development and demos.
//!
//! ## Usage
//! ```rust
//! use duka_store::{seed, Store};
//!
//! let mut store = Store::default();
//! let count = seed::seed_demo_catalog(&mut store).unwrap();
//! assert_eq!(store.catalog().len(), count);
//! ```

use chrono::{Duration, Utc};
use tracing::info;

use duka_core::{CoreResult, Money, NewProduct};

use crate::store::Store;

/// (sku, name, category, supplier, cost, price, stock, reorder level, shelf life in days)
const DEMO_PRODUCTS: &[(&str, &str, &str, &str, i64, i64, i64, i64, Option<i64>)] = &[
    ("1001", "Orthopedic Knee Brace", "Braces", "MedSupply Ltd", 1600, 2500, 10, 3, None),
    ("1002", "Spine Support Belt", "Supports", "MedSupply Ltd", 1100, 1800, 8, 3, None),
    ("1003", "Ankle Walker", "Boots", "OrthoCare EA", 2100, 3200, 5, 2, None),
    ("1004", "Wrist Splint", "Braces", "OrthoCare EA", 700, 1200, 12, 4, None),
    ("1005", "Cervical Collar", "Supports", "MedSupply Ltd", 900, 1500, 6, 2, None),
    ("1006", "Elastic Bandage 10cm", "Consumables", "Afya Wholesale", 120, 250, 40, 15, Some(540)),
    ("1007", "Cold Gel Pack", "Consumables", "Afya Wholesale", 300, 550, 3, 5, Some(20)),
];

/// Inserts the demo products, returning how many were added.
pub fn seed_demo_catalog(store: &mut Store) -> CoreResult<usize> {
    let now = Utc::now();
    let today = now.date_naive();

    for &(sku, name, category, supplier, cost, price, stock, reorder, shelf_life) in DEMO_PRODUCTS {
        store.insert_product(
            NewProduct {
                category: category.to_string(),
                supplier: supplier.to_string(),
                cost_price: Money::from_minor(cost),
                wholesale_price: Money::from_minor(cost + (price - cost) / 2),
                reorder_level: reorder,
                expiry_date: shelf_life.map(|days| today + Duration::days(days)),
                ..NewProduct::new(sku, name, Money::from_minor(price), stock)
            },
            now,
        )?;
    }

    info!(count = DEMO_PRODUCTS.len(), "Seeded demo catalog");
    Ok(DEMO_PRODUCTS.len())
}
