//! # Sale Records
//!
//! A `Sale` is the committed, immutable record of one checkout.
//!
//! ## Snapshot Pattern
//! ```text
//! Cart (mutable, per session)            Sale (immutable, in the ledger)
//! ───────────────────────────            ───────────────────────────────
//! CartLine { p1, "Knee Brace", 2500, 2 } ──copy──► SaleItem { p1, "Knee Brace", 2500, 2, 5000 }
//! CartLine { p2, "Spine Belt", 1800, 1 } ──copy──► SaleItem { p2, "Spine Belt", 1800, 1, 1800 }
//!                                                   total = 6800
//! ```
//! Fields are private and only exposed through getters, so nothing can
//! edit a sale once it has been built.

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::PaymentMethod;

/// Customer label used when the cashier leaves the name blank.
pub const WALK_IN_CUSTOMER: &str = "Walk-in";

/// Date format used on receipts and in the CSV export.
pub const SALE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A line item in a sale, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    product_id: String,
    sku: String,
    name: String,
    unit_price: Money,
    quantity: i64,
    line_total: Money,
}

impl SaleItem {
    fn from_line(line: &CartLine) -> CoreResult<Self> {
        let line_total = line
            .unit_price
            .checked_multiply_quantity(line.quantity)
            .ok_or_else(|| CoreError::AmountOverflow(format!("line total of {}", line.sku)))?;

        Ok(SaleItem {
            product_id: line.product_id.clone(),
            sku: line.sku.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total,
        })
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn line_total(&self) -> Money {
        self.line_total
    }
}

/// A committed sale.
///
/// Serialize only: the one way to build a sale is `from_cart_lines`, so the
/// total always equals the sum of its line totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    id: String,
    #[ts(as = "String")]
    created_at: DateTime<Utc>,
    customer: String,
    payment: PaymentMethod,
    items: Vec<SaleItem>,
    total: Money,
}

impl Sale {
    /// Snapshots cart lines into a new sale.
    ///
    /// ## Rules
    /// - No lines: `EmptyCart`
    /// - Blank customer: `walk_in_label`
    /// - `total` is Σ line totals, computed once here
    /// - A line total or the sum leaving the i64 range: `AmountOverflow`
    pub fn from_cart_lines(
        id: impl Into<String>,
        lines: &[CartLine],
        customer: &str,
        walk_in_label: &str,
        payment: PaymentMethod,
        created_at: DateTime<Utc>,
    ) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let items = lines
            .iter()
            .map(SaleItem::from_line)
            .collect::<CoreResult<Vec<_>>>()?;
        let total = Money::checked_sum(items.iter().map(SaleItem::line_total))
            .ok_or_else(|| CoreError::AmountOverflow("sale total".to_string()))?;

        Ok(Sale {
            id: id.into(),
            created_at,
            customer: normalize_customer(customer, walk_in_label),
            payment,
            items,
            total,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Local-time timestamp as printed on receipts and exported (`2026-10-16 14:03:22`).
    pub fn date_string(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format(SALE_DATE_FORMAT)
            .to_string()
    }

    pub fn customer(&self) -> &str {
        &self.customer
    }

    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    pub fn items(&self) -> &[SaleItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Units sold across all items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(SaleItem::quantity).sum()
    }
}

fn normalize_customer(customer: &str, walk_in_label: &str) -> String {
    let customer = customer.trim();
    if customer.is_empty() {
        walk_in_label.to_string()
    } else {
        customer.to_string()
    }
}
