//! # Sales Ledger
//!
//! Append-only history of committed sales, newest first.
//!
//! ## Ordering
//! ```text
//! append(sale_1)  →  [sale_1]
//! append(sale_2)  →  [sale_2, sale_1]
//! append(sale_3)  →  [sale_3, sale_2, sale_1]
//! ```
//! Nothing in the ledger is ever edited or removed. The export reads the
//! same order the reports screen shows.
//!
//! ## CSV Export
//! One row per sale, columns `id,date,customer,payment,total`. The header
//! row is always written, so an empty ledger still exports a valid file.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use duka_core::{CoreError, CoreResult, Money, PaymentMethod, Sale};

use crate::error::{StoreError, StoreResult};

/// Column names of the CSV export, in order.
pub const EXPORT_COLUMNS: [&str; 5] = ["id", "date", "customer", "payment", "total"];

/// Append-only list of sales.
#[derive(Debug, Clone)]
pub struct Ledger {
    sales: Vec<Sale>,
    next_seq: u64,
}

/// One sale flattened for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRow {
    pub id: String,
    pub date: String,
    pub customer: String,
    pub payment: String,
    pub total: i64,
}

impl From<&Sale> for SaleRow {
    fn from(sale: &Sale) -> Self {
        SaleRow {
            id: sale.id().to_string(),
            date: sale.date_string(),
            customer: sale.customer().to_string(),
            payment: sale.payment().label().to_string(),
            total: sale.total().minor(),
        }
    }
}

impl Ledger {
    pub fn new() -> Self {
        Ledger {
            sales: Vec::new(),
            next_seq: 1,
        }
    }

    /// Id the next committed sale will receive (`sale_1`, `sale_2`, ...).
    pub fn next_sale_id(&self) -> String {
        format!("sale_{}", self.next_seq)
    }

    /// Records a committed sale at the front of the history.
    pub fn append(&mut self, sale: Sale) {
        debug!(sale_id = %sale.id(), total = sale.total().minor(), "Appending sale to ledger");
        self.sales.insert(0, sale);
        self.next_seq += 1;
    }

    /// All sales, newest first.
    pub fn all(&self) -> &[Sale] {
        &self.sales
    }

    pub fn get(&self, id: &str) -> CoreResult<&Sale> {
        self.sales
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| CoreError::SaleNotFound(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }

    /// Σ sale totals.
    pub fn total_revenue(&self) -> Money {
        self.sales.iter().map(Sale::total).sum()
    }

    /// Revenue grouped by payment method. Methods with no sales are omitted.
    pub fn revenue_by_payment(&self) -> BTreeMap<PaymentMethod, Money> {
        let mut totals = BTreeMap::new();
        for sale in &self.sales {
            *totals.entry(sale.payment()).or_insert_with(Money::zero) += sale.total();
        }
        totals
    }

    /// Flattened rows in ledger order.
    pub fn export_rows(&self) -> Vec<SaleRow> {
        self.sales.iter().map(SaleRow::from).collect()
    }

    /// Encodes the ledger as CSV text.
    pub fn export_csv(&self) -> StoreResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(EXPORT_COLUMNS)?;
        for row in self.export_rows() {
            writer.serialize(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| StoreError::Export(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| StoreError::Export(e.to_string()))?;

        debug!(rows = self.sales.len(), bytes = text.len(), "Exported ledger to CSV");
        Ok(text)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use duka_core::{Cart, NewProduct, Product, WALK_IN_CUSTOMER};

    fn sale(ledger: &Ledger, customer: &str, payment: PaymentMethod, price: i64, qty: i64) -> Sale {
        let product = Product::from_new(
            "p1",
            NewProduct::new("1001", "Orthopedic Knee Brace", Money::from_minor(price), 100),
            Utc::now(),
        );
        let mut cart = Cart::new();
        cart.add_line(&product, qty).unwrap();
        Sale::from_cart_lines(
            ledger.next_sale_id(),
            cart.lines(),
            customer,
            WALK_IN_CUSTOMER,
            payment,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_append_is_newest_first_with_sequential_ids() {
        let mut ledger = Ledger::new();
        for _ in 0..3 {
            let s = sale(&ledger, "Jane", PaymentMethod::Cash, 2500, 1);
            ledger.append(s);
        }

        let ids: Vec<&str> = ledger.all().iter().map(Sale::id).collect();
        assert_eq!(ids, vec!["sale_3", "sale_2", "sale_1"]);
        assert_eq!(ledger.next_sale_id(), "sale_4");
    }

    #[test]
    fn test_get_and_not_found() {
        let mut ledger = Ledger::new();
        let s = sale(&ledger, "Jane", PaymentMethod::Cash, 2500, 1);
        ledger.append(s);

        assert_eq!(ledger.get("sale_1").unwrap().customer(), "Jane");
        assert!(matches!(ledger.get("sale_9"), Err(CoreError::SaleNotFound(_))));
    }

    #[test]
    fn test_totals() {
        let mut ledger = Ledger::new();
        let a = sale(&ledger, "Jane", PaymentMethod::Cash, 2500, 2);
        ledger.append(a);
        let b = sale(&ledger, "", PaymentMethod::MobileMoney, 1800, 1);
        ledger.append(b);
        let c = sale(&ledger, "Omar", PaymentMethod::Cash, 3200, 1);
        ledger.append(c);

        assert_eq!(ledger.total_revenue().minor(), 10000);

        let by_payment = ledger.revenue_by_payment();
        assert_eq!(by_payment.get(&PaymentMethod::Cash), Some(&Money::from_minor(8200)));
        assert_eq!(by_payment.get(&PaymentMethod::MobileMoney), Some(&Money::from_minor(1800)));
        assert!(!by_payment.contains_key(&PaymentMethod::Card));
    }

    #[test]
    fn test_export_empty_ledger_has_header_only() {
        let ledger = Ledger::new();
        let csv = ledger.export_csv().unwrap();
        assert_eq!(csv, "id,date,customer,payment,total\n");
    }

    #[test]
    fn test_export_rows_follow_ledger_order() {
        let mut ledger = Ledger::new();
        let a = sale(&ledger, "Jane", PaymentMethod::Cash, 2500, 2);
        ledger.append(a);
        let b = sale(&ledger, "   ", PaymentMethod::MobileMoney, 1800, 1);
        ledger.append(b);

        let csv = ledger.export_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,date,customer,payment,total");

        let second: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(second[0], "sale_2");
        assert_eq!(second[2], "Walk-in");
        assert_eq!(second[3], "Mobile Money");
        assert_eq!(second[4], "1800");

        let third: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(third[0], "sale_1");
        assert_eq!(third[4], "5000");
    }

    #[test]
    fn test_export_quotes_customer_with_comma() {
        let mut ledger = Ledger::new();
        let s = sale(&ledger, "Otieno, James", PaymentMethod::Card, 100, 1);
        ledger.append(s);

        let csv = ledger.export_csv().unwrap();
        assert!(csv.contains("\"Otieno, James\""));

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[2], "Otieno, James");
    }
}
