//! # Receipt Data Contract
//!
//! Everything the PDF and the on-screen summary print, already formatted.
//! Both outputs read from this one structure, so they cannot disagree.
//!
//! ## Sections
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ [logo]  Duka Orthopedics                     │  header
//! │         Moi Avenue, Nairobi                  │
//! │                                              │
//! │ SALES RECEIPT                                │
//! │                                              │
//! │ Receipt:  sale_12                            │  metadata
//! │ Date:     2026-10-16 14:03:22                │
//! │ Customer: Jane                               │
//! │ Payment:  Mobile Money                       │
//! │                                              │
//! │ Item                  Qty    Unit    Total   │  rows
//! │ Orthopedic Knee Brace   2   2,500    5,000   │
//! │ ──────────────────────────────────────────── │
//! │ TOTAL                          KES 5,000     │  grand total
//! │                                              │
//! │ Thank you for your business!                 │  footer
//! └──────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use duka_core::{CurrencyFormat, Money, Sale};

use crate::wrap::{wrap_name, DEFAULT_WRAP_WIDTH};

pub const RECEIPT_TITLE: &str = "SALES RECEIPT";
pub const DEFAULT_FOOTER: &str = "Thank you for your business!";

/// Who issued the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    pub name: String,

    #[serde(default)]
    pub address: Vec<String>,
}

impl Default for Issuer {
    fn default() -> Self {
        Issuer {
            name: "Duka POS".to_string(),
            address: Vec::new(),
        }
    }
}

/// One printed line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiptRow {
    /// Full product name.
    pub name: String,

    /// `name` wrapped to the receipt width; never empty.
    pub name_lines: Vec<String>,

    pub quantity: i64,
    pub unit_price: String,
    pub line_total: String,
}

/// A receipt ready to lay out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub issuer: Issuer,
    pub title: String,
    pub receipt_id: String,
    pub date: String,
    pub customer: String,
    pub payment: String,
    pub rows: Vec<ReceiptRow>,
    pub total: Money,
    pub grand_total: String,
    pub footer: String,
}

impl Receipt {
    /// Builds a receipt with the default wrap width and footer.
    pub fn from_sale(sale: &Sale, issuer: &Issuer, currency: &CurrencyFormat) -> Self {
        Self::from_sale_wrapped(sale, issuer, currency, DEFAULT_WRAP_WIDTH)
    }

    /// Builds a receipt, wrapping names to `wrap_width` characters.
    pub fn from_sale_wrapped(
        sale: &Sale,
        issuer: &Issuer,
        currency: &CurrencyFormat,
        wrap_width: usize,
    ) -> Self {
        let rows = sale
            .items()
            .iter()
            .map(|item| ReceiptRow {
                name: item.name().to_string(),
                name_lines: wrap_name(item.name(), wrap_width),
                quantity: item.quantity(),
                unit_price: currency.format_amount(item.unit_price()),
                line_total: currency.format_amount(item.line_total()),
            })
            .collect();

        Receipt {
            issuer: issuer.clone(),
            title: RECEIPT_TITLE.to_string(),
            receipt_id: sale.id().to_string(),
            date: sale.date_string(),
            customer: sale.customer().to_string(),
            payment: sale.payment().label().to_string(),
            rows,
            total: sale.total(),
            grand_total: currency.format(sale.total()),
            footer: DEFAULT_FOOTER.to_string(),
        }
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Label/value pairs printed under the title.
    pub fn metadata(&self) -> [(&'static str, &str); 4] {
        [
            ("Receipt", self.receipt_id.as_str()),
            ("Date", self.date.as_str()),
            ("Customer", self.customer.as_str()),
            ("Payment", self.payment.as_str()),
        ]
    }
}
