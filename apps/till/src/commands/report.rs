//! # Report Commands
//!
//! Sales history, revenue and the CSV export.

use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use duka_core::{PaymentMethod, Sale};

use crate::error::ApiError;
use crate::state::Till;

/// Revenue for one payment method.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTotal {
    pub method: PaymentMethod,
    pub label: String,
    pub total: i64,
}

/// Headline figures for the reports tab.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub sale_count: usize,
    /// Total revenue in minor units.
    pub total: i64,
    /// `total` formatted with the till currency.
    pub formatted: String,
    pub by_payment: Vec<PaymentTotal>,
}

/// Every sale, most recent first.
pub async fn list_sales(till: &Till) -> Result<Vec<Sale>, ApiError> {
    debug!("list_sales command");
    Ok(till.with_store(|store| store.ledger().all().to_vec()))
}

/// One sale by id.
pub async fn get_sale(till: &Till, sale_id: String) -> Result<Sale, ApiError> {
    debug!(sale_id = %sale_id, "get_sale command");
    let sale = till.with_store(|store| store.ledger().get(&sale_id).cloned())?;
    Ok(sale)
}

/// Total revenue, overall and per payment method.
pub async fn total_revenue(till: &Till) -> Result<RevenueReport, ApiError> {
    debug!("total_revenue command");
    let (sale_count, total, by_method) = till.with_store(|store| {
        (
            store.ledger().len(),
            store.total_revenue(),
            store.ledger().revenue_by_payment(),
        )
    });

    Ok(RevenueReport {
        sale_count,
        total: total.minor(),
        formatted: till.config().format_money(total),
        by_payment: by_method
            .into_iter()
            .map(|(method, total)| PaymentTotal {
                method,
                label: method.label().to_string(),
                total: total.minor(),
            })
            .collect(),
    })
}

/// The ledger as CSV: `id,date,customer,payment,total`, most recent first.
pub async fn export_sales_csv(till: &Till) -> Result<String, ApiError> {
    debug!("export_sales_csv command");
    let csv = till.with_store(|store| store.ledger().export_csv())?;
    Ok(csv)
}

/// Writes the CSV export to `path`, creating parent directories.
pub async fn write_sales_csv(till: &Till, path: PathBuf) -> Result<PathBuf, ApiError> {
    let csv = export_sales_csv(till).await?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, csv.as_bytes()).await?;

    info!(path = ?path, bytes = csv.len(), "Sales exported");
    Ok(path)
}
