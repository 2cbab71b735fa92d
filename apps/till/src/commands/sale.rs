//! # Sale Commands
//!
//! Checkout and receipt documents.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    checkout(session, customer, payment)                 │
//! │                                                                         │
//! │  1. Validate customer name and payment method   (no lock)              │
//! │  2. Store lock ─► Store::checkout ─► unlock                            │
//! │        validate every line against live stock                          │
//! │        decrement stock · append to ledger · clear cart                 │
//! │  3. Plain-text summary                          (no lock)              │
//! │  4. spawn_blocking ─► render PDF ─► tokio::fs::write                   │
//! │        failure here is reported in `receipt_error`; the sale stands    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use duka_core::validation::validate_customer_name;
use duka_core::{PaymentMethod, Sale};

use crate::error::ApiError;
use crate::state::{Session, Till};

/// What the checkout screen shows after payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub sale: Sale,

    /// On-screen receipt text.
    pub summary: String,

    /// Where the PDF receipt was written.
    pub receipt_path: Option<PathBuf>,

    /// Why the PDF receipt is missing, if it is.
    pub receipt_error: Option<String>,
}

/// Commits the session's cart as a sale.
///
/// ## Arguments
/// * `customer` - May be blank; the configured walk-in label is recorded instead
/// * `payment` - `cash`, `card` or `mobile money`
///
/// ## Errors
/// Empty cart, insufficient stock and vanished products fail before
/// anything changes.
pub async fn checkout(
    session: &Session,
    customer: String,
    payment: String,
) -> Result<CheckoutResponse, ApiError> {
    debug!(session_id = %session.id(), customer = %customer, payment = %payment, "checkout command");

    validate_customer_name(&customer).map_err(|e| ApiError::validation(e.to_string()))?;
    let payment: PaymentMethod = payment
        .parse()
        .map_err(|e: duka_core::ValidationError| ApiError::validation(e.to_string()))?;

    let till = session.till();
    let cart_id = session.cart_id();
    let walk_in_label = till.config().walk_in_label.as_str();
    let sale = till.with_store_mut(|store| {
        store.checkout(cart_id, &customer, walk_in_label, payment, Utc::now())
    })?;

    info!(
        session_id = %session.id(),
        sale_id = %sale.id(),
        total = %sale.total(),
        items = sale.items().len(),
        "Sale created"
    );

    let summary = till.renderer().summary(&sale);
    let (receipt_path, receipt_error) = match write_receipt(till, &sale).await {
        Ok(path) => (Some(path), None),
        Err(e) => {
            warn!(sale_id = %sale.id(), error = %e, "Receipt not written, sale is committed");
            (None, Some(e.message))
        }
    };

    Ok(CheckoutResponse {
        sale,
        summary,
        receipt_path,
        receipt_error,
    })
}

/// Renders the PDF receipt of a past sale.
pub async fn render_receipt_document(till: &Till, sale_id: String) -> Result<Vec<u8>, ApiError> {
    debug!(sale_id = %sale_id, "render_receipt_document command");
    let sale = till.with_store(|store| store.ledger().get(&sale_id).cloned())?;
    render_pdf(till, sale).await
}

/// Renders `sale` and writes it to the receipt directory.
async fn write_receipt(till: &Till, sale: &Sale) -> Result<PathBuf, ApiError> {
    let bytes = render_pdf(till, sale.clone()).await?;

    let dir = till.config().receipt_output_dir();
    let path = dir.join(format!("{}.pdf", sale.id()));
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::receipt(format!("Could not create {}: {}", dir.display(), e)))?;
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::receipt(format!("Could not write {}: {}", path.display(), e)))?;

    info!(sale_id = %sale.id(), path = ?path, bytes = bytes.len(), "Receipt written");
    Ok(path)
}

/// PDF rendering is CPU-bound, so it runs on the blocking pool.
async fn render_pdf(till: &Till, sale: Sale) -> Result<Vec<u8>, ApiError> {
    let renderer = till.renderer();
    let bytes = tokio::task::spawn_blocking(move || renderer.render_pdf(&sale)).await??;
    Ok(bytes)
}
