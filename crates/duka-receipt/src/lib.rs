//! # duka-receipt: Receipts for Duka POS
//!
//! Renders a committed sale as a printable PDF and as a plain-text
//! summary for the screen.
//!
//! ## Module Organization
//!
//! - [`receipt`] - `Receipt` data contract built from a `Sale`
//! - [`wrap`] - Product name word wrapping
//! - [`layout`] - Page geometry and pagination
//! - [`pdf`] - `ReceiptRenderer` and its settings
//! - [`summary`] - On-screen text rendering
//! - [`error`] - Render error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use duka_receipt::{Issuer, ReceiptRenderer, ReceiptSettings};
//!
//! let renderer = ReceiptRenderer::new(issuer, currency, ReceiptSettings::default());
//! let pdf = renderer.render_pdf(&sale)?;
//! let text = renderer.summary(&sale);
//! ```

pub mod error;
pub mod layout;
pub mod pdf;
pub mod receipt;
pub mod summary;
pub mod wrap;

#[cfg(test)]
mod test_support;

pub use error::{RenderError, RenderResult};
pub use layout::{paginate, PageGeometry, PageLayout};
pub use pdf::{ReceiptRenderer, ReceiptSettings};
pub use receipt::{Issuer, Receipt, ReceiptRow};
pub use summary::render_summary;
pub use wrap::{wrap_name, DEFAULT_WRAP_WIDTH};
