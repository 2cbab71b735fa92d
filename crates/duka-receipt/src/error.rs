//! # Render Error Types

use std::path::PathBuf;

use thiserror::Error;

/// Receipt rendering errors.
///
/// None of these ever undo a sale: rendering happens after the sale has
/// been committed to the ledger.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The PDF writer rejected the document.
    #[error("PDF generation failed: {0}")]
    Pdf(String),

    /// The logo file could not be decoded as an image.
    ///
    /// ## When This Occurs
    /// - File is not a PNG or JPEG
    /// - File is truncated
    #[error("Logo {path:?} could not be loaded: {reason}")]
    Logo { path: PathBuf, reason: String },

    /// Reading the logo file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Maps any printpdf error into `RenderError::Pdf`.
pub(crate) fn pdf_error(err: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(err.to_string())
}
