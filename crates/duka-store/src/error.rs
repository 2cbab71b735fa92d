//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (duka-core)          csv::Error                              │
//! │       │                             │                                   │
//! │       ▼                             ▼                                   │
//! │  StoreError (this module) ← Adds export context                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in till app) ← Serialized for the UI                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use duka_core::CoreError;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Encoding the ledger to CSV failed.
    ///
    /// ## When This Occurs
    /// - The writer could not be flushed into its buffer
    /// - A row failed to serialize
    #[error("Export failed: {0}")]
    Export(String),
}

impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::Export(err.to_string())
    }
}

/// Convenience type alias for store operation results.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_transparent() {
        let err: StoreError = CoreError::EmptyCart.into();
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[test]
    fn test_export_error_message() {
        let err = StoreError::Export("buffer closed".to_string());
        assert_eq!(err.to_string(), "Export failed: buffer closed");
    }
}
