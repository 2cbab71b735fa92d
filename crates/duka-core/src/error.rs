//! # Error Types
//!
//! Domain-specific error types for duka-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  duka-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  duka-store: StoreError      (export failures, wraps CoreError)        │
//! │  duka-receipt: RenderError   (PDF / logo failures)                     │
//! │  till app: ApiError          (what the UI sees, serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → UI        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, ID, etc.)
//! 3. A missing id is always a typed error, never a silent no-op

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout attempted with no line items.
    ///
    /// ## When This Occurs
    /// The cashier confirms payment on an empty cart. Nothing is mutated:
    /// catalog, cart and ledger stay exactly as they were.
    #[error("Cart is empty")]
    EmptyCart,

    /// Product id does not exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Sale id does not exist in the ledger.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Cart id is not open in the store.
    #[error("Cart not found: {0}")]
    CartNotFound(String),

    /// Product id has no line in the cart.
    #[error("Product {0} not in cart")]
    NotInCart(String),

    /// Stock would go negative under the `Reject` stock policy.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (qty: 5)
    ///      │
    ///      ▼
    /// Live stock: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "1003", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 of 1003 in stock"
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// A stock level would leave `-MAX_STOCK..=MAX_STOCK`.
    #[error("Stock for {sku} out of range: on hand {on_hand}, change {delta}, limit {max}")]
    StockOutOfRange {
        sku: String,
        on_hand: i64,
        delta: i64,
        max: i64,
    },

    /// Negative stock written directly (insert or edit) under a policy that
    /// only allows it through `AllowNegative`.
    #[error("Stock for {sku} cannot be negative ({stock}) under the {policy} stock policy")]
    NegativeStock {
        sku: String,
        stock: i64,
        policy: String,
    },

    /// A money total left the i64 range.
    #[error("Amount overflow while computing {0}")]
    AmountOverflow(String),

    /// A product is still referenced by open carts, or a cart line points
    /// at a product that no longer exists.
    ///
    /// ## When This Occurs
    /// - Deleting a product while `carts` open carts hold a line for it
    /// - Checking out a line whose product was deleted (`carts` is 0)
    #[error("Product {product_id} is referenced by {carts} open cart(s)")]
    DanglingReference { product_id: String, carts: usize },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad SKU characters, unknown payment method).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            sku: "1003".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 1003: available 3, requested 5"
        );

        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");

        let err = CoreError::DanglingReference {
            product_id: "p2".to_string(),
            carts: 2,
        };
        assert_eq!(err.to_string(), "Product p2 is referenced by 2 open cart(s)");

        let err = CoreError::NegativeStock {
            sku: "NEG".to_string(),
            stock: -5,
            policy: "reject".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Stock for NEG cannot be negative (-5) under the reject stock policy"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::Duplicate {
            field: "sku".to_string(),
            value: "1001".to_string(),
        };
        assert_eq!(err.to_string(), "sku '1001' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
