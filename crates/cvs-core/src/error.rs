//! # Error Types
//!
//! Domain-specific error types for cvs-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cvs-core errors (this file)                                           │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cvs-db errors                                                         │
//! │  └── DbError          - Database failures (wraps CoreError)            │
//! │                                                                         │
//! │  cli errors                                                            │
//! │  └── CliError         - What the operator sees at the prompt           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → CliError → stdout       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Not enough stock on hand to complete a sale.
    ///
    /// ## When This Occurs
    /// - The stock check before the sale finds fewer units than requested
    /// - Another terminal sold the last units between check and decrement
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// The store carries no stock row for the product at all.
    #[error("Product {product_id} is not stocked at store {store_id}")]
    NotStocked { store_id: i64, product_id: i64 },

    /// The employee ringing up a sale works at a different store.
    #[error("Employee {employee_id} does not work at store {store_id}")]
    EmployeeNotInStore { employee_id: i64, store_id: i64 },

    /// Order status change not allowed by the order lifecycle.
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// A product from another supplier was added to an order draft.
    #[error("Product {product_id} comes from supplier {actual}, but this order is for supplier {expected}")]
    SupplierMismatch {
        product_id: i64,
        expected: i64,
        actual: i64,
    },

    /// Order or sale submitted without any lines.
    #[error("{0} has no lines")]
    Empty(&'static str),

    /// Too many distinct products on one order or sale.
    #[error("Cannot have more than {max} lines")]
    TooManyLines { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
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

    /// Invalid format (e.g., a malformed month).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Shin Ramyun".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Shin Ramyun: available 3, requested 5"
        );

        let err = CoreError::InvalidStatusTransition {
            order_id: 7,
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        };
        assert_eq!(err.to_string(), "Order 7 cannot move from Delivered to Pending");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
