//! # CLI Error Type
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in cvs                                    │
//! │                                                                         │
//! │  Command (e.g. record_sale)                                            │
//! │       │                                                                 │
//! │       ├── DbError::Rule(InsufficientStock) ──┐                         │
//! │       ├── CoreError::SupplierMismatch ───────┤                         │
//! │       ├── DbError::QueryFailed ──────────────┼──► CliError             │
//! │       │                                      │       │                  │
//! │       ▼                                      │       ▼                  │
//! │  Menu loop ◄─────────────────────────────────┘  "Error: <message>"     │
//! │       │                                         back to the menu       │
//! │       └── CliError::InputClosed ──► leave the loop cleanly             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cvs_core::{CoreError, ValidationError};
use cvs_db::DbError;
use thiserror::Error;

/// Machine-readable category of a [`CliError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Row not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Not enough stock, or the product isn't carried
    InsufficientStock,

    /// Business rule refused the action
    BusinessLogic,

    /// Database operation failed
    DatabaseError,

    /// Configuration could not be loaded
    Config,

    /// Terminal read/write failed
    Io,

    /// Standard input reached end of file
    InputClosed,
}

/// Everything a menu action can fail with.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Rule(#[from] CoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input closed")]
    InputClosed,
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::Rule(CoreError::Validation(err))
    }
}

fn core_code(err: &CoreError) -> ErrorCode {
    match err {
        CoreError::InsufficientStock { .. } | CoreError::NotStocked { .. } => {
            ErrorCode::InsufficientStock
        }
        CoreError::Validation(_) => ErrorCode::ValidationError,
        CoreError::EmployeeNotInStore { .. }
        | CoreError::InvalidStatusTransition { .. }
        | CoreError::SupplierMismatch { .. }
        | CoreError::Empty(_)
        | CoreError::TooManyLines { .. } => ErrorCode::BusinessLogic,
    }
}

impl CliError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CliError::Db(DbError::NotFound { .. }) => ErrorCode::NotFound,
            CliError::Db(DbError::Rule(err)) | CliError::Rule(err) => core_code(err),
            CliError::Db(DbError::UniqueViolation { .. })
            | CliError::Db(DbError::ForeignKeyViolation { .. })
            | CliError::Db(DbError::CheckViolation { .. }) => ErrorCode::ValidationError,
            CliError::Db(_) => ErrorCode::DatabaseError,
            CliError::Config(_) => ErrorCode::Config,
            CliError::Io(_) => ErrorCode::Io,
            CliError::InputClosed => ErrorCode::InputClosed,
        }
    }

    /// True when the menu can carry on after showing the message.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self.code(),
            ErrorCode::Io | ErrorCode::InputClosed | ErrorCode::Config
        )
    }

    /// Text shown at the prompt.
    ///
    /// Rule and lookup failures are shown as-is; raw database failures are
    /// logged and replaced by a generic message.
    pub fn user_message(&self) -> String {
        match self {
            CliError::Db(DbError::QueryFailed(e)) | CliError::Db(DbError::Internal(e)) => {
                tracing::error!("Database operation failed: {}", e);
                "Database operation failed".to_string()
            }
            CliError::Db(DbError::TransactionFailed(e)) => {
                tracing::error!("Transaction failed: {}", e);
                "Database transaction failed; nothing was saved".to_string()
            }
            CliError::Db(DbError::ForeignKeyViolation { message }) => {
                tracing::error!("Foreign key violation: {}", message);
                "Invalid reference".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Result type for menu actions.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err: CliError = DbError::not_found("Order", 9).into();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.is_recoverable());

        let err: CliError = DbError::Rule(CoreError::NotStocked {
            store_id: 1,
            product_id: 2,
        })
        .into();
        assert_eq!(err.code(), ErrorCode::InsufficientStock);

        let err: CliError = CoreError::Empty("Order").into();
        assert_eq!(err.code(), ErrorCode::BusinessLogic);

        let err: CliError = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        assert!(!CliError::InputClosed.is_recoverable());
    }

    #[test]
    fn test_user_message_hides_sql() {
        let err: CliError = DbError::QueryFailed("near \"SELEC\": syntax error".to_string()).into();
        assert_eq!(err.user_message(), "Database operation failed");

        let err: CliError = DbError::Rule(CoreError::EmployeeNotInStore {
            employee_id: 4,
            store_id: 1,
        })
        .into();
        assert_eq!(err.user_message(), "Employee 4 does not work at store 1");
    }
}
