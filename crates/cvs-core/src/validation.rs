//! # Validation Module
//!
//! Input checks applied before anything reaches the database.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Console prompt                                               │
//! │  └── re-asks until the text parses as a number / is in the list        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── keyword length, quantity range, names, prices, report month       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  └── NOT NULL, CHECK (quantity >= 0), foreign keys                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::types::ReportPeriod;
use crate::{MAX_KEYWORD_LEN, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a LIKE search keyword.
///
/// ## Rules
/// - Surrounding whitespace is dropped
/// - Empty is allowed and matches every row
/// - At most 100 characters
///
/// ## Returns
/// The trimmed keyword.
pub fn validate_keyword(keyword: &str) -> ValidationResult<String> {
    let keyword = keyword.trim();

    if keyword.chars().count() > MAX_KEYWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "keyword".to_string(),
            max: MAX_KEYWORD_LEN,
        });
    }

    Ok(keyword.to_string())
}

/// Validates a display name (store, supplier, employee, product).
///
/// ```rust
/// use cvs_core::validation::validate_name;
///
/// assert!(validate_name("store name", "GS25 Gangnam").is_ok());
/// assert!(validate_name("store name", "  ").is_err());
/// ```
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order or sale quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_LINE_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in minor units. Zero is allowed (free items).
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Report Period
// =============================================================================

/// Parses a `YYYY-MM` month into a report period.
///
/// ```rust
/// use cvs_core::validation::parse_report_month;
///
/// let period = parse_report_month("2026-03").unwrap();
/// assert_eq!(period.label(), "2026-03");
/// assert!(parse_report_month("2026-3x").is_err());
/// ```
pub fn parse_report_month(input: &str) -> ValidationResult<ReportPeriod> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "month".to_string(),
        reason: reason.to_string(),
    };

    let (year, month) = input
        .trim()
        .split_once('-')
        .ok_or_else(|| invalid("expected YYYY-MM"))?;

    if year.len() != 4 || month.is_empty() || month.len() > 2 {
        return Err(invalid("expected YYYY-MM"));
    }

    let year: i32 = year.parse().map_err(|_| invalid("year is not a number"))?;
    let month: u32 = month.parse().map_err(|_| invalid("month is not a number"))?;

    if !(1..=12).contains(&month) {
        return Err(ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        });
    }

    ReportPeriod::month(year, month).ok_or_else(|| invalid("no such month"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_keyword() {
        assert_eq!(validate_keyword("  GS ").unwrap(), "GS");
        assert_eq!(validate_keyword("").unwrap(), "");
        assert!(validate_keyword(&"가".repeat(100)).is_ok());
        assert!(validate_keyword(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Kim Cheolsu").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", &"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_LINE_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_LINE_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(1_500).is_ok());
        assert!(validate_price(-1).is_err());
    }

    #[test]
    fn test_parse_report_month() {
        assert_eq!(parse_report_month("2026-01").unwrap().label(), "2026-01");
        assert_eq!(parse_report_month(" 2026-1 ").unwrap().label(), "2026-01");

        assert!(parse_report_month("2026").is_err());
        assert!(parse_report_month("2026-00").is_err());
        assert!(parse_report_month("2026-13").is_err());
        assert!(parse_report_month("26-01").is_err());
        assert!(parse_report_month("abcd-01").is_err());
    }
}
