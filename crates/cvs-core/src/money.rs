//! # Money Module
//!
//! Provides the `Money` type for monetary values and `Currency` for display.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product prices are stored as integers in the smallest currency unit.  │
//! │                                                                         │
//! │    KRW: 1 unit  = ₩1     (no minor unit, decimals = 0)                 │
//! │    USD: 1 unit  = $0.01  (decimals = 2)                                │
//! │                                                                         │
//! │  Sums like Σ quantity × price are exact; only the renderer cares       │
//! │  about symbols, grouping and decimal points.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use cvs_core::money::Money;
    ///
    /// let price = Money::from_minor(1_500);
    /// assert_eq!(price.minor(), 1_500);
    /// ```
    #[inline]
    pub const fn from_minor(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use cvs_core::money::Money;
    ///
    /// let line_total = Money::from_minor(1_200).multiply_quantity(3);
    /// assert_eq!(line_total.minor(), 3_600);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Raw minor units. Use [`Currency::format`] for anything an operator reads.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Currency
// =============================================================================

/// How money is printed on receipts and reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Symbol printed before the amount.
    pub symbol: String,

    /// Number of minor-unit digits (0 for KRW, 2 for USD).
    pub decimals: u8,
}

impl Currency {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        Currency {
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Korean won, the chain's home currency.
    pub fn krw() -> Self {
        Currency::new("₩", 0)
    }

    /// Formats an amount with the symbol, thousands separators and decimals.
    ///
    /// ```rust
    /// use cvs_core::money::{Currency, Money};
    ///
    /// assert_eq!(Currency::krw().format(Money::from_minor(1_234_500)), "₩1,234,500");
    /// assert_eq!(Currency::new("$", 2).format(Money::from_minor(-1_099)), "-$10.99");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        let divisor = 10_i64.pow(self.decimals as u32);
        let units = amount.minor();
        let whole = (units / divisor).abs();
        let frac = (units % divisor).abs();

        let sign = if units < 0 { "-" } else { "" };
        let grouped = group_thousands(whole);

        if self.decimals > 0 {
            format!(
                "{}{}{}.{:0width$}",
                sign,
                self.symbol,
                grouped,
                frac,
                width = self.decimals as usize
            )
        } else {
            format!("{}{}{}", sign, self.symbol, grouped)
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::krw()
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1_000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1_500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3_000);

        let mut c = a;
        c += b;
        assert_eq!(c.minor(), 1_500);
    }

    #[test]
    fn test_sum_of_lines() {
        let lines = [(1_200, 2), (1_700, 1), (1_000, 5)];
        let total: Money = lines
            .iter()
            .map(|&(price, qty)| Money::from_minor(price).multiply_quantity(qty))
            .sum();
        assert_eq!(total.minor(), 9_100);
    }

    #[test]
    fn test_format_krw() {
        let krw = Currency::krw();
        assert_eq!(krw.format(Money::zero()), "₩0");
        assert_eq!(krw.format(Money::from_minor(999)), "₩999");
        assert_eq!(krw.format(Money::from_minor(1_000)), "₩1,000");
        assert_eq!(krw.format(Money::from_minor(123_456_789)), "₩123,456,789");
        assert_eq!(krw.format(Money::from_minor(-4_500)), "-₩4,500");
    }

    #[test]
    fn test_format_with_decimals() {
        let usd = Currency::new("$", 2);
        assert_eq!(usd.format(Money::from_minor(1)), "$0.01");
        assert_eq!(usd.format(Money::from_minor(123_456)), "$1,234.56");
        assert_eq!(usd.format(Money::from_minor(-50)), "-$0.50");
    }
}
