//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely, and
//! `CurrencyFormat` for turning them into display strings.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Every price, line total, sale total and export column is an i64     │
//! │    count of the smallest currency unit. Sums never drift.              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use duka_core::money::Money;
//!
//! let price = Money::from_minor(2500);      // KES 2,500
//! let line = price.multiply_quantity(2);    // KES 5,000
//! assert_eq!(line.minor(), 5000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: stock valuation and revenue deltas can be negative
/// - **Single field tuple struct**: zero-cost abstraction, serializes as a bare integer
/// - **Operators saturate**: `+`, `*` and `Sum` clamp at the i64 bounds and
///   never panic; code that must report an overflow uses the `checked_*` methods
///
/// ## Where Money Flows
/// ```text
/// Product.price ──► CartLine.unit_price ──► CartLine::line_total ──► Cart::subtotal
///                                                                        │
///                            Sale.total ◄──── checkout snapshot ◄────────┘
///                                │
///                                ├──► Receipt grand total
///                                └──► CSV `total` column (exact integer)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::money::Money;
    ///
    /// let price = Money::from_minor(1800);
    /// assert_eq!(price.minor(), 1800);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(3200);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 9600);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(2500).checked_multiply_quantity(2), Some(Money::from_minor(5000)));
    /// assert_eq!(Money::from_minor(i64::MAX / 2 + 1).checked_multiply_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        // i128 holds any i64 × i64 product exactly
        i64::try_from(self.0 as i128 * qty as i128).ok().map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Sums amounts, `None` if the total leaves the i64 range.
    ///
    /// ## Example
    /// ```rust
    /// use duka_core::money::Money;
    ///
    /// let lines = [Money::from_minor(5000), Money::from_minor(1800)];
    /// assert_eq!(Money::checked_sum(lines), Some(Money::from_minor(6800)));
    /// assert_eq!(Money::checked_sum([Money::from_minor(i64::MAX), Money::from_minor(1)]), None);
    /// ```
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |acc, amount| acc.checked_add(amount))
    }
}

/// Display uses the default currency format (`KES 2,500`).
///
/// ## Note
/// Receipts and reports format through the configured [`CurrencyFormat`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CurrencyFormat::default().format(*self))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Currency Format
// =============================================================================

/// How money is rendered for humans.
///
/// ## Example
/// ```rust
/// use duka_core::money::{CurrencyFormat, Money};
///
/// let kes = CurrencyFormat::default();
/// assert_eq!(kes.format(Money::from_minor(2500)), "KES 2,500");
///
/// let usd = CurrencyFormat::new("$", 2);
/// assert_eq!(usd.format(Money::from_minor(123456)), "$ 1,234.56");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrencyFormat {
    /// Currency symbol or code printed before the amount.
    pub symbol: String,

    /// Number of minor-unit digits (0 for KES shillings, 2 for cents).
    pub decimals: u8,

    /// Digit-group separator, `None` to disable grouping.
    pub thousands_separator: Option<char>,
}

impl CurrencyFormat {
    /// Creates a format with `,` grouping.
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        CurrencyFormat {
            symbol: symbol.into(),
            decimals,
            thousands_separator: Some(','),
        }
    }

    /// Formats an amount without the currency symbol (`2,500`).
    pub fn format_amount(&self, money: Money) -> String {
        let minor = money.minor();
        let divisor = 10_i64.pow(self.decimals as u32);
        let whole = (minor / divisor).unsigned_abs();
        let frac = (minor % divisor).unsigned_abs();

        let mut out = String::new();
        if minor < 0 {
            out.push('-');
        }
        out.push_str(&self.group_digits(whole));
        if self.decimals > 0 {
            out.push('.');
            out.push_str(&format!("{:0width$}", frac, width = self.decimals as usize));
        }
        out
    }

    /// Formats an amount with the currency symbol (`KES 2,500`).
    pub fn format(&self, money: Money) -> String {
        let amount = self.format_amount(money);
        match amount.strip_prefix('-') {
            Some(positive) => format!("-{} {}", self.symbol, positive),
            None => format!("{} {}", self.symbol, amount),
        }
    }

    fn group_digits(&self, value: u64) -> String {
        let digits = value.to_string();
        let Some(sep) = self.thousands_separator else {
            return digits;
        };

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(sep);
            }
            grouped.push(ch);
        }
        grouped
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat::new("KES", 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(2500);
        assert_eq!(money.minor(), 2500);
        assert!(!money.is_zero());
        assert!(!money.is_negative());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        assert_eq!((a * 3).minor(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_minor(100);
        assert_eq!(c.minor(), 1400);
    }

    #[test]
    fn test_sum() {
        let values = [Money::from_minor(2500), Money::from_minor(1800), Money::from_minor(3200)];
        let total: Money = values.iter().sum();
        assert_eq!(total.minor(), 7500);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_checked_arithmetic_at_the_i64_boundary() {
        let half = Money::from_minor(i64::MAX / 2 + 1);

        assert_eq!(half.checked_multiply_quantity(2), None);
        assert_eq!(half.checked_multiply_quantity(1), Some(half));
        assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
        assert_eq!(
            Money::checked_sum([half, Money::from_minor(i64::MAX / 2)]),
            Some(Money::from_minor(i64::MAX))
        );
        assert_eq!(Money::checked_sum([half, half]), None);
        assert_eq!(Money::checked_sum(Vec::<Money>::new()), Some(Money::zero()));
    }

    #[test]
    fn test_operators_saturate_instead_of_panicking() {
        let half = Money::from_minor(i64::MAX / 2 + 1);

        assert_eq!(half.multiply_quantity(2).minor(), i64::MAX);
        assert_eq!((half * 3).minor(), i64::MAX);
        assert_eq!((half + half).minor(), i64::MAX);
        assert_eq!((Money::from_minor(i64::MIN) - Money::from_minor(1)).minor(), i64::MIN);

        let total: Money = [half, half, half].iter().sum();
        assert_eq!(total.minor(), i64::MAX);
    }

    #[test]
    fn test_default_format_is_whole_shillings() {
        let kes = CurrencyFormat::default();
        assert_eq!(kes.format(Money::from_minor(0)), "KES 0");
        assert_eq!(kes.format(Money::from_minor(999)), "KES 999");
        assert_eq!(kes.format(Money::from_minor(2500)), "KES 2,500");
        assert_eq!(kes.format(Money::from_minor(1234567)), "KES 1,234,567");
        assert_eq!(kes.format(Money::from_minor(-5000)), "-KES 5,000");
    }

    #[test]
    fn test_format_with_decimals() {
        let usd = CurrencyFormat::new("$", 2);
        assert_eq!(usd.format(Money::from_minor(1)), "$ 0.01");
        assert_eq!(usd.format(Money::from_minor(100)), "$ 1.00");
        assert_eq!(usd.format(Money::from_minor(123456789)), "$ 1,234,567.89");
        assert_eq!(usd.format_amount(Money::from_minor(-1234)), "-12.34");
    }

    #[test]
    fn test_format_without_grouping() {
        let plain = CurrencyFormat {
            symbol: "KES".to_string(),
            decimals: 0,
            thousands_separator: None,
        };
        assert_eq!(plain.format(Money::from_minor(1234567)), "KES 1234567");
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_minor(2500)).unwrap();
        assert_eq!(json, "2500");
    }
}
