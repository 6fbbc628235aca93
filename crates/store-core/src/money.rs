//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A book priced 1500.00 with a 100.00 discount must come out at          │
//! │  exactly 1400.00 on the wire, every time.                              │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    150000 cents − 10000 cents = 140000 cents, rendered "1400.00"       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Prices serialize as fixed-point decimal strings with exactly two
//! fractional digits ("1500.00"), and deserialize from either a decimal
//! string or a bare JSON number.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: a discount larger than the price yields a negative
///   discounted price; nothing clamps it
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Custom serde**: two-decimal string on the wire, never a float
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use store_core::money::Money;
    ///
    /// let price = Money::from_cents(150_000); // 1500.00
    /// assert_eq!(price.cents(), 150_000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ## Example
    /// ```rust
    /// use store_core::money::Money;
    ///
    /// let price = Money::from_major_minor(1500, 0);
    /// assert_eq!(price.cents(), 150_000);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// The price after subtracting a discount.
    ///
    /// Unclamped: a discount larger than the price produces a negative
    /// result, and the caller sees exactly that.
    ///
    /// ## Example
    /// ```rust
    /// use store_core::money::Money;
    ///
    /// let price = Money::from_major_minor(1500, 0);
    /// let discount = Money::from_major_minor(100, 0);
    /// assert_eq!(price.with_discount(discount).to_string(), "1400.00");
    /// ```
    #[inline]
    pub const fn with_discount(&self, discount: Money) -> Money {
        Money(self.0 - discount.0)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Error returned when a decimal string is not a valid money amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid money amount: expected a decimal with at most two fractional digits")]
pub struct ParseMoneyError;

/// Parses fixed-point decimal strings: "1500", "1500.5", "1500.00", "-0.50".
///
/// At most two fractional digits are accepted; a third would silently lose
/// precision, so it is rejected instead.
impl FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (digits, ""),
        };

        if whole.is_empty() || frac.len() > 2 {
            return Err(ParseMoneyError);
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ParseMoneyError);
        }

        let whole: i64 = whole.parse().map_err(|_| ParseMoneyError)?;
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| ParseMoneyError)? * 10,
            _ => frac.parse::<i64>().map_err(|_| ParseMoneyError)?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(frac_cents))
            .ok_or(ParseMoneyError)?;

        Ok(Money(if negative { -cents } else { cents }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the wire format: two fractional digits, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MoneyVisitor;

        impl<'de> Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal amount with at most two fractional digits")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                v.checked_mul(100)
                    .map(Money::from_cents)
                    .ok_or_else(|| E::custom(ParseMoneyError))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|v| v.checked_mul(100))
                    .map(Money::from_cents)
                    .ok_or_else(|| E::custom(ParseMoneyError))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                if !v.is_finite() {
                    return Err(E::custom(ParseMoneyError));
                }
                Ok(Money::from_cents((v * 100.0).round() as i64))
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(150_000);
        assert_eq!(money.cents(), 150_000);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(1500, 0).cents(), 150_000);
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(150_000).to_string(), "1500.00");
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("1500".parse::<Money>().unwrap().cents(), 150_000);
        assert_eq!("1500.00".parse::<Money>().unwrap().cents(), 150_000);
        assert_eq!("1500.5".parse::<Money>().unwrap().cents(), 150_050);
        assert_eq!("-0.50".parse::<Money>().unwrap().cents(), -50);
        assert_eq!(" 10.99 ".parse::<Money>().unwrap().cents(), 1099);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Money>().is_err());
        assert!("-".parse::<Money>().is_err());
        assert!(".50".parse::<Money>().is_err());
        assert!("10.999".parse::<Money>().is_err());
        assert!("ten".parse::<Money>().is_err());
        assert!("10.0x".parse::<Money>().is_err());
    }

    #[test]
    fn test_with_discount_unclamped() {
        let price = Money::from_major_minor(1500, 0);
        let discount = Money::from_major_minor(100, 0);
        assert_eq!(price.with_discount(discount).to_string(), "1400.00");

        // Discount exceeding price goes negative, nothing clamps it
        let oversized = Money::from_major_minor(2000, 0);
        assert_eq!(price.with_discount(oversized).to_string(), "-500.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);
        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
    }

    #[test]
    fn test_serde_roundtrip() {
        let price = Money::from_major_minor(1500, 0);
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"1500.00\"");

        let parsed: Money = serde_json::from_str("\"1500.00\"").unwrap();
        assert_eq!(parsed, price);

        // Bare JSON numbers are accepted on input
        let parsed: Money = serde_json::from_str("1500").unwrap();
        assert_eq!(parsed, price);
        let parsed: Money = serde_json::from_str("1500.0").unwrap();
        assert_eq!(parsed, price);
    }
}
