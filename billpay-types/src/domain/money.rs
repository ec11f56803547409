//! Fixed-point monetary value, scale 2.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Scale-2 fixed-point amount stored in minor units (cents) to avoid
/// floating-point precision issues.
///
/// Serializes on the wire as a decimal string such as `"100.00"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(i64);

impl Money {
    /// Creates a new Money value. Negative amounts are rejected.
    pub fn new(minor: i64) -> Result<Self, DomainError> {
        if minor < 0 {
            return Err(DomainError::NegativeAmount);
        }
        Ok(Self(minor))
    }

    /// Creates a zero-value Money.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Wraps a raw minor-unit value without sign validation.
    ///
    /// Store rows own their sign; the workflow never writes a negative
    /// balance but must be able to read one.
    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor units.
    pub fn minor(&self) -> i64 {
        self.0
    }

    /// Returns true if there is anything to pay (strictly positive).
    pub fn is_payable(&self) -> bool {
        self.0 > 0
    }

    /// Checked subtraction - returns error if the result would be negative.
    pub fn checked_sub(&self, other: Money) -> Result<Money, DomainError> {
        if self.0 < other.0 {
            return Err(DomainError::InsufficientFunds {
                available: self.0,
                requested: other.0,
            });
        }
        Ok(Money(self.0 - other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::ValidationError(format!("Invalid amount: {s:?}"));

        let (sign, digits) = match s.strip_prefix('-') {
            Some(rest) => (-1i64, rest),
            None => (1i64, s),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() || frac.len() > 2 {
            return Err(invalid());
        }

        let major: i64 = whole.parse().map_err(|_| invalid())?;
        let minor: i64 = if frac.is_empty() {
            0
        } else {
            // "5" means 50 cents, "05" means 5 cents.
            let parsed: i64 = frac.parse().map_err(|_| invalid())?;
            if frac.len() == 1 { parsed * 10 } else { parsed }
        };

        major
            .checked_mul(100)
            .and_then(|m| m.checked_add(minor))
            .map(|m| Money(sign * m))
            .ok_or_else(invalid)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let money = Money::new(10000).unwrap();
        assert_eq!(money.minor(), 10000);
    }

    #[test]
    fn test_negative_money_fails() {
        let result = Money::new(-100);
        assert!(matches!(result, Err(DomainError::NegativeAmount)));
    }

    #[test]
    fn test_checked_sub() {
        let balance = Money::new(10000).unwrap();
        let payment = Money::new(10000).unwrap();
        assert_eq!(balance.checked_sub(payment).unwrap(), Money::zero());
    }

    #[test]
    fn test_checked_sub_insufficient() {
        let balance = Money::new(100).unwrap();
        let result = balance.checked_sub(Money::new(200).unwrap());
        assert!(matches!(result, Err(DomainError::InsufficientFunds { .. })));
    }

    #[test]
    fn test_is_payable() {
        assert!(Money::new(1).unwrap().is_payable());
        assert!(!Money::zero().is_payable());
        assert!(!Money::from_minor(-50).is_payable());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(10000).unwrap().to_string(), "100.00");
        assert_eq!(Money::new(1050).unwrap().to_string(), "10.50");
        assert_eq!(Money::zero().to_string(), "0.00");
        assert_eq!(Money::from_minor(-50).to_string(), "-0.50");
    }

    #[test]
    fn test_money_from_str() {
        assert_eq!("100.00".parse::<Money>().unwrap(), Money::new(10000).unwrap());
        assert_eq!("100".parse::<Money>().unwrap(), Money::new(10000).unwrap());
        assert_eq!("0.5".parse::<Money>().unwrap(), Money::new(50).unwrap());
        assert_eq!("0.05".parse::<Money>().unwrap(), Money::new(5).unwrap());
        assert_eq!("-1.25".parse::<Money>().unwrap(), Money::from_minor(-125));
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!(".".parse::<Money>().is_err());
    }
}
