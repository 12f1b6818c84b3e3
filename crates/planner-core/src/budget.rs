//! Fixed-point project budgets.
//!
//! A budget holds at most 10 significant digits, 2 of them fractional. It is
//! kept as a [`Decimal`] normalised to scale 2 so that what goes into storage
//! and what goes out on the wire are the same digits (`"10000.50"`), never a
//! binary float.

use std::{fmt, str::FromStr};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of fractional digits kept.
pub const SCALE: u32 = 2;

/// Total number of digits kept, fractional ones included.
pub const PRECISION: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
  #[error("Budget must be a valid number")]
  NotANumber,

  #[error("Budget must fit 10 digits with 2 decimal places")]
  OutOfRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Budget(Decimal);

impl Budget {
  /// Round `value` to two places (half away from zero) and check it fits.
  pub fn new(value: Decimal) -> Result<Self, BudgetError> {
    let mut rounded =
      value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.abs() >= upper_bound() {
      return Err(BudgetError::OutOfRange);
    }
    rounded.rescale(SCALE);
    Ok(Self(rounded))
  }

  pub fn as_decimal(&self) -> Decimal { self.0 }
}

/// `10^(PRECISION - SCALE)`: the smallest magnitude that no longer fits.
fn upper_bound() -> Decimal { Decimal::from(10_i64.pow(PRECISION - SCALE)) }

impl FromStr for Budget {
  type Err = BudgetError;

  /// Permissive numeric parse: surrounding whitespace, a leading sign, plain
  /// and scientific notation are all accepted.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    match Decimal::from_str(s).or_else(|_| Decimal::from_scientific(s)) {
      Ok(value) => Self::new(value),
      Err(_) => unrepresentable(s),
    }
  }
}

/// `s` is not a `Decimal`. Tell a malformed string apart from a well-formed
/// number whose magnitude or precision `Decimal` cannot hold.
fn unrepresentable(s: &str) -> Result<Budget, BudgetError> {
  match s.parse::<f64>() {
    Ok(f) if f.is_finite() && f.abs() < 0.005 => Budget::new(Decimal::ZERO),
    Ok(f) if f.is_finite() => Err(BudgetError::OutOfRange),
    _ => Err(BudgetError::NotANumber),
  }
}

impl fmt::Display for Budget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl Serialize for Budget {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for Budget {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pads_to_two_places() {
    assert_eq!("10000.5".parse::<Budget>().unwrap().to_string(), "10000.50");
    assert_eq!("100".parse::<Budget>().unwrap().to_string(), "100.00");
  }

  #[test]
  fn rounds_extra_places() {
    assert_eq!("1.005".parse::<Budget>().unwrap().to_string(), "1.01");
    assert_eq!("-1.005".parse::<Budget>().unwrap().to_string(), "-1.01");
  }

  #[test]
  fn accepts_whitespace_and_scientific() {
    assert_eq!(" 42.1 ".parse::<Budget>().unwrap().to_string(), "42.10");
    assert_eq!("1e3".parse::<Budget>().unwrap().to_string(), "1000.00");
  }

  #[test]
  fn rejects_non_numbers() {
    for s in ["not-a-number", "", "NaN", "inf", "12abc"] {
      assert_eq!(s.parse::<Budget>(), Err(BudgetError::NotANumber), "{s:?}");
    }
  }

  #[test]
  fn range_boundary() {
    assert!("99999999.99".parse::<Budget>().is_ok());
    assert_eq!("100000000".parse::<Budget>(), Err(BudgetError::OutOfRange));
    assert_eq!("99999999.995".parse::<Budget>(), Err(BudgetError::OutOfRange));
  }

  #[test]
  fn numbers_beyond_decimal_are_out_of_range() {
    assert_eq!("1e300".parse::<Budget>(), Err(BudgetError::OutOfRange));
    assert_eq!("-1e300".parse::<Budget>(), Err(BudgetError::OutOfRange));
    assert_eq!(
      "12345678901234567890123456789012345".parse::<Budget>(),
      Err(BudgetError::OutOfRange)
    );
    assert_eq!("1e-300".parse::<Budget>().unwrap().to_string(), "0.00");
  }

  #[test]
  fn serializes_as_string() {
    let budget: Budget = "10000.50".parse().unwrap();
    assert_eq!(serde_json::to_value(budget).unwrap(), serde_json::json!("10000.50"));
  }
}
