//! Type-safe money representation using decimal arithmetic.
//!
//! Every amount in the cart is in Vietnamese dong. The API sends prices either
//! as JSON numbers or as decimal strings; both deserialize into [`Money`].

use std::iter::Sum;
use std::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`Money`] value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount must not be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative amount of money in dong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// Zero dong.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest representable amount; arithmetic saturates here.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a money value, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, MoneyError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(MoneyError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a money value from a whole number of dong.
    #[must_use]
    pub fn from_dong(dong: u64) -> Self {
        Self(Decimal::from(dong))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units at this unit price.
    ///
    /// Saturates at [`Money::MAX`] instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }

    /// Format for display, e.g. `1.250.000 ₫`.
    ///
    /// Dong has no minor unit, so the amount is rounded half away from zero.
    #[must_use]
    pub fn display(&self) -> String {
        let whole = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .trunc()
            .to_string();

        let digits: Vec<char> = whole.chars().collect();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.iter().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(*c);
        }

        format!("{grouped} ₫")
    }
}

impl TryFrom<Decimal> for Money {
    type Error = MoneyError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from_dong(0).display(), "0 ₫");
        assert_eq!(Money::from_dong(999).display(), "999 ₫");
        assert_eq!(Money::from_dong(1_000).display(), "1.000 ₫");
        assert_eq!(Money::from_dong(1_250_000).display(), "1.250.000 ₫");
    }

    #[test]
    fn test_display_rounds_fraction() {
        let money = Money::new(Decimal::new(15_005, 1)).unwrap(); // 1500.5
        assert_eq!(money.display(), "1.501 ₫");
    }

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Money::new(Decimal::from(-1)),
            Err(MoneyError::Negative(_))
        ));
        assert!(serde_json::from_str::<Money>("-5").is_err());
    }

    #[test]
    fn test_deserializes_number_and_string() {
        let from_number: Money = serde_json::from_str("150000").unwrap();
        let from_string: Money = serde_json::from_str("\"150000\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Money::from_dong(150_000));
    }

    #[test]
    fn test_times_and_sum() {
        let total: Money = [Money::from_dong(100).times(3), Money::from_dong(50).times(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_dong(400));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge: Money = serde_json::from_str("\"79228162514264337593543950335\"").unwrap();
        assert_eq!(huge, Money::MAX);

        assert_eq!(huge.times(2), Money::MAX);
        assert_eq!(huge + Money::from_dong(1), Money::MAX);
        let total: Money = [huge, huge, Money::from_dong(5)].into_iter().sum();
        assert_eq!(total, Money::MAX);
        assert!(Money::MAX.display().ends_with(" ₫"));
    }
}
