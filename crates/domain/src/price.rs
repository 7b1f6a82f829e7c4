//! Money amounts for product prices and cart totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A money amount backed by a fixed-point decimal.
///
/// Prices and totals must never be floats; `Decimal` keeps the scale the
/// merchant entered (a product priced at 18.80 stays 18.80). Negativity is
/// rejected at the input boundary, not here, so arithmetic stays total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Creates a price from a decimal amount.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns zero.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Multiplies by a line quantity.
    pub fn times(&self, quantity: i32) -> Price {
        Price(self.0 * Decimal::from(quantity))
    }
}

impl Default for Price {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::ops::Add for Price {
    type Output = Price;

    fn add(self, rhs: Self) -> Self::Output {
        Price(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}
