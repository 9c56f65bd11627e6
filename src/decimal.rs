use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Money type with 2 decimal places, rounded half-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    pub const ONE: Money = Money(Decimal::ONE);
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, 2));

    fn normalize(d: Decimal) -> Decimal {
        d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(Self::normalize(d))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Self::normalize(Decimal::from_str(s)?)))
    }

    /// create from integer amount (dollars, euros, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// create from minor units (cents)
    pub fn from_minor(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// check if negative
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// absolute value
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(Self::normalize(self.0 + other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = Self::normalize(self.0 + other.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(Self::normalize(self.0 - other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        self.0 = Self::normalize(self.0 - other.0);
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, other: Decimal) -> Money {
        Money(Self::normalize(self.0 * other))
    }
}

impl Div<Decimal> for Money {
    type Output = Money;

    fn div(self, other: Decimal) -> Money {
        Money(Self::normalize(self.0 / other))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// rate type for interest rates, commission rates, and ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: Decimal) -> Self {
        Rate(p / Decimal::from(100))
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10000))
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// get as basis points
    pub fn as_bps(&self) -> Decimal {
        self.0 * Decimal::from(10000)
    }

    /// monthly rate from annual rate
    pub fn monthly_rate(&self) -> Rate {
        Rate(self.0 / Decimal::from(12))
    }

    /// per-payment rate for a given number of payments per year
    pub fn periodic(&self, payments_per_year: u32) -> Rate {
        Rate(self.0 / Decimal::from(payments_per_year))
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}
