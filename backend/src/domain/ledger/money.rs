//! Peso amounts and item quantities.

use std::fmt;
use std::ops::Add;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Serialize, Serializer};

const CENTAVO_SCALE: u32 = 2;

/// Reasons a raw amount cannot become [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("must be a decimal number (got {value:?})")]
    Malformed { value: String },
    #[error("must not be negative (got {value})")]
    Negative { value: String },
    #[error("must have at most two decimal places (got {value})")]
    TooPrecise { value: String },
    #[error("is too large to store")]
    OutOfRange,
}

/// Non-negative amount with centavo precision.
///
/// Persisted as integer centavos; displayed and serialised with exactly two
/// decimal places.
///
/// # Examples
/// ```
/// use utang::domain::Money;
///
/// let cost = Money::parse("250").unwrap();
/// assert_eq!(cost.to_string(), "250.00");
/// assert_eq!(cost.to_centavos().unwrap(), 25_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(Decimal);

impl Money {
    /// Zero pesos.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Parse a caller-supplied decimal string.
    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let trimmed = raw.trim();
        let value = Decimal::from_str(trimmed).map_err(|_| MoneyError::Malformed {
            value: trimmed.to_owned(),
        })?;
        if value < Decimal::ZERO {
            return Err(MoneyError::Negative {
                value: trimmed.to_owned(),
            });
        }
        if value.normalize().scale() > CENTAVO_SCALE {
            return Err(MoneyError::TooPrecise {
                value: trimmed.to_owned(),
            });
        }
        let value = value.round_dp(CENTAVO_SCALE);
        if centavos_of(value).is_none() {
            return Err(MoneyError::OutOfRange);
        }
        Ok(Self(value))
    }

    /// Rebuild an amount from stored centavos.
    pub fn from_centavos(centavos: i64) -> Result<Self, MoneyError> {
        if centavos < 0 {
            return Err(MoneyError::Negative {
                value: centavos.to_string(),
            });
        }
        Ok(Self(Decimal::new(centavos, CENTAVO_SCALE)))
    }

    /// Amount in centavos for storage.
    ///
    /// Always succeeds for parsed or stored amounts; only sums can leave the
    /// `i64` centavo range.
    pub fn to_centavos(self) -> Result<i64, MoneyError> {
        centavos_of(self.0).ok_or(MoneyError::OutOfRange)
    }

    /// Underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

fn centavos_of(value: Decimal) -> Option<i64> {
    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|centavos| centavos.trunc().to_i64())
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Number of units bought on credit; at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(i32);

impl Quantity {
    /// A single unit, used when the caller omits the quantity.
    pub const ONE: Self = Self(1);

    /// Validate a stored or computed quantity.
    pub fn new(value: i32) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    /// Parse a caller-supplied quantity.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<i32>().ok().and_then(Self::new)
    }

    /// Raw count.
    pub fn get(self) -> i32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
