//! [`Money`]-related definitions.

use std::{fmt, ops, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Suffix of the currency the salon is operating in (Danish kroner).
const CURRENCY_SUFFIX: &str = "kr";

/// Amount of money in Danish kroner.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Zero amount of [`Money`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a new [`Money`] out of the provided `amount`.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates a new [`Money`] out of a whole number of kroner.
    #[must_use]
    pub fn kroner(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Returns the decimal amount of this [`Money`].
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Saturates at the largest representable amount instead of overflowing.
impl ops::Mul<i64> for Money {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {CURRENCY_SUFFIX}", self.0.normalize())
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let amount = s.strip_suffix(CURRENCY_SUFFIX).unwrap_or(s).trim_end();
        if amount.is_empty() {
            return Err("empty amount");
        }
        Decimal::from_str(amount)
            .map(Self)
            .map_err(|_| "invalid amount")
    }
}
