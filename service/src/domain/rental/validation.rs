//! Validation rules of a [`Rental`].

use common::{Date, Money};
use derive_more::{Display, Error};

use super::{Kind, PRICE_LIMIT};
#[cfg(doc)]
use super::Rental;

/// Checks that the `price` is not below the minimum of the provided [`Kind`]
/// and stays below the [`PRICE_LIMIT`].
///
/// # Errors
///
/// With a [`ValidationError`] naming the violated bound.
pub fn validate_price(kind: Kind, price: Money) -> Result<(), ValidationError> {
    if price >= Money::kroner(PRICE_LIMIT) {
        return Err(ValidationError::PriceTooHigh(price));
    }
    if price >= kind.minimum_price() {
        return Ok(());
    }
    Err(match kind {
        Kind::Daily => ValidationError::DailyPriceTooLow(price),
        Kind::Monthly => ValidationError::MonthlyPriceTooLow(price),
    })
}

/// Checks that the `total` price of a [`Rental`] stays below the
/// [`PRICE_LIMIT`].
///
/// # Errors
///
/// With a [`ValidationError::TotalPriceTooHigh`] otherwise.
pub fn validate_total_price(total: Money) -> Result<(), ValidationError> {
    if total < Money::kroner(PRICE_LIMIT) {
        Ok(())
    } else {
        Err(ValidationError::TotalPriceTooHigh(total))
    }
}

/// Checks that the period of the provided [`Kind`] doesn't end before it
/// starts.
///
/// Only [`Kind::Monthly`] periods are checked, as a [`Kind::Daily`] one always
/// starts and ends on the same day.
///
/// # Errors
///
/// With a [`ValidationError::EndBeforeStart`] if the `end` comes before the
/// `start`.
pub fn validate_date_order(
    kind: Kind,
    start: Date,
    end: Date,
) -> Result<(), ValidationError> {
    match kind {
        Kind::Daily => Ok(()),
        Kind::Monthly if end < start => Err(ValidationError::EndBeforeStart),
        Kind::Monthly => Ok(()),
    }
}

/// Violated [`Rental`] rule.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ValidationError {
    /// Price of a [`Kind::Daily`] [`Rental`] is below the minimum.
    #[display("Minimum price for a daily rental is 100 kr")]
    DailyPriceTooLow(#[error(not(source))] Money),

    /// Price of a [`Kind::Monthly`] [`Rental`] is below the minimum.
    #[display("Minimum price for a monthly rental is 2000 kr")]
    MonthlyPriceTooLow(#[error(not(source))] Money),

    /// Price exceeds the [`PRICE_LIMIT`].
    #[display("Price of a rental must be below 10000000000 kr")]
    PriceTooHigh(#[error(not(source))] Money),

    /// Total price exceeds the [`PRICE_LIMIT`].
    #[display("Total price of a rental must be below 10000000000 kr")]
    TotalPriceTooHigh(#[error(not(source))] Money),

    /// Period ends before it starts.
    #[display("Start date must be before end date")]
    EndBeforeStart,
}

#[cfg(test)]
mod spec {
    use common::{Date, Money};

    use super::{
        validate_date_order, validate_price, validate_total_price, Kind,
        ValidationError, PRICE_LIMIT,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn daily_price_floor() {
        assert_eq!(
            validate_price(Kind::Daily, Money::kroner(99)),
            Err(ValidationError::DailyPriceTooLow(Money::kroner(99))),
        );
        assert_eq!(validate_price(Kind::Daily, Money::kroner(100)), Ok(()));
        assert_eq!(
            validate_price(Kind::Daily, "99.99".parse().unwrap()).map_err(
                |e| e.to_string(),
            ),
            Err("Minimum price for a daily rental is 100 kr".into()),
        );
    }

    #[test]
    fn monthly_price_floor() {
        assert_eq!(
            validate_price(Kind::Monthly, Money::kroner(1999)),
            Err(ValidationError::MonthlyPriceTooLow(Money::kroner(1999))),
        );
        assert_eq!(validate_price(Kind::Monthly, Money::kroner(2000)), Ok(()));
        assert_eq!(
            ValidationError::MonthlyPriceTooLow(Money::ZERO).to_string(),
            "Minimum price for a monthly rental is 2000 kr",
        );
    }

    #[test]
    fn price_ceiling() {
        let huge: Money = "79228162514264337593543950335".parse().unwrap();
        assert_eq!(
            validate_price(Kind::Monthly, huge),
            Err(ValidationError::PriceTooHigh(huge)),
        );
        assert_eq!(
            validate_price(Kind::Daily, Money::kroner(PRICE_LIMIT)),
            Err(ValidationError::PriceTooHigh(Money::kroner(PRICE_LIMIT))),
        );
        assert_eq!(
            validate_price(Kind::Daily, "9999999999.99".parse().unwrap()),
            Ok(()),
        );
        assert_eq!(
            ValidationError::PriceTooHigh(huge).to_string(),
            "Price of a rental must be below 10000000000 kr",
        );
    }

    #[test]
    fn total_price_ceiling() {
        assert_eq!(validate_total_price(Money::kroner(24_000)), Ok(()));
        assert_eq!(
            validate_total_price(Money::kroner(PRICE_LIMIT) * 3),
            Err(ValidationError::TotalPriceTooHigh(
                Money::kroner(PRICE_LIMIT) * 3,
            )),
        );
    }

    #[test]
    fn monthly_period_must_not_end_before_start() {
        assert_eq!(
            validate_date_order(
                Kind::Monthly,
                date("2023-02-01"),
                date("2023-01-31"),
            ),
            Err(ValidationError::EndBeforeStart),
        );
        assert_eq!(
            validate_date_order(
                Kind::Monthly,
                date("2023-02-01"),
                date("2023-02-01"),
            ),
            Ok(()),
        );
        assert_eq!(
            ValidationError::EndBeforeStart.to_string(),
            "Start date must be before end date",
        );
    }

    #[test]
    fn daily_period_is_not_checked() {
        assert_eq!(
            validate_date_order(
                Kind::Daily,
                date("2023-02-01"),
                date("2023-01-01"),
            ),
            Ok(()),
        );
    }
}
