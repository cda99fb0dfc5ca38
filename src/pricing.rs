//! Pricing

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors that can occur while presenting an amount as money.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The amount has no representation in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    AmountNotRepresentable(Decimal),
}

/// Converts a decimal amount in major units to minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::AmountNotRepresentable`] if the amount overflows an `i64` of minor units.
pub fn minor_units(amount: Decimal) -> Result<i64, PricingError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .ok_or(PricingError::AmountNotRepresentable(amount))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::AmountNotRepresentable(amount))
}

/// Presents a decimal amount as money in the given currency.
///
/// # Errors
///
/// Returns [`PricingError::AmountNotRepresentable`] if the amount overflows an `i64` of minor units.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    Ok(Money::from_minor(minor_units(amount)?, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn minor_units_rounds_half_away_from_zero() -> TestResult {
        assert_eq!(minor_units(Decimal::new(6200, 3))?, 620);
        assert_eq!(minor_units(Decimal::new(12345, 4))?, 123);
        assert_eq!(minor_units(Decimal::new(1235, 3))?, 124);
        assert_eq!(minor_units(Decimal::new(-1235, 3))?, -124);

        Ok(())
    }

    #[test]
    fn minor_units_overflow_returns_error() {
        let result = minor_units(Decimal::MAX);

        assert_eq!(result, Err(PricingError::AmountNotRepresentable(Decimal::MAX)));
    }

    #[test]
    fn to_money_uses_currency() -> TestResult {
        let money = to_money(Decimal::new(1240, 2), EUR)?;

        assert_eq!(money, Money::from_minor(1240, EUR));
        assert_eq!(money.currency(), EUR);

        Ok(())
    }
}
