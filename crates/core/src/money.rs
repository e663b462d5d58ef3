//! Money
//!
//! Amounts are whole Vietnamese đồng. VND carries no fractional subunit, so
//! an amount is a plain integer and rounding always lands on a whole đồng.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use thiserror::Error;

/// A money amount in whole VND.
pub type Amount = i64;

/// Errors raised by money arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// A decimal result overflowed or was not representable as whole VND.
    #[error("amount overflowed or was not representable in whole VND")]
    Conversion,
}

/// Round a decimal amount to the nearest whole đồng, midpoints away from zero.
///
/// This is the single rounding primitive used by VAT and rescale arithmetic.
/// Each derived value is rounded exactly once; aggregation never rounds again.
///
/// # Errors
///
/// Returns [`MoneyError::Conversion`] if the rounded value does not fit an
/// [`Amount`].
pub fn round_half_up(value: Decimal) -> Result<Amount, MoneyError> {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(MoneyError::Conversion)
}

/// Extract the VAT portion embedded in a gross total: `round(total * 10 / 110)`.
///
/// Server-priced lines arrive VAT-inclusive; this recovers the tax portion at
/// the fixed 10% rate.
///
/// # Errors
///
/// Returns [`MoneyError::Conversion`] on decimal overflow.
pub fn embedded_vat(total: Amount) -> Result<Amount, MoneyError> {
    let vat = Decimal::from(total)
        .checked_mul(Decimal::TEN)
        .and_then(|value| value.checked_div(Decimal::from(110)))
        .ok_or(MoneyError::Conversion)?;

    round_half_up(vat)
}

/// VAT charged on a net amount: `round(net * 0.10)`.
///
/// # Errors
///
/// Returns [`MoneyError::Conversion`] on decimal overflow.
pub fn vat_on(net: Decimal) -> Result<Amount, MoneyError> {
    let vat = net
        .checked_mul(Decimal::new(1, 1))
        .ok_or(MoneyError::Conversion)?;

    round_half_up(vat)
}

/// Format an amount for display, e.g. `₫1.320.000`.
#[must_use]
pub fn format_vnd(amount: Amount) -> String {
    Money::from_minor(amount, iso::VND).to_string()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn embedded_vat_splits_gross_total() -> TestResult {
        assert_eq!(embedded_vat(110)?, 10);
        assert_eq!(embedded_vat(1_320_000)?, 120_000);
        assert_eq!(embedded_vat(0)?, 0);

        Ok(())
    }

    #[test]
    fn embedded_vat_rounds_to_nearest_dong() -> TestResult {
        // 115 * 10 / 110 = 10.4545... -> 10
        assert_eq!(embedded_vat(115)?, 10);
        // 121 * 10 / 110 = 11.0 exactly
        assert_eq!(embedded_vat(121)?, 11);

        Ok(())
    }

    #[test]
    fn vat_on_net_amount() -> TestResult {
        assert_eq!(vat_on(Decimal::from(90_000))?, 9_000);
        assert_eq!(vat_on(Decimal::from(1_200_000))?, 120_000);

        Ok(())
    }

    #[test]
    fn round_half_up_midpoint_goes_away_from_zero() -> TestResult {
        assert_eq!(round_half_up(Decimal::new(5, 1))?, 1);
        assert_eq!(round_half_up(Decimal::new(-5, 1))?, -1);
        assert_eq!(round_half_up(Decimal::new(49, 2))?, 0);

        Ok(())
    }

    #[test]
    fn format_vnd_includes_amount() {
        let formatted = format_vnd(1_320_000);

        assert!(formatted.contains("320"), "unexpected format: {formatted}");
    }
}
