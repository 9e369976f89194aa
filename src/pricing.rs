//! Prices
//!
//! Line price, order total and delivery-date derivation. All functions are
//! pure and give the same result when invoked again on the same inputs.

use jiff::{ToSpan, Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::{orders::PaymentMethod, properties::MONEY_SCALE};

/// Days allowed for delivering documents before per-line reductions.
pub const BASE_DELIVERY_DAYS: i64 = 30;

/// Days removed from the delivery estimate for each line.
pub const DAYS_PER_LINE: i64 = 2;

/// The delivery estimate never drops below this many days.
pub const MIN_DELIVERY_DAYS: i64 = 14;

/// Errors that can occur while deriving prices or dates.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Decimal arithmetic exceeded the representable range.
    #[error("price arithmetic overflowed")]
    Overflow,

    /// The derived delivery date is outside the supported calendar.
    #[error("delivery date out of range")]
    DateOutOfRange(#[source] jiff::Error),
}

/// Round to two fixed-point decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// `unit_price * quantity * (1 - discount_percent / 100)`, rounded to cents.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the product does not fit a decimal.
pub fn line_price(
    unit_price: Decimal,
    quantity: u32,
    discount_percent: Decimal,
) -> Result<Decimal, PricingError> {
    let multiplier = Decimal::ONE_HUNDRED
        .checked_sub(discount_percent)
        .and_then(|rest| rest.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::Overflow)?;

    let price = unit_price
        .checked_mul(Decimal::from(quantity))
        .and_then(|gross| gross.checked_mul(multiplier))
        .ok_or(PricingError::Overflow)?;

    Ok(round2(price))
}

/// Sum of line prices with the payment-method multiplier applied once.
///
/// Orders without a payment method are totalled at face value.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: the sum does not fit a decimal.
pub fn order_total<I>(
    line_prices: I,
    payment_method: Option<PaymentMethod>,
) -> Result<Decimal, PricingError>
where
    I: IntoIterator<Item = Decimal>,
{
    let subtotal = line_prices
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .ok_or(PricingError::Overflow)?;

    let multiplier = payment_method.map_or(Decimal::ONE, PaymentMethod::multiplier);

    subtotal
        .checked_mul(multiplier)
        .map(round2)
        .ok_or(PricingError::Overflow)
}

/// `30 - 2 * line_count`, never below 14.
///
/// The line count is not capped; the floor is the only guard against a
/// negative day count.
pub fn delivery_days(line_count: usize) -> i64 {
    let lines = i64::try_from(line_count).unwrap_or(i64::MAX);

    BASE_DELIVERY_DAYS
        .saturating_sub(lines.saturating_mul(DAYS_PER_LINE))
        .max(MIN_DELIVERY_DAYS)
}

/// Delivery date anchored to the completion timestamp's UTC date.
///
/// # Errors
///
/// - [`PricingError::DateOutOfRange`]: the date cannot be represented.
pub fn delivery_date(line_count: usize, completed_at: Timestamp) -> Result<Date, PricingError> {
    completed_at
        .to_zoned(TimeZone::UTC)
        .date()
        .checked_add(delivery_days(line_count).days())
        .map_err(PricingError::DateOutOfRange)
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn undiscounted_line_is_price_times_quantity() -> TestResult {
        let price = line_price(Decimal::new(8_500_000, 0), 1, Decimal::ZERO)?;

        assert_eq!(price, Decimal::new(8_500_000, 0));

        Ok(())
    }

    #[test]
    fn discount_is_applied_to_every_unit() -> TestResult {
        let price = line_price(Decimal::new(1_000, 0), 3, Decimal::new(10, 0))?;

        assert_eq!(price, Decimal::new(2_700, 0));

        Ok(())
    }

    #[test]
    fn line_price_rounds_to_cents() -> TestResult {
        // 33.33 * 1 * 0.875 = 29.16375
        let price = line_price(Decimal::new(3_333, 2), 1, Decimal::new(125, 1))?;

        assert_eq!(price, Decimal::new(2_916, 2));

        Ok(())
    }

    #[test]
    fn full_discount_is_free() -> TestResult {
        let price = line_price(Decimal::new(500, 0), 2, Decimal::ONE_HUNDRED)?;

        assert_eq!(price, Decimal::ZERO);

        Ok(())
    }

    #[test]
    fn mortgage_total_gets_two_percent_off() -> TestResult {
        let total = order_total(
            [Decimal::new(8_500_000, 0)],
            Some(PaymentMethod::Mortgage),
        )?;

        assert_eq!(total, Decimal::new(833_000_000, 2));

        Ok(())
    }

    #[test]
    fn payment_multipliers() -> TestResult {
        let lines = [Decimal::new(600, 0), Decimal::new(400, 0)];

        assert_eq!(
            order_total(lines, Some(PaymentMethod::Cash))?,
            Decimal::new(950, 0)
        );
        assert_eq!(
            order_total(lines, Some(PaymentMethod::Installment))?,
            Decimal::new(1_000, 0)
        );
        assert_eq!(order_total(lines, None)?, Decimal::new(1_000, 0));

        Ok(())
    }

    #[test]
    fn total_of_nothing_is_zero() -> TestResult {
        assert_eq!(
            order_total([], Some(PaymentMethod::Cash))?,
            Decimal::ZERO
        );

        Ok(())
    }

    #[test]
    fn delivery_days_shrink_per_line_down_to_floor() {
        assert_eq!(delivery_days(0), 30);
        assert_eq!(delivery_days(1), 28);
        assert_eq!(delivery_days(8), 14);
        assert_eq!(delivery_days(10), 14);
        assert_eq!(delivery_days(20), 14);
        assert_eq!(delivery_days(usize::MAX), 14);
    }

    #[test]
    fn delivery_date_counts_from_completion_day() -> TestResult {
        let completed_at: Timestamp = "2026-03-10T23:30:00Z".parse()?;

        assert_eq!(delivery_date(2, completed_at)?, date(2026, 4, 5));

        Ok(())
    }

    #[test]
    fn derivations_are_idempotent() -> TestResult {
        let completed_at: Timestamp = "2026-01-01T00:00:00Z".parse()?;

        assert_eq!(delivery_date(3, completed_at)?, delivery_date(3, completed_at)?);
        assert_eq!(
            line_price(Decimal::new(999, 2), 7, Decimal::new(5, 0))?,
            line_price(Decimal::new(999, 2), 7, Decimal::new(5, 0))?
        );

        Ok(())
    }
}
