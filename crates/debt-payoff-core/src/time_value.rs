use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::DebtPayoffError;
use crate::types::{Money, Percent};
use crate::DebtPayoffResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Round a monetary amount to whole cents, half away from zero.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Interest accrued on `balance` over one month at an APR percentage,
/// rounded to the cent.
pub fn monthly_interest(balance: Money, annual_percent: Percent) -> DebtPayoffResult<Money> {
    if balance <= Decimal::ZERO || annual_percent.is_zero() {
        return Ok(Decimal::ZERO);
    }
    // Multiply before dividing so exact half-cent amounts stay exact.
    let scaled = balance
        .checked_mul(annual_percent)
        .ok_or_else(|| DebtPayoffError::InvalidInput {
            field: "interest_rate".into(),
            reason: format!(
                "interest on a balance of {balance} at {annual_percent}% is out of range"
            ),
        })?;
    Ok(round_cents(scaled / (PERCENT * MONTHS_PER_YEAR)))
}

/// Calendar date `months` after `start`, clamped to the end of shorter months.
pub fn add_months(start: NaiveDate, months: u32) -> DebtPayoffResult<NaiveDate> {
    start
        .checked_add_months(Months::new(months))
        .ok_or_else(|| DebtPayoffError::DateError(format!("{start} + {months} months overflows")))
}
