use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::FinbrError;
use crate::types::{Money, Rate};
use crate::FinbrResult;

/// Periodic rates below this magnitude are treated as zero to avoid
/// dividing by a vanishing annuity factor.
pub(crate) const ZERO_RATE_THRESHOLD: Decimal = dec!(0.000000001);

const MONTHS_PER_YEAR: Decimal = dec!(12);

fn ensure_rate_above_floor(field: &str, rate: Rate) -> FinbrResult<()> {
    if rate <= dec!(-1) {
        return Err(FinbrError::InvalidInput {
            field: field.into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }
    Ok(())
}

/// Effective monthly rate equivalent to a compounded annual rate:
/// (1 + annual)^(1/12) - 1.
pub fn annual_to_monthly_rate(annual: Rate) -> FinbrResult<Rate> {
    ensure_rate_above_floor("annual_rate", annual)?;
    Ok((Decimal::ONE + annual).powd(Decimal::ONE / MONTHS_PER_YEAR) - Decimal::ONE)
}

/// Effective annual rate equivalent to a compounded monthly rate:
/// (1 + monthly)^12 - 1.
pub fn monthly_to_annual_rate(monthly: Rate) -> FinbrResult<Rate> {
    ensure_rate_above_floor("monthly_rate", monthly)?;
    Ok((Decimal::ONE + monthly).powd(MONTHS_PER_YEAR) - Decimal::ONE)
}

/// Inflation-deflated (real) rate via the Fisher relation:
/// (1 + nominal) / (1 + inflation) - 1.
pub fn real_rate(nominal: Rate, inflation: Rate) -> FinbrResult<Rate> {
    ensure_rate_above_floor("nominal_rate", nominal)?;
    ensure_rate_above_floor("inflation_rate", inflation)?;
    Ok((Decimal::ONE + nominal) / (Decimal::ONE + inflation) - Decimal::ONE)
}

/// Constant installment of a fully amortizing loan (French / PRICE system):
/// PV * i(1+i)^n / ((1+i)^n - 1).
///
/// `periods == 0` yields a zero installment (degenerate loan, not an error);
/// a vanishing rate collapses to straight-line PV / n.
pub fn payment(present_value: Money, rate: Rate, periods: u32) -> FinbrResult<Money> {
    ensure_rate_above_floor("rate", rate)?;

    if periods == 0 {
        return Ok(Decimal::ZERO);
    }

    let n = Decimal::from(periods);
    if rate.abs() < ZERO_RATE_THRESHOLD {
        return Ok(present_value / n);
    }

    let factor = (Decimal::ONE + rate).powd(n);
    let annuity = factor - Decimal::ONE;
    if annuity.is_zero() {
        return Err(FinbrError::DivisionByZero {
            context: "payment annuity factor".into(),
        });
    }

    Ok(present_value * rate * factor / annuity)
}

/// Future value of a present amount plus a level periodic contribution.
pub fn future_value(
    present_value: Money,
    contribution: Money,
    rate: Rate,
    periods: u32,
) -> FinbrResult<Money> {
    ensure_rate_above_floor("rate", rate)?;

    let n = Decimal::from(periods);
    if rate.abs() < ZERO_RATE_THRESHOLD {
        return Ok(present_value + contribution * n);
    }

    let factor = (Decimal::ONE + rate).powd(n);
    Ok(present_value * factor + contribution * ((factor - Decimal::ONE) / rate))
}

/// Net Present Value of a series of cash flows, index 0 undiscounted.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> FinbrResult<Money> {
    ensure_rate_above_floor("rate", rate)?;

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        if discount.is_zero() {
            return Err(FinbrError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result += cf / discount;
    }

    Ok(result)
}
