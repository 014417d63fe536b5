use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinbrError;
use crate::time_value::{annual_to_monthly_rate, future_value, real_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinbrResult;

/// Reference withdrawal rule (the classic "4% rule"), % per year.
const REFERENCE_WITHDRAWAL_PCT: Decimal = dec!(4);

/// Input for the retirement projection. Monetary values in today's money.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_patrimony: Money,
    pub monthly_contribution: Money,
    /// Income wanted per month after retiring, in today's money.
    pub desired_monthly_income: Money,
    /// Nominal annual return on investments.
    pub annual_return: Rate,
    pub annual_inflation: Rate,
    /// Withdrawal rule in percent per year, strictly inside (0, 100).
    pub withdrawal_rate_pct: Decimal,
}

/// Retirement projection in real (inflation-deflated) terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementOutput {
    pub years_to_retirement: u32,
    pub months_of_contribution: u32,
    pub nominal_monthly_rate: Rate,
    pub real_monthly_rate: Rate,
    /// Patrimony projected at retirement, in today's money.
    pub projected_patrimony: Money,
    /// Capital required under the 4% reference rule.
    pub required_capital_4pct: Money,
    /// Capital required under the user's withdrawal rule.
    pub required_capital: Money,
    /// Projected minus required; negative means short of the goal.
    pub gap: Money,
}

/// Capital needed so that `rule_pct`% of it per year pays the income.
fn required_capital(monthly_income: Money, rule_pct: Decimal) -> Money {
    monthly_income * dec!(12) / (rule_pct / dec!(100))
}

fn validate_retirement_input(input: &RetirementInput) -> FinbrResult<()> {
    if input.retirement_age <= input.current_age {
        return Err(FinbrError::InvalidInput {
            field: "retirement_age".into(),
            reason: "Retirement age must be greater than the current age".into(),
        });
    }
    if input.withdrawal_rate_pct <= Decimal::ZERO || input.withdrawal_rate_pct >= dec!(100) {
        return Err(FinbrError::InvalidInput {
            field: "withdrawal_rate_pct".into(),
            reason: "Withdrawal rule must be strictly between 0 and 100% per year".into(),
        });
    }
    if input.current_patrimony < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "current_patrimony".into(),
            reason: "Patrimony cannot be negative".into(),
        });
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "monthly_contribution".into(),
            reason: "Contribution cannot be negative".into(),
        });
    }
    if input.desired_monthly_income < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "desired_monthly_income".into(),
            reason: "Desired income cannot be negative".into(),
        });
    }
    Ok(())
}

/// Project patrimony at retirement and compare it against the capital the
/// chosen withdrawal rule requires. All projection happens at the real
/// (inflation-deflated) rate so results read in today's money.
pub fn calculate_retirement(
    input: &RetirementInput,
) -> FinbrResult<ComputationOutput<RetirementOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_retirement_input(input)?;

    let years = input.retirement_age - input.current_age;
    let months = years * 12;

    let nominal_monthly_rate = annual_to_monthly_rate(input.annual_return)?;
    let real_annual = real_rate(input.annual_return, input.annual_inflation)?;
    let real_monthly_rate = annual_to_monthly_rate(real_annual)?;

    if real_monthly_rate < Decimal::ZERO {
        warnings.push(
            "Expected return is below inflation; patrimony shrinks in real terms".to_string(),
        );
    }

    let projected_patrimony = future_value(
        input.current_patrimony,
        input.monthly_contribution,
        real_monthly_rate,
        months,
    )?;

    let required_capital_4pct =
        required_capital(input.desired_monthly_income, REFERENCE_WITHDRAWAL_PCT);
    let required = required_capital(input.desired_monthly_income, input.withdrawal_rate_pct);
    let gap = projected_patrimony - required;

    if gap < Decimal::ZERO {
        warnings.push(
            "Projected patrimony falls short of the withdrawal rule's requirement".to_string(),
        );
    }

    let result = RetirementOutput {
        years_to_retirement: years,
        months_of_contribution: months,
        nominal_monthly_rate,
        real_monthly_rate,
        projected_patrimony,
        required_capital_4pct,
        required_capital: required,
        gap,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Retirement projection at the real rate against withdrawal-rule capital",
        input,
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_input() -> RetirementInput {
        RetirementInput {
            current_age: 30,
            retirement_age: 65,
            current_patrimony: dec!(50000),
            monthly_contribution: dec!(1000),
            desired_monthly_income: dec!(8000),
            annual_return: dec!(0.10),
            annual_inflation: dec!(0.04),
            withdrawal_rate_pct: dec!(4),
        }
    }

    #[test]
    fn test_required_capital_four_percent_rule() {
        // 8_000/month needs 8_000 * 12 / 0.04 = 2_400_000.
        let output = calculate_retirement(&base_input()).unwrap();
        assert_eq!(output.result.required_capital_4pct, dec!(2400000));
        assert_eq!(output.result.required_capital, dec!(2400000));
    }

    #[test]
    fn test_horizon_in_months() {
        let output = calculate_retirement(&base_input()).unwrap();
        assert_eq!(output.result.years_to_retirement, 35);
        assert_eq!(output.result.months_of_contribution, 420);
    }

    #[test]
    fn test_gap_is_projected_minus_required() {
        let output = calculate_retirement(&base_input()).unwrap();
        let r = &output.result;
        assert_eq!(r.gap, r.projected_patrimony - r.required_capital);
    }

    #[test]
    fn test_retirement_age_must_exceed_current() {
        let mut input = base_input();
        input.retirement_age = 30;
        assert!(calculate_retirement(&input).is_err());
    }

    #[test]
    fn test_withdrawal_rule_bounds() {
        for pct in [dec!(0), dec!(100), dec!(-1)] {
            let mut input = base_input();
            input.withdrawal_rate_pct = pct;
            assert!(calculate_retirement(&input).is_err());
        }
    }

    #[test]
    fn test_below_inflation_return_warns() {
        let mut input = base_input();
        input.annual_return = dec!(0.02);
        let output = calculate_retirement(&input).unwrap();
        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("below inflation")));
    }

    #[test]
    fn test_real_projection_uses_deflated_rate() {
        let output = calculate_retirement(&base_input()).unwrap();
        let r = &output.result;
        assert!(r.real_monthly_rate < r.nominal_monthly_rate);
        // 10% against 4% inflation keeps a positive real rate.
        assert!(r.real_monthly_rate > dec!(0));
    }
}
