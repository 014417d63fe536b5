use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinbrError;
use crate::time_value::{annual_to_monthly_rate, future_value};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinbrResult;

/// Input for the compound-interest projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestInput {
    pub initial_amount: Money,
    #[serde(default)]
    pub monthly_contribution: Money,
    /// Annual rate as a decimal.
    pub annual_rate: Rate,
    pub months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundInterestOutput {
    pub future_value: Money,
    pub total_contributed: Money,
    pub interest_earned: Money,
    pub monthly_rate: Rate,
}

/// Project an initial amount plus level monthly contributions.
pub fn calculate_compound_interest(
    input: &CompoundInterestInput,
) -> FinbrResult<ComputationOutput<CompoundInterestOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    if input.initial_amount < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "initial_amount".into(),
            reason: "Initial amount cannot be negative".into(),
        });
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "monthly_contribution".into(),
            reason: "Contribution cannot be negative".into(),
        });
    }

    let monthly_rate = annual_to_monthly_rate(input.annual_rate)?;
    let fv = future_value(
        input.initial_amount,
        input.monthly_contribution,
        monthly_rate,
        input.months,
    )?;
    let total_contributed =
        input.initial_amount + input.monthly_contribution * Decimal::from(input.months);

    let result = CompoundInterestOutput {
        future_value: fv,
        total_contributed,
        interest_earned: fv - total_contributed,
        monthly_rate,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Future value of an initial amount plus level monthly contributions",
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

    #[test]
    fn test_zero_rate_accumulates_contributions_only() {
        let input = CompoundInterestInput {
            initial_amount: dec!(1000),
            monthly_contribution: dec!(100),
            annual_rate: dec!(0),
            months: 24,
        };
        let output = calculate_compound_interest(&input).unwrap();
        let r = &output.result;

        assert_eq!(r.future_value, dec!(3400));
        assert_eq!(r.interest_earned, dec!(0));
    }

    #[test]
    fn test_interest_is_fv_minus_contributions() {
        let input = CompoundInterestInput {
            initial_amount: dec!(10000),
            monthly_contribution: dec!(500),
            annual_rate: dec!(0.12),
            months: 120,
        };
        let output = calculate_compound_interest(&input).unwrap();
        let r = &output.result;

        assert_eq!(r.total_contributed, dec!(70000));
        assert_eq!(r.interest_earned, r.future_value - dec!(70000));
        assert!(r.interest_earned > dec!(0));
    }

    #[test]
    fn test_zero_months_returns_initial() {
        let input = CompoundInterestInput {
            initial_amount: dec!(5000),
            monthly_contribution: dec!(300),
            annual_rate: dec!(0.10),
            months: 0,
        };
        let output = calculate_compound_interest(&input).unwrap();
        assert_eq!(output.result.future_value, dec!(5000));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let input = CompoundInterestInput {
            initial_amount: dec!(-1),
            monthly_contribution: dec!(0),
            annual_rate: dec!(0.10),
            months: 12,
        };
        assert!(calculate_compound_interest(&input).is_err());
    }
}
