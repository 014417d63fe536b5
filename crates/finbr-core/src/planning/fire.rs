use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinbrError;
use crate::time_value::{annual_to_monthly_rate, ZERO_RATE_THRESHOLD};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinbrResult;

/// Input for the financial-independence (FIRE) horizon calculation.
/// Rates and amounts are real (inflation already netted out).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireInput {
    pub current_patrimony: Money,
    pub monthly_contribution: Money,
    /// Passive income wanted per month once independent.
    pub desired_monthly_income: Money,
    /// Real annual return on investments.
    pub real_annual_rate: Rate,
}

/// Time until passive income covers the desired spending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireOutput {
    /// Patrimony whose monthly yield equals the desired income.
    pub target_patrimony: Money,
    pub real_monthly_rate: Rate,
    /// Exact horizon from the closed form, in months.
    pub months_to_target: Decimal,
    /// Horizon split for display: whole years plus leftover months.
    pub years_part: u32,
    pub months_part: u32,
}

/// Months until patrimony reaches the point where its yield alone pays the
/// desired income: n = ln((PMT + i·target) / (PMT + i·PV)) / ln(1 + i).
///
/// Feasibility is settled analytically before the logarithms run, so each
/// impossible configuration gets its own diagnosis instead of a NaN.
pub fn calculate_fire(input: &FireInput) -> FinbrResult<ComputationOutput<FireOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    if input.desired_monthly_income <= Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "desired_monthly_income".into(),
            reason: "Desired passive income must be positive".into(),
        });
    }
    if input.current_patrimony < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "current_patrimony".into(),
            reason: "Patrimony cannot be negative".into(),
        });
    }

    let i = annual_to_monthly_rate(input.real_annual_rate)?;

    if i < ZERO_RATE_THRESHOLD {
        // Without a positive real yield no finite patrimony sustains a
        // perpetual withdrawal; the target is unbounded.
        return Err(FinbrError::FinancialImpossibility(
            "A zero or negative real return cannot sustain passive income; \
             the target patrimony is unbounded"
                .to_string(),
        ));
    }

    let target_patrimony = input.desired_monthly_income / i;

    if input.current_patrimony >= target_patrimony {
        return Err(FinbrError::FinancialImpossibility(
            "Target patrimony is already reached; passive income already covers \
             the desired spending"
                .to_string(),
        ));
    }

    // Contribution below the passive-income drain implied by the target:
    // accumulation stalls before the yield can take over.
    if input.monthly_contribution <= input.desired_monthly_income * i {
        return Err(FinbrError::FinancialImpossibility(
            "Monthly contribution does not exceed the passive-income drain implied \
             by the target; independence is unreachable at this pace"
                .to_string(),
        ));
    }

    let numerator = input.monthly_contribution + i * target_patrimony;
    let denominator = input.monthly_contribution + i * input.current_patrimony;
    // Both are positive here: contribution > 0 and patrimony >= 0.
    let months_to_target = (numerator.ln() - denominator.ln()) / (Decimal::ONE + i).ln();

    let mut years_part = months_to_target.floor().to_u32().unwrap_or(0) / 12;
    let mut months_part = (months_to_target - Decimal::from(years_part) * dec!(12))
        .round()
        .to_u32()
        .unwrap_or(0);
    if months_part == 12 {
        years_part += 1;
        months_part = 0;
    }

    let result = FireOutput {
        target_patrimony,
        real_monthly_rate: i,
        months_to_target,
        years_part,
        months_part,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "FIRE horizon via closed-form accumulation to the yield-sustained target",
        input,
        warnings,
        elapsed,
        result,
    ))
}
