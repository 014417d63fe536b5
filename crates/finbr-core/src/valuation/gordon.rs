use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinbrError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinbrResult;

/// Input for the Gordon constant-growth dividend model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GordonInput {
    /// Dividend expected over the next period (D1).
    pub expected_dividend: Money,
    /// Required rate of return (k).
    pub discount_rate: Rate,
    /// Perpetual dividend growth rate (g).
    pub growth_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GordonOutput {
    /// Fair value per share: D1 / (k - g).
    pub fair_value: Money,
    pub spread: Rate,
}

/// Fair value of a perpetually growing dividend stream.
///
/// The model only converges for k > g; anything else is reported as an
/// impossibility rather than a negative or infinite price.
pub fn calculate_gordon(input: &GordonInput) -> FinbrResult<ComputationOutput<GordonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.expected_dividend < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "expected_dividend".into(),
            reason: "Expected dividend cannot be negative".into(),
        });
    }
    if input.discount_rate <= input.growth_rate {
        return Err(FinbrError::FinancialImpossibility(
            "Discount rate must exceed the growth rate for the perpetuity to converge"
                .to_string(),
        ));
    }

    let spread = input.discount_rate - input.growth_rate;
    let fair_value = input.expected_dividend / spread;

    if input.expected_dividend.is_zero() {
        warnings.push("Zero expected dividend prices the stream at zero".to_string());
    }

    let result = GordonOutput { fair_value, spread };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fair value via Gordon constant-growth perpetuity",
        input,
        warnings,
        elapsed,
        result,
    ))
}
