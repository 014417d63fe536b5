use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Rate};
use crate::FinbrResult;

/// Input for the Capital Asset Pricing Model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapmInput {
    /// Risk-free rate (e.g. government bond yield).
    pub risk_free_rate: Rate,
    /// Expected market return.
    pub market_return: Rate,
    /// Systematic-risk sensitivity of the asset.
    pub beta: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapmOutput {
    /// Expected return: Rf + beta * (Rm - Rf).
    pub expected_return: Rate,
    pub market_risk_premium: Rate,
    pub asset_risk_premium: Rate,
}

/// Expected return of an asset under CAPM.
pub fn calculate_capm(input: &CapmInput) -> FinbrResult<ComputationOutput<CapmOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let market_risk_premium = input.market_return - input.risk_free_rate;
    let asset_risk_premium = input.beta * market_risk_premium;
    let expected_return = input.risk_free_rate + asset_risk_premium;

    if input.beta < Decimal::ZERO {
        warnings.push(format!(
            "Negative beta ({}): the asset moves against the market; verify the estimate",
            input.beta
        ));
    }
    if market_risk_premium < Decimal::ZERO {
        warnings.push(
            "Market return below the risk-free rate; the risk premium is negative".to_string(),
        );
    }
    if input.beta > dec!(3.0) {
        warnings.push(format!(
            "High beta ({}): betas above 3.0 are unusual; verify market data",
            input.beta
        ));
    }

    let result = CapmOutput {
        expected_return,
        market_risk_premium,
        asset_risk_premium,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Expected return via CAPM",
        input,
        warnings,
        elapsed,
        result,
    ))
}
