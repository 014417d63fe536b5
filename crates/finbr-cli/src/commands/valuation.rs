use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finbr_core::valuation::capm::{self, CapmInput};
use finbr_core::valuation::gordon::{self, GordonInput};

/// Arguments for the CAPM expected return
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CapmArgs {
    /// Risk-free rate (e.g. 0.105 for 10.5%)
    #[arg(long)]
    pub risk_free: Decimal,

    /// Expected market return
    #[arg(long)]
    pub market_return: Decimal,

    /// Beta of the asset
    #[arg(long, default_value = "1")]
    pub beta: Decimal,
}

/// Arguments for the Gordon growth model
#[derive(Args)]
pub struct GordonArgs {
    /// Dividend expected over the next period (D1)
    #[arg(long)]
    pub dividend: Decimal,

    /// Required rate of return (k)
    #[arg(long)]
    pub discount_rate: Decimal,

    /// Perpetual growth rate (g)
    #[arg(long, default_value = "0")]
    pub growth_rate: Decimal,
}

pub fn run_capm(args: CapmArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = CapmInput {
        risk_free_rate: args.risk_free,
        market_return: args.market_return,
        beta: args.beta,
    };

    let output = capm::calculate_capm(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_gordon(args: GordonArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = GordonInput {
        expected_dividend: args.dividend,
        discount_rate: args.discount_rate,
        growth_rate: args.growth_rate,
    };

    let output = gordon::calculate_gordon(&input)?;
    Ok(serde_json::to_value(output)?)
}
