use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use finbr_core::time_value::{annual_to_monthly_rate, monthly_to_annual_rate};

/// Period the input rate is quoted in.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RatePeriod {
    Monthly,
    Annual,
}

/// Arguments for effective-rate conversion
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ConvertRateArgs {
    /// Rate as a decimal (e.g. 0.01 for 1%)
    #[arg(long)]
    pub rate: Decimal,

    /// Period the rate is quoted in
    #[arg(long, value_enum, default_value = "monthly")]
    pub from: RatePeriod,
}

pub fn run_convert_rate(args: ConvertRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let value = match args.from {
        RatePeriod::Monthly => {
            let annual = monthly_to_annual_rate(args.rate)?;
            json!({
                "result": {
                    "monthly_rate": args.rate,
                    "annual_rate": annual,
                },
                "methodology": "Effective annual equivalent: (1 + monthly)^12 - 1",
            })
        }
        RatePeriod::Annual => {
            let monthly = annual_to_monthly_rate(args.rate)?;
            json!({
                "result": {
                    "annual_rate": args.rate,
                    "monthly_rate": monthly,
                },
                "methodology": "Effective monthly equivalent: (1 + annual)^(1/12) - 1",
            })
        }
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_trip_through_both_directions() {
        let monthly = ConvertRateArgs {
            rate: dec!(0.01),
            from: RatePeriod::Monthly,
        };
        let value = run_convert_rate(monthly).unwrap();
        let annual: Decimal = value["result"]["annual_rate"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();

        let back = run_convert_rate(ConvertRateArgs {
            rate: annual,
            from: RatePeriod::Annual,
        })
        .unwrap();
        let monthly_again: Decimal = back["result"]["monthly_rate"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();

        assert!((monthly_again - dec!(0.01)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_rate_floor_rejected() {
        let args = ConvertRateArgs {
            rate: dec!(-1),
            from: RatePeriod::Annual,
        };
        assert!(run_convert_rate(args).is_err());
    }
}
