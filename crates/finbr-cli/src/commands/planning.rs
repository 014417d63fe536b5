use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finbr_core::planning::compound::{self, CompoundInterestInput};
use finbr_core::planning::fire::{self, FireInput};
use finbr_core::planning::retirement::{self, RetirementInput};

/// Arguments for the retirement projection
#[derive(Args)]
pub struct RetirementArgs {
    #[arg(long)]
    pub current_age: u32,

    #[arg(long)]
    pub retirement_age: u32,

    /// Patrimony already accumulated
    #[arg(long, default_value = "0")]
    pub patrimony: Decimal,

    /// Contribution per month until retirement
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Income wanted per month after retiring, in today's money
    #[arg(long)]
    pub income: Decimal,

    /// Nominal annual return (e.g. 0.10 for 10%)
    #[arg(long)]
    pub annual_return: Decimal,

    /// Annual inflation (e.g. 0.04 for 4%)
    #[arg(long, default_value = "0")]
    pub inflation: Decimal,

    /// Withdrawal rule in percent per year
    #[arg(long, default_value = "4")]
    pub withdrawal_pct: Decimal,
}

/// Arguments for the FIRE horizon
#[derive(Args)]
pub struct FireArgs {
    /// Patrimony already accumulated
    #[arg(long, default_value = "0")]
    pub patrimony: Decimal,

    /// Contribution per month
    #[arg(long)]
    pub contribution: Decimal,

    /// Passive income wanted per month
    #[arg(long)]
    pub income: Decimal,

    /// Real annual return (inflation already netted out)
    #[arg(long)]
    pub real_rate: Decimal,
}

/// Arguments for the compound-interest projection
#[derive(Args)]
pub struct CompoundArgs {
    /// Initial amount
    #[arg(long, default_value = "0")]
    pub initial: Decimal,

    /// Contribution per month
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Annual rate (e.g. 0.12 for 12%)
    #[arg(long)]
    pub annual_rate: Decimal,

    /// Horizon in months
    #[arg(long)]
    pub months: u32,
}

pub fn run_retirement(args: RetirementArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = RetirementInput {
        current_age: args.current_age,
        retirement_age: args.retirement_age,
        current_patrimony: args.patrimony,
        monthly_contribution: args.contribution,
        desired_monthly_income: args.income,
        annual_return: args.annual_return,
        annual_inflation: args.inflation,
        withdrawal_rate_pct: args.withdrawal_pct,
    };

    let output = retirement::calculate_retirement(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_fire(args: FireArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = FireInput {
        current_patrimony: args.patrimony,
        monthly_contribution: args.contribution,
        desired_monthly_income: args.income,
        real_annual_rate: args.real_rate,
    };

    let output = fire::calculate_fire(&input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_compound(args: CompoundArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = CompoundInterestInput {
        initial_amount: args.initial,
        monthly_contribution: args.contribution,
        annual_rate: args.annual_rate,
        months: args.months,
    };

    let output = compound::calculate_compound_interest(&input)?;
    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_run_compound_envelope_shape() {
        let args = CompoundArgs {
            initial: dec!(1000),
            contribution: dec!(100),
            annual_rate: dec!(0),
            months: 12,
        };
        let value = run_compound(args).unwrap();
        let fv: Decimal = value["result"]["future_value"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(fv, dec!(2200));
    }

    #[test]
    fn test_run_retirement_surfaces_validation_errors() {
        let args = RetirementArgs {
            current_age: 40,
            retirement_age: 40,
            patrimony: dec!(0),
            contribution: dec!(0),
            income: dec!(5000),
            annual_return: dec!(0.10),
            inflation: dec!(0),
            withdrawal_pct: dec!(4),
        };
        assert!(run_retirement(args).is_err());
    }
}
