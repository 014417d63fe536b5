use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use finbr_core::financing::amortization::{self, AmortizationSystem, LoanTerms};
use finbr_core::financing::cashflow::FeeStructure;
use finbr_core::financing::cet::{self, CetInput};

use crate::input;

/// Amortization system flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SystemArg {
    /// Constant installment (Tabela Price)
    Price,
    /// Constant principal portion (SAC)
    Sac,
}

impl From<SystemArg> for AmortizationSystem {
    fn from(arg: SystemArg) -> Self {
        match arg {
            SystemArg::Price => AmortizationSystem::Price,
            SystemArg::Sac => AmortizationSystem::Sac,
        }
    }
}

/// Arguments for the CET calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct CetArgs {
    /// Amount to finance, net of any down payment
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate (e.g. 0.22 for 22%)
    #[arg(long)]
    pub annual_rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub months: Option<u32>,

    /// Amortization system
    #[arg(long, value_enum, default_value = "price")]
    pub system: SystemArg,

    /// Upfront fee deducted from the disbursement
    #[arg(long, default_value = "0")]
    pub upfront_fee: Decimal,

    /// Fee rolled into the financed principal
    #[arg(long, default_value = "0")]
    pub financed_fee: Decimal,

    /// Flat fee added to every installment
    #[arg(long, default_value = "0")]
    pub monthly_fee: Decimal,

    /// Per-month insurance as a fraction of the open balance
    #[arg(long, default_value = "0")]
    pub insurance_pct: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the raw amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Decimal,

    /// Effective monthly rate (e.g. 0.0167 for 1.67% a.m.)
    #[arg(long)]
    pub monthly_rate: Decimal,

    /// Number of monthly periods
    #[arg(long)]
    pub periods: u32,

    /// Amortization system
    #[arg(long, value_enum, default_value = "price")]
    pub system: SystemArg,

    /// Flat fee added to every installment
    #[arg(long, default_value = "0")]
    pub monthly_fee: Decimal,

    /// Per-month insurance as a fraction of the open balance
    #[arg(long, default_value = "0")]
    pub insurance_pct: Decimal,

    /// Show only the first N rows (totals still cover the whole term)
    #[arg(long)]
    pub rows: Option<usize>,
}

pub fn run_cet(args: CetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cet_input: CetInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        CetInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            months: args.months.ok_or("--months is required (or provide --input)")?,
            system: args.system.into(),
            fees: FeeStructure {
                upfront: args.upfront_fee,
                financed: args.financed_fee,
                monthly: args.monthly_fee,
                insurance_pct_on_balance: args.insurance_pct,
            },
        }
    };

    let output = cet::calculate_cet(&cet_input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = LoanTerms {
        principal: args.principal,
        monthly_rate: args.monthly_rate,
        periods: args.periods,
        monthly_fee: args.monthly_fee,
        insurance_rate_on_balance: args.insurance_pct,
    };
    let mut schedule = amortization::build_schedule(&terms, args.system.into())?;

    if let Some(limit) = args.rows {
        schedule.rows = schedule.preview(limit);
    }

    Ok(serde_json::to_value(schedule)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_system_arg_maps_to_core_enum() {
        assert_eq!(
            AmortizationSystem::from(SystemArg::Price),
            AmortizationSystem::Price
        );
        assert_eq!(AmortizationSystem::from(SystemArg::Sac), AmortizationSystem::Sac);
    }

    #[test]
    fn test_run_schedule_truncates_rows() {
        let args = ScheduleArgs {
            principal: dec!(10000),
            monthly_rate: dec!(0.01),
            periods: 24,
            system: SystemArg::Price,
            monthly_fee: dec!(0),
            insurance_pct: dec!(0),
            rows: Some(6),
        };
        let value = run_schedule(args).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn test_run_cet_requires_principal() {
        let args = CetArgs {
            principal: None,
            annual_rate: Some(dec!(0.22)),
            months: Some(48),
            system: SystemArg::Price,
            upfront_fee: dec!(0),
            financed_fee: dec!(0),
            monthly_fee: dec!(0),
            insurance_pct: dec!(0),
            input: None,
        };
        assert!(run_cet(args).is_err());
    }
}
