use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finbr_core::payroll::net_salary::{self, NetSalaryInput};
use finbr_core::payroll::thirteenth::{self, ThirteenthSalaryInput};

use crate::input;

/// Arguments for the net-salary calculation
#[derive(Args)]
pub struct NetSalaryArgs {
    /// Gross monthly salary
    #[arg(long)]
    pub gross: Option<Decimal>,

    /// Number of IRRF dependents
    #[arg(long, default_value = "0")]
    pub dependents: u32,

    /// Court-ordered alimony deducted before IRRF
    #[arg(long, default_value = "0")]
    pub alimony: Decimal,

    /// Path to JSON input file with discounts and benefits line items
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the 13th-salary calculation
#[derive(Args)]
pub struct ThirteenthArgs {
    /// Gross monthly salary
    #[arg(long)]
    pub gross: Decimal,

    /// Months worked in the year (0 through 12)
    #[arg(long, default_value = "12")]
    pub months_worked: u32,

    /// Number of IRRF dependents
    #[arg(long, default_value = "0")]
    pub dependents: u32,

    /// Court-ordered alimony deducted before IRRF
    #[arg(long, default_value = "0")]
    pub alimony: Decimal,
}

pub fn run_net_salary(args: NetSalaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let salary_input: NetSalaryInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        NetSalaryInput {
            gross_salary: args.gross.ok_or("--gross is required (or provide --input)")?,
            dependents: args.dependents,
            alimony: args.alimony,
            other_discounts: Vec::new(),
            benefits: Vec::new(),
        }
    };

    let output = net_salary::calculate_net_salary(&salary_input)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_thirteenth(args: ThirteenthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = ThirteenthSalaryInput {
        gross_salary: args.gross,
        months_worked: args.months_worked,
        dependents: args.dependents,
        alimony: args.alimony,
    };

    let output = thirteenth::calculate_thirteenth(&input)?;
    Ok(serde_json::to_value(output)?)
}
