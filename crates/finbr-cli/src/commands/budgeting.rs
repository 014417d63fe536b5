use clap::Args;
use serde_json::Value;

use finbr_core::budgeting::budget::{self, BudgetInput};

use crate::input;

/// Arguments for the cost-of-living budget analysis
#[derive(Args)]
pub struct BudgetArgs {
    /// Path to JSON input file with net income and categorized items
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let budget_input: BudgetInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input is required (or pipe JSON via stdin)".into());
    };

    let output = budget::calculate_budget(&budget_input)?;
    Ok(serde_json::to_value(output)?)
}
