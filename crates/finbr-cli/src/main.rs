mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::budgeting::BudgetArgs;
use commands::financing::{CetArgs, ScheduleArgs};
use commands::payroll::{NetSalaryArgs, ThirteenthArgs};
use commands::planning::{CompoundArgs, FireArgs, RetirementArgs};
use commands::rates::ConvertRateArgs;
use commands::valuation::{CapmArgs, GordonArgs};

/// Personal-finance calculations for the Brazilian market
#[derive(Parser)]
#[command(
    name = "finbr",
    version,
    about = "Personal-finance calculations for the Brazilian market",
    long_about = "A CLI for personal-finance calculations with decimal precision. \
                  Covers financing effective cost (CET), amortization schedules, \
                  net salary and 13th salary withholding, retirement and FIRE \
                  planning, compound interest, CAPM and Gordon valuations, and \
                  cost-of-living budgeting."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Effective total cost (CET) of a financing operation
    Cet(CetArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Net monthly salary after INSS and IRRF withholding
    NetSalary(NetSalaryArgs),
    /// Proportional 13th salary with its installment split
    Thirteenth(ThirteenthArgs),
    /// Retirement projection in today's money
    Retirement(RetirementArgs),
    /// Months until passive income covers the desired spending
    Fire(FireArgs),
    /// Compound-interest projection
    Compound(CompoundArgs),
    /// Expected return under CAPM
    Capm(CapmArgs),
    /// Fair value under the Gordon growth model
    Gordon(GordonArgs),
    /// Cost-of-living budget analysis
    Budget(BudgetArgs),
    /// Convert between effective monthly and annual rates
    ConvertRate(ConvertRateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Cet(args) => commands::financing::run_cet(args),
        Commands::Schedule(args) => commands::financing::run_schedule(args),
        Commands::NetSalary(args) => commands::payroll::run_net_salary(args),
        Commands::Thirteenth(args) => commands::payroll::run_thirteenth(args),
        Commands::Retirement(args) => commands::planning::run_retirement(args),
        Commands::Fire(args) => commands::planning::run_fire(args),
        Commands::Compound(args) => commands::planning::run_compound(args),
        Commands::Capm(args) => commands::valuation::run_capm(args),
        Commands::Gordon(args) => commands::valuation::run_gordon(args),
        Commands::Budget(args) => commands::budgeting::run_budget(args),
        Commands::ConvertRate(args) => commands::rates::run_convert_rate(args),
        Commands::Version => {
            println!("finbr {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
