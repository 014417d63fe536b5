use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinbrError;
use crate::payroll::inss::{calculate_inss, InssResult};
use crate::payroll::irrf::{calculate_irrf, IrrfResult};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinbrResult;

const MONTHS_IN_YEAR: u32 = 12;

/// Input for the proportional 13th-salary calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirteenthSalaryInput {
    pub gross_salary: Money,
    /// Months worked in the year, 0 through 12.
    pub months_worked: u32,
    #[serde(default)]
    pub dependents: u32,
    #[serde(default)]
    pub alimony: Money,
}

/// 13th salary split into its two legal installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirteenthSalaryOutput {
    /// Gross 13th, proportional to months worked.
    pub gross_thirteenth: Money,
    /// First installment: half the gross, paid without withholding.
    pub first_installment: Money,
    /// Second installment: whatever of the net remains after the first.
    pub second_installment: Money,
    pub net_thirteenth: Money,
    pub inss: InssResult,
    pub irrf: IrrfResult,
}

/// Proportional 13th salary. Withholding applies to the full gross 13th and
/// is settled entirely in the second installment.
pub fn calculate_thirteenth(
    input: &ThirteenthSalaryInput,
) -> FinbrResult<ComputationOutput<ThirteenthSalaryOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.gross_salary < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "gross_salary".into(),
            reason: "Gross salary cannot be negative".into(),
        });
    }
    if input.months_worked > MONTHS_IN_YEAR {
        return Err(FinbrError::InvalidInput {
            field: "months_worked".into(),
            reason: "Months worked must be between 0 and 12".into(),
        });
    }

    let gross_thirteenth =
        input.gross_salary / Decimal::from(MONTHS_IN_YEAR) * Decimal::from(input.months_worked);
    let first_installment = gross_thirteenth / dec!(2);

    let inss = calculate_inss(gross_thirteenth)?;
    let irrf = calculate_irrf(gross_thirteenth, inss.total, input.dependents, input.alimony)?;

    let net_thirteenth = gross_thirteenth - inss.total - irrf.tax;
    let second_installment = net_thirteenth - first_installment;

    if second_installment < Decimal::ZERO {
        warnings.push(
            "Withholding exceeds half of the gross 13th; the second installment is negative \
             and the difference is owed back"
                .to_string(),
        );
    }

    let result = ThirteenthSalaryOutput {
        gross_thirteenth,
        first_installment,
        second_installment,
        net_thirteenth,
        inss,
        irrf,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Proportional 13th salary with withholding settled in the second installment",
        input,
        warnings,
        elapsed,
        result,
    ))
}
