use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinbrError;
use crate::payroll::tables::{INSS_BRACKETS, INSS_CEILING};
use crate::types::{Money, Rate};
use crate::FinbrResult;

/// Contribution accrued inside one bracket of the walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InssBracketContribution {
    /// Upper bound of the bracket the slice fell into.
    pub bracket_ceiling: Money,
    /// Portion of the contribution base taxed at this bracket's rate.
    pub taxed_amount: Money,
    pub rate: Rate,
    pub contribution: Money,
}

/// INSS withholding for one gross salary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InssResult {
    pub total: Money,
    /// min(gross, ceiling) — the base the brackets actually walked.
    pub contribution_base: Money,
    /// Ordered, one entry per bracket touched.
    pub brackets: Vec<InssBracketContribution>,
    pub effective_rate: Rate,
    /// True when the salary sits above the contribution ceiling.
    pub capped: bool,
}

/// Progressive INSS withholding over the capped contribution base.
///
/// Above the ceiling the fixed maximum contribution is taken from the last
/// bracket's published rate and subtracted amount, verbatim; the bracket
/// walk still supplies the breakdown.
pub fn calculate_inss(gross_salary: Money) -> FinbrResult<InssResult> {
    if gross_salary < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "gross_salary".into(),
            reason: "Gross salary cannot be negative".into(),
        });
    }

    let contribution_base = gross_salary.min(INSS_CEILING);
    let mut remaining = contribution_base;
    let mut previous_bound = Decimal::ZERO;
    let mut walked_total = Decimal::ZERO;
    let mut brackets = Vec::new();

    for bracket in &INSS_BRACKETS {
        if remaining <= Decimal::ZERO {
            break;
        }
        let ceiling = bracket.upper_bound.unwrap_or(INSS_CEILING);
        let taxed_amount = remaining.min(ceiling - previous_bound);
        let contribution = taxed_amount * bracket.rate;

        walked_total += contribution;
        brackets.push(InssBracketContribution {
            bracket_ceiling: ceiling,
            taxed_amount,
            rate: bracket.rate,
            contribution,
        });

        remaining -= taxed_amount;
        previous_bound = ceiling;
    }

    let capped = gross_salary > INSS_CEILING;
    let total = if capped {
        // Published standard maximum, not the walked sum; the two agree to
        // the cent but the legal value is this one.
        let last = INSS_BRACKETS[INSS_BRACKETS.len() - 1];
        INSS_CEILING * last.rate - last.deduction
    } else {
        walked_total
    };

    let effective_rate = if gross_salary > Decimal::ZERO {
        total / gross_salary
    } else {
        Decimal::ZERO
    };

    Ok(InssResult {
        total,
        contribution_base,
        brackets,
        effective_rate,
        capped,
    })
}
