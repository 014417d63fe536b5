use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinbrError;
use crate::financing::amortization::{AmortizationRow, AmortizationSystem};
use crate::financing::cashflow::{build_cashflows, FeeStructure, FinancingTerms};
use crate::financing::irr::{solve_monthly_irr, IrrSolution, DEFAULT_GUESS};
use crate::time_value::{annual_to_monthly_rate, monthly_to_annual_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinbrResult;

/// Rows of the schedule echoed back for display.
const SCHEDULE_PREVIEW_ROWS: usize = 12;

/// A solved monthly rate at or under this is economically meaningless.
const MIN_PLAUSIBLE_MONTHLY_RATE: f64 = -0.99;

/// Input for the effective total cost (CET) of a financing operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CetInput {
    /// Amount to finance, net of any down payment.
    pub principal: Money,
    /// Nominal annual interest rate as a decimal.
    pub annual_rate: Rate,
    /// Term in months.
    pub months: u32,
    pub system: AmortizationSystem,
    #[serde(default)]
    pub fees: FeeStructure,
}

/// Output of the CET calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CetOutput {
    /// Effective total cost per month.
    pub monthly_cet: Rate,
    /// Effective total cost per year.
    pub annual_cet: Rate,
    /// Nominal monthly rate the contract quotes, for comparison.
    pub nominal_monthly_rate: Rate,
    pub total_paid: Money,
    pub total_interest_and_fees: Money,
    /// Leading schedule rows for display; totals above cover the full term.
    pub schedule_preview: Vec<AmortizationRow>,
    pub solver: IrrSolution,
}

fn validate_cet_input(input: &CetInput) -> FinbrResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "principal".into(),
            reason: "Financed amount (asset price minus down payment) must be positive".into(),
        });
    }
    if input.months == 0 {
        return Err(FinbrError::InvalidInput {
            field: "months".into(),
            reason: "Term must be at least one month".into(),
        });
    }
    if input.annual_rate <= dec!(-1) {
        return Err(FinbrError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }
    Ok(())
}

/// Effective total cost of a financing operation: the IRR that equates the
/// net amount disbursed to the stream of all payments, fees included.
pub fn calculate_cet(input: &CetInput) -> FinbrResult<ComputationOutput<CetOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_cet_input(input)?;

    let monthly_rate = annual_to_monthly_rate(input.annual_rate)?;

    let terms = FinancingTerms {
        principal: input.principal,
        monthly_rate,
        periods: input.months,
        system: input.system,
        fees: input.fees.clone(),
    };
    let built = build_cashflows(&terms)?;

    if built.cashflows[0] <= Decimal::ZERO {
        warnings.push(
            "Upfront fees consume the entire disbursement; the operation transfers \
             no cash to the borrower and its cost is unbounded."
                .to_string(),
        );
    }

    let flows: Vec<f64> = built
        .cashflows
        .iter()
        .map(|cf| cf.to_f64().unwrap_or(f64::NAN))
        .collect();
    let solution = solve_monthly_irr(&flows, DEFAULT_GUESS)?;

    if !solution.rate.is_finite() || solution.rate <= MIN_PLAUSIBLE_MONTHLY_RATE {
        if !solution.converged {
            return Err(FinbrError::ConvergenceFailure {
                function: "CET IRR".into(),
                iterations: solution.iterations,
                last_residual: solution.residual,
            });
        }
        return Err(FinbrError::FinancialImpossibility(
            "CET solve produced an implausible rate; check that fees and insurance \
             do not exceed what the financed amount can support"
                .to_string(),
        ));
    }
    if !solution.converged {
        warnings.push(format!(
            "IRR solver exhausted its iteration budget ({} bisection steps); \
             the reported CET is a best-effort estimate",
            solution.iterations
        ));
    }

    let monthly_cet = Decimal::from_f64(solution.rate).ok_or_else(|| {
        FinbrError::FinancialImpossibility("Solved CET rate is not representable".to_string())
    })?;
    let annual_cet = monthly_to_annual_rate(monthly_cet)?;

    let result = CetOutput {
        monthly_cet,
        annual_cet,
        nominal_monthly_rate: monthly_rate,
        total_paid: built.total_paid,
        total_interest_and_fees: built.total_interest_and_fees,
        schedule_preview: built.schedule.preview(SCHEDULE_PREVIEW_ROWS),
        solver: solution,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "CET via internal rate of return of the financed cash-flow series",
        input,
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn car_financing() -> CetInput {
        // 80_000 asset with a 20_000 down payment: 60_000 financed.
        CetInput {
            principal: dec!(60000),
            annual_rate: dec!(0.22),
            months: 48,
            system: AmortizationSystem::Price,
            fees: FeeStructure {
                upfront: dec!(800),
                ..FeeStructure::default()
            },
        }
    }

    #[test]
    fn test_upfront_fee_raises_cet_above_nominal() {
        let output = calculate_cet(&car_financing()).unwrap();
        let r = &output.result;

        assert!(r.monthly_cet > dec!(0));
        assert!(r.monthly_cet > r.nominal_monthly_rate);
        assert!(r.annual_cet > dec!(0.22));
    }

    #[test]
    fn test_first_installment_matches_price_payment() {
        // Upfront fees never touch the installment itself.
        let output = calculate_cet(&car_financing()).unwrap();
        let r = &output.result;

        let monthly = annual_to_monthly_rate(dec!(0.22)).unwrap();
        let expected = crate::time_value::payment(dec!(60000), monthly, 48).unwrap();
        assert!((r.schedule_preview[0].installment - expected).abs() < dec!(0.01));
    }

    #[test]
    fn test_fee_free_cet_equals_nominal_rate() {
        let input = CetInput {
            principal: dec!(60000),
            annual_rate: dec!(0.22),
            months: 48,
            system: AmortizationSystem::Price,
            fees: FeeStructure::default(),
        };
        let output = calculate_cet(&input).unwrap();
        let r = &output.result;

        assert!((r.monthly_cet - r.nominal_monthly_rate).abs() < dec!(0.00000001));
    }

    #[test]
    fn test_preview_bounded_to_twelve_rows() {
        let output = calculate_cet(&car_financing()).unwrap();
        assert_eq!(output.result.schedule_preview.len(), 12);
        assert_eq!(output.result.schedule_preview[0].period, 1);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut input = car_financing();
        input.principal = dec!(0);
        assert!(calculate_cet(&input).is_err());

        let mut input = car_financing();
        input.months = 0;
        assert!(calculate_cet(&input).is_err());

        let mut input = car_financing();
        input.annual_rate = dec!(-1);
        assert!(calculate_cet(&input).is_err());
    }

    #[test]
    fn test_sac_cet_also_exceeds_nominal_with_fees() {
        let mut input = car_financing();
        input.system = AmortizationSystem::Sac;
        let output = calculate_cet(&input).unwrap();
        let r = &output.result;

        assert!(r.monthly_cet > r.nominal_monthly_rate);
    }
}
