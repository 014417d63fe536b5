use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinbrError;
use crate::financing::amortization::{
    build_schedule, AmortizationSchedule, AmortizationSystem, LoanTerms,
};
use crate::types::{Money, Rate};
use crate::FinbrResult;

/// Fees attached to a financing operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeeStructure {
    /// Paid at contract signing, deducted from the amount disbursed.
    #[serde(default)]
    pub upfront: Money,
    /// Rolled into the financed principal.
    #[serde(default)]
    pub financed: Money,
    /// Flat fee added to every installment.
    #[serde(default)]
    pub monthly: Money,
    /// Per-period insurance as a fraction of the open balance.
    #[serde(default)]
    pub insurance_pct_on_balance: Rate,
}

/// Terms of a financing operation as quoted to the borrower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingTerms {
    /// Amount the borrower wants financed, before fee roll-in.
    pub principal: Money,
    /// Effective monthly interest rate.
    pub monthly_rate: Rate,
    pub periods: u32,
    pub system: AmortizationSystem,
    #[serde(default)]
    pub fees: FeeStructure,
}

/// Cash-flow series and schedule of a financing operation, from the
/// borrower's perspective: period 0 is the net amount received (positive),
/// every later period a payment (negative). The sign convention is internally
/// consistent so that an IRR of the series is the effective periodic cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingCashflows {
    pub cashflows: Vec<Money>,
    pub schedule: AmortizationSchedule,
    /// Sum of all installments over the full term.
    pub total_paid: Money,
    /// Everything paid beyond the amount the borrower set out to finance.
    /// Measured against the original principal, not the fee-inflated one.
    pub total_interest_and_fees: Money,
}

fn validate_fees(fees: &FeeStructure) -> FinbrResult<()> {
    for (field, value) in [
        ("fees.upfront", fees.upfront),
        ("fees.financed", fees.financed),
        ("fees.monthly", fees.monthly),
        ("fees.insurance_pct_on_balance", fees.insurance_pct_on_balance),
    ] {
        if value < Decimal::ZERO {
            return Err(FinbrError::InvalidInput {
                field: field.into(),
                reason: "Fees cannot be negative".into(),
            });
        }
    }
    Ok(())
}

/// Assemble the borrower's signed cash-flow series for a financing operation.
///
/// Financed fees inflate the debt (and therefore every installment) without
/// ever reaching the borrower's hands; upfront fees reduce what is disbursed
/// at period 0.
pub fn build_cashflows(terms: &FinancingTerms) -> FinbrResult<FinancingCashflows> {
    validate_fees(&terms.fees)?;

    let effective_principal = terms.principal + terms.fees.financed;
    let loan = LoanTerms {
        principal: effective_principal,
        monthly_rate: terms.monthly_rate,
        periods: terms.periods,
        monthly_fee: terms.fees.monthly,
        insurance_rate_on_balance: terms.fees.insurance_pct_on_balance,
    };
    let schedule = build_schedule(&loan, terms.system)?;

    let mut cashflows = Vec::with_capacity(schedule.rows.len() + 1);
    cashflows.push(terms.principal - terms.fees.upfront);
    for row in &schedule.rows {
        cashflows.push(-row.installment);
    }

    let total_paid = schedule.total_paid;
    let total_interest_and_fees = total_paid - terms.principal;

    Ok(FinancingCashflows {
        cashflows,
        schedule,
        total_paid,
        total_interest_and_fees,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fee_free_terms() -> FinancingTerms {
        FinancingTerms {
            principal: dec!(10000),
            monthly_rate: dec!(0.01),
            periods: 12,
            system: AmortizationSystem::Price,
            fees: FeeStructure::default(),
        }
    }

    #[test]
    fn test_sign_convention() {
        let built = build_cashflows(&fee_free_terms()).unwrap();

        assert_eq!(built.cashflows.len(), 13);
        assert!(built.cashflows[0] > dec!(0));
        for cf in &built.cashflows[1..] {
            assert!(*cf < dec!(0));
        }
    }

    #[test]
    fn test_upfront_fee_reduces_disbursement_only() {
        let mut terms = fee_free_terms();
        terms.fees.upfront = dec!(500);
        let built = build_cashflows(&terms).unwrap();
        let baseline = build_cashflows(&fee_free_terms()).unwrap();

        assert_eq!(built.cashflows[0], dec!(9500));
        // Installments are untouched by an upfront fee.
        assert_eq!(built.cashflows[1], baseline.cashflows[1]);
        assert_eq!(built.total_paid, baseline.total_paid);
    }

    #[test]
    fn test_financed_fee_inflates_debt() {
        let mut terms = fee_free_terms();
        terms.fees.financed = dec!(1000);
        let built = build_cashflows(&terms).unwrap();
        let baseline = build_cashflows(&fee_free_terms()).unwrap();

        // The borrower still receives only the original principal...
        assert_eq!(built.cashflows[0], dec!(10000));
        // ...but owes installments sized for principal + financed fee.
        assert!(built.cashflows[1] < baseline.cashflows[1]);
        assert!(built.total_paid > baseline.total_paid);
    }

    #[test]
    fn test_totals_measured_against_original_principal() {
        let mut terms = fee_free_terms();
        terms.fees.financed = dec!(1000);
        let built = build_cashflows(&terms).unwrap();

        assert_eq!(
            built.total_interest_and_fees,
            built.total_paid - dec!(10000)
        );
    }

    #[test]
    fn test_negative_fee_rejected() {
        let mut terms = fee_free_terms();
        terms.fees.monthly = dec!(-1);
        assert!(build_cashflows(&terms).is_err());
    }
}
