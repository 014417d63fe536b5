use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::FinbrError;
use crate::time_value::payment;
use crate::types::{Money, Rate};
use crate::FinbrResult;

/// Residual balances under one cent are settled in full on the period that
/// produced them, so floating drift never leaves a trailing negative balance.
/// Scaled to BRL cents; revisit if the crate ever prices other currencies.
pub(crate) const BALANCE_FLOOR: Decimal = dec!(0.01);

/// Amortization system of a declining-balance loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AmortizationSystem {
    /// Constant installment (French system, "Tabela Price").
    Price,
    /// Constant principal portion, declining installments.
    Sac,
}

/// Terms of a single loan, constructed per calculation and immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount owed at period 0.
    pub principal: Money,
    /// Effective monthly rate as a decimal (0.01 = 1% a.m.).
    pub monthly_rate: Rate,
    /// Number of monthly periods.
    pub periods: u32,
    /// Flat fee added to every installment.
    #[serde(default)]
    pub monthly_fee: Money,
    /// Insurance charged each period as a fraction of the open balance.
    #[serde(default)]
    pub insurance_rate_on_balance: Rate,
}

/// One period of an amortization schedule. Periods are 1-based and strictly
/// ascending; callers may truncate the sequence but must never reorder it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub period: u32,
    pub installment: Money,
    pub interest: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

/// Full schedule plus totals. Totals always cover every period, even when a
/// caller displays only a prefix of the rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub system: AmortizationSystem,
    pub rows: Vec<AmortizationRow>,
    pub total_paid: Money,
    pub total_interest: Money,
}

impl AmortizationSchedule {
    /// Leading rows for display. The underlying schedule stays complete.
    pub fn preview(&self, limit: usize) -> Vec<AmortizationRow> {
        self.rows.iter().take(limit).cloned().collect()
    }
}

fn validate_terms(terms: &LoanTerms) -> FinbrResult<()> {
    if terms.principal <= Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if terms.monthly_rate <= dec!(-1) {
        return Err(FinbrError::InvalidInput {
            field: "monthly_rate".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }
    if terms.monthly_fee < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "monthly_fee".into(),
            reason: "Monthly fee cannot be negative".into(),
        });
    }
    if terms.insurance_rate_on_balance < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "insurance_rate_on_balance".into(),
            reason: "Insurance rate cannot be negative".into(),
        });
    }
    Ok(())
}

/// Build the month-by-month schedule for the given system.
///
/// `periods == 0` yields an empty schedule with zero totals (a defined
/// degenerate case, not an error).
pub fn build_schedule(
    terms: &LoanTerms,
    system: AmortizationSystem,
) -> FinbrResult<AmortizationSchedule> {
    validate_terms(terms)?;

    if terms.periods == 0 {
        return Ok(AmortizationSchedule {
            system,
            rows: Vec::new(),
            total_paid: Decimal::ZERO,
            total_interest: Decimal::ZERO,
        });
    }

    match system {
        AmortizationSystem::Price => build_price(terms),
        AmortizationSystem::Sac => build_sac(terms),
    }
}

fn build_price(terms: &LoanTerms) -> FinbrResult<AmortizationSchedule> {
    let base_installment = payment(terms.principal, terms.monthly_rate, terms.periods)?;

    let mut rows = Vec::with_capacity(terms.periods as usize);
    let mut balance = terms.principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=terms.periods {
        let interest = balance * terms.monthly_rate;
        let insurance = balance * terms.insurance_rate_on_balance;
        let mut principal_portion = base_installment - interest;

        // Settle the loan outright once the residual would drop under a cent.
        if balance - principal_portion < BALANCE_FLOOR {
            principal_portion = balance;
        }

        let installment = base_installment + terms.monthly_fee + insurance;
        balance -= principal_portion;

        total_paid += installment;
        total_interest += interest;

        rows.push(AmortizationRow {
            period,
            installment,
            interest,
            principal_portion,
            remaining_balance: balance.max(Decimal::ZERO),
        });
    }

    Ok(AmortizationSchedule {
        system: AmortizationSystem::Price,
        rows,
        total_paid,
        total_interest,
    })
}

fn build_sac(terms: &LoanTerms) -> FinbrResult<AmortizationSchedule> {
    let principal_portion = terms.principal / Decimal::from(terms.periods);

    let mut rows = Vec::with_capacity(terms.periods as usize);
    let mut balance = terms.principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=terms.periods {
        let interest = balance * terms.monthly_rate;
        let insurance = balance * terms.insurance_rate_on_balance;
        let installment = principal_portion + interest + terms.monthly_fee + insurance;

        balance -= principal_portion;
        total_paid += installment;
        total_interest += interest;

        rows.push(AmortizationRow {
            period,
            installment,
            interest,
            principal_portion,
            remaining_balance: balance.max(Decimal::ZERO),
        });
    }

    Ok(AmortizationSchedule {
        system: AmortizationSystem::Sac,
        rows,
        total_paid,
        total_interest,
    })
}
