use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FinbrError;
use crate::payroll::tables::{
    bracket_for, DEPENDENT_DEDUCTION, IRRF_BRACKETS, SIMPLIFIED_DEDUCTION_CAP,
    SIMPLIFIED_DEDUCTION_RATE,
};
use crate::types::{Money, Rate};
use crate::FinbrResult;

/// Deduction regime selected by the taxpayer-benefit rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    /// Flat simplified discount in place of itemized deductions.
    Simplified,
    /// Itemized dependents and alimony ("completo").
    Full,
}

/// Tax assessed over one candidate base.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IrrfAssessment {
    pub base: Money,
    pub tax: Money,
    /// Marginal rate of the bracket the base landed in.
    pub rate: Rate,
    pub bracket_deduction: Money,
}

/// IRRF withholding with both regimes evaluated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrfResult {
    /// Withheld tax under the chosen regime.
    pub tax: Money,
    pub regime: TaxRegime,
    /// Simplified discount actually applied (zero under the full regime).
    pub simplified_discount: Money,
    /// Both candidate paths, for an explanatory breakdown.
    pub full_path: IrrfAssessment,
    pub simplified_path: IrrfAssessment,
}

impl IrrfResult {
    /// The assessment belonging to the chosen regime.
    pub fn chosen(&self) -> &IrrfAssessment {
        match self.regime {
            TaxRegime::Simplified => &self.simplified_path,
            TaxRegime::Full => &self.full_path,
        }
    }
}

fn assess(base: Money) -> IrrfAssessment {
    let base = base.max(Decimal::ZERO);
    let bracket = bracket_for(&IRRF_BRACKETS, base);
    let tax = (base * bracket.rate - bracket.deduction).max(Decimal::ZERO);
    IrrfAssessment {
        base,
        tax,
        rate: bracket.rate,
        bracket_deduction: bracket.deduction,
    }
}

/// IRRF withholding on a monthly payment.
///
/// Both legal regimes are computed and the cheaper one wins (taxpayer
/// benefit rule): the full path itemizes dependents and alimony; the
/// simplified path replaces them with a flat 25% discount capped at the
/// published amount. A tie keeps the full regime.
pub fn calculate_irrf(
    gross_salary: Money,
    inss: Money,
    dependents: u32,
    alimony: Money,
) -> FinbrResult<IrrfResult> {
    if gross_salary < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "gross_salary".into(),
            reason: "Gross salary cannot be negative".into(),
        });
    }
    if inss < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "inss".into(),
            reason: "INSS contribution cannot be negative".into(),
        });
    }
    if alimony < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "alimony".into(),
            reason: "Alimony cannot be negative".into(),
        });
    }

    let full_base =
        gross_salary - inss - Decimal::from(dependents) * DEPENDENT_DEDUCTION - alimony;
    let full_path = assess(full_base);

    let simplified_base = gross_salary - inss - alimony;
    let simplified_discount = (simplified_base * SIMPLIFIED_DEDUCTION_RATE)
        .min(SIMPLIFIED_DEDUCTION_CAP)
        .max(Decimal::ZERO);
    let simplified_path = assess(simplified_base - simplified_discount);

    let (regime, tax, discount_applied) = if simplified_path.tax < full_path.tax {
        (TaxRegime::Simplified, simplified_path.tax, simplified_discount)
    } else {
        (TaxRegime::Full, full_path.tax, Decimal::ZERO)
    };

    Ok(IrrfResult {
        tax,
        regime,
        simplified_discount: discount_applied,
        full_path,
        simplified_path,
    })
}
