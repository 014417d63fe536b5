use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinbrError;
use crate::payroll::inss::{calculate_inss, InssResult};
use crate::payroll::irrf::{calculate_irrf, IrrfResult};
use crate::types::{with_metadata, ComputationOutput, LineItem, Money, Rate};
use crate::FinbrResult;

/// Input for the monthly net-salary calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetSalaryInput {
    pub gross_salary: Money,
    #[serde(default)]
    pub dependents: u32,
    /// Court-ordered alimony, deducted before IRRF.
    #[serde(default)]
    pub alimony: Money,
    /// Discounts beyond the statutory ones (health plan, union dues...).
    #[serde(default)]
    pub other_discounts: Vec<LineItem>,
    /// Non-salary additions (meal vouchers paid in cash, allowances...).
    #[serde(default)]
    pub benefits: Vec<LineItem>,
}

/// Monthly net salary with full withholding breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetSalaryOutput {
    pub gross_salary: Money,
    pub inss: InssResult,
    pub irrf: IrrfResult,
    pub total_other_discounts: Money,
    pub total_benefits: Money,
    /// INSS + IRRF + other discounts.
    pub total_discounts: Money,
    pub net_salary: Money,
    /// Share of the gross salary lost to discounts.
    pub effective_discount_rate: Rate,
}

fn validate_items(field: &str, items: &[LineItem]) -> FinbrResult<()> {
    for item in items {
        if item.amount < Decimal::ZERO {
            return Err(FinbrError::InvalidInput {
                field: field.into(),
                reason: format!("'{}' has a negative amount", item.label),
            });
        }
    }
    Ok(())
}

/// Net monthly salary after INSS, IRRF and free-form discounts/benefits.
pub fn calculate_net_salary(
    input: &NetSalaryInput,
) -> FinbrResult<ComputationOutput<NetSalaryOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.gross_salary < Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "gross_salary".into(),
            reason: "Gross salary cannot be negative".into(),
        });
    }
    validate_items("other_discounts", &input.other_discounts)?;
    validate_items("benefits", &input.benefits)?;

    let inss = calculate_inss(input.gross_salary)?;
    let irrf = calculate_irrf(input.gross_salary, inss.total, input.dependents, input.alimony)?;

    let total_other_discounts: Money = input.other_discounts.iter().map(|i| i.amount).sum();
    let total_benefits: Money = input.benefits.iter().map(|i| i.amount).sum();
    let total_discounts = inss.total + irrf.tax + total_other_discounts;
    let net_salary = input.gross_salary - total_discounts + total_benefits;

    if net_salary < Decimal::ZERO {
        warnings.push(
            "Discounts exceed the gross salary plus benefits; the net result is negative"
                .to_string(),
        );
    }

    let effective_discount_rate = if input.gross_salary > Decimal::ZERO {
        total_discounts / input.gross_salary
    } else {
        Decimal::ZERO
    };

    let result = NetSalaryOutput {
        gross_salary: input.gross_salary,
        inss,
        irrf,
        total_other_discounts,
        total_benefits,
        total_discounts,
        net_salary,
        effective_discount_rate,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Net salary via progressive INSS and IRRF withholding",
        input,
        warnings,
        elapsed,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::irrf::TaxRegime;
    use rust_decimal_macros::dec;

    fn plain_input(gross: Money) -> NetSalaryInput {
        NetSalaryInput {
            gross_salary: gross,
            dependents: 0,
            alimony: dec!(0),
            other_discounts: Vec::new(),
            benefits: Vec::new(),
        }
    }

    #[test]
    fn test_minimum_wage_keeps_most_of_gross() {
        let output = calculate_net_salary(&plain_input(dec!(1412))).unwrap();
        let r = &output.result;

        assert_eq!(r.inss.total, dec!(105.90));
        assert_eq!(r.irrf.tax, dec!(0));
        assert_eq!(r.net_salary, dec!(1412) - dec!(105.90));
    }

    #[test]
    fn test_discounts_and_benefits_flow_through() {
        let mut input = plain_input(dec!(5000));
        input.other_discounts.push(LineItem {
            label: "Plano de saúde".into(),
            amount: dec!(350),
        });
        input.benefits.push(LineItem {
            label: "Auxílio".into(),
            amount: dec!(200),
        });
        let output = calculate_net_salary(&input).unwrap();
        let r = &output.result;

        assert_eq!(r.total_other_discounts, dec!(350));
        assert_eq!(r.total_benefits, dec!(200));
        assert_eq!(
            r.net_salary,
            dec!(5000) - r.inss.total - r.irrf.tax - dec!(350) + dec!(200)
        );
    }

    #[test]
    fn test_regime_tag_reaches_output() {
        let output = calculate_net_salary(&plain_input(dec!(3500))).unwrap();
        assert_eq!(output.result.irrf.regime, TaxRegime::Simplified);
    }

    #[test]
    fn test_negative_line_item_rejected() {
        let mut input = plain_input(dec!(3000));
        input.benefits.push(LineItem {
            label: "typo".into(),
            amount: dec!(-10),
        });
        assert!(calculate_net_salary(&input).is_err());
    }

    #[test]
    fn test_negative_net_warns() {
        let mut input = plain_input(dec!(2000));
        input.other_discounts.push(LineItem {
            label: "Consignado".into(),
            amount: dec!(2500),
        });
        let output = calculate_net_salary(&input).unwrap();

        assert!(output.result.net_salary < dec!(0));
        assert!(!output.warnings.is_empty());
    }
}
