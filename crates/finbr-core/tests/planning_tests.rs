#![cfg(feature = "planning")]

use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use finbr_core::planning::compound::{calculate_compound_interest, CompoundInterestInput};
use finbr_core::planning::fire::{calculate_fire, FireInput};
use finbr_core::planning::retirement::{calculate_retirement, RetirementInput};
use finbr_core::time_value::future_value;
use finbr_core::FinbrError;

// ===========================================================================
// Retirement projection
// ===========================================================================

fn retirement_input() -> RetirementInput {
    RetirementInput {
        current_age: 30,
        retirement_age: 65,
        current_patrimony: dec!(50000),
        monthly_contribution: dec!(1500),
        desired_monthly_income: dec!(8000),
        annual_return: dec!(0.10),
        annual_inflation: dec!(0.04),
        withdrawal_rate_pct: dec!(4),
    }
}

#[test]
fn test_retirement_projection_against_direct_future_value() {
    let output = calculate_retirement(&retirement_input()).unwrap();
    let r = &output.result;

    let direct = future_value(dec!(50000), dec!(1500), r.real_monthly_rate, 420).unwrap();
    assert_eq!(r.projected_patrimony, direct);
}

#[test]
fn test_retirement_age_validation() {
    let mut input = retirement_input();
    input.retirement_age = input.current_age;
    assert!(matches!(
        calculate_retirement(&input).unwrap_err(),
        FinbrError::InvalidInput { .. }
    ));
}

#[test]
fn test_withdrawal_rule_must_be_inside_open_interval() {
    for pct in [dec!(0), dec!(100), dec!(150)] {
        let mut input = retirement_input();
        input.withdrawal_rate_pct = pct;
        assert!(calculate_retirement(&input).is_err());
    }
}

#[test]
fn test_looser_withdrawal_rule_needs_less_capital() {
    let four = calculate_retirement(&retirement_input()).unwrap();
    let mut input = retirement_input();
    input.withdrawal_rate_pct = dec!(5);
    let five = calculate_retirement(&input).unwrap();

    assert!(five.result.required_capital < four.result.required_capital);
    // The 4% reference column never moves.
    assert_eq!(
        five.result.required_capital_4pct,
        four.result.required_capital_4pct
    );
}

// ===========================================================================
// FIRE horizon
// ===========================================================================

#[test]
fn test_fire_horizon_reaches_target_no_sooner_no_later() {
    let input = FireInput {
        current_patrimony: dec!(200000),
        monthly_contribution: dec!(4000),
        desired_monthly_income: dec!(6000),
        real_annual_rate: dec!(0.05),
    };
    let output = calculate_fire(&input).unwrap();
    let r = &output.result;

    let n = r.months_to_target.ceil().to_u32().unwrap();
    let at_n = future_value(dec!(200000), dec!(4000), r.real_monthly_rate, n).unwrap();
    let well_before =
        future_value(dec!(200000), dec!(4000), r.real_monthly_rate, n - 2).unwrap();

    assert!(at_n >= r.target_patrimony);
    assert!(well_before < r.target_patrimony);
}

#[test]
fn test_fire_infeasibility_diagnoses() {
    // Zero real rate: unbounded target.
    let zero_rate = FireInput {
        current_patrimony: dec!(10000),
        monthly_contribution: dec!(1000),
        desired_monthly_income: dec!(3000),
        real_annual_rate: dec!(0),
    };
    assert!(matches!(
        calculate_fire(&zero_rate).unwrap_err(),
        FinbrError::FinancialImpossibility(_)
    ));

    // Already past the target.
    let done = FireInput {
        current_patrimony: dec!(50000000),
        monthly_contribution: dec!(1000),
        desired_monthly_income: dec!(3000),
        real_annual_rate: dec!(0.05),
    };
    match calculate_fire(&done).unwrap_err() {
        FinbrError::FinancialImpossibility(msg) => assert!(msg.contains("already reached")),
        other => panic!("expected FinancialImpossibility, got {other:?}"),
    }

    // Contribution below the drain.
    let stalled = FireInput {
        current_patrimony: dec!(10000),
        monthly_contribution: dec!(0),
        desired_monthly_income: dec!(3000),
        real_annual_rate: dec!(0.05),
    };
    assert!(matches!(
        calculate_fire(&stalled).unwrap_err(),
        FinbrError::FinancialImpossibility(_)
    ));
}

// ===========================================================================
// Compound interest
// ===========================================================================

#[test]
fn test_compound_interest_doubles_roughly_per_rule_of_72() {
    // 12% a.a. doubles capital in about 6 years.
    let input = CompoundInterestInput {
        initial_amount: dec!(10000),
        monthly_contribution: dec!(0),
        annual_rate: dec!(0.12),
        months: 73,
    };
    let output = calculate_compound_interest(&input).unwrap();
    let fv = output.result.future_value;

    assert!(fv > dec!(19500));
    assert!(fv < dec!(20500));
}

#[test]
fn test_compound_interest_consistency_with_fire_target() {
    // Contributing at exactly the FIRE pace for the solved horizon lands on
    // the target patrimony; the two modules must agree on the arithmetic.
    let fire = calculate_fire(&FireInput {
        current_patrimony: dec!(0),
        monthly_contribution: dec!(2500),
        desired_monthly_income: dec!(2000),
        real_annual_rate: dec!(0.06),
    })
    .unwrap();

    let months = fire.result.months_to_target.ceil().to_u32().unwrap();
    let compound = calculate_compound_interest(&CompoundInterestInput {
        initial_amount: dec!(0),
        monthly_contribution: dec!(2500),
        annual_rate: dec!(0.06),
        months,
    })
    .unwrap();

    assert!(compound.result.future_value >= fire.result.target_patrimony);
}
