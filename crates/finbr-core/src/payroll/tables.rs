use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// One bracket of a progressive withholding table, ascending by upper bound.
/// `upper_bound == None` marks the open-ended last bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub upper_bound: Option<Money>,
    pub rate: Rate,
    /// Published subtracted amount. It keeps the tax continuous at the
    /// bracket boundary and is a fixed legal constant, never recomputed.
    pub deduction: Money,
}

// Published 2024 tables. These change when tax law updates; a future
// externalization into dated, versioned tables lives outside this crate.

/// INSS contribution brackets.
pub const INSS_BRACKETS: [TaxBracket; 4] = [
    TaxBracket {
        upper_bound: Some(dec!(1412.00)),
        rate: dec!(0.075),
        deduction: dec!(0),
    },
    TaxBracket {
        upper_bound: Some(dec!(2666.68)),
        rate: dec!(0.09),
        deduction: dec!(21.18),
    },
    TaxBracket {
        upper_bound: Some(dec!(4000.03)),
        rate: dec!(0.12),
        deduction: dec!(101.18),
    },
    TaxBracket {
        upper_bound: Some(dec!(7786.02)),
        rate: dec!(0.14),
        deduction: dec!(181.18),
    },
];

/// Contribution base ceiling. Salaries above it contribute the fixed maximum.
pub const INSS_CEILING: Money = dec!(7786.02);

/// IRRF withholding brackets.
pub const IRRF_BRACKETS: [TaxBracket; 5] = [
    TaxBracket {
        upper_bound: Some(dec!(2259.20)),
        rate: dec!(0),
        deduction: dec!(0),
    },
    TaxBracket {
        upper_bound: Some(dec!(2826.65)),
        rate: dec!(0.075),
        deduction: dec!(169.44),
    },
    TaxBracket {
        upper_bound: Some(dec!(3751.05)),
        rate: dec!(0.15),
        deduction: dec!(381.44),
    },
    TaxBracket {
        upper_bound: Some(dec!(4664.68)),
        rate: dec!(0.225),
        deduction: dec!(662.77),
    },
    TaxBracket {
        upper_bound: None,
        rate: dec!(0.275),
        deduction: dec!(896.00),
    },
];

/// Monthly IRRF deduction per dependent.
pub const DEPENDENT_DEDUCTION: Money = dec!(189.59);

/// The simplified discount is 25% of the base, capped at this amount.
pub const SIMPLIFIED_DEDUCTION_RATE: Rate = dec!(0.25);
pub const SIMPLIFIED_DEDUCTION_CAP: Money = dec!(564.80);

/// First bracket whose upper bound covers `base` (the last bracket catches
/// everything).
pub(crate) fn bracket_for(table: &[TaxBracket], base: Money) -> TaxBracket {
    for bracket in table {
        match bracket.upper_bound {
            Some(upper) if base <= upper => return *bracket,
            Some(_) => continue,
            None => return *bracket,
        }
    }
    // Tables end in an unbounded bracket; a fully bounded table only gets
    // here for a base above its last bound, which the last bracket covers.
    table[table.len() - 1]
}
