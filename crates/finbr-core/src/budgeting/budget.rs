use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinbrError;
use crate::types::{with_metadata, ComputationOutput, LineItem, Money, Rate};
use crate::FinbrResult;

// Advisory thresholds on income shares.
const HOUSING_SHARE_LIMIT: Decimal = dec!(0.35);
const TRANSPORT_SHARE_LIMIT: Decimal = dec!(0.15);
const MIN_SAVINGS_RATE: Decimal = dec!(0.10);

/// Spending category of a cost-of-living budget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKind {
    Housing,
    Transport,
    Food,
    Health,
    Education,
    Leisure,
    Other(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub kind: CategoryKind,
    pub items: Vec<LineItem>,
}

/// Input for the cost-of-living analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetInput {
    /// Monthly income after taxes.
    pub net_income: Money,
    pub categories: Vec<BudgetCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub kind: CategoryKind,
    pub total: Money,
    /// Share of net income this category consumes.
    pub income_share: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetOutput {
    pub net_income: Money,
    pub category_totals: Vec<CategoryTotal>,
    pub total_expenses: Money,
    /// Income minus expenses; negative means overspending.
    pub balance: Money,
    pub savings_rate: Rate,
    /// Ordered advisory alerts, worst habits first.
    pub alerts: Vec<String>,
}

/// Aggregate a monthly budget and flag the classic overspending patterns.
pub fn calculate_budget(input: &BudgetInput) -> FinbrResult<ComputationOutput<BudgetOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    if input.net_income <= Decimal::ZERO {
        return Err(FinbrError::InvalidInput {
            field: "net_income".into(),
            reason: "Net income must be positive".into(),
        });
    }
    for category in &input.categories {
        for item in &category.items {
            if item.amount < Decimal::ZERO {
                return Err(FinbrError::InvalidInput {
                    field: "categories".into(),
                    reason: format!("'{}' has a negative amount", item.label),
                });
            }
        }
    }

    let category_totals: Vec<CategoryTotal> = input
        .categories
        .iter()
        .map(|category| {
            let total: Money = category.items.iter().map(|i| i.amount).sum();
            CategoryTotal {
                kind: category.kind.clone(),
                total,
                income_share: total / input.net_income,
            }
        })
        .collect();

    let total_expenses: Money = category_totals.iter().map(|c| c.total).sum();
    let balance = input.net_income - total_expenses;
    let savings_rate = balance / input.net_income;

    let mut alerts = Vec::new();
    if balance < Decimal::ZERO {
        alerts.push("Negative balance: expenses exceed the net income".to_string());
    }
    for category in &category_totals {
        match category.kind {
            CategoryKind::Housing if category.income_share > HOUSING_SHARE_LIMIT => {
                alerts.push("Housing costs exceed 35% of the net income".to_string());
            }
            CategoryKind::Transport if category.income_share > TRANSPORT_SHARE_LIMIT => {
                alerts.push("Transport costs exceed 15% of the net income".to_string());
            }
            _ => {}
        }
    }
    if savings_rate < MIN_SAVINGS_RATE {
        alerts.push("Savings rate below 10% of the net income".to_string());
    }

    let result = BudgetOutput {
        net_income: input.net_income,
        category_totals,
        total_expenses,
        balance,
        savings_rate,
        alerts,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cost-of-living aggregation with share-of-income advisories",
        input,
        warnings,
        elapsed,
        result,
    ))
}
