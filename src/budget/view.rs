//! Month rendering for the budget board.

use rust_decimal::Decimal;
use serde::Serialize;

use super::model::{LineItem, MonthBudget};
use crate::period::MonthKey;
use crate::record::Record;

#[derive(Debug, Clone, Serialize)]
pub struct LineItemView {
    pub index: usize,
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BudgetMonthView {
    pub month: MonthKey,
    pub offset: i32,
    pub saved: bool,
    pub income: Decimal,
    pub savings: Decimal,
    pub expenses: Vec<LineItemView>,
    pub extra: Vec<LineItemView>,
    pub total_expenses: Decimal,
    pub left_after_expenses: Decimal,
    pub left_after_savings: Decimal,
    pub total_extra: Decimal,
    pub final_left: Decimal,
}

fn line_views(items: &[LineItem]) -> Vec<LineItemView> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| LineItemView {
            index,
            name: item.name.clone(),
            amount: item.amount,
        })
        .collect()
}

/// Render a month. A month with no mirror entry renders as all zeros.
///
/// Derived amounts saturate at the `Decimal` range, so a month loaded with
/// out-of-range data still renders.
pub fn render_month(
    record: Option<&Record<MonthBudget>>,
    month: MonthKey,
    offset: i32,
) -> BudgetMonthView {
    let empty = MonthBudget::default();
    let budget = record.map_or(&empty, |r| &r.data);

    let total_expenses = budget.total_expenses();
    let left_after_expenses = budget.income.saturating_sub(total_expenses);
    let left_after_savings = left_after_expenses.saturating_sub(budget.savings);
    let total_extra = budget.total_extra();

    BudgetMonthView {
        month,
        offset,
        saved: record.is_some_and(Record::is_saved),
        income: budget.income,
        savings: budget.savings,
        expenses: line_views(&budget.expenses),
        extra: line_views(&budget.extra),
        total_expenses,
        left_after_expenses,
        left_after_savings,
        total_extra,
        final_left: left_after_savings.saturating_sub(total_extra),
    }
}
