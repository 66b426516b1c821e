//! Monthly budget data model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::RemoteId;

/// A named amount (an expense or an extra spend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub amount: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }
}

/// One month's budget. Persisted as a single record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBudget {
    #[serde(default)]
    pub income: Decimal,
    #[serde(default)]
    pub expenses: Vec<LineItem>,
    #[serde(default)]
    pub savings: Decimal,
    #[serde(default)]
    pub extra: Vec<LineItem>,
}

fn saturating_total(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .fold(Decimal::ZERO, |acc, item| acc.saturating_add(item.amount))
}

fn checked_total(items: &[LineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.amount))
}

impl MonthBudget {
    /// Sum of expenses, saturating at the `Decimal` range.
    pub fn total_expenses(&self) -> Decimal {
        saturating_total(&self.expenses)
    }

    /// Sum of extra spends, saturating at the `Decimal` range.
    pub fn total_extra(&self) -> Decimal {
        saturating_total(&self.extra)
    }

    /// Final amount left, or `None` when any step of the chain overflows.
    pub fn checked_final_left(&self) -> Option<Decimal> {
        self.income
            .checked_sub(checked_total(&self.expenses)?)?
            .checked_sub(self.savings)?
            .checked_sub(checked_total(&self.extra)?)
    }

    pub fn lines(&self, kind: LineKind) -> &[LineItem] {
        match kind {
            LineKind::Expense => &self.expenses,
            LineKind::Extra => &self.extra,
        }
    }

    pub fn lines_mut(&mut self, kind: LineKind) -> &mut Vec<LineItem> {
        match kind {
            LineKind::Expense => &mut self.expenses,
            LineKind::Extra => &mut self.extra,
        }
    }
}

/// Which list of a month budget a line item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Expense,
    Extra,
}

impl LineKind {
    pub(crate) fn field(self) -> &'static str {
        match self {
            Self::Expense => "expenses",
            Self::Extra => "extra",
        }
    }
}

/// A `budget` table row as returned by a bulk read.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetRow {
    pub id: RemoteId,
    pub month_key: String,
    pub budget: MonthBudget,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn totals_sum_line_items() {
        let budget = MonthBudget {
            income: dec!(3000),
            expenses: vec![LineItem::new("rent", dec!(1200)), LineItem::new("food", dec!(300))],
            savings: dec!(500),
            extra: vec![LineItem::new("misc", dec!(100))],
        };
        assert_eq!(budget.total_expenses(), dec!(1500));
        assert_eq!(budget.total_extra(), dec!(100));
    }

    #[test]
    fn empty_budget_totals_are_zero() {
        let budget = MonthBudget::default();
        assert_eq!(budget.total_expenses(), Decimal::ZERO);
        assert_eq!(budget.total_extra(), Decimal::ZERO);
    }

    #[test]
    fn overflowing_chain_is_detected() {
        let budget = MonthBudget {
            income: Decimal::MAX,
            expenses: vec![LineItem::new("refund", dec!(-1))],
            ..MonthBudget::default()
        };
        assert_eq!(budget.checked_final_left(), None);
        assert_eq!(budget.total_expenses(), dec!(-1));

        let totals = MonthBudget {
            expenses: vec![
                LineItem::new("a", Decimal::MAX),
                LineItem::new("b", Decimal::MAX),
            ],
            ..MonthBudget::default()
        };
        assert_eq!(totals.total_expenses(), Decimal::MAX);
        assert_eq!(totals.checked_final_left(), None);
    }

    #[test]
    fn budget_deserializes_missing_lists_as_empty() {
        let budget: MonthBudget =
            serde_json::from_str(r#"{"income":"2500","savings":"100"}"#).unwrap();
        assert_eq!(budget.income, dec!(2500));
        assert!(budget.expenses.is_empty());
        assert!(budget.extra.is_empty());
    }
}
