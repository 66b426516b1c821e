//! Monthly budget: income, savings, and two lists of named amounts.

pub mod board;
pub mod model;
pub mod view;

pub use board::BudgetBoard;
pub use model::{BudgetRow, LineItem, LineKind, MonthBudget};
pub use view::BudgetMonthView;
