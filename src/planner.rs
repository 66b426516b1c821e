//! Planner: owns one board per planning view over a shared store.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::budget::BudgetBoard;
use crate::calendar::CalendarBoard;
use crate::diary::DiaryBoard;
use crate::habits::HabitBoard;
use crate::period::{Clock, WeekNumbering};
use crate::store::RemoteStore;
use crate::todos::TodoBoard;

/// Counts reported by [`Planner::load_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub todos: usize,
    pub budgets: usize,
    pub habits: usize,
    pub diary_entries: usize,
    pub calendar_events: usize,
    /// Boards whose bulk read failed; they start empty.
    pub failed: Vec<&'static str>,
}

/// Records reconciled by [`Planner::sync_pending`], per board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub todos: usize,
    pub budgets: usize,
    pub habits: usize,
    pub diary_entries: usize,
    pub calendar_events: usize,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.todos + self.budgets + self.habits + self.diary_entries + self.calendar_events
    }
}

pub struct Planner {
    pub todos: TodoBoard,
    pub budget: BudgetBoard,
    pub habits: HabitBoard,
    pub diary: DiaryBoard,
    pub calendar: CalendarBoard,
}

impl Planner {
    pub fn new(store: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>, numbering: WeekNumbering) -> Self {
        Self {
            todos: TodoBoard::new(Arc::clone(&store), Arc::clone(&clock), numbering),
            budget: BudgetBoard::new(Arc::clone(&store), Arc::clone(&clock)),
            habits: HabitBoard::new(Arc::clone(&store), Arc::clone(&clock), numbering),
            diary: DiaryBoard::new(Arc::clone(&store)),
            calendar: CalendarBoard::new(store, clock),
        }
    }

    /// Bulk-read every table into its board.
    ///
    /// Boards load independently: a failed read is logged and that board
    /// starts empty.
    pub async fn load_all(&mut self) -> LoadSummary {
        let mut summary = LoadSummary::default();

        match self.todos.load().await {
            Ok(n) => summary.todos = n,
            Err(e) => {
                error!(table = "todos", error = %e, "Failed to load");
                summary.failed.push("todos");
            }
        }
        match self.budget.load().await {
            Ok(n) => summary.budgets = n,
            Err(e) => {
                error!(table = "budget", error = %e, "Failed to load");
                summary.failed.push("budget");
            }
        }
        match self.habits.load().await {
            Ok(n) => summary.habits = n,
            Err(e) => {
                error!(table = "habits", error = %e, "Failed to load");
                summary.failed.push("habits");
            }
        }
        match self.diary.load().await {
            Ok(n) => summary.diary_entries = n,
            Err(e) => {
                error!(table = "diary_entries", error = %e, "Failed to load");
                summary.failed.push("diary_entries");
            }
        }
        match self.calendar.load().await {
            Ok(n) => summary.calendar_events = n,
            Err(e) => {
                error!(table = "calendar_events", error = %e, "Failed to load");
                summary.failed.push("calendar_events");
            }
        }

        info!(
            todos = summary.todos,
            budgets = summary.budgets,
            habits = summary.habits,
            diary_entries = summary.diary_entries,
            calendar_events = summary.calendar_events,
            failed = summary.failed.len(),
            "Planner loaded"
        );
        summary
    }

    /// Insert every record whose earlier insert failed.
    pub async fn sync_pending(&mut self) -> SyncSummary {
        let summary = SyncSummary {
            todos: self.todos.sync_pending().await,
            budgets: self.budget.sync_pending().await,
            habits: self.habits.sync_pending().await,
            diary_entries: self.diary.sync_pending().await,
            calendar_events: self.calendar.sync_pending().await,
        };
        info!(synced = summary.total(), "Pending records synced");
        summary
    }
}
