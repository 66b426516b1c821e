//! `RemoteStore` trait: the table service the planner mirrors.
//!
//! One method group per table. Bulk reads return every row; there is no
//! filtering by period and no pagination. Inserts return the new row id;
//! updates and deletes are keyed by that id and report whether a row matched.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::budget::model::{BudgetRow, MonthBudget};
use crate::calendar::model::{CalendarEvent, CalendarEventRow};
use crate::diary::model::{DiaryEntry, DiaryRow};
use crate::error::StoreError;
use crate::habits::model::{Habit, HabitRow};
use crate::period::DAYS_PER_WEEK;
use crate::record::RemoteId;
use crate::todos::model::{Todo, TodoRow};

/// Backend-agnostic remote store covering all planner tables.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    // ── To-dos ──────────────────────────────────────────────────────

    /// Read every to-do row.
    async fn list_todos(&self) -> Result<Vec<TodoRow>, StoreError>;

    /// Insert a to-do under a week key and day slot.
    async fn insert_todo(
        &self,
        week_key: &str,
        day_index: usize,
        todo: &Todo,
    ) -> Result<RemoteId, StoreError>;

    /// Update only the `done` column.
    async fn update_todo_done(&self, id: RemoteId, done: bool) -> Result<bool, StoreError>;

    /// Update text, note, and done.
    async fn update_todo(&self, id: RemoteId, todo: &Todo) -> Result<bool, StoreError>;

    async fn delete_todo(&self, id: RemoteId) -> Result<bool, StoreError>;

    /// Delete every to-do of a week. Returns the number of rows removed.
    async fn delete_todo_week(&self, week_key: &str) -> Result<u64, StoreError>;

    // ── Budget ──────────────────────────────────────────────────────

    async fn list_budgets(&self) -> Result<Vec<BudgetRow>, StoreError>;

    async fn insert_budget(
        &self,
        month_key: &str,
        budget: &MonthBudget,
    ) -> Result<RemoteId, StoreError>;

    /// Replace income, expenses, savings, and extra.
    async fn update_budget(&self, id: RemoteId, budget: &MonthBudget) -> Result<bool, StoreError>;

    // ── Habits ──────────────────────────────────────────────────────

    async fn list_habits(&self) -> Result<Vec<HabitRow>, StoreError>;

    async fn insert_habit(&self, week_key: &str, habit: &Habit) -> Result<RemoteId, StoreError>;

    /// Replace the whole day-state array.
    async fn update_habit_days(
        &self,
        id: RemoteId,
        days: &[bool; DAYS_PER_WEEK],
    ) -> Result<bool, StoreError>;

    /// Update name and days.
    async fn update_habit(&self, id: RemoteId, habit: &Habit) -> Result<bool, StoreError>;

    async fn delete_habit(&self, id: RemoteId) -> Result<bool, StoreError>;

    /// Delete every habit of a week. Returns the number of rows removed.
    async fn delete_habit_week(&self, week_key: &str) -> Result<u64, StoreError>;

    // ── Diary ───────────────────────────────────────────────────────

    /// Read every diary entry, most recent date first.
    async fn list_diary_entries(&self) -> Result<Vec<DiaryRow>, StoreError>;

    async fn insert_diary_entry(&self, entry: &DiaryEntry) -> Result<RemoteId, StoreError>;

    async fn delete_diary_entry(&self, id: RemoteId) -> Result<bool, StoreError>;

    // ── Calendar ────────────────────────────────────────────────────

    async fn list_calendar_events(&self) -> Result<Vec<CalendarEventRow>, StoreError>;

    async fn insert_calendar_event(
        &self,
        event_date: NaiveDate,
        event: &CalendarEvent,
    ) -> Result<RemoteId, StoreError>;

    async fn delete_calendar_event(&self, id: RemoteId) -> Result<bool, StoreError>;
}
