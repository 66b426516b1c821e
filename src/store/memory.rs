//! In-memory `RemoteStore` with a call log.
//!
//! Used by tests that need to assert which remote calls a handler issued.
//! Every call is logged before it runs, including calls made while the
//! store is switched offline.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::budget::model::{BudgetRow, MonthBudget};
use crate::calendar::model::{CalendarEvent, CalendarEventRow};
use crate::diary::model::{DiaryEntry, DiaryRow};
use crate::error::StoreError;
use crate::habits::model::{Habit, HabitRow};
use crate::period::DAYS_PER_WEEK;
use crate::record::RemoteId;
use crate::store::traits::RemoteStore;
use crate::todos::model::{Todo, TodoRow};

/// One remote call as seen by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List { table: &'static str },
    Insert { table: &'static str },
    /// `fields` names the columns written, comma separated.
    Update {
        table: &'static str,
        id: RemoteId,
        fields: &'static str,
    },
    Delete { table: &'static str, id: RemoteId },
    DeleteWeek { table: &'static str, week_key: String },
}

impl StoreCall {
    pub fn table(&self) -> &'static str {
        match self {
            Self::List { table }
            | Self::Insert { table }
            | Self::Update { table, .. }
            | Self::Delete { table, .. }
            | Self::DeleteWeek { table, .. } => table,
        }
    }

    /// Whether this call writes to the store.
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::List { .. })
    }
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    todos: BTreeMap<RemoteId, TodoRow>,
    budget: BTreeMap<RemoteId, BudgetRow>,
    habits: BTreeMap<RemoteId, HabitRow>,
    diary_entries: BTreeMap<RemoteId, DiaryRow>,
    calendar_events: BTreeMap<RemoteId, CalendarEventRow>,
    calls: Vec<StoreCall>,
}

impl Tables {
    fn allocate_id(&mut self) -> RemoteId {
        self.next_id += 1;
        RemoteId(self.next_id)
    }
}

/// Remote store held entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Every call received so far, oldest first.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.tables.lock().await.calls.clone()
    }

    /// Write calls received so far.
    pub async fn writes(&self) -> Vec<StoreCall> {
        self.calls().await.into_iter().filter(StoreCall::is_write).collect()
    }

    pub async fn clear_calls(&self) {
        self.tables.lock().await.calls.clear();
    }

    pub async fn todo_rows(&self) -> Vec<TodoRow> {
        self.tables.lock().await.todos.values().cloned().collect()
    }

    pub async fn budget_rows(&self) -> Vec<BudgetRow> {
        self.tables.lock().await.budget.values().cloned().collect()
    }

    pub async fn habit_rows(&self) -> Vec<HabitRow> {
        self.tables.lock().await.habits.values().cloned().collect()
    }

    pub async fn diary_rows(&self) -> Vec<DiaryRow> {
        self.tables.lock().await.diary_entries.values().cloned().collect()
    }

    pub async fn calendar_rows(&self) -> Vec<CalendarEventRow> {
        self.tables
            .lock()
            .await
            .calendar_events
            .values()
            .cloned()
            .collect()
    }

    /// Lock the tables, log `call`, and fail if offline.
    async fn begin(
        &self,
        call: StoreCall,
    ) -> Result<tokio::sync::MutexGuard<'_, Tables>, StoreError> {
        let mut tables = self.tables.lock().await;
        let table = call.table();
        tables.calls.push(call);
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{table}: memory store offline")));
        }
        Ok(tables)
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    // ── To-dos ──────────────────────────────────────────────────────

    async fn list_todos(&self) -> Result<Vec<TodoRow>, StoreError> {
        let tables = self.begin(StoreCall::List { table: "todos" }).await?;
        Ok(tables.todos.values().cloned().collect())
    }

    async fn insert_todo(
        &self,
        week_key: &str,
        day_index: usize,
        todo: &Todo,
    ) -> Result<RemoteId, StoreError> {
        let mut tables = self.begin(StoreCall::Insert { table: "todos" }).await?;
        let id = tables.allocate_id();
        tables.todos.insert(
            id,
            TodoRow {
                id,
                week_key: week_key.to_string(),
                day_index: day_index as i64,
                todo: todo.clone(),
            },
        );
        Ok(id)
    }

    async fn update_todo_done(&self, id: RemoteId, done: bool) -> Result<bool, StoreError> {
        let mut tables = self
            .begin(StoreCall::Update {
                table: "todos",
                id,
                fields: "done",
            })
            .await?;
        Ok(tables
            .todos
            .get_mut(&id)
            .map(|row| row.todo.done = done)
            .is_some())
    }

    async fn update_todo(&self, id: RemoteId, todo: &Todo) -> Result<bool, StoreError> {
        let mut tables = self
            .begin(StoreCall::Update {
                table: "todos",
                id,
                fields: "text,note,done",
            })
            .await?;
        Ok(tables
            .todos
            .get_mut(&id)
            .map(|row| row.todo = todo.clone())
            .is_some())
    }

    async fn delete_todo(&self, id: RemoteId) -> Result<bool, StoreError> {
        let mut tables = self.begin(StoreCall::Delete { table: "todos", id }).await?;
        Ok(tables.todos.remove(&id).is_some())
    }

    async fn delete_todo_week(&self, week_key: &str) -> Result<u64, StoreError> {
        let mut tables = self
            .begin(StoreCall::DeleteWeek {
                table: "todos",
                week_key: week_key.to_string(),
            })
            .await?;
        let before = tables.todos.len();
        tables.todos.retain(|_, row| row.week_key != week_key);
        Ok((before - tables.todos.len()) as u64)
    }

    // ── Budget ──────────────────────────────────────────────────────

    async fn list_budgets(&self) -> Result<Vec<BudgetRow>, StoreError> {
        let tables = self.begin(StoreCall::List { table: "budget" }).await?;
        Ok(tables.budget.values().cloned().collect())
    }

    async fn insert_budget(
        &self,
        month_key: &str,
        budget: &MonthBudget,
    ) -> Result<RemoteId, StoreError> {
        let mut tables = self.begin(StoreCall::Insert { table: "budget" }).await?;
        let id = tables.allocate_id();
        tables.budget.insert(
            id,
            BudgetRow {
                id,
                month_key: month_key.to_string(),
                budget: budget.clone(),
            },
        );
        Ok(id)
    }

    async fn update_budget(&self, id: RemoteId, budget: &MonthBudget) -> Result<bool, StoreError> {
        let mut tables = self
            .begin(StoreCall::Update {
                table: "budget",
                id,
                fields: "income,expenses,savings,extra",
            })
            .await?;
        Ok(tables
            .budget
            .get_mut(&id)
            .map(|row| row.budget = budget.clone())
            .is_some())
    }

    // ── Habits ──────────────────────────────────────────────────────

    async fn list_habits(&self) -> Result<Vec<HabitRow>, StoreError> {
        let tables = self.begin(StoreCall::List { table: "habits" }).await?;
        Ok(tables.habits.values().cloned().collect())
    }

    async fn insert_habit(&self, week_key: &str, habit: &Habit) -> Result<RemoteId, StoreError> {
        let mut tables = self.begin(StoreCall::Insert { table: "habits" }).await?;
        let id = tables.allocate_id();
        tables.habits.insert(
            id,
            HabitRow {
                id,
                week_key: week_key.to_string(),
                habit: habit.clone(),
            },
        );
        Ok(id)
    }

    async fn update_habit_days(
        &self,
        id: RemoteId,
        days: &[bool; DAYS_PER_WEEK],
    ) -> Result<bool, StoreError> {
        let mut tables = self
            .begin(StoreCall::Update {
                table: "habits",
                id,
                fields: "days",
            })
            .await?;
        Ok(tables
            .habits
            .get_mut(&id)
            .map(|row| row.habit.days = *days)
            .is_some())
    }

    async fn update_habit(&self, id: RemoteId, habit: &Habit) -> Result<bool, StoreError> {
        let mut tables = self
            .begin(StoreCall::Update {
                table: "habits",
                id,
                fields: "name,days",
            })
            .await?;
        Ok(tables
            .habits
            .get_mut(&id)
            .map(|row| row.habit = habit.clone())
            .is_some())
    }

    async fn delete_habit(&self, id: RemoteId) -> Result<bool, StoreError> {
        let mut tables = self.begin(StoreCall::Delete { table: "habits", id }).await?;
        Ok(tables.habits.remove(&id).is_some())
    }

    async fn delete_habit_week(&self, week_key: &str) -> Result<u64, StoreError> {
        let mut tables = self
            .begin(StoreCall::DeleteWeek {
                table: "habits",
                week_key: week_key.to_string(),
            })
            .await?;
        let before = tables.habits.len();
        tables.habits.retain(|_, row| row.week_key != week_key);
        Ok((before - tables.habits.len()) as u64)
    }

    // ── Diary ───────────────────────────────────────────────────────

    async fn list_diary_entries(&self) -> Result<Vec<DiaryRow>, StoreError> {
        let tables = self
            .begin(StoreCall::List {
                table: "diary_entries",
            })
            .await?;
        let mut rows: Vec<DiaryRow> = tables.diary_entries.values().cloned().collect();
        rows.sort_by(|a, b| b.entry.date.cmp(&a.entry.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert_diary_entry(&self, entry: &DiaryEntry) -> Result<RemoteId, StoreError> {
        let mut tables = self
            .begin(StoreCall::Insert {
                table: "diary_entries",
            })
            .await?;
        let id = tables.allocate_id();
        tables.diary_entries.insert(
            id,
            DiaryRow {
                id,
                entry: entry.clone(),
            },
        );
        Ok(id)
    }

    async fn delete_diary_entry(&self, id: RemoteId) -> Result<bool, StoreError> {
        let mut tables = self
            .begin(StoreCall::Delete {
                table: "diary_entries",
                id,
            })
            .await?;
        Ok(tables.diary_entries.remove(&id).is_some())
    }

    // ── Calendar ────────────────────────────────────────────────────

    async fn list_calendar_events(&self) -> Result<Vec<CalendarEventRow>, StoreError> {
        let tables = self
            .begin(StoreCall::List {
                table: "calendar_events",
            })
            .await?;
        Ok(tables.calendar_events.values().cloned().collect())
    }

    async fn insert_calendar_event(
        &self,
        event_date: NaiveDate,
        event: &CalendarEvent,
    ) -> Result<RemoteId, StoreError> {
        let mut tables = self
            .begin(StoreCall::Insert {
                table: "calendar_events",
            })
            .await?;
        let id = tables.allocate_id();
        tables.calendar_events.insert(
            id,
            CalendarEventRow {
                id,
                event_date,
                event: event.clone(),
            },
        );
        Ok(id)
    }

    async fn delete_calendar_event(&self, id: RemoteId) -> Result<bool, StoreError> {
        let mut tables = self
            .begin(StoreCall::Delete {
                table: "calendar_events",
                id,
            })
            .await?;
        Ok(tables.calendar_events.remove(&id).is_some())
    }
}
