//! libSQL backend: async `RemoteStore` implementation.
//!
//! Stands in for the hosted table service: same tables, same row shapes,
//! integer ids handed back from inserts. Supports local file and in-memory
//! databases. Line-item lists and day arrays are stored as JSON text,
//! decimal amounts as text.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use libsql::{Connection, Database as LibSqlDatabase, params};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::budget::model::{BudgetRow, LineItem, MonthBudget};
use crate::calendar::model::{CalendarEvent, CalendarEventRow};
use crate::diary::model::{DiaryEntry, DiaryRow};
use crate::error::StoreError;
use crate::habits::model::{Habit, HabitRow};
use crate::period::DAYS_PER_WEEK;
use crate::record::RemoteId;
use crate::store::migrations;
use crate::store::traits::RemoteStore;
use crate::todos::model::{Todo, TodoRow};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    // Held so the database outlives `conn`; never read directly.
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Connection(format!("Failed to create database directory: {e}"))
                })?;
            }
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db)?;
        migrations::run_migrations(backend.conn()).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests and ephemeral runs).
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                StoreError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        let backend = Self::from_database(db)?;
        migrations::run_migrations(backend.conn()).await?;
        Ok(backend)
    }

    fn from_database(db: LibSqlDatabase) -> Result<Self, StoreError> {
        let conn = db
            .connect()
            .map_err(|e| StoreError::Connection(format!("Failed to create connection: {e}")))?;
        Ok(Self {
            db: Arc::new(db),
            conn,
        })
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run an `INSERT ... RETURNING id` statement and hand back the id.
    async fn insert_returning_id(
        &self,
        op: &str,
        sql: &str,
        params: impl libsql::params::IntoParams + Send,
    ) -> Result<RemoteId, StoreError> {
        let mut rows = self
            .conn()
            .query(sql, params)
            .await
            .map_err(|e| StoreError::Query(format!("{op}: {e}")))?;

        let row = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("{op} row: {e}")))?
            .ok_or_else(|| StoreError::Query(format!("{op}: no id returned")))?;

        let id: i64 = row
            .get(0)
            .map_err(|e| StoreError::Query(format!("{op} id: {e}")))?;
        debug!(op, id, "Row inserted");
        Ok(RemoteId(id))
    }

    /// Run an UPDATE/DELETE and report whether any row matched.
    async fn execute_matched(
        &self,
        op: &str,
        sql: &str,
        params: impl libsql::params::IntoParams + Send,
    ) -> Result<u64, StoreError> {
        let affected = self
            .conn()
            .execute(sql, params)
            .await
            .map_err(|e| StoreError::Query(format!("{op}: {e}")))?;
        debug!(op, affected, "Statement executed");
        Ok(affected)
    }
}

// ── Helper functions ────────────────────────────────────────────────

fn column_error(column: &str, e: libsql::Error) -> StoreError {
    StoreError::Query(format!("{column}: {e}"))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| StoreError::Serialization(format!("{column} '{raw}': {e}")))
}

fn parse_line_items(column: &str, raw: &str) -> Result<Vec<LineItem>, StoreError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| StoreError::Serialization(format!("{column}: {e}")))
}

fn parse_date(column: &str, raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| StoreError::Serialization(format!("{column} '{raw}': {e}")))
}

/// Keep a mapped row, or log and drop it so one bad row does not fail a bulk read.
fn keep_row<T>(table: &str, mapped: Result<T, StoreError>) -> Option<T> {
    match mapped {
        Ok(row) => Some(row),
        Err(e) => {
            warn!(table, error = %e, "Skipping unreadable row");
            None
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Map a libsql Row to a `TodoRow`.
///
/// Column order: 0:id, 1:week_key, 2:day_index, 3:text, 4:note, 5:done
fn row_to_todo(row: &libsql::Row) -> Result<TodoRow, StoreError> {
    let id: i64 = row.get(0).map_err(|e| column_error("todos.id", e))?;
    let week_key: String = row.get(1).map_err(|e| column_error("todos.week_key", e))?;
    let day_index: i64 = row.get(2).map_err(|e| column_error("todos.day_index", e))?;
    let text: String = row.get(3).map_err(|e| column_error("todos.text", e))?;
    let note: String = row.get(4).unwrap_or_default();
    let done: i64 = row.get(5).unwrap_or(0);

    Ok(TodoRow {
        id: RemoteId(id),
        week_key,
        day_index,
        todo: Todo {
            text,
            note,
            done: done != 0,
        },
    })
}

/// Column order: 0:id, 1:month_key, 2:income, 3:expenses, 4:savings, 5:extra
fn row_to_budget(row: &libsql::Row) -> Result<BudgetRow, StoreError> {
    let id: i64 = row.get(0).map_err(|e| column_error("budget.id", e))?;
    let month_key: String = row.get(1).map_err(|e| column_error("budget.month_key", e))?;
    let income: String = row.get(2).unwrap_or_else(|_| "0".to_string());
    let expenses: String = row.get(3).unwrap_or_default();
    let savings: String = row.get(4).unwrap_or_else(|_| "0".to_string());
    let extra: String = row.get(5).unwrap_or_default();

    Ok(BudgetRow {
        id: RemoteId(id),
        month_key,
        budget: MonthBudget {
            income: parse_decimal("budget.income", &income)?,
            expenses: parse_line_items("budget.expenses", &expenses)?,
            savings: parse_decimal("budget.savings", &savings)?,
            extra: parse_line_items("budget.extra", &extra)?,
        },
    })
}

/// Column order: 0:id, 1:week_key, 2:name, 3:days
fn row_to_habit(row: &libsql::Row) -> Result<HabitRow, StoreError> {
    let id: i64 = row.get(0).map_err(|e| column_error("habits.id", e))?;
    let week_key: String = row.get(1).map_err(|e| column_error("habits.week_key", e))?;
    let name: String = row.get(2).map_err(|e| column_error("habits.name", e))?;
    let days_raw: Option<String> = row.get(3).ok();

    let days = match days_raw.as_deref().map(serde_json::from_str::<[bool; DAYS_PER_WEEK]>) {
        Some(Ok(days)) => days,
        Some(Err(e)) => {
            warn!(id, error = %e, "Malformed habit days, resetting to unchecked");
            [false; DAYS_PER_WEEK]
        }
        None => [false; DAYS_PER_WEEK],
    };

    Ok(HabitRow {
        id: RemoteId(id),
        week_key,
        habit: Habit { name, days },
    })
}

/// Column order: 0:id, 1:date, 2:text
fn row_to_diary(row: &libsql::Row) -> Result<DiaryRow, StoreError> {
    let id: i64 = row.get(0).map_err(|e| column_error("diary_entries.id", e))?;
    let date: String = row.get(1).map_err(|e| column_error("diary_entries.date", e))?;
    let text: String = row.get(2).map_err(|e| column_error("diary_entries.text", e))?;

    Ok(DiaryRow {
        id: RemoteId(id),
        entry: DiaryEntry {
            date: parse_date("diary_entries.date", &date)?,
            text,
        },
    })
}

/// Column order: 0:id, 1:event_date, 2:title, 3:note
fn row_to_event(row: &libsql::Row) -> Result<CalendarEventRow, StoreError> {
    let id: i64 = row.get(0).map_err(|e| column_error("calendar_events.id", e))?;
    let date: String = row
        .get(1)
        .map_err(|e| column_error("calendar_events.event_date", e))?;
    let title: String = row
        .get(2)
        .map_err(|e| column_error("calendar_events.title", e))?;
    let note: String = row.get(3).unwrap_or_default();

    Ok(CalendarEventRow {
        id: RemoteId(id),
        event_date: parse_date("calendar_events.event_date", &date)?,
        event: CalendarEvent { title, note },
    })
}

#[async_trait]
impl RemoteStore for LibSqlBackend {
    // ── To-dos ──────────────────────────────────────────────────────

    async fn list_todos(&self) -> Result<Vec<TodoRow>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, week_key, day_index, text, note, done FROM todos ORDER BY id ASC",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("list_todos: {e}")))?;

        let mut todos = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("list_todos row: {e}")))?
        {
            todos.extend(keep_row("todos", row_to_todo(&row)));
        }
        Ok(todos)
    }

    async fn insert_todo(
        &self,
        week_key: &str,
        day_index: usize,
        todo: &Todo,
    ) -> Result<RemoteId, StoreError> {
        self.insert_returning_id(
            "insert_todo",
            "INSERT INTO todos (week_key, day_index, text, note, done)
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
            params![
                week_key,
                day_index as i64,
                todo.text.as_str(),
                todo.note.as_str(),
                todo.done as i64,
            ],
        )
        .await
    }

    async fn update_todo_done(&self, id: RemoteId, done: bool) -> Result<bool, StoreError> {
        let affected = self
            .execute_matched(
                "update_todo_done",
                "UPDATE todos SET done = ?1 WHERE id = ?2",
                params![done as i64, id.0],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn update_todo(&self, id: RemoteId, todo: &Todo) -> Result<bool, StoreError> {
        let affected = self
            .execute_matched(
                "update_todo",
                "UPDATE todos SET text = ?1, note = ?2, done = ?3 WHERE id = ?4",
                params![todo.text.as_str(), todo.note.as_str(), todo.done as i64, id.0],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn delete_todo(&self, id: RemoteId) -> Result<bool, StoreError> {
        let affected = self
            .execute_matched("delete_todo", "DELETE FROM todos WHERE id = ?1", params![id.0])
            .await?;
        Ok(affected > 0)
    }

    async fn delete_todo_week(&self, week_key: &str) -> Result<u64, StoreError> {
        self.execute_matched(
            "delete_todo_week",
            "DELETE FROM todos WHERE week_key = ?1",
            params![week_key],
        )
        .await
    }

    // ── Budget ──────────────────────────────────────────────────────

    async fn list_budgets(&self) -> Result<Vec<BudgetRow>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, month_key, income, expenses, savings, extra FROM budget ORDER BY id ASC",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("list_budgets: {e}")))?;

        let mut budgets = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("list_budgets row: {e}")))?
        {
            budgets.extend(keep_row("budget", row_to_budget(&row)));
        }
        Ok(budgets)
    }

    async fn insert_budget(
        &self,
        month_key: &str,
        budget: &MonthBudget,
    ) -> Result<RemoteId, StoreError> {
        let expenses = to_json(&budget.expenses)?;
        let extra = to_json(&budget.extra)?;
        self.insert_returning_id(
            "insert_budget",
            "INSERT INTO budget (month_key, income, expenses, savings, extra)
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
            params![
                month_key,
                budget.income.to_string(),
                expenses,
                budget.savings.to_string(),
                extra,
            ],
        )
        .await
    }

    async fn update_budget(&self, id: RemoteId, budget: &MonthBudget) -> Result<bool, StoreError> {
        let expenses = to_json(&budget.expenses)?;
        let extra = to_json(&budget.extra)?;
        let affected = self
            .execute_matched(
                "update_budget",
                "UPDATE budget SET income = ?1, expenses = ?2, savings = ?3, extra = ?4 WHERE id = ?5",
                params![
                    budget.income.to_string(),
                    expenses,
                    budget.savings.to_string(),
                    extra,
                    id.0,
                ],
            )
            .await?;
        Ok(affected > 0)
    }

    // ── Habits ──────────────────────────────────────────────────────

    async fn list_habits(&self) -> Result<Vec<HabitRow>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, week_key, name, days FROM habits ORDER BY id ASC",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("list_habits: {e}")))?;

        let mut habits = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("list_habits row: {e}")))?
        {
            habits.extend(keep_row("habits", row_to_habit(&row)));
        }
        Ok(habits)
    }

    async fn insert_habit(&self, week_key: &str, habit: &Habit) -> Result<RemoteId, StoreError> {
        let days = to_json(&habit.days)?;
        self.insert_returning_id(
            "insert_habit",
            "INSERT INTO habits (week_key, name, days) VALUES (?1, ?2, ?3) RETURNING id",
            params![week_key, habit.name.as_str(), days],
        )
        .await
    }

    async fn update_habit_days(
        &self,
        id: RemoteId,
        days: &[bool; DAYS_PER_WEEK],
    ) -> Result<bool, StoreError> {
        let days = to_json(days)?;
        let affected = self
            .execute_matched(
                "update_habit_days",
                "UPDATE habits SET days = ?1 WHERE id = ?2",
                params![days, id.0],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn update_habit(&self, id: RemoteId, habit: &Habit) -> Result<bool, StoreError> {
        let days = to_json(&habit.days)?;
        let affected = self
            .execute_matched(
                "update_habit",
                "UPDATE habits SET name = ?1, days = ?2 WHERE id = ?3",
                params![habit.name.as_str(), days, id.0],
            )
            .await?;
        Ok(affected > 0)
    }

    async fn delete_habit(&self, id: RemoteId) -> Result<bool, StoreError> {
        let affected = self
            .execute_matched("delete_habit", "DELETE FROM habits WHERE id = ?1", params![id.0])
            .await?;
        Ok(affected > 0)
    }

    async fn delete_habit_week(&self, week_key: &str) -> Result<u64, StoreError> {
        self.execute_matched(
            "delete_habit_week",
            "DELETE FROM habits WHERE week_key = ?1",
            params![week_key],
        )
        .await
    }

    // ── Diary ───────────────────────────────────────────────────────

    async fn list_diary_entries(&self) -> Result<Vec<DiaryRow>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, date, text FROM diary_entries ORDER BY date DESC, id DESC",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("list_diary_entries: {e}")))?;

        let mut entries = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("list_diary_entries row: {e}")))?
        {
            entries.extend(keep_row("diary_entries", row_to_diary(&row)));
        }
        Ok(entries)
    }

    async fn insert_diary_entry(&self, entry: &DiaryEntry) -> Result<RemoteId, StoreError> {
        self.insert_returning_id(
            "insert_diary_entry",
            "INSERT INTO diary_entries (date, text) VALUES (?1, ?2) RETURNING id",
            params![format_date(entry.date), entry.text.as_str()],
        )
        .await
    }

    async fn delete_diary_entry(&self, id: RemoteId) -> Result<bool, StoreError> {
        let affected = self
            .execute_matched(
                "delete_diary_entry",
                "DELETE FROM diary_entries WHERE id = ?1",
                params![id.0],
            )
            .await?;
        Ok(affected > 0)
    }

    // ── Calendar ────────────────────────────────────────────────────

    async fn list_calendar_events(&self) -> Result<Vec<CalendarEventRow>, StoreError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, event_date, title, note FROM calendar_events ORDER BY id ASC",
                (),
            )
            .await
            .map_err(|e| StoreError::Query(format!("list_calendar_events: {e}")))?;

        let mut events = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| StoreError::Query(format!("list_calendar_events row: {e}")))?
        {
            events.extend(keep_row("calendar_events", row_to_event(&row)));
        }
        Ok(events)
    }

    async fn insert_calendar_event(
        &self,
        event_date: NaiveDate,
        event: &CalendarEvent,
    ) -> Result<RemoteId, StoreError> {
        self.insert_returning_id(
            "insert_calendar_event",
            "INSERT INTO calendar_events (event_date, title, note) VALUES (?1, ?2, ?3) RETURNING id",
            params![format_date(event_date), event.title.as_str(), event.note.as_str()],
        )
        .await
    }

    async fn delete_calendar_event(&self, id: RemoteId) -> Result<bool, StoreError> {
        let affected = self
            .execute_matched(
                "delete_calendar_event",
                "DELETE FROM calendar_events WHERE id = ?1",
                params![id.0],
            )
            .await?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    async fn test_db() -> LibSqlBackend {
        LibSqlBackend::new_memory().await.unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── To-do tests ─────────────────────────────────────────────────

    #[tokio::test]
    async fn insert_and_list_todo() {
        let db = test_db().await;
        let id = db
            .insert_todo("2026-W43", 2, &Todo::new("Buy milk", "semi-skimmed"))
            .await
            .unwrap();

        let rows = db.list_todos().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].week_key, "2026-W43");
        assert_eq!(rows[0].day_index, 2);
        assert_eq!(rows[0].todo.text, "Buy milk");
        assert_eq!(rows[0].todo.note, "semi-skimmed");
        assert!(!rows[0].todo.done);
    }

    #[tokio::test]
    async fn inserts_return_distinct_ids() {
        let db = test_db().await;
        let a = db.insert_todo("2026-W43", 0, &Todo::new("a", "")).await.unwrap();
        let b = db.insert_todo("2026-W43", 0, &Todo::new("b", "")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn update_todo_done_and_fields() {
        let db = test_db().await;
        let id = db.insert_todo("2026-W43", 0, &Todo::new("Draft", "")).await.unwrap();

        assert!(db.update_todo_done(id, true).await.unwrap());
        assert!(db.list_todos().await.unwrap()[0].todo.done);

        let edited = Todo {
            text: "Final".into(),
            note: "ship it".into(),
            done: false,
        };
        assert!(db.update_todo(id, &edited).await.unwrap());
        assert_eq!(db.list_todos().await.unwrap()[0].todo, edited);
    }

    #[tokio::test]
    async fn update_missing_todo_reports_no_match() {
        let db = test_db().await;
        assert!(!db.update_todo_done(RemoteId(999), true).await.unwrap());
        assert!(!db.delete_todo(RemoteId(999)).await.unwrap());
    }

    #[tokio::test]
    async fn delete_todo_week_only_touches_that_week() {
        let db = test_db().await;
        db.insert_todo("2026-W43", 0, &Todo::new("a", "")).await.unwrap();
        db.insert_todo("2026-W43", 3, &Todo::new("b", "")).await.unwrap();
        db.insert_todo("2026-W44", 1, &Todo::new("c", "")).await.unwrap();

        let removed = db.delete_todo_week("2026-W43").await.unwrap();
        assert_eq!(removed, 2);

        let rows = db.list_todos().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].week_key, "2026-W44");
    }

    // ── Budget tests ────────────────────────────────────────────────

    #[tokio::test]
    async fn budget_round_trips_decimals_and_lists() {
        let db = test_db().await;
        let budget = MonthBudget {
            income: dec!(3000.50),
            expenses: vec![LineItem::new("rent", dec!(1200))],
            savings: dec!(500),
            extra: vec![LineItem::new("misc", dec!(99.99))],
        };
        let id = db.insert_budget("2026-10", &budget).await.unwrap();

        let rows = db.list_budgets().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].month_key, "2026-10");
        assert_eq!(rows[0].budget, budget);
    }

    #[tokio::test]
    async fn update_budget_replaces_record() {
        let db = test_db().await;
        let id = db
            .insert_budget("2026-10", &MonthBudget::default())
            .await
            .unwrap();

        let mut budget = MonthBudget::default();
        budget.income = dec!(2000);
        budget.expenses.push(LineItem::new("food", dec!(300)));
        assert!(db.update_budget(id, &budget).await.unwrap());

        assert_eq!(db.list_budgets().await.unwrap()[0].budget, budget);
    }

    // ── Habit tests ─────────────────────────────────────────────────

    #[tokio::test]
    async fn habit_days_round_trip() {
        let db = test_db().await;
        let id = db.insert_habit("2026-W43", &Habit::new("Run")).await.unwrap();

        let days = [true, false, true, false, false, false, true];
        assert!(db.update_habit_days(id, &days).await.unwrap());

        let rows = db.list_habits().await.unwrap();
        assert_eq!(rows[0].habit.days, days);
        assert_eq!(rows[0].habit.name, "Run");
    }

    #[tokio::test]
    async fn malformed_habit_days_reset_to_unchecked() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO habits (week_key, name, days) VALUES ('2026-W43', 'Read', 'oops')",
                (),
            )
            .await
            .unwrap();

        let rows = db.list_habits().await.unwrap();
        assert_eq!(rows[0].habit.days, [false; 7]);
    }

    #[tokio::test]
    async fn delete_habit_and_week() {
        let db = test_db().await;
        let a = db.insert_habit("2026-W43", &Habit::new("a")).await.unwrap();
        db.insert_habit("2026-W43", &Habit::new("b")).await.unwrap();
        db.insert_habit("2026-W42", &Habit::new("c")).await.unwrap();

        assert!(db.delete_habit(a).await.unwrap());
        assert_eq!(db.delete_habit_week("2026-W43").await.unwrap(), 1);
        assert_eq!(db.list_habits().await.unwrap().len(), 1);
    }

    // ── Diary tests ─────────────────────────────────────────────────

    #[tokio::test]
    async fn diary_entries_list_newest_date_first() {
        let db = test_db().await;
        for (d, text) in [(1, "first"), (15, "middle"), (9, "second")] {
            db.insert_diary_entry(&DiaryEntry {
                date: date(2026, 10, d),
                text: text.into(),
            })
            .await
            .unwrap();
        }

        let texts: Vec<String> = db
            .list_diary_entries()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.entry.text)
            .collect();
        assert_eq!(texts, vec!["middle", "second", "first"]);
    }

    #[tokio::test]
    async fn delete_diary_entry() {
        let db = test_db().await;
        let id = db
            .insert_diary_entry(&DiaryEntry {
                date: date(2026, 10, 18),
                text: "hello".into(),
            })
            .await
            .unwrap();
        assert!(db.delete_diary_entry(id).await.unwrap());
        assert!(db.list_diary_entries().await.unwrap().is_empty());
    }

    // ── Calendar tests ──────────────────────────────────────────────

    #[tokio::test]
    async fn calendar_event_round_trip() {
        let db = test_db().await;
        let event = CalendarEvent {
            title: "Dentist".into(),
            note: "10am".into(),
        };
        let id = db
            .insert_calendar_event(date(2026, 11, 3), &event)
            .await
            .unwrap();

        let rows = db.list_calendar_events().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].event_date, date(2026, 11, 3));
        assert_eq!(rows[0].event, event);

        assert!(db.delete_calendar_event(id).await.unwrap());
        assert!(db.list_calendar_events().await.unwrap().is_empty());
    }

    // ── Unreadable rows ─────────────────────────────────────────────

    #[tokio::test]
    async fn bad_event_date_skips_only_that_row() {
        let db = test_db().await;
        let event = CalendarEvent {
            title: "Dentist".into(),
            note: String::new(),
        };
        let id = db
            .insert_calendar_event(date(2026, 10, 20), &event)
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO calendar_events (event_date, title) VALUES ('2026-10-32', 'Broken')",
                (),
            )
            .await
            .unwrap();

        let rows = db.list_calendar_events().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
    }

    #[tokio::test]
    async fn bad_diary_date_skips_only_that_row() {
        let db = test_db().await;
        db.insert_diary_entry(&DiaryEntry {
            date: date(2026, 10, 18),
            text: "kept".into(),
        })
        .await
        .unwrap();
        db.conn()
            .execute(
                "INSERT INTO diary_entries (date, text) VALUES ('someday', 'lost')",
                (),
            )
            .await
            .unwrap();

        let rows = db.list_diary_entries().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entry.text, "kept");
    }

    #[tokio::test]
    async fn bad_budget_amount_skips_only_that_row() {
        let db = test_db().await;
        db.insert_budget(
            "2026-10",
            &MonthBudget {
                income: dec!(100),
                ..MonthBudget::default()
            },
        )
        .await
        .unwrap();
        db.conn()
            .execute(
                "INSERT INTO budget (month_key, income, expenses) VALUES ('2026-11', 'lots', '[]')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO budget (month_key, expenses) VALUES ('2026-12', 'not json')",
                (),
            )
            .await
            .unwrap();

        let rows = db.list_budgets().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month_key, "2026-10");
    }
}
