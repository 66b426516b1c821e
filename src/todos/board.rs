//! Weekly to-do board: local mirror plus mutation handlers.
//!
//! The mirror maps a week key to seven day slots. Every mutation is applied
//! to the mirror first and then pushed to the remote store; remote failures
//! are logged and never roll the local change back.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::model::{Todo, TodoRow};
use super::view::{TodoWeekView, render_week};
use crate::error::{Error, Result, StoreError, ValidationError};
use crate::period::{Clock, DAYS_PER_WEEK, WeekKey, WeekNumbering, derive_week_key};
use crate::record::{LocalId, Record};
use crate::store::RemoteStore;

/// Seven day slots of one week, Monday first.
pub type WeekSlots = [Vec<Record<Todo>>; DAYS_PER_WEEK];

pub fn empty_week() -> WeekSlots {
    std::array::from_fn(|_| Vec::new())
}

/// Group bulk-read rows by week key and day slot.
///
/// Rows whose key does not parse or whose day index is outside 0..7 are
/// skipped.
pub fn group_rows(rows: Vec<TodoRow>) -> BTreeMap<WeekKey, WeekSlots> {
    let mut weeks: BTreeMap<WeekKey, WeekSlots> = BTreeMap::new();
    for row in rows {
        let week = match row.week_key.parse::<WeekKey>() {
            Ok(week) => week,
            Err(e) => {
                warn!(id = %row.id, error = %e, "Skipping to-do with invalid week key");
                continue;
            }
        };
        let Some(day) = usize::try_from(row.day_index)
            .ok()
            .filter(|d| *d < DAYS_PER_WEEK)
        else {
            warn!(id = %row.id, day_index = row.day_index, "Skipping to-do with invalid day index");
            continue;
        };
        weeks.entry(week).or_insert_with(empty_week)[day].push(Record::saved(row.id, row.todo));
    }
    weeks
}

pub struct TodoBoard {
    store: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
    numbering: WeekNumbering,
    weeks: BTreeMap<WeekKey, WeekSlots>,
    week_offset: i32,
}

impl TodoBoard {
    pub fn new(store: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>, numbering: WeekNumbering) -> Self {
        Self {
            store,
            clock,
            numbering,
            weeks: BTreeMap::new(),
            week_offset: 0,
        }
    }

    /// Replace the mirror with a bulk read. Returns the number of to-dos loaded.
    pub async fn load(&mut self) -> std::result::Result<usize, StoreError> {
        let rows = self.store.list_todos().await?;
        self.weeks = group_rows(rows);
        let count = self
            .weeks
            .values()
            .flat_map(|week| week.iter())
            .map(Vec::len)
            .sum();
        info!(count, weeks = self.weeks.len(), "To-dos loaded");
        Ok(count)
    }

    pub fn week_offset(&self) -> i32 {
        self.week_offset
    }

    pub fn current_week(&self) -> WeekKey {
        derive_week_key(self.clock.today(), self.week_offset, self.numbering)
    }

    pub fn prev_week(&mut self) -> WeekKey {
        self.week_offset = self.week_offset.saturating_sub(1);
        self.current_week()
    }

    pub fn next_week(&mut self) -> WeekKey {
        self.week_offset = self.week_offset.saturating_add(1);
        self.current_week()
    }

    /// The mirrored slots of a week, if any to-do was ever added to it.
    pub fn week(&self, week: WeekKey) -> Option<&WeekSlots> {
        self.weeks.get(&week)
    }

    pub fn get(&self, id: LocalId) -> Option<&Record<Todo>> {
        self.weeks
            .values()
            .flat_map(|week| week.iter())
            .flat_map(|day| day.iter())
            .find(|r| r.local_id == id)
    }

    /// Render the current week.
    pub fn view(&self) -> TodoWeekView {
        render_week(&self.weeks, self.current_week(), self.week_offset)
    }

    /// Add a to-do to a day of the current week.
    ///
    /// The record is mirrored before the insert is issued. An insert failure
    /// is returned to the caller and the record stays in the mirror unsaved.
    pub async fn add(&mut self, day: usize, text: &str, note: &str) -> Result<LocalId> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Empty { field: "text" }.into());
        }
        if day >= DAYS_PER_WEEK {
            return Err(ValidationError::DayOutOfRange { day }.into());
        }

        let week = self.current_week();
        let todo = Todo::new(text, note.trim());
        let record = Record::unsaved(todo.clone());
        let local_id = record.local_id;
        self.weeks.entry(week).or_insert_with(empty_week)[day].push(record);

        match self.store.insert_todo(&week.to_string(), day, &todo).await {
            Ok(remote_id) => {
                self.attach(local_id, remote_id);
                debug!(%week, day, id = %remote_id, "To-do saved");
                Ok(local_id)
            }
            Err(e) => {
                error!(%week, day, error = %e, "Failed to save to-do");
                Err(e.into())
            }
        }
    }

    /// Flip a to-do's done flag. Persists only the `done` column.
    pub async fn toggle_done(&mut self, id: LocalId) -> Result<bool> {
        let record = self
            .record_mut(id)
            .ok_or_else(|| Error::not_found("to-do", id))?;
        record.data.done = !record.data.done;
        let done = record.data.done;

        match record.remote_id() {
            Some(remote_id) => match self.store.update_todo_done(remote_id, done).await {
                Ok(true) => debug!(id = %remote_id, done, "To-do status updated"),
                Ok(false) => warn!(id = %remote_id, "To-do missing remotely during status update"),
                Err(e) => error!(id = %remote_id, error = %e, "Failed to update to-do status"),
            },
            None => debug!(%id, "To-do not yet saved, skipping remote status update"),
        }
        Ok(done)
    }

    /// Replace a to-do's text and note. Persists text, note, and done.
    pub async fn edit(&mut self, id: LocalId, text: &str, note: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::Empty { field: "text" }.into());
        }
        let record = self
            .record_mut(id)
            .ok_or_else(|| Error::not_found("to-do", id))?;
        record.data.text = text.to_string();
        record.data.note = note.trim().to_string();
        let todo = record.data.clone();

        match record.remote_id() {
            Some(remote_id) => match self.store.update_todo(remote_id, &todo).await {
                Ok(true) => debug!(id = %remote_id, "To-do updated"),
                Ok(false) => warn!(id = %remote_id, "To-do missing remotely during update"),
                Err(e) => error!(id = %remote_id, error = %e, "Failed to update to-do"),
            },
            None => debug!(%id, "To-do not yet saved, skipping remote update"),
        }
        Ok(())
    }

    /// Remove a to-do from the mirror, then delete it remotely if it was saved.
    pub async fn delete(&mut self, id: LocalId) -> Result<()> {
        let (week, day, index) = self
            .locate(id)
            .ok_or_else(|| Error::not_found("to-do", id))?;
        let record = match self.weeks.get_mut(&week) {
            Some(slots) => slots[day].remove(index),
            None => return Err(Error::not_found("to-do", id)),
        };

        match record.remote_id() {
            Some(remote_id) => match self.store.delete_todo(remote_id).await {
                Ok(true) => debug!(id = %remote_id, "To-do deleted"),
                Ok(false) => warn!(id = %remote_id, "To-do already gone remotely"),
                Err(e) => error!(id = %remote_id, error = %e, "Failed to delete to-do"),
            },
            None => debug!(%id, "To-do never saved, nothing to delete remotely"),
        }
        Ok(())
    }

    /// Delete every to-do of the current week, remotely and locally.
    ///
    /// Returns the number of to-dos removed from the mirror.
    pub async fn delete_week(&mut self) -> Result<usize> {
        let week = self.current_week();
        match self.store.delete_todo_week(&week.to_string()).await {
            Ok(removed) => debug!(%week, removed, "To-do week deleted"),
            Err(e) => error!(%week, error = %e, "Failed to delete to-do week"),
        }
        let removed = self
            .weeks
            .remove(&week)
            .map(|slots| slots.iter().map(Vec::len).sum())
            .unwrap_or(0);
        Ok(removed)
    }

    /// Insert every unsaved to-do. Returns how many were reconciled.
    pub async fn sync_pending(&mut self) -> usize {
        let pending: Vec<(LocalId, WeekKey, usize, Todo)> = self
            .weeks
            .iter()
            .flat_map(|(week, slots)| {
                slots.iter().enumerate().flat_map(move |(day, todos)| {
                    todos
                        .iter()
                        .filter(|r| !r.is_saved())
                        .map(move |r| (r.local_id, *week, day, r.data.clone()))
                })
            })
            .collect();

        let mut synced = 0;
        for (local_id, week, day, todo) in pending {
            match self.store.insert_todo(&week.to_string(), day, &todo).await {
                Ok(remote_id) => {
                    self.attach(local_id, remote_id);
                    synced += 1;
                }
                Err(e) => error!(%week, day, error = %e, "Failed to sync pending to-do"),
            }
        }
        synced
    }

    fn attach(&mut self, id: LocalId, remote_id: crate::record::RemoteId) {
        match self.record_mut(id) {
            Some(record) => record.mark_saved(remote_id),
            None => warn!(%id, remote_id = %remote_id, "To-do removed before its insert returned"),
        }
    }

    fn locate(&self, id: LocalId) -> Option<(WeekKey, usize, usize)> {
        self.weeks.iter().find_map(|(week, slots)| {
            slots.iter().enumerate().find_map(|(day, todos)| {
                todos
                    .iter()
                    .position(|r| r.local_id == id)
                    .map(|index| (*week, day, index))
            })
        })
    }

    fn record_mut(&mut self, id: LocalId) -> Option<&mut Record<Todo>> {
        self.weeks
            .values_mut()
            .flat_map(|week| week.iter_mut())
            .flat_map(|day| day.iter_mut())
            .find(|r| r.local_id == id)
    }
}
