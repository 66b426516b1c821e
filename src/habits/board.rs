//! Weekly habit board: habits grouped by week key.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::model::{Habit, HabitRow};
use super::view::{HabitWeekView, render_week};
use crate::error::{Error, Result, StoreError, ValidationError};
use crate::period::{Clock, DAYS_PER_WEEK, WeekKey, WeekNumbering, derive_week_key};
use crate::record::{LocalId, Record, RemoteId};
use crate::store::RemoteStore;

/// Group bulk-read rows by week key, skipping rows with an unparsable key.
pub fn group_rows(rows: Vec<HabitRow>) -> BTreeMap<WeekKey, Vec<Record<Habit>>> {
    let mut weeks: BTreeMap<WeekKey, Vec<Record<Habit>>> = BTreeMap::new();
    for row in rows {
        match row.week_key.parse::<WeekKey>() {
            Ok(week) => weeks
                .entry(week)
                .or_default()
                .push(Record::saved(row.id, row.habit)),
            Err(e) => warn!(id = %row.id, error = %e, "Skipping habit with invalid week key"),
        }
    }
    weeks
}

pub struct HabitBoard {
    store: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
    numbering: WeekNumbering,
    weeks: BTreeMap<WeekKey, Vec<Record<Habit>>>,
    week_offset: i32,
}

impl HabitBoard {
    pub fn new(store: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>, numbering: WeekNumbering) -> Self {
        Self {
            store,
            clock,
            numbering,
            weeks: BTreeMap::new(),
            week_offset: 0,
        }
    }

    /// Replace the mirror with a bulk read. Returns the number of habits loaded.
    pub async fn load(&mut self) -> std::result::Result<usize, StoreError> {
        let rows = self.store.list_habits().await?;
        self.weeks = group_rows(rows);
        let count = self.weeks.values().map(Vec::len).sum();
        info!(count, weeks = self.weeks.len(), "Habits loaded");
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

    pub fn habits(&self, week: WeekKey) -> &[Record<Habit>] {
        self.weeks.get(&week).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get(&self, id: LocalId) -> Option<&Record<Habit>> {
        self.weeks
            .values()
            .flat_map(|habits| habits.iter())
            .find(|r| r.local_id == id)
    }

    pub fn view(&self) -> HabitWeekView {
        render_week(self.habits(self.current_week()), self.current_week(), self.week_offset)
    }

    /// Add a habit to the current week with every day unchecked.
    ///
    /// A failed insert leaves the habit in the mirror unsaved.
    pub async fn add(&mut self, name: &str) -> Result<LocalId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }
        let week = self.current_week();
        let habit = Habit::new(name);
        let record = Record::unsaved(habit.clone());
        let local_id = record.local_id;
        self.weeks.entry(week).or_default().push(record);

        match self.store.insert_habit(&week.to_string(), &habit).await {
            Ok(remote_id) => {
                self.attach(local_id, remote_id);
                debug!(%week, id = %remote_id, "Habit saved");
            }
            Err(e) => error!(%week, error = %e, "Failed to save habit"),
        }
        Ok(local_id)
    }

    /// Set one day's state. The whole seven-day array is written back.
    pub async fn set_day(&mut self, id: LocalId, day: usize, done: bool) -> Result<()> {
        if day >= DAYS_PER_WEEK {
            return Err(ValidationError::DayOutOfRange { day }.into());
        }
        let record = self
            .record_mut(id)
            .ok_or_else(|| Error::not_found("habit", id))?;
        record.data.days[day] = done;
        let days = record.data.days;

        match record.remote_id() {
            Some(remote_id) => match self.store.update_habit_days(remote_id, &days).await {
                Ok(true) => debug!(id = %remote_id, day, done, "Habit day updated"),
                Ok(false) => warn!(id = %remote_id, "Habit missing remotely during day update"),
                Err(e) => error!(id = %remote_id, error = %e, "Failed to update habit days"),
            },
            None => debug!(%id, "Habit not yet saved, skipping remote day update"),
        }
        Ok(())
    }

    pub async fn rename(&mut self, id: LocalId, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "name" }.into());
        }
        let record = self
            .record_mut(id)
            .ok_or_else(|| Error::not_found("habit", id))?;
        record.data.name = name.to_string();
        let habit = record.data.clone();

        match record.remote_id() {
            Some(remote_id) => match self.store.update_habit(remote_id, &habit).await {
                Ok(true) => debug!(id = %remote_id, "Habit renamed"),
                Ok(false) => warn!(id = %remote_id, "Habit missing remotely during rename"),
                Err(e) => error!(id = %remote_id, error = %e, "Failed to rename habit"),
            },
            None => debug!(%id, "Habit not yet saved, skipping remote rename"),
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: LocalId) -> Result<()> {
        let (week, index) = self
            .locate(id)
            .ok_or_else(|| Error::not_found("habit", id))?;
        let record = match self.weeks.get_mut(&week) {
            Some(habits) => habits.remove(index),
            None => return Err(Error::not_found("habit", id)),
        };

        match record.remote_id() {
            Some(remote_id) => match self.store.delete_habit(remote_id).await {
                Ok(true) => debug!(id = %remote_id, "Habit deleted"),
                Ok(false) => warn!(id = %remote_id, "Habit already gone remotely"),
                Err(e) => error!(id = %remote_id, error = %e, "Failed to delete habit"),
            },
            None => debug!(%id, "Habit never saved, nothing to delete remotely"),
        }
        Ok(())
    }

    /// Delete every habit of the current week. Returns how many left the mirror.
    pub async fn delete_week(&mut self) -> Result<usize> {
        let week = self.current_week();
        match self.store.delete_habit_week(&week.to_string()).await {
            Ok(removed) => debug!(%week, removed, "Habit week deleted"),
            Err(e) => error!(%week, error = %e, "Failed to delete habit week"),
        }
        Ok(self.weeks.remove(&week).map_or(0, |habits| habits.len()))
    }

    /// Insert every unsaved habit. Returns how many were reconciled.
    pub async fn sync_pending(&mut self) -> usize {
        let pending: Vec<(LocalId, WeekKey, Habit)> = self
            .weeks
            .iter()
            .flat_map(|(week, habits)| {
                habits
                    .iter()
                    .filter(|r| !r.is_saved())
                    .map(move |r| (r.local_id, *week, r.data.clone()))
            })
            .collect();

        let mut synced = 0;
        for (local_id, week, habit) in pending {
            match self.store.insert_habit(&week.to_string(), &habit).await {
                Ok(remote_id) => {
                    self.attach(local_id, remote_id);
                    synced += 1;
                }
                Err(e) => error!(%week, error = %e, "Failed to sync pending habit"),
            }
        }
        synced
    }

    fn attach(&mut self, id: LocalId, remote_id: RemoteId) {
        match self.record_mut(id) {
            Some(record) => record.mark_saved(remote_id),
            None => warn!(%id, remote_id = %remote_id, "Habit removed before its insert returned"),
        }
    }

    fn locate(&self, id: LocalId) -> Option<(WeekKey, usize)> {
        self.weeks.iter().find_map(|(week, habits)| {
            habits
                .iter()
                .position(|r| r.local_id == id)
                .map(|index| (*week, index))
        })
    }

    fn record_mut(&mut self, id: LocalId) -> Option<&mut Record<Habit>> {
        self.weeks
            .values_mut()
            .flat_map(|habits| habits.iter_mut())
            .find(|r| r.local_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::FixedClock;
    use crate::store::{MemoryStore, StoreCall};
    use chrono::NaiveDate;

    fn board(store: &Arc<MemoryStore>) -> HabitBoard {
        HabitBoard::new(
            store.clone(),
            Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())),
            WeekNumbering::Legacy,
        )
    }

    #[tokio::test]
    async fn add_inserts_with_unchecked_days() {
        let store = Arc::new(MemoryStore::new());
        let mut board = board(&store);

        let id = board.add(" Read ").await.unwrap();
        assert!(board.get(id).unwrap().is_saved());

        let rows = store.habit_rows().await;
        assert_eq!(rows[0].week_key, "2026-W43");
        assert_eq!(rows[0].habit, Habit::new("Read"));
    }

    #[tokio::test]
    async fn add_with_empty_name_changes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut board = board(&store);
        assert!(board.add("").await.is_err());
        assert!(board.habits(board.current_week()).is_empty());
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn failed_add_keeps_habit_unsaved() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let mut board = board(&store);

        let id = board.add("Meditate").await.unwrap();
        assert!(!board.get(id).unwrap().is_saved());
        assert!(!board.view().habits[0].saved);
    }

    #[tokio::test]
    async fn set_day_writes_whole_array() {
        let store = Arc::new(MemoryStore::new());
        let mut board = board(&store);
        let id = board.add("Walk").await.unwrap();
        let remote_id = board.get(id).unwrap().remote_id().unwrap();
        store.clear_calls().await;

        board.set_day(id, 2, true).await.unwrap();
        board.set_day(id, 6, true).await.unwrap();

        assert_eq!(
            store.calls().await,
            vec![
                StoreCall::Update {
                    table: "habits",
                    id: remote_id,
                    fields: "days"
                };
                2
            ]
        );
        assert_eq!(
            store.habit_rows().await[0].habit.days,
            [false, false, true, false, false, false, true]
        );
        assert_eq!(board.view().habits[0].completed, 2);
    }

    #[tokio::test]
    async fn set_day_rejects_bad_day() {
        let store = Arc::new(MemoryStore::new());
        let mut board = board(&store);
        let id = board.add("Walk").await.unwrap();
        let err = board.set_day(id, 9, true).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::DayOutOfRange { day: 9 })
        ));
        assert_eq!(board.get(id).unwrap().data.completed_days(), 0);
    }

    #[tokio::test]
    async fn set_day_on_unsaved_habit_skips_remote() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let mut board = board(&store);
        let id = board.add("Walk").await.unwrap();
        store.set_offline(false);
        store.clear_calls().await;

        board.set_day(id, 0, true).await.unwrap();
        assert!(store.calls().await.is_empty());
        assert!(board.get(id).unwrap().data.days[0]);
    }

    #[tokio::test]
    async fn rename_persists_name_and_days() {
        let store = Arc::new(MemoryStore::new());
        let mut board = board(&store);
        let id = board.add("Walk").await.unwrap();
        board.set_day(id, 1, true).await.unwrap();

        board.rename(id, "Long walk").await.unwrap();
        let stored = &store.habit_rows().await[0].habit;
        assert_eq!(stored.name, "Long walk");
        assert!(stored.days[1]);
    }

    #[tokio::test]
    async fn delete_unsaved_habit_skips_remote() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let mut board = board(&store);
        let id = board.add("Walk").await.unwrap();
        store.set_offline(false);
        store.clear_calls().await;

        board.delete(id).await.unwrap();
        assert!(board.get(id).is_none());
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn delete_week_only_touches_current_week() {
        let store = Arc::new(MemoryStore::new());
        let mut board = board(&store);
        board.add("a").await.unwrap();
        board.add("b").await.unwrap();
        board.prev_week();
        board.add("older").await.unwrap();
        board.next_week();

        assert_eq!(board.delete_week().await.unwrap(), 2);
        let rows = store.habit_rows().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].week_key, "2026-W42");
    }

    #[tokio::test]
    async fn load_groups_by_week() {
        let store = Arc::new(MemoryStore::new());
        store.insert_habit("2026-W43", &Habit::new("a")).await.unwrap();
        store.insert_habit("2026-W43", &Habit::new("b")).await.unwrap();
        store.insert_habit("W43", &Habit::new("broken")).await.unwrap();

        let mut board = board(&store);
        assert_eq!(board.load().await.unwrap(), 2);
        let names: Vec<_> = board.view().habits.into_iter().map(|h| h.name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[tokio::test]
    async fn sync_pending_reconciles_unsaved_habits() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let mut board = board(&store);
        let id = board.add("Walk").await.unwrap();
        board.set_day(id, 4, true).await.unwrap();
        store.set_offline(false);

        assert_eq!(board.sync_pending().await, 1);
        assert!(board.get(id).unwrap().is_saved());
        assert!(store.habit_rows().await[0].habit.days[4]);
    }
}
