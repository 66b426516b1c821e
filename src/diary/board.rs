//! Diary board: dated entries kept most recent first.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use super::model::{DiaryEntry, DiaryRow};
use super::view::{DiaryView, render_entries};
use crate::error::{Error, Result, StoreError, ValidationError};
use crate::record::{LocalId, Record, RemoteId};
use crate::store::RemoteStore;

pub struct DiaryBoard {
    store: Arc<dyn RemoteStore>,
    entries: Vec<Record<DiaryEntry>>,
}

impl DiaryBoard {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            store,
            entries: Vec::new(),
        }
    }

    /// Replace the mirror with a bulk read. Returns the number of entries loaded.
    pub async fn load(&mut self) -> std::result::Result<usize, StoreError> {
        let rows = self.store.list_diary_entries().await?;
        self.entries = rows
            .into_iter()
            .map(|DiaryRow { id, entry }| Record::saved(id, entry))
            .collect();
        // The store already orders by date; a stable sort keeps its tie order.
        self.entries.sort_by(|a, b| b.data.date.cmp(&a.data.date));
        info!(count = self.entries.len(), "Diary entries loaded");
        Ok(self.entries.len())
    }

    pub fn entries(&self) -> &[Record<DiaryEntry>] {
        &self.entries
    }

    pub fn get(&self, id: LocalId) -> Option<&Record<DiaryEntry>> {
        self.entries.iter().find(|r| r.local_id == id)
    }

    /// Render all entries, or only those of `date` when given.
    pub fn view(&self, date: Option<NaiveDate>) -> DiaryView {
        render_entries(&self.entries, date)
    }

    /// Add an entry. Text must be non-blank and is stored as given.
    pub async fn add(&mut self, date: NaiveDate, text: &str) -> Result<LocalId> {
        if text.trim().is_empty() {
            return Err(ValidationError::Empty { field: "text" }.into());
        }
        let entry = DiaryEntry {
            date,
            text: text.to_string(),
        };
        let record = Record::unsaved(entry.clone());
        let local_id = record.local_id;
        let position = self.entries.partition_point(|r| r.data.date > date);
        self.entries.insert(position, record);

        match self.store.insert_diary_entry(&entry).await {
            Ok(remote_id) => {
                self.attach(local_id, remote_id);
                debug!(%date, id = %remote_id, "Diary entry saved");
            }
            Err(e) => error!(%date, error = %e, "Failed to save diary entry"),
        }
        Ok(local_id)
    }

    pub async fn delete(&mut self, id: LocalId) -> Result<()> {
        let index = self
            .entries
            .iter()
            .position(|r| r.local_id == id)
            .ok_or_else(|| Error::not_found("diary entry", id))?;
        let record = self.entries.remove(index);

        match record.remote_id() {
            Some(remote_id) => match self.store.delete_diary_entry(remote_id).await {
                Ok(true) => debug!(id = %remote_id, "Diary entry deleted"),
                Ok(false) => warn!(id = %remote_id, "Diary entry already gone remotely"),
                Err(e) => error!(id = %remote_id, error = %e, "Failed to delete diary entry"),
            },
            None => debug!(%id, "Diary entry never saved, nothing to delete remotely"),
        }
        Ok(())
    }

    /// Insert every unsaved entry. Returns how many were reconciled.
    pub async fn sync_pending(&mut self) -> usize {
        let pending: Vec<(LocalId, DiaryEntry)> = self
            .entries
            .iter()
            .filter(|r| !r.is_saved())
            .map(|r| (r.local_id, r.data.clone()))
            .collect();

        let mut synced = 0;
        for (local_id, entry) in pending {
            match self.store.insert_diary_entry(&entry).await {
                Ok(remote_id) => {
                    self.attach(local_id, remote_id);
                    synced += 1;
                }
                Err(e) => error!(date = %entry.date, error = %e, "Failed to sync pending diary entry"),
            }
        }
        synced
    }

    fn attach(&mut self, id: LocalId, remote_id: RemoteId) {
        match self.entries.iter_mut().find(|r| r.local_id == id) {
            Some(record) => record.mark_saved(remote_id),
            None => warn!(%id, remote_id = %remote_id, "Diary entry removed before its insert returned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn add_keeps_descending_order() {
        let store = Arc::new(MemoryStore::new());
        let mut board = DiaryBoard::new(store.clone());
        board.add(date(2026, 10, 1), "first").await.unwrap();
        board.add(date(2026, 10, 15), "middle").await.unwrap();
        board.add(date(2026, 9, 30), "oldest").await.unwrap();
        board.add(date(2026, 10, 15), "same day, later").await.unwrap();

        let texts: Vec<_> = board.entries().iter().map(|r| r.data.text.as_str()).collect();
        assert_eq!(texts, ["same day, later", "middle", "first", "oldest"]);
        assert!(board.entries().iter().all(Record::is_saved));
        assert_eq!(store.diary_rows().await.len(), 4);
    }

    #[tokio::test]
    async fn text_is_validated_trimmed_but_stored_as_given() {
        let store = Arc::new(MemoryStore::new());
        let mut board = DiaryBoard::new(store.clone());

        assert!(board.add(date(2026, 10, 18), " \n ").await.is_err());
        assert!(store.calls().await.is_empty());

        board.add(date(2026, 10, 18), "  Quiet day.\n").await.unwrap();
        assert_eq!(store.diary_rows().await[0].entry.text, "  Quiet day.\n");
    }

    #[tokio::test]
    async fn view_filters_by_date() {
        let store = Arc::new(MemoryStore::new());
        let mut board = DiaryBoard::new(store);
        board.add(date(2026, 10, 17), "a").await.unwrap();
        board.add(date(2026, 10, 18), "b").await.unwrap();

        assert_eq!(board.view(None).entries.len(), 2);
        let filtered = board.view(Some(date(2026, 10, 17)));
        assert_eq!(filtered.entries.len(), 1);
        assert_eq!(filtered.entries[0].text, "a");
        assert!(board.view(Some(date(2020, 1, 1))).entries.is_empty());
    }

    #[tokio::test]
    async fn load_orders_most_recent_first() {
        let store = Arc::new(MemoryStore::new());
        for (d, text) in [(3, "c"), (1, "a"), (2, "b")] {
            store
                .insert_diary_entry(&DiaryEntry {
                    date: date(2026, 10, d),
                    text: text.into(),
                })
                .await
                .unwrap();
        }
        let mut board = DiaryBoard::new(store);
        assert_eq!(board.load().await.unwrap(), 3);
        let texts: Vec<_> = board.entries().iter().map(|r| r.data.text.as_str()).collect();
        assert_eq!(texts, ["c", "b", "a"]);
    }

    #[tokio::test]
    async fn delete_unsaved_entry_skips_remote() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let mut board = DiaryBoard::new(store.clone());
        let id = board.add(date(2026, 10, 18), "draft").await.unwrap();
        store.set_offline(false);
        store.clear_calls().await;

        board.delete(id).await.unwrap();
        assert!(board.entries().is_empty());
        assert!(store.calls().await.is_empty());
    }

    #[tokio::test]
    async fn delete_saved_entry_removes_row() {
        let store = Arc::new(MemoryStore::new());
        let mut board = DiaryBoard::new(store.clone());
        let id = board.add(date(2026, 10, 18), "entry").await.unwrap();

        board.delete(id).await.unwrap();
        assert!(store.diary_rows().await.is_empty());
        assert!(matches!(
            board.delete(id).await.unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn sync_pending_saves_offline_entries() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        let mut board = DiaryBoard::new(store.clone());
        let id = board.add(date(2026, 10, 18), "offline").await.unwrap();
        assert!(!board.get(id).unwrap().is_saved());

        store.set_offline(false);
        assert_eq!(board.sync_pending().await, 1);
        assert!(board.get(id).unwrap().is_saved());
    }
}
