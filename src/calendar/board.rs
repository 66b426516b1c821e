//! Calendar board: events grouped by date.
//!
//! A date only appears in the mirror while it holds at least one event.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use super::model::{CalendarEvent, CalendarEventRow};
use super::view::{CalendarDayView, CalendarMonthView, render_day, render_month};
use crate::error::{Error, Result, StoreError, ValidationError};
use crate::period::{Clock, MonthKey, derive_month_key};
use crate::record::{LocalId, Record, RemoteId};
use crate::store::RemoteStore;

pub fn group_rows(rows: Vec<CalendarEventRow>) -> BTreeMap<NaiveDate, Vec<Record<CalendarEvent>>> {
    let mut events: BTreeMap<NaiveDate, Vec<Record<CalendarEvent>>> = BTreeMap::new();
    for row in rows {
        events
            .entry(row.event_date)
            .or_default()
            .push(Record::saved(row.id, row.event));
    }
    events
}

pub struct CalendarBoard {
    store: Arc<dyn RemoteStore>,
    clock: Arc<dyn Clock>,
    events: BTreeMap<NaiveDate, Vec<Record<CalendarEvent>>>,
    month_offset: i32,
}

impl CalendarBoard {
    pub fn new(store: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            events: BTreeMap::new(),
            month_offset: 0,
        }
    }

    /// Replace the mirror with a bulk read. Returns the number of events loaded.
    pub async fn load(&mut self) -> std::result::Result<usize, StoreError> {
        let rows = self.store.list_calendar_events().await?;
        let count = rows.len();
        self.events = group_rows(rows);
        info!(count, dates = self.events.len(), "Calendar events loaded");
        Ok(count)
    }

    pub fn month_offset(&self) -> i32 {
        self.month_offset
    }

    pub fn current_month(&self) -> MonthKey {
        derive_month_key(self.clock.today()).shift(self.month_offset)
    }

    pub fn prev_month(&mut self) -> MonthKey {
        self.month_offset = self.month_offset.saturating_sub(1);
        self.current_month()
    }

    pub fn next_month(&mut self) -> MonthKey {
        self.month_offset = self.month_offset.saturating_add(1);
        self.current_month()
    }

    pub fn events_on(&self, date: NaiveDate) -> Option<&[Record<CalendarEvent>]> {
        self.events.get(&date).map(Vec::as_slice)
    }

    pub fn get(&self, id: LocalId) -> Option<&Record<CalendarEvent>> {
        self.events
            .values()
            .flat_map(|list| list.iter())
            .find(|r| r.local_id == id)
    }

    pub fn month_view(&self) -> CalendarMonthView {
        render_month(&self.events, self.current_month(), self.month_offset)
    }

    pub fn day_view(&self, date: NaiveDate) -> CalendarDayView {
        render_day(&self.events, date)
    }

    pub async fn add(&mut self, date: NaiveDate, title: &str, note: &str) -> Result<LocalId> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Empty { field: "title" }.into());
        }
        let event = CalendarEvent {
            title: title.to_string(),
            note: note.trim().to_string(),
        };
        let record = Record::unsaved(event.clone());
        let local_id = record.local_id;
        self.events.entry(date).or_default().push(record);

        match self.store.insert_calendar_event(date, &event).await {
            Ok(remote_id) => {
                self.attach(local_id, remote_id);
                debug!(%date, id = %remote_id, "Calendar event saved");
            }
            Err(e) => error!(%date, error = %e, "Failed to save calendar event"),
        }
        Ok(local_id)
    }

    /// Remove an event. The date is dropped from the mirror once it is empty.
    pub async fn delete(&mut self, id: LocalId) -> Result<()> {
        let (date, index) = self
            .events
            .iter()
            .find_map(|(date, list)| {
                list.iter()
                    .position(|r| r.local_id == id)
                    .map(|index| (*date, index))
            })
            .ok_or_else(|| Error::not_found("calendar event", id))?;

        let Some(list) = self.events.get_mut(&date) else {
            return Err(Error::not_found("calendar event", id));
        };
        let record = list.remove(index);
        if list.is_empty() {
            self.events.remove(&date);
        }

        match record.remote_id() {
            Some(remote_id) => match self.store.delete_calendar_event(remote_id).await {
                Ok(true) => debug!(id = %remote_id, "Calendar event deleted"),
                Ok(false) => warn!(id = %remote_id, "Calendar event already gone remotely"),
                Err(e) => error!(id = %remote_id, error = %e, "Failed to delete calendar event"),
            },
            None => debug!(%id, "Calendar event never saved, nothing to delete remotely"),
        }
        Ok(())
    }

    /// Insert every unsaved event. Returns how many were reconciled.
    pub async fn sync_pending(&mut self) -> usize {
        let pending: Vec<(LocalId, NaiveDate, CalendarEvent)> = self
            .events
            .iter()
            .flat_map(|(date, list)| {
                list.iter()
                    .filter(|r| !r.is_saved())
                    .map(move |r| (r.local_id, *date, r.data.clone()))
            })
            .collect();

        let mut synced = 0;
        for (local_id, date, event) in pending {
            match self.store.insert_calendar_event(date, &event).await {
                Ok(remote_id) => {
                    self.attach(local_id, remote_id);
                    synced += 1;
                }
                Err(e) => error!(%date, error = %e, "Failed to sync pending calendar event"),
            }
        }
        synced
    }

    fn attach(&mut self, id: LocalId, remote_id: RemoteId) {
        let record = self
            .events
            .values_mut()
            .flat_map(|list| list.iter_mut())
            .find(|r| r.local_id == id);
        match record {
            Some(record) => record.mark_saved(remote_id),
            None => warn!(%id, remote_id = %remote_id, "Calendar event removed before its insert returned"),
        }
    }
}
