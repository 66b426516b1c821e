//! Calendar event data model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::RemoteId;

/// An event on a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    #[serde(default)]
    pub note: String,
}

/// A `calendar_events` table row as returned by a bulk read.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEventRow {
    pub id: RemoteId,
    pub event_date: NaiveDate,
    pub event: CalendarEvent,
}
