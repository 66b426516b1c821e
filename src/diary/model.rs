//! Diary data model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::RemoteId;

/// One diary entry for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub date: NaiveDate,
    pub text: String,
}

/// A `diary_entries` table row as returned by a bulk read.
#[derive(Debug, Clone, PartialEq)]
pub struct DiaryRow {
    pub id: RemoteId,
    pub entry: DiaryEntry,
}
