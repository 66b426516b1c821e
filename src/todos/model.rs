//! To-do data model.

use serde::{Deserialize, Serialize};

use crate::record::RemoteId;

/// A single to-do in one day slot of a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub text: String,
    /// Optional free-form note; empty when absent.
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub done: bool,
}

impl Todo {
    pub fn new(text: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            note: note.into(),
            done: false,
        }
    }
}

/// A `todos` table row as returned by a bulk read.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoRow {
    pub id: RemoteId,
    pub week_key: String,
    pub day_index: i64,
    pub todo: Todo,
}
