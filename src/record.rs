//! Mirrored record wrapper: local handle plus remote lifecycle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Row identifier assigned by the remote store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteId(pub i64);

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process-local handle for a mirrored record.
///
/// Assigned when the record enters the mirror and never persisted, so it
/// addresses unsaved records as well as saved ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalId(Uuid);

impl LocalId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LocalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Whether a record has round-tripped through the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Only in the mirror; the remote insert has not succeeded yet.
    Unsaved,
    /// Persisted under this remote id.
    Saved(RemoteId),
}

/// A mirrored record: domain fields plus identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub local_id: LocalId,
    pub lifecycle: Lifecycle,
    pub data: T,
}

impl<T> Record<T> {
    /// A record created locally, pending its remote insert.
    pub fn unsaved(data: T) -> Self {
        Self {
            local_id: LocalId::new(),
            lifecycle: Lifecycle::Unsaved,
            data,
        }
    }

    /// A record loaded from the remote store.
    pub fn saved(id: RemoteId, data: T) -> Self {
        Self {
            local_id: LocalId::new(),
            lifecycle: Lifecycle::Saved(id),
            data,
        }
    }

    pub fn remote_id(&self) -> Option<RemoteId> {
        match self.lifecycle {
            Lifecycle::Saved(id) => Some(id),
            Lifecycle::Unsaved => None,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Saved(_))
    }

    /// Attach the id returned by a successful insert.
    pub fn mark_saved(&mut self, id: RemoteId) {
        self.lifecycle = Lifecycle::Saved(id);
    }
}
