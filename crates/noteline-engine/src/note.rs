//! Note data model.
//!
//! A note carries two identifiers: an opaque `id` used for cache keys and
//! row identity, and a numeric `nid` used for routes and for matching the
//! note currently open in the navigation context.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric, human-facing note identifier.
pub type Nid = u64;

/// Opaque internal note identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (never a valid cache key).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NoteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// The minimal projection of a note shown in the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    /// Internal identifier.
    #[serde(alias = "_id")]
    pub id: NoteId,
    /// Numeric identifier used in routes.
    pub nid: Nid,
    /// Note title.
    pub title: String,
    /// Creation time (UTC).
    pub created: DateTime<Utc>,
}

impl NoteSummary {
    /// Creation date formatted for display (local time).
    pub fn created_str(&self) -> String {
        let local: DateTime<Local> = self.created.into();
        local.format("%Y-%m-%d").to_string()
    }
}

/// A fully loaded note, as returned by the single-note endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(flatten)]
    pub summary: NoteSummary,
    /// Body text.
    #[serde(default)]
    pub text: String,
    /// Last modification time, if the note was ever edited.
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

impl Note {
    /// The `{id, nid, title, created}` projection of this note.
    pub fn summary(&self) -> &NoteSummary {
        &self.summary
    }

    pub fn nid(&self) -> Nid {
        self.summary.nid
    }
}

/// Parse the note identifier carried by the navigation context.
///
/// Missing or unparsable identifiers become `0`, which matches no real note.
pub fn parse_nid(raw: Option<&str>) -> Nid {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}
