//! Timeline container logic.
//!
//! Resolves which notes to show around the current note and which one is
//! active. The caller passes the navigation identifier and the current
//! note projection explicitly on every call.

use tracing::{debug, warn};

use crate::note::{parse_nid, Nid, NoteId, NoteSummary};
use crate::query::{Applied, FetchTicket, KeyedQuery};
use crate::source::{FetchError, NoteSource};

/// Number of notes requested around the current note.
pub const WINDOW_SIZE: usize = 10;

/// One renderable timeline row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineRow {
    /// Row identity (stable across reorders).
    pub id: NoteId,
    pub nid: Nid,
    pub title: String,
    /// Whether this row is the note being viewed.
    pub active: bool,
}

/// Fetch the neighbor window for `key`.
///
/// Rejects with [`FetchError::MissingKey`] when no key is known.
pub async fn fetch_window(
    source: &dyn NoteSource,
    key: Option<&NoteId>,
    size: usize,
) -> Result<Vec<NoteSummary>, FetchError> {
    let Some(id) = key else {
        return Err(FetchError::MissingKey);
    };
    source.neighbor_notes(id, size).await
}

/// Timeline of notes surrounding the current note.
#[derive(Debug)]
pub struct NoteTimeline {
    query: KeyedQuery<NoteId, Vec<NoteSummary>>,
    window_size: usize,
}

impl Default for NoteTimeline {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}

impl NoteTimeline {
    /// Create a timeline requesting `window_size` neighbors.
    pub fn new(window_size: usize) -> Self {
        Self {
            query: KeyedQuery::new(),
            window_size: window_size.max(1),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Whether a neighbor fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.query.is_fetching()
    }

    /// Point the timeline at the current note.
    ///
    /// Returns a ticket when a fetch should be issued. Fetching stays
    /// disabled until the note's `id` is known.
    pub fn sync(&mut self, current: Option<&NoteSummary>) -> Option<FetchTicket<NoteId>> {
        let ticket = self.query.set_key(current.map(|note| note.id.clone()));
        if let Some(ref ticket) = ticket {
            debug!(note_id = %ticket.key, generation = ticket.generation(), "Timeline fetch issued");
        }
        ticket
    }

    /// Re-issue the fetch for the current key.
    pub fn refresh(&mut self) -> Option<FetchTicket<NoteId>> {
        self.query.refetch()
    }

    /// Apply a completed fetch. Returns true if the displayed snapshot changed.
    pub fn apply(
        &mut self,
        ticket: FetchTicket<NoteId>,
        result: Result<Vec<NoteSummary>, FetchError>,
    ) -> bool {
        match result {
            Ok(notes) => {
                let key = ticket.key.clone();
                let applied = self.query.resolve(ticket, notes);
                debug!(note_id = %key, ?applied, "Timeline fetch resolved");
                applied == Applied::Displayed
            }
            Err(e) => {
                warn!(note_id = %ticket.key, error = %e, "Timeline fetch failed");
                self.query.fail(&ticket);
                false
            }
        }
    }

    /// The displayed snapshot, if any.
    pub fn snapshot(&self) -> Option<&[NoteSummary]> {
        self.query.data().map(Vec::as_slice)
    }

    /// Rows to render.
    ///
    /// Empty when nothing should be rendered: no note open (`nav` absent),
    /// or neither a snapshot nor a current note projection is available. An
    /// empty snapshot falls back to the current note projection.
    pub fn rows(&self, nav: Option<&str>, current: Option<&NoteSummary>) -> Vec<TimelineRow> {
        if nav.is_none() {
            return Vec::new();
        }
        let active_nid = parse_nid(nav);

        let entries: Vec<&NoteSummary> = match self.snapshot() {
            Some(snapshot) if !snapshot.is_empty() => snapshot.iter().collect(),
            _ => current.into_iter().collect(),
        };

        entries
            .into_iter()
            .map(|note| TimelineRow {
                id: note.id.clone(),
                nid: note.nid,
                title: note.title.clone(),
                active: note.nid == active_nid,
            })
            .collect()
    }
}
