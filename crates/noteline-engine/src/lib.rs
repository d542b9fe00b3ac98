//! noteline-engine: Headless engine for the noteline note timeline
//!
//! This crate provides the data side of the timeline, including:
//! - Note model and the remote note source
//! - Keyed query cache with stale-while-revalidate semantics
//! - Timeline row selection and active-row computation
//! - Row animation state machine and scroll spring
//! - Routes, navigation history and configuration

pub mod config;
pub mod motion;
pub mod note;
pub mod query;
pub mod route;
pub mod scroll;
pub mod source;
pub mod timeline;

// Re-export commonly used types
pub use config::{Config, ConfigError, IconStyle, MotionConfig, ThemeName};
pub use motion::{AnimatedRow, ListMotion, MotionTiming, RowMotion, RowPhase, HIDDEN_OPACITY};
pub use note::{parse_nid, Nid, Note, NoteId, NoteSummary};
pub use query::{Applied, FetchTicket, KeyedQuery};
pub use route::{note_param, Navigator, Route};
pub use scroll::ScrollSpring;
pub use source::{FetchError, HttpNoteSource, NoteSource};
pub use timeline::{fetch_window, NoteTimeline, TimelineRow, WINDOW_SIZE};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
