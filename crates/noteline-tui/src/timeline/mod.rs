//! Timeline module for displaying the notes around the current note.
//!
//! This module provides:
//! - [`TimelineEntry`] - One animated, navigable row
//! - [`TimelineState`] - Rows, selection, hover and scrolling
//! - [`TimelineWidget`] - Widget for rendering the timeline pane

mod entry;
mod state;
mod widget;

pub use entry::{truncate_to_width, TimelineEntry, ACTIVE_INDENT};
pub use state::TimelineState;
pub use widget::TimelineWidget;
