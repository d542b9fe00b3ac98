//! Test utilities for noteline-tui rendering tests.
//!
//! Builds sample notes and settled timeline state, and converts buffers to
//! strings for snapshot comparison.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use ratatui::buffer::Buffer;

use noteline_engine::{MotionTiming, Nid, Note, NoteId, NoteSummary, TimelineRow};

use crate::timeline::TimelineState;

/// Build a note summary with a fixed creation date.
pub fn sample_summary(id: &str, nid: Nid, title: &str) -> NoteSummary {
    NoteSummary {
        id: NoteId::from(id),
        nid,
        title: title.to_string(),
        created: Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid date"),
    }
}

/// Build a fully loaded note.
pub fn sample_note(id: &str, nid: Nid, title: &str, text: &str) -> Note {
    Note {
        summary: sample_summary(id, nid, title),
        text: text.to_string(),
        modified: None,
    }
}

/// Build timeline state from `(id, nid, title, active)` tuples with all
/// animations finished.
pub fn settled_state(rows: &[(&str, Nid, &str, bool)]) -> TimelineState {
    let rows: Vec<TimelineRow> = rows
        .iter()
        .map(|&(id, nid, title, active)| TimelineRow {
            id: NoteId::from(id),
            nid,
            title: title.to_string(),
            active,
        })
        .collect();

    let mut state = TimelineState::new(MotionTiming::default());
    state.set_rows(&rows);
    state.tick(Duration::from_secs(10));
    state
}

/// Convert a buffer to a string representation for snapshot testing.
///
/// Each row becomes one line, with trailing whitespace trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        // Trim trailing whitespace from each line
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    // Remove trailing newline
    if result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{layout::Rect, style::Style};

    #[test]
    fn test_buffer_to_string() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 2));
        buf.set_string(0, 0, "ab", Style::default());
        buf.set_string(1, 1, "c", Style::default());
        assert_eq!(buffer_to_string(&buf), "ab\n c");
    }

    #[test]
    fn test_settled_state_has_no_animation() {
        let state = settled_state(&[("a1", 1, "One", true), ("a2", 2, "Two", false)]);
        assert_eq!(state.len(), 2);
        assert!(!state.is_animating());
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn test_sample_note() {
        let note = sample_note("a1", 42, "Intro", "Body");
        assert_eq!(note.nid(), 42);
        assert_eq!(note.summary().id.as_str(), "a1");
    }
}
