//! Timeline pane state.
//!
//! Tracks animated rows, keyboard selection, pointer hover and scrolling.

use std::time::Duration;

use noteline_engine::{AnimatedRow, ListMotion, MotionTiming, NoteId, RowPhase, TimelineRow};

/// Timeline pane state.
#[derive(Debug, Default)]
pub struct TimelineState {
    /// Rows with their animation state, in display order.
    motion: ListMotion,
    /// Selected row, by note id.
    selected: Option<NoteId>,
    /// Index of the row under the pointer.
    hovered: Option<usize>,
    /// Index of first visible row.
    scroll_offset: usize,
    /// Whether the selection tracks the active row.
    follow_active: bool,
}

impl TimelineState {
    /// Create an empty timeline state.
    pub fn new(timing: MotionTiming) -> Self {
        Self {
            motion: ListMotion::new(timing),
            selected: None,
            hovered: None,
            scroll_offset: 0,
            follow_active: true,
        }
    }

    /// All displayed rows, including ones fading out.
    pub fn rows(&self) -> &[AnimatedRow] {
        self.motion.rows()
    }

    pub fn timing(&self) -> &MotionTiming {
        self.motion.timing()
    }

    pub fn is_empty(&self) -> bool {
        self.motion.is_empty()
    }

    pub fn len(&self) -> usize {
        self.motion.rows().len()
    }

    pub fn is_animating(&self) -> bool {
        self.motion.is_animating()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_following(&self) -> bool {
        self.follow_active
    }

    /// Index of the selected row.
    pub fn selected(&self) -> Option<usize> {
        let id = self.selected.as_ref()?;
        self.rows().iter().position(|r| &r.row.id == id)
    }

    /// The selected row, if it is still live.
    pub fn selected_row(&self) -> Option<&TimelineRow> {
        self.selected()
            .map(|idx| &self.rows()[idx])
            .filter(|r| r.motion.phase() != RowPhase::Exiting)
            .map(|r| &r.row)
    }

    /// Replace the rows. Returns true if anything changed.
    pub fn set_rows(&mut self, rows: &[TimelineRow]) -> bool {
        let changed = self.motion.reconcile(rows);

        if self.follow_active {
            if let Some(active) = rows.iter().find(|r| r.active) {
                self.selected = Some(active.id.clone());
            }
        }
        if let Some(ref id) = self.selected {
            if !rows.iter().any(|r| &r.id == id) {
                self.selected = None;
            }
        }
        if self.hovered.is_some_and(|idx| idx >= self.len()) {
            self.hovered = None;
        }
        changed
    }

    /// Advance animations by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.motion.tick(dt);
        if self.hovered.is_some_and(|idx| idx >= self.len()) {
            self.hovered = None;
        }
    }

    /// Indices of rows that can be selected.
    fn live_indices(&self) -> Vec<usize> {
        self.rows()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.motion.phase() != RowPhase::Exiting)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn select_index(&mut self, index: usize) {
        if let Some(row) = self.rows().get(index) {
            self.selected = Some(row.row.id.clone());
        }
    }

    /// Move selection up. Stops at the first row (no wrap).
    /// Stops following the active row.
    pub fn select_prev(&mut self) {
        let live = self.live_indices();
        if live.is_empty() {
            return;
        }
        self.follow_active = false;

        let target = match self.selected() {
            Some(current) => live.iter().rev().find(|&&i| i < current).copied(),
            None => live.last().copied(),
        };
        if let Some(idx) = target {
            self.select_index(idx);
        }
    }

    /// Move selection down. Stops at the last row (no wrap).
    pub fn select_next(&mut self) {
        let live = self.live_indices();
        if live.is_empty() {
            return;
        }
        self.follow_active = false;

        let target = match self.selected() {
            Some(current) => live.iter().find(|&&i| i > current).copied(),
            None => live.first().copied(),
        };
        if let Some(idx) = target {
            self.select_index(idx);
        }
    }

    /// Resume tracking the active row.
    pub fn follow(&mut self) {
        self.follow_active = true;
        let active = self
            .rows()
            .iter()
            .find(|r| r.row.active && r.motion.phase() != RowPhase::Exiting)
            .map(|r| r.row.id.clone());
        if active.is_some() {
            self.selected = active;
        }
    }

    /// Record the row under the pointer.
    pub fn set_hover(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|&idx| idx < self.len());
    }

    /// Ensure the selected row is visible, adjusting `scroll_offset` if needed.
    pub fn ensure_selection_visible(&mut self, visible_count: usize) {
        if visible_count == 0 {
            return;
        }
        let max_offset = self.len().saturating_sub(visible_count);
        self.scroll_offset = self.scroll_offset.min(max_offset);

        let Some(selected) = self.selected() else {
            return;
        };
        if selected < self.scroll_offset {
            self.scroll_offset = selected;
        }
        let last_visible = self.scroll_offset + visible_count - 1;
        if selected > last_visible {
            self.scroll_offset = selected.saturating_sub(visible_count - 1);
        }
    }

    /// Rows visible from the current scroll position.
    ///
    /// Returns tuples of `(row_index, &row)`.
    pub fn visible_rows(&self, visible_count: usize) -> Vec<(usize, &AnimatedRow)> {
        self.rows()
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(visible_count)
            .collect()
    }

    /// Convert a y-coordinate (relative to the pane's inner area) to a row index.
    pub fn y_to_row_index(&self, y: usize) -> Option<usize> {
        let idx = self.scroll_offset + y;
        (idx < self.len()).then_some(idx)
    }

    /// The live row at `index`, for activation by pointer.
    pub fn live_row_at(&self, index: usize) -> Option<&TimelineRow> {
        self.rows()
            .get(index)
            .filter(|r| r.motion.phase() != RowPhase::Exiting)
            .map(|r| &r.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, nid: u64, active: bool) -> TimelineRow {
        TimelineRow {
            id: NoteId::from(id),
            nid,
            title: format!("Note {nid}"),
            active,
        }
    }

    fn create_test_timeline(count: u64, active: u64) -> TimelineState {
        let mut state = TimelineState::new(MotionTiming::default());
        let rows: Vec<_> = (0..count)
            .map(|i| row(&format!("n{i}"), i, i == active))
            .collect();
        state.set_rows(&rows);
        state.tick(Duration::from_secs(10));
        state
    }

    #[test]
    fn test_new_timeline() {
        let state = TimelineState::new(MotionTiming::default());
        assert!(state.is_empty());
        assert!(state.is_following());
        assert_eq!(state.selected(), None);
    }

    #[test]
    fn test_selection_follows_active_row() {
        let state = create_test_timeline(5, 3);
        assert_eq!(state.selected(), Some(3));
        assert_eq!(state.selected_row().map(|r| r.nid), Some(3));
    }

    #[test]
    fn test_select_prev_next() {
        let mut state = create_test_timeline(5, 2);

        state.select_prev();
        assert_eq!(state.selected(), Some(1));
        assert!(!state.is_following());

        state.select_next();
        state.select_next();
        assert_eq!(state.selected(), Some(3));

        // Stops at the ends
        state.select_next();
        state.select_next();
        assert_eq!(state.selected(), Some(4));
        for _ in 0..10 {
            state.select_prev();
        }
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn test_no_follow_after_manual_selection() {
        let mut state = create_test_timeline(5, 2);
        state.select_next();
        assert_eq!(state.selected(), Some(3));

        let rows: Vec<_> = (0..5).map(|i| row(&format!("n{i}"), i, i == 0)).collect();
        state.set_rows(&rows);
        assert_eq!(state.selected(), Some(3));

        state.follow();
        assert_eq!(state.selected(), Some(0));
    }

    #[test]
    fn test_exiting_rows_are_skipped() {
        let mut state = create_test_timeline(3, 0);
        state.set_rows(&[row("n0", 0, true), row("n2", 2, false)]);
        assert_eq!(state.len(), 3);

        state.select_next();
        assert_eq!(state.selected(), Some(2));
        assert!(state.live_row_at(1).is_none());
    }

    #[test]
    fn test_selection_cleared_when_row_leaves() {
        let mut state = create_test_timeline(3, 1);
        state.set_rows(&[row("n0", 0, false), row("n2", 2, false)]);
        assert_eq!(state.selected(), None);
        assert!(state.selected_row().is_none());
    }

    #[test]
    fn test_ensure_selection_visible() {
        let mut state = create_test_timeline(10, 8);
        state.ensure_selection_visible(4);
        assert_eq!(state.scroll_offset(), 5);

        for _ in 0..7 {
            state.select_prev();
        }
        state.ensure_selection_visible(4);
        assert_eq!(state.scroll_offset(), 1);
    }

    #[test]
    fn test_y_to_row_index_and_hover() {
        let mut state = create_test_timeline(3, 0);
        assert_eq!(state.y_to_row_index(0), Some(0));
        assert_eq!(state.y_to_row_index(2), Some(2));
        assert_eq!(state.y_to_row_index(3), None);

        state.set_hover(Some(1));
        assert_eq!(state.hovered(), Some(1));
        state.set_hover(Some(7));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn test_visible_rows() {
        let mut state = create_test_timeline(10, 9);
        state.ensure_selection_visible(4);
        let visible = state.visible_rows(4);
        assert_eq!(visible.len(), 4);
        assert_eq!(visible[0].0, 6);
        assert_eq!(visible[3].0, 9);
    }
}
