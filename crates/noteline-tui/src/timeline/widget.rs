//! Timeline widget for rendering the rows around the current note.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

use super::entry::TimelineEntry;
use super::state::TimelineState;
use crate::theme::{IconSet, Theme};

/// Timeline pane widget.
pub struct TimelineWidget<'a> {
    state: &'a TimelineState,
    theme: &'a Theme,
    icons: &'a IconSet,
    focused: bool,
    /// Whether a fetch is in flight (shows a spinner in the title).
    loading: bool,
    /// Tick counter for the spinner.
    tick: usize,
    /// Whether to render with a border (default: true).
    with_border: bool,
}

impl<'a> TimelineWidget<'a> {
    /// Create a new timeline widget.
    pub fn new(state: &'a TimelineState, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            state,
            theme,
            icons,
            focused: false,
            loading: false,
            tick: 0,
            with_border: true,
        }
    }

    /// Set whether the pane is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Show the loading spinner at the given tick.
    #[must_use]
    pub fn loading(mut self, loading: bool, tick: usize) -> Self {
        self.loading = loading;
        self.tick = tick;
        self
    }

    /// Set whether to render with a border.
    #[must_use]
    pub fn with_border(mut self, border: bool) -> Self {
        self.with_border = border;
        self
    }

    fn title(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            " Timeline ",
            Style::default().fg(self.theme.text),
        )];
        if self.loading {
            spans.push(Span::styled(
                format!("{} ", self.icons.spinner(self.tick)),
                Style::default().fg(self.theme.muted),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for TimelineWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // No rows: the timeline renders nothing at all
        if self.state.is_empty() {
            return;
        }

        let inner = if self.with_border {
            let border_style = if self.focused {
                Style::default().fg(self.theme.border_focused)
            } else {
                Style::default().fg(self.theme.border)
            };

            let block = Block::default()
                .title(self.title())
                .borders(Borders::ALL)
                .border_style(border_style)
                .style(Style::default().bg(self.theme.base));

            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let timing = self.state.timing();
        let selected = self.state.selected();
        let hovered = self.state.hovered();

        let visible = self.state.visible_rows(inner.height as usize);
        for (line, (idx, tracked)) in (0u16..).zip(visible) {
            let row_area = Rect::new(inner.x, inner.y + line, inner.width, 1);
            TimelineEntry::new(&tracked.row.title, tracked.row.active, self.theme, self.icons)
                .opacity(tracked.motion.opacity())
                .indicator(tracked.motion.indicator_progress(timing))
                .hovered(hovered == Some(idx))
                .selected(self.focused && selected == Some(idx))
                .render(row_area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, settled_state};
    use insta::assert_snapshot;
    use noteline_engine::{IconStyle, MotionTiming};

    fn render(widget: TimelineWidget<'_>, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        widget.render(area, &mut buf);
        buffer_to_string(&buf)
    }

    #[test]
    fn test_timeline_widget_creation() {
        let state = TimelineState::new(MotionTiming::default());
        let theme = Theme::default();
        let icons = IconSet::default();
        let widget = TimelineWidget::new(&state, &theme, &icons).focused(true);
        assert!(widget.focused);
    }

    #[test]
    fn test_empty_timeline_renders_nothing() {
        let state = TimelineState::new(MotionTiming::default());
        let theme = Theme::default();
        let icons = IconSet::default();
        let out = render(TimelineWidget::new(&state, &theme, &icons), 20, 4);
        assert!(out.trim().is_empty());
    }

    #[test]
    fn test_snapshot_rows_in_order() {
        let state = settled_state(&[("a1", 42, "Intro", false), ("a2", 43, "Next", true)]);
        let theme = Theme::default();
        let icons = IconSet::new(IconStyle::Unicode);
        let out = render(
            TimelineWidget::new(&state, &theme, &icons).with_border(false),
            20,
            2,
        );
        assert_snapshot!(out, @r"
        Intro
         → Next
        ");
    }

    #[test]
    fn test_bordered_title_and_spinner() {
        let state = settled_state(&[("a1", 42, "Intro", true)]);
        let theme = Theme::default();
        let icons = IconSet::new(IconStyle::Ascii);
        let out = render(
            TimelineWidget::new(&state, &theme, &icons).loading(true, 0),
            24,
            4,
        );
        let first = out.lines().next().unwrap();
        assert!(first.contains(" Timeline - "));
        assert!(out.contains("Intro"));
    }

    #[test]
    fn test_rows_clipped_to_height() {
        let rows: Vec<(String, u64)> = (0..6).map(|i| (format!("n{i}"), i)).collect();
        let entries: Vec<(&str, u64, &str, bool)> = rows
            .iter()
            .map(|(id, nid)| (id.as_str(), *nid, "Row", false))
            .collect();
        let state = settled_state(&entries);
        let theme = Theme::default();
        let icons = IconSet::default();
        let out = render(
            TimelineWidget::new(&state, &theme, &icons).with_border(false),
            10,
            4,
        );
        assert_eq!(out.lines().filter(|l| *l == "Row").count(), 4);
    }
}
