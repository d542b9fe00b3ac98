//! A single timeline row.
//!
//! Renders the note title as a navigable label. The active row gets a
//! leading indicator that slides in from the left and an indented label.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};
use unicode_width::UnicodeWidthChar;

use crate::theme::{IconSet, Theme, DIM_OPACITY, HOVER_OPACITY};

/// Columns reserved in front of an active row's label.
pub const ACTIVE_INDENT: u16 = 3;

/// One animated timeline row.
pub struct TimelineEntry<'a> {
    title: &'a str,
    active: bool,
    /// Row opacity from the enter/exit animation.
    opacity: f32,
    /// Indicator slide progress, `None` when inactive.
    indicator: Option<f32>,
    hovered: bool,
    selected: bool,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> TimelineEntry<'a> {
    /// Create a fully visible row.
    pub fn new(title: &'a str, active: bool, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            title,
            active,
            opacity: 1.0,
            indicator: active.then_some(1.0),
            hovered: false,
            selected: false,
            theme,
            icons,
        }
    }

    /// Set the animated row opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set the indicator slide progress.
    #[must_use]
    pub fn indicator(mut self, progress: Option<f32>) -> Self {
        self.indicator = progress.filter(|_| self.active);
        self
    }

    #[must_use]
    pub fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }

    #[must_use]
    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Opacity of the label before row animation is applied.
    fn label_opacity(&self) -> f32 {
        if self.active {
            1.0
        } else if self.hovered {
            HOVER_OPACITY
        } else {
            DIM_OPACITY
        }
    }
}

impl Widget for TimelineEntry<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let y = area.y;

        let label_x = if self.active {
            if let Some(progress) = self.indicator {
                let shift = u16::from(progress >= 1.0);
                let color = self
                    .theme
                    .fade(self.theme.primary, progress * self.opacity);
                buf.set_stringn(
                    area.x + shift.min(area.width - 1),
                    y,
                    self.icons.current(),
                    1,
                    Style::default().fg(color),
                );
            }
            area.x + ACTIVE_INDENT.min(area.width)
        } else {
            area.x
        };

        let available = (area.x + area.width).saturating_sub(label_x) as usize;
        if available == 0 {
            return;
        }

        let color = self
            .theme
            .fade(self.theme.text, self.label_opacity() * self.opacity);
        let mut style = Style::default().fg(color);
        if self.selected {
            style = style.add_modifier(Modifier::UNDERLINED);
        }

        let label = truncate_to_width(self.title, available);
        buf.set_stringn(label_x, y, &label, available, style);
    }
}

/// Truncate `s` to at most `max_width` columns, ending with an ellipsis if cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}
