//! Reader pane showing the note that is currently open.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use noteline_engine::{Note, Route};

use crate::theme::{IconSet, Theme};

/// Reader pane widget.
pub struct ReaderWidget<'a> {
    note: Option<&'a Note>,
    loading: bool,
    tick: usize,
    scroll: u16,
    focused: bool,
    theme: &'a Theme,
    icons: &'a IconSet,
}

impl<'a> ReaderWidget<'a> {
    pub fn new(note: Option<&'a Note>, theme: &'a Theme, icons: &'a IconSet) -> Self {
        Self {
            note,
            loading: false,
            tick: 0,
            scroll: 0,
            focused: false,
            theme,
            icons,
        }
    }

    /// Show a loading indicator while the note is fetched.
    #[must_use]
    pub fn loading(mut self, loading: bool, tick: usize) -> Self {
        self.loading = loading;
        self.tick = tick;
        self
    }

    /// Vertical scroll offset in lines.
    #[must_use]
    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let Some(note) = self.note else {
            let message = if self.loading {
                format!("{} Loading note\u{2026}", self.icons.spinner(self.tick))
            } else {
                "No note open".to_string()
            };
            return vec![Line::from(Span::styled(
                message,
                Style::default().fg(self.theme.muted),
            ))];
        };

        let summary = note.summary();
        let mut lines = vec![
            Line::from(Span::styled(
                summary.title.clone(),
                Style::default()
                    .fg(self.theme.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled(summary.created_str(), Style::default().fg(self.theme.muted)),
                Span::styled(
                    format!(" {} ", self.icons.dot()),
                    Style::default().fg(self.theme.muted),
                ),
                Span::styled(
                    Route::Note { nid: summary.nid }.path(),
                    Style::default().fg(self.theme.subtext),
                ),
            ]),
            Line::default(),
        ];
        lines.extend(note.text.lines().map(|line| {
            Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(self.theme.text),
            ))
        }));
        lines
    }
}

impl Widget for ReaderWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(self.theme.border_focused)
        } else {
            Style::default().fg(self.theme.border)
        };
        let block = Block::default()
            .title(Span::styled(" Note ", Style::default().fg(self.theme.text)))
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(self.theme.base));

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let content = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height,
        );
        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(content, buf);
    }
}
