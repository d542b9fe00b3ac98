//! Application state and update logic for the noteline TUI.

use std::time::Duration;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use tracing::{info, warn};

use noteline_engine::{
    Config, FetchError, FetchTicket, Navigator, Nid, Note, NoteId, NoteSummary, NoteTimeline,
    Route, ScrollSpring,
};

use crate::event::Action;
use crate::reader::ReaderWidget;
use crate::theme::{IconSet, Theme};
use crate::timeline::{TimelineState, TimelineWidget};

/// Width of the timeline pane, borders included.
pub const TIMELINE_WIDTH: u16 = 32;

/// Lines scrolled per page in the reader.
const PAGE_SIZE: i32 = 10;

/// Ticks a notification stays visible.
const NOTIFICATION_TICKS: usize = 80;

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Reader,
    #[default]
    Timeline,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Whether the help overlay is visible.
    pub show_help: bool,

    /// Pane receiving navigation keys.
    pub focus: Focus,

    pub config: Config,
    pub theme: Theme,
    pub icons: IconSet,

    /// Client-side navigation state; the open note comes from its path.
    pub navigator: Navigator,

    /// Neighbor query and row selection.
    pub timeline: NoteTimeline,

    /// Animated rows shown in the timeline pane.
    pub timeline_state: TimelineState,

    /// The loaded note, once fetched.
    pub current_note: Option<Note>,

    /// Note fetch in flight, by nid.
    note_in_flight: Option<Nid>,

    /// Note whose last fetch failed; not retried until refresh or navigation.
    note_failed: Option<Nid>,

    /// Whether the user asked to refetch the timeline.
    refresh_requested: bool,

    /// Reader scroll position.
    pub reader_scroll: ScrollSpring,

    /// Tick counter for spinners.
    pub tick: usize,

    /// Notification message (displayed temporarily, cleared after some ticks).
    pub notification: Option<String>,

    /// Ticks remaining until notification is cleared.
    notification_ttl: usize,

    /// Inner area of the timeline pane from the last render.
    timeline_inner: Option<Rect>,
}

impl App {
    /// Create a new app opened at `path`.
    pub fn new(config: Config, path: impl Into<String>) -> Self {
        let theme = Theme::named(config.theme);
        let icons = IconSet::new(config.icons);
        let timeline = NoteTimeline::new(config.window_size);
        let timeline_state = TimelineState::new(config.motion_timing());

        Self {
            should_quit: false,
            show_help: false,
            focus: Focus::default(),
            config,
            theme,
            icons,
            navigator: Navigator::new(path),
            timeline,
            timeline_state,
            current_note: None,
            note_in_flight: None,
            note_failed: None,
            refresh_requested: false,
            reader_scroll: ScrollSpring::default(),
            tick: 0,
            notification: None,
            notification_ttl: 0,
            timeline_inner: None,
        }
    }

    /// The loaded note, if it is the one the current route names.
    pub fn open_note(&self) -> Option<&Note> {
        note_for_route(self.current_note.as_ref(), self.route_nid())
    }

    /// Projection of the open note used for the timeline fallback.
    pub fn current_summary(&self) -> Option<&NoteSummary> {
        self.open_note().map(Note::summary)
    }

    /// Nid of the note named by the current route.
    fn route_nid(&self) -> Option<Nid> {
        match self.navigator.route() {
            Some(Route::Note { nid }) => Some(nid),
            _ => None,
        }
    }

    /// Whether the note for the current route is being fetched.
    pub fn is_note_loading(&self) -> bool {
        self.note_in_flight.is_some() && self.note_in_flight == self.route_nid()
    }

    /// Show a temporary notification.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
        self.notification_ttl = NOTIFICATION_TICKS;
    }

    /// Nid of a note that should be fetched now, if any.
    ///
    /// Marks the fetch as in flight; the result goes to [`App::apply_note`].
    pub fn note_request(&mut self) -> Option<Nid> {
        let nid = self.route_nid()?;
        if self.current_note.as_ref().is_some_and(|n| n.nid() == nid)
            || self.note_in_flight == Some(nid)
            || self.note_failed == Some(nid)
        {
            return None;
        }
        self.note_in_flight = Some(nid);
        Some(nid)
    }

    /// Apply a finished note fetch. Results for a note that is no longer
    /// open are dropped.
    pub fn apply_note(&mut self, nid: Nid, result: Result<Note, FetchError>) {
        if self.note_in_flight == Some(nid) {
            self.note_in_flight = None;
        }
        if self.route_nid() != Some(nid) {
            return;
        }

        match result {
            Ok(note) => {
                info!(nid, title = %note.summary().title, "Note loaded");
                self.current_note = Some(note);
                self.refresh_rows();
            }
            Err(e) => {
                warn!(nid, error = %e, "Note fetch failed");
                self.note_failed = Some(nid);
                self.current_note = None;
                self.refresh_rows();
                self.notify(format!("Could not load note {nid}: {e}"));
            }
        }
    }

    /// Ticket for a timeline fetch that should be issued now, if any.
    pub fn timeline_request(&mut self) -> Option<FetchTicket<NoteId>> {
        let current = note_for_route(self.current_note.as_ref(), self.route_nid());
        let synced = self.timeline.sync(current.map(Note::summary));
        if synced.is_some() {
            self.refresh_requested = false;
            return synced;
        }
        if std::mem::take(&mut self.refresh_requested) {
            return self.timeline.refresh();
        }
        None
    }

    /// Apply a finished timeline fetch.
    pub fn apply_timeline(
        &mut self,
        ticket: FetchTicket<NoteId>,
        result: Result<Vec<NoteSummary>, FetchError>,
    ) {
        self.timeline.apply(ticket, result);
        self.refresh_rows();
    }

    /// Re-derive timeline rows from the current inputs.
    pub fn refresh_rows(&mut self) {
        let current = note_for_route(self.current_note.as_ref(), self.route_nid());
        let rows = self
            .timeline
            .rows(self.navigator.note_param(), current.map(Note::summary));
        self.timeline_state.set_rows(&rows);
    }

    /// Navigate to `route`: smooth-scroll the reader to the top and switch
    /// the open note. The previous scroll position is not restored.
    pub fn navigate(&mut self, route: Route) {
        self.reader_scroll.to_top();
        if self.navigator.push(route) {
            info!(path = %self.navigator.path(), "Navigated");
            self.route_changed();
        }
    }

    /// Go back in navigation history.
    pub fn back(&mut self) {
        if self.navigator.back() {
            self.reader_scroll.to_top();
            self.route_changed();
        }
    }

    fn route_changed(&mut self) {
        self.note_failed = None;
        if self.route_nid().is_none() {
            self.current_note = None;
        }
        self.timeline_state.follow();
        self.refresh_rows();
    }

    /// Activate the selected timeline row.
    pub fn activate_selected(&mut self) {
        if let Some(nid) = self.timeline_state.selected_row().map(|r| r.nid) {
            self.navigate(Route::Note { nid });
        }
    }

    /// Advance animations and timers.
    pub fn tick(&mut self, dt: Duration) {
        self.tick = self.tick.wrapping_add(1);
        self.timeline_state.tick(dt);
        self.reader_scroll.step(dt);

        if self.notification_ttl > 0 {
            self.notification_ttl -= 1;
            if self.notification_ttl == 0 {
                self.notification = None;
            }
        }
    }

    /// Handle a key action.
    pub fn handle_action(&mut self, action: Action) {
        if self.show_help {
            if matches!(action, Action::Help | Action::Back | Action::Quit) {
                self.show_help = false;
            }
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Help => self.show_help = true,
            Action::Back => self.back(),
            Action::Select => {
                if self.focus == Focus::Timeline {
                    self.activate_selected();
                }
            }
            Action::Up => match self.focus {
                Focus::Timeline => self.timeline_state.select_prev(),
                Focus::Reader => self.reader_scroll.scroll_by(-1),
            },
            Action::Down => match self.focus {
                Focus::Timeline => self.timeline_state.select_next(),
                Focus::Reader => self.reader_scroll.scroll_by(1),
            },
            Action::PageUp => self.reader_scroll.scroll_by(-PAGE_SIZE),
            Action::PageDown => self.reader_scroll.scroll_by(PAGE_SIZE),
            Action::Top => self.reader_scroll.to_top(),
            Action::NextPane => {
                self.focus = match self.focus {
                    Focus::Reader => Focus::Timeline,
                    Focus::Timeline => Focus::Reader,
                };
            }
            Action::Refresh => {
                self.refresh_requested = true;
                self.note_failed = None;
            }
            Action::None => {}
        }
    }

    /// Timeline row under a terminal position.
    fn timeline_row_at(&self, column: u16, row: u16) -> Option<usize> {
        let inner = self.timeline_inner?;
        let inside = column >= inner.x
            && column < inner.x + inner.width
            && row >= inner.y
            && row < inner.y + inner.height;
        if !inside {
            return None;
        }
        self.timeline_state
            .y_to_row_index(usize::from(row - inner.y))
    }

    /// Handle a mouse event: hover, click-to-navigate and wheel scrolling.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Moved => {
                let hovered = self.timeline_row_at(mouse.column, mouse.row);
                self.timeline_state.set_hover(hovered);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let nid = self
                    .timeline_row_at(mouse.column, mouse.row)
                    .and_then(|idx| self.timeline_state.live_row_at(idx))
                    .map(|r| r.nid);
                if let Some(nid) = nid {
                    self.navigate(Route::Note { nid });
                }
            }
            MouseEventKind::ScrollUp => self.reader_scroll.scroll_by(-3),
            MouseEventKind::ScrollDown => self.reader_scroll.scroll_by(3),
            _ => {}
        }
    }

    /// Render the whole screen.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let [main, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let (reader_area, timeline_area) = if self.timeline_state.is_empty() {
            (main, None)
        } else {
            let [reader, timeline] =
                Layout::horizontal([Constraint::Min(20), Constraint::Length(TIMELINE_WIDTH)])
                    .areas(main);
            (reader, Some(timeline))
        };

        ReaderWidget::new(self.open_note(), &self.theme, &self.icons)
            .loading(self.is_note_loading(), self.tick)
            .scroll(self.reader_scroll.offset())
            .focused(self.focus == Focus::Reader)
            .render(reader_area, buf);

        self.timeline_inner =
            timeline_area.map(|a| Block::default().borders(Borders::ALL).inner(a));
        if let (Some(timeline_area), Some(inner)) = (timeline_area, self.timeline_inner) {
            self.timeline_state
                .ensure_selection_visible(inner.height as usize);
            TimelineWidget::new(&self.timeline_state, &self.theme, &self.icons)
                .focused(self.focus == Focus::Timeline)
                .loading(self.timeline.is_loading(), self.tick)
                .render(timeline_area, buf);
        }

        self.render_status(status, buf);

        if self.show_help {
            render_help_overlay(area, buf, &self.theme);
        }
    }

    fn render_status(&self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.navigator.path()),
                Style::default().fg(self.theme.primary).bg(self.theme.surface),
            ),
            Span::raw(" "),
        ];
        let hovered_link = self
            .timeline_state
            .hovered()
            .and_then(|idx| self.timeline_state.live_row_at(idx))
            .map(|row| Route::Note { nid: row.nid }.path());

        match (&self.notification, hovered_link) {
            (Some(message), _) => spans.push(Span::styled(
                message.clone(),
                Style::default().fg(self.theme.error),
            )),
            (None, Some(link)) => spans.push(Span::styled(
                format!("{} {link}", self.icons.current()),
                Style::default().fg(self.theme.subtext),
            )),
            (None, None) => spans.push(Span::styled(
                "enter open \u{00b7} tab pane \u{00b7} esc back \u{00b7} r refresh \u{00b7} ? help",
                Style::default().fg(self.theme.muted),
            )),
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

/// `note` if it is the note with `route_nid`.
fn note_for_route(note: Option<&Note>, route_nid: Option<Nid>) -> Option<&Note> {
    note.filter(|n| route_nid == Some(n.nid()))
}

/// Render the key help overlay centered in `area`.
fn render_help_overlay(area: Rect, buf: &mut Buffer, theme: &Theme) {
    const KEYS: [(&str, &str); 8] = [
        ("j / k", "move selection or scroll"),
        ("enter", "open selected note"),
        ("tab", "switch pane"),
        ("esc", "go back"),
        ("g", "scroll to top"),
        ("pgup / pgdn", "page reader"),
        ("r", "refresh"),
        ("q", "quit"),
    ];

    let width = 44.min(area.width);
    #[allow(clippy::cast_possible_truncation)]
    let height = (KEYS.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    Clear.render(popup, buf);
    let lines: Vec<Line<'_>> = KEYS
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {key:<12}"), Style::default().fg(theme.primary)),
                Span::styled(*what, Style::default().fg(theme.text)),
            ])
        })
        .collect();
    Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Keys ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .style(Style::default().bg(theme.surface)),
        )
        .render(popup, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{buffer_to_string, sample_note, sample_summary};

    fn loaded_app() -> App {
        let mut app = App::new(Config::default(), "/notes/42");
        assert_eq!(app.note_request(), Some(42));
        app.apply_note(42, Ok(sample_note("a1", 42, "Intro", "Body")));
        app
    }

    fn nids(app: &App) -> Vec<Nid> {
        app.timeline_state.rows().iter().map(|r| r.row.nid).collect()
    }

    #[test]
    fn test_note_request_once() {
        let mut app = App::new(Config::default(), "/notes/42");
        assert_eq!(app.note_request(), Some(42));
        assert!(app.is_note_loading());
        assert_eq!(app.note_request(), None);
    }

    #[test]
    fn test_no_note_open() {
        let mut app = App::new(Config::default(), "/");
        assert_eq!(app.note_request(), None);
        assert!(app.timeline_request().is_none());
        app.refresh_rows();
        assert!(app.timeline_state.is_empty());
    }

    #[test]
    fn test_fallback_row_before_timeline_arrives() {
        let mut app = loaded_app();
        let ticket = app.timeline_request().unwrap();
        assert_eq!(ticket.key, NoteId::from("a1"));

        let rows = app.timeline_state.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].row.title, "Intro");
        assert!(rows[0].row.active);
    }

    #[test]
    fn test_timeline_snapshot_applied() {
        let mut app = loaded_app();
        let ticket = app.timeline_request().unwrap();
        app.apply_timeline(
            ticket,
            Ok(vec![
                sample_summary("a0", 41, "Before"),
                sample_summary("a1", 42, "Intro"),
                sample_summary("a2", 43, "Next"),
            ]),
        );
        assert_eq!(nids(&app), vec![41, 42, 43]);
        assert_eq!(app.timeline_state.selected(), Some(1));
    }

    #[test]
    fn test_activate_navigates_and_scrolls_to_top() {
        let mut app = loaded_app();
        let ticket = app.timeline_request().unwrap();
        app.apply_timeline(
            ticket,
            Ok(vec![
                sample_summary("a1", 42, "Intro"),
                sample_summary("a2", 43, "Next"),
            ]),
        );
        app.reader_scroll.jump_to(12);

        app.handle_action(Action::Down);
        app.handle_action(Action::Select);

        assert_eq!(app.navigator.path(), "/notes/43");
        assert!(!app.reader_scroll.is_settled());
        for _ in 0..100 {
            app.tick(Duration::from_millis(50));
        }
        assert_eq!(app.reader_scroll.offset(), 0);

        // Old snapshot stays, active row moves to the new note
        let active: Vec<Nid> = app
            .timeline_state
            .rows()
            .iter()
            .filter(|r| r.row.active)
            .map(|r| r.row.nid)
            .collect();
        assert_eq!(active, vec![43]);
        assert_eq!(app.note_request(), Some(43));
    }

    #[test]
    fn test_stale_note_result_dropped() {
        let mut app = App::new(Config::default(), "/notes/42");
        assert_eq!(app.note_request(), Some(42));
        app.navigate(Route::Note { nid: 43 });

        app.apply_note(42, Ok(sample_note("a1", 42, "Intro", "")));
        assert!(app.current_note.is_none());
        assert_eq!(app.note_request(), Some(43));
    }

    #[test]
    fn test_failed_navigation_drops_previous_note() {
        let mut app = loaded_app();
        app.navigate(Route::Note { nid: 43 });
        assert_eq!(app.note_request(), Some(43));
        assert!(app.open_note().is_none());
        app.apply_note(43, Err(FetchError::MissingKey));

        assert!(app.current_note.is_none());
        assert!(app.current_summary().is_none());
        assert!(app.timeline_request().is_none());

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        let screen = buffer_to_string(&buf);
        assert!(screen.contains("No note open"));
        assert!(!screen.contains("Body"));
        assert!(!screen.contains("/notes/42"));
    }

    #[test]
    fn test_home_route_drops_note() {
        let mut app = loaded_app();
        app.navigate(Route::Home);
        assert!(app.current_note.is_none());
        assert!(app.current_summary().is_none());
        assert!(app.timeline_state.live_row_at(0).is_none());

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        let screen = buffer_to_string(&buf);
        assert!(screen.contains("No note open"));
        assert!(!screen.contains("Body"));
    }

    #[test]
    fn test_loading_note_hides_previous_one() {
        let mut app = loaded_app();
        app.navigate(Route::Note { nid: 43 });
        assert_eq!(app.note_request(), Some(43));

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        let screen = buffer_to_string(&buf);
        assert!(screen.contains("Loading note"));
        assert!(!screen.contains("Body"));

        // Going back to the loaded note shows it again without a refetch
        app.handle_action(Action::Back);
        assert_eq!(app.open_note().map(Note::nid), Some(42));
        assert_eq!(app.note_request(), None);
    }

    #[test]
    fn test_failed_note_not_retried_until_refresh() {
        let mut app = App::new(Config::default(), "/notes/42");
        assert_eq!(app.note_request(), Some(42));
        app.apply_note(42, Err(FetchError::MissingKey));
        assert!(app.notification.is_some());
        assert_eq!(app.note_request(), None);

        app.handle_action(Action::Refresh);
        assert_eq!(app.note_request(), Some(42));
    }

    #[test]
    fn test_refresh_reissues_timeline_fetch() {
        let mut app = loaded_app();
        let ticket = app.timeline_request().unwrap();
        app.apply_timeline(ticket, Ok(vec![sample_summary("a1", 42, "Intro")]));
        assert!(app.timeline_request().is_none());

        app.handle_action(Action::Refresh);
        let again = app.timeline_request().unwrap();
        assert_eq!(again.key, NoteId::from("a1"));
        assert!(app.timeline_request().is_none());
    }

    #[test]
    fn test_back_restores_previous_route() {
        let mut app = loaded_app();
        app.navigate(Route::Note { nid: 43 });
        app.handle_action(Action::Back);
        assert_eq!(app.navigator.path(), "/notes/42");
    }

    #[test]
    fn test_render_and_click_row() {
        let mut app = loaded_app();
        let ticket = app.timeline_request().unwrap();
        app.apply_timeline(
            ticket,
            Ok(vec![
                sample_summary("a1", 42, "Intro"),
                sample_summary("a2", 43, "Next"),
            ]),
        );
        app.tick(Duration::from_secs(5));

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        let screen = buffer_to_string(&buf);
        assert!(screen.contains(" Timeline "));
        assert!(screen.contains("Next"));
        assert!(screen.contains("/notes/42"));

        // Timeline inner area starts one cell inside the pane border
        let x = 80 - TIMELINE_WIDTH + 2;
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: 2,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        app.handle_mouse(click);
        assert_eq!(app.navigator.path(), "/notes/43");
    }

    #[test]
    fn test_hover_tracks_pointer() {
        let mut app = loaded_app();
        let ticket = app.timeline_request().unwrap();
        app.apply_timeline(ticket, Ok(vec![sample_summary("a1", 42, "Intro")]));

        let area = Rect::new(0, 0, 80, 12);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        let moved = |column, row| MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        app.handle_mouse(moved(80 - TIMELINE_WIDTH + 2, 1));
        assert_eq!(app.timeline_state.hovered(), Some(0));

        // Hovered row's link shows in the status bar
        app.render(area, &mut buf);
        let status = buffer_to_string(&buf).lines().last().unwrap_or_default().to_string();
        assert!(status.contains("\u{2192} /notes/42"));

        app.handle_mouse(moved(2, 1));
        assert_eq!(app.timeline_state.hovered(), None);
    }

    #[test]
    fn test_help_overlay_toggles() {
        let mut app = loaded_app();
        app.handle_action(Action::Help);
        assert!(app.show_help);
        app.handle_action(Action::Down);
        app.handle_action(Action::Back);
        assert!(!app.show_help);
        assert_eq!(app.navigator.path(), "/notes/42");
    }
}
