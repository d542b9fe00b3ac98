//! noteline-tui: Terminal UI for the noteline note timeline
//!
//! This crate provides the TUI layer for noteline, including:
//! - Reader pane for the open note
//! - Animated timeline of neighboring notes with click-to-navigate
//! - Event loop driving fetches against a [`NoteSource`]

mod app;
mod event;
mod reader;
pub mod theme;
pub mod timeline;
#[cfg(test)]
pub mod test_utils;

pub use app::{App, Focus, TIMELINE_WIDTH};
pub use event::{key_to_action, Action, Event, EventHandler};
pub use noteline_engine;
pub use reader::ReaderWidget;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use noteline_engine::{
    fetch_window, Config, FetchError, FetchTicket, Nid, Note, NoteId, NoteSource, NoteSummary,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info};

type NoteHandle = JoinHandle<(Nid, Result<Note, FetchError>)>;
type TimelineHandle = JoinHandle<(FetchTicket<NoteId>, Result<Vec<NoteSummary>, FetchError>)>;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Opens `start_path` (for example `/notes/42`), runs the event loop and
/// restores the terminal on exit.
pub async fn run_tui(
    config: Config,
    start_path: String,
    source: Arc<dyn NoteSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal with RAII guard for cleanup
    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut events = EventHandler::new(config.tick_rate());
    let mut app = App::new(config, start_path);
    info!(path = %app.navigator.path(), "Starting TUI");

    let result = run_loop(&mut terminal, &mut app, &mut events, source).await;

    // Restore cursor before guard drops
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    source: Arc<dyn NoteSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut note_handles: Vec<NoteHandle> = Vec::new();
    let mut timeline_handles: Vec<TimelineHandle> = Vec::new();
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            app.render(area, frame.buffer_mut());
        })?;

        // Start fetches the current state calls for
        if let Some(nid) = app.note_request() {
            debug!(nid, "Fetching note");
            let source = Arc::clone(&source);
            note_handles.push(tokio::spawn(async move {
                let result = source.note_by_nid(nid).await;
                (nid, result)
            }));
        }
        if let Some(ticket) = app.timeline_request() {
            debug!(key = %ticket.key, "Fetching timeline");
            let source = Arc::clone(&source);
            let size = app.timeline.window_size();
            timeline_handles.push(tokio::spawn(async move {
                let result = fetch_window(source.as_ref(), Some(&ticket.key), size).await;
                (ticket, result)
            }));
        }

        // Handle events
        if let Some(event) = events.next().await {
            match event {
                Event::Key(key) => app.handle_action(key_to_action(key)),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Tick => {
                    let now = Instant::now();
                    app.tick(now - last_tick);
                    last_tick = now;
                }
                Event::Resize(_, _) => {
                    // Terminal will handle resize automatically
                }
            }
        }

        // Collect completed fetches (non-blocking)
        let mut completed = Vec::new();
        for (i, handle) in note_handles.iter().enumerate() {
            if handle.is_finished() {
                completed.push(i);
            }
        }
        for i in completed.into_iter().rev() {
            if let Ok((nid, result)) = note_handles.remove(i).await {
                app.apply_note(nid, result);
            }
        }

        let mut completed = Vec::new();
        for (i, handle) in timeline_handles.iter().enumerate() {
            if handle.is_finished() {
                completed.push(i);
            }
        }
        for i in completed.into_iter().rev() {
            if let Ok((ticket, result)) = timeline_handles.remove(i).await {
                app.apply_timeline(ticket, result);
            }
        }

        if app.should_quit {
            break;
        }
    }

    abort_all(&note_handles);
    abort_all(&timeline_handles);
    info!("TUI exited");
    Ok(())
}

/// Abort fetch tasks that are still running.
fn abort_all<T>(handles: &[JoinHandle<T>]) {
    for handle in handles {
        handle.abort();
    }
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
