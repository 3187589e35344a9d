//! Terminal User Interface module for notes.
//!
//! Provides an interactive session over the project's notes: a scrollable
//! list with incremental search, add/edit wizards with a file picker, and a
//! delete confirmation. Uses ratatui for rendering and crossterm for
//! terminal management.

use std::io;
use std::panic;

use anyhow::{Context, Result};
use crossterm::{
    event as crossterm_event, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::config::Config;
use crate::store::NoteStore;

pub mod app;
pub mod event;
pub mod input;
pub mod list;
pub mod ui;
pub mod wizard;

pub use app::{App, Mode, Status, StatusKind};
pub use event::{Control, handle_event};
pub use list::{ListEntry, PickerEntry, SelectList};
pub use ui::Theme;
pub use wizard::{Draft, Stage, Wizard};

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
/// Returns a configured Terminal instance.
///
/// # Errors
///
/// Returns an error if terminal initialization fails.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Disables raw mode and leaves the alternate screen. This should always be
/// called before exiting the TUI, even in error cases.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic handler.
///
/// Ignores errors since we're likely already in a bad state.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal before the default hook runs.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Runs the event loop until the session asks to quit.
///
/// Terminal state is always restored, even on error.
///
/// # Errors
///
/// Returns an error if reading events, rendering, or terminal setup fails.
pub fn run_event_loop(app: App, store: &NoteStore) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, store, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    mut app: App,
    store: &NoteStore,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let theme = Theme::default();

    loop {
        terminal.draw(|frame| {
            ui::draw(frame, &app, &theme);
        })?;

        // Blocks until the next event; nothing changes between events
        let event = crossterm_event::read().context("failed to read terminal event")?;
        let (next, control) = handle_event(app, event, store);
        app = next;
        if control == Control::Quit {
            break;
        }
    }

    Ok(())
}

/// Loads the snapshot the session starts from.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
fn load_app(store: &NoteStore) -> Result<App> {
    App::load(store)
        .with_context(|| format!("Failed to load notes from {}", store.path().display()))
}

/// Entry point for the TUI application.
///
/// Loads the store before touching the terminal, so an unreadable store
/// aborts without leaving raw mode behind.
///
/// # Errors
///
/// Returns an error if:
/// - The store cannot be read or parsed
/// - The terminal size cannot be queried
/// - Terminal initialization or the event loop fails
pub fn run(config: &Config) -> Result<()> {
    let store = config.store();
    let mut app = load_app(&store)?;
    let (width, height) = terminal::size().context("failed to query terminal size")?;
    app.resize(width, height);
    info!(
        "starting session with {} notes from {}",
        app.all_notes().len(),
        store.path().display()
    );

    init_panic_hook();
    run_event_loop(app, &store).context("TUI event loop failed")?;

    Ok(())
}
