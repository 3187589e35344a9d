//! Input handling for the TUI.
//!
//! Routes terminal events to the handler for the active mode and performs
//! any store write a commit requires. The session is passed in and handed
//! back, so every transition can be driven without a terminal.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};

use super::app::{App, Mode, StatusKind};
use super::wizard::{Draft, WizardStep};
use crate::models::NoteId;
use crate::store::{NoteStore, NoteUpdate, StoreError};

/// What the event loop should do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Handles one terminal event and returns the next session state.
///
/// # Event Handling
///
/// - Resize: records the new size and resizes the visible lists
/// - Key presses: dispatched on the current [`Mode`]
/// - Everything else (mouse, focus, paste, key release) is ignored
///
/// # Examples
///
/// ```
/// use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
/// use notes::NoteStore;
/// use notes::tui::{App, event::{Control, handle_event}};
///
/// let store = NoteStore::new(std::env::temp_dir());
/// let app = App::new(store.root(), Vec::new());
/// let key = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
/// let (_app, control) = handle_event(app, key, &store);
/// assert_eq!(control, Control::Quit);
/// ```
pub fn handle_event(mut app: App, event: Event, store: &NoteStore) -> (App, Control) {
    match event {
        Event::Resize(width, height) => {
            app.resize(width, height);
            (app, Control::Continue)
        }
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key, store),
        _ => (app, Control::Continue),
    }
}

/// Handles a key press for the current mode.
pub fn handle_key_event(mut app: App, key: KeyEvent, store: &NoteStore) -> (App, Control) {
    app.clear_status();

    match app.mode() {
        Mode::Browsing => handle_browsing(app, key),
        Mode::Searching => (handle_searching(app, key), Control::Continue),
        Mode::AddWizard(_) | Mode::EditWizard { .. } => {
            (handle_wizard(app, key, store), Control::Continue)
        }
        Mode::ConfirmDelete { index } => {
            let index = *index;
            (handle_confirm(app, key, index, store), Control::Continue)
        }
    }
}

fn is_ctrl(key: KeyEvent, c: char) -> bool {
    key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char(c)
}

fn is_plain(key: KeyEvent, c: char) -> bool {
    key.modifiers.is_empty() && key.code == KeyCode::Char(c)
}

fn is_cancel(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc || is_ctrl(key, 'c')
}

/// Handles keys while scrolling the list.
///
/// - `q`, `Esc`, `Ctrl+C`, `Ctrl+Q`: quit (`Esc` clears an active filter first)
/// - `/`, `Ctrl+F`: search
/// - `a`, `Ctrl+A`: add
/// - `e`, `Ctrl+E`: edit selected
/// - `d`, `Delete`, `Ctrl+D`: delete selected
/// - anything else goes to the list's navigation
fn handle_browsing(mut app: App, key: KeyEvent) -> (App, Control) {
    if key.code == KeyCode::Esc && app.is_filtered() {
        app.clear_filter();
        return (app, Control::Continue);
    }

    if is_plain(key, 'q') || is_cancel(key) || is_ctrl(key, 'q') {
        return (app, Control::Quit);
    }

    if is_plain(key, '/') || is_ctrl(key, 'f') {
        app.begin_search();
    } else if is_plain(key, 'a') || is_ctrl(key, 'a') {
        app.begin_add();
    } else if is_plain(key, 'e') || is_ctrl(key, 'e') {
        app.begin_edit();
    } else if is_plain(key, 'd') || is_ctrl(key, 'd') || key.code == KeyCode::Delete {
        app.begin_delete();
    } else {
        app.list_mut().handle_key(key);
    }
    (app, Control::Continue)
}

/// Handles keys while typing a query.
///
/// Every edit refilters the snapshot. Arrow and page keys move the list
/// selection so results can be browsed without leaving search.
fn handle_searching(mut app: App, key: KeyEvent) -> App {
    if is_cancel(key) {
        app.clear_filter();
        return app;
    }

    match key.code {
        KeyCode::Enter => app.accept_search(),
        KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown => {
            app.list_mut().handle_key(key);
        }
        _ => app.search_key(key),
    }
    app
}

fn handle_wizard(mut app: App, key: KeyEvent, store: &NoteStore) -> App {
    if is_cancel(key) {
        app.cancel();
        return app;
    }

    let root = app.root().to_path_buf();
    let rows = app.list_rows();
    let step = match app.mode_mut() {
        Mode::AddWizard(wizard) | Mode::EditWizard { wizard, .. } => {
            wizard.handle_key(key, &root, rows)
        }
        _ => return app,
    };

    match step {
        WizardStep::Continue => app,
        WizardStep::Rejected(reason) => {
            app.set_status(StatusKind::Error, reason);
            app
        }
        WizardStep::Finished(draft) => {
            let edit_id = match app.mode() {
                Mode::EditWizard { id, .. } => Some(id.clone()),
                _ => None,
            };
            commit_draft(app, draft, edit_id, store)
        }
    }
}

fn commit_draft(app: App, draft: Draft, edit_id: Option<NoteId>, store: &NoteStore) -> App {
    let result = match &edit_id {
        None => store
            .create(&draft.message, draft.file.as_deref(), None, draft.tags)
            .map(|_| "note saved".to_string()),
        Some(id) => store
            .update(
                id.as_str(),
                NoteUpdate {
                    message: Some(draft.message),
                    file: Some(draft.file),
                    tags: Some(draft.tags),
                },
            )
            .map(|_| "note updated".to_string()),
    };

    after_commit(app, result, store)
}

/// Handles the answer to the delete question.
///
/// `y`, `Y` and `Enter` delete the entry at `index` of the visible list;
/// any other key cancels.
fn handle_confirm(mut app: App, key: KeyEvent, index: usize, store: &NoteStore) -> App {
    let accepted = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter);
    if !accepted {
        app.cancel();
        return app;
    }

    let Some(id) = app.notes().get(index).map(|note| note.id.clone()) else {
        app.cancel();
        return app;
    };

    let result = store
        .delete_by_id(id.as_str())
        .map(|_| "note deleted".to_string());
    after_commit(app, result, store)
}

/// Rebuilds state from the store after a write, or reports the failure.
///
/// On failure the pre-commit lists are kept and the session returns to
/// browsing with an error status.
fn after_commit(mut app: App, result: Result<String, StoreError>, store: &NoteStore) -> App {
    let message = match result {
        Ok(message) => message,
        Err(e) => {
            warn!("commit failed: {e}");
            app.cancel();
            app.set_status(StatusKind::Error, format!("Error: {e}"));
            return app;
        }
    };

    info!("{message}");
    match app.reload(store) {
        Ok(mut fresh) => {
            fresh.set_status(StatusKind::Info, message);
            fresh
        }
        Err(e) => {
            warn!("reload after commit failed: {e}");
            app.cancel();
            app.set_status(StatusKind::Error, format!("Error reloading notes: {e}"));
            app
        }
    }
}
