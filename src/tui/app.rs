use std::path::{Path, PathBuf};

use crate::filter::filter_notes;
use crate::models::{Note, NoteId};
use crate::store::{NoteStore, StoreError};

use super::input::TextInput;
use super::list::SelectList;
use super::wizard::Wizard;

/// Rows taken by the header, status line, and help line around a list.
pub const CHROME_ROWS: u16 = 4;

const MAIN_TITLE: &str = "Notes";

/// Interaction mode of the session. Exactly one is active.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Scrolling the note list.
    Browsing,
    /// Typing a filter query.
    Searching,
    /// Creating a note.
    AddWizard(Wizard),
    /// Editing the note with `id`.
    EditWizard { wizard: Wizard, id: NoteId },
    /// Asking whether to delete the entry at `index` of the visible list.
    ConfirmDelete { index: usize },
}

/// Severity of the transient status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// One-line message shown until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

/// Session state for the TUI.
///
/// Holds a snapshot of the store (`all_notes`), the visible (possibly
/// filtered) note list, the search input, and the active mode. The snapshot
/// is never edited in place; after every write the whole state is rebuilt
/// from a fresh load.
#[derive(Debug, Clone)]
pub struct App {
    root: PathBuf,
    all_notes: Vec<Note>,
    list: SelectList<Note>,
    search: TextInput,
    filtered: bool,
    mode: Mode,
    status: Option<Status>,
    width: u16,
    height: u16,
}

impl App {
    /// Creates browsing state over `notes`.
    ///
    /// `root` is the project directory the file picker enumerates.
    ///
    /// # Examples
    ///
    /// ```
    /// use notes::NoteBuilder;
    /// use notes::tui::{App, Mode};
    ///
    /// let app = App::new("/tmp", vec![NoteBuilder::new().message("hi").build()]);
    /// assert!(matches!(app.mode(), Mode::Browsing));
    /// assert_eq!(app.notes().len(), 1);
    /// ```
    pub fn new(root: impl Into<PathBuf>, notes: Vec<Note>) -> Self {
        Self {
            root: root.into(),
            list: SelectList::new(MAIN_TITLE, notes.clone()),
            all_notes: notes,
            search: TextInput::new("Search (use # to search by tag)"),
            filtered: false,
            mode: Mode::Browsing,
            status: None,
            width: 0,
            height: 0,
        }
    }

    /// Loads the store and creates browsing state.
    ///
    /// # Errors
    ///
    /// Returns any error from [`NoteStore::load_all`].
    pub fn load(store: &NoteStore) -> Result<Self, StoreError> {
        Ok(Self::new(store.root(), store.load_all()?))
    }

    /// Rebuilds browsing state from a fresh load, keeping the viewport size.
    ///
    /// # Errors
    ///
    /// Returns any error from [`NoteStore::load_all`].
    pub fn reload(&self, store: &NoteStore) -> Result<Self, StoreError> {
        let mut fresh = Self::load(store)?;
        fresh.resize(self.width, self.height);
        Ok(fresh)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Returns the snapshot taken at the last load.
    pub fn all_notes(&self) -> &[Note] {
        &self.all_notes
    }

    /// Returns the currently displayed notes.
    pub fn notes(&self) -> &[Note] {
        self.list.items()
    }

    pub fn list(&self) -> &SelectList<Note> {
        &self.list
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list.selected_index()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.list.selected()
    }

    pub fn search_input(&self) -> &TextInput {
        &self.search
    }

    /// True when the visible list is a search result rather than the snapshot.
    pub fn is_filtered(&self) -> bool {
        self.filtered
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Rows available to a full-screen list.
    pub fn list_rows(&self) -> u16 {
        self.height.saturating_sub(CHROME_ROWS).max(1)
    }

    /// Records the terminal size and resizes the lists on screen.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let rows = self.list_rows();
        self.list.resize(rows);
        match &mut self.mode {
            Mode::AddWizard(wizard) | Mode::EditWizard { wizard, .. } => wizard.resize(rows),
            _ => {}
        }
    }

    pub(super) fn list_mut(&mut self) -> &mut SelectList<Note> {
        &mut self.list
    }

    pub(super) fn mode_mut(&mut self) -> &mut Mode {
        &mut self.mode
    }

    pub(super) fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }

    pub(super) fn clear_status(&mut self) {
        self.status = None;
    }

    /// Enters search mode with an empty query.
    pub fn begin_search(&mut self) {
        self.search.clear();
        self.mode = Mode::Searching;
    }

    /// Recomputes the visible list from the snapshot and the current query.
    pub fn apply_filter(&mut self) {
        let items = filter_notes(&self.all_notes, self.search.value());
        self.list.set_items(items);
        self.list.first();
        self.filtered = !self.search.value().trim().is_empty();
    }

    /// Edits the query with `key` and refilters when the text changed.
    pub(super) fn search_key(&mut self, key: crossterm::event::KeyEvent) {
        if self.search.handle_key(key) {
            self.apply_filter();
        }
    }

    /// Leaves search keeping the filtered list.
    pub fn accept_search(&mut self) {
        self.mode = Mode::Browsing;
    }

    /// Restores the full snapshot and returns to browsing.
    pub fn clear_filter(&mut self) {
        self.list.set_items(self.all_notes.clone());
        self.filtered = false;
        self.mode = Mode::Browsing;
    }

    /// Starts the add wizard, discarding any earlier partial input.
    pub fn begin_add(&mut self) {
        self.mode = Mode::AddWizard(Wizard::add());
    }

    /// Starts the edit wizard on the selected note. No-op on an empty list.
    pub fn begin_edit(&mut self) {
        if let Some(note) = self.selected_note() {
            self.mode = Mode::EditWizard {
                wizard: Wizard::edit(note),
                id: note.id.clone(),
            };
        }
    }

    /// Asks for confirmation to delete the selected note. No-op on an empty list.
    pub fn begin_delete(&mut self) {
        if let Some(index) = self.list.selected_index() {
            self.mode = Mode::ConfirmDelete { index };
        }
    }

    /// Drops any wizard or confirmation state and returns to browsing.
    pub fn cancel(&mut self) {
        self.mode = Mode::Browsing;
    }
}
