//! Selectable, scrollable list state shared by the note list and the file picker.

use std::ops::Range;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::Note;

/// Terminal rows used by one entry (title line plus description line).
pub const ENTRY_HEIGHT: usize = 2;

/// Longest message shown in full as a list title.
const TITLE_MAX_CHARS: usize = 40;

/// Something that can be shown as a two-line list entry.
pub trait ListEntry {
    /// First line, shown prominently.
    fn title(&self) -> String;
    /// Second line, shown muted. May be empty.
    fn description(&self) -> String;
}

impl ListEntry for Note {
    fn title(&self) -> String {
        truncate_title(&self.message)
    }

    fn description(&self) -> String {
        let mut desc = self.location().unwrap_or_default();
        if !self.tags.is_empty() {
            if !desc.is_empty() {
                desc.push(' ');
            }
            desc.push('[');
            desc.push_str(&self.tags.join(", "));
            desc.push(']');
        }
        desc
    }
}

/// An entry in the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEntry {
    /// Leaves the note without a file anchor.
    NoFile,
    /// A path relative to the project root.
    File(String),
}

impl PickerEntry {
    /// Returns the file this entry selects, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            PickerEntry::NoFile => None,
            PickerEntry::File(path) => Some(path),
        }
    }
}

impl ListEntry for PickerEntry {
    fn title(&self) -> String {
        match self {
            PickerEntry::NoFile => "(No File)".to_string(),
            PickerEntry::File(path) => path.clone(),
        }
    }

    fn description(&self) -> String {
        String::new()
    }
}

fn truncate_title(message: &str) -> String {
    if message.chars().count() > TITLE_MAX_CHARS {
        let head: String = message.chars().take(TITLE_MAX_CHARS - 3).collect();
        format!("{head}...")
    } else {
        message.to_string()
    }
}

/// List state: items, highlighted index, and the visible window.
///
/// The selection is always within `0..len` while the list is non-empty.
/// Resizing only changes how many entries fit, never the data.
#[derive(Debug, Clone)]
pub struct SelectList<T> {
    title: String,
    items: Vec<T>,
    selected: usize,
    offset: usize,
    rows: usize,
}

impl<T> SelectList<T> {
    /// Creates a list with the first item selected.
    pub fn new(title: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            title: title.into(),
            items,
            selected: 0,
            offset: 0,
            rows: ENTRY_HEIGHT,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces the items, keeping the selection in range.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.select(self.selected);
    }

    /// Returns the highlighted index, or `None` for an empty list.
    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    /// Returns the highlighted item.
    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// Highlights `index`, clamped to the last item.
    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.items.len().saturating_sub(1));
        self.scroll_to_selection();
    }

    pub fn next(&mut self) {
        self.select(self.selected.saturating_add(1));
    }

    pub fn previous(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    pub fn page_down(&mut self) {
        self.select(self.selected.saturating_add(self.page_size()));
    }

    pub fn page_up(&mut self) {
        self.select(self.selected.saturating_sub(self.page_size()));
    }

    pub fn first(&mut self) {
        self.select(0);
    }

    pub fn last(&mut self) {
        self.select(usize::MAX);
    }

    /// Sets the number of terminal rows available for entries.
    pub fn resize(&mut self, rows: u16) {
        self.rows = usize::from(rows).max(ENTRY_HEIGHT);
        self.scroll_to_selection();
    }

    /// Number of entries that fit in the viewport.
    pub fn page_size(&self) -> usize {
        (self.rows / ENTRY_HEIGHT).max(1)
    }

    /// Indices of the entries currently in view.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.page_size()).min(self.items.len());
        self.offset.min(end)..end
    }

    /// Applies a navigation key. Returns true if the key was a navigation key.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !(key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT) {
            return false;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::PageUp | KeyCode::Left | KeyCode::Char('h') => self.page_up(),
            KeyCode::PageDown | KeyCode::Right | KeyCode::Char('l') => self.page_down(),
            KeyCode::Home | KeyCode::Char('g') => self.first(),
            KeyCode::End | KeyCode::Char('G') => self.last(),
            _ => return false,
        }
        true
    }

    fn scroll_to_selection(&mut self) {
        let page = self.page_size();
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + page {
            self.offset = self.selected + 1 - page;
        }
        // Pull the window back when the list shrank under it
        let max_offset = self.items.len().saturating_sub(page);
        self.offset = self.offset.min(max_offset);
    }
}

impl SelectList<PickerEntry> {
    /// Builds the picker: the "no file" entry followed by `files`.
    ///
    /// Highlights `current` when it is one of the files, otherwise the
    /// "no file" entry.
    pub fn picker(title: impl Into<String>, files: Vec<String>, current: Option<&str>) -> Self {
        let index = current
            .and_then(|c| files.iter().position(|f| f == c))
            .map_or(0, |i| i + 1);

        let items = std::iter::once(PickerEntry::NoFile)
            .chain(files.into_iter().map(PickerEntry::File))
            .collect();

        let mut list = Self::new(title, items);
        list.select(index);
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteBuilder;

    fn numbers(n: usize) -> SelectList<usize> {
        SelectList::new("numbers", (0..n).collect())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn navigation_clamps_without_wrapping() {
        let mut list = numbers(3);
        assert_eq!(list.selected_index(), Some(0));

        list.previous();
        assert_eq!(list.selected_index(), Some(0));

        list.next();
        list.next();
        list.next();
        assert_eq!(list.selected_index(), Some(2));
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut list = numbers(0);
        list.next();
        list.last();
        assert_eq!(list.selected_index(), None);
        assert!(list.selected().is_none());
        assert_eq!(list.visible_range(), 0..0);
    }

    #[test]
    fn set_items_clamps_selection() {
        let mut list = numbers(10);
        list.last();
        list.set_items(vec![1, 2]);
        assert_eq!(list.selected_index(), Some(1));
        assert_eq!(list.selected(), Some(&2));
    }

    #[test]
    fn viewport_follows_selection() {
        let mut list = numbers(20);
        list.resize(6); // three entries per page
        assert_eq!(list.page_size(), 3);
        assert_eq!(list.visible_range(), 0..3);

        list.select(4);
        assert_eq!(list.visible_range(), 2..5);

        list.page_down();
        assert_eq!(list.selected_index(), Some(7));
        assert_eq!(list.visible_range(), 5..8);

        list.first();
        assert_eq!(list.visible_range(), 0..3);
    }

    #[test]
    fn resize_changes_window_not_data() {
        let mut list = numbers(20);
        list.select(10);
        list.resize(4);
        assert_eq!(list.selected_index(), Some(10));
        assert!(list.visible_range().contains(&10));

        list.resize(100);
        assert_eq!(list.len(), 20);
        assert!(list.visible_range().contains(&10));
    }

    #[test]
    fn handle_key_maps_navigation_keys() {
        let mut list = numbers(5);
        assert!(list.handle_key(key(KeyCode::Down)));
        assert!(list.handle_key(key(KeyCode::Char('j'))));
        assert_eq!(list.selected_index(), Some(2));
        assert!(list.handle_key(key(KeyCode::Char('G'))));
        assert_eq!(list.selected_index(), Some(4));
        assert!(list.handle_key(key(KeyCode::Home)));
        assert_eq!(list.selected_index(), Some(0));

        assert!(!list.handle_key(key(KeyCode::Char('x'))));
        assert!(!list.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL)));
        assert_eq!(list.selected_index(), Some(0));
    }

    #[test]
    fn note_entry_truncates_long_messages() {
        let note = NoteBuilder::new()
            .message("This is an extremely long note that exceeds the limit")
            .build();
        let title = note.title();
        assert_eq!(title.chars().count(), 40);
        assert!(title.ends_with("..."));

        let short = NoteBuilder::new().message("Short note").build();
        assert_eq!(short.title(), "Short note");
    }

    #[test]
    fn note_entry_description_has_location_and_tags() {
        let note = NoteBuilder::new()
            .message("m")
            .file("src/app.rs")
            .line(42)
            .tags(vec!["a".into(), "b".into()])
            .build();
        assert_eq!(note.description(), "src/app.rs:42 [a, b]");

        let bare = NoteBuilder::new().message("m").build();
        assert_eq!(bare.description(), "");
    }

    #[test]
    fn picker_prepends_no_file_and_preselects_current() {
        let files = vec!["a.rs".to_string(), "b.rs".to_string()];

        let picker = SelectList::picker("pick", files.clone(), Some("b.rs"));
        assert_eq!(picker.len(), 3);
        assert_eq!(picker.items()[0], PickerEntry::NoFile);
        assert_eq!(picker.selected(), Some(&PickerEntry::File("b.rs".into())));

        let picker = SelectList::picker("pick", files.clone(), Some("gone.rs"));
        assert_eq!(picker.selected(), Some(&PickerEntry::NoFile));

        let picker = SelectList::picker("pick", files, None);
        assert_eq!(picker.selected().and_then(PickerEntry::file), None);
        assert_eq!(picker.items()[0].title(), "(No File)");
    }
}
