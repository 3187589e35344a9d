//! Single-line text input with a cursor.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Maximum number of characters typing can bring an input to.
pub const CHAR_LIMIT: usize = 256;

/// Editable line of text.
///
/// The cursor is a character index in `0..=len`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
    placeholder: String,
}

impl TextInput {
    /// Creates an empty input showing `placeholder` while empty.
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the text and moves the cursor to the end.
    ///
    /// The value is kept whole even past `CHAR_LIMIT`; the limit only stops
    /// further typing.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor = self.len();
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Splits the text at the cursor for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_index(self.cursor))
    }

    /// Applies an editing key. Returns true if the text changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let plain = key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT;
        match key.code {
            KeyCode::Char(c) if plain => self.insert(c),
            KeyCode::Char('u') if key.modifiers == KeyModifiers::CONTROL => {
                let at = self.byte_index(self.cursor);
                let changed = at > 0;
                self.value.replace_range(..at, "");
                self.cursor = 0;
                changed
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.value.remove(self.byte_index(self.cursor));
                true
            }
            KeyCode::Delete if self.cursor < self.len() => {
                self.value.remove(self.byte_index(self.cursor));
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.len();
                false
            }
            _ => false,
        }
    }

    fn insert(&mut self, c: char) -> bool {
        if self.len() >= CHAR_LIMIT {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
        true
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }
}
