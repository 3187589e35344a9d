use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Length of the abbreviated id shown in listings and accepted on the command line.
pub const SHORT_ID_LEN: usize = 8;

/// Unique identifier for a note.
///
/// Wraps the UUID text form stored on disk. Ids are opaque strings so that
/// stores written by other tools still load even when an id is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Creates a note ID from its text form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random (v4) note ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the full text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first eight characters, or the whole id if it is shorter.
    ///
    /// # Examples
    ///
    /// ```
    /// use notes::NoteId;
    ///
    /// let id = NoteId::new("3f2b9c1a-0000-4000-8000-000000000000");
    /// assert_eq!(id.short(), "3f2b9c1a");
    /// assert_eq!(NoteId::new("abc").short(), "abc");
    /// ```
    pub fn short(&self) -> &str {
        self.0.get(..SHORT_ID_LEN).unwrap_or(&self.0)
    }

    /// Returns true if `query` is this full id or its eight character prefix.
    pub fn matches(&self, query: &str) -> bool {
        self.0 == query || self.short() == query
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
