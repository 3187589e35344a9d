use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use super::NoteId;

/// A note attached to the project, optionally anchored to a file and line.
///
/// Field order matches the on-disk JSON layout. An absent file or line is
/// omitted when written; an empty file string or a zero line read from disk
/// is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier (UUID text form).
    pub id: NoteId,
    /// The note's message.
    pub message: String,
    /// Path relative to the project root.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub file: Option<String>,
    /// Line within `file`. Only meaningful when `file` is set.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "zero_as_none"
    )]
    pub line: Option<u32>,
    /// When the note was created or last edited.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Tags in the order they were entered. Duplicates are kept.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub tags: Vec<String>,
}

impl Note {
    /// Returns `file:line`, `file`, or `None` when the note has no anchor.
    pub fn location(&self) -> Option<String> {
        let file = self.file.as_deref()?;
        Some(match self.line {
            Some(line) => format!("{file}:{line}"),
            None => file.to_string(),
        })
    }

    /// Returns true if any tag equals `tag` exactly.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u32>::deserialize(deserializer)?;
    Ok(value.filter(|&n| n > 0))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Builder for constructing `Note` instances with optional fields.
///
/// # Examples
///
/// ```
/// use notes::NoteBuilder;
///
/// let note = NoteBuilder::new()
///     .message("fix bug")
///     .file("src/main.rs")
///     .tags(vec!["urgent".to_string()])
///     .build();
///
/// assert_eq!(note.message, "fix bug");
/// assert_eq!(note.file.as_deref(), Some("src/main.rs"));
/// assert_eq!(note.line, None);
/// ```
#[derive(Debug, Default)]
pub struct NoteBuilder {
    id: Option<NoteId>,
    message: Option<String>,
    file: Option<String>,
    line: Option<u32>,
    created_at: Option<OffsetDateTime>,
    tags: Option<Vec<String>>,
}

impl NoteBuilder {
    /// Creates a new `NoteBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the note ID.
    pub fn id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the note message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the anchored file. An empty string leaves the note unanchored.
    pub fn file(mut self, file: impl Into<String>) -> Self {
        let file = file.into();
        self.file = (!file.is_empty()).then_some(file);
        self
    }

    /// Sets the anchored line. Zero means no line.
    pub fn line(mut self, line: u32) -> Self {
        self.line = (line > 0).then_some(line);
        self
    }

    /// Sets the created timestamp.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the tags.
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Builds the `Note`, generating an id and using the current time when unset.
    ///
    /// A line without a file is dropped.
    pub fn build(self) -> Note {
        let file = self.file;
        let line = if file.is_some() { self.line } else { None };
        Note {
            id: self.id.unwrap_or_else(NoteId::generate),
            message: self.message.unwrap_or_default(),
            file,
            line,
            created_at: self.created_at.unwrap_or_else(OffsetDateTime::now_utc),
            tags: self.tags.unwrap_or_default(),
        }
    }
}
