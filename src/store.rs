//! JSON-file note store.
//!
//! The whole collection lives in one pretty-printed JSON array under a hidden
//! directory in the project root. Every operation reads or writes the full
//! file; there are no partial updates and no locking.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use thiserror::Error;
use time::OffsetDateTime;

use crate::models::{Note, NoteBuilder, NoteId};
use crate::utils::validate_message;

/// Default name of the storage directory under the project root.
pub const DEFAULT_STORE_DIR: &str = ".notes";

/// File name of the note collection inside the storage directory.
pub const STORE_FILE: &str = "notes.json";

/// Errors that can occur when reading or writing the note store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file or directory could not be read, created, or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a valid note array.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The collection could not be serialized.
    #[error("failed to serialize notes: {0}")]
    Serialize(#[source] serde_json::Error),

    /// No note has the given id or short id.
    #[error("no note found with id {0}")]
    NotFound(String),

    /// A short id matched more than one note.
    #[error("id {id} is ambiguous: it matches {count} notes")]
    AmbiguousId { id: String, count: usize },

    /// User input was rejected before touching the store.
    #[error("{0}")]
    Validation(String),
}

impl StoreError {
    /// Returns true for errors caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            StoreError::NotFound(_) | StoreError::AmbiguousId { .. } | StoreError::Validation(_)
        )
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Field changes applied by [`NoteStore::update`].
///
/// `None` leaves a field untouched. `file: Some(None)` clears the anchor.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
    pub message: Option<String>,
    pub file: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

/// Handle to the note collection of one project.
#[derive(Debug, Clone)]
pub struct NoteStore {
    root: PathBuf,
    dir: PathBuf,
    path: PathBuf,
}

impl NoteStore {
    /// Creates a store for `root` using the default `.notes` directory.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_dir_name(root, DEFAULT_STORE_DIR)
    }

    /// Creates a store for `root` with a custom storage directory name.
    pub fn with_dir_name(root: impl Into<PathBuf>, dir_name: &str) -> Self {
        let root = root.into();
        let dir = root.join(dir_name);
        let path = dir.join(STORE_FILE);
        Self { root, dir, path }
    }

    /// Returns the project root the store belongs to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every note in stored order.
    ///
    /// Returns an empty collection if the store file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Parse` if it is malformed.
    pub fn load_all(&self) -> Result<Vec<Note>, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no store at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        // An empty file is what a freshly touched store looks like
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let notes: Vec<Note> = serde_json::from_slice(&data).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        debug!("loaded {} notes from {}", notes.len(), self.path.display());
        Ok(notes)
    }

    /// Replaces the whole collection with `notes`.
    ///
    /// Creates the storage directory if needed. The file is written to a
    /// temporary sibling first and renamed into place.
    ///
    /// # Errors
    ///
    /// Returns `Serialize` or `Io` on failure; the previous file is left intact.
    pub fn overwrite(&self, notes: &[Note]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(notes).map_err(StoreError::Serialize)?;
        self.ensure_dir()?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;

        debug!("wrote {} notes to {}", notes.len(), self.path.display());
        Ok(())
    }

    /// Appends a new note with a fresh id and the current time.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty message, otherwise any load/write error.
    pub fn create(
        &self,
        message: &str,
        file: Option<&str>,
        line: Option<u32>,
        tags: Vec<String>,
    ) -> Result<Note, StoreError> {
        let message = validate_message(message)?;
        let mut builder = NoteBuilder::new().message(message).tags(tags);
        if let Some(file) = file {
            builder = builder.file(file);
        }
        if let Some(line) = line {
            builder = builder.line(line);
        }
        let note = builder.build();

        let mut notes = self.load_all()?;
        notes.push(note.clone());
        self.overwrite(&notes)?;

        info!("created note {}", note.id.short());
        Ok(note)
    }

    /// Finds the note whose full id or short id equals `query`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AmbiguousId`, or any load error.
    pub fn find(&self, query: &str) -> Result<Note, StoreError> {
        let notes = self.load_all()?;
        let index = resolve(&notes, query)?;
        Ok(notes[index].clone())
    }

    /// Applies `update` to the note matching `query` and refreshes its timestamp.
    ///
    /// A changed file drops the stored line, since it pointed into the old file.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty new message, `NotFound` or
    /// `AmbiguousId` for a bad id, or any load/write error.
    pub fn update(&self, query: &str, update: NoteUpdate) -> Result<Note, StoreError> {
        let message = update
            .message
            .as_deref()
            .map(validate_message)
            .transpose()?;

        let mut notes = self.load_all()?;
        let index = resolve(&notes, query)?;
        let note = &mut notes[index];

        if let Some(message) = message {
            note.message = message;
        }
        if let Some(file) = update.file {
            let file = file.filter(|f| !f.is_empty());
            if file != note.file {
                note.line = None;
            }
            note.file = file;
        }
        if let Some(tags) = update.tags {
            note.tags = tags;
        }
        note.created_at = OffsetDateTime::now_utc();

        let updated = note.clone();
        self.overwrite(&notes)?;

        info!("updated note {}", updated.id.short());
        Ok(updated)
    }

    /// Removes the note matching `query` and returns it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AmbiguousId` without writing, or any load/write error.
    pub fn delete_by_id(&self, query: &str) -> Result<Note, StoreError> {
        let mut notes = self.load_all()?;
        let index = resolve(&notes, query)?;
        let removed = notes.remove(index);
        self.overwrite(&notes)?;

        info!("deleted note {}", removed.id.short());
        Ok(removed)
    }

    /// Removes every note for which `predicate` returns true.
    ///
    /// The file is only rewritten when at least one note was removed.
    ///
    /// # Errors
    ///
    /// Returns any load/write error.
    pub fn delete_where(
        &self,
        mut predicate: impl FnMut(&Note) -> bool,
    ) -> Result<Vec<Note>, StoreError> {
        let notes = self.load_all()?;
        let (removed, kept): (Vec<Note>, Vec<Note>) =
            notes.into_iter().partition(|note| predicate(note));

        if !removed.is_empty() {
            self.overwrite(&kept)?;
            info!("deleted {} notes", removed.len());
        }
        Ok(removed)
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        if self.dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;
        if let Err(e) = hide_dir(&self.dir) {
            warn!("could not hide {}: {e}", self.dir.display());
        }
        Ok(())
    }
}

/// Resolves `query` to the index of exactly one note.
fn resolve(notes: &[Note], query: &str) -> Result<usize, StoreError> {
    // A full id match wins even if it also happens to equal another short id
    if let Some(index) = notes.iter().position(|n| n.id.as_str() == query) {
        return Ok(index);
    }

    let mut matches = notes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.id.matches(query))
        .map(|(i, _)| i);

    match (matches.next(), matches.count()) {
        (None, _) => Err(StoreError::NotFound(query.to_string())),
        (Some(index), 0) => Ok(index),
        (Some(_), rest) => Err(StoreError::AmbiguousId {
            id: query.to_string(),
            count: rest + 1,
        }),
    }
}

/// Marks the storage directory hidden on platforms where a dot prefix is not enough.
#[cfg(windows)]
fn hide_dir(dir: &Path) -> std::io::Result<()> {
    let status = std::process::Command::new("attrib")
        .arg("+h")
        .arg(dir)
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(std::io::Error::other(format!("attrib exited with {status}")))
    }
}

#[cfg(not(windows))]
fn hide_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
