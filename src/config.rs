use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::store::{DEFAULT_STORE_DIR, NoteStore};

/// Runtime configuration.
///
/// Parsed from environment variables with fallback defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Project root the notes belong to (default: current directory).
    pub root: PathBuf,
    /// Name of the storage directory under `root` (default `.notes`).
    pub store_dir: String,
    /// File that receives log output during the interactive session.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Parses configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `NOTES_ROOT`: project root, defaults to the current directory
    /// - `NOTES_DIR`: storage directory name, defaults to `.notes`. Must be a
    ///   single dot-prefixed name so the file picker never lists the store
    /// - `NOTES_LOG`: log file used while the terminal UI is running
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `NOTES_ROOT` is unset and the current directory
    /// cannot be determined.
    pub fn from_env() -> Result<Self> {
        let root = match var("NOTES_ROOT") {
            Some(root) => PathBuf::from(root),
            None => std::env::current_dir().context("Failed to determine current directory")?,
        };

        Ok(Self {
            root,
            store_dir: var("NOTES_DIR")
                .filter(|d| is_store_dir_name(d))
                .unwrap_or_else(|| DEFAULT_STORE_DIR.to_string()),
            log_file: var("NOTES_LOG").map(PathBuf::from),
        })
    }

    /// Creates a config for `root` with default settings.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            store_dir: DEFAULT_STORE_DIR.to_string(),
            log_file: None,
        }
    }

    /// Opens the note store described by this config.
    pub fn store(&self) -> NoteStore {
        NoteStore::with_dir_name(&self.root, &self.store_dir)
    }
}

fn is_store_dir_name(name: &str) -> bool {
    name.starts_with('.') && name.len() > 1 && name != ".." && !name.contains(['/', '\\'])
}

fn var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
