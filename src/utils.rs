//! Shared helpers for note input handling.
//!
//! These functions are reused across the CLI and TUI interfaces so both
//! paths apply the same tag and message rules.

use std::path::{Path, PathBuf};

use crate::store::StoreError;

/// Parses comma-separated tags from a string.
///
/// Splits on commas, trims whitespace from each tag, and filters out empty
/// strings. Duplicates are kept in input order.
///
/// # Examples
///
/// ```
/// use notes::utils::parse_tags;
///
/// assert_eq!(parse_tags("a, b , b"), vec!["a", "b", "b"]);
/// assert!(parse_tags(" , ").is_empty());
/// ```
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Trims a note message and rejects it if nothing is left.
///
/// # Errors
///
/// Returns `StoreError::Validation` for empty or whitespace-only messages.
pub fn validate_message(message: &str) -> Result<String, StoreError> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(
            "note message cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Expresses `file` relative to `root` when it lives under it.
///
/// Relative inputs are interpreted against `root` first. Paths outside the
/// root are returned unchanged.
pub fn relative_to_root(root: &Path, file: &str) -> String {
    let path = Path::new(file);
    let absolute: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    match absolute.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
        _ => file.to_string(),
    }
}
