//! Project file enumeration for the file picker.

use std::path::Path;

use log::debug;
use walkdir::{DirEntry, WalkDir};

/// Lists every file under `root`, relative to it, in walk order.
///
/// Directories whose name starts with `.` are skipped entirely, which keeps
/// the note store and VCS metadata out of the list. Dot-files themselves are
/// kept. Unreadable entries are skipped.
pub fn project_files(root: &Path) -> Vec<String> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden_dir(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .ok()
                .map(|rel| rel.to_string_lossy().into_owned())
        })
        .collect()
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_files_relative_and_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/tui")).unwrap();
        fs::write(dir.path().join("Cargo.toml"), "").unwrap();
        fs::write(dir.path().join("src/main.rs"), "").unwrap();
        fs::write(dir.path().join("src/tui/app.rs"), "").unwrap();

        let files = project_files(dir.path());
        let expected: Vec<String> = ["Cargo.toml", "src/main.rs", "src/tui/app.rs"]
            .iter()
            .map(|p| Path::new(p).to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, expected);
    }

    #[test]
    fn skips_hidden_directories_but_keeps_dot_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".notes")).unwrap();
        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        fs::write(dir.path().join(".notes/notes.json"), "[]").unwrap();
        fs::write(dir.path().join(".git/objects/abc"), "").unwrap();
        fs::write(dir.path().join(".gitignore"), "target").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let files = project_files(dir.path());
        assert_eq!(files, vec![".gitignore", "README.md"]);
    }

    #[test]
    fn empty_root_has_no_files() {
        let dir = tempdir().unwrap();
        assert!(project_files(dir.path()).is_empty());
    }
}
