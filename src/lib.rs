pub mod config;
pub mod files;
pub mod filter;
pub mod logging;
pub mod models;
pub mod render;
pub mod store;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use models::{Note, NoteBuilder, NoteId};
pub use store::{NoteStore, NoteUpdate, StoreError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_accessible_from_crate_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn types_accessible_from_crate_root() {
        let note = NoteBuilder::new().message("test").build();
        assert_eq!(note.message, "test");
        assert!(note.id.matches(note.id.short()));

        let update = NoteUpdate::default();
        assert!(update.message.is_none());

        let config = Config::for_root("/tmp");
        assert_eq!(config.store_dir, ".notes");
    }
}
