//! Drives the interactive session with synthetic key events against a real
//! store on disk.

use std::fs;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use notes::filter::filter_notes;
use notes::tui::{App, Control, Mode, handle_event};
use notes::{NoteBuilder, NoteStore};
use tempfile::tempdir;

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

fn feed(mut app: App, store: &NoteStore, events: impl IntoIterator<Item = Event>) -> App {
    for event in events {
        let (next, control) = handle_event(app, event, store);
        assert_eq!(control, Control::Continue);
        app = next;
    }
    app
}

fn typed(text: &str) -> Vec<Event> {
    text.chars().map(|c| key(KeyCode::Char(c))).collect()
}

#[test]
fn search_by_tag_then_clear() -> Result<()> {
    let dir = tempdir()?;
    let store = NoteStore::new(dir.path());
    store.create("fix bug", None, None, vec!["urgent".into()])?;
    store.create("refactor", None, None, Vec::new())?;

    let app = App::load(&store)?;
    let app = feed(app, &store, [key(KeyCode::Char('/'))]);
    let app = feed(app, &store, typed("#urgent"));
    assert_eq!(app.notes().len(), 1);
    assert_eq!(app.notes()[0].message, "fix bug");

    let app = feed(app, &store, [key(KeyCode::Esc)]);
    assert!(matches!(app.mode(), Mode::Browsing));
    assert_eq!(app.notes().len(), 2);
    Ok(())
}

#[test]
fn add_wizard_with_sentinel_file() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("README.md"), "")?;
    let store = NoteStore::new(dir.path());

    let app = App::load(&store)?;
    let app = feed(app, &store, [ctrl('a')]);
    let app = feed(app, &store, typed("todo"));
    let app = feed(app, &store, [key(KeyCode::Enter), key(KeyCode::Enter)]);
    let app = feed(app, &store, typed("x, y"));
    let app = feed(app, &store, [key(KeyCode::Enter)]);

    assert!(matches!(app.mode(), Mode::Browsing));
    let notes = store.load_all()?;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].message, "todo");
    assert_eq!(notes[0].file, None);
    assert_eq!(notes[0].line, None);
    assert_eq!(notes[0].tags, vec!["x", "y"]);
    assert_eq!(app.notes(), notes.as_slice());
    Ok(())
}

#[test]
fn full_session_add_edit_delete() -> Result<()> {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("src"))?;
    fs::write(dir.path().join("src").join("lib.rs"), "")?;
    let store = NoteStore::new(dir.path());

    let mut app = App::load(&store)?;
    app.resize(100, 30);

    // Add with the one project file
    let app = feed(app, &store, [key(KeyCode::Char('a'))]);
    let app = feed(app, &store, typed("first draft"));
    let app = feed(
        app,
        &store,
        [key(KeyCode::Enter), key(KeyCode::Down), key(KeyCode::Enter)],
    );
    let app = feed(app, &store, typed("wip"));
    let app = feed(app, &store, [key(KeyCode::Enter)]);
    assert_eq!(app.size(), (100, 30));

    let stored = store.load_all()?;
    let expected_file = std::path::Path::new("src").join("lib.rs");
    assert_eq!(
        stored[0].file.as_deref(),
        Some(&*expected_file.to_string_lossy())
    );

    // Edit: replace message, keep file, clear tags
    let app = feed(app, &store, [key(KeyCode::Char('e')), ctrl('u')]);
    let app = feed(app, &store, typed("final"));
    let app = feed(app, &store, [key(KeyCode::Enter), key(KeyCode::Enter), ctrl('u')]);
    let app = feed(app, &store, [key(KeyCode::Enter)]);

    let stored = store.load_all()?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].message, "final");
    assert_eq!(stored[0].file.as_deref(), Some(&*expected_file.to_string_lossy()));
    assert!(stored[0].tags.is_empty());

    // Delete and confirm
    let app = feed(app, &store, [key(KeyCode::Delete), key(KeyCode::Char('Y'))]);
    assert!(store.load_all()?.is_empty());
    assert!(app.notes().is_empty());

    let (_, control) = handle_event(app, key(KeyCode::Char('q')), &store);
    assert_eq!(control, Control::Quit);
    Ok(())
}

#[test]
fn cancelled_wizards_never_write() -> Result<()> {
    let dir = tempdir()?;
    let store = NoteStore::new(dir.path());
    store.create("original", None, None, vec!["t".into()])?;
    let before = fs::read(store.path())?;

    let app = App::load(&store)?;
    let mut app = feed(app, &store, [ctrl('e')]);
    app = feed(app, &store, typed(" edited"));
    app = feed(app, &store, [key(KeyCode::Enter), key(KeyCode::Enter)]);
    app = feed(app, &store, typed(", more"));
    app = feed(app, &store, [key(KeyCode::Esc)]);

    assert!(matches!(app.mode(), Mode::Browsing));
    assert_eq!(fs::read(store.path())?, before);
    assert_eq!(app.notes()[0].message, "original");
    Ok(())
}

#[test]
fn filter_is_idempotent_and_conjunctive() {
    let notes = vec![
        NoteBuilder::new()
            .message("fix bug in parser")
            .tags(vec!["urgent".into()])
            .build(),
        NoteBuilder::new().message("fix bug later").build(),
        NoteBuilder::new()
            .message("docs")
            .tags(vec!["urgent".into()])
            .build(),
    ];

    let once = filter_notes(&notes, "bug #urgent");
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].message, "fix bug in parser");

    let twice = filter_notes(&once, "bug #urgent");
    assert_eq!(once, twice);

    assert_eq!(filter_notes(&notes, "   "), notes);
}
