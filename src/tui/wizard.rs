//! Three-stage note wizard: message, file, tags.
//!
//! The same controller drives both the add and the edit flow. Field values
//! stay in the wizard until the final stage hands back a finished [`Draft`];
//! nothing is written before that.

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent};

use super::input::TextInput;
use super::list::{PickerEntry, SelectList};
use crate::files::project_files;
use crate::models::Note;
use crate::utils::{parse_tags, validate_message};

/// Rows above the picker taken by its title.
pub const PICKER_TITLE_ROWS: u16 = 1;

/// Current wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Message,
    File,
    Tags,
}

impl Stage {
    /// One-based step number shown in prompts.
    pub fn number(self) -> u8 {
        match self {
            Stage::Message => 1,
            Stage::File => 2,
            Stage::Tags => 3,
        }
    }
}

/// Field values collected by a finished wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub message: String,
    pub file: Option<String>,
    pub tags: Vec<String>,
}

/// Result of feeding a key to the wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStep {
    /// Still collecting input.
    Continue,
    /// Input was rejected; the wizard stays on the current stage.
    Rejected(String),
    /// All stages done.
    Finished(Draft),
}

/// In-progress add or edit flow.
#[derive(Debug, Clone)]
pub struct Wizard {
    stage: Stage,
    input: TextInput,
    picker: Option<SelectList<PickerEntry>>,
    draft: Draft,
    seed_file: Option<String>,
    seed_tags: Vec<String>,
    editing: bool,
}

impl Wizard {
    /// Starts an add flow with every field empty.
    pub fn add() -> Self {
        Self {
            stage: Stage::Message,
            input: TextInput::new("Note message"),
            picker: None,
            draft: Draft::default(),
            seed_file: None,
            seed_tags: Vec::new(),
            editing: false,
        }
    }

    /// Starts an edit flow seeded from `note`.
    pub fn edit(note: &Note) -> Self {
        let mut input = TextInput::new("Edit message");
        input.set_value(&note.message);
        Self {
            stage: Stage::Message,
            input,
            picker: None,
            draft: Draft::default(),
            seed_file: note.file.clone(),
            seed_tags: note.tags.clone(),
            editing: true,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    /// The file picker, present from the file stage on.
    pub fn picker(&self) -> Option<&SelectList<PickerEntry>> {
        self.picker.as_ref()
    }

    /// Values confirmed so far.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Resizes the picker while it is on screen.
    pub fn resize(&mut self, rows: u16) {
        if self.stage == Stage::File
            && let Some(picker) = self.picker.as_mut()
        {
            picker.resize(rows.saturating_sub(PICKER_TITLE_ROWS));
        }
    }

    /// Feeds one key to the current stage.
    ///
    /// `root` is the directory whose files fill the picker; `rows` is the
    /// picker's viewport height.
    pub fn handle_key(&mut self, key: KeyEvent, root: &Path, rows: u16) -> WizardStep {
        if key.code == KeyCode::Enter {
            return self.confirm(root, rows);
        }

        match self.stage {
            Stage::File => {
                if let Some(picker) = self.picker.as_mut() {
                    picker.handle_key(key);
                }
            }
            Stage::Message | Stage::Tags => {
                self.input.handle_key(key);
            }
        }
        WizardStep::Continue
    }

    fn confirm(&mut self, root: &Path, rows: u16) -> WizardStep {
        match self.stage {
            Stage::Message => {
                let message = match validate_message(self.input.value()) {
                    Ok(message) => message,
                    Err(e) => return WizardStep::Rejected(e.to_string()),
                };
                self.draft.message = message;

                let mut picker = SelectList::picker(
                    "Step 2/3: Select file (Enter to choose, Esc to cancel)",
                    project_files(root),
                    self.seed_file.as_deref(),
                );
                picker.resize(rows.saturating_sub(PICKER_TITLE_ROWS));
                self.picker = Some(picker);
                self.stage = Stage::File;
            }
            Stage::File => {
                self.draft.file = self
                    .picker
                    .as_ref()
                    .and_then(SelectList::selected)
                    .and_then(PickerEntry::file)
                    .map(String::from);

                self.input.set_value(&self.seed_tags.join(", "));
                self.input.set_placeholder(if self.editing {
                    "Edit tags (comma separated)"
                } else {
                    "Tags (comma separated, leave blank for none)"
                });
                self.stage = Stage::Tags;
            }
            Stage::Tags => {
                self.draft.tags = parse_tags(self.input.value());
                return WizardStep::Finished(std::mem::take(&mut self.draft));
            }
        }
        WizardStep::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteBuilder;
    use crossterm::event::KeyModifiers;
    use std::fs;
    use tempfile::tempdir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(wizard: &mut Wizard, text: &str, root: &Path) {
        for c in text.chars() {
            wizard.handle_key(key(KeyCode::Char(c)), root, 10);
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join(".notes")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "").unwrap();
        fs::write(dir.path().join("src/main.rs"), "").unwrap();
        fs::write(dir.path().join(".notes/notes.json"), "[]").unwrap();
        dir
    }

    #[test]
    fn add_flow_collects_all_fields() {
        let dir = project();
        let root = dir.path();
        let mut wizard = Wizard::add();
        assert_eq!(wizard.stage(), Stage::Message);
        assert_eq!(wizard.input().value(), "");

        type_str(&mut wizard, "  todo  ", root);
        assert_eq!(wizard.handle_key(key(KeyCode::Enter), root, 10), WizardStep::Continue);
        assert_eq!(wizard.stage(), Stage::File);
        assert_eq!(wizard.draft().message, "todo");

        let picker = wizard.picker().expect("picker built at file stage");
        assert_eq!(picker.len(), 3, "sentinel plus two files, store hidden");
        assert_eq!(picker.selected(), Some(&PickerEntry::NoFile));

        wizard.handle_key(key(KeyCode::Enter), root, 10);
        assert_eq!(wizard.stage(), Stage::Tags);
        assert_eq!(wizard.input().value(), "");

        type_str(&mut wizard, "x, y", root);
        let step = wizard.handle_key(key(KeyCode::Enter), root, 10);
        assert_eq!(
            step,
            WizardStep::Finished(Draft {
                message: "todo".into(),
                file: None,
                tags: vec!["x".into(), "y".into()],
            })
        );
    }

    #[test]
    fn empty_message_is_rejected_and_stays_on_stage() {
        let dir = project();
        let mut wizard = Wizard::add();
        type_str(&mut wizard, "   ", dir.path());

        let step = wizard.handle_key(key(KeyCode::Enter), dir.path(), 10);
        assert!(matches!(step, WizardStep::Rejected(ref m) if m.contains("cannot be empty")));
        assert_eq!(wizard.stage(), Stage::Message);
        assert!(wizard.picker().is_none());
    }

    #[test]
    fn edit_flow_is_seeded_from_note() {
        let dir = project();
        let root = dir.path();
        let file = Path::new("src").join("main.rs").to_string_lossy().into_owned();
        let note = NoteBuilder::new()
            .message("old message")
            .file(file.clone())
            .tags(vec!["a".into(), "b".into()])
            .build();

        let mut wizard = Wizard::edit(&note);
        assert!(wizard.is_editing());
        assert_eq!(wizard.input().value(), "old message");

        wizard.handle_key(key(KeyCode::Enter), root, 10);
        let picker = wizard.picker().unwrap();
        assert_eq!(picker.selected(), Some(&PickerEntry::File(file.clone())));

        wizard.handle_key(key(KeyCode::Enter), root, 10);
        assert_eq!(wizard.input().value(), "a, b");
        assert_eq!(wizard.draft().file.as_deref(), Some(file.as_str()));
    }

    #[test]
    fn picker_navigation_changes_chosen_file() {
        let dir = project();
        let root = dir.path();
        let mut wizard = Wizard::add();
        type_str(&mut wizard, "m", root);
        wizard.handle_key(key(KeyCode::Enter), root, 10);

        wizard.handle_key(key(KeyCode::Down), root, 10);
        wizard.handle_key(key(KeyCode::Enter), root, 10);

        let expected = Path::new("src").join("lib.rs").to_string_lossy().into_owned();
        assert_eq!(wizard.draft().file.as_deref(), Some(expected.as_str()));
    }

    #[test]
    fn picker_keys_do_not_reach_text_input() {
        let dir = project();
        let root = dir.path();
        let mut wizard = Wizard::add();
        type_str(&mut wizard, "m", root);
        wizard.handle_key(key(KeyCode::Enter), root, 10);

        // 'j' moves the picker instead of typing
        wizard.handle_key(key(KeyCode::Char('j')), root, 10);
        assert_eq!(wizard.picker().unwrap().selected_index(), Some(1));
    }

    #[test]
    fn tag_segments_are_trimmed_and_empty_ones_dropped() {
        let dir = project();
        let root = dir.path();
        let mut wizard = Wizard::add();
        type_str(&mut wizard, "m", root);
        wizard.handle_key(key(KeyCode::Enter), root, 10);
        wizard.handle_key(key(KeyCode::Enter), root, 10);
        type_str(&mut wizard, " a, b , ,b,", root);

        match wizard.handle_key(key(KeyCode::Enter), root, 10) {
            WizardStep::Finished(draft) => assert_eq!(draft.tags, vec!["a", "b", "b"]),
            other => panic!("expected finished wizard, got {other:?}"),
        }
    }
}
