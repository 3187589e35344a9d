use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use notes::logging::{self, LogTarget};
use notes::render::{ListFilter, write_notes};
use notes::utils::{parse_tags, relative_to_root};
use notes::{Config, NoteStore, NoteUpdate, StoreError, tui};

/// notes - project-scoped notes for your working directory
#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Attach lightweight notes to files in your project")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Add a new note
    Add(AddCommand),

    /// List notes, optionally filtered by file or tag
    List(ListCommand),

    /// Edit an existing note by id
    Edit(EditCommand),

    /// Delete a note by id, or every note with a tag
    Delete(DeleteCommand),

    /// Launch interactive terminal UI
    Tui,
}

/// Add a new note
#[derive(Parser)]
struct AddCommand {
    /// The note message
    #[arg(value_name = "MESSAGE")]
    message: String,

    /// File to attach the note to
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Line in the file
    #[arg(short, long, value_name = "LINE")]
    line: Option<u32>,

    /// Comma-separated tags
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

/// List notes
#[derive(Parser)]
struct ListCommand {
    /// Only notes attached to this file (full path or file name)
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Only notes with this tag
    #[arg(short, long, value_name = "TAG")]
    tag: Option<String>,
}

/// Edit a note
#[derive(Parser)]
struct EditCommand {
    /// Full id or 8-character short id
    #[arg(value_name = "ID")]
    id: String,

    /// New message
    #[arg(short, long, value_name = "MESSAGE")]
    message: Option<String>,

    /// New file; pass an empty string to detach the note
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// New comma-separated tags, replacing the old ones
    #[arg(short, long, value_name = "TAGS")]
    tags: Option<String>,
}

/// Delete notes
#[derive(Parser)]
struct DeleteCommand {
    /// Full id or 8-character short id
    #[arg(value_name = "ID", required_unless_present = "tag", conflicts_with = "tag")]
    id: Option<String>,

    /// Delete every note with this tag
    #[arg(short = 't', long, value_name = "TAG")]
    tag: Option<String>,

    /// Skip confirmation prompts
    #[arg(short = 'y', long)]
    yes: bool,
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(2);
        }
    };

    let target = match cli.command {
        Commands::Tui => LogTarget::Session(config.log_file.as_deref()),
        _ => LogTarget::Stderr,
    };
    logging::init(target);
    debug!("using store {}", config.store().path().display());

    let result = match &cli.command {
        Commands::Add(cmd) => handle_add(cmd, &config),
        Commands::List(cmd) => handle_list(cmd, &config),
        Commands::Edit(cmd) => handle_edit(cmd, &config),
        Commands::Delete(cmd) => handle_delete(cmd, &config),
        Commands::Tui => tui::run(&config),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are validation failures and unknown or ambiguous ids.
/// Internal errors include I/O and parse failures.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_user_error)
    })
}

fn handle_add(cmd: &AddCommand, config: &Config) -> Result<()> {
    execute_add(cmd, &config.store(), &mut io::stdout().lock())
}

fn execute_add(cmd: &AddCommand, store: &NoteStore, out: &mut impl Write) -> Result<()> {
    let file = cmd
        .file
        .as_deref()
        .filter(|f| !f.is_empty())
        .map(|f| relative_to_root(store.root(), f));
    let tags = cmd.tags.as_deref().map(parse_tags).unwrap_or_default();

    let note = store
        .create(&cmd.message, file.as_deref(), cmd.line, tags)
        .context("Failed to save note")?;

    writeln!(out, "Note saved (id: {})", note.id.short())?;
    Ok(())
}

fn handle_list(cmd: &ListCommand, config: &Config) -> Result<()> {
    let color = io::stdout().is_terminal();
    execute_list(cmd, &config.store(), &mut io::stdout().lock(), color)
}

fn execute_list(
    cmd: &ListCommand,
    store: &NoteStore,
    out: &mut impl Write,
    color: bool,
) -> Result<()> {
    let notes = store.load_all().context("Failed to load notes")?;
    let filter = ListFilter {
        file: cmd.file.clone(),
        tag: cmd.tag.clone(),
    };
    write_notes(out, &notes, &filter, color)?;
    Ok(())
}

fn handle_edit(cmd: &EditCommand, config: &Config) -> Result<()> {
    execute_edit(cmd, &config.store(), &mut io::stdout().lock())
}

fn execute_edit(cmd: &EditCommand, store: &NoteStore, out: &mut impl Write) -> Result<()> {
    if cmd.message.is_none() && cmd.file.is_none() && cmd.tags.is_none() {
        return Err(StoreError::Validation(
            "nothing to change: pass --message, --file or --tags".to_string(),
        )
        .into());
    }

    let update = NoteUpdate {
        message: cmd.message.clone(),
        file: cmd.file.as_deref().map(|f| {
            (!f.is_empty()).then(|| relative_to_root(store.root(), f))
        }),
        tags: cmd.tags.as_deref().map(parse_tags),
    };

    let note = store
        .update(&cmd.id, update)
        .with_context(|| format!("Failed to update note {}", cmd.id))?;

    writeln!(out, "Note {} updated", note.id.short())?;
    Ok(())
}

fn handle_delete(cmd: &DeleteCommand, config: &Config) -> Result<()> {
    execute_delete(
        cmd,
        &config.store(),
        &mut io::stdin().lock(),
        &mut io::stdout().lock(),
    )
}

fn execute_delete(
    cmd: &DeleteCommand,
    store: &NoteStore,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(tag) = cmd.tag.as_deref() {
        return delete_by_tag(tag, cmd.yes, store, input, out);
    }

    // clap guarantees one of id or tag
    let Some(id) = cmd.id.as_deref() else {
        return Err(StoreError::Validation("a note id or --tag is required".to_string()).into());
    };

    let note = store.find(id).context("Failed to delete note")?;
    if !cmd.yes {
        let prompt = format!(
            "Are you sure you want to delete note \"{}\"? (y/N): ",
            note.message
        );
        if !confirm(input, out, &prompt)? {
            writeln!(out, "Aborted.")?;
            return Ok(());
        }
    }

    let removed = store
        .delete_by_id(note.id.as_str())
        .context("Failed to delete note")?;
    writeln!(out, "Note {} deleted", removed.id.short())?;
    Ok(())
}

fn delete_by_tag(
    tag: &str,
    yes: bool,
    store: &NoteStore,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let notes = store.load_all().context("Failed to load notes")?;

    let mut doomed = Vec::new();
    for note in notes.iter().filter(|n| n.has_tag(tag)) {
        if !yes {
            let prompt = format!(
                "Delete note \"{}\" (file: {})? (y/N): ",
                note.message,
                note.file.as_deref().unwrap_or("")
            );
            if !confirm(input, out, &prompt)? {
                continue;
            }
        }
        doomed.push(note.id.clone());
    }

    if doomed.is_empty() {
        writeln!(out, "No notes found with tag \"{tag}\"")?;
        return Ok(());
    }

    let removed = store
        .delete_where(|n| doomed.contains(&n.id))
        .context("Failed to delete notes")?;
    writeln!(out, "Deleted {} note(s) with tag \"{tag}\".", removed.len())?;
    Ok(())
}

/// Prints `prompt` and reads one line. Only `y` or `Y` confirms.
fn confirm(input: &mut impl BufRead, out: &mut impl Write, prompt: &str) -> Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}
