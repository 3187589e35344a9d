//! Plain-text note listing for the `list` command.

use std::io::{self, Write};
use std::path::Path;

use time::OffsetDateTime;
use time::macros::format_description;

use crate::models::Note;

const CYAN: &str = "\x1b[96m";
const WHITE: &str = "\x1b[37m";
const GREEN: &str = "\x1b[32m";
const GRAY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// Criteria for the `list` command. Unset fields match everything.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListFilter {
    /// Matches the stored path exactly or by file name.
    pub file: Option<String>,
    /// Matches one tag exactly.
    pub tag: Option<String>,
}

impl ListFilter {
    /// Returns true if `note` passes every set criterion.
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(wanted) = self.file.as_deref() {
            let Some(file) = note.file.as_deref() else {
                return false;
            };
            if file != wanted && file_name(file) != file_name(wanted) {
                return false;
            }
        }

        match self.tag.as_deref() {
            Some(tag) => note.has_tag(tag),
            None => true,
        }
    }
}

fn file_name(path: &str) -> Option<&std::ffi::OsStr> {
    Path::new(path).file_name()
}

/// Writes `notes` in listing format, or `No notes found` when none match.
///
/// Escape codes are only emitted when `color` is set.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn write_notes<W: Write>(
    out: &mut W,
    notes: &[Note],
    filter: &ListFilter,
    color: bool,
) -> io::Result<()> {
    let paint = |code: &str, text: &str| {
        if color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    };

    let mut shown = 0;
    for note in notes.iter().filter(|n| filter.matches(n)) {
        shown += 1;

        let location = note
            .location()
            .map(|loc| format!(" → {loc}"))
            .unwrap_or_default();
        writeln!(
            out,
            "[{}] {}{}",
            paint(CYAN, note.id.short()),
            paint(WHITE, &note.message),
            location
        )?;

        if !note.tags.is_empty() {
            let tags: Vec<String> = note.tags.iter().map(|t| paint(GREEN, t)).collect();
            writeln!(out, "    Tags: {}", tags.join(", "))?;
        }
        writeln!(out, "    {}", paint(GRAY, &format_timestamp(note.created_at)))?;
        writeln!(out)?;
    }

    if shown == 0 {
        writeln!(out, "No notes found")?;
    }
    Ok(())
}

/// Formats a timestamp like `30 May 25 12:00 UTC`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let format =
        format_description!("[day] [month repr:short] [year repr:last_two] [hour]:[minute]");
    let Ok(base) = at.format(format) else {
        return at.to_string();
    };

    let offset = at.offset();
    if offset.is_utc() {
        format!("{base} UTC")
    } else {
        let (hours, minutes, _) = offset.as_hms();
        format!("{base} {:+03}{:02}", hours, minutes.unsigned_abs())
    }
}
