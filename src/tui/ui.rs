//! UI rendering functions for the TUI.
//!
//! Every mode shares the same frame: a two-row header, the list area, a
//! status line, and a help line. Wizards replace the list area; the delete
//! confirmation draws a modal on top of it.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::{App, CHROME_ROWS, Mode, StatusKind};
use super::input::TextInput;
use super::list::{ListEntry, SelectList};
use super::wizard::{PICKER_TITLE_ROWS, Stage, Wizard};
use crate::models::Note;

const BROWSE_HELP: &str =
    "(Use Ctrl+D to remove, Ctrl+E to edit, Ctrl+A to add, Ctrl+F to search, Ctrl+Q to quit)";
const SEARCH_HELP: &str = "(Enter to keep results, Esc to clear, Up/Down to move)";
const WIZARD_HELP: &str = "(Esc to cancel)";
const PICKER_HELP: &str = "(Up/Down to move, PgUp/PgDn to page, Enter to choose, Esc to cancel)";
const CONFIRM_HINT: &str = "Press Y/Enter to confirm, any other key to cancel";

const MODAL_WIDTH: u16 = 60;

/// Colors used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub wizard_border: Color,
    pub modal_border: Color,
    pub modal_fg: Color,
    pub modal_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Cyan,
            muted: Color::DarkGray,
            error: Color::Red,
            wizard_border: Color::Rgb(0x5d, 0xaf, 0xf4),
            modal_border: Color::Rgb(0xff, 0x5f, 0x87),
            modal_fg: Color::White,
            modal_bg: Color::Rgb(0x33, 0x33, 0x33),
        }
    }
}

/// Main rendering function for the TUI.
///
/// # Arguments
///
/// * `frame` - The ratatui Frame to render into
/// * `app` - The session state to draw
/// * `theme` - Colors for borders, highlights, and the modal
pub fn draw(frame: &mut Frame, app: &App, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CHROME_ROWS - 2), // Header
            Constraint::Min(0),                  // List or wizard
            Constraint::Length(1),               // Status
            Constraint::Length(1),               // Help
        ])
        .split(frame.area());

    match app.mode() {
        Mode::Browsing => {
            render_title(frame, app, theme, chunks[0]);
            render_notes(frame, app, theme, chunks[1]);
            render_help(frame, BROWSE_HELP, theme, chunks[3]);
        }
        Mode::Searching => {
            render_search(frame, app.search_input(), theme, chunks[0]);
            render_notes(frame, app, theme, chunks[1]);
            render_help(frame, SEARCH_HELP, theme, chunks[3]);
        }
        Mode::AddWizard(wizard) | Mode::EditWizard { wizard, .. } => {
            render_title(frame, app, theme, chunks[0]);
            let help = if wizard.stage() == Stage::File {
                PICKER_HELP
            } else {
                WIZARD_HELP
            };
            render_wizard(frame, wizard, theme, chunks[1]);
            render_help(frame, help, theme, chunks[3]);
        }
        Mode::ConfirmDelete { index } => {
            render_title(frame, app, theme, chunks[0]);
            render_notes(frame, app, theme, chunks[1]);
            render_help(frame, CONFIRM_HINT, theme, chunks[3]);
            if let Some(note) = app.notes().get(*index) {
                render_confirm(frame, note, theme, chunks[1]);
            }
        }
    }

    render_status(frame, app, theme, chunks[2]);
}

/// Renders the list title with the note count.
fn render_title(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let count = if app.is_filtered() {
        format!(" {} of {}", app.notes().len(), app.all_notes().len())
    } else {
        format!(" {}", app.notes().len())
    };

    let line = Line::from(vec![
        Span::styled(
            app.list().title().to_string(),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(count, Style::default().fg(theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the search prompt in place of the title and places the cursor.
fn render_search(frame: &mut Frame, input: &TextInput, theme: &Theme, area: Rect) {
    let prompt = "/ ";
    let mut spans = vec![Span::styled(prompt, Style::default().fg(theme.accent))];
    spans.extend(input_spans(input, theme));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    place_cursor(frame, input, area.x + prompt.len() as u16, area);
}

/// Renders the main note list, or a hint when there is nothing to show.
fn render_notes(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    if app.notes().is_empty() {
        let hint = if app.is_filtered() {
            "No matching notes"
        } else {
            "No notes yet. Press Ctrl+A to add one."
        };
        let paragraph = Paragraph::new(Span::styled(hint, Style::default().fg(theme.muted)));
        frame.render_widget(paragraph, area);
        return;
    }
    render_list(frame, app.list(), theme, area);
}

/// Renders the visible window of a list, two rows per entry.
fn render_list<T: ListEntry>(frame: &mut Frame, list: &SelectList<T>, theme: &Theme, area: Rect) {
    let selected = list.selected_index();
    let mut lines = Vec::with_capacity(list.visible_range().len() * 2);

    for index in list.visible_range() {
        let item = &list.items()[index];
        let (marker, title_style, desc_style) = if selected == Some(index) {
            (
                Span::styled("│ ", Style::default().fg(theme.accent)),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
                Style::default().fg(theme.accent),
            )
        } else {
            (
                Span::raw("  "),
                Style::default(),
                Style::default().fg(theme.muted),
            )
        };

        lines.push(Line::from(vec![
            marker.clone(),
            Span::styled(item.title(), title_style),
        ]));
        lines.push(Line::from(vec![
            marker,
            Span::styled(item.description(), desc_style),
        ]));
    }

    frame.render_widget(Paragraph::new(Text::from(lines)), area);
}

/// Renders the active wizard stage.
///
/// Text stages show a bordered input box; the file stage shows the picker.
fn render_wizard(frame: &mut Frame, wizard: &Wizard, theme: &Theme, area: Rect) {
    if wizard.stage() == Stage::File {
        if let Some(picker) = wizard.picker() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(PICKER_TITLE_ROWS), Constraint::Min(0)])
                .split(area);
            let title = Paragraph::new(Span::styled(
                picker.title().to_string(),
                Style::default().fg(theme.wizard_border),
            ));
            frame.render_widget(title, chunks[0]);
            render_list(frame, picker, theme, chunks[1]);
        }
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(wizard_prompt(wizard))
        .border_style(Style::default().fg(theme.wizard_border));

    let box_area = Rect {
        height: area.height.min(3),
        ..area
    };
    let inner = block.inner(box_area);
    let paragraph = Paragraph::new(Line::from(input_spans(wizard.input(), theme))).block(block);
    frame.render_widget(paragraph, box_area);
    place_cursor(frame, wizard.input(), inner.x, inner);
}

/// Prompt shown on the border of a text stage.
pub fn wizard_prompt(wizard: &Wizard) -> &'static str {
    match (wizard.stage(), wizard.is_editing()) {
        (Stage::Message, false) => "Step 1/3: Enter note message (Enter to continue, Esc to cancel)",
        (Stage::Message, true) => "Step 1/3: Edit note message (Enter to continue, Esc to cancel)",
        (Stage::File, _) => "Step 2/3: Select file (Enter to choose, Esc to cancel)",
        (Stage::Tags, false) => {
            "Step 3/3: Enter tags (comma-separated, leave blank) (Enter to save, Esc to cancel)"
        }
        (Stage::Tags, true) => "Step 3/3: Edit tags (comma-separated) (Enter to save, Esc to cancel)",
    }
}

/// Renders the delete question as a modal over the list.
fn render_confirm(frame: &mut Frame, note: &Note, theme: &Theme, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled("Delete note:", bold)),
        Line::from(""),
        Line::from(format!("\"{}\"", note.message)),
    ];
    if let Some(location) = note.location() {
        lines.push(Line::from(format!("File: {location}")));
    }
    if !note.tags.is_empty() {
        lines.push(Line::from(format!("Tags: {}", note.tags.join(", "))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        CONFIRM_HINT,
        Style::default().fg(theme.modal_border),
    )));

    let height = lines.len() as u16 + 2;
    let modal = centered_rect(MODAL_WIDTH, height, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.modal_border));
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .style(Style::default().fg(theme.modal_fg).bg(theme.modal_bg))
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, modal);
    frame.render_widget(paragraph, modal);
}

/// Renders the transient status message, if any.
fn render_status(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let Some(status) = app.status() else {
        return;
    };
    let color = match status.kind {
        StatusKind::Info => theme.accent,
        StatusKind::Error => theme.error,
    };
    let paragraph = Paragraph::new(Span::styled(
        status.text.clone(),
        Style::default().fg(color),
    ));
    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, help: &'static str, theme: &Theme, area: Rect) {
    let paragraph = Paragraph::new(Span::styled(help, Style::default().fg(theme.muted)));
    frame.render_widget(paragraph, area);
}

/// Input text, or the muted placeholder while empty.
fn input_spans(input: &TextInput, theme: &Theme) -> Vec<Span<'static>> {
    if input.value().is_empty() {
        return vec![Span::styled(
            input.placeholder().to_string(),
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        )];
    }
    vec![Span::raw(input.value().to_string())]
}

/// Puts the terminal cursor at the input's cursor, clamped to `area`.
fn place_cursor(frame: &mut Frame, input: &TextInput, x: u16, area: Rect) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let (before, _) = input.split_at_cursor();
    let offset = u16::try_from(before.chars().count()).unwrap_or(u16::MAX);
    let max_x = area.x + area.width - 1;
    frame.set_cursor_position((x.saturating_add(offset).min(max_x), area.y));
}

/// Returns a `width` x `height` rect centered in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
