//! Rendering of ranked entries into finder input lines.
//!
//! Every line is `<id>\t<display text>`. The finder only shows and searches the
//! display field; the id comes back with the selected line. The separator
//! between the most used entries and the rest has an empty id so selecting it
//! never resolves to an entry.

use crossterm::style::Stylize;

use crate::entry::Entry;
use crate::ranking::Ranking;

pub const FIELD_DELIMITER: char = '\t';

const SEPARATOR_WIDTH: usize = 40;

/// Renders the display text of one entry: name, dimmed user, dimmed folder.
pub fn render_entry(entry: &Entry) -> String {
    let mut text = entry.name.clone();

    if !entry.user.is_empty() {
        text.push_str(&format!("  {}", entry.user.as_str().dim()));
    }

    if !entry.folder.is_empty() {
        text.push_str(&format!("  {}", format!("[{}]", entry.folder).cyan().dim()));
    }

    text
}

/// The separator line, with an empty id field.
pub fn separator_line() -> String {
    format!("{FIELD_DELIMITER}{}", "─".repeat(SEPARATOR_WIDTH).dim())
}

/// Builds the finder lines: bold top entries, a separator, then the rest.
pub fn build_lines(ranking: &Ranking<'_>) -> Vec<String> {
    let mut lines = Vec::with_capacity(ranking.top.len() + ranking.rest.len() + 1);

    for entry in &ranking.top {
        lines.push(format!(
            "{}{FIELD_DELIMITER}{}",
            entry.id,
            render_entry(entry).bold()
        ));
    }

    if !ranking.top.is_empty() {
        lines.push(separator_line());
    }

    for entry in &ranking.rest {
        lines.push(format!("{}{FIELD_DELIMITER}{}", entry.id, render_entry(entry)));
    }

    lines
}

/// Extracts the entry id from a raw selected line.
///
/// Returns `None` for the separator (or any line with an empty id field).
pub fn extract_id(raw: &str) -> Option<&str> {
    let id = raw.split(FIELD_DELIMITER).next().unwrap_or_default();

    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
