//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use routine_engine_rs::Scalar;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a cell for a table. Absent and null cells print as `-`.
pub fn format_cell(cell: Option<&Scalar>) -> String {
    match cell {
        None | Some(Scalar::Null) => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Formats a table header line, dimmed when colors are on.
pub fn format_header(header: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", header.dimmed())
    } else {
        format!("{header}\n")
    }
}

/// Formats a section title, bold when colors are on.
pub fn format_title(title: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", title.bold())
    } else {
        format!("{title}\n")
    }
}

/// Pluralizes a count: `1 row`, `3 rows`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
