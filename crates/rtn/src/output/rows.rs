//! Preview output formatting (matched rows).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use routine_engine_rs::{Row, RowLookup};
use serde::Serialize;

use super::helpers::{format_cell, format_header, plural, truncate_str};

/// Widest a single table column gets.
const MAX_CELL_WIDTH: usize = 24;

/// JSON output structure for the preview command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewOutput<'a> {
    pub source_id: &'a str,
    pub source_name: &'a str,
    pub anchor: NaiveDate,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<&'a Row>>,
}

/// Picks the columns to show: the routine's own list, else every key seen.
pub fn display_columns(configured: &[String], rows: &[&Row]) -> Vec<String> {
    if !configured.is_empty() {
        return configured.to_vec();
    }
    rows.iter()
        .flat_map(|row| row.keys())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Formats the count line shown above a preview.
pub fn format_count(name: &str, count: usize, use_colors: bool) -> String {
    let found = format!("{} found", plural(count, "row"));
    if use_colors {
        format!("{}: {}\n", name.bold(), found.green())
    } else {
        format!("{name}: {found}\n")
    }
}

/// Formats matched rows as a table, printing at most `limit` of them.
pub fn format_rows_table(
    rows: &[&Row],
    columns: &[String],
    limit: usize,
    use_colors: bool,
) -> String {
    if rows.is_empty() {
        return "No matching rows.\n".to_string();
    }

    let shown = &rows[..rows.len().min(limit)];
    let widths: Vec<usize> = columns
        .iter()
        .map(|column| {
            shown
                .iter()
                .map(|row| format_cell(row.cell(column)).chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| format!("{:<width$}", truncate_str(column, *width)))
        .collect::<Vec<_>>()
        .join(" ");
    let mut output = format_header(header.trim_end(), use_colors);

    for row in shown {
        let line = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| {
                format!("{:<width$}", truncate_str(&format_cell(row.cell(column)), *width))
            })
            .collect::<Vec<_>>()
            .join(" ");
        output.push_str(line.trim_end());
        output.push('\n');
    }

    if rows.len() > shown.len() {
        let hidden = rows.len() - shown.len();
        let more = format!("... {hidden} more {}", if hidden == 1 { "row" } else { "rows" });
        if use_colors {
            output.push_str(&format!("{}\n", more.dimmed()));
        } else {
            output.push_str(&more);
            output.push('\n');
        }
    }

    output
}
