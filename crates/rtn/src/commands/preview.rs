//! Preview command implementation.
//!
//! Opens a preview session for a routine or scope, evaluates it against a
//! dataset and prints the matching rows in the source's default sort order.

use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::NaiveDate;
use routine_engine_rs::filter::{parse_cell_date, today};
use routine_engine_rs::{PreviewSession, Row, RowLookup, Scalar, SortDirection, SortSpec};

use super::{find_source, load_rows, CommandContext, Result};
use crate::output::{display_columns, format_count, format_rows_table, PreviewOutput};

/// Options for the preview command.
#[derive(Debug)]
pub struct PreviewOptions {
    /// Routine or scope id.
    pub id: String,
    /// Dataset path.
    pub data: PathBuf,
    /// Anchor date; defaults to today.
    pub anchor: Option<NaiveDate>,
    /// Row limit; defaults to the context's preview limit.
    pub limit: Option<usize>,
    /// Only print the count.
    pub count_only: bool,
}

/// Executes the preview command.
///
/// # Errors
///
/// Returns an error if the catalog or dataset cannot be loaded, or if the id
/// names neither a routine nor a scope.
pub fn execute(ctx: &CommandContext, opts: &PreviewOptions) -> Result<()> {
    let catalog = ctx.load_catalog()?;
    let source = find_source(&catalog, &opts.id)?;
    let rows = load_rows(&opts.data)?;

    let session = PreviewSession::open(source, opts.anchor.unwrap_or_else(today));
    if ctx.verbose {
        eprintln!(
            "Previewing {} with {} filters (dates relative to {})",
            session.source_id(),
            session.filters().len(),
            session.anchor()
        );
    }
    let matched = sort_rows(session.matched_rows(&rows), session.sort());
    let limit = opts.limit.unwrap_or(ctx.preview_limit);

    if ctx.json_output {
        let output = PreviewOutput {
            source_id: session.source_id(),
            source_name: session.source_name(),
            anchor: session.anchor(),
            count: matched.len(),
            rows: (!opts.count_only).then(|| matched.iter().take(limit).copied().collect()),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        print!(
            "{}",
            format_count(session.source_name(), matched.len(), ctx.use_colors)
        );
        if !opts.count_only {
            let configured = catalog
                .routine(&opts.id)
                .map(|r| r.columns.as_slice())
                .unwrap_or_default();
            let columns = display_columns(configured, &matched);
            print!(
                "{}",
                format_rows_table(&matched, &columns, limit, ctx.use_colors)
            );
        }
    }

    Ok(())
}

/// Sorts rows by each key in turn. The sort is stable, so ties keep dataset order.
fn sort_rows<'a>(mut rows: Vec<&'a Row>, sort: &[SortSpec]) -> Vec<&'a Row> {
    if sort.is_empty() {
        return rows;
    }
    rows.sort_by(|a, b| {
        sort.iter()
            .map(|key| compare_cells(a.cell(&key.column_id), b.cell(&key.column_id), key.direction))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Compares two cells: numbers numerically, dates chronologically, anything
/// else as text. Empty cells go last in either direction.
fn compare_cells(a: Option<&Scalar>, b: Option<&Scalar>, direction: SortDirection) -> Ordering {
    let a = a.filter(|c| !c.is_null());
    let b = b.filter(|c| !c.is_null());
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (Some(a), Some(b)) => (a, b),
    };

    let ordering = if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
    } else if let (Some(x), Some(y)) = (parse_cell_date(a), parse_cell_date(b)) {
        x.cmp(&y)
    } else {
        a.to_text().cmp(&b.to_text())
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}
