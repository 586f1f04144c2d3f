//! Customize command implementation.
//!
//! Replays an edited filter set and sort order against a routine's defaults
//! and reports whether the template applies unchanged or a new custom routine
//! has to be saved.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use routine_engine_rs::filter::{today, ColumnFilter, FilterNormalizer};
use routine_engine_rs::{FilterSpec, PreviewOutcome, PreviewSession, SortSpec};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use super::{find_source, load_rows, read_file, CommandContext, Result};
use crate::output::{format_customize_json, format_customize_text};

/// Options for the customize command.
#[derive(Debug, Default)]
pub struct CustomizeOptions {
    /// Routine or scope id.
    pub id: String,
    /// Edited filter specs; `None` keeps the defaults.
    pub filters: Option<PathBuf>,
    /// Edited sort; empty keeps the defaults.
    pub sort: Vec<SortSpec>,
    /// Dataset to count matches against.
    pub data: Option<PathBuf>,
    /// Anchor date; defaults to today.
    pub anchor: Option<NaiveDate>,
    /// Name for a new custom routine.
    pub name: Option<String>,
}

/// A routine to persist when the user customized a template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRoutine {
    pub id: String,
    pub name: String,
    pub based_on: String,
    /// Date the relative expressions were frozen against.
    pub anchor: NaiveDate,
    pub filters: Vec<ColumnFilter>,
    pub sort: Vec<SortSpec>,
}

/// Result of a customize run.
#[derive(Debug)]
pub struct CustomizeResult {
    pub source_id: String,
    pub source_name: String,
    pub outcome: PreviewOutcome,
    /// Set when the outcome is [`PreviewOutcome::SaveCustom`].
    pub custom: Option<CustomRoutine>,
    /// Matching rows, when a dataset was given.
    pub count: Option<usize>,
}

/// Executes the customize command.
///
/// # Errors
///
/// Returns an error if the catalog, edited filters or dataset cannot be
/// loaded, or if the id is unknown.
pub fn execute(ctx: &CommandContext, opts: &CustomizeOptions) -> Result<()> {
    let catalog = ctx.load_catalog()?;
    let source = find_source(&catalog, &opts.id)?;
    let mut session = PreviewSession::open(source, opts.anchor.unwrap_or_else(today));

    if let Some(path) = &opts.filters {
        let specs = load_filter_specs(path)?;
        session.set_filters(FilterNormalizer::new(session.anchor()).normalize(&specs));
    }
    if !opts.sort.is_empty() {
        session.set_sort(opts.sort.clone());
    }

    let count = match &opts.data {
        Some(path) => Some(session.row_count(&load_rows(path)?)),
        None => None,
    };

    let result = build_result(&session, opts.name.as_deref(), count);

    if ctx.json_output {
        println!("{}", format_customize_json(&result)?);
    } else if !ctx.quiet {
        print!("{}", format_customize_text(&result, ctx.use_colors));
    }

    Ok(())
}

/// Loads edited filter specs: a JSON array in catalog format.
fn load_filter_specs(path: &Path) -> Result<Vec<FilterSpec>> {
    let specs: Vec<FilterSpec> = serde_json::from_str(&read_file(path)?)?;
    debug!(path = %path.display(), specs = specs.len(), "loaded edited filters");
    Ok(specs)
}

/// Turns the session's outcome into a result, minting a custom routine if needed.
fn build_result(
    session: &PreviewSession,
    name: Option<&str>,
    count: Option<usize>,
) -> CustomizeResult {
    let outcome = session.outcome();
    let custom = match &outcome {
        PreviewOutcome::ApplyTemplate { .. } => None,
        PreviewOutcome::SaveCustom {
            based_on,
            filters,
            sort,
        } => Some(CustomRoutine {
            id: Uuid::new_v4().to_string(),
            name: name
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} (custom)", session.source_name())),
            based_on: based_on.clone(),
            anchor: session.anchor(),
            filters: filters.clone(),
            sort: sort.clone(),
        }),
    };

    CustomizeResult {
        source_id: session.source_id().to_string(),
        source_name: session.source_name().to_string(),
        outcome,
        custom,
        count,
    }
}
