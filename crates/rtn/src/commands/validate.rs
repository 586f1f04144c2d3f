//! Validate command implementation.
//!
//! Checks every routine and scope filter spec in the catalog for authoring
//! mistakes. Previews stay lenient; this is where those mistakes surface.

use tracing::debug;

use super::{CommandContext, CommandError, Result};
use crate::output::{format_validation_json, format_validation_table};

/// Executes the validate command.
///
/// # Errors
///
/// Returns [`CommandError::Invalid`] with the number of affected entries if
/// any spec has a problem, after printing the report.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let catalog = ctx.load_catalog()?;
    let report = catalog.validate();
    debug!(entries = report.len(), "validated catalog");

    if ctx.json_output {
        println!("{}", format_validation_json(&report)?);
    } else if !ctx.quiet || !report.is_empty() {
        print!("{}", format_validation_table(&report, ctx.use_colors));
    }

    if report.is_empty() {
        Ok(())
    } else {
        Err(CommandError::Invalid(report.len()))
    }
}
