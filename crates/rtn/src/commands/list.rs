//! List command implementation.
//!
//! Lists the routines and scopes of the configured catalog.

use super::{CommandContext, Result};
use crate::output::{format_catalog_json, format_routines_table, format_scopes_table};

/// Options for the list command.
#[derive(Debug, Default)]
pub struct ListOptions {
    /// Only list routines.
    pub routines_only: bool,
    /// Only list scopes.
    pub scopes_only: bool,
}

impl ListOptions {
    fn show_routines(&self) -> bool {
        !self.scopes_only
    }

    fn show_scopes(&self) -> bool {
        !self.routines_only
    }
}

/// Executes the list command.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded.
pub fn execute(ctx: &CommandContext, opts: &ListOptions) -> Result<()> {
    let catalog = ctx.load_catalog()?;

    let routines = opts.show_routines().then_some(catalog.routines.as_slice());
    let scopes = opts.show_scopes().then_some(catalog.scopes.as_slice());

    if ctx.json_output {
        println!("{}", format_catalog_json(routines, scopes)?);
    } else if !ctx.quiet {
        let mut sections = Vec::new();
        if let Some(routines) = routines {
            sections.push(format_routines_table(routines, ctx.use_colors));
        }
        if let Some(scopes) = scopes {
            sections.push(format_scopes_table(scopes, ctx.use_colors));
        }
        print!("{}", sections.join("\n"));
    }

    Ok(())
}
