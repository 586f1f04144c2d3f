//! Command implementations for the rtn CLI.
//!
//! This module contains the handlers invoked by the CLI, plus the file loading
//! they share. The engine itself never touches the file system.

pub mod completions;
pub mod config;
pub mod customize;
pub mod list;
pub mod preview;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use routine_engine_rs::{Catalog, FilterSource, Row};
use tracing::debug;

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Catalog parse error.
    #[error("catalog error: {0}")]
    Catalog(#[from] routine_engine_rs::CatalogError),

    /// Unknown routine or scope id.
    #[error("{kind} not found: {id}{}", did_you_mean(.suggestion))]
    NotFound {
        /// "routine" or "routine or scope".
        kind: &'static str,
        /// The id that was asked for.
        id: String,
        /// Closest known id, if any.
        suggestion: Option<String>,
    },

    /// Catalog failed validation.
    #[error("{0} catalog entries have filter problems")]
    Invalid(usize),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{s}'?)"))
        .unwrap_or_default()
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common settings.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Catalog path from `--catalog`, `RTN_CATALOG` or the config file.
    pub catalog_path: Option<PathBuf>,
    /// Default row limit for previews.
    pub preview_limit: usize,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    pub fn from_cli(cli: &Cli, config: &config::Config) -> Self {
        let color_enabled = config.output.color.unwrap_or(true);
        Self {
            json_output: cli.json,
            use_colors: color_enabled && !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            verbose: cli.verbose,
            catalog_path: cli.catalog.clone().or_else(|| config.catalog.clone()),
            preview_limit: config
                .preview
                .limit
                .unwrap_or(config::DEFAULT_PREVIEW_LIMIT),
        }
    }

    /// Loads the configured catalog.
    pub fn load_catalog(&self) -> Result<Catalog> {
        let path = self.catalog_path.as_deref().ok_or_else(|| {
            CommandError::Config(
                "no catalog configured; pass --catalog, set RTN_CATALOG, or set 'catalog' in config"
                    .to_string(),
            )
        })?;
        load_catalog(path)
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CommandError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a catalog, choosing TOML or JSON by file extension.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let content = read_file(path)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let catalog = if is_toml {
        Catalog::from_toml_str(&content)?
    } else {
        Catalog::from_json_str(&content)?
    };
    debug!(
        path = %path.display(),
        routines = catalog.routines.len(),
        scopes = catalog.scopes.len(),
        "loaded catalog"
    );
    Ok(catalog)
}

/// Loads a dataset: a JSON array of row objects.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let content = read_file(path)?;
    let rows: Vec<Row> = serde_json::from_str(&content)?;
    debug!(path = %path.display(), rows = rows.len(), "loaded dataset");
    Ok(rows)
}

/// Looks up a routine or scope, with a suggestion when the id is unknown.
pub fn find_source<'a>(catalog: &'a Catalog, id: &str) -> Result<&'a dyn FilterSource> {
    catalog.source(id).ok_or_else(|| CommandError::NotFound {
        kind: "routine or scope",
        id: id.to_string(),
        suggestion: catalog.suggest(id).map(str::to_string),
    })
}
