//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the rtn CLI.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use routine_engine_rs::SortSpec;

/// rtn - Preview routine and scope filters against tabular data
#[derive(Parser, Debug)]
#[command(name = "rtn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Catalog file with routines and scopes (.json or .toml)
    #[arg(long, global = true, env = "RTN_CATALOG")]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List routines and scopes in the catalog
    #[command(alias = "ls")]
    List {
        /// Only list routines
        #[arg(long, conflicts_with = "scopes")]
        routines: bool,

        /// Only list scopes
        #[arg(long)]
        scopes: bool,
    },

    /// Preview a routine or scope against a dataset
    #[command(alias = "p")]
    Preview {
        /// Routine or scope id
        id: String,

        /// Dataset file (JSON array of row objects)
        #[arg(short, long)]
        data: PathBuf,

        /// Date relative expressions resolve against (default: today)
        #[arg(long, value_parser = parse_anchor)]
        anchor: Option<NaiveDate>,

        /// Maximum rows to print (default: from config, else 20)
        #[arg(long)]
        limit: Option<usize>,

        /// Only print the row count
        #[arg(long)]
        count: bool,
    },

    /// Compare an edited filter set against a routine's defaults
    Customize {
        /// Routine or scope id
        id: String,

        /// Edited filter specs (JSON array); defaults to the routine's own
        #[arg(short, long)]
        filters: Option<PathBuf>,

        /// Edited sort key as column:asc|desc (repeatable, replaces the default sort)
        #[arg(short, long, value_parser = parse_sort, action = clap::ArgAction::Append)]
        sort: Vec<SortSpec>,

        /// Dataset file to count matches against
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Date relative expressions resolve against (default: today)
        #[arg(long, value_parser = parse_anchor)]
        anchor: Option<NaiveDate>,

        /// Name for the custom routine if one is created
        #[arg(long)]
        name: Option<String>,
    },

    /// Check catalog filter specs for authoring mistakes
    Validate,

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Write a default config file if none exists
    Init,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}

/// Parses an anchor date in YYYY-MM-DD format.
fn parse_anchor(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{s}', expected YYYY-MM-DD"))
}

/// Parses a sort key in `column:asc` / `column:desc` form (`column` alone is ascending).
fn parse_sort(s: &str) -> Result<SortSpec, String> {
    let (column, direction) = match s.rsplit_once(':') {
        Some((column, direction)) => (column, direction),
        None => (s, "asc"),
    };
    if column.is_empty() {
        return Err(format!("invalid sort '{s}': missing column"));
    }
    match direction.to_ascii_lowercase().as_str() {
        "asc" => Ok(SortSpec::asc(column)),
        "desc" => Ok(SortSpec::desc(column)),
        other => Err(format!("invalid sort direction '{other}', expected asc or desc")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_args() {
        let cli = Cli::parse_from([
            "rtn",
            "preview",
            "late-orders",
            "--data",
            "rows.json",
            "--anchor",
            "2024-06-15",
            "--limit",
            "5",
        ]);
        if let Some(Commands::Preview {
            id,
            data,
            anchor,
            limit,
            count,
        }) = cli.command
        {
            assert_eq!(id, "late-orders");
            assert_eq!(data, PathBuf::from("rows.json"));
            assert_eq!(anchor, NaiveDate::from_ymd_opt(2024, 6, 15));
            assert_eq!(limit, Some(5));
            assert!(!count);
        } else {
            panic!("Expected Preview command");
        }
    }

    #[test]
    fn test_preview_requires_data() {
        assert!(Cli::try_parse_from(["rtn", "preview", "late-orders"]).is_err());
    }

    #[test]
    fn test_invalid_anchor() {
        assert!(Cli::try_parse_from([
            "rtn", "preview", "x", "--data", "rows.json", "--anchor", "15/06/2024"
        ])
        .is_err());
    }

    #[test]
    fn test_customize_sort_repeatable() {
        let cli = Cli::parse_from([
            "rtn",
            "customize",
            "late-orders",
            "-s",
            "orderDate:desc",
            "-s",
            "plant",
        ]);
        if let Some(Commands::Customize { id, sort, .. }) = cli.command {
            assert_eq!(id, "late-orders");
            assert_eq!(sort, vec![SortSpec::desc("orderDate"), SortSpec::asc("plant")]);
        } else {
            panic!("Expected Customize command");
        }
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("qty:DESC").unwrap(), SortSpec::desc("qty"));
        assert_eq!(parse_sort("ns:col:asc").unwrap(), SortSpec::asc("ns:col"));
        assert!(parse_sort(":asc").is_err());
        assert!(parse_sort("qty:sideways").is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["rtn", "list", "--json", "--catalog", "lib.toml"]);
        assert!(cli.json);
        assert_eq!(cli.catalog, Some(PathBuf::from("lib.toml")));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["rtn", "-q", "-v", "list"]).is_err());
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["rtn", "config", "set", "preview.limit", "50"]);
        if let Some(Commands::Config {
            command: Some(ConfigCommands::Set { key, value }),
        }) = cli.command
        {
            assert_eq!(key, "preview.limit");
            assert_eq!(value, "50");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn test_completions() {
        let cli = Cli::parse_from(["rtn", "completions", "zsh"]);
        if let Some(Commands::Completions { shell }) = cli.command {
            assert!(matches!(shell, Shell::Zsh));
        } else {
            panic!("Expected Completions command");
        }
    }
}
