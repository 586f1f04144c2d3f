use std::process::ExitCode;

use clap::{CommandFactory, Parser};

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands, ConfigCommands};
use commands::config::{load_config, Config};
use commands::{CommandContext, CommandError};

/// Environment variable read before `RUST_LOG` for the log filter.
const ENV_LOG: &str = "RTN_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{error_json:#}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `--verbose` forces `debug`; otherwise `RTN_LOG`, then `RUST_LOG`, then `warn`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string())
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn run(cli: &Cli) -> commands::Result<()> {
    // Config commands still run when the config file is unreadable.
    let config = match &cli.command {
        Some(Commands::Config { .. }) => load_config().unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable config: {e}");
            Config::default()
        }),
        _ => load_config()?,
    };
    let ctx = CommandContext::from_cli(cli, &config);

    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|source| CommandError::Io {
                path: "<stdout>".into(),
                source,
            })?;
        return Ok(());
    };

    match command {
        Commands::List { routines, scopes } => commands::list::execute(
            &ctx,
            &commands::list::ListOptions {
                routines_only: *routines,
                scopes_only: *scopes,
            },
        ),
        Commands::Preview {
            id,
            data,
            anchor,
            limit,
            count,
        } => commands::preview::execute(
            &ctx,
            &commands::preview::PreviewOptions {
                id: id.clone(),
                data: data.clone(),
                anchor: *anchor,
                limit: *limit,
                count_only: *count,
            },
        ),
        Commands::Customize {
            id,
            filters,
            sort,
            data,
            anchor,
            name,
        } => commands::customize::execute(
            &ctx,
            &commands::customize::CustomizeOptions {
                id: id.clone(),
                filters: filters.clone(),
                sort: sort.clone(),
                data: data.clone(),
                anchor: *anchor,
                name: name.clone(),
            },
        ),
        Commands::Validate => commands::validate::execute(&ctx),
        Commands::Config { command } => match command {
            None | Some(ConfigCommands::Show) => commands::config::execute_show(&ctx),
            Some(ConfigCommands::Init) => commands::config::execute_init(&ctx),
            Some(ConfigCommands::Set { key, value }) => commands::config::execute_set(
                &ctx,
                &commands::config::ConfigSetOptions {
                    key: key.clone(),
                    value: value.clone(),
                },
            ),
            Some(ConfigCommands::Path) => commands::config::execute_path(&ctx),
        },
        Commands::Completions { shell } => {
            commands::completions::execute(shell).map_err(|source| CommandError::Io {
                path: "<stdout>".into(),
                source,
            })
        }
    }
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Catalog(_) => "CATALOG_ERROR",
        CommandError::NotFound { .. } => "NOT_FOUND",
        CommandError::Invalid(_) => "INVALID_CATALOG",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io { .. } => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the process exit status for an error.
fn exit_status(e: &CommandError) -> u8 {
    match e {
        CommandError::Config(_) => 5,
        CommandError::Catalog(_) => 1,
        CommandError::NotFound { .. } => 2,
        CommandError::Invalid(_) => 1,
        CommandError::Io { .. } => 3,
        CommandError::Json(_) => 1,
    }
}
