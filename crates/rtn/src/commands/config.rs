//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/rtn/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Rows printed by `rtn preview` when neither the flag nor the config sets a limit.
pub const DEFAULT_PREVIEW_LIMIT: usize = 20;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# rtn - routine preview configuration

# Config schema version (do not modify)
version = 1

# Default catalog of routines and scopes (can also use --catalog or RTN_CATALOG)
# catalog = "/path/to/catalog.toml"

# Output preferences
[output]
# color = true              # Enable colors (respects NO_COLOR env)

# Preview settings
[preview]
# limit = 20                # Rows printed by 'rtn preview'
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Default catalog path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Preview settings.
    #[serde(default)]
    pub preview: PreviewConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            catalog: None,
            output: OutputConfig::default(),
            preview: PreviewConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Preview configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Rows printed by `rtn preview`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Gets the config file path.
///
/// Order: `RTN_CONFIG`, then `$XDG_CONFIG_HOME/rtn/config.toml`, then
/// `~/.config/rtn/config.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("RTN_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("rtn").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("rtn").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk, or the defaults if no file exists.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema; later versions migrate here.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;
    ensure_parent_dir(&path)?;

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }
    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref catalog) = config.catalog {
                println!("  catalog: {}", catalog.display());
            }

            println!("\n[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }

            println!("\n[preview]");
            if let Some(limit) = config.preview.limit {
                println!("  limit: {}", limit);
            }
        } else {
            println!("(No config file exists. Run 'rtn config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    let created = !path.exists();

    if created {
        ensure_parent_dir(&path)?;
        fs::write(&path, DEFAULT_CONFIG)
            .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;
    }

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if created { "created" } else { "exists" },
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if created {
            println!("Created default config at: {}", path.display());
        } else {
            println!("Config already exists at: {}", path.display());
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Applies one `key = value` setting to the config.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "catalog" => config.catalog = Some(PathBuf::from(value)),
        "output.color" => config.output.color = Some(parse_bool(value)?),
        "preview.limit" => {
            let limit = value.parse::<usize>().map_err(|_| {
                CommandError::Config(format!(
                    "Invalid preview.limit value '{}'. Expected a non-negative integer",
                    value
                ))
            })?;
            config.preview.limit = Some(limit);
        }
        _ => {
            return Err(CommandError::Config(format!(
                "Unknown config key '{}'. Valid keys: catalog, output.color, preview.limit",
                key
            )));
        }
    }
    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a boolean value from a string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_bool_true_values() {
        for value in ["true", "TRUE", "yes", "1", "on"] {
            assert!(parse_bool(value).unwrap(), "{value}");
        }
    }

    #[test]
    fn test_parse_bool_false_values() {
        for value in ["false", "No", "0", "off"] {
            assert!(!parse_bool(value).unwrap(), "{value}");
        }
    }

    #[test]
    fn test_parse_bool_invalid() {
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.catalog.is_none());
        assert!(config.output.color.is_none());
        assert!(config.preview.limit.is_none());
    }

    #[test]
    fn test_default_config_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version, 1);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_config_deserialization_partial() {
        let config: Config = toml::from_str(
            r#"
            catalog = "/srv/catalog.toml"

            [preview]
            limit = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.catalog, Some(PathBuf::from("/srv/catalog.toml")));
        assert_eq!(config.preview.limit, Some(50));
        assert!(config.output.color.is_none());
    }

    #[test]
    fn test_config_serialization_skips_unset() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml.contains("version = 1"));
        assert!(!toml.contains("catalog"));
        assert!(!toml.contains("limit"));
    }

    #[test]
    fn test_apply_setting() {
        let mut config = Config::default();
        apply_setting(&mut config, "catalog", "lib.json").unwrap();
        apply_setting(&mut config, "output.color", "off").unwrap();
        apply_setting(&mut config, "preview.limit", "5").unwrap();

        assert_eq!(config.catalog, Some(PathBuf::from("lib.json")));
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.preview.limit, Some(5));

        assert!(apply_setting(&mut config, "preview.limit", "-1").is_err());
        assert!(apply_setting(&mut config, "token", "x").is_err());
    }

    #[test]
    fn test_migrate_config_preserves_data() {
        let config = Config {
            version: 0,
            catalog: Some(PathBuf::from("lib.toml")),
            output: OutputConfig { color: Some(true) },
            preview: PreviewConfig { limit: Some(3) },
        };
        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
        assert_eq!(migrated.catalog, Some(PathBuf::from("lib.toml")));
        assert_eq!(migrated.preview.limit, Some(3));
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        env::set_var("RTN_CONFIG", &path);
        let resolved = get_config_path().unwrap();
        env::remove_var("RTN_CONFIG");
        assert_eq!(resolved, path);
    }

    #[test]
    #[serial]
    fn test_save_and_load_roundtrip_via_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        env::set_var("RTN_CONFIG", &path);

        let mut config = Config::default();
        apply_setting(&mut config, "preview.limit", "7").unwrap();
        save_config(&config).unwrap();
        let loaded = load_config().unwrap();
        env::remove_var("RTN_CONFIG");

        assert!(path.exists());
        assert_eq!(loaded.preview.limit, Some(7));
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("RTN_CONFIG", dir.path().join("absent.toml"));
        let loaded = load_config().unwrap();
        env::remove_var("RTN_CONFIG");
        assert!(loaded.catalog.is_none());
    }
}
