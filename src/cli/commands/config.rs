//! Config command implementation.
//!
//! View and modify inscribe configuration settings. Every action works on
//! the file named by `--config` when one is given.

use std::path::{Path, PathBuf};

use crate::cli::{Cli, ConfigAction, ConfigArgs, OutputFormat};
use crate::config::Config;
use crate::error::{InscribeError, Result};

use super::config_path;

/// Run the config command.
pub fn run(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    let path = config_path(cli)?;

    match &args.action {
        ConfigAction::Show => show_config(cli, &path),
        ConfigAction::Get { key } => get_config_value(cli, &path, key),
        ConfigAction::Set { key, value } => set_config_value(cli, &path, key, value),
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init => init_config(&path),
        ConfigAction::Reset => reset_config(&path),
    }
}

/// Load the file at `path`, or defaults when it does not exist yet.
fn load(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load_from(path)
    } else {
        Ok(Config::default())
    }
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(|| "(not set)".to_string(), |p| p.display().to_string())
}

/// Show full configuration.
fn show_config(cli: &Cli, path: &Path) -> Result<()> {
    let config = load(path)?;

    match cli.effective_output() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Text => {
            println!("inscribe configuration");
            println!("======================\n");

            println!("[exiftool]");
            println!("  path = {}", display_path(config.exiftool.path.as_ref()));
            println!("  bundled = {}", config.exiftool.bundled);
            println!("  packaged = {}", config.exiftool.packaged);
            println!(
                "  resources_dir = {}",
                display_path(config.exiftool.resources_dir.as_ref())
            );
            println!(
                "  project_root = {}",
                display_path(config.exiftool.project_root.as_ref())
            );
            println!("  leading_args = {:?}", config.exiftool.leading_args);
            println!();

            println!("[display]");
            println!("  color = {}", config.display.color);
            println!("  truncate_at = {}", config.display.truncate_at);
            println!("  show_hidden = {}", config.display.show_hidden);
        }
    }

    Ok(())
}

/// Look up one value by its `section.field` key.
fn lookup(config: &Config, key: &str) -> Result<String> {
    let value = match key {
        "exiftool.path" => display_path(config.exiftool.path.as_ref()),
        "exiftool.bundled" => config.exiftool.bundled.to_string(),
        "exiftool.packaged" => config.exiftool.packaged.to_string(),
        "exiftool.resources_dir" => display_path(config.exiftool.resources_dir.as_ref()),
        "exiftool.project_root" => display_path(config.exiftool.project_root.as_ref()),
        "exiftool.leading_args" => config.exiftool.leading_args.join(" "),

        "display.color" => config.display.color.to_string(),
        "display.truncate_at" => config.display.truncate_at.to_string(),
        "display.show_hidden" => config.display.show_hidden.to_string(),

        _ => return Err(unknown_key(key)),
    };
    Ok(value)
}

/// Apply one `section.field = value` assignment.
fn assign(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "exiftool.path" => config.exiftool.path = optional_path(value),
        "exiftool.bundled" => config.exiftool.bundled = parse_bool(value)?,
        "exiftool.packaged" => config.exiftool.packaged = parse_bool(value)?,
        "exiftool.resources_dir" => config.exiftool.resources_dir = optional_path(value),
        "exiftool.project_root" => config.exiftool.project_root = optional_path(value),
        "exiftool.leading_args" => {
            config.exiftool.leading_args = value.split_whitespace().map(String::from).collect();
        }

        "display.color" => config.display.color = parse_bool(value)?,
        "display.truncate_at" => config.display.truncate_at = parse_usize(value)?,
        "display.show_hidden" => config.display.show_hidden = parse_bool(value)?,

        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> InscribeError {
    InscribeError::ConfigError {
        message: format!("Unknown configuration key: {key}"),
    }
}

/// Get a specific configuration value.
fn get_config_value(cli: &Cli, path: &Path, key: &str) -> Result<()> {
    let value = lookup(&load(path)?, key)?;

    match cli.effective_output() {
        OutputFormat::Json => println!("{}", serde_json::json!({ key: value })),
        OutputFormat::Text => println!("{value}"),
    }

    Ok(())
}

/// Set a configuration value.
fn set_config_value(cli: &Cli, path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = load(path)?;
    assign(&mut config, key, value)?;
    config.save_to(path)?;

    if !cli.quiet {
        println!("Set {key} = {value}");
    }
    Ok(())
}

/// Initialize configuration file with defaults.
fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Configuration file already exists at: {}", path.display());
        println!("Use 'inscribe config reset' to reset to defaults.");
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("Created configuration file at: {}", path.display());
    Ok(())
}

/// Reset configuration to defaults.
fn reset_config(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("No configuration file exists. Use 'inscribe config init' to create one.");
        return Ok(());
    }

    Config::default().save_to(path)?;
    println!("Reset configuration to defaults at: {}", path.display());
    Ok(())
}

/// Empty clears an optional path.
fn optional_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

/// Parse boolean value.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(InscribeError::ConfigError {
            message: format!("Invalid boolean value: {s}. Use true/false."),
        }),
    }
}

/// Parse usize value.
fn parse_usize(s: &str) -> Result<usize> {
    s.parse().map_err(|_| InscribeError::ConfigError {
        message: format!("Invalid number: {s}"),
    })
}
