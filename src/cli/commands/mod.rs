//! CLI command implementations.
//!
//! Each command is implemented in its own module with a `run` function
//! that handles the command logic.

pub mod browse;
pub mod check;
pub mod config;
pub mod drives;
pub mod edit;
pub mod ls;
pub mod read;
pub mod write;

use std::path::PathBuf;

use dialoguer::Editor;

use crate::api::{InscribeClient, SaveReport};
use crate::cli::{Cli, OutputFormat};
use crate::config::{default_config_path, Config};
use crate::error::{InscribeError, Result};
use crate::metadata::decode::trim_comment;
use crate::tool::ExifTool;

/// Build the client from the `--exiftool` override or the configuration.
///
/// An explicit `--exiftool` replaces the configured tool entirely, so any
/// configured leading arguments are dropped with it.
pub fn client(cli: &Cli, config: &Config) -> InscribeClient {
    match &cli.exiftool {
        Some(program) => InscribeClient::new(ExifTool::new(program)),
        None => InscribeClient::from_config(config),
    }
}

/// Configuration file in effect: `--config` or the default location.
pub fn config_path(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// Open `$EDITOR` on `initial`; `None` when the user quits without saving.
pub fn edit_text(initial: &str) -> Result<Option<String>> {
    let edited = Editor::new().extension(".txt").edit(initial)?;
    Ok(edited.map(|text| strip_trailing_newline(&text).to_string()))
}

/// Drop the single line terminator editors and `echo` append.
pub fn strip_trailing_newline(text: &str) -> &str {
    text.strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text)
}

/// Print the result of a write-then-confirm sequence.
pub fn print_save_report(cli: &Cli, report: &SaveReport) -> Result<()> {
    match cli.effective_output() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            if cli.quiet {
                return Ok(());
            }
            println!("{}", report.outcome.message);
            if report.matches {
                println!("Confirmed: {}", describe_comment(&report.confirmed));
            } else {
                eprintln!(
                    "Warning: read back {} instead",
                    describe_comment(&report.confirmed)
                );
            }
        }
    }
    Ok(())
}

/// Quote a comment for status lines, or say it is empty.
pub fn describe_comment(comment: &str) -> String {
    if comment.is_empty() {
        "(no comment)".to_string()
    } else {
        format!("{comment:?}")
    }
}

/// Edit `current`, the comment of `path`, and save the result, offering a
/// retry with the edited text when the tool fails. Returns the saved report,
/// or `None` if the user left the comment unchanged.
pub async fn edit_and_save(
    client: &InscribeClient,
    path: &std::path::Path,
    current: &str,
) -> Result<Option<SaveReport>> {
    let mut draft = current.to_string();

    loop {
        let Some(text) = edit_text(&draft)? else {
            return Ok(None);
        };
        if trim_comment(&text) == current {
            return Ok(None);
        }

        match client.save_comment(path, &text).await {
            Ok(report) => return Ok(Some(report)),
            Err(e @ (InscribeError::ToolExecution { .. } | InscribeError::SpawnFailure { .. })) => {
                eprintln!("Error: {e}");
                let retry = dialoguer::Confirm::new()
                    .with_prompt("Edit and try again?")
                    .default(true)
                    .interact()?;
                if !retry {
                    return Err(e);
                }
                draft = text;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_strip_trailing_newline() {
        assert_eq!(strip_trailing_newline("note\n"), "note");
        assert_eq!(strip_trailing_newline("note\r\n"), "note");
        assert_eq!(strip_trailing_newline("two\n\n"), "two\n");
        assert_eq!(strip_trailing_newline("none"), "none");
    }

    #[test]
    fn test_describe_comment() {
        assert_eq!(describe_comment(""), "(no comment)");
        assert_eq!(describe_comment("hi"), "\"hi\"");
    }

    #[test]
    fn test_exiftool_flag_overrides_config() {
        let cli = Cli::parse_from(["inscribe", "--exiftool", "/opt/et", "check"]);
        let mut config = Config::default();
        config.exiftool.path = Some(PathBuf::from("perl"));
        config.exiftool.leading_args = vec!["script".into()];

        let client = client(&cli, &config);
        assert_eq!(client.tool().program(), Path::new("/opt/et"));
        assert!(client.tool().leading_args().is_empty());
    }

    #[test]
    fn test_config_path_flag() {
        let cli = Cli::parse_from(["inscribe", "--config", "/tmp/x.toml", "check"]);
        assert_eq!(config_path(&cli).unwrap(), PathBuf::from("/tmp/x.toml"));
    }
}
