//! Check command implementation.
//!
//! Runs `exiftool -ver` to show which tool will be used and that it works.

use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use crate::config::Config;
use crate::error::Result;

use super::client;

/// Run the check command.
pub async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let client = client(cli, config);
    let tool = client.tool();
    let version = tool.version().await?;

    match cli.effective_output() {
        OutputFormat::Json => {
            let output = json!({
                "program": tool.program().display().to_string(),
                "leadingArgs": tool.leading_args(),
                "version": version,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("ExifTool {version}");
            if !cli.quiet {
                println!("  program: {}", tool.program().display());
                if !tool.leading_args().is_empty() {
                    println!("  leading args: {}", tool.leading_args().join(" "));
                }
            }
        }
    }

    Ok(())
}
