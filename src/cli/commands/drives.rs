//! Drives command implementation.

use crate::browse::list_drives;
use crate::cli::{Cli, OutputFormat};
use crate::error::Result;

/// Run the drives command.
pub fn run(cli: &Cli) -> Result<()> {
    let drives: Vec<String> = list_drives()
        .iter()
        .map(|root| root.display().to_string())
        .collect();

    match cli.effective_output() {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&drives)?),
        OutputFormat::Text => {
            for drive in &drives {
                println!("{drive}");
            }
        }
    }

    Ok(())
}
