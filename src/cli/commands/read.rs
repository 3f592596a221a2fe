//! Read command implementation.
//!
//! Shows the decoded comment of one image, or with `--raw` every field the
//! tool reported.

use serde::Serialize;

use crate::cli::{Cli, OutputFormat, ReadArgs};
use crate::config::Config;
use crate::error::Result;
use crate::metadata::{decode_comment, MetadataRecord};

use super::client;

#[derive(Debug, Serialize)]
struct ReadOutput<'a> {
    file: String,
    comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a MetadataRecord>,
}

/// Run the read command.
pub async fn run(cli: &Cli, config: &Config, args: &ReadArgs) -> Result<()> {
    let record = client(cli, config).read_image_metadata(&args.file).await?;
    let comment = record.comment();

    match cli.effective_output() {
        OutputFormat::Json => {
            let output = ReadOutput {
                file: args.file.display().to_string(),
                comment,
                fields: args.raw.then_some(&record),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text if args.raw => {
            if record.is_empty() {
                if !cli.quiet {
                    eprintln!("No comment fields found in {}", args.file.display());
                }
                return Ok(());
            }
            let width = record.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
            for (key, value) in record.iter() {
                println!("{key:<width$}  {}", decode_comment(value));
            }
        }
        OutputFormat::Text => {
            // Empty comments print nothing so the output can be captured.
            if !comment.is_empty() {
                println!("{comment}");
            } else if !cli.quiet {
                eprintln!("No comment in {}", args.file.display());
            }
        }
    }

    Ok(())
}
