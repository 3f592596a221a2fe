//! Write command implementation.
//!
//! Stores a new comment and, unless `--no-verify` is given, reads the file
//! again to confirm the tool stored what was sent.

use std::io::Read as _;

use crate::cli::{Cli, OutputFormat, WriteArgs};
use crate::config::Config;
use crate::error::{InscribeError, Result};
use crate::metadata::MetadataUpdate;

use super::{client, print_save_report, strip_trailing_newline};

/// Run the write command.
pub async fn run(cli: &Cli, config: &Config, args: &WriteArgs) -> Result<()> {
    let comment = comment_source(args)?;
    let client = client(cli, config);

    if args.no_verify {
        let outcome = client
            .write_image_metadata(&args.file, &MetadataUpdate::user_comment(comment))
            .await?;
        match cli.effective_output() {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
            OutputFormat::Text if !cli.quiet => println!("{}", outcome.message),
            OutputFormat::Text => {}
        }
        return Ok(());
    }

    let report = client.save_comment(&args.file, &comment).await?;
    print_save_report(cli, &report)?;
    // A mismatch still exits nonzero so scripts see it.
    report.verified().map(|_| ())
}

fn comment_source(args: &WriteArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }

    if let Some(path) = &args.from_file {
        let content = std::fs::read_to_string(path)
            .map_err(|e| InscribeError::from_io_at(path, e, false))?;
        return Ok(strip_trailing_newline(&content).to_string());
    }

    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .map_err(|e| InscribeError::io("Failed to read comment from stdin", e))?;
    Ok(strip_trailing_newline(&content).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_from_file_strips_one_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, "line one\nline two\n").unwrap();

        let args = WriteArgs {
            file: "a.jpg".into(),
            text: None,
            stdin: false,
            from_file: Some(path),
            no_verify: false,
        };
        assert_eq!(comment_source(&args).unwrap(), "line one\nline two");
    }

    #[test]
    fn test_comment_from_missing_file() {
        let args = WriteArgs {
            file: "a.jpg".into(),
            text: None,
            stdin: false,
            from_file: Some("/nonexistent/note.txt".into()),
            no_verify: false,
        };
        assert!(matches!(
            comment_source(&args),
            Err(InscribeError::FileNotFound { .. })
        ));
    }
}
