//! Ls command implementation.
//!
//! Lists a directory the way the browser sees it, optionally with the
//! comment of each image.

use std::path::{Path, PathBuf};

use console::style;
use serde::Serialize;

use crate::browse::{list_directory, FileEntry};
use crate::cli::{Cli, LsArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::util::{single_line, truncate_text};

use super::client;

/// One listed entry with its comment, when requested.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ListedEntry {
    #[serde(flatten)]
    entry: FileEntry,
    is_image: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Run the ls command.
pub async fn run(cli: &Cli, config: &Config, args: &LsArgs) -> Result<()> {
    let dir = args.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let show_hidden = args.all || config.display.show_hidden;

    let entries: Vec<FileEntry> = list_directory(&dir)
        .await?
        .into_iter()
        .filter(|entry| show_hidden || !entry.is_hidden())
        .filter(|entry| !args.images || entry.is_directory || entry.is_image())
        .collect();

    let listed = annotate(cli, config, &dir, entries, args.comments).await;

    match cli.effective_output() {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        OutputFormat::Text => {
            if listed.is_empty() && !cli.quiet {
                eprintln!("No entries in {}", dir.display());
            }
            for item in &listed {
                println!("{}", format_line(item, config.display.truncate_at));
            }
        }
    }

    Ok(())
}

/// Read the comments of the listed images, one tool call at a time.
async fn annotate(
    cli: &Cli,
    config: &Config,
    dir: &Path,
    entries: Vec<FileEntry>,
    with_comments: bool,
) -> Vec<ListedEntry> {
    let client = client(cli, config);
    let mut listed = Vec::with_capacity(entries.len());

    for entry in entries {
        let is_image = entry.is_image();
        let (comment, error) = if with_comments && is_image {
            match client.read_comment(dir.join(&entry.name)).await {
                Ok(comment) => (Some(comment), None),
                Err(e) => {
                    tracing::warn!(file = %entry.name, error = %e, "could not read comment");
                    (None, Some(e.to_string()))
                }
            }
        } else {
            (None, None)
        };

        listed.push(ListedEntry {
            entry,
            is_image,
            comment,
            error,
        });
    }

    listed
}

fn format_line(item: &ListedEntry, truncate_at: usize) -> String {
    let name = &item.entry.name;
    if item.entry.is_directory {
        return format!("{}/", style(name).blue().bold());
    }
    if !item.is_image {
        return style(name).dim().to_string();
    }

    match (&item.comment, &item.error) {
        (Some(comment), _) if !comment.is_empty() => format!(
            "{}  {}",
            style(name).green(),
            truncate_text(&single_line(comment), truncate_at)
        ),
        (_, Some(error)) => format!("{}  {}", style(name).green(), style(error).red()),
        _ => style(name).green().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(name: &str, is_directory: bool, comment: Option<&str>) -> ListedEntry {
        let entry = FileEntry {
            name: name.into(),
            is_directory,
        };
        ListedEntry {
            is_image: entry.is_image(),
            entry,
            comment: comment.map(String::from),
            error: None,
        }
    }

    #[test]
    fn test_format_line_plain() {
        console::set_colors_enabled(false);
        assert_eq!(format_line(&listed("sub", true, None), 80), "sub/");
        assert_eq!(format_line(&listed("a.txt", false, None), 80), "a.txt");
        assert_eq!(
            format_line(&listed("a.jpg", false, Some("one\ntwo")), 80),
            "a.jpg  one two"
        );
        assert_eq!(
            format_line(&listed("a.jpg", false, Some("abcdefgh")), 4),
            "a.jpg  abc…"
        );
    }

    #[test]
    fn test_listed_entry_json() {
        let json = serde_json::to_value(listed("a.jpg", false, Some("hi"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "a.jpg",
                "isDirectory": false,
                "isImage": true,
                "comment": "hi"
            })
        );
    }
}
