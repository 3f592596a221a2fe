//! Interactive image browser.
//!
//! A fuzzy picker over one directory at a time. Directories are entered,
//! `..` goes up (past a root it lists the drives), and picking an image
//! shows its comment with an offer to edit it.

use std::path::{Path, PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm, FuzzySelect};

use crate::api::InscribeClient;
use crate::browse::{list_directory, list_drives, FileEntry};
use crate::cli::{BrowseArgs, Cli};
use crate::config::Config;
use crate::error::{InscribeError, Result};

use super::{client, describe_comment, edit_and_save, print_save_report};

const PARENT: &str = "..";

/// What a picker line leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Choice {
    Up,
    Enter(PathBuf),
    Image(PathBuf),
}

/// Where the browser currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Drives,
    Dir(PathBuf),
}

/// Run the browse command.
pub async fn run(cli: &Cli, config: &Config, args: &BrowseArgs) -> Result<()> {
    let client = client(cli, config);
    let start = args.dir.clone().unwrap_or_else(|| PathBuf::from("."));
    let start =
        std::fs::canonicalize(&start).map_err(|e| InscribeError::from_io_at(&start, e, true))?;
    let mut location = Location::Dir(start);

    loop {
        let (prompt, items, choices) = match &location {
            Location::Drives => drive_choices(),
            Location::Dir(dir) => match list_directory(dir).await {
                Ok(entries) => dir_choices(dir, &entries, config.display.show_hidden),
                Err(e) => {
                    eprintln!("Error: {e}");
                    location = parent_location(dir);
                    continue;
                }
            },
        };

        let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact_opt()?;

        let Some(index) = selection else {
            return Ok(());
        };

        match &choices[index] {
            Choice::Up => {
                if let Location::Dir(dir) = &location {
                    location = parent_location(dir);
                }
            }
            Choice::Enter(dir) => location = Location::Dir(dir.clone()),
            Choice::Image(path) => show_image(cli, &client, path).await?,
        }
    }
}

/// Show the comment of `path` and offer to edit it.
///
/// Tool failures are reported inline so the browser keeps running.
async fn show_image(cli: &Cli, client: &InscribeClient, path: &Path) -> Result<()> {
    let current = match client.read_comment(path).await {
        Ok(comment) => comment,
        Err(e) => {
            eprintln!("Error: {e}");
            String::new()
        }
    };

    println!("{}: {}", path.display(), describe_comment(&current));

    let edit = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Edit comment?")
        .default(false)
        .interact()?;
    if !edit {
        return Ok(());
    }

    match edit_and_save(client, path, &current).await {
        Ok(Some(report)) => print_save_report(cli, &report),
        Ok(None) => {
            println!("Comment unchanged.");
            Ok(())
        }
        Err(e @ (InscribeError::ToolExecution { .. }
        | InscribeError::SpawnFailure { .. }
        | InscribeError::ParseError { .. }
        | InscribeError::FileNotFound { .. })) => {
            eprintln!("Error: {e}");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn parent_location(dir: &Path) -> Location {
    match dir.parent() {
        Some(parent) => Location::Dir(parent.to_path_buf()),
        None => Location::Drives,
    }
}

fn drive_choices() -> (String, Vec<String>, Vec<Choice>) {
    let drives = list_drives();
    let items = drives.iter().map(|d| d.display().to_string()).collect();
    let choices = drives.into_iter().map(Choice::Enter).collect();
    ("Drives".to_string(), items, choices)
}

/// Picker lines for a directory: `..`, then subdirectories, then images.
fn dir_choices(
    dir: &Path,
    entries: &[FileEntry],
    show_hidden: bool,
) -> (String, Vec<String>, Vec<Choice>) {
    let mut items = vec![PARENT.to_string()];
    let mut choices = vec![Choice::Up];

    for entry in entries {
        if entry.is_hidden() && !show_hidden {
            continue;
        }
        if entry.is_directory {
            items.push(format!("{}/", entry.name));
            choices.push(Choice::Enter(dir.join(&entry.name)));
        } else if entry.is_image() {
            items.push(entry.name.clone());
            choices.push(Choice::Image(dir.join(&entry.name)));
        }
    }

    (dir.display().to_string(), items, choices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(name: &str, is_directory: bool) -> FileEntry {
        FileEntry {
            name: name.into(),
            is_directory,
        }
    }

    #[test]
    fn test_dir_choices_skip_non_images() {
        let dir = Path::new("/photos");
        let entries = [
            entry("2024", true),
            entry(".cache", true),
            entry("a.jpg", false),
            entry("notes.txt", false),
        ];

        let (prompt, items, choices) = dir_choices(dir, &entries, false);
        assert_eq!(prompt, "/photos");
        assert_eq!(items, vec!["..", "2024/", "a.jpg"]);
        assert_eq!(
            choices,
            vec![
                Choice::Up,
                Choice::Enter(PathBuf::from("/photos/2024")),
                Choice::Image(PathBuf::from("/photos/a.jpg")),
            ]
        );
    }

    #[test]
    fn test_dir_choices_show_hidden() {
        let (_, items, _) = dir_choices(Path::new("/p"), &[entry(".cache", true)], true);
        assert_eq!(items, vec!["..", ".cache/"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_parent_of_root_is_drives() {
        assert_eq!(parent_location(Path::new("/")), Location::Drives);
        assert_eq!(
            parent_location(Path::new("/photos")),
            Location::Dir(PathBuf::from("/"))
        );
    }

    #[test]
    fn test_drive_choices_enter_roots() {
        let (_, items, choices) = drive_choices();
        assert_eq!(items.len(), choices.len());
        assert!(choices.iter().all(|c| matches!(c, Choice::Enter(_))));
    }
}
