//! Edit command implementation.

use crate::cli::{Cli, EditArgs};
use crate::config::Config;
use crate::error::Result;

use super::{client, edit_and_save, print_save_report};

/// Run the edit command: open the current comment in `$EDITOR` and save
/// the result if it changed.
pub async fn run(cli: &Cli, config: &Config, args: &EditArgs) -> Result<()> {
    let client = client(cli, config);

    let current = client.read_comment(&args.file).await?;

    let Some(report) = edit_and_save(&client, &args.file, &current).await? else {
        if !cli.quiet {
            eprintln!("Comment unchanged.");
        }
        return Ok(());
    };

    print_save_report(cli, &report)?;
    report.verified().map(|_| ())
}
