//! inscribe: read and write image comments through ExifTool.

use std::process::ExitCode;

use inscribe::cli;

fn main() -> ExitCode {
    // Logging is initialized by cli::run based on --log-level and --log-format
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");

            // Print cause chain in debug mode
            if std::env::var("RUST_BACKTRACE").is_ok() {
                let mut source = std::error::Error::source(&e);
                while let Some(cause) = source {
                    eprintln!("Caused by: {cause}");
                    source = cause.source();
                }
            }

            ExitCode::from(e.exit_code() as u8)
        }
    }
}
