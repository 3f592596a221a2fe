//! Command-line interface for inscribe.
//!
//! Commands:
//! - `read`: show the comment stored in an image
//! - `write`: store a new comment and confirm it
//! - `edit`: edit the comment in `$EDITOR`
//! - `ls` / `drives` / `browse`: find images to work on
//! - `check`: verify that ExifTool can be run
//! - `config`: view and modify configuration

mod commands;

pub use commands::*;

use clap::{ArgGroup, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use crate::config::Config;
use crate::error::{InscribeError, Result};

/// Read and write the comment embedded in image metadata.
#[derive(Debug, Parser)]
#[command(name = "inscribe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the ExifTool executable (overrides the configuration).
    #[arg(long, global = true, env = "INSCRIBE_EXIFTOOL")]
    pub exiftool: Option<PathBuf>,

    /// Output format for structured data.
    #[arg(short = 'o', long, global = true, default_value = "text", env = "INSCRIBE_OUTPUT")]
    pub output: OutputFormat,

    /// Enable verbose output (debug logging unless --log-level is given).
    #[arg(short = 'v', long, global = true, env = "INSCRIBE_VERBOSE")]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short = 'q', long, global = true, env = "INSCRIBE_QUIET")]
    pub quiet: bool,

    /// Enable colored output (auto-detected by default).
    #[arg(long, global = true, env = "INSCRIBE_COLOR")]
    pub color: Option<bool>,

    /// Output as JSON (shorthand for -o json).
    #[arg(long, global = true, env = "INSCRIBE_JSON")]
    pub json: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true, env = "INSCRIBE_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log format (text, json, compact, pretty).
    #[arg(long, global = true, default_value = "text", env = "INSCRIBE_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Path to custom configuration file.
    #[arg(long, global = true, env = "INSCRIBE_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Log level options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    #[default]
    Warn,
    /// Errors, warnings, and informational messages.
    Info,
    /// All of the above plus debug messages.
    Debug,
    /// All messages including trace-level details.
    Trace,
}

/// Log format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format.
    #[default]
    Text,
    /// Structured JSON format for machine consumption.
    Json,
    /// Compact single-line format.
    Compact,
    /// Pretty format with full details.
    Pretty,
}

impl LogLevel {
    /// Convert to tracing filter level.
    #[must_use]
    pub fn to_filter_string(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Cli {
    /// Get effective output format.
    #[must_use]
    pub fn effective_output(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    /// Get effective log level.
    #[must_use]
    pub fn effective_log_level(&self) -> LogLevel {
        match self.log_level {
            Some(level) => level,
            None if self.verbose => LogLevel::Debug,
            None => LogLevel::default(),
        }
    }
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the comment stored in an image.
    #[command(alias = "r", alias = "show")]
    Read(ReadArgs),

    /// Store a new comment in an image.
    #[command(alias = "w")]
    Write(WriteArgs),

    /// Edit an image's comment in your text editor.
    #[command(alias = "e")]
    Edit(EditArgs),

    /// List a directory, marking images.
    #[command(alias = "list")]
    Ls(LsArgs),

    /// List filesystem roots.
    Drives,

    /// Interactively browse for an image and edit its comment.
    #[command(alias = "b")]
    Browse(BrowseArgs),

    /// Check that ExifTool can be run and show its version.
    Check,

    /// View and modify configuration.
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions.
    Completions(CompletionsArgs),
}

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Arguments for the read command.
#[derive(Debug, Parser)]
pub struct ReadArgs {
    /// Image file.
    pub file: PathBuf,

    /// Show every field found instead of just the comment.
    #[arg(long)]
    pub raw: bool,
}

/// Arguments for the write command.
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "stdin", "from_file"])))]
pub struct WriteArgs {
    /// Image file.
    pub file: PathBuf,

    /// New comment text.
    pub text: Option<String>,

    /// Read the comment from standard input.
    #[arg(long)]
    pub stdin: bool,

    /// Read the comment from a text file.
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Do not read the file back to confirm the write.
    #[arg(long)]
    pub no_verify: bool,
}

/// Arguments for the edit command.
#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Image file.
    pub file: PathBuf,
}

/// Arguments for the ls command.
#[derive(Debug, Parser)]
pub struct LsArgs {
    /// Directory to list (default: current directory).
    pub dir: Option<PathBuf>,

    /// Show only images (and directories).
    #[arg(short = 'i', long)]
    pub images: bool,

    /// Include dotfiles.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Read and show the comment of every image.
    #[arg(short = 'c', long)]
    pub comments: bool,
}

/// Arguments for the browse command.
#[derive(Debug, Parser)]
pub struct BrowseArgs {
    /// Directory to start in (default: current directory).
    pub dir: Option<PathBuf>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Config action.
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Show the full configuration.
    Show,
    /// Get a configuration value.
    Get {
        /// Key, as `section.field`.
        key: String,
    },
    /// Set a configuration value.
    Set {
        /// Key, as `section.field`.
        key: String,
        /// New value (empty clears optional paths).
        value: String,
    },
    /// Show the configuration file path.
    Path,
    /// Create a configuration file with defaults.
    Init,
    /// Reset the configuration file to defaults.
    Reset,
}

/// Arguments for the completions command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// PowerShell.
    Powershell,
    /// Elvish shell.
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and print to stdout.
pub fn generate_completions(shell: CompletionShell) {
    let mut cmd = Cli::command();
    let shell: Shell = shell.into();
    generate(shell, &mut cmd, "inscribe", &mut io::stdout());
}

/// Initialize tracing/logging based on CLI options.
fn init_logging(cli: &Cli) {
    use tracing_subscriber::{
        fmt::{self, format::FmtSpan},
        layer::SubscriberExt,
        util::SubscriberInitExt,
        EnvFilter,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.effective_log_level().to_filter_string()));

    let result = match cli.log_format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
        LogFormat::Text => {
            let layer = fmt::layer().with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()
        }
    };

    if let Err(e) = result {
        eprintln!("Warning: Could not initialize logging: {e}");
    }
}

/// Load the configuration named on the command line, or the default one.
///
/// An unreadable configuration is reported and replaced by defaults.
fn load_config(cli: &Cli) -> Config {
    match &cli.config {
        Some(path) => Config::load_from(path).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config from {}: {}", path.display(), e);
            Config::default()
        }),
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Config::default()
        }),
    }
}

fn init_colors(cli: &Cli, config: &Config) {
    let enabled = match cli.color {
        Some(color) => color,
        None if !config.display.color => false,
        None => return,
    };
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

/// Run the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli);

    let config = load_config(&cli);
    init_colors(&cli, &config);

    // One operation at a time: a single-threaded runtime is all the
    // subprocess plumbing needs.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| InscribeError::io("Failed to start async runtime", e))?;

    runtime.block_on(dispatch(&cli, &config))
}

async fn dispatch(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Read(args) => commands::read::run(cli, config, args).await,
        Commands::Write(args) => commands::write::run(cli, config, args).await,
        Commands::Edit(args) => commands::edit::run(cli, config, args).await,
        Commands::Ls(args) => commands::ls::run(cli, config, args).await,
        Commands::Drives => commands::drives::run(cli),
        Commands::Browse(args) => commands::browse::run(cli, config, args).await,
        Commands::Check => commands::check::run(cli, config).await,
        Commands::Config(args) => commands::config::run(cli, args),
        Commands::Completions(args) => {
            generate_completions(args.shell);
            Ok(())
        }
    }
}
