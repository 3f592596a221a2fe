//! ExifTool subprocess invocation.
//!
//! Every metadata operation is exactly one process: spawned, fed its
//! optional stdin payload, drained, and reaped. Nothing is pooled or reused,
//! and there is no timeout; a tool that never exits keeps its caller waiting.

pub mod locate;

pub use locate::{ExecutableLocator, EXECUTABLE_NAME};

use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{InscribeError, Result};

/// Program name used when no explicit path or bundled layout is configured.
pub const DEFAULT_PROGRAM: &str = "exiftool";

/// One subprocess call: program, ordered arguments and optional stdin bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Executable to launch.
    pub program: PathBuf,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Bytes written to the process's stdin before it is closed.
    pub input: Option<Vec<u8>>,
}

impl ToolInvocation {
    /// Create an invocation with no arguments and no input.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            input: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the stdin payload.
    pub fn input(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.input = Some(input.into());
        self
    }
}

/// Captured outcome of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    /// Everything the process wrote to stdout.
    pub stdout: Vec<u8>,
    /// Everything the process wrote to stderr.
    pub stderr: Vec<u8>,
}

impl ToolResult {
    /// Stdout decoded as UTF-8, lossily.
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr decoded as UTF-8, lossily and trimmed.
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Run one process to completion.
///
/// Exit code 0 yields the captured output. A nonzero exit yields
/// [`InscribeError::ToolExecution`] with the code and stderr text, and a
/// process that cannot be launched at all yields
/// [`InscribeError::SpawnFailure`].
pub async fn invoke(invocation: &ToolInvocation) -> Result<ToolResult> {
    let program = &invocation.program;
    debug!(
        program = %program.display(),
        args = ?invocation.args,
        stdin_bytes = invocation.input.as_ref().map_or(0, Vec::len),
        "spawning metadata tool"
    );

    let mut command = Command::new(program);
    command
        .args(&invocation.args)
        .stdin(if invocation.input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .map_err(|e| InscribeError::spawn(program.clone(), e))?;

    let stdin = child.stdin.take();
    let payload = invocation.input.as_deref();

    // Feed stdin while the output pipes are drained; the tool reading `-`
    // only finishes once the pipe is closed, which happens when `stdin` drops.
    let feed = async move {
        if let (Some(mut stdin), Some(payload)) = (stdin, payload) {
            stdin.write_all(payload).await?;
            stdin.shutdown().await?;
        }
        Ok::<(), io::Error>(())
    };

    let (fed, output) = tokio::join!(feed, child.wait_with_output());

    let output = output.map_err(|e| {
        InscribeError::io(
            format!("Failed to collect output of {}", program.display()),
            e,
        )
    })?;

    match fed {
        Ok(()) => {}
        // The exit status says whether the tool minded.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!(program = %program.display(), "tool closed stdin before reading all input");
        }
        Err(e) => return Err(InscribeError::io("Failed to write to tool stdin", e)),
    }

    let result = ToolResult {
        code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    };

    debug!(
        program = %program.display(),
        code = ?result.code,
        stdout_bytes = result.stdout.len(),
        stderr_bytes = result.stderr.len(),
        "metadata tool exited"
    );

    if !output.status.success() {
        return Err(InscribeError::tool_execution(result.code, &result.stderr));
    }

    if !result.stderr.is_empty() {
        warn!(stderr = %result.stderr_text(), "metadata tool reported warnings");
    }

    Ok(result)
}

/// A configured ExifTool executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExifTool {
    program: PathBuf,
    leading_args: Vec<String>,
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::system()
    }
}

impl ExifTool {
    /// Use the executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    /// Use `exiftool` from `PATH`.
    pub fn system() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }

    /// Use the bundled executable found by `locator`.
    pub fn bundled(locator: &ExecutableLocator) -> Self {
        Self::new(locator.locate())
    }

    /// Arguments placed before every argument list, e.g. the script path
    /// when `program` is an interpreter.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Path of the executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments placed before every argument list.
    pub fn leading_args(&self) -> &[String] {
        &self.leading_args
    }

    /// Build an invocation of this tool with `args`.
    pub fn invocation<I, S>(&self, args: I) -> ToolInvocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolInvocation::new(self.program.clone())
            .args(self.leading_args.iter().cloned())
            .args(args)
    }

    /// Run this tool once with `args` after the leading arguments, feeding
    /// `input` on stdin when given.
    pub async fn run<I, S>(&self, args: I, input: Option<&[u8]>) -> Result<ToolResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut invocation = self.invocation(args);
        if let Some(input) = input {
            invocation = invocation.input(input);
        }
        invoke(&invocation).await
    }

    /// Version string reported by `exiftool -ver`.
    pub async fn version(&self) -> Result<String> {
        let result = self.run(["-ver"], None).await?;
        Ok(result.stdout_text().trim().to_string())
    }
}
