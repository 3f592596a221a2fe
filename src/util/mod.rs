//! Utility functions shared across the crate:
//! - Atomic file writes (configuration saves)
//! - Display helpers for comment text

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{InscribeError, Result};

/// Atomically write content to a file.
///
/// The content goes to a temporary file in the target's directory, which is
/// then renamed over the target. If any step fails the original file (if it
/// exists) is left untouched.
///
/// # Example
///
/// ```rust,no_run
/// use inscribe::util::atomic_write;
///
/// atomic_write("config.toml", b"[display]\ncolor = true\n").unwrap();
/// ```
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            InscribeError::io(format!("Failed to create directory: {}", parent.display()), e)
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        InscribeError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        InscribeError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        InscribeError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        InscribeError::io(
            format!("Failed to atomically write file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

/// Truncate `text` to at most `max_chars` characters, appending an ellipsis
/// when anything was cut. `max_chars == 0` disables truncation.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Collapse a multi-line comment into one line for list views.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
