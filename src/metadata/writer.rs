//! Writing the user comment of an image.
//!
//! The comment travels on stdin (`-UserComment<=-`) rather than on the
//! command line, so its length and contents are not limited by argument
//! quoting rules.

use std::path::Path;

use tracing::{debug, error, info};

use super::{ensure_file, path_arg, MetadataUpdate, WriteOutcome, WriteStatus, CHARSET_ARGS};
use crate::error::{InscribeError, Result};
use crate::tool::ExifTool;

/// Tag assignment that reads the new `UserComment` value from stdin.
pub const USER_COMMENT_FROM_STDIN: &str = "-UserComment<=-";

/// Message returned after a successful write.
pub const WRITE_SUCCESS_MESSAGE: &str = "Metadata written successfully.";

/// Message returned when the update asks for nothing.
pub const NOTHING_TO_WRITE_MESSAGE: &str = "No metadata changes requested.";

/// Arguments for writing the user comment of `path` in place.
///
/// The file path precedes the stdin assignment.
pub fn write_args(path: &Path) -> Result<Vec<String>> {
    let mut args = vec!["-overwrite_original".to_string()];
    args.extend(CHARSET_ARGS.iter().map(|s| (*s).to_string()));
    args.push(path_arg(path)?);
    args.push(USER_COMMENT_FROM_STDIN.to_string());
    Ok(args)
}

/// Write `update` into the image at `path`, replacing the file in place.
///
/// The write is not verified here; callers that need confirmation read the
/// file again afterwards.
pub async fn write_metadata(
    tool: &ExifTool,
    path: &Path,
    update: &MetadataUpdate,
) -> Result<WriteOutcome> {
    let Some(comment) = update.user_comment.as_deref() else {
        debug!(path = %path.display(), "empty update, not running the tool");
        return Ok(WriteOutcome {
            status: WriteStatus::Success,
            message: NOTHING_TO_WRITE_MESSAGE.to_string(),
        });
    };

    if comment.contains('\0') {
        return Err(InscribeError::invalid_argument(
            "comment",
            "comments cannot contain NUL characters",
        ));
    }

    ensure_file(path).await?;

    // Stdout carries only ExifTool's "1 image files updated" summary.
    tool.run(write_args(path)?, Some(comment.as_bytes())).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "failed to write metadata");
        e
    })?;

    info!(path = %path.display(), bytes = comment.len(), "user comment written");

    Ok(WriteOutcome {
        status: WriteStatus::Success,
        message: WRITE_SUCCESS_MESSAGE.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_args() {
        let args = write_args(Path::new("/photos/a.jpg")).unwrap();
        assert_eq!(
            args,
            vec![
                "-overwrite_original",
                "-charset",
                "UTF8",
                "-charset",
                "iptc=UTF8",
                "-charset",
                "exif=UTF8",
                "/photos/a.jpg",
                "-UserComment<=-",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_update_skips_tool() {
        // The program does not exist, so any spawn would fail.
        let tool = ExifTool::new("/nonexistent/exiftool");
        let outcome = write_metadata(&tool, Path::new("/nonexistent.jpg"), &MetadataUpdate::default())
            .await
            .unwrap();

        assert_eq!(outcome.status, WriteStatus::Success);
        assert_eq!(outcome.message, NOTHING_TO_WRITE_MESSAGE);
    }

    #[tokio::test]
    async fn test_nul_in_comment_rejected() {
        let tool = ExifTool::new("/nonexistent/exiftool");
        let err = write_metadata(
            &tool,
            Path::new("/nonexistent.jpg"),
            &MetadataUpdate::user_comment("a\0b"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, InscribeError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_checked_before_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ExifTool::new("/nonexistent/exiftool");
        let err = write_metadata(
            &tool,
            &dir.path().join("gone.jpg"),
            &MetadataUpdate::user_comment("text"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, InscribeError::FileNotFound { .. }));
    }
}
