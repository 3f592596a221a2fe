//! High-level API for reading and writing image comments.
//!
//! [`InscribeClient`] is the surface a front end talks to: one call to read
//! an image's metadata and one to write it, plus the read-display and
//! write-then-confirm sequences built from them.
//!
//! # Example
//!
//! ```rust,no_run
//! use inscribe::api::InscribeClient;
//! use inscribe::metadata::MetadataUpdate;
//!
//! # async fn demo() -> inscribe::Result<()> {
//! let client = InscribeClient::system();
//!
//! let outcome = client
//!     .write_image_metadata("photo.jpg", &MetadataUpdate::user_comment("Harbor at dawn"))
//!     .await?;
//! println!("{}", outcome.message);
//!
//! println!("{}", client.read_comment("photo.jpg").await?);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{InscribeError, Result};
use crate::metadata::decode::trim_comment;
use crate::metadata::{
    comment_text, read_metadata, write_metadata, MetadataRecord, MetadataUpdate, WriteOutcome,
};
use crate::tool::ExifTool;

/// Result of writing a comment and reading it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    /// Outcome of the write itself.
    pub outcome: WriteOutcome,
    /// Comment as sent, trimmed the way reads trim it.
    pub written: String,
    /// Comment as read back from the file.
    pub confirmed: String,
    /// Whether the read-back text equals the written text (both trimmed).
    pub matches: bool,
}

/// Client for image comment metadata.
///
/// Holds no state besides the tool location: every read goes to the file,
/// so a read issued after a write always sees that write.
#[derive(Debug, Clone, Default)]
pub struct InscribeClient {
    tool: ExifTool,
}

impl InscribeClient {
    /// Create a client driving `tool`.
    pub fn new(tool: ExifTool) -> Self {
        Self { tool }
    }

    /// Create a client using `exiftool` from `PATH`.
    pub fn system() -> Self {
        Self::new(ExifTool::system())
    }

    /// Create a client using the tool selected by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.exiftool.tool())
    }

    /// The tool this client drives.
    pub fn tool(&self) -> &ExifTool {
        &self.tool
    }

    /// Read the comment fields of an image.
    pub async fn read_image_metadata(&self, path: impl AsRef<Path>) -> Result<MetadataRecord> {
        read_metadata(&self.tool, path.as_ref()).await
    }

    /// Write the fields in `update` into an image.
    pub async fn write_image_metadata(
        &self,
        path: impl AsRef<Path>,
        update: &MetadataUpdate,
    ) -> Result<WriteOutcome> {
        write_metadata(&self.tool, path.as_ref(), update).await
    }

    /// Read an image and return the comment to display.
    pub async fn read_comment(&self, path: impl AsRef<Path>) -> Result<String> {
        let record = self.read_image_metadata(path).await?;
        Ok(comment_text(&record))
    }

    /// Write `comment`, then read the file again to confirm what was stored.
    pub async fn save_comment(&self, path: impl AsRef<Path>, comment: &str) -> Result<SaveReport> {
        let path = path.as_ref();
        let outcome = self
            .write_image_metadata(path, &MetadataUpdate::user_comment(comment))
            .await?;

        let confirmed = self.read_comment(path).await?;
        let report = SaveReport::new(outcome, comment, confirmed);
        debug!(path = %path.display(), matches = report.matches, "confirmed saved comment");

        Ok(report)
    }
}

impl SaveReport {
    /// Compare `comment` with the text read back, trimming it the way reads
    /// are trimmed.
    pub fn new(outcome: WriteOutcome, comment: &str, confirmed: String) -> Self {
        let written = trim_comment(comment);
        let matches = confirmed == written;
        Self {
            outcome,
            written,
            confirmed,
            matches,
        }
    }


    /// Turn a read-back that differs from what was written into
    /// [`InscribeError::VerificationFailed`].
    pub fn verified(self) -> Result<Self> {
        if self.matches {
            Ok(self)
        } else {
            Err(InscribeError::VerificationFailed {
                expected: self.written,
                actual: self.confirmed,
            })
        }
    }
}
