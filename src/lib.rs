//! inscribe: read and write the comment embedded in image metadata.
//!
//! The comment lives in the EXIF `UserComment` tag, with the IPTC caption or
//! plain description as a read-only fallback. All file access goes through
//! ExifTool, run as one subprocess per operation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use inscribe::api::InscribeClient;
//!
//! # async fn demo() -> inscribe::Result<()> {
//! let client = InscribeClient::system();
//! let report = client.save_comment("photo.jpg", "Harbor at dawn").await?;
//! assert!(report.matches);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`tool`]: locating ExifTool and running one invocation
//! - [`metadata`]: read/write argument grammar, output parsing, comment decoding
//! - [`api`]: the client used by front ends
//! - [`browse`]: directory and drive listings for picking images
//! - [`cli`]: command-line interface
//! - [`config`]: configuration management
//! - [`error`]: error types and handling

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod api;
pub mod browse;
pub mod cli;
pub mod config;
pub mod error;
pub mod metadata;
pub mod tool;
pub mod util;

// Re-export commonly used types at the crate root
pub use error::{InscribeError, Result};
pub use metadata::{MetadataRecord, MetadataUpdate, MetadataValue, WriteOutcome};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::api::{InscribeClient, SaveReport};
    pub use crate::error::{InscribeError, Result};
    pub use crate::metadata::{MetadataRecord, MetadataUpdate, MetadataValue, WriteOutcome};
    pub use crate::tool::ExifTool;
}
