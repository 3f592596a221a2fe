//! Image comment metadata: the record returned by a read, the update
//! accepted by a write, and the ExifTool argument grammar shared by both.
//!
//! Reads go through ExifTool's JSON output, so comment values normally
//! arrive as plain strings. Raw EXIF byte arrays (an 8-byte character-code
//! header followed by the text) are still understood by [`decode`] for
//! values that carry them.

pub mod decode;
pub mod reader;
pub mod writer;

pub use decode::{comment_text, decode_comment, decode_comment_bytes, CharacterCode};
pub use reader::{parse_read_output, read_args, read_metadata};
pub use writer::{write_args, write_metadata};

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{InscribeError, Result};

/// Result key holding the EXIF user comment.
pub const USER_COMMENT_KEY: &str = "userComment";

/// Result key holding the IPTC caption or plain description.
pub const DESCRIPTION_KEY: &str = "description";

/// Charset options passed on every call so ExifTool reads and writes UTF-8
/// for file names, IPTC and EXIF text.
pub const CHARSET_ARGS: [&str; 6] = [
    "-charset",
    "UTF8",
    "-charset",
    "iptc=UTF8",
    "-charset",
    "exif=UTF8",
];

/// A raw metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Already-decoded text.
    Text(String),
    /// Undecoded bytes, possibly prefixed with an EXIF character-code header.
    Bytes(Vec<u8>),
}

impl MetadataValue {
    /// Convert one ExifTool JSON value.
    ///
    /// Returns `None` for null and empty strings, which count as absent.
    /// Numbers and booleans become text of their literal form, since ExifTool
    /// prints numeric-looking strings as JSON numbers. Arrays of byte-sized
    /// integers become [`MetadataValue::Bytes`].
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(Self::Text(n.to_string())),
            Value::Bool(b) => Some(Self::Text(b.to_string())),
            Value::Array(items) => match byte_array(items) {
                Some(bytes) if bytes.is_empty() => None,
                Some(bytes) => Some(Self::Bytes(bytes)),
                None => Some(Self::Text(value.to_string())),
            },
            Value::Object(_) => Some(Self::Text(value.to_string())),
        }
    }

    /// Whether this value holds no content.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
        }
    }
}

fn byte_array(items: &[Value]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
        .collect()
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for MetadataValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

/// Fields read from one image, keyed by result key
/// ([`USER_COMMENT_KEY`], [`DESCRIPTION_KEY`]).
///
/// Produced fresh by every read and never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    fields: IndexMap<String, MetadataValue>,
}

impl MetadataRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any previous value but keeping its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.fields.get(key)
    }

    /// The raw user comment.
    pub fn user_comment(&self) -> Option<&MetadataValue> {
        self.get(USER_COMMENT_KEY)
    }

    /// The raw caption/description.
    pub fn description(&self) -> Option<&MetadataValue> {
        self.get(DESCRIPTION_KEY)
    }

    /// Whether no field was found.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Iterate fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The comment to display: see [`comment_text`].
    pub fn comment(&self) -> String {
        comment_text(self)
    }
}

/// Fields to write. Serialized with ExifTool tag names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetadataUpdate {
    /// New EXIF user comment; `None` leaves the file untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_comment: Option<String>,
}

impl MetadataUpdate {
    /// An update setting the user comment.
    pub fn user_comment(comment: impl Into<String>) -> Self {
        Self {
            user_comment: Some(comment.into()),
        }
    }
}

/// Status of a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteStatus {
    /// The write completed, or there was nothing to write.
    Success,
}

/// Outcome of a write, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteOutcome {
    /// Whether the file was written.
    pub status: WriteStatus,
    /// Human-readable confirmation.
    pub message: String,
}

/// Render `path` as a tool argument.
///
/// ExifTool would read a relative path starting with `-` as an option, so
/// such paths are prefixed with `./`.
pub(crate) fn path_arg(path: &Path) -> Result<String> {
    let text = path.to_str().ok_or_else(|| {
        InscribeError::invalid_argument("path", format!("not valid UTF-8: {}", path.display()))
    })?;

    if text.starts_with('-') {
        Ok(format!("./{text}"))
    } else {
        Ok(text.to_string())
    }
}

/// Fail early with a clear error if `path` is not an existing regular file.
pub(crate) async fn ensure_file(path: &Path) -> Result<()> {
    let meta = tokio::fs::metadata(path)
        .await
        .map_err(|e| InscribeError::from_io_at(path, e, false))?;

    if meta.is_dir() {
        return Err(InscribeError::invalid_argument(
            "path",
            format!("{} is a directory, not an image", path.display()),
        ));
    }
    Ok(())
}
