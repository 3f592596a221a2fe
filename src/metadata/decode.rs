//! Comment decoding.
//!
//! EXIF stores `UserComment` as an 8-byte character-code header followed by
//! the text: `ASCII\0\0\0`, `UNICODE\0` (UTF-16LE here), `JIS\0\0\0\0\0`
//! (Shift_JIS) or eight NULs for "undefined". Decoding never fails: when the
//! selected encoding rejects the bytes the whole sequence is retried as
//! UTF-8, and when that fails too the comment reads as empty.

use std::borrow::Cow;

use encoding_rs::{Encoding, SHIFT_JIS, UTF_16LE, WINDOWS_1252};
use tracing::warn;

use super::{MetadataRecord, MetadataValue};
use crate::error::{InscribeError, Result};

/// Length of the EXIF character-code header.
pub const HEADER_LEN: usize = 8;

/// EXIF character code announced by a comment header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterCode {
    /// `ASCII` header.
    Ascii,
    /// `UNICODE` header.
    Unicode,
    /// `JIS` header.
    Jis,
    /// No recognized header; the bytes are taken as UTF-8 from the start.
    Undefined,
}

impl CharacterCode {
    /// Read the header at the start of `bytes`.
    pub fn detect(bytes: &[u8]) -> Self {
        if bytes.len() < HEADER_LEN {
            return Self::Undefined;
        }

        let marker: String = bytes[..HEADER_LEN]
            .iter()
            .filter(|&&b| b != 0)
            .map(|&b| char::from(b))
            .collect();

        if marker.starts_with("ASCII") {
            Self::Ascii
        } else if marker.starts_with("UNICODE") {
            Self::Unicode
        } else if marker.starts_with("JIS") {
            Self::Jis
        } else {
            Self::Undefined
        }
    }

    /// Name of the text encoding used for this code.
    pub const fn encoding_name(self) -> &'static str {
        match self {
            Self::Ascii => "ASCII",
            Self::Unicode => "UTF-16LE",
            Self::Jis => "Shift_JIS",
            Self::Undefined => "UTF-8",
        }
    }

    fn body(self, bytes: &[u8]) -> &[u8] {
        match self {
            Self::Undefined => bytes,
            _ => &bytes[HEADER_LEN..],
        }
    }
}

/// Decode a raw comment value into display text.
pub fn decode_comment(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Text(text) => trim_comment(text),
        MetadataValue::Bytes(bytes) => decode_comment_bytes(bytes),
    }
}

/// Decode a header-prefixed EXIF comment.
pub fn decode_comment_bytes(bytes: &[u8]) -> String {
    let code = CharacterCode::detect(bytes);

    match decode_as(code, code.body(bytes)) {
        Ok(text) => trim_comment(&text),
        Err(err) if code != CharacterCode::Undefined => {
            warn!(encoding = code.encoding_name(), error = %err, "retrying comment as UTF-8");
            match decode_utf8(bytes) {
                Ok(text) => trim_comment(&text),
                Err(err) => {
                    warn!(
                        encoding = "UTF-8",
                        error = %err,
                        "comment is not decodable, treating it as empty"
                    );
                    String::new()
                }
            }
        }
        Err(err) => {
            warn!(
                encoding = code.encoding_name(),
                error = %err,
                "comment is not decodable, treating it as empty"
            );
            String::new()
        }
    }
}

/// The comment a record should display: the decoded user comment, or the
/// decoded caption/description when the user comment is absent or blank.
pub fn comment_text(record: &MetadataRecord) -> String {
    let from_comment = record.user_comment().map(decode_comment).unwrap_or_default();
    if !from_comment.is_empty() {
        return from_comment;
    }
    record.description().map(decode_comment).unwrap_or_default()
}

fn decode_as(code: CharacterCode, body: &[u8]) -> Result<String> {
    match code {
        // WHATWG "ascii" is windows-1252, which maps every byte.
        CharacterCode::Ascii => Ok(WINDOWS_1252.decode_without_bom_handling(body).0.into_owned()),
        CharacterCode::Unicode => decode_strict(UTF_16LE, body),
        CharacterCode::Jis => decode_strict(SHIFT_JIS, body),
        CharacterCode::Undefined => decode_utf8(body),
    }
}

fn decode_strict(encoding: &'static Encoding, body: &[u8]) -> Result<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .map(Cow::into_owned)
        .ok_or_else(|| {
            InscribeError::decode(
                encoding.name(),
                format!("malformed {} sequence", encoding.name()),
            )
        })
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| InscribeError::decode("UTF-8", e.to_string()))
}

/// Comments are padded with spaces or NULs to a fixed size.
pub(crate) fn trim_comment(text: &str) -> String {
    text.trim_matches(|c: char| c.is_whitespace() || c == '\0')
        .to_string()
}
