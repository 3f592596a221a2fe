//! Reading the comment fields of an image.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, error};

use super::{
    ensure_file, path_arg, MetadataRecord, MetadataValue, CHARSET_ARGS, DESCRIPTION_KEY,
    USER_COMMENT_KEY,
};
use crate::error::{InscribeError, Result};
use crate::tool::ExifTool;

/// Tags requested on read. Nothing else is extracted.
pub const READ_TAGS: [&str; 4] = [
    "-UserComment",
    "-Description",
    "-EXIF:UserComment",
    "-IPTC:Caption-Abstract",
];

/// Output tag → result key, in precedence order: later entries override
/// earlier ones, so group-qualified tags win over bare ones.
const FIELD_MAP: [(&str, &str); 4] = [
    ("UserComment", USER_COMMENT_KEY),
    ("Description", DESCRIPTION_KEY),
    ("EXIF:UserComment", USER_COMMENT_KEY),
    ("IPTC:Caption-Abstract", DESCRIPTION_KEY),
];

/// Arguments for reading `path`.
pub fn read_args(path: &Path) -> Result<Vec<String>> {
    let mut args: Vec<String> = CHARSET_ARGS.iter().map(|s| (*s).to_string()).collect();
    args.push("-json".to_string());
    args.extend(READ_TAGS.iter().map(|s| (*s).to_string()));
    args.push(path_arg(path)?);
    Ok(args)
}

/// Parse the JSON ExifTool prints for a single file.
///
/// No output, a non-array document, an empty array or a first element that
/// is not an object all mean "no metadata" and yield an empty record.
/// Output that is not JSON at all is an error.
pub fn parse_read_output(stdout: &[u8]) -> Result<MetadataRecord> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        debug!("metadata tool printed nothing");
        return Ok(MetadataRecord::new());
    }

    let document: Value = serde_json::from_slice(stdout).map_err(InscribeError::parse_with_source)?;

    let Some(tags) = document
        .as_array()
        .and_then(|files| files.first())
        .and_then(Value::as_object)
    else {
        debug!("metadata tool reported no files");
        return Ok(MetadataRecord::new());
    };

    let mut record = MetadataRecord::new();
    for (tag, key) in FIELD_MAP {
        if let Some(value) = tags.get(tag).and_then(MetadataValue::from_json) {
            record.insert(key, value);
        }
    }

    debug!(fields = record.len(), "parsed metadata record");
    Ok(record)
}

/// Read the comment fields of the image at `path`.
pub async fn read_metadata(tool: &ExifTool, path: &Path) -> Result<MetadataRecord> {
    ensure_file(path).await?;

    let result = tool.run(read_args(path)?, None).await.map_err(|e| {
        error!(path = %path.display(), error = %e, "failed to read metadata");
        e
    })?;

    parse_read_output(&result.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_read_args() {
        let args = read_args(Path::new("/photos/a.jpg")).unwrap();
        assert_eq!(
            args,
            vec![
                "-charset",
                "UTF8",
                "-charset",
                "iptc=UTF8",
                "-charset",
                "exif=UTF8",
                "-json",
                "-UserComment",
                "-Description",
                "-EXIF:UserComment",
                "-IPTC:Caption-Abstract",
                "/photos/a.jpg",
            ]
        );
    }

    #[rstest]
    #[case("")]
    #[case("  \n")]
    #[case("[]")]
    #[case("{}")]
    #[case("[42]")]
    #[case(r#"[{"SourceFile": "a.jpg"}]"#)]
    fn test_no_metadata_is_empty_record(#[case] stdout: &str) {
        let record = parse_read_output(stdout.as_bytes()).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_maps_bare_tags() {
        let stdout = r#"[{"SourceFile": "a.jpg", "UserComment": "hello", "Description": "desc"}]"#;
        let record = parse_read_output(stdout.as_bytes()).unwrap();

        assert_eq!(record.user_comment(), Some(&MetadataValue::from("hello")));
        assert_eq!(record.description(), Some(&MetadataValue::from("desc")));
    }

    #[test]
    fn test_qualified_tags_take_precedence() {
        let stdout = r#"[{
            "SourceFile": "a.jpg",
            "UserComment": "bare comment",
            "EXIF:UserComment": "exif comment",
            "Description": "plain description",
            "IPTC:Caption-Abstract": "iptc caption"
        }]"#;
        let record = parse_read_output(stdout.as_bytes()).unwrap();

        assert_eq!(record.user_comment(), Some(&MetadataValue::from("exif comment")));
        assert_eq!(record.description(), Some(&MetadataValue::from("iptc caption")));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_empty_qualified_tag_does_not_override() {
        let stdout = r#"[{"UserComment": "kept", "EXIF:UserComment": ""}]"#;
        let record = parse_read_output(stdout.as_bytes()).unwrap();
        assert_eq!(record.user_comment(), Some(&MetadataValue::from("kept")));
    }

    #[test]
    fn test_only_first_file_is_used() {
        let stdout = r#"[{"UserComment": "first"}, {"UserComment": "second"}]"#;
        let record = parse_read_output(stdout.as_bytes()).unwrap();
        assert_eq!(record.comment(), "first");
    }

    // ExifTool prints number-like values unquoted; the literal must survive.
    #[rstest]
    #[case("2024", "2024")]
    #[case("1.50", "1.50")]
    #[case("-0.10", "-0.10")]
    #[case("1e999", "1e999")]
    #[case("12345678901234567890", "12345678901234567890")]
    #[case("3.1415926535897932", "3.1415926535897932")]
    fn test_numeric_comment_keeps_literal(#[case] literal: &str, #[case] expected: &str) {
        let stdout = format!(r#"[{{"UserComment": {literal}}}]"#);
        let record = parse_read_output(stdout.as_bytes()).unwrap();
        assert_eq!(record.comment(), expected);
    }

    #[test]
    fn test_boolean_comment_reads_lowercase() {
        // ExifTool prints TRUE/FALSE as JSON booleans, so case is lost.
        let record = parse_read_output(br#"[{"UserComment": true}]"#).unwrap();
        assert_eq!(record.comment(), "true");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = parse_read_output(b"Warning: something odd\n").unwrap_err();
        match err {
            InscribeError::ParseError { message, source } => {
                assert!(!message.is_empty());
                assert!(source.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncated_json_is_parse_error() {
        let err = parse_read_output(br#"[{"UserComment": "half"#).unwrap_err();
        assert!(matches!(err, InscribeError::ParseError { .. }));
    }
}
