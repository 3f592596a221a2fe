//! Property-based tests for the comment decoder and output parser.
//!
//! Uses proptest to feed arbitrary bytes and text through decoding to make
//! sure it never panics and keeps its trimming guarantees.

use inscribe::metadata::{decode_comment, decode_comment_bytes, parse_read_output, MetadataValue};
use proptest::prelude::*;

const UNICODE_HEADER: &[u8; 8] = b"UNICODE\0";
const ASCII_HEADER: &[u8; 8] = b"ASCII\0\0\0";

fn utf16le(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Decoding never panics, whatever the bytes.
    #[test]
    fn decoder_never_panics_on_arbitrary_bytes(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_comment_bytes(&bytes);
    }

    /// Decoded text never starts or ends with whitespace or NUL.
    #[test]
    fn decoded_text_is_trimmed(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let text = decode_comment_bytes(&bytes);
        prop_assert_eq!(text.trim_matches(|c: char| c.is_whitespace() || c == '\0'), text.as_str());
    }

    /// A UNICODE-tagged comment decodes to the original text.
    #[test]
    fn unicode_header_round_trips(text in "[a-zA-Z0-9 éü東京]{0,64}") {
        let mut bytes = UNICODE_HEADER.to_vec();
        bytes.extend(utf16le(&text));
        prop_assert_eq!(decode_comment_bytes(&bytes), text.trim());
    }

    /// Printable ASCII under an ASCII header decodes unchanged.
    #[test]
    fn ascii_header_round_trips(text in "[ -~]{0,64}") {
        let mut bytes = ASCII_HEADER.to_vec();
        bytes.extend(text.as_bytes());
        prop_assert_eq!(decode_comment_bytes(&bytes), text.trim());
    }

    /// Plain text values are only trimmed.
    #[test]
    fn text_values_are_trimmed(text in "\\PC{0,64}") {
        let decoded = decode_comment(&MetadataValue::Text(text.clone()));
        prop_assert_eq!(decoded, text.trim_matches(|c: char| c.is_whitespace() || c == '\0'));
    }

    /// The output parser rejects or accepts, but never panics.
    #[test]
    fn parser_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..1024)) {
        let _ = parse_read_output(&bytes);
    }
}

#[test]
fn decoder_handles_header_only() {
    assert_eq!(decode_comment_bytes(UNICODE_HEADER), "");
    assert_eq!(decode_comment_bytes(ASCII_HEADER), "");
}
