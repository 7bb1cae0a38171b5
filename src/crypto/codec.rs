//! Text encoding for everything untold writes to disk.
//!
//! Keys and ciphertext are stored as standard-alphabet base64 **without**
//! padding, so nothing on disk is ever raw binary.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;

use crate::errors::Result;

/// Encode raw bytes as unpadded base64.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD_NO_PAD.encode(bytes)
}

/// Decode unpadded base64 text back into bytes.
///
/// Surrounding whitespace (a trailing newline left by an editor, or by
/// `echo` into an environment variable) is ignored.  Padding characters
/// and anything outside the alphabet are rejected.
pub fn decode(text: &str) -> Result<Vec<u8>> {
    Ok(STANDARD_NO_PAD.decode(text.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UntoldError;

    #[test]
    fn encode_has_no_padding() {
        assert_eq!(encode(b"a"), "YQ");
        assert_eq!(encode(b"ab"), "YWI");
        assert_eq!(encode(b"abc"), "YWJj");
    }

    #[test]
    fn empty_input_roundtrips() {
        assert_eq!(encode(&[]), "");
        assert!(decode("").unwrap().is_empty());
    }

    #[test]
    fn every_length_roundtrips() {
        for len in 0..=70usize {
            let bytes: Vec<u8> = (0..len).map(|i| (i * 37 + len) as u8).collect();
            assert_eq!(decode(&encode(&bytes)).unwrap(), bytes, "length {len}");
        }
    }

    #[test]
    fn decode_ignores_trailing_newline() {
        assert_eq!(decode("YWJj\n").unwrap(), b"abc");
    }

    #[test]
    fn decode_rejects_padding() {
        assert!(matches!(decode("YQ=="), Err(UntoldError::Decode(_))));
    }

    #[test]
    fn decode_rejects_invalid_alphabet() {
        assert!(matches!(decode("not*base64"), Err(UntoldError::Decode(_))));
    }
}
