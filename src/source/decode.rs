//! Hash payload decoding: percent-decoding followed by forgiving base64.

use std::str::Utf8Error;
use std::string::FromUtf8Error;

use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::Engine;
use percent_encoding::percent_decode_str;
use thiserror::Error;

/// Standard alphabet; padding optional, non-zero trailing bits tolerated.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid percent-encoded UTF-8: {0}")]
    Percent(#[from] Utf8Error),
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("decoded payload is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("decoded payload is empty")]
    Empty,
}

/// Decode a share-link hash into source code.
///
/// Whitespace is stripped, percent escapes are decoded, and the result is
/// read as base64-encoded UTF-8. The decoded text is trimmed and must not be
/// empty.
pub fn decode_hash_payload(payload: &str) -> Result<String, DecodeError> {
    let sanitized: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let unescaped = percent_decode_str(&sanitized).decode_utf8()?;
    let bytes = FORGIVING.decode(unescaped.as_bytes())?;
    let code = String::from_utf8(bytes)?;
    let code = code.trim();
    if code.is_empty() {
        return Err(DecodeError::Empty);
    }
    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_padded_payload() {
        let code = decode_hash_payload("JDogbm90ZSgiYyBlIGciKQ==").unwrap();
        assert_eq!(code, r#"$: note("c e g")"#);
    }

    #[test]
    fn padding_is_optional() {
        let code = decode_hash_payload("JDogbm90ZSgiYyBlIGciKQ").unwrap();
        assert_eq!(code, r#"$: note("c e g")"#);
    }

    #[test]
    fn percent_escapes_and_whitespace_are_removed() {
        let code = decode_hash_payload(" JDogbm90ZSgiYyBl\nIGciKQ%3D%3D ").unwrap();
        assert_eq!(code, r#"$: note("c e g")"#);
    }

    #[test]
    fn multibyte_text_survives() {
        assert_eq!(decode_hash_payload("cygiYmQgw6kiKQ==").unwrap(), "s(\"bd é\")");
    }

    #[test]
    fn invalid_base64_is_an_error() {
        assert!(matches!(
            decode_hash_payload("not base64!"),
            Err(DecodeError::Base64(_))
        ));
    }

    #[test]
    fn invalid_percent_escape_is_an_error() {
        assert!(matches!(
            decode_hash_payload("%FF%FE"),
            Err(DecodeError::Percent(_))
        ));
    }

    #[test]
    fn non_utf8_payload_is_an_error() {
        // base64 of the single byte 0xFF
        assert!(matches!(decode_hash_payload("/w=="), Err(DecodeError::Utf8(_))));
    }

    #[test]
    fn blank_payload_is_an_error() {
        assert!(matches!(decode_hash_payload(""), Err(DecodeError::Empty)));
        // base64 of "   "
        assert!(matches!(decode_hash_payload("ICAg"), Err(DecodeError::Empty)));
    }
}
