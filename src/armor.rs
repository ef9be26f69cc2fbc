//! Textual representations of an envelope
//!
//! The engine prints `varbinary` values as `0x`-prefixed uppercase hex, which
//! is also the form a literal takes in a query:
//!
//! ```sql
//! SELECT CONVERT(varchar(max), DECRYPTBYPASSPHRASE('YOUR PASSPHRASE', 0x02000000...));
//! ```
//!
//! Base64 is provided for storing envelopes in text or JSON fields. Neither
//! form validates the envelope itself; that happens on decrypt.

use crate::error::{ErrorCategory, ErrorKind, Result, SqlCryptError};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64_STANDARD};

/// Prefix of a varbinary literal
const HEX_PREFIX: &str = "0x";

/// Render bytes as a varbinary literal
///
/// Format: 0x{uppercase hex}
pub fn to_hex_literal(envelope: &[u8]) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode_upper(envelope))
}

/// Parse a varbinary literal, returning the bytes
///
/// Surrounding whitespace is ignored, the `0x` prefix is optional and
/// digits may be in either case.
pub fn from_hex_literal(literal: &str) -> Result<Vec<u8>> {
    let trimmed = literal.trim();
    let digits = trimmed
        .strip_prefix(HEX_PREFIX)
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(SqlCryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::ArmoringDecode,
            "hex literal contains no digits",
        ));
    }

    hex::decode(digits).map_err(|e| {
        SqlCryptError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::ArmoringDecode,
            format!("hex decoding failed: {}", e),
            e,
        )
    })
}

/// Encode bytes as standard, padded base64
pub fn to_base64(envelope: &[u8]) -> String {
    BASE64_STANDARD.encode(envelope)
}

/// Decode standard, padded base64
pub fn from_base64(encoded: &str) -> Result<Vec<u8>> {
    BASE64_STANDARD.decode(encoded.trim()).map_err(|e| {
        SqlCryptError::with_kind_and_source(
            ErrorCategory::User,
            ErrorKind::ArmoringDecode,
            format!("base64 decoding failed: {}", e),
            e,
        )
    })
}
