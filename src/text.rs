//! Text payload encodings understood by the database engine

use crate::error::{ErrorCategory, ErrorKind, Result, SqlCryptError};
use zeroize::Zeroizing;

/// How a text payload is turned into record bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    /// UTF-8 bytes. Matches `varchar` values stored in a UTF-8 collation,
    /// and any ASCII content.
    #[default]
    Varchar,
    /// UTF-16LE code units, the representation of `nvarchar` values.
    /// Decrypt server-side with `CONVERT(nvarchar(max), DECRYPTBYPASSPHRASE(...))`.
    Nvarchar,
}

impl TextEncoding {
    pub(crate) fn encode(self, text: &str) -> Zeroizing<Vec<u8>> {
        match self {
            TextEncoding::Varchar => Zeroizing::new(text.as_bytes().to_vec()),
            TextEncoding::Nvarchar => {
                Zeroizing::new(text.encode_utf16().flat_map(u16::to_le_bytes).collect())
            }
        }
    }

    pub(crate) fn decode(self, bytes: Vec<u8>) -> Result<String> {
        match self {
            TextEncoding::Varchar => String::from_utf8(bytes).map_err(|e| {
                SqlCryptError::with_kind_and_source(
                    ErrorCategory::User,
                    ErrorKind::TextDecode,
                    "decrypted data is not valid UTF-8",
                    e,
                )
            }),
            TextEncoding::Nvarchar => {
                let bytes = Zeroizing::new(bytes);
                if bytes.len() % 2 != 0 {
                    return Err(SqlCryptError::with_kind(
                        ErrorCategory::User,
                        ErrorKind::TextDecode,
                        format!(
                            "decrypted data is {} bytes; UTF-16 requires an even length",
                            bytes.len()
                        ),
                    ));
                }
                let units: Zeroizing<Vec<u16>> = Zeroizing::new(
                    bytes
                        .chunks_exact(2)
                        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                        .collect(),
                );
                String::from_utf16(&units).map_err(|e| {
                    SqlCryptError::with_kind_and_source(
                        ErrorCategory::User,
                        ErrorKind::TextDecode,
                        "decrypted data is not valid UTF-16",
                        e,
                    )
                })
            }
        }
    }
}
