//! Byte layout of a V2 passphrase envelope
//!
//! The envelope is:
//! - version: 1 byte (always 0x02)
//! - reserved: 3 bytes (zero)
//! - iv: 16 bytes
//! - body: AES-256-CBC ciphertext, a positive multiple of 16 bytes
//!
//! The body decrypts to a record, followed by PKCS#7 padding:
//! - magic: 4 bytes (0xBAADF00D, little-endian)
//! - authenticator length: 2 bytes (little-endian, always 0)
//! - plaintext length: 2 bytes (little-endian)
//! - plaintext
//!
//! This module only knows the layout. Encryption lives in `codec`.

use crate::error::{ErrorCategory, ErrorKind, Result, SqlCryptError};
use zeroize::Zeroizing;

/// The only supported envelope version
pub const VERSION_V2: u8 = 0x02;

/// Length of the reserved run after the version byte
pub const RESERVED_LEN: usize = 3;

/// Length of the CBC initialization vector
pub const IV_LEN: usize = 16;

/// AES block size
pub const BLOCK_LEN: usize = 16;

/// Version, reserved bytes and IV
pub const HEADER_LEN: usize = 1 + RESERVED_LEN + IV_LEN;

/// A header followed by a single cipher block
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + BLOCK_LEN;

/// Leading constant of every decrypted record
pub const MAGIC: u32 = 0xBAAD_F00D;

/// Magic, authenticator length and plaintext length
pub const RECORD_HEADER_LEN: usize = 8;

/// Largest plaintext the 16-bit length field can describe
pub const MAX_PLAINTEXT_LEN: usize = u16::MAX as usize;

/// Authenticator length written into every record
const AUTH_LEN_NONE: u16 = 0;

/// Borrowed view of a validated envelope header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub version: u8,
    pub iv: &'a [u8; IV_LEN],
    /// Ciphertext following the header; never empty and block aligned.
    pub body: &'a [u8],
}

impl<'a> Header<'a> {
    /// Splits `envelope` into header fields and ciphertext body.
    ///
    /// Size and alignment are checked before the version byte, so truncated
    /// input is always reported as malformed regardless of what its first
    /// byte happens to be.
    pub fn parse(envelope: &'a [u8]) -> Result<Self> {
        if envelope.len() < MIN_ENVELOPE_LEN {
            return Err(SqlCryptError::malformed(format!(
                "envelope is {} bytes; at least {} required",
                envelope.len(),
                MIN_ENVELOPE_LEN
            )));
        }

        let (prefix, body) = envelope
            .split_first_chunk::<HEADER_LEN>()
            .ok_or_else(|| SqlCryptError::malformed("envelope truncated while reading header"))?;

        if body.len() % BLOCK_LEN != 0 {
            return Err(SqlCryptError::malformed(format!(
                "encrypted body is {} bytes; not a multiple of the {}-byte block size",
                body.len(),
                BLOCK_LEN
            )));
        }

        // Reserved bytes are ignored on decode.
        let [version, _, _, _, iv @ ..] = prefix;
        if *version != VERSION_V2 {
            return Err(SqlCryptError::with_kind(
                ErrorCategory::User,
                ErrorKind::UnsupportedVersion,
                format!("unsupported envelope version {version}; only version 2 is supported"),
            ));
        }

        Ok(Self {
            version: *version,
            iv,
            body,
        })
    }
}

/// Appends the 20-byte V2 header carrying `iv` to `out`.
pub fn write_header(out: &mut Vec<u8>, iv: &[u8; IV_LEN]) {
    out.push(VERSION_V2);
    out.extend_from_slice(&[0u8; RESERVED_LEN]);
    out.extend_from_slice(iv);
}

/// Builds the unpadded record for `plaintext`.
pub fn build_record(plaintext: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let plaintext_len = u16::try_from(plaintext.len()).map_err(|_| {
        SqlCryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::InputTooLarge,
            format!(
                "plaintext is {} bytes; at most {} can be encrypted",
                plaintext.len(),
                MAX_PLAINTEXT_LEN
            ),
        )
    })?;

    let mut record = Zeroizing::new(Vec::with_capacity(RECORD_HEADER_LEN + plaintext.len()));
    record.extend_from_slice(&MAGIC.to_le_bytes());
    record.extend_from_slice(&AUTH_LEN_NONE.to_le_bytes());
    record.extend_from_slice(&plaintext_len.to_le_bytes());
    record.extend_from_slice(plaintext);
    Ok(record)
}

/// Validates an unpadded record and returns the plaintext it carries.
///
/// A record too short to hold its own header can only come from decrypting
/// with the wrong key (or from corruption), so it is reported as a magic
/// mismatch rather than a layout error.
pub fn parse_record(record: &[u8]) -> Result<&[u8]> {
    let Some((fixed, rest)) = record.split_first_chunk::<RECORD_HEADER_LEN>() else {
        return Err(magic_mismatch());
    };

    let [m0, m1, m2, m3, a0, a1, n0, n1] = *fixed;

    if u32::from_le_bytes([m0, m1, m2, m3]) != MAGIC {
        return Err(magic_mismatch());
    }

    let auth_len = u16::from_le_bytes([a0, a1]);
    if auth_len != AUTH_LEN_NONE {
        return Err(SqlCryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::AuthenticatorUnsupported,
            format!(
                "record carries a {auth_len}-byte authenticator; authenticators are unsupported"
            ),
        ));
    }

    let plaintext_len = usize::from(u16::from_le_bytes([n0, n1]));
    rest.get(..plaintext_len).ok_or_else(|| {
        SqlCryptError::malformed(format!(
            "record claims {} plaintext bytes but only {} are present",
            plaintext_len,
            rest.len()
        ))
    })
}

fn magic_mismatch() -> SqlCryptError {
    SqlCryptError::with_kind(
        ErrorCategory::User,
        ErrorKind::MagicMismatch,
        "decrypted data lacks the expected magic; bad passphrase or corrupt input",
    )
}
