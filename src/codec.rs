//! Encryption/decryption compatible with the engine's passphrase functions
//!
//! This module implements the V2, no-authenticator variant of
//! `ENCRYPTBYPASSPHRASE`/`DECRYPTBYPASSPHRASE`:
//! - SHA-256 over the UTF-16LE passphrase for key derivation
//! - AES-256-CBC with PKCS#7 padding for encryption
//!
//! CBC offers no integrity protection. A wrong passphrase is detected
//! through the padding and magic checks only; see `envelope` for the layout.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::envelope::{self, HEADER_LEN, Header, IV_LEN};
use crate::error::{ErrorCategory, ErrorKind, Result, SqlCryptError};
use crate::kdf;
use crate::text::TextEncoding;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypt plaintext with a passphrase using a random IV
///
/// Returns the envelope: version(1) + reserved(3) + iv(16) + body(variable)
pub fn encrypt(passphrase: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut iv = [0u8; IV_LEN];
    rand::rng().fill_bytes(&mut iv);

    encrypt_deterministic(passphrase, plaintext, &iv)
}

/// Encrypt plaintext with a passphrase using the provided IV
///
/// This function is ONLY for testing purposes to generate deterministic output.
/// NEVER use this in production - always use `encrypt()` which generates a random IV.
pub fn encrypt_deterministic(
    passphrase: &str,
    plaintext: &[u8],
    iv: &[u8; IV_LEN],
) -> Result<Vec<u8>> {
    let record = envelope::build_record(plaintext)?;
    let key = kdf::derive_key(passphrase);

    let cipher =
        Aes256CbcEnc::new_from_slices(key.as_slice(), iv).map_err(|_| cipher_init_error())?;
    let body = cipher.encrypt_padded_vec_mut::<Pkcs7>(&record);

    let mut output = Vec::with_capacity(HEADER_LEN + body.len());
    envelope::write_header(&mut output, iv);
    output.extend_from_slice(&body);

    trace!(
        plaintext_len = plaintext.len(),
        envelope_len = output.len(),
        "encrypted envelope"
    );
    Ok(output)
}

/// Decrypt an envelope with a passphrase
pub fn decrypt(passphrase: &str, envelope: &[u8]) -> Result<Vec<u8>> {
    open(passphrase, envelope)
        .inspect(|plaintext| {
            trace!(
                envelope_len = envelope.len(),
                plaintext_len = plaintext.len(),
                "decrypted envelope"
            )
        })
        .inspect_err(|e| {
            debug!(
                kind = ?e.kind,
                envelope_len = envelope.len(),
                "rejected envelope: {}",
                e
            )
        })
}

fn open(passphrase: &str, envelope: &[u8]) -> Result<Vec<u8>> {
    let header = Header::parse(envelope)?;
    let key = kdf::derive_key(passphrase);

    // Always the IV carried in the envelope.
    let cipher = Aes256CbcDec::new_from_slices(key.as_slice(), header.iv)
        .map_err(|_| cipher_init_error())?;
    let record = Zeroizing::new(
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(header.body)
            .map_err(|_| {
                SqlCryptError::with_kind(
                    ErrorCategory::User,
                    ErrorKind::PaddingInvalid,
                    "invalid padding; bad passphrase or corrupt input",
                )
            })?,
    );

    let plaintext = envelope::parse_record(&record)?;
    Ok(plaintext.to_vec())
}

/// Encrypt text, encoding it for the given column type first
pub fn encrypt_text(passphrase: &str, text: &str, encoding: TextEncoding) -> Result<Vec<u8>> {
    let plaintext = encoding.encode(text);
    encrypt(passphrase, &plaintext)
}

/// Decrypt an envelope and interpret its plaintext as text of the given column type
pub fn decrypt_text(passphrase: &str, envelope: &[u8], encoding: TextEncoding) -> Result<String> {
    let plaintext = decrypt(passphrase, envelope)?;
    encoding.decode(plaintext)
}

/// Encrypt a UTF-8 string
pub fn encrypt_str(passphrase: &str, plaintext: &str) -> Result<Vec<u8>> {
    encrypt_text(passphrase, plaintext, TextEncoding::Varchar)
}

/// Decrypt an envelope holding a UTF-8 string
pub fn decrypt_str(passphrase: &str, envelope: &[u8]) -> Result<String> {
    decrypt_text(passphrase, envelope, TextEncoding::Varchar)
}

fn cipher_init_error() -> SqlCryptError {
    SqlCryptError::with_kind(
        ErrorCategory::Internal,
        ErrorKind::CipherInitError,
        "failed to initialize AES-256-CBC",
    )
}
