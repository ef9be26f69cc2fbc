//! Passphrase to key derivation
//!
//! The engine stores strings as UTF-16LE and hashes that representation
//! directly, without salt or iteration. Hashing any other encoding of the
//! passphrase yields a key the engine will never reproduce.

use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Length of derived key in bytes (AES-256)
pub const KEY_LEN: usize = 32;

/// Derive the AES-256 key for `passphrase`: SHA-256 over its UTF-16LE code units.
pub fn derive_key(passphrase: &str) -> Zeroizing<[u8; KEY_LEN]> {
    let mut hasher = Sha256::new();
    for unit in passphrase.encode_utf16() {
        hasher.update(unit.to_le_bytes());
    }
    Zeroizing::new(hasher.finalize().into())
}
