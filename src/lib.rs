//! sqlcrypt - passphrase encryption interoperable with SQL Server's
//! `ENCRYPTBYPASSPHRASE` and `DECRYPTBYPASSPHRASE` (V2, no authenticator).
//!
//! ```no_run
//! let envelope = sqlcrypt::encrypt_str("YOUR PASSPHRASE", "MESSAGE")?;
//! println!("{}", sqlcrypt::armor::to_hex_literal(&envelope));
//!
//! let message = sqlcrypt::decrypt_str("YOUR PASSPHRASE", &envelope)?;
//! assert_eq!(message, "MESSAGE");
//! # Ok::<(), sqlcrypt::SqlCryptError>(())
//! ```

#![forbid(unsafe_code)]

pub mod armor;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod kdf;
pub mod text;

pub use codec::{
    decrypt, decrypt_str, decrypt_text, encrypt, encrypt_deterministic, encrypt_str, encrypt_text,
};
pub use error::{ErrorCategory, ErrorKind, Result, SqlCryptError};
pub use text::TextEncoding;
