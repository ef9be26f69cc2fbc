use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorCategory {
    /// Any failure that cannot be confidently attributed to any other error
    /// category in this enum.
    ///
    /// Use of Internal is never a guarantee that the error was not caused by
    /// the caller - merely that it cannot be confidently determined by the
    /// code.
    Internal,

    /// The caller provided invalid input (oversized plaintext, a damaged
    /// envelope, the wrong passphrase) or asked for something unsupported.
    User,
}

/// Fine-grained condition flags for consumers that want to branch on error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Plaintext does not fit the 16-bit length field of the record.
    InputTooLarge,
    /// The envelope's version byte is not V2.
    UnsupportedVersion,
    /// The envelope is too short, misaligned, or a length field points past
    /// the decrypted record.
    MalformedEnvelope,
    /// PKCS#7 padding of the decrypted body is inconsistent. Almost always a
    /// wrong passphrase.
    PaddingInvalid,
    /// The decrypted record does not start with the magic constant. Wrong
    /// passphrase or corrupted data.
    MagicMismatch,
    /// The record carries an authenticator, which is not supported.
    AuthenticatorUnsupported,
    /// AES-256-CBC could not be initialized from the derived key and IV.
    CipherInitError,
    /// A textual (hex or base64) representation could not be decoded.
    ArmoringDecode,
    /// Decrypted bytes are not valid text in the requested encoding.
    TextDecode,
}

#[derive(Debug, Error)]
#[error("{msg}")]
pub struct SqlCryptError {
    /// Broad error category, always provided.
    pub category: ErrorCategory,
    /// Optional specific condition tag for consumers that need to
    /// branch their behavior. Any code consuming errors MUST handle
    /// the absence of a defined kind.
    pub kind: Option<ErrorKind>,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    msg: String,
}

impl SqlCryptError {
    /// Creates a new error with a required category and display message.
    pub fn new(category: ErrorCategory, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: None,
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that also tags the failure with a kind.
    pub fn with_kind(category: ErrorCategory, kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: None,
            msg: msg.into(),
        }
    }

    /// Creates a new error that carries both a kind tag and the originating source error.
    pub fn with_kind_and_source(
        category: ErrorCategory,
        kind: ErrorKind,
        msg: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            category,
            kind: Some(kind),
            source: Some(Box::new(source)),
            msg: msg.into(),
        }
    }

    /// Shorthand for the envelope-layout failures, which are all caller errors.
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::with_kind(ErrorCategory::User, ErrorKind::MalformedEnvelope, msg)
    }

    /// The user-facing message carried by the error.
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Returns the preserved source error if present.
    pub fn source_error(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// True when the failure is the typical symptom of decrypting with the
    /// wrong passphrase.
    ///
    /// CBC has no integrity protection, so a wrong key is only detected
    /// through the padding and magic checks. A small fraction of wrong-key
    /// decryptions pass the padding check and fail on the magic instead.
    pub fn is_wrong_passphrase(&self) -> bool {
        matches!(
            self.kind,
            Some(ErrorKind::PaddingInvalid) | Some(ErrorKind::MagicMismatch)
        )
    }

    /// Wraps the current error with a higher-level message while preserving the original as source.
    pub fn with_context(self, msg: impl Into<String>) -> Self {
        let category = self.category;
        let kind = self.kind;
        Self {
            category,
            kind,
            source: Some(Box::new(self)),
            msg: msg.into(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SqlCryptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_preserves_kind_and_category() {
        let err = SqlCryptError::with_kind(
            ErrorCategory::User,
            ErrorKind::PaddingInvalid,
            "invalid padding",
        )
        .with_context("failed to decrypt");

        assert_eq!(err.category, ErrorCategory::User);
        assert_eq!(err.kind, Some(ErrorKind::PaddingInvalid));
        assert_eq!(err.message(), "failed to decrypt");
        assert_eq!(err.to_string(), "failed to decrypt");

        let inner = err.source_error().expect("context should keep the source");
        assert_eq!(inner.to_string(), "invalid padding");
    }

    #[test]
    fn test_wrong_passphrase_predicate() {
        let padding =
            SqlCryptError::with_kind(ErrorCategory::User, ErrorKind::PaddingInvalid, "x");
        let magic = SqlCryptError::with_kind(ErrorCategory::User, ErrorKind::MagicMismatch, "x");
        let version =
            SqlCryptError::with_kind(ErrorCategory::User, ErrorKind::UnsupportedVersion, "x");
        let untagged = SqlCryptError::new(ErrorCategory::Internal, "x");

        assert!(padding.is_wrong_passphrase());
        assert!(magic.is_wrong_passphrase());
        assert!(!version.is_wrong_passphrase());
        assert!(!untagged.is_wrong_passphrase());
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<SqlCryptError>();
    }
}
