//! Error taxonomy for token encryption and decryption.

use thiserror::Error;

/// Coarse classification of a [`TokenError`].
///
/// Callers branch on this rather than on message text:
/// - [`ErrorKind::Configuration`] → the process was started without a usable key
/// - [`ErrorKind::Format`] → the stored string is not an encoded token
/// - [`ErrorKind::Authentication`] → tampering, corruption, or the wrong key
/// - [`ErrorKind::Internal`] → an unexpected cipher-layer fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Format,
    Authentication,
    Internal,
}

/// Error returned by every public token operation.
///
/// Messages describe what went wrong with the input's *shape* only. They never
/// contain plaintext, encoded values, or key material.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No usable secret or key was supplied.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The encoded token does not have exactly three valid hex segments.
    #[error("malformed encoded token: {0}")]
    Format(String),

    /// The authentication tag did not verify. No plaintext was released.
    #[error("token authentication failed")]
    Authentication,

    /// An unexpected failure inside the cipher layer.
    #[error("internal cipher error: {0}")]
    Internal(String),
}

impl TokenError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TokenError::Configuration(_) => ErrorKind::Configuration,
            TokenError::Format(_) => ErrorKind::Format,
            TokenError::Authentication => ErrorKind::Authentication,
            TokenError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Short machine-readable code (e.g. `"format_error"`), safe to expose.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Configuration => "configuration_error",
            ErrorKind::Format => "format_error",
            ErrorKind::Authentication => "authentication_error",
            ErrorKind::Internal => "internal_error",
        }
    }
}
