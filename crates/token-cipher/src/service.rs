//! [`TokenCipher`]: the public encrypt/decrypt surface.
//!
//! Failures are logged here with the operation name and error kind, then
//! returned to the caller unchanged. Tokens, encoded values, and key bytes
//! are never recorded; `#[instrument(skip_all)]` keeps arguments out of spans.

use std::sync::Arc;

use common::TokenError;
use tracing::{instrument, warn};

use crate::config::CipherConfig;
use crate::crypto::{self, CipherError, FormatError, SealedToken};
use crate::kdf::{self, SymmetricKey};

/// Encrypts and decrypts bearer tokens under one immutable key.
///
/// Cloning is cheap (`Arc`-backed). The key is read-only after construction,
/// so any number of threads may call [`encrypt`](Self::encrypt) and
/// [`decrypt`](Self::decrypt) concurrently.
#[derive(Clone, Debug)]
pub struct TokenCipher {
    key: Arc<SymmetricKey>,
}

impl TokenCipher {
    /// Create a cipher around an already-derived key.
    pub fn new(key: SymmetricKey) -> Self {
        Self { key: Arc::new(key) }
    }

    /// Derive the key from `cfg` and create a cipher.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Configuration`] if no secret is configured and the
    /// insecure development default has not been enabled.
    pub fn from_config(cfg: &CipherConfig) -> Result<Self, TokenError> {
        kdf::derive_from_config(cfg)
            .map(Self::new)
            .map_err(|e| report("init", e))
    }

    /// Encrypt `token` into `<nonce>:<tag>:<ciphertext>` hex form.
    ///
    /// The empty string is returned unchanged; it marks an absent token.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Internal`] if the cipher layer fails.
    #[instrument(skip_all)]
    pub fn encrypt(&self, token: &str) -> Result<String, TokenError> {
        if token.is_empty() {
            return Ok(String::new());
        }
        crypto::seal(token.as_bytes(), &self.key)
            .map(|sealed| sealed.to_encoded())
            .map_err(|e| report("encrypt", TokenError::Internal(e.to_string())))
    }

    /// Decrypt a string previously produced by [`encrypt`](Self::encrypt).
    ///
    /// The empty string is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Format`] if `encoded` is not three valid hex segments, or
    ///   the authenticated plaintext is not UTF-8.
    /// - [`TokenError::Authentication`] if the tag does not verify.
    #[instrument(skip_all)]
    pub fn decrypt(&self, encoded: &str) -> Result<String, TokenError> {
        if encoded.is_empty() {
            return Ok(String::new());
        }
        self.open_encoded(encoded).map_err(|e| report("decrypt", e))
    }

    fn open_encoded(&self, encoded: &str) -> Result<String, TokenError> {
        let sealed = SealedToken::parse(encoded)?;
        let plaintext = crypto::open(&sealed, &self.key).map_err(|e| match e {
            CipherError::AeadFailure => TokenError::Authentication,
            CipherError::InvalidKeyLength => TokenError::Internal(e.to_string()),
        })?;
        String::from_utf8(plaintext)
            .map_err(|_| TokenError::Format("decrypted token is not valid UTF-8".into()))
    }
}

impl From<FormatError> for TokenError {
    fn from(e: FormatError) -> Self {
        TokenError::Format(e.to_string())
    }
}

fn report(operation: &'static str, err: TokenError) -> TokenError {
    warn!(operation, code = err.code(), error = %err, "token operation failed");
    err
}
