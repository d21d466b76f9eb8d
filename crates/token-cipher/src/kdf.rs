//! Key derivation: configured secret → 256-bit [`SymmetricKey`].
//!
//! Derivation is deterministic. Tokens written by an earlier process run are
//! only readable if the same secret yields the same key, so there is no random
//! salt and nothing is persisted.
//!
//! # Security invariants
//!
//! - Key bytes are never logged, printed, or written anywhere.
//! - The key buffer is zeroed when the last owner drops it.

use common::TokenError;
use scrypt::Params;
use tracing::{info, warn};
use zeroize::Zeroize;

use crate::config::CipherConfig;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Fixed scrypt salt. It is a domain-separation constant, not a secret.
///
/// Every stored token was written under a key derived with this value;
/// changing it makes all of them undecryptable.
pub const DOMAIN_SALT: &[u8] = b"salt";

/// scrypt CPU/memory cost, as log2(N). N = 16384.
pub const SCRYPT_LOG_N: u8 = 14;
/// scrypt block size.
pub const SCRYPT_R: u32 = 8;
/// scrypt parallelism.
pub const SCRYPT_P: u32 = 1;

/// Secret used only when `ALLOW_INSECURE_DEFAULT_SECRET` is switched on.
pub const INSECURE_DEFAULT_SECRET: &str = "insecure-development-token-secret";

/// Fixed-size symmetric key for the token cipher.
///
/// Construct with [`derive_key`] or [`SymmetricKey::from_bytes`]. Not `Clone`;
/// share it behind an `Arc`.
pub struct SymmetricKey(Box<[u8; KEY_LEN]>);

impl SymmetricKey {
    /// Wrap externally managed key material.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Configuration`] if `bytes` is not [`KEY_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        if bytes.len() != KEY_LEN {
            return Err(TokenError::Configuration(format!(
                "key must be {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.0.as_mut_slice().zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Derive the token key from `secret` with scrypt over [`DOMAIN_SALT`].
///
/// # Errors
///
/// Returns [`TokenError::Configuration`] if `secret` is empty.
pub fn derive_key(secret: &str) -> Result<SymmetricKey, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::Configuration(
            "key-derivation secret must not be empty".into(),
        ));
    }
    derive_with(secret.as_bytes(), DOMAIN_SALT, SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P)
}

/// Derive the token key from loaded configuration.
///
/// Falls back to [`INSECURE_DEFAULT_SECRET`] only when the configuration opts
/// in, and logs a warning every time it does.
///
/// # Errors
///
/// Returns [`TokenError::Configuration`] when no secret is configured and the
/// insecure default is not allowed.
pub fn derive_from_config(cfg: &CipherConfig) -> Result<SymmetricKey, TokenError> {
    match cfg.secret() {
        Some(secret) => {
            let key = derive_key(secret)?;
            info!("token key derived from configured secret");
            Ok(key)
        }
        None if cfg.allow_insecure_default_secret => {
            warn!(
                insecure_default_secret = true,
                "TOKEN_ENCRYPTION_SECRET is not set; deriving the token key from the \
                 built-in development secret. Stored tokens are NOT protected."
            );
            derive_key(INSECURE_DEFAULT_SECRET)
        }
        None => Err(TokenError::Configuration(
            "TOKEN_ENCRYPTION_SECRET is not set and ALLOW_INSECURE_DEFAULT_SECRET is false"
                .into(),
        )),
    }
}

fn derive_with(
    secret: &[u8],
    salt: &[u8],
    log_n: u8,
    r: u32,
    p: u32,
) -> Result<SymmetricKey, TokenError> {
    let params = Params::new(log_n, r, p, KEY_LEN)
        .map_err(|e| TokenError::Internal(format!("invalid scrypt parameters: {e}")))?;

    let mut output = [0u8; KEY_LEN];
    scrypt::scrypt(secret, salt, &params, &mut output)
        .map_err(|e| TokenError::Internal(format!("scrypt derivation failed: {e}")))?;

    let key = SymmetricKey::from_bytes(&output);
    output.zeroize();
    key
}

#[cfg(test)]
mod tests {
    use common::ErrorKind;

    use super::*;

    #[test]
    fn rfc7914_vector() {
        // scrypt("password", "NaCl", N=1024, r=8, p=16); PBKDF2 output blocks are
        // independent, so a 32-byte request yields the first half of the 64-byte vector.
        let key = derive_with(b"password", b"NaCl", 10, 8, 16).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162"
        );
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = derive_key("correct horse battery staple").unwrap();
        let b = derive_key("correct horse battery staple").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.as_bytes().len(), KEY_LEN);
    }

    #[test]
    fn different_secrets_give_different_keys() {
        let a = derive_key("secret-one").unwrap();
        let b = derive_key("secret-two").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn empty_secret_rejected() {
        let err = derive_key("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn from_bytes_rejects_wrong_length() {
        let err = SymmetricKey::from_bytes(&[0u8; 16]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(SymmetricKey::from_bytes(&[0u8; KEY_LEN]).is_ok());
    }

    #[test]
    fn missing_secret_fails_without_opt_in() {
        let cfg = CipherConfig::for_tests(None, false);
        let err = derive_from_config(&cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn missing_secret_uses_default_with_opt_in() {
        let cfg = CipherConfig::for_tests(None, true);
        let key = derive_from_config(&cfg).unwrap();
        let expected = derive_key(INSECURE_DEFAULT_SECRET).unwrap();
        assert_eq!(key.as_bytes(), expected.as_bytes());
    }

    #[test]
    fn blank_secret_falls_back_to_default_with_opt_in() {
        let vars = [
            ("TOKEN_ENCRYPTION_SECRET".to_string(), String::new()),
            ("ALLOW_INSECURE_DEFAULT_SECRET".to_string(), "true".to_string()),
        ]
        .into_iter()
        .collect();
        let cfg = CipherConfig::from_vars(vars).unwrap();
        let key = derive_from_config(&cfg).unwrap();
        let expected = derive_key(INSECURE_DEFAULT_SECRET).unwrap();
        assert_eq!(key.as_bytes(), expected.as_bytes());
    }

    #[test]
    fn blank_secret_fails_without_opt_in() {
        let cfg = CipherConfig::for_tests(Some("  "), false);
        let err = derive_from_config(&cfg).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn key_redacted_in_debug() {
        let key = SymmetricKey::from_bytes(&[0xAB; KEY_LEN]).unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("171"));
    }
}
