//! `token-cipher` — authenticated encryption of bearer tokens at rest.
//!
//! A caller builds one [`TokenCipher`] at startup and shares it:
//!
//! 1. Load [`CipherConfig`] from the environment.
//! 2. Optionally install logging with [`telemetry::init`].
//! 3. [`TokenCipher::from_config`] derives the 256-bit key (scrypt).
//! 4. [`TokenCipher::encrypt`] / [`TokenCipher::decrypt`] convert between a
//!    token and the `<nonce>:<tag>:<ciphertext>` hex string callers persist.
//!
//! ```no_run
//! use token_cipher::{CipherConfig, TokenCipher};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = CipherConfig::from_env()?;
//! token_cipher::telemetry::init(&cfg.log_level)?;
//! let cipher = TokenCipher::from_config(&cfg)?;
//!
//! let stored = cipher.encrypt("ghp_abc123")?;
//! assert_eq!(cipher.decrypt(&stored)?, "ghp_abc123");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod crypto;
pub mod kdf;
pub mod service;
pub mod telemetry;

pub use common::{ErrorKind, TokenError};
pub use config::CipherConfig;
pub use kdf::{derive_key, SymmetricKey};
pub use service::TokenCipher;
