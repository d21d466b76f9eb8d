//! AES-256-GCM token encryption primitives.
//!
//! This module knows nothing about configuration or logging. It provides the
//! low-level seal/open operations and the textual token format used by
//! [`crate::service::TokenCipher`].
//!
//! # Encoded token format
//!
//! ```text
//! <hex(nonce, 16 bytes)>:<hex(tag, 16 bytes)>:<hex(ciphertext)>
//! ```
//!
//! The format is persisted by callers and must stay stable so that tokens
//! written by earlier releases remain decryptable.

pub mod cipher;
pub mod format;

pub use cipher::{open, seal, CipherError};
pub use format::{FormatError, SealedToken, NONCE_LEN, TAG_LEN};
