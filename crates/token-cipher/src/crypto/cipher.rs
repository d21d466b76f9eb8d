//! AES-256-GCM sealing and opening of token bytes.
//!
//! **Nonce size:** 16 bytes rather than GCM's usual 12. The GHASH-derived
//! counter block handles this, and it is the size every stored token was
//! written with. A fresh nonce is drawn from the OS CSPRNG on every call;
//! GCM nonce reuse under one key breaks both confidentiality and integrity.

use aes_gcm::{
    aead::{
        consts::U16, generic_array::GenericArray, rand_core::RngCore, AeadInPlace, KeyInit, OsRng,
    },
    aes::Aes256,
    AesGcm,
};
use thiserror::Error;

use super::format::{SealedToken, NONCE_LEN, TAG_LEN};
use crate::kdf::{SymmetricKey, KEY_LEN};

/// AES-256-GCM with a 128-bit nonce and 128-bit tag.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes")]
    InvalidKeyLength,

    /// AES-GCM encryption failed, or the tag did not verify on decryption.
    #[error("aead operation failed")]
    AeadFailure,
}

/// Encrypt `plaintext` under `key` with a fresh random nonce.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] on an internal AEAD error (only
/// reachable for inputs beyond GCM's length limit).
pub fn seal(plaintext: &[u8], key: &SymmetricKey) -> Result<SealedToken, CipherError> {
    let cipher = build_cipher(key.as_bytes())?;

    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce);

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| CipherError::AeadFailure)?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_slice());

    Ok(SealedToken {
        nonce,
        tag: tag_bytes,
        ciphertext: buffer,
    })
}

/// Verify and decrypt a [`SealedToken`].
///
/// The tag is checked before any keystream is applied; on failure nothing
/// but the error is returned.
///
/// # Errors
///
/// Returns [`CipherError::AeadFailure`] if the tag does not verify (wrong key,
/// tampered nonce, tag, or ciphertext).
pub fn open(sealed: &SealedToken, key: &SymmetricKey) -> Result<Vec<u8>, CipherError> {
    let cipher = build_cipher(key.as_bytes())?;

    let mut buffer = sealed.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(&sealed.nonce),
            b"",
            &mut buffer,
            GenericArray::from_slice(&sealed.tag),
        )
        .map_err(|_| CipherError::AeadFailure)?;

    Ok(buffer)
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm16, CipherError> {
    if key.len() != KEY_LEN {
        return Err(CipherError::InvalidKeyLength);
    }
    Aes256Gcm16::new_from_slice(key).map_err(|_| CipherError::InvalidKeyLength)
}
