//! Serialisation of [`SealedToken`] to and from its three-segment hex form.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Byte length of the per-token nonce.
pub const NONCE_LEN: usize = 16;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// Separator between the nonce, tag, and ciphertext segments.
pub const DELIMITER: char = ':';

const SEGMENTS: usize = 3;

/// Errors produced while parsing an encoded token.
///
/// Messages name the offending segment but never echo its contents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("expected {SEGMENTS} segments, found {0}")]
    SegmentCount(usize),

    #[error("{segment} segment must be {expected} hex characters, found {found}")]
    SegmentLength {
        segment: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("ciphertext segment has an odd number of hex characters")]
    OddLength,

    #[error("{0} segment is not valid hex")]
    InvalidHex(&'static str),
}

/// A nonce, detached authentication tag, and ciphertext.
///
/// The string representation is `<nonce>:<tag>:<ciphertext>`, each segment
/// lower-case hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedToken {
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
    pub ciphertext: Vec<u8>,
}

impl SealedToken {
    /// Encode to the canonical string representation.
    pub fn to_encoded(&self) -> String {
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}",
            hex::encode(self.nonce),
            hex::encode(self.tag),
            hex::encode(&self.ciphertext),
        )
    }

    /// Parse an encoded token.
    ///
    /// Accepts upper- or lower-case hex.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] unless `s` has exactly three segments, the
    /// first two decode to [`NONCE_LEN`] and [`TAG_LEN`] bytes, and the third
    /// is even-length hex.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let parts: Vec<&str> = s.split(DELIMITER).collect();
        if parts.len() != SEGMENTS {
            return Err(FormatError::SegmentCount(parts.len()));
        }

        let nonce = decode_fixed::<NONCE_LEN>(parts[0], "nonce")?;
        let tag = decode_fixed::<TAG_LEN>(parts[1], "tag")?;

        if parts[2].len() % 2 != 0 {
            return Err(FormatError::OddLength);
        }
        let ciphertext =
            hex::decode(parts[2]).map_err(|_| FormatError::InvalidHex("ciphertext"))?;

        Ok(Self {
            nonce,
            tag,
            ciphertext,
        })
    }
}

impl fmt::Display for SealedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_encoded())
    }
}

impl FromStr for SealedToken {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn decode_fixed<const N: usize>(
    segment: &str,
    name: &'static str,
) -> Result<[u8; N], FormatError> {
    if segment.len() != N * 2 {
        return Err(FormatError::SegmentLength {
            segment: name,
            expected: N * 2,
            found: segment.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(segment, &mut out).map_err(|_| FormatError::InvalidHex(name))?;
    Ok(out)
}
