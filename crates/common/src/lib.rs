//! Error types shared between `token-cipher` and the code that stores or
//! forwards the strings it produces.

pub mod error;

pub use error::{ErrorKind, TokenError};
