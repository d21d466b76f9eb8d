//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No token, encoded value, or key material** may appear in any span
//!   attribute or log field.
//! - Log level comes from `LOG_LEVEL` (default: `info`); `RUST_LOG` overrides it.

pub mod init;

pub use init::init;
