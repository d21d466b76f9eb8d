//! Configuration loading and validation for the token cipher.
//!
//! Values are read from environment variables once at startup by whatever
//! process embeds this crate. The key-derivation secret never appears in
//! `Debug` output.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated token cipher configuration.
#[derive(Clone, Deserialize)]
pub struct CipherConfig {
    /// Secret the token key is derived from (`TOKEN_ENCRYPTION_SECRET`).
    #[serde(default)]
    pub token_encryption_secret: Option<String>,

    /// Permit the built-in development secret when no secret is configured.
    /// Never enable in production.
    #[serde(default)]
    pub allow_insecure_default_secret: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl CipherConfig {
    /// Load and validate configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        Self::load(config::Environment::default())
    }

    /// Load and validate configuration from an explicit variable map, keyed
    /// the same way as the environment (e.g. `"TOKEN_ENCRYPTION_SECRET"`).
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or fails validation.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::load(config::Environment::default().source(Some(vars)))
    }

    fn load(source: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(source)
            .build()
            .context("failed to build token cipher configuration")?;

        let mut c: CipherConfig = cfg
            .try_deserialize()
            .context("failed to deserialise token cipher configuration")?;

        // A blank secret counts as unset.
        if c.secret().is_none() {
            c.token_encryption_secret = None;
        }

        c.validate()?;
        Ok(c)
    }

    /// The configured secret, if any. Empty or whitespace-only values are
    /// treated as not configured.
    pub fn secret(&self) -> Option<&str> {
        self.token_encryption_secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn for_tests(secret: Option<&str>, allow_insecure_default_secret: bool) -> Self {
        Self {
            token_encryption_secret: secret.map(str::to_owned),
            allow_insecure_default_secret,
            log_level: default_log_level(),
        }
    }
}

impl std::fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherConfig")
            .field(
                "token_encryption_secret",
                &self.token_encryption_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "allow_insecure_default_secret",
                &self.allow_insecure_default_secret,
            )
            .field("log_level", &self.log_level)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_are_correct() {
        let cfg = CipherConfig::from_vars(HashMap::new()).unwrap();
        assert!(cfg.secret().is_none());
        assert!(!cfg.allow_insecure_default_secret);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn reads_all_variables() {
        let cfg = CipherConfig::from_vars(vars(&[
            ("TOKEN_ENCRYPTION_SECRET", "s3cret"),
            ("ALLOW_INSECURE_DEFAULT_SECRET", "true"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();
        assert_eq!(cfg.secret(), Some("s3cret"));
        assert!(cfg.allow_insecure_default_secret);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn blank_secret_is_treated_as_unset() {
        for blank in ["", "   "] {
            let cfg = CipherConfig::from_vars(vars(&[
                ("TOKEN_ENCRYPTION_SECRET", blank),
                ("ALLOW_INSECURE_DEFAULT_SECRET", "true"),
            ]))
            .unwrap();
            assert!(cfg.secret().is_none());
            assert!(cfg.token_encryption_secret.is_none());
            assert!(cfg.allow_insecure_default_secret);
        }
    }

    #[test]
    fn validate_rejects_empty_log_level() {
        let mut cfg = CipherConfig::for_tests(Some("s3cret"), false);
        cfg.log_level = String::new();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_missing_secret() {
        assert!(CipherConfig::for_tests(None, false).validate().is_ok());
    }

    #[test]
    fn secret_redacted_in_debug() {
        let cfg = CipherConfig::for_tests(Some("hunter2"), false);
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("REDACTED"));
    }
}
