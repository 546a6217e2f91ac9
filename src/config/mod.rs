// Configuration module

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::constants::DEFAULT_LOG_LEVEL;
use crate::error::{Error, Result};
use crate::signer::CryptoUrl;

#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignerConfig {
    /// Secret shared with the image service
    pub security_key: String,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is not set (default: info)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output (default: false)
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl SignerConfig {
    pub fn new(security_key: impl Into<String>) -> Self {
        Self {
            security_key: security_key.into(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn from_yaml_with_env(yaml: &str) -> Result<Self> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| Error::Configuration(e.to_string()))?;

        let mut missing = None;
        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                missing.get_or_insert_with(|| var_name.to_string());
                String::new()
            })
        });

        if let Some(var_name) = missing {
            return Err(Error::Configuration(format!(
                "Environment variable '{}' is referenced but not set",
                var_name
            )));
        }

        let config: SignerConfig = serde_yaml::from_str(&substituted)
            .map_err(|e| Error::Configuration(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<()> {
        if self.security_key.is_empty() {
            return Err(Error::Configuration(
                "security_key cannot be empty".to_string(),
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(Error::Configuration(
                "logging.level cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate and build a signer from this configuration
    pub fn build_signer(&self) -> Result<CryptoUrl> {
        self.validate()?;
        CryptoUrl::new(self.security_key.as_bytes())
    }
}

impl fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerConfig")
            .field("security_key", &"<redacted>")
            .field("logging", &self.logging)
            .finish()
    }
}
