//! Scanner configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use possum_core::constants::{DEFAULT_SAFETY_TIMEOUT_MS, DEFAULT_SCAN_COOLDOWN_MS};
use possum_core::{Error, Result};
use possum_hardware::DecoderConfig;

/// Settings for one scanner service.
///
/// Missing fields take their defaults, so `{}` is a valid configuration.
///
/// # Examples
///
/// ```
/// use possum_scanner::ScannerConfig;
/// use std::time::Duration;
///
/// let config = ScannerConfig::from_json(r#"{"safety_timeout_ms": 8000}"#).unwrap();
/// assert_eq!(config.safety_timeout(), Duration::from_secs(8));
/// assert_eq!(config.cooldown(), Duration::from_secs(3));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Duplicate-suppression window for identical codes.
    pub cooldown_ms: u64,

    /// Wait for the server acknowledgement before closing the session.
    pub safety_timeout_ms: u64,

    /// Settings passed to the decoder on camera start.
    pub decoder: DecoderConfig,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_SCAN_COOLDOWN_MS,
            safety_timeout_ms: DEFAULT_SAFETY_TIMEOUT_MS,
            decoder: DecoderConfig::default(),
        }
    }
}

impl ScannerConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed JSON and `Error::Config` when
    /// [`validate`](Self::validate) fails.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Error::Config` for a zero safety timeout or an invalid
    /// decoder configuration.
    pub fn validate(&self) -> Result<()> {
        if self.safety_timeout_ms == 0 {
            return Err(Error::Config("safety_timeout_ms must be positive".into()));
        }
        self.decoder
            .validate()
            .map_err(|e| Error::Config(e.to_string()))
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn safety_timeout(&self) -> Duration {
        Duration::from_millis(self.safety_timeout_ms)
    }
}
