//! Peripheral configuration.

use serde::{Deserialize, Serialize};

use possum_core::{Error, Result};
use possum_hardware::{AnyCashDrawer, AnyReceiptPrinter, SerialConfig};

/// Serial devices attached to the terminal.
///
/// Both are optional: without a drawer port the drawer action notifies the
/// cashier instead, and without a printer port the host's printer is used.
///
/// # Examples
///
/// ```
/// use possum_peripherals::PeripheralConfig;
///
/// let config = PeripheralConfig::from_json(
///     r#"{"cash_drawer": {"port": "/dev/ttyUSB0", "baud_rate": 19200}}"#,
/// ).unwrap();
///
/// assert_eq!(config.cash_drawer.unwrap().timeout_ms, 1000);
/// assert!(config.printer.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PeripheralConfig {
    pub cash_drawer: Option<SerialConfig>,
    pub printer: Option<SerialConfig>,
}

impl PeripheralConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Json` for malformed JSON and `Error::Config` for an
    /// invalid serial section.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Error::Config` naming the first invalid serial section.
    pub fn validate(&self) -> Result<()> {
        for (name, section) in [("cash_drawer", &self.cash_drawer), ("printer", &self.printer)] {
            if let Some(serial) = section {
                serial
                    .validate()
                    .map_err(|e| Error::Config(format!("{name}: {e}")))?;
            }
        }
        Ok(())
    }

    /// The configured serial drawer, if any.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an invalid serial section.
    pub fn cash_drawer(&self) -> Result<Option<AnyCashDrawer>> {
        self.cash_drawer
            .clone()
            .map(AnyCashDrawer::serial)
            .transpose()
            .map_err(|e| Error::Config(format!("cash_drawer: {e}")))
    }

    /// The configured serial line printer, if any.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for an invalid serial section.
    pub fn receipt_printer(&self) -> Result<Option<AnyReceiptPrinter>> {
        self.printer
            .clone()
            .map(AnyReceiptPrinter::serial)
            .transpose()
            .map_err(|e| Error::Config(format!("printer: {e}")))
    }
}
