//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT - Rust Edition 2024) are not object-safe,
//! so `Box<dyn CashDrawer>` is not available. The peripheral actions choose a
//! device at runtime from configuration (serial when a port is configured,
//! mock in development), so they hold these enums instead.
//!
//! # Examples
//!
//! ```
//! use possum_hardware::devices::AnyCashDrawer;
//! use possum_hardware::mock::MockCashDrawer;
//!
//! let (drawer, _handle) = MockCashDrawer::new();
//! let any_drawer = AnyCashDrawer::Mock(drawer);
//! ```

use crate::mock::{MockCashDrawer, MockPrinter};
use crate::serial::{SerialCashDrawer, SerialLink, SerialReceiptPrinter};
use crate::traits::{CashDrawer, ReceiptPrinter};
use crate::types::{DeviceInfo, PrintJob, SerialConfig};
use crate::Result;

/// Enum wrapper for receipt printer dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyReceiptPrinter {
    /// Mock printer for development and testing.
    Mock(MockPrinter),

    /// ESC/POS line printer on a serial port.
    Serial(SerialReceiptPrinter),
}

impl AnyReceiptPrinter {
    /// Serial printer on the configured port.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::ConfigurationError` for an invalid config.
    pub fn serial(config: SerialConfig) -> Result<Self> {
        Ok(Self::Serial(SerialReceiptPrinter::new(SerialLink::new(
            config,
        )?)))
    }
}

impl ReceiptPrinter for AnyReceiptPrinter {
    async fn print(&mut self, job: &PrintJob) -> Result<()> {
        match self {
            Self::Mock(device) => device.print(job).await,
            Self::Serial(device) => device.print(job).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
            Self::Serial(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for cash drawer dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyCashDrawer {
    /// Mock drawer for development and testing.
    Mock(MockCashDrawer),

    /// Drawer kicked through an ESC/POS printer on a serial port.
    Serial(SerialCashDrawer),
}

impl AnyCashDrawer {
    /// Serial drawer on the configured port.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::ConfigurationError` for an invalid config.
    pub fn serial(config: SerialConfig) -> Result<Self> {
        Ok(Self::Serial(SerialCashDrawer::new(SerialLink::new(config)?)))
    }
}

impl CashDrawer for AnyCashDrawer {
    async fn open(&mut self) -> Result<()> {
        match self {
            Self::Mock(device) => device.open().await,
            Self::Serial(device) => device.open().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
            Self::Serial(device) => device.get_info().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_printer_mock() {
        let (printer, _handle) = MockPrinter::new();
        let any_printer = AnyReceiptPrinter::Mock(printer);

        let info = any_printer.get_info().await.unwrap();
        assert_eq!(info.name, "Mock Printer");
    }

    #[tokio::test]
    async fn test_any_drawer_mock() {
        let (drawer, handle) = MockCashDrawer::new();
        let mut any_drawer = AnyCashDrawer::Mock(drawer);

        any_drawer.open().await.unwrap();
        assert_eq!(handle.open_count(), 1);
    }

    #[tokio::test]
    async fn test_any_drawer_serial_info() {
        let drawer = AnyCashDrawer::serial(SerialConfig::new("/dev/ttyS0")).unwrap();
        let info = drawer.get_info().await.unwrap();
        assert_eq!(info.name, "Cash drawer on /dev/ttyS0");
    }

    #[test]
    fn test_serial_constructors_validate() {
        assert!(AnyCashDrawer::serial(SerialConfig::default()).is_err());
        assert!(AnyReceiptPrinter::serial(SerialConfig::default()).is_err());
    }
}
