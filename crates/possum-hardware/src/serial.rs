//! Serial-port ESC/POS devices.
//!
//! Receipt printers and the drawers chained behind them are usually reached
//! through a USB-serial adapter. The port is opened per job and closed
//! afterwards so a printer unplugged between jobs is detected on the next
//! job rather than by a stale handle.
//!
//! `serialport` is blocking; every write runs on the blocking thread pool.

use std::io::{self, Write};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::{HardwareError, Result};
use crate::escpos::{self, EscPosBuilder};
use crate::traits::{CashDrawer, ReceiptPrinter};
use crate::types::{DeviceInfo, PrintJob, SerialConfig};

/// Lines fed before cutting so the last printed line clears the cutter.
const FEED_BEFORE_CUT: u8 = 4;

/// One-shot writer for a serial port.
#[derive(Debug, Clone)]
pub struct SerialLink {
    config: SerialConfig,
}

impl SerialLink {
    /// Create a link after validating the configuration.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::ConfigurationError` for an invalid config.
    pub fn new(config: SerialConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    /// Open the port, write `data` and close it.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::Timeout` if the port does not respond within
    /// the configured timeout, `HardwareError::Serial` if the port cannot be
    /// opened and `HardwareError::Io` if the write fails.
    pub async fn write(&self, data: Bytes) -> Result<()> {
        let config = self.config.clone();
        debug!(port = %config.port, bytes = data.len(), "Writing to serial port");

        tokio::task::spawn_blocking(move || -> Result<()> {
            let timeout_ms = config.timeout_ms;
            let mut port = serialport::new(&config.port, config.baud_rate)
                .timeout(config.timeout())
                .open()
                .map_err(|e| open_error(e, timeout_ms))?;
            port.write_all(&data)
                .and_then(|()| port.flush())
                .map_err(|e| write_error(e, timeout_ms))
        })
        .await
        .map_err(|e| HardwareError::other(format!("serial write task failed: {e}")))?
    }
}

fn open_error(err: serialport::Error, timeout_ms: u64) -> HardwareError {
    match err.kind() {
        serialport::ErrorKind::Io(io::ErrorKind::TimedOut) => HardwareError::timeout(timeout_ms),
        _ => HardwareError::Serial(err),
    }
}

fn write_error(err: io::Error, timeout_ms: u64) -> HardwareError {
    match err.kind() {
        io::ErrorKind::TimedOut => HardwareError::timeout(timeout_ms),
        _ => HardwareError::Io(err),
    }
}

/// Cash drawer kicked through the printer's drawer connector.
#[derive(Debug, Clone)]
pub struct SerialCashDrawer {
    link: SerialLink,
}

impl SerialCashDrawer {
    pub fn new(link: SerialLink) -> Self {
        Self { link }
    }
}

impl CashDrawer for SerialCashDrawer {
    async fn open(&mut self) -> Result<()> {
        self.link
            .write(escpos::drawer_kick_sequence())
            .await
            .inspect_err(|e| warn!(port = %self.link.config.port, error = %e, "Drawer kick failed"))
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(
            format!("Cash drawer on {}", self.link.config.port),
            "ESC/POS drawer kick",
        ))
    }
}

/// Line printer fed the plain-text rendition of a job.
#[derive(Debug, Clone)]
pub struct SerialReceiptPrinter {
    link: SerialLink,
}

impl SerialReceiptPrinter {
    pub fn new(link: SerialLink) -> Self {
        Self { link }
    }

    /// ESC/POS stream for a job: text lines, feed, cut.
    pub fn encode(job: &PrintJob) -> Bytes {
        job.text
            .lines()
            .fold(EscPosBuilder::new(), |builder, line| builder.line(line))
            .feed(FEED_BEFORE_CUT)
            .cut()
            .build()
    }
}

impl ReceiptPrinter for SerialReceiptPrinter {
    async fn print(&mut self, job: &PrintJob) -> Result<()> {
        if job.text.trim().is_empty() {
            return Err(HardwareError::invalid_data("print job has no text"));
        }
        self.link.write(Self::encode(job)).await
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(
            format!("Receipt printer on {}", self.link.config.port),
            "ESC/POS line printer",
        ))
    }
}
