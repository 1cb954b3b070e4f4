//! Common types shared across hardware device implementations.
//!
//! This module defines device metadata, decoder detections and settings,
//! print jobs and serial link configuration.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{HardwareError, Result};

/// Generic device information.
///
/// Contains metadata about a hardware device such as name, model,
/// serial number, and firmware version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "Rear camera", "TM-T20II").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional device serial number.
    pub serial_number: Option<String>,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            serial_number: None,
            firmware_version: None,
        }
    }

    /// Set the serial number.
    pub fn with_serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Barcode symbology reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Symbology {
    Ean13,
    Ean8,
    Code128,
    Code39,
    UpcA,
    UpcE,
}

impl Symbology {
    /// All symbologies a retail decoder is configured for by default.
    pub const RETAIL: [Symbology; 6] = [
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::Code128,
        Symbology::Code39,
        Symbology::UpcA,
        Symbology::UpcE,
    ];
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::Code128 => "Code 128",
            Symbology::Code39 => "Code 39",
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
        };
        f.write_str(name)
    }
}

/// A single detection emitted by a barcode decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBarcode {
    /// Raw decoded text, not yet validated.
    pub code: String,

    /// Symbology the decoder matched.
    pub symbology: Symbology,

    /// Wall-clock time of the detection.
    pub detected_at: DateTime<Utc>,
}

impl DecodedBarcode {
    /// Create a detection stamped with the current time.
    pub fn new(code: impl Into<String>, symbology: Symbology) -> Self {
        Self {
            code: code.into(),
            symbology,
            detected_at: Utc::now(),
        }
    }

    /// Override the detection timestamp.
    pub fn with_timestamp(mut self, detected_at: DateTime<Utc>) -> Self {
        self.detected_at = detected_at;
        self
    }
}

/// Which camera the decoder should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingMode {
    /// Rear camera, pointed away from the operator.
    Environment,
    /// Front camera.
    User,
}

/// Size of the image patches used by the barcode locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchSize {
    XSmall,
    Small,
    Medium,
    Large,
    XLarge,
}

/// Camera stream constraints requested from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConstraints {
    pub facing_mode: FacingMode,
    pub min_width: u32,
    pub min_height: u32,
    pub min_aspect_ratio: f32,
    pub max_aspect_ratio: f32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            min_width: 640,
            min_height: 480,
            min_aspect_ratio: 1.0,
            max_aspect_ratio: 2.0,
        }
    }
}

/// Settings handed to the decoder when the camera starts.
///
/// The defaults match a handheld rear camera scanning retail labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub camera: CameraConstraints,

    /// Locator patch size.
    pub patch_size: PatchSize,

    /// Downsample frames by two before locating.
    pub half_sample: bool,

    /// Decoder worker threads.
    pub workers: u8,

    /// Maximum frames decoded per second.
    pub frequency: u8,

    /// Enabled symbologies.
    pub readers: Vec<Symbology>,

    /// Run the locator instead of decoding the frame center only.
    pub locate: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            camera: CameraConstraints::default(),
            patch_size: PatchSize::Medium,
            half_sample: true,
            workers: 2,
            frequency: 10,
            readers: Symbology::RETAIL.to_vec(),
            locate: true,
        }
    }
}

impl DecoderConfig {
    /// Check the settings for values no decoder can honor.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::ConfigurationError` when no reader is enabled,
    /// the frequency is zero or the aspect ratio bounds are inverted.
    pub fn validate(&self) -> Result<()> {
        if self.readers.is_empty() {
            return Err(HardwareError::configuration(
                "at least one barcode reader must be enabled",
            ));
        }
        if self.frequency == 0 {
            return Err(HardwareError::configuration("frequency must be positive"));
        }
        if self.camera.min_aspect_ratio > self.camera.max_aspect_ratio {
            return Err(HardwareError::configuration(format!(
                "aspect ratio range {}..{} is inverted",
                self.camera.min_aspect_ratio, self.camera.max_aspect_ratio
            )));
        }
        Ok(())
    }
}

/// A document ready for a print target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    /// Window/job title.
    pub title: String,

    /// Complete HTML page for page-oriented targets.
    pub html: String,

    /// Plain-text rendition for line printers.
    pub text: String,
}

/// Serial link settings for ESC/POS devices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port path, e.g. `/dev/ttyUSB0` or `COM3`.
    pub port: String,

    /// Baud rate.
    pub baud_rate: u32,

    /// Read/write timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 9600,
            timeout_ms: 1000,
        }
    }
}

impl SerialConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// # Errors
    ///
    /// Returns `HardwareError::ConfigurationError` for an empty port or a
    /// zero baud rate.
    pub fn validate(&self) -> Result<()> {
        if self.port.trim().is_empty() {
            return Err(HardwareError::configuration("serial port path is empty"));
        }
        if self.baud_rate == 0 {
            return Err(HardwareError::configuration("baud rate must be positive"));
        }
        Ok(())
    }
}
