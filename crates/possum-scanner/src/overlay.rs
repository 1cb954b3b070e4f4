//! Scanner overlay model.
//!
//! The overlay is the full-screen camera view with a single status line. It
//! is plain state here; the host renders it from the scanner snapshot.
//!
//! # Examples
//!
//! ```
//! use possum_scanner::{Overlay, ScanStatus};
//!
//! let mut overlay = Overlay::new();
//! assert!(!overlay.is_visible());
//!
//! overlay.show(ScanStatus::Initializing);
//! assert_eq!(overlay.status_text(), "Initializing camera...");
//!
//! overlay.set_status(ScanStatus::Processing("0001".parse().unwrap()));
//! assert_eq!(overlay.status_text(), "Processing: 0001...");
//! ```

use std::fmt;

use possum_core::Barcode;
use possum_core::constants::{STATUS_CAMERA_ERROR, STATUS_INITIALIZING, STATUS_READY};

/// Longest barcode rendered in the status line.
const MAX_STATUS_CODE_CHARS: usize = 40;

/// What the overlay status line says.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanStatus {
    /// Camera is being opened.
    Initializing,

    /// Camera running, waiting for a label.
    #[default]
    Ready,

    /// Camera could not be opened.
    CameraError,

    /// A repeat of the last code was suppressed.
    AlreadyScanned(Barcode),

    /// A code was forwarded and awaits the server.
    Processing(Barcode),
}

impl ScanStatus {
    /// Whether the status reports a code still waiting on the server.
    pub fn is_processing(&self) -> bool {
        matches!(self, ScanStatus::Processing(_))
    }
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStatus::Initializing => f.write_str(STATUS_INITIALIZING),
            ScanStatus::Ready => f.write_str(STATUS_READY),
            ScanStatus::CameraError => f.write_str(STATUS_CAMERA_ERROR),
            ScanStatus::AlreadyScanned(code) => {
                write!(f, "Already scanned: {}", truncate_code(code))
            }
            ScanStatus::Processing(code) => write!(f, "Processing: {}...", truncate_code(code)),
        }
    }
}

/// Overlay visibility and status line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overlay {
    visible: bool,
    status: ScanStatus,
}

impl Overlay {
    /// Hidden overlay with the default prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the overlay visible with `status`.
    pub fn show(&mut self, status: ScanStatus) {
        self.visible = true;
        self.status = status;
    }

    /// Hide the overlay. The status line is kept until the next `show`.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn set_status(&mut self, status: ScanStatus) {
        self.status = status;
    }

    /// Put the default prompt back.
    pub fn reset_status(&mut self) {
        self.status = ScanStatus::Ready;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn status(&self) -> &ScanStatus {
        &self.status
    }

    pub fn status_text(&self) -> String {
        self.status.to_string()
    }
}

fn truncate_code(code: &Barcode) -> &str {
    let text = code.as_str();
    // Barcodes are ASCII, so byte and char offsets agree
    &text[..text.len().min(MAX_STATUS_CODE_CHARS)]
}
