//! Core constants for the POS scanning and peripheral runtime.
//!
//! Timing defaults, barcode limits, user-facing status texts and the wire
//! names of server events live here so every crate in the workspace agrees on
//! them.
//!
//! # Usage
//!
//! ```
//! use possum_core::constants::*;
//! use std::time::Duration;
//!
//! let cooldown = Duration::from_millis(DEFAULT_SCAN_COOLDOWN_MS);
//! assert_eq!(cooldown.as_secs(), 3);
//! ```

// ============================================================================
// Scan timing
// ============================================================================

/// Window during which a repeated identical barcode is suppressed.
///
/// A camera pointed at one product keeps decoding the same code several
/// times per second; only the first detection inside this window is forwarded.
pub const DEFAULT_SCAN_COOLDOWN_MS: u64 = 3_000;

/// Bounded wait for the server acknowledgement after an accepted scan.
///
/// When it elapses the session is closed even if the server never replied.
pub const DEFAULT_SAFETY_TIMEOUT_MS: u64 = 5_000;

/// Length of the haptic pulse requested when a scan is accepted.
pub const HAPTIC_PULSE_MS: u64 = 100;

/// Number of session transitions kept for diagnostics.
pub const MAX_SESSION_HISTORY: usize = 100;

// ============================================================================
// Barcode limits
// ============================================================================

/// Minimum barcode length after trimming.
pub const MIN_BARCODE_LENGTH: usize = 1;

/// Maximum barcode length accepted from a decoder.
///
/// Code 128 symbols on retail labels stay well below this; longer decodes are
/// almost always misreads.
pub const MAX_BARCODE_LENGTH: usize = 128;

/// GS1 group separator (ASCII GS) between variable-length element strings of
/// a GS1-128 symbol. The only control character a barcode may contain.
pub const GS1_SEPARATOR: char = '\u{1d}';

// ============================================================================
// Overlay status texts
// ============================================================================

/// Prompt shown while the camera is running and waiting for a barcode.
pub const STATUS_READY: &str = "Point camera at product barcode";

/// Status shown while the camera is being initialized.
pub const STATUS_INITIALIZING: &str = "Initializing camera...";

/// Status shown when the camera could not be opened.
pub const STATUS_CAMERA_ERROR: &str = "Camera access error. Please allow camera access.";

// ============================================================================
// Server events
// ============================================================================

/// Outbound event sent once per accepted scan.
pub const EVENT_BARCODE_SCANNED: &str = "barcode_scanned";

/// Inbound event confirming the server processed the scan.
pub const EVENT_SCAN_SUCCESS: &str = "scan_success";

/// Inbound event requesting a receipt print.
pub const EVENT_PRINT_RECEIPT: &str = "print_receipt";

/// Inbound event requesting the cash drawer to open.
pub const EVENT_OPEN_CASH_DRAWER: &str = "open_cash_drawer";

// ============================================================================
// Currency
// ============================================================================

/// Currency symbol used in chart tooltips and receipts.
pub const CURRENCY_SYMBOL: &str = "KSh";
