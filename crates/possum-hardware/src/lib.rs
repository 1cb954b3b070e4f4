//! Hardware device abstraction layer for the possum POS runtime.
//!
//! This crate provides trait-based abstractions for the peripherals of a
//! point-of-sale terminal: the camera barcode decoder, the receipt printer and
//! the cash drawer. The traits enable easy substitution between mock
//! implementations (for development and testing) and real devices.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error information.
//!
//! # Device Traits
//!
//! ## Barcode Decoders
//!
//! The [`BarcodeDecoder`] trait owns the camera stream and reports decoded
//! barcodes. Decoding is opaque to the rest of the system:
//!
//! ```no_run
//! use possum_hardware::traits::BarcodeDecoder;
//! use possum_hardware::types::DecoderConfig;
//! use possum_hardware::error::Result;
//!
//! async fn first_code<D: BarcodeDecoder>(decoder: &mut D) -> Result<String> {
//!     decoder.start(&DecoderConfig::default()).await?;
//!     let detection = decoder.next_detection().await?;
//!     decoder.stop().await?;
//!     Ok(detection.code)
//! }
//! ```
//!
//! ## Receipt Printers and Cash Drawers
//!
//! [`ReceiptPrinter`] accepts a [`PrintJob`]; [`CashDrawer`] pulses the drawer
//! solenoid. Serial ESC/POS implementations live in [`serial`], and the
//! [`devices`] enums pick between serial and mock devices at runtime:
//!
//! ```no_run
//! use possum_hardware::devices::AnyCashDrawer;
//! use possum_hardware::traits::CashDrawer;
//! use possum_hardware::types::SerialConfig;
//!
//! # async fn example() -> possum_hardware::Result<()> {
//! let mut drawer = AnyCashDrawer::serial(SerialConfig::new("/dev/ttyUSB0"))?;
//! drawer.open().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type.
//!
//! [`BarcodeDecoder`]: traits::BarcodeDecoder
//! [`ReceiptPrinter`]: traits::ReceiptPrinter
//! [`CashDrawer`]: traits::CashDrawer
//! [`PrintJob`]: types::PrintJob

pub mod devices;
pub mod error;
pub mod escpos;
pub mod mock;
pub mod serial;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::{AnyCashDrawer, AnyReceiptPrinter};
pub use error::{HardwareError, Result};
pub use traits::{BarcodeDecoder, CashDrawer, ReceiptPrinter};
pub use types::{
    CameraConstraints, DecodedBarcode, DecoderConfig, DeviceInfo, FacingMode, PatchSize, PrintJob,
    SerialConfig, Symbology,
};
