//! Hardware device trait definitions.
//!
//! This module defines trait interfaces for the peripherals of a POS
//! terminal: the camera barcode decoder, the receipt printer and the cash
//! drawer. These traits establish the contract between the scanner and
//! peripheral crates and the devices, enabling easy substitution between mock
//! and real hardware implementations.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{DecodedBarcode, DecoderConfig, DeviceInfo, PrintJob};

/// Camera-backed barcode decoder.
///
/// The decoder owns the camera stream: [`start`](Self::start) opens the
/// camera and begins decoding frames, [`stop`](Self::stop) releases it.
/// Decoding itself is opaque; the decoder only reports what it read.
///
/// # Object Safety and Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic parameters, or the enum wrapper in
/// [`devices`](crate::devices) where a concrete type is needed.
///
/// # Examples
///
/// ```no_run
/// use possum_hardware::traits::BarcodeDecoder;
/// use possum_hardware::types::DecoderConfig;
/// use possum_hardware::error::Result;
///
/// async fn scan_one<D: BarcodeDecoder>(decoder: &mut D) -> Result<String> {
///     decoder.start(&DecoderConfig::default()).await?;
///     let detection = decoder.next_detection().await;
///     decoder.stop().await?;
///     Ok(detection?.code)
/// }
/// ```
pub trait BarcodeDecoder: Send + Sync {
    /// Open the camera and start decoding.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Camera access is denied by the host
    /// - No camera matching the constraints exists
    /// - The decoder rejects the configuration
    async fn start(&mut self, config: &DecoderConfig) -> Result<()>;

    /// Stop decoding and release the camera.
    ///
    /// Stopping a decoder that is not running is a no-op. Detections that
    /// were in flight when the decoder stopped are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the camera could not be released cleanly.
    async fn stop(&mut self) -> Result<()>;

    /// Wait for the next detection.
    ///
    /// Implementations must be cancel safe: dropping the future before it
    /// completes must not lose a detection. The scanner service polls this
    /// inside `tokio::select!`.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder is not running or the camera stream
    /// was lost.
    async fn next_detection(&mut self) -> Result<DecodedBarcode>;

    /// Whether the camera stream is currently running.
    fn is_running(&self) -> bool;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if device information cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Receipt print target.
///
/// A target may be page oriented (a print window fed the job's HTML) or a
/// line printer fed the plain-text rendition.
///
/// # Examples
///
/// ```no_run
/// use possum_hardware::traits::ReceiptPrinter;
/// use possum_hardware::types::PrintJob;
/// use possum_hardware::error::Result;
///
/// async fn print_twice<P: ReceiptPrinter>(printer: &mut P, job: &PrintJob) -> Result<()> {
///     printer.print(job).await?;
///     printer.print(job).await
/// }
/// ```
pub trait ReceiptPrinter: Send + Sync {
    /// Submit a job.
    ///
    /// # Errors
    ///
    /// Returns `HardwareError::TargetUnavailable` if the target refused the
    /// job (for instance a blocked print window) and a communication error
    /// if the job could not be delivered.
    async fn print(&mut self, job: &PrintJob) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if device information cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Cash drawer driven through a kick pulse.
pub trait CashDrawer: Send + Sync {
    /// Pulse the drawer solenoid.
    ///
    /// # Errors
    ///
    /// Returns an error if the pulse could not be delivered. Drawers give no
    /// feedback, so success only means the command was written.
    async fn open(&mut self) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if device information cannot be queried.
    async fn get_info(&self) -> Result<DeviceInfo>;
}
