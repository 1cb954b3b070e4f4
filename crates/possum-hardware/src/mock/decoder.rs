//! Mock barcode decoder for testing and development.
//!
//! This module provides a simulated camera decoder that can be controlled
//! programmatically for testing without requiring a camera.

use crate::{
    HardwareError, Result,
    traits::BarcodeDecoder,
    types::{DecodedBarcode, DecoderConfig, DeviceInfo, Symbology},
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// Shared counters observed through the handle.
#[derive(Debug, Default)]
struct DecoderState {
    running: AtomicBool,
    deny_access: AtomicBool,
    start_count: AtomicUsize,
    stop_count: AtomicUsize,
}

/// Mock barcode decoder for testing and development.
///
/// Detections are injected through a [`MockDecoderHandle`]. Camera access
/// can be denied to exercise the failure path.
///
/// # Examples
///
/// ```
/// use possum_hardware::mock::MockDecoder;
/// use possum_hardware::traits::BarcodeDecoder;
/// use possum_hardware::types::DecoderConfig;
///
/// #[tokio::main]
/// async fn main() -> possum_hardware::Result<()> {
///     let (mut decoder, handle) = MockDecoder::new();
///
///     decoder.start(&DecoderConfig::default()).await?;
///     handle.present("5901234123457").await?;
///
///     let detection = decoder.next_detection().await?;
///     assert_eq!(detection.code, "5901234123457");
///
///     decoder.stop().await?;
///     assert_eq!(handle.stop_count(), 1);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockDecoder {
    /// Channel receiver for simulated detections
    detection_rx: mpsc::Receiver<DecodedBarcode>,

    /// Device name
    name: String,

    state: Arc<DecoderState>,
}

impl MockDecoder {
    /// Create a new mock decoder with the default name.
    pub fn new() -> (Self, MockDecoderHandle) {
        Self::with_name("Mock Camera Decoder".to_string())
    }

    /// Create a new mock decoder with a custom name.
    pub fn with_name(name: String) -> (Self, MockDecoderHandle) {
        let (detection_tx, detection_rx) = mpsc::channel(32);
        let state = Arc::new(DecoderState::default());

        let decoder = Self {
            detection_rx,
            name: name.clone(),
            state: Arc::clone(&state),
        };

        let handle = MockDecoderHandle {
            detection_tx,
            name,
            state,
        };

        (decoder, handle)
    }

    fn discard_pending(&mut self) {
        while self.detection_rx.try_recv().is_ok() {}
    }
}

impl Default for MockDecoder {
    fn default() -> Self {
        Self::new().0
    }
}

impl BarcodeDecoder for MockDecoder {
    async fn start(&mut self, config: &DecoderConfig) -> Result<()> {
        config.validate()?;
        self.state.start_count.fetch_add(1, Ordering::SeqCst);

        if self.state.deny_access.load(Ordering::SeqCst) {
            return Err(HardwareError::permission_denied(self.name.clone()));
        }

        // Frames presented while the camera was off never reach the decoder
        self.discard_pending();
        self.state.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if self.state.running.swap(false, Ordering::SeqCst) {
            self.state.stop_count.fetch_add(1, Ordering::SeqCst);
        }
        self.discard_pending();
        Ok(())
    }

    async fn next_detection(&mut self) -> Result<DecodedBarcode> {
        if !self.state.running.load(Ordering::SeqCst) {
            return Err(HardwareError::not_running(self.name.clone()));
        }

        self.detection_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("Decoder detection channel closed"))
    }

    fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Decoder v1.0").with_firmware_version("1.0.0"))
    }
}

/// Handle for controlling a mock decoder.
///
/// Cloneable; every clone drives the same decoder.
#[derive(Debug, Clone)]
pub struct MockDecoderHandle {
    /// Channel sender for simulated detections
    detection_tx: mpsc::Sender<DecodedBarcode>,

    /// Device name
    name: String,

    state: Arc<DecoderState>,
}

impl MockDecoderHandle {
    /// Present an EAN-13 barcode to the camera.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder has been dropped.
    pub async fn present(&self, code: &str) -> Result<()> {
        self.present_with(code, Symbology::Ean13).await
    }

    /// Present a barcode of a specific symbology.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder has been dropped.
    pub async fn present_with(&self, code: &str, symbology: Symbology) -> Result<()> {
        self.send(DecodedBarcode::new(code, symbology)).await
    }

    /// Inject a prepared detection.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder has been dropped.
    pub async fn send(&self, detection: DecodedBarcode) -> Result<()> {
        self.detection_tx
            .send(detection)
            .await
            .map_err(|_| HardwareError::disconnected("Decoder detection channel closed"))
    }

    /// Make subsequent `start` calls fail as if camera permission was refused.
    pub fn deny_camera_access(&self, deny: bool) {
        self.state.deny_access.store(deny, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::SeqCst)
    }

    /// Number of `start` attempts, successful or not.
    pub fn start_count(&self) -> usize {
        self.state.start_count.load(Ordering::SeqCst)
    }

    /// Number of times a running camera was stopped.
    pub fn stop_count(&self) -> usize {
        self.state.stop_count.load(Ordering::SeqCst)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
