//! Camera barcode scanning sessions.
//!
//! This crate turns a stream of decoder detections into at most one
//! `barcode_scanned` message per label and keeps the camera, the overlay and
//! the server acknowledgement in step:
//!
//! - [`ScanGate`] suppresses repeats of the last accepted code inside a
//!   cooldown window.
//! - [`SessionController`] is the `Idle → Active → AwaitingAck → Idle` state
//!   machine. It returns [`Effect`]s instead of performing I/O.
//! - [`ScannerService`] executes those effects against a
//!   [`BarcodeDecoder`](possum_hardware::BarcodeDecoder), the outbound
//!   channel and the safety timer.
//!
//! # Examples
//!
//! ```
//! use possum_hardware::mock::MockDecoder;
//! use possum_scanner::{ScannerConfig, ScannerService, SessionState};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (decoder, camera) = MockDecoder::new();
//!     let (outbound_tx, mut outbound_rx) = mpsc::channel(16);
//!     let (service, mut handle) =
//!         ScannerService::new(decoder, ScannerConfig::default(), outbound_tx)?;
//!     tokio::spawn(service.run());
//!
//!     handle.start().await?;
//!     handle.wait_for(|s| s.state == SessionState::Active).await?;
//!
//!     camera.present("5901234123457").await?;
//!     let message = outbound_rx.recv().await.unwrap();
//!     assert_eq!(
//!         message.to_json()?,
//!         r#"{"event":"barcode_scanned","payload":{"barcode":"5901234123457"}}"#
//!     );
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod overlay;
pub mod service;
pub mod session;

pub use config::ScannerConfig;
pub use error::{Result, ScannerError};
pub use gate::ScanGate;
pub use overlay::{Overlay, ScanStatus};
pub use service::{ScannerCommand, ScannerHandle, ScannerService};
pub use session::{
    Effect, Key, ScanOutcome, ScannerSnapshot, SessionController, SessionState,
    SessionTransition, TransitionReason,
};
