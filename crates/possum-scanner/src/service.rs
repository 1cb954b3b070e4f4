//! Async scanner runtime.
//!
//! The [`ScannerService`] owns the decoder and the session controller and
//! runs a single `tokio::select!` loop over three sources:
//!
//! ```text
//! ┌────────────────┐
//! │ ScannerHandle  │──commands──►┐
//! └────────────────┘             │      ┌──────────────────┐
//!                                ├─────►│ SessionController│──effects──► decoder,
//! ┌────────────────┐             │      └──────────────────┘             outbound,
//! │ BarcodeDecoder │─detections─►┤                                       timer
//! └────────────────┘             │
//! ┌────────────────┐             │
//! │ safety timer   │────fired───►┘
//! └────────────────┘
//! ```
//!
//! Events are handled one at a time in arrival order, so the controller needs
//! no locking. Commands are polled first: a stop or an acknowledgement that
//! races the safety timer wins. Outbound messages the server side has not
//! made room for wait in a backlog drained by the loop, so a slow consumer
//! never holds up a stop.
//!
//! # Examples
//!
//! ```no_run
//! use possum_hardware::mock::MockDecoder;
//! use possum_scanner::{ScannerConfig, ScannerService};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> possum_scanner::Result<()> {
//!     let (decoder, _camera) = MockDecoder::new();
//!     let (outbound_tx, mut outbound_rx) = mpsc::channel(16);
//!
//!     let (service, handle) =
//!         ScannerService::new(decoder, ScannerConfig::default(), outbound_tx)?;
//!     tokio::spawn(service.run());
//!
//!     handle.start().await?;
//!     while let Some(message) = outbound_rx.recv().await {
//!         println!("{}", message.to_json()?);
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::time::{Sleep, sleep};
use tracing::{debug, info, warn};

use possum_core::{Barcode, InboundMessage, OutboundMessage, ScanEvent, TimerToken};
use possum_hardware::{BarcodeDecoder, DecodedBarcode};

use crate::config::ScannerConfig;
use crate::error::{Result, ScannerError};
use crate::session::{Effect, Key, ScannerSnapshot, SessionController};

/// Pending commands before `ScannerHandle` senders wait.
const COMMAND_BUFFER: usize = 32;

/// Undelivered outbound messages kept while the outbound channel is full.
const OUTBOUND_BACKLOG: usize = 32;

/// Request sent to a running scanner service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannerCommand {
    Start,
    Stop,
    Toggle,
    Key(Key),

    /// A message pushed by the server.
    Inbound(InboundMessage),
}

/// Control side of a scanner service.
///
/// Cloneable; the service shuts down once every handle is dropped.
#[derive(Debug, Clone)]
pub struct ScannerHandle {
    commands: mpsc::Sender<ScannerCommand>,
    snapshot: watch::Receiver<ScannerSnapshot>,
}

impl ScannerHandle {
    /// # Errors
    ///
    /// Returns `ScannerError::ServiceStopped` if the service is gone.
    pub async fn send(&self, command: ScannerCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ScannerError::ServiceStopped)
    }

    pub async fn start(&self) -> Result<()> {
        self.send(ScannerCommand::Start).await
    }

    pub async fn stop(&self) -> Result<()> {
        self.send(ScannerCommand::Stop).await
    }

    pub async fn toggle(&self) -> Result<()> {
        self.send(ScannerCommand::Toggle).await
    }

    pub async fn key(&self, key: Key) -> Result<()> {
        self.send(ScannerCommand::Key(key)).await
    }

    /// Forward a server message. Only `scan_success` affects the scanner.
    pub async fn deliver(&self, message: InboundMessage) -> Result<()> {
        self.send(ScannerCommand::Inbound(message)).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> ScannerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Wait until the published state satisfies `predicate`.
    ///
    /// # Errors
    ///
    /// Returns `ScannerError::ServiceStopped` if the service exits first.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&ScannerSnapshot) -> bool,
    ) -> Result<ScannerSnapshot> {
        let snapshot = self
            .snapshot
            .wait_for(predicate)
            .await
            .map_err(|_| ScannerError::ServiceStopped)?;
        Ok((*snapshot).clone())
    }
}

struct ArmedTimer {
    token: TimerToken,
    sleep: Pin<Box<Sleep>>,
}

/// Scanner event loop over one decoder.
pub struct ScannerService<D> {
    decoder: D,
    config: ScannerConfig,
    controller: SessionController,
    commands: mpsc::Receiver<ScannerCommand>,
    outbound: mpsc::Sender<OutboundMessage>,
    backlog: VecDeque<OutboundMessage>,
    haptics: Option<mpsc::Sender<Duration>>,
    snapshot: watch::Sender<ScannerSnapshot>,
    timer: Option<ArmedTimer>,
}

impl<D: BarcodeDecoder> ScannerService<D> {
    /// Create a service and its control handle.
    ///
    /// Accepted scans are delivered on `outbound`.
    ///
    /// # Errors
    ///
    /// Returns `ScannerError::Core` if `config` fails validation.
    pub fn new(
        decoder: D,
        config: ScannerConfig,
        outbound: mpsc::Sender<OutboundMessage>,
    ) -> Result<(Self, ScannerHandle)> {
        config.validate()?;

        let controller = SessionController::from_config(&config);
        let (command_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        let service = Self {
            decoder,
            config,
            controller,
            commands,
            outbound,
            backlog: VecDeque::new(),
            haptics: None,
            snapshot: snapshot_tx,
            timer: None,
        };
        let handle = ScannerHandle {
            commands: command_tx,
            snapshot: snapshot_rx,
        };
        Ok((service, handle))
    }

    /// Deliver a pulse length on `haptics` for every accepted scan.
    pub fn with_haptics(mut self, haptics: mpsc::Sender<Duration>) -> Self {
        self.haptics = Some(haptics);
        self
    }

    /// Run until every [`ScannerHandle`] is dropped.
    ///
    /// A session still open at shutdown is stopped and the camera released.
    pub async fn run(mut self) {
        match self.decoder.get_info().await {
            Ok(device) => info!(device = %device.name, model = %device.model, "Scanner service running"),
            Err(e) => warn!(error = %e, "Scanner service running, decoder info unavailable"),
        }

        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => break,
                },

                token = next_timeout(&mut self.timer) => {
                    self.timer = None;
                    let effects = self.controller.on_safety_timeout(token);
                    self.apply(effects).await;
                }

                permit = self.outbound.clone().reserve_owned(), if !self.backlog.is_empty() => match permit {
                    Ok(permit) => {
                        if let Some(message) = self.backlog.pop_front() {
                            debug!(event = message.event_name(), "Sending backlogged message");
                            permit.send(message);
                        }
                    }
                    Err(_) => {
                        warn!(dropped = self.backlog.len(), "Outbound channel closed, backlog dropped");
                        self.backlog.clear();
                    }
                },

                detection = self.decoder.next_detection(), if self.decoder.is_running() => {
                    self.handle_detection(detection).await;
                }
            }

            self.publish();
        }

        let effects = self.controller.stop();
        self.apply(effects).await;
        self.publish();
        if !self.backlog.is_empty() {
            warn!(dropped = self.backlog.len(), "Undelivered messages at shutdown");
        }
        info!("Scanner service stopped");
    }

    async fn handle_command(&mut self, command: ScannerCommand) {
        let effects = match command {
            ScannerCommand::Start => self.controller.start(),
            ScannerCommand::Toggle => self.controller.toggle(),
            ScannerCommand::Stop => Ok(self.controller.stop()),
            ScannerCommand::Key(key) => Ok(self.controller.on_key(key)),
            ScannerCommand::Inbound(InboundMessage::ScanSuccess) => Ok(self.controller.on_ack()),
            ScannerCommand::Inbound(message) => {
                debug!(event = message.event_name(), "Inbound event not for the scanner");
                Ok(Vec::new())
            }
        };

        match effects {
            Ok(effects) => self.apply(effects).await,
            Err(e) => debug!(error = %e, "Scanner command ignored"),
        }
    }

    async fn handle_detection(&mut self, detection: possum_hardware::Result<DecodedBarcode>) {
        let detection = match detection {
            Ok(detection) => detection,
            Err(e) => {
                warn!(error = %e, "Decoder stream failed");
                let mut effects = self.controller.camera_failed();
                if effects.is_empty() {
                    effects.push(Effect::StopCamera);
                }
                self.apply(effects).await;
                return;
            }
        };

        match Barcode::new(&detection.code) {
            Ok(code) => {
                let (_, effects) = self.controller.on_scan(&ScanEvent::now(code));
                self.apply(effects).await;
            }
            Err(e) => warn!(
                code = %detection.code.escape_debug(),
                symbology = %detection.symbology,
                error = %e,
                "Dropping invalid detection"
            ),
        }
    }

    async fn apply(&mut self, effects: Vec<Effect>) {
        let mut queue = VecDeque::from(effects);

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::StartCamera => match self.decoder.start(&self.config.decoder).await {
                    Ok(()) => self.controller.camera_ready(),
                    Err(e) => {
                        warn!(error = %e, "Camera start failed");
                        queue.extend(self.controller.camera_failed());
                    }
                },
                Effect::StopCamera => {
                    if let Err(e) = self.decoder.stop().await {
                        warn!(error = %e, "Camera stop failed");
                    }
                }
                Effect::Send(message) => self.send_outbound(message),
                Effect::ArmTimer { token, after } => {
                    self.timer = Some(ArmedTimer {
                        token,
                        sleep: Box::pin(sleep(after)),
                    });
                }
                Effect::CancelTimer => self.timer = None,
                Effect::Haptic(pulse) => {
                    if let Some(haptics) = &self.haptics
                        && haptics.try_send(pulse).is_err()
                    {
                        debug!("Haptic pulse dropped");
                    }
                }
            }
        }
    }

    /// Hand `message` to the outbound channel without waiting for room.
    fn send_outbound(&mut self, message: OutboundMessage) {
        let event = message.event_name();
        if !self.backlog.is_empty() {
            self.push_backlog(message);
            return;
        }

        match self.outbound.try_send(message) {
            Ok(()) => debug!(event, "Sending to server"),
            Err(TrySendError::Full(message)) => {
                debug!(event, "Outbound channel full, message backlogged");
                self.push_backlog(message);
            }
            Err(TrySendError::Closed(_)) => warn!(event, "Outbound channel closed, message dropped"),
        }
    }

    fn push_backlog(&mut self, message: OutboundMessage) {
        if self.backlog.len() >= OUTBOUND_BACKLOG
            && let Some(oldest) = self.backlog.pop_front()
        {
            warn!(event = oldest.event_name(), "Outbound backlog full, oldest message dropped");
        }
        self.backlog.push_back(message);
    }

    fn publish(&self) {
        let snapshot = self.controller.snapshot();
        self.snapshot.send_if_modified(|current| {
            if *current == snapshot {
                return false;
            }
            *current = snapshot;
            true
        });
    }
}

/// Resolves with the armed token once its deadline passes; pending when no
/// timer is armed. Cancel safe, the sleep lives in `timer`.
async fn next_timeout(timer: &mut Option<ArmedTimer>) -> TimerToken {
    match timer {
        Some(armed) => {
            armed.sleep.as_mut().await;
            armed.token
        }
        None => std::future::pending().await,
    }
}
