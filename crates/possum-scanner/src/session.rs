//! Scanning session state machine.
//!
//! The [`SessionController`] owns the scan gate and the overlay and decides,
//! for every event, which state comes next and what the runtime has to do.
//! It performs no I/O: each operation returns the [`Effect`]s to execute.
//!
//! # States
//!
//! - `Idle`: camera off. The overlay is hidden, or left visible with the
//!   camera error status after a failed start.
//! - `Active`: camera running, waiting for a label.
//! - `AwaitingAck`: a code was forwarded to the server and the safety timer
//!   is armed.
//!
//! # Valid Transitions
//!
//! - Idle → Active (start)
//! - Active → AwaitingAck (scan accepted)
//! - Active → Idle (stop, camera failure)
//! - AwaitingAck → Idle (acknowledgement, safety timeout, stop, camera failure)
//!
//! # Safety Timer
//!
//! Every accepted scan arms the timer with a fresh [`TimerToken`]. A fired
//! timer closes the session only if its token is the one currently armed, so
//! a timer left over from an earlier session or an earlier scan is ignored.
//!
//! # Examples
//!
//! ```
//! use possum_core::ScanEvent;
//! use possum_scanner::{Effect, SessionController, SessionState};
//!
//! let mut controller = SessionController::new();
//! assert_eq!(controller.start().unwrap(), vec![Effect::StartCamera]);
//! controller.camera_ready();
//!
//! let event = ScanEvent::now("5901234123457".parse().unwrap());
//! let (_, effects) = controller.on_scan(&event);
//! assert_eq!(controller.state(), SessionState::AwaitingAck);
//! assert_eq!(effects.len(), 3);
//!
//! controller.on_ack();
//! assert_eq!(controller.state(), SessionState::Idle);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use possum_core::constants::{HAPTIC_PULSE_MS, MAX_SESSION_HISTORY};
use possum_core::{Error, OutboundMessage, Result, ScanEvent, SessionId, TimerToken};

use crate::config::ScannerConfig;
use crate::gate::ScanGate;
use crate::overlay::{Overlay, ScanStatus};

/// Lifecycle state of a scanning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Camera off.
    #[default]
    Idle,

    /// Camera running, no code forwarded yet.
    Active,

    /// A code was forwarded; waiting for `scan_success` or the safety timer.
    AwaitingAck,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SessionState::Idle => "Idle",
            SessionState::Active => "Active",
            SessionState::AwaitingAck => "AwaitingAck",
        };
        write!(f, "{}", state_str)
    }
}

impl SessionState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use possum_scanner::SessionState;
    ///
    /// assert!(SessionState::Idle.can_transition_to(SessionState::Active));
    /// assert!(!SessionState::Idle.can_transition_to(SessionState::AwaitingAck));
    /// ```
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        matches!(
            (self, target),
            (SessionState::Idle, SessionState::Active)
                | (SessionState::Active, SessionState::AwaitingAck | SessionState::Idle)
                | (SessionState::AwaitingAck, SessionState::Idle)
        )
    }

    /// Whether the camera is supposed to be running.
    pub fn is_running(&self) -> bool {
        !matches!(self, SessionState::Idle)
    }
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    Started,
    ScanAccepted,
    Acknowledged,
    SafetyTimeout,
    Stopped,
    CameraFailed,
}

impl fmt::Display for TransitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            TransitionReason::Started => "started",
            TransitionReason::ScanAccepted => "scan accepted",
            TransitionReason::Acknowledged => "acknowledged",
            TransitionReason::SafetyTimeout => "safety timeout",
            TransitionReason::Stopped => "stopped",
            TransitionReason::CameraFailed => "camera failed",
        };
        f.write_str(reason)
    }
}

/// A single state transition with timestamp.
///
/// The `timestamp` is process-local and is not serialized; deserializing
/// stamps the record with the current time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTransition {
    pub session: SessionId,
    pub from: SessionState,
    pub to: SessionState,
    pub reason: TransitionReason,

    #[serde(skip, default = "Instant::now")]
    pub timestamp: Instant,
}

impl SessionTransition {
    pub fn new(
        session: SessionId,
        from: SessionState,
        to: SessionState,
        reason: TransitionReason,
    ) -> Self {
        Self {
            session,
            from,
            to,
            reason,
            timestamp: Instant::now(),
        }
    }

    /// Time elapsed since the transition.
    pub fn elapsed(&self) -> Duration {
        self.timestamp.elapsed()
    }
}

/// Work the runtime performs on behalf of the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the camera and start the decoder.
    StartCamera,

    /// Stop the decoder and release the camera.
    StopCamera,

    /// Deliver a message to the server.
    Send(OutboundMessage),

    /// (Re)arm the safety timer, replacing any armed one.
    ArmTimer { token: TimerToken, after: Duration },

    /// Disarm the safety timer.
    CancelTimer,

    /// Short vibration confirming an accepted scan.
    Haptic(Duration),
}

/// Result of feeding a detection to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No session was running.
    Ignored,

    /// Suppressed by the scan gate.
    Duplicate,

    /// Forwarded to the server; the safety timer was armed with this token.
    Accepted(TimerToken),
}

/// Keys the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Char(char),
}

/// Point-in-time view of the controller for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScannerSnapshot {
    pub session: SessionId,
    pub state: SessionState,
    pub overlay_visible: bool,
    pub status: String,
}

/// State machine driving one scanner.
///
/// Not thread safe; the scanner service owns it and feeds it one event at a
/// time.
#[derive(Debug)]
pub struct SessionController {
    state: SessionState,
    session: SessionId,

    /// Arm counter within the current session.
    generation: u64,

    /// Token of the armed safety timer, if any.
    armed: Option<TimerToken>,

    gate: ScanGate,
    overlay: Overlay,
    safety_timeout: Duration,

    /// Recent transitions (limited to MAX_SESSION_HISTORY).
    history: VecDeque<SessionTransition>,
}

impl SessionController {
    /// Controller with the default cooldown and safety timeout.
    pub fn new() -> Self {
        Self::from_config(&ScannerConfig::default())
    }

    pub fn from_config(config: &ScannerConfig) -> Self {
        Self {
            state: SessionState::Idle,
            session: SessionId::default(),
            generation: 0,
            armed: None,
            gate: ScanGate::with_cooldown(config.cooldown()),
            overlay: Overlay::new(),
            safety_timeout: config.safety_timeout(),
            history: VecDeque::with_capacity(MAX_SESSION_HISTORY),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Identifier of the current (or most recent) session.
    pub fn session_id(&self) -> SessionId {
        self.session
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn gate(&self) -> &ScanGate {
        &self.gate
    }

    /// Token of the armed safety timer.
    pub fn armed_timer(&self) -> Option<TimerToken> {
        self.armed
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<SessionTransition> {
        &self.history
    }

    /// The last `count` transitions, oldest first.
    pub fn last_transitions(&self, count: usize) -> Vec<SessionTransition> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).cloned().collect()
    }

    pub fn snapshot(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            session: self.session,
            state: self.state,
            overlay_visible: self.overlay.is_visible(),
            status: self.overlay.status_text(),
        }
    }

    /// Open a new session.
    ///
    /// Allocates the next session id, clears the scan gate and shows the
    /// overlay while the camera initializes.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if a session is already running.
    pub fn start(&mut self) -> Result<Vec<Effect>> {
        if !self.state.can_transition_to(SessionState::Active) {
            return Err(Error::InvalidStateTransition {
                from: self.state.to_string(),
                to: SessionState::Active.to_string(),
            });
        }

        self.session = self.session.next();
        self.generation = 0;
        self.armed = None;
        self.gate.reset();
        self.overlay.show(ScanStatus::Initializing);
        self.enter(SessionState::Active, TransitionReason::Started);

        info!(session = %self.session, "Scanner session started");
        Ok(vec![Effect::StartCamera])
    }

    /// Start when idle, stop otherwise.
    ///
    /// # Errors
    ///
    /// Propagates [`start`](Self::start) errors.
    pub fn toggle(&mut self) -> Result<Vec<Effect>> {
        match self.state {
            SessionState::Idle => self.start(),
            _ => Ok(self.stop()),
        }
    }

    /// The decoder reported the camera running.
    pub fn camera_ready(&mut self) {
        if self.state == SessionState::Active && self.overlay.status() == &ScanStatus::Initializing
        {
            self.overlay.set_status(ScanStatus::Ready);
        }
    }

    /// The camera could not be opened or its stream was lost.
    ///
    /// The session closes but the overlay stays up with the error status until
    /// the user dismisses it or retries.
    pub fn camera_failed(&mut self) -> Vec<Effect> {
        if self.state == SessionState::Idle {
            return Vec::new();
        }

        warn!(session = %self.session, "Camera unavailable, closing scanner session");

        let mut effects = Vec::with_capacity(2);
        if self.armed.take().is_some() {
            effects.push(Effect::CancelTimer);
        }
        effects.push(Effect::StopCamera);
        self.overlay.set_status(ScanStatus::CameraError);
        self.enter(SessionState::Idle, TransitionReason::CameraFailed);
        effects
    }

    /// Feed one decoder detection through the gate.
    pub fn on_scan(&mut self, event: &ScanEvent) -> (ScanOutcome, Vec<Effect>) {
        if self.state == SessionState::Idle {
            debug!(code = %event.code, "Detection outside a session ignored");
            return (ScanOutcome::Ignored, Vec::new());
        }

        if !self.gate.accept(&event.code, event.timestamp) {
            debug!(code = %event.code, "Duplicate scan suppressed");
            self.overlay
                .set_status(ScanStatus::AlreadyScanned(event.code.clone()));
            return (ScanOutcome::Duplicate, Vec::new());
        }

        self.generation += 1;
        let token = TimerToken::new(self.session, self.generation);
        self.armed = Some(token);
        self.overlay
            .set_status(ScanStatus::Processing(event.code.clone()));

        if self.state == SessionState::Active {
            self.enter(SessionState::AwaitingAck, TransitionReason::ScanAccepted);
        }

        info!(code = %event.code, timer = %token, "Scan accepted");
        let effects = vec![
            Effect::Haptic(Duration::from_millis(HAPTIC_PULSE_MS)),
            Effect::Send(OutboundMessage::barcode_scanned(event.code.clone())),
            Effect::ArmTimer {
                token,
                after: self.safety_timeout,
            },
        ];
        (ScanOutcome::Accepted(token), effects)
    }

    /// The server confirmed the scan.
    pub fn on_ack(&mut self) -> Vec<Effect> {
        if self.state != SessionState::AwaitingAck {
            debug!(state = %self.state, "scan_success ignored");
            return Vec::new();
        }
        self.finish(TransitionReason::Acknowledged)
    }

    /// The safety timer armed with `token` fired.
    pub fn on_safety_timeout(&mut self, token: TimerToken) -> Vec<Effect> {
        if self.state != SessionState::AwaitingAck || self.armed != Some(token) {
            debug!(timer = %token, "Stale safety timer ignored");
            return Vec::new();
        }

        warn!(timer = %token, "No scan acknowledgement, closing scanner session");
        self.armed = None;
        self.overlay.reset_status();
        self.finish(TransitionReason::SafetyTimeout)
    }

    /// Close the session immediately, pending acknowledgement or not.
    ///
    /// When idle this only dismisses a leftover camera error overlay.
    pub fn stop(&mut self) -> Vec<Effect> {
        if self.state == SessionState::Idle {
            self.overlay.hide();
            return Vec::new();
        }
        self.finish(TransitionReason::Stopped)
    }

    /// Keyboard input while the overlay has focus.
    pub fn on_key(&mut self, key: Key) -> Vec<Effect> {
        match key {
            Key::Escape if self.is_running() || self.overlay.is_visible() => self.stop(),
            _ => Vec::new(),
        }
    }

    fn finish(&mut self, reason: TransitionReason) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if self.armed.take().is_some() {
            effects.push(Effect::CancelTimer);
        }
        effects.push(Effect::StopCamera);
        self.overlay.hide();
        self.enter(SessionState::Idle, reason);

        info!(session = %self.session, %reason, "Scanner session closed");
        effects
    }

    fn enter(&mut self, to: SessionState, reason: TransitionReason) {
        debug_assert!(self.state.can_transition_to(to));

        let transition = SessionTransition::new(self.session, self.state, to, reason);
        debug!(
            session = %self.session,
            from = %transition.from,
            to = %transition.to,
            %reason,
            "Session transition"
        );

        if self.history.len() >= MAX_SESSION_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(transition);
        self.state = to;
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use possum_core::Barcode;
    use rstest::rstest;

    fn code(s: &str) -> Barcode {
        s.parse().unwrap()
    }

    fn scan(s: &str) -> ScanEvent {
        ScanEvent::now(code(s))
    }

    fn scanning() -> SessionController {
        let mut controller = SessionController::new();
        controller.start().unwrap();
        controller.camera_ready();
        controller
    }

    fn accept(controller: &mut SessionController, s: &str) -> TimerToken {
        match controller.on_scan(&scan(s)).0 {
            ScanOutcome::Accepted(token) => token,
            other => panic!("expected acceptance, got {other:?}"),
        }
    }

    #[rstest]
    #[case(SessionState::Idle, SessionState::Active, true)]
    #[case(SessionState::Idle, SessionState::AwaitingAck, false)]
    #[case(SessionState::Active, SessionState::AwaitingAck, true)]
    #[case(SessionState::Active, SessionState::Idle, true)]
    #[case(SessionState::Active, SessionState::Active, false)]
    #[case(SessionState::AwaitingAck, SessionState::Idle, true)]
    #[case(SessionState::AwaitingAck, SessionState::Active, false)]
    fn test_transition_rules(
        #[case] from: SessionState,
        #[case] to: SessionState,
        #[case] valid: bool,
    ) {
        assert_eq!(from.can_transition_to(to), valid);
    }

    #[test]
    fn test_start_opens_session() {
        let mut controller = SessionController::new();
        let effects = controller.start().unwrap();

        assert_eq!(effects, vec![Effect::StartCamera]);
        assert_eq!(controller.state(), SessionState::Active);
        assert_eq!(controller.session_id(), SessionId::new(1));
        assert!(controller.overlay().is_visible());
        assert_eq!(controller.overlay().status(), &ScanStatus::Initializing);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut controller = scanning();
        let err = controller.start().unwrap_err();
        assert!(matches!(err, Error::InvalidStateTransition { .. }));
        assert_eq!(controller.session_id(), SessionId::new(1));
    }

    #[test]
    fn test_camera_ready_shows_prompt() {
        let controller = scanning();
        assert_eq!(controller.overlay().status(), &ScanStatus::Ready);
    }

    #[test]
    fn test_accepted_scan_effects() {
        let mut controller = scanning();
        let (outcome, effects) = controller.on_scan(&scan("0001"));

        let token = TimerToken::new(SessionId::new(1), 1);
        assert_eq!(outcome, ScanOutcome::Accepted(token));
        assert_eq!(
            effects,
            vec![
                Effect::Haptic(Duration::from_millis(100)),
                Effect::Send(OutboundMessage::barcode_scanned(code("0001"))),
                Effect::ArmTimer {
                    token,
                    after: Duration::from_millis(5000)
                },
            ]
        );
        assert_eq!(controller.state(), SessionState::AwaitingAck);
        assert_eq!(controller.armed_timer(), Some(token));
        assert_eq!(controller.overlay().status_text(), "Processing: 0001...");
    }

    #[test]
    fn test_duplicate_scan_sends_nothing() {
        let mut controller = scanning();
        accept(&mut controller, "0001");

        let (outcome, effects) = controller.on_scan(&scan("0001"));
        assert_eq!(outcome, ScanOutcome::Duplicate);
        assert!(effects.is_empty());
        assert_eq!(controller.state(), SessionState::AwaitingAck);
        assert_eq!(controller.overlay().status_text(), "Already scanned: 0001");
    }

    #[test]
    fn test_scan_while_idle_ignored() {
        let mut controller = SessionController::new();
        let (outcome, effects) = controller.on_scan(&scan("0001"));
        assert_eq!(outcome, ScanOutcome::Ignored);
        assert!(effects.is_empty());
        assert!(controller.gate().last_code().is_none());
    }

    #[test]
    fn test_ack_closes_session() {
        let mut controller = scanning();
        accept(&mut controller, "0002");

        let effects = controller.on_ack();
        assert_eq!(effects, vec![Effect::CancelTimer, Effect::StopCamera]);
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(!controller.overlay().is_visible());
        assert!(controller.armed_timer().is_none());

        let last = controller.history().back().unwrap();
        assert_eq!(last.reason, TransitionReason::Acknowledged);
    }

    #[rstest]
    #[case::idle(false)]
    #[case::active(true)]
    fn test_ack_without_pending_scan_ignored(#[case] started: bool) {
        let mut controller = SessionController::new();
        if started {
            controller.start().unwrap();
        }
        let before = controller.state();

        assert!(controller.on_ack().is_empty());
        assert_eq!(controller.state(), before);
    }

    #[test]
    fn test_safety_timeout_closes_session() {
        let mut controller = scanning();
        let token = accept(&mut controller, "0001");

        let effects = controller.on_safety_timeout(token);
        assert_eq!(effects, vec![Effect::StopCamera]);
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(!controller.overlay().is_visible());
        assert_eq!(controller.overlay().status(), &ScanStatus::Ready);
    }

    #[test]
    fn test_timer_from_previous_session_ignored() {
        let mut controller = scanning();
        let old = accept(&mut controller, "0001");
        controller.on_ack();

        controller.start().unwrap();
        accept(&mut controller, "0001");

        assert!(controller.on_safety_timeout(old).is_empty());
        assert_eq!(controller.state(), SessionState::AwaitingAck);
    }

    #[test]
    fn test_rearmed_timer_supersedes_previous() {
        let mut controller = scanning();
        let first = accept(&mut controller, "0001");
        let second = accept(&mut controller, "0002");

        assert_eq!(second.generation, first.generation + 1);
        assert_eq!(controller.state(), SessionState::AwaitingAck);
        assert!(controller.on_safety_timeout(first).is_empty());
        assert_eq!(controller.on_safety_timeout(second), vec![Effect::StopCamera]);
    }

    #[test]
    fn test_stop_preempts_pending_ack() {
        let mut controller = scanning();
        let token = accept(&mut controller, "0001");

        assert_eq!(
            controller.stop(),
            vec![Effect::CancelTimer, Effect::StopCamera]
        );
        assert!(controller.on_safety_timeout(token).is_empty());
        assert!(controller.on_ack().is_empty());
    }

    #[test]
    fn test_camera_failure_keeps_error_overlay() {
        let mut controller = SessionController::new();
        controller.start().unwrap();

        let effects = controller.camera_failed();
        assert_eq!(effects, vec![Effect::StopCamera]);
        assert_eq!(controller.state(), SessionState::Idle);
        assert!(controller.overlay().is_visible());
        assert_eq!(controller.overlay().status(), &ScanStatus::CameraError);

        // camera_ready after the failure must not hide the error
        controller.camera_ready();
        assert_eq!(controller.overlay().status(), &ScanStatus::CameraError);

        assert!(controller.stop().is_empty());
        assert!(!controller.overlay().is_visible());
    }

    #[test]
    fn test_retry_after_camera_failure() {
        let mut controller = SessionController::new();
        controller.start().unwrap();
        controller.camera_failed();

        assert_eq!(controller.start().unwrap(), vec![Effect::StartCamera]);
        assert_eq!(controller.session_id(), SessionId::new(2));
        assert_eq!(controller.overlay().status(), &ScanStatus::Initializing);
    }

    #[test]
    fn test_camera_failure_while_awaiting_ack_cancels_timer() {
        let mut controller = scanning();
        accept(&mut controller, "0001");

        assert_eq!(
            controller.camera_failed(),
            vec![Effect::CancelTimer, Effect::StopCamera]
        );
    }

    #[test]
    fn test_new_session_resets_gate() {
        let mut controller = scanning();
        accept(&mut controller, "0001");
        controller.on_ack();

        controller.start().unwrap();
        accept(&mut controller, "0001");
    }

    #[test]
    fn test_toggle() {
        let mut controller = SessionController::new();
        assert_eq!(controller.toggle().unwrap(), vec![Effect::StartCamera]);
        assert_eq!(controller.toggle().unwrap(), vec![Effect::StopCamera]);
        assert_eq!(controller.state(), SessionState::Idle);
    }

    #[rstest]
    #[case(Key::Escape, SessionState::Idle)]
    #[case(Key::Char('q'), SessionState::Active)]
    fn test_keys(#[case] key: Key, #[case] expected: SessionState) {
        let mut controller = scanning();
        controller.on_key(key);
        assert_eq!(controller.state(), expected);
    }

    #[test]
    fn test_escape_dismisses_error_overlay() {
        let mut controller = SessionController::new();
        controller.start().unwrap();
        controller.camera_failed();

        controller.on_key(Key::Escape);
        assert!(!controller.overlay().is_visible());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut controller = SessionController::new();
        for _ in 0..60 {
            controller.start().unwrap();
            controller.stop();
        }

        assert_eq!(controller.history().len(), MAX_SESSION_HISTORY);
        assert_eq!(controller.last_transitions(2).len(), 2);
        let last = controller.last_transitions(1);
        assert_eq!(last[0].session, SessionId::new(60));
        assert_eq!(last[0].reason, TransitionReason::Stopped);
    }

    #[test]
    fn test_snapshot() {
        let controller = scanning();
        let snapshot = controller.snapshot();

        assert_eq!(snapshot.session, SessionId::new(1));
        assert_eq!(snapshot.state, SessionState::Active);
        assert!(snapshot.overlay_visible);
        assert_eq!(snapshot.status, "Point camera at product barcode");
    }
}
