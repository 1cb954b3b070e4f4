//! Duplicate suppression for decoder detections.
//!
//! A camera held over one label decodes the same symbol several times per
//! second. The gate lets the first detection of a code through and rejects
//! identical codes until the cooldown has elapsed. A different code is always
//! accepted and restarts the window.
//!
//! # Examples
//!
//! ```
//! use possum_core::Barcode;
//! use possum_scanner::ScanGate;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let mut gate = ScanGate::new();
//! let code: Barcode = "5901234123457".parse().unwrap();
//! let t0 = Instant::now();
//!
//! assert!(gate.accept(&code, t0));
//! assert!(!gate.accept(&code, t0 + Duration::from_millis(1000)));
//! assert!(gate.accept(&code, t0 + Duration::from_millis(3000)));
//! ```

use std::time::Duration;

use tokio::time::Instant;

use possum_core::Barcode;
use possum_core::constants::DEFAULT_SCAN_COOLDOWN_MS;

/// Cooldown filter owned by one session controller.
#[derive(Debug, Clone)]
pub struct ScanGate {
    cooldown: Duration,
    last_code: Option<Barcode>,
    last_accepted_at: Option<Instant>,
}

impl ScanGate {
    /// Gate with the default 3 second cooldown.
    pub fn new() -> Self {
        Self::with_cooldown(Duration::from_millis(DEFAULT_SCAN_COOLDOWN_MS))
    }

    pub fn with_cooldown(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_code: None,
            last_accepted_at: None,
        }
    }

    /// Decide whether a detection of `code` at `now` is forwarded.
    ///
    /// Returns `false` when `code` equals the last accepted code and less
    /// than the cooldown has passed since it was accepted. A `now` earlier
    /// than the last acceptance counts as inside the window. Accepting
    /// records `code` and `now`; rejecting leaves the gate untouched, so a
    /// stream of duplicates never extends the window.
    pub fn accept(&mut self, code: &Barcode, now: Instant) -> bool {
        if let (Some(last), Some(at)) = (&self.last_code, self.last_accepted_at)
            && last == code
            && now.saturating_duration_since(at) < self.cooldown
        {
            return false;
        }

        self.last_code = Some(code.clone());
        self.last_accepted_at = Some(now);
        true
    }

    /// Forget the last accepted code.
    pub fn reset(&mut self) {
        self.last_code = None;
        self.last_accepted_at = None;
    }

    pub fn last_code(&self) -> Option<&Barcode> {
        self.last_code.as_ref()
    }

    pub fn last_accepted_at(&self) -> Option<Instant> {
        self.last_accepted_at
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl Default for ScanGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn code(s: &str) -> Barcode {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_detection_accepted() {
        let mut gate = ScanGate::new();
        assert!(gate.accept(&code("0001"), Instant::now()));
        assert_eq!(gate.last_code(), Some(&code("0001")));
    }

    #[rstest]
    #[case(0, false)]
    #[case(1, false)]
    #[case(1000, false)]
    #[case(2999, false)]
    #[case(3000, true)]
    #[case(3001, true)]
    #[case(60_000, true)]
    fn test_repeat_against_cooldown(#[case] after_ms: u64, #[case] accepted: bool) {
        let mut gate = ScanGate::new();
        let t0 = Instant::now();
        assert!(gate.accept(&code("0001"), t0));
        assert_eq!(
            gate.accept(&code("0001"), t0 + Duration::from_millis(after_ms)),
            accepted
        );
    }

    #[test]
    fn test_different_code_restarts_window() {
        let mut gate = ScanGate::new();
        let t0 = Instant::now();

        assert!(gate.accept(&code("0001"), t0));
        assert!(gate.accept(&code("0002"), t0));
        // 0001 is no longer the last code, so it passes again
        assert!(gate.accept(&code("0001"), t0 + Duration::from_millis(10)));
        assert_eq!(gate.last_accepted_at(), Some(t0 + Duration::from_millis(10)));
    }

    #[test]
    fn test_rejection_does_not_extend_window() {
        let mut gate = ScanGate::new();
        let t0 = Instant::now();

        assert!(gate.accept(&code("0001"), t0));
        assert!(!gate.accept(&code("0001"), t0 + Duration::from_millis(2500)));
        assert!(gate.accept(&code("0001"), t0 + Duration::from_millis(3000)));
    }

    #[test]
    fn test_reset_forgets_last_code() {
        let mut gate = ScanGate::new();
        let t0 = Instant::now();

        assert!(gate.accept(&code("0001"), t0));
        gate.reset();
        assert!(gate.last_code().is_none());
        assert!(gate.accept(&code("0001"), t0));
    }

    #[test]
    fn test_earlier_timestamp_is_inside_window() {
        let mut gate = ScanGate::new();
        let t0 = Instant::now() + Duration::from_secs(10);

        assert!(gate.accept(&code("0001"), t0));
        assert!(!gate.accept(&code("0001"), t0 - Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_cooldown_accepts_everything() {
        let mut gate = ScanGate::with_cooldown(Duration::ZERO);
        let t0 = Instant::now();

        assert!(gate.accept(&code("0001"), t0));
        assert!(gate.accept(&code("0001"), t0));
    }
}
