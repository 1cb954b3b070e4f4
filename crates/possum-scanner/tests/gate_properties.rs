//! Property-based tests for the scan gate.
//!
//! Times are expressed as millisecond offsets from a fixed base instant.

use std::time::Duration;

use possum_core::Barcode;
use possum_scanner::ScanGate;
use proptest::prelude::*;
use tokio::time::Instant;

const COOLDOWN_MS: u64 = 3_000;

/// Strategy for generating retail-looking barcodes.
fn barcode() -> impl Strategy<Value = Barcode> {
    prop::string::string_regex("[0-9A-Z]{1,20}")
        .expect("Failed to create barcode regex strategy")
        .prop_map(|s| Barcode::new(&s).expect("generated barcode is valid"))
}

fn at(base: Instant, offset_ms: u64) -> Instant {
    base + Duration::from_millis(offset_ms)
}

proptest! {
    /// Property: a repeat inside the cooldown is always rejected.
    #[test]
    fn prop_repeat_inside_cooldown_rejected(
        code in barcode(),
        t1 in 0u64..1_000_000,
        delta in 0u64..COOLDOWN_MS,
    ) {
        let base = Instant::now();
        let mut gate = ScanGate::new();

        prop_assert!(gate.accept(&code, at(base, t1)));
        prop_assert!(!gate.accept(&code, at(base, t1 + delta)));
    }

    /// Property: a repeat at or after the cooldown is always accepted.
    #[test]
    fn prop_repeat_after_cooldown_accepted(
        code in barcode(),
        t1 in 0u64..1_000_000,
        delta in COOLDOWN_MS..1_000_000,
    ) {
        let base = Instant::now();
        let mut gate = ScanGate::new();

        prop_assert!(gate.accept(&code, at(base, t1)));
        prop_assert!(gate.accept(&code, at(base, t1 + delta)));
    }

    /// Property: distinct codes at the same instant are both accepted.
    #[test]
    fn prop_distinct_codes_accepted(
        a in barcode(),
        b in barcode(),
        t in 0u64..1_000_000,
    ) {
        prop_assume!(a != b);
        let base = Instant::now();
        let mut gate = ScanGate::new();

        prop_assert!(gate.accept(&a, at(base, t)));
        prop_assert!(gate.accept(&b, at(base, t)));
    }

    /// Property: after reset the next detection is accepted.
    #[test]
    fn prop_reset_accepts_next(
        code in barcode(),
        t in 0u64..1_000_000,
    ) {
        let base = Instant::now();
        let mut gate = ScanGate::new();

        prop_assert!(gate.accept(&code, at(base, t)));
        gate.reset();
        prop_assert!(gate.accept(&code, at(base, t)));
    }

    /// Property: for any detection sequence, two accepted repeats of the same
    /// code are never closer than the cooldown.
    #[test]
    fn prop_accepted_repeats_spaced_by_cooldown(
        steps in prop::collection::vec((0usize..3, 0u64..2_000), 1..50),
    ) {
        let codes: Vec<Barcode> = ["0001", "0002", "0003"]
            .iter()
            .map(|s| Barcode::new(s).expect("valid barcode"))
            .collect();
        let base = Instant::now();
        let mut gate = ScanGate::new();
        let mut now = 0u64;
        let mut last_accept: Option<(usize, u64)> = None;

        for (index, gap) in steps {
            now += gap;
            if gate.accept(&codes[index], at(base, now)) {
                if let Some((last_index, last_at)) = last_accept
                    && last_index == index
                {
                    prop_assert!(now - last_at >= COOLDOWN_MS);
                }
                last_accept = Some((index, now));
            }
        }
    }
}
