// Cumulative-counter -> rate derivation shared by the disk and network samplers.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Instant;

/// Baseline for one tracked counter. Replaced wholesale after every
/// successful rate computation.
#[derive(Debug, Clone, Copy)]
struct CounterState {
    last_value: u64,
    last_time: Instant,
}

/// Turns monotonically increasing OS counters into point-in-time rates.
///
/// One logical poller drives all trackers; no internal locking. The caller
/// supplies `now` so rate math never depends on wall-clock reads of its own.
#[derive(Debug, Default)]
pub struct RateTracker {
    states: HashMap<String, CounterState>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the rate in units/sec since the last valid observation of `key`.
    ///
    /// First observation establishes a baseline and returns 0. A non-positive
    /// interval returns 0 and leaves the stored baseline untouched, so the
    /// next tick computes against the last valid sample instead of a
    /// zero-length one. Counter resets and wraparound clamp to 0 via
    /// saturating subtraction rather than reporting a negative rate.
    pub fn update(&mut self, key: &str, value: u64, now: Instant) -> f64 {
        match self.states.entry(key.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(CounterState {
                    last_value: value,
                    last_time: now,
                });
                0.0
            }
            Entry::Occupied(mut entry) => {
                let state = entry.get_mut();
                let dt = now.saturating_duration_since(state.last_time);
                if dt.is_zero() {
                    return 0.0;
                }
                let rate = value.saturating_sub(state.last_value) as f64 / dt.as_secs_f64();
                *state = CounterState {
                    last_value: value,
                    last_time: now,
                };
                rate
            }
        }
    }

    /// Whether `key` has an established baseline.
    pub fn has_baseline(&self, key: &str) -> bool {
        self.states.contains_key(key)
    }
}
