//! Host-polled timing helpers.
//!
//! Nothing here sleeps or spawns. The host passes the current [`Instant`]
//! with every call and polls at its own pace, so the controller stays
//! single-threaded and deterministic under test.

use std::time::{Duration, Instant};

/// Collapses bursts of values into the last one, delivered once the input
/// has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debounce<T> {
    /// Create a debouncer with the given quiescence delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replace the pending value and restart the delay.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Take the pending value if its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, fire)) if *fire <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, fire)| *fire)
    }

    /// Check whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }
}

/// Lets an action through at most once per `interval`.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    /// Create a throttle with the given minimum spacing.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Check whether the action may run now; records the run if so.
    pub fn ready(&mut self, now: Instant) -> bool {
        let ready = self
            .last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if ready {
            self.last = Some(now);
        }
        ready
    }

    /// Forget the last run.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn debounce_keeps_last_value() {
        let start = Instant::now();
        let mut debounce = Debounce::new(200 * MS);

        debounce.push("#f", start);
        debounce.push("#ff", start + 50 * MS);
        debounce.push("#fff", start + 100 * MS);

        assert_eq!(debounce.poll(start + 250 * MS), None);
        assert_eq!(debounce.deadline(), Some(start + 300 * MS));
        assert_eq!(debounce.poll(start + 300 * MS), Some("#fff"));
        assert!(!debounce.is_pending());
        assert_eq!(debounce.poll(start + 900 * MS), None);
    }

    #[test]
    fn debounce_cancel() {
        let start = Instant::now();
        let mut debounce = Debounce::new(200 * MS);
        debounce.push(1, start);
        assert_eq!(debounce.cancel(), Some(1));
        assert_eq!(debounce.poll(start + 500 * MS), None);
    }

    #[test]
    fn throttle_spacing() {
        let start = Instant::now();
        let mut throttle = Throttle::new(2000 * MS);

        assert!(throttle.ready(start));
        assert!(!throttle.ready(start + 500 * MS));
        assert!(!throttle.ready(start + 1999 * MS));
        assert!(throttle.ready(start + 2000 * MS));
        assert!(!throttle.ready(start + 3000 * MS));

        throttle.reset();
        assert!(throttle.ready(start + 3000 * MS));
    }
}
