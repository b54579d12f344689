//! Input debouncing for as-you-type search.

use std::time::{Duration, Instant};

/// Delay between the last keystroke and running the search
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(120);

/// Holds back search input until typing pauses.
///
/// Every [`input`](SearchDebouncer::input) replaces the pending query and
/// restarts the delay. [`poll`](SearchDebouncer::poll) hands out the latest
/// query once, after the delay has elapsed. Time is passed in by the caller.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        SearchDebouncer::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        SearchDebouncer {
            delay,
            pending: None,
        }
    }

    /// Configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record new input at `now`.
    pub fn input(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((query.into(), now));
    }

    /// Take the pending query if the delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.pending {
            Some((_, at)) if now.saturating_duration_since(at) >= self.delay => {
                self.pending.take().map(|(query, _)| query)
            }
            _ => None,
        }
    }

    /// Time left until the pending query is due, `None` if nothing is pending
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|(_, at)| self.delay.saturating_sub(now.saturating_duration_since(*at)))
    }

    /// Drop the pending query.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::default();

        debouncer.input("adp", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(50)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(120)),
            Some("adp".to_string())
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(500)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_new_input_restarts_delay() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new(Duration::from_millis(100));

        debouncer.input("ad", start);
        debouncer.input("adp", start + Duration::from_millis(80));
        assert_eq!(debouncer.poll(start + Duration::from_millis(150)), None);
        assert_eq!(
            debouncer.remaining(start + Duration::from_millis(150)),
            Some(Duration::from_millis(30))
        );
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(180)),
            Some("adp".to_string())
        );
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::default();
        debouncer.input("adp", start);
        debouncer.cancel();
        assert_eq!(debouncer.poll(start + Duration::from_secs(1)), None);
        assert_eq!(debouncer.remaining(start), None);
    }
}
