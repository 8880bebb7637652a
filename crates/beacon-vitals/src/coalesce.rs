//! Timer coalescing for high-frequency handlers (scroll, pointer move)
//!
//! Both helpers take the current `Instant` from the caller instead of
//! reading the clock themselves.

use std::time::{Duration, Instant};

/// Default coalescing window
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(100);

/// Lets a handler run at most once per interval
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_fired: None }
    }

    /// Whether the handler may run now; records the firing if so
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_fired = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

/// Holds the latest value until the input has been quiet for a window
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    window: Duration,
    pending: Option<T>,
    last_event: Option<Instant>,
}

impl<T> Debounce<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_event: None,
        }
    }

    /// Replace the pending value and restart the quiet window
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.last_event = Some(now);
    }

    /// Emit the pending value if the window has elapsed since the last push
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let last = self.last_event?;
        if now.saturating_duration_since(last) >= self.window {
            self.last_event = None;
            self.pending.take()
        } else {
            None
        }
    }

    /// Emit the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        self.last_event = None;
        self.pending.take()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_throttle_bounds_frequency() {
        let start = Instant::now();
        let mut throttle = Throttle::new(16 * MS);

        let fired = (0..100)
            .filter(|i| throttle.ready(start + MS * *i))
            .count();
        // fires at 0, 16, 32, 48, 64, 80, 96
        assert_eq!(fired, 7);
    }

    #[test]
    fn test_throttle_reset() {
        let now = Instant::now();
        let mut throttle = Throttle::default();
        assert!(throttle.ready(now));
        assert!(!throttle.ready(now));
        throttle.reset();
        assert!(throttle.ready(now));
    }

    #[test]
    fn test_debounce_emits_latest_after_quiet() {
        let start = Instant::now();
        let mut debounce = Debounce::new(50 * MS);

        debounce.push(1, start);
        debounce.push(2, start + 20 * MS);
        debounce.push(3, start + 40 * MS);
        assert_eq!(debounce.poll(start + 60 * MS), None);
        assert_eq!(debounce.poll(start + 90 * MS), Some(3));
        assert_eq!(debounce.poll(start + 200 * MS), None);
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_debounce_flush() {
        let mut debounce = Debounce::default();
        debounce.push("scroll", Instant::now());
        assert_eq!(debounce.flush(), Some("scroll"));
        assert_eq!(debounce.flush(), None);
    }
}
