use std::time::{Duration, Instant};

/// Trailing debounce: a value is released once no newer value arrived for
/// the whole quiet window. Time is passed in explicitly.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Queue a value, restarting the quiet window
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Release the pending value if the window has elapsed since the last push
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(
            &self.pending,
            Some((_, pushed)) if now.saturating_duration_since(*pushed) >= self.window
        );
        if ready {
            self.pending.take().map(|(value, _)| value)
        } else {
            None
        }
    }

    /// When the pending value will be released, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, pushed)| *pushed + self.window)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
