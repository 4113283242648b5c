//! Repeat-read suppression
//!
//! A code held in front of a scanner is decoded on every frame. Only the
//! first read within the interval is processed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub struct ScanDebouncer {
    interval: Duration,
    last_accepted: HashMap<String, Instant>,
}

impl ScanDebouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: HashMap::new(),
        }
    }

    /// Whether `code` read at `now` should be processed. Suppressed reads do
    /// not extend the window.
    pub fn accept(&mut self, code: &str, now: Instant) -> bool {
        if let Some(&last) = self.last_accepted.get(code) {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        let interval = self.interval;
        self.last_accepted
            .retain(|_, last| now.saturating_duration_since(*last) < interval);
        self.last_accepted.insert(code.to_string(), now);
        true
    }

    /// Number of codes currently inside their repeat window
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.last_accepted.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
