//! Bookkeeping for preview image downloads that are still in flight.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

/// An unanswered request is sent again after this long.
pub const PREVIEW_RETRY_AFTER: Duration = Duration::from_secs(20);

#[derive(Debug, Default)]
pub struct PreviewRequests {
    in_flight: HashMap<String, Instant>,
}

impl PreviewRequests {
    /// Marks `url` as requested at `now` and returns true when a fetch should be
    /// sent: nothing is in flight for it, or the previous request went stale.
    pub fn start(&mut self, url: &str, now: Instant) -> bool {
        match self.in_flight.get(url) {
            Some(sent) if now.saturating_duration_since(*sent) < PREVIEW_RETRY_AFTER => false,
            _ => {
                self.in_flight.insert(url.to_string(), now);
                true
            }
        }
    }

    pub fn finish(&mut self, url: &str) {
        self.in_flight.remove(url);
    }

    pub fn clear(&mut self) {
        self.in_flight.clear();
    }
}

#[cfg(test)]
#[path = "tests/previews_tests.rs"]
mod tests;
