//! Transient notices shown over the current page.

use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

pub const NOTICE_TTL: Duration = Duration::from_secs(3);
const MAX_NOTICES: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: NoticeSeverity,
    pub message: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push_at(NoticeSeverity::Info, message, Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push_at(NoticeSeverity::Error, message, Instant::now());
    }

    pub fn push_at(&mut self, severity: NoticeSeverity, message: impl Into<String>, now: Instant) {
        let message = message.into();
        // Repeated failures refresh the existing notice instead of stacking.
        self.queue
            .retain(|notice| notice.severity != severity || notice.message != message);
        if self.queue.len() == MAX_NOTICES {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            severity,
            message,
            expires_at: now + NOTICE_TTL,
        });
    }

    /// Drops expired notices and returns the time until the next expiry.
    pub fn prune(&mut self, now: Instant) -> Option<Duration> {
        self.queue.retain(|notice| notice.expires_at > now);
        self.queue
            .iter()
            .map(|notice| notice.expires_at - now)
            .min()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/notices_tests.rs"]
mod tests;
