//! Process-wide page scroll lock, held through RAII guards.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Page scrolling is disabled while any [`ScrollLockGuard`] is alive.
#[derive(Debug, Clone, Default)]
pub struct PageScrollLock {
    holders: Arc<AtomicUsize>,
}

impl PageScrollLock {
    pub fn acquire(&self) -> ScrollLockGuard {
        self.holders.fetch_add(1, Ordering::SeqCst);
        ScrollLockGuard {
            holders: Arc::clone(&self.holders),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.holders.load(Ordering::SeqCst) > 0
    }
}

#[derive(Debug)]
pub struct ScrollLockGuard {
    holders: Arc<AtomicUsize>,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.holders.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[path = "tests/scroll_lock_tests.rs"]
mod tests;
