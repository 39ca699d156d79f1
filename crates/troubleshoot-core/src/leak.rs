//! Process-wide retained memory for the LEAK fault
//!
//! Entries are appended and never removed. The global set lives until the
//! process exits.

use chrono::Utc;
use once_cell::sync::Lazy;
use parking_lot::Mutex;

/// Number of timestamps retained per LEAK invocation
pub const LEAK_BATCH: usize = 1_000_000;

static GLOBAL: Lazy<LeakedObjectSet> = Lazy::new(LeakedObjectSet::new);

/// Append-only sequence of timestamps (milliseconds since the Unix epoch)
#[derive(Debug, Default)]
pub struct LeakedObjectSet {
    inner: Mutex<Vec<i64>>,
}

impl LeakedObjectSet {
    /// Empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The set shared by every bean in this process
    #[must_use]
    pub fn global() -> &'static LeakedObjectSet {
        &GLOBAL
    }

    /// Append `count` timestamps and return the new length
    ///
    /// The batch is built before taking the lock and lands contiguously.
    pub fn retain_timestamps(&self, count: usize) -> usize {
        let mut batch = Vec::with_capacity(count);
        batch.extend((0..count).map(|_| Utc::now().timestamp_millis()));

        let mut guard = self.inner.lock();
        guard.extend(batch);
        guard.len()
    }

    /// Number of retained timestamps
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether nothing has been retained yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Most recently retained timestamp
    #[must_use]
    pub fn last(&self) -> Option<i64> {
        self.inner.lock().last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn retains_exact_count() {
        let set = LeakedObjectSet::new();
        assert!(set.is_empty());
        assert_eq!(set.retain_timestamps(10), 10);
        assert_eq!(set.retain_timestamps(5), 15);
        assert_eq!(set.len(), 15);
        assert!(set.last().unwrap() > 0);
    }

    #[test]
    fn concurrent_appends_are_not_lost() {
        let set = Arc::new(LeakedObjectSet::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = Arc::clone(&set);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        s.retain_timestamps(10);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(set.len(), 8 * 100 * 10);
    }

    #[test]
    fn global_is_a_singleton() {
        assert!(std::ptr::eq(LeakedObjectSet::global(), LeakedObjectSet::global()));
    }
}
