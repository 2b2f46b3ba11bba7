//! Per-cache request/miss counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Safely divides two integers, returning `0.0` when the denominator is
/// zero instead of panicking.
fn safe_divide(a: u64, b: u64) -> f64 {
    if b == 0 {
        return 0.0;
    }
    a as f64 / b as f64
}

/// Request/miss counters shared by the LRU core and its loading variant.
#[derive(Debug, Default)]
pub struct Counters {
    requests: AtomicU64,
    misses: AtomicU64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn miss_ratio(&self) -> f64 {
        safe_divide(self.misses(), self.requests())
    }

    pub(crate) fn reset(&self) {
        self.requests.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_ratio_is_zero_with_no_requests() {
        let c = Counters::new();
        assert_eq!(c.miss_ratio(), 0.0);
    }

    #[test]
    fn miss_ratio_tracks_hits_and_misses() {
        let c = Counters::new();
        c.record_request();
        c.record_request();
        c.record_miss();
        assert_eq!(c.requests(), 2);
        assert_eq!(c.misses(), 1);
        assert_eq!(c.miss_ratio(), 0.5);
    }

    #[test]
    fn reset_clears_counters() {
        let c = Counters::new();
        c.record_request();
        c.record_miss();
        c.reset();
        assert_eq!(c.requests(), 0);
        assert_eq!(c.misses(), 0);
    }
}
