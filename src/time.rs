//! Cached monotonic-ish clock for TLRU expiry checks.
//!
//! An atomic nanosecond counter refreshed on a short tick, so a hot
//! `get()` path never pays for a syscall. The ticker runs on a plain OS
//! thread rather than a tokio task, since the LRU core must stay usable
//! without an async runtime, unlike the loading dictionary.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Once;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

static NOW_NANOS: AtomicI64 = AtomicI64::new(0);
static START: Once = Once::new();

const TICK: Duration = Duration::from_millis(20);

fn wall_clock_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos() as i64
}

/// Starts the background ticker, if it isn't already running.
///
/// Idempotent and cheap to call from every TLRU-enabled cache's
/// constructor; only the first call spawns a thread.
pub fn ensure_started() {
    START.call_once(|| {
        NOW_NANOS.store(wall_clock_nanos(), Ordering::Relaxed);
        std::thread::Builder::new()
            .name("shardcache-clock".into())
            .spawn(|| loop {
                std::thread::sleep(TICK);
                NOW_NANOS.store(wall_clock_nanos(), Ordering::Relaxed);
            })
            .expect("failed to spawn shardcache clock thread");
    });
}

/// Returns the cached current time as Unix nanoseconds.
pub fn now_nanos() -> i64 {
    NOW_NANOS.load(Ordering::Relaxed)
}
