//! TTL cache with an injected clock.
//!
//! Constructed once at engine startup; `invalidate` is the explicit hook
//! fired on catalog mutation. The injected clock keeps expiry deterministic
//! in tests.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// The real clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Single-slot cache that re-runs its loader after `ttl` elapses or after
/// an explicit `invalidate`.
pub struct TtlCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<(Instant, Arc<T>)>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        TtlCache {
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached value, loading it when absent or expired.
    pub fn get_with(&self, load: impl FnOnce() -> T) -> Arc<T> {
        let now = self.clock.now();
        let mut slot = self.slot.lock().unwrap();
        if let Some((loaded_at, value)) = slot.as_ref() {
            if now.duration_since(*loaded_at) <= self.ttl {
                return Arc::clone(value);
            }
        }
        let value = Arc::new(load());
        *slot = Some((now, Arc::clone(&value)));
        value
    }

    pub fn invalidate(&self) {
        *self.slot.lock().unwrap() = None;
    }
}
