//! Wall-clock seam.
//!
//! Decay is a pure function of elapsed time since genesis, so the only
//! environmental input the ledger needs is "now". [`SystemClock`] is the
//! production source; [`ManualClock`] lets tests advance time
//! deterministically.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the current Unix timestamp in seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        // Pre-1970 system clocks clamp to zero rather than panic.
        chrono::Utc::now().timestamp().max(0) as u64
    }
}

/// Deterministic clock for tests and simulation. Shared via `Arc` so the
/// harness can advance time while the ledger holds a reference.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self(AtomicU64::new(start))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_unix(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}
