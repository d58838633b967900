//! Scoped reentrancy guard for mint and redeem.
//!
//! Both operations call out to the backing-asset system mid-flight, and that
//! system may call back into the ledger before the original operation
//! finishes. The guard turns any such nested entry into
//! [`LedgerError::ReentrantCall`] and releases on every exit path, including
//! early `?` returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use demur_core::error::LedgerError;

/// RAII acquisition of the ledger's in-progress flag.
///
/// Owns a handle to the flag rather than borrowing it, so the ledger stays
/// freely usable by the operation that holds the guard.
#[derive(Debug)]
pub(crate) struct OpGuard {
    flag: Arc<AtomicBool>,
}

impl OpGuard {
    /// Acquire the flag, failing if an operation is already in flight.
    pub(crate) fn acquire(flag: Arc<AtomicBool>) -> Result<Self, LedgerError> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(LedgerError::ReentrantCall);
        }
        Ok(Self { flag })
    }
}

impl Drop for OpGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}
