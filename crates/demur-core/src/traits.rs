//! Trait interfaces between crates.
//!
//! [`DecaySchedule`] is the contract between the ledger and the decay math
//! engine (demur-decay implements it). It is deliberately pure: factor
//! computation depends only on elapsed time, so implementations carry no
//! state and are race-free by construction.

use crate::constants::PERIOD_SECS;
use crate::error::DecayError;

/// Pure computation of the multiplicative decay factor.
///
/// The factor is an integer scaled by [`DECAY_DENOM`]: `DECAY_DENOM` means
/// no decay, smaller values mean proportionally less redeemable value per
/// share. Monotonically non-increasing in elapsed time.
///
/// [`DECAY_DENOM`]: crate::constants::DECAY_DENOM
pub trait DecaySchedule: Send + Sync {
    /// Decay factor after `periods` whole periods, scaled by `DECAY_DENOM`.
    ///
    /// `periods == 0` returns `DECAY_DENOM` (factor 1.0). Inputs beyond the
    /// compounding cap are clamped, not rejected.
    fn factor_for_periods(&self, periods: u64) -> Result<u64, DecayError>;

    /// Whole decay periods in `elapsed_secs` (truncating).
    fn periods_elapsed(&self, elapsed_secs: u64) -> u64 {
        elapsed_secs / PERIOD_SECS
    }

    /// Decay factor for a raw elapsed duration.
    fn decay_factor(&self, elapsed_secs: u64) -> Result<u64, DecayError> {
        self.factor_for_periods(self.periods_elapsed(elapsed_secs))
    }
}
