//! Protocol constants. All token values are in base units (1 DMR = 10^6 units).
//!
//! These parameters are part of the ledger's observable behavior: the decay
//! schedule, the fixed-point denominator, the flat fee, and the token scale
//! are all fixed at genesis and never change.

/// Length of one decay period in seconds (~3.47 days).
pub const PERIOD_SECS: u64 = 300_000;

/// Fixed-point denominator for the decay factor. A factor of `DECAY_DENOM`
/// means no decay (1.0).
pub const DECAY_DENOM: u64 = 10_000;

/// Per-period retention numerator: each period multiplies value by
/// `DECAY_RATE / DECAY_DENOM` (0.9999).
pub const DECAY_RATE: u64 = 9_999;

/// Compounding cap in periods (~95 years). Elapsed time beyond the cap is
/// clamped; decay does not compound indefinitely.
pub const MAX_PERIODS: u64 = 10_000;

/// Token display decimals.
pub const DECIMALS: u8 = 6;

/// One whole token in base units.
pub const TOKEN: u64 = 1_000_000;

/// Flat fee charged on every mint, redeem, and transfer: 0.01 DMR in token
/// units, or the equivalent in backing-asset units on mint/redeem.
pub const FLAT_FEE: u64 = 10_000;

/// Allowance value treated as unlimited: never decremented by
/// `transfer_from`.
pub const UNLIMITED_ALLOWANCE: u64 = u64::MAX;

pub const TOKEN_NAME: &str = "Demurrage Token";
pub const TOKEN_SYMBOL: &str = "DMR";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_is_one_cent() {
        // 0.01 DMR at 6 decimals.
        assert_eq!(FLAT_FEE, TOKEN / 100);
    }

    #[test]
    fn retention_is_just_below_one() {
        assert_eq!(DECAY_RATE + 1, DECAY_DENOM);
    }

    #[test]
    fn period_cap_spans_decades() {
        // ~95 years of periods before the clamp kicks in.
        let capped_secs = MAX_PERIODS * PERIOD_SECS;
        assert!(capped_secs > 94 * 365 * 86_400);
        assert!(capped_secs < 96 * 365 * 86_400);
    }
}
