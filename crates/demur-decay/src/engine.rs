//! Decay engine implementing the [`DecaySchedule`] trait.
//!
//! Computes the compound decay factor `(DECAY_RATE / DECAY_DENOM)^periods`
//! with binary exponentiation over integers. Intermediates are renormalized
//! by `DECAY_DENOM` at every step, so values never grow beyond a single
//! fixed-point multiply; u128 intermediates make overflow structurally
//! impossible, but the multiplications stay checked anyway.

use demur_core::constants::{DECAY_DENOM, DECAY_RATE, MAX_PERIODS};
use demur_core::error::DecayError;
use demur_core::traits::DecaySchedule;

/// The production decay schedule: 0.9999 retention per period, compounded,
/// clamped at [`MAX_PERIODS`].
///
/// Stateless; the factor is a pure function of the period count.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecayEngine;

impl DecayEngine {
    /// Create a new DecayEngine.
    pub fn new() -> Self {
        Self
    }
}

/// Fixed-point exponentiation: computes `(base/precision)^exp` in fixed-point.
///
/// Uses binary exponentiation for O(log n) multiplications. Each multiply
/// truncates toward zero after renormalizing by `precision`, so the result
/// is a slight under-approximation (at most ~1 unit lost per step).
fn fixed_pow(base: u64, exp: u64, precision: u64) -> Result<u64, DecayError> {
    if exp == 0 {
        return Ok(precision); // (base/precision)^0 = 1.0
    }

    let p = precision as u128;
    let mut result: u128 = p;
    let mut b: u128 = base as u128;
    let mut e = exp;

    while e > 0 {
        if e & 1 == 1 {
            result = result
                .checked_mul(b)
                .ok_or(DecayError::ArithmeticOverflow)?
                / p;
        }
        e >>= 1;
        if e > 0 {
            b = b
                .checked_mul(b)
                .ok_or(DecayError::ArithmeticOverflow)?
                / p;
        }
    }

    Ok(result as u64)
}

impl DecaySchedule for DecayEngine {
    fn factor_for_periods(&self, periods: u64) -> Result<u64, DecayError> {
        // Clamp rather than keep compounding: decay has a deliberate floor.
        let periods = periods.min(MAX_PERIODS);
        fixed_pow(DECAY_RATE, periods, DECAY_DENOM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demur_core::constants::PERIOD_SECS;
    use proptest::prelude::*;

    fn factor(periods: u64) -> u64 {
        DecayEngine::new().factor_for_periods(periods).unwrap()
    }

    // --- pinned values (truncating division, exact) ---

    #[test]
    fn factor_zero_periods_is_one() {
        assert_eq!(factor(0), DECAY_DENOM);
    }

    #[test]
    fn factor_small_periods_exact() {
        assert_eq!(factor(1), 9_999);
        assert_eq!(factor(2), 9_998);
        assert_eq!(factor(3), 9_997);
        assert_eq!(factor(4), 9_996);
        assert_eq!(factor(5), 9_995);
        assert_eq!(factor(6), 9_994);
    }

    #[test]
    fn factor_ten_periods() {
        // 0.9999^10 = 0.99900044... -> 9990
        assert_eq!(factor(10), 9_990);
    }

    #[test]
    fn factor_decreasing_over_period_ladder() {
        let ladder = [0, 1, 2, 3, 4, 5, 10, 100, 1_000, 5_000, 10_000];
        for pair in ladder.windows(2) {
            assert!(
                factor(pair[1]) < factor(pair[0]),
                "factor({}) = {} not below factor({}) = {}",
                pair[1],
                factor(pair[1]),
                pair[0],
                factor(pair[0]),
            );
        }
    }

    #[test]
    fn factor_at_cap_near_inverse_e() {
        // 0.9999^10000 ~ e^-1 ~ 0.3679; renormalization truncation pulls the
        // computed value slightly low.
        let capped = factor(MAX_PERIODS);
        assert!(
            capped > 3_600 && capped <= 3_679,
            "factor at cap: {capped}"
        );
    }

    #[test]
    fn factor_clamps_beyond_cap() {
        let capped = factor(MAX_PERIODS);
        assert_eq!(factor(MAX_PERIODS + 1), capped);
        assert_eq!(factor(u64::MAX), capped);
    }

    // --- elapsed-time entry points (trait defaults) ---

    #[test]
    fn periods_truncate() {
        let e = DecayEngine::new();
        assert_eq!(e.periods_elapsed(0), 0);
        assert_eq!(e.periods_elapsed(PERIOD_SECS - 1), 0);
        assert_eq!(e.periods_elapsed(PERIOD_SECS), 1);
        assert_eq!(e.periods_elapsed(3 * PERIOD_SECS + 299_999), 3);
    }

    #[test]
    fn decay_factor_from_elapsed_seconds() {
        let e = DecayEngine::new();
        assert_eq!(e.decay_factor(0).unwrap(), DECAY_DENOM);
        assert_eq!(e.decay_factor(PERIOD_SECS - 1).unwrap(), DECAY_DENOM);
        assert_eq!(e.decay_factor(PERIOD_SECS).unwrap(), 9_999);
        assert_eq!(e.decay_factor(10 * PERIOD_SECS).unwrap(), 9_990);
    }

    // --- fixed_pow ---

    #[test]
    fn fixed_pow_zero_exponent() {
        assert_eq!(fixed_pow(5_000, 0, DECAY_DENOM).unwrap(), DECAY_DENOM);
    }

    #[test]
    fn fixed_pow_one_exponent() {
        assert_eq!(fixed_pow(8_500, 1, DECAY_DENOM).unwrap(), 8_500);
    }

    #[test]
    fn fixed_pow_squares_correctly() {
        // 0.8^2 = 0.64
        assert_eq!(fixed_pow(8_000, 2, DECAY_DENOM).unwrap(), 6_400);
    }

    #[test]
    fn fixed_pow_cubes_correctly() {
        // 0.9^3 = 0.729
        assert_eq!(fixed_pow(9_000, 3, DECAY_DENOM).unwrap(), 7_290);
    }

    #[test]
    fn fixed_pow_full_precision() {
        // 1.0^anything = 1.0
        assert_eq!(
            fixed_pow(DECAY_DENOM, 1_000_000, DECAY_DENOM).unwrap(),
            DECAY_DENOM
        );
    }

    #[test]
    fn fixed_pow_zero_base() {
        assert_eq!(fixed_pow(0, 100, DECAY_DENOM).unwrap(), 0);
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn factor_bounded(periods in 0u64..=100_000) {
            let f = factor(periods);
            // The clamp keeps the factor well away from zero (~0.36 at cap).
            prop_assert!(f > 3_000, "factor {f} too low at {periods}");
            prop_assert!(f <= DECAY_DENOM, "factor {f} above one at {periods}");
        }

        #[test]
        fn factor_decreases_over_gap(periods in 0u64..(MAX_PERIODS - 256)) {
            // 256 periods shave ~2.5% off the factor, far more than the
            // worst-case renormalization truncation jitter.
            let near = factor(periods);
            let far = factor(periods + 256);
            prop_assert!(far < near, "factor({}) = {} not below factor({}) = {}",
                periods + 256, far, periods, near);
        }
    }
}
