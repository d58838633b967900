//! # demur-decay — Demurrage decay engine.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! Value decays multiplicatively by `DECAY_RATE / DECAY_DENOM` (0.9999) per
//! 300,000-second period, lazily derived from elapsed time since genesis:
//! - **Compound decay**: the factor after `p` periods is `(0.9999)^p` in
//!   fixed point, computed by binary exponentiation with renormalization.
//! - **Compounding cap**: elapsed periods clamp at `MAX_PERIODS` (~95
//!   years); the factor never reaches zero within the cap.
//! - **No stored timestamps**: the schedule depends only on a single genesis
//!   time, so there is no per-account state and no background process.

pub mod engine;

pub use engine::DecayEngine;
