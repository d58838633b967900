//! # demur-core — Core types and traits for the Demur ledger.
//!
//! Defines the shared vocabulary of the workspace:
//! - [`types::Address`] — opaque account identifiers (null and sink sentinels)
//! - [`constants`] — the fixed, observable protocol parameters
//! - [`error`] — per-domain error enums
//! - [`events::Event`] — the append-only record emitted by every state change
//! - [`clock::Clock`] — the wall-clock seam that makes decay testable
//! - [`asset::BackingAsset`] — the minimal consumed stable-asset interface
//! - [`traits::DecaySchedule`] — the decay-math seam (demur-decay implements)

pub mod asset;
pub mod clock;
pub mod constants;
pub mod error;
pub mod events;
pub mod traits;
pub mod types;

pub use asset::{BackingAsset, MemoryAsset};
pub use clock::{Clock, ManualClock, SystemClock};
pub use events::Event;
pub use types::Address;
