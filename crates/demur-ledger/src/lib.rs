//! # demur-ledger — The decay-aware accounting engine.
//!
//! Owns all mutable ledger state as a single [`Ledger`] aggregate: per-account
//! share counts, allowances, the operator-settable mint price, and the fee
//! recipient. Externally visible balances are derived lazily from shares via
//! the decay factor; nothing is stored per account except the share count.
//!
//! Mutating operations are atomic: validation and arithmetic come first,
//! external backing-asset calls next, and local state commits only after
//! every external call has succeeded. Mint and redeem additionally hold a
//! scoped reentrancy guard for their full duration.

mod exchange;
mod guard;
mod ledger;

pub use ledger::Ledger;
