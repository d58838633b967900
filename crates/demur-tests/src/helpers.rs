//! Test harness: a ledger wired to an in-memory backing asset and a manual
//! clock, with the bookkeeping shared by the integration suites.

use std::collections::HashMap;
use std::sync::Arc;

use demur_core::clock::ManualClock;
use demur_core::events::Event;
use demur_core::types::Address;
use demur_core::{BackingAsset, MemoryAsset};
use demur_ledger::Ledger;

/// Worked-example price: 37.07 backing-asset units per token at 6 decimals.
pub const PRICE: u64 = 37_070_000;

/// Genesis timestamp used by every harness.
pub const GENESIS: u64 = 1_767_225_600;

pub const CUSTODY: Address = Address([0xCC; 20]);
pub const OPERATOR: Address = Address([0x0F; 20]);
pub const FEES: Address = Address([0xFE; 20]);

/// Deterministic throwaway account.
pub fn addr(seed: u8) -> Address {
    Address([seed; 20])
}

/// A ledger, its backing asset, and the clock driving decay.
pub struct Harness {
    pub ledger: Ledger,
    pub asset: MemoryAsset,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_price(PRICE)
    }

    pub fn with_price(price: u64) -> Self {
        let clock = Arc::new(ManualClock::new(GENESIS));
        let ledger = Ledger::new(CUSTODY, OPERATOR, price, FEES, clock.clone())
            .expect("valid genesis parameters");
        Self {
            ledger,
            asset: MemoryAsset::new(CUSTODY),
            clock,
        }
    }

    /// Credit backing asset to an account and mint all of it.
    pub fn fund_and_mint(&mut self, account: Address, asset_amount: u64) -> u64 {
        self.asset.credit(account, asset_amount);
        self.ledger
            .mint(&mut self.asset, account, asset_amount)
            .expect("funded mint succeeds")
    }

    /// Sum of all account balances implied by the custody's view.
    pub fn custody_balance(&self) -> u64 {
        self.asset.balance_of(CUSTODY)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild the share ledger from transfer records alone.
///
/// Mint legs come from the null address, burn legs go to it; everything else
/// moves shares between accounts. Returns the per-account share map and the
/// implied total.
pub fn replay_shares(events: &[Event]) -> (HashMap<Address, u64>, u64) {
    let mut shares: HashMap<Address, u64> = HashMap::new();
    let mut total: u64 = 0;
    for event in events {
        if let Event::Transfer { from, to, shares: delta, .. } = event {
            if !from.is_zero() {
                let entry = shares.entry(*from).or_insert(0);
                *entry = entry
                    .checked_sub(*delta)
                    .expect("replay never over-debits");
            } else {
                total += delta;
            }
            if !to.is_zero() {
                *shares.entry(*to).or_insert(0) += delta;
            } else {
                total -= delta;
            }
        }
    }
    (shares, total)
}
