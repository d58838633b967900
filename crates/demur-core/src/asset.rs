//! Backing-asset interface and in-memory reference implementation.
//!
//! The ledger consumes an external stable asset through the minimal
//! [`BackingAsset`] trait. Every call is fallible and any failure aborts the
//! enclosing ledger operation. [`MemoryAsset`] is the in-memory
//! implementation used by tests and the simulation CLI; production
//! deployments adapt a real asset system behind the same trait.

use std::collections::HashMap;

use crate::error::AssetError;
use crate::types::Address;

/// Minimal consumed interface of the external stable asset.
///
/// `transfer` spends from the ledger's own custody account; `transfer_from`
/// pulls from a third-party account (the host environment is assumed to have
/// authorized the ledger as a spender). Implementations must apply each call
/// atomically: a returned error means no balance moved.
pub trait BackingAsset {
    /// Move `amount` from the ledger's custody account to `to`.
    fn transfer(&mut self, to: Address, amount: u64) -> Result<(), AssetError>;

    /// Move `amount` from `from` to `to` on the ledger's authority.
    fn transfer_from(&mut self, from: Address, to: Address, amount: u64)
        -> Result<(), AssetError>;

    /// Current balance of `account`.
    fn balance_of(&self, account: Address) -> u64;
}

/// In-memory backing asset for tests and simulation.
///
/// Plain balance map, no allowance bookkeeping. Transfers fail only on
/// insufficient funds and are applied atomically.
#[derive(Debug, Clone)]
pub struct MemoryAsset {
    custody: Address,
    balances: HashMap<Address, u64>,
}

impl MemoryAsset {
    /// Create an asset system that treats `custody` as the ledger's account.
    pub fn new(custody: Address) -> Self {
        Self {
            custody,
            balances: HashMap::new(),
        }
    }

    /// Credit `account` with freshly issued asset (test/faucet helper).
    pub fn credit(&mut self, account: Address, amount: u64) {
        *self.balances.entry(account).or_insert(0) += amount;
    }

    fn move_between(&mut self, from: Address, to: Address, amount: u64)
        -> Result<(), AssetError> {
        let have = self.balance_of(from);
        if have < amount {
            return Err(AssetError::TransferFailed { from, to, amount });
        }
        self.balances.insert(from, have - amount);
        *self.balances.entry(to).or_insert(0) += amount;
        Ok(())
    }
}

impl BackingAsset for MemoryAsset {
    fn transfer(&mut self, to: Address, amount: u64) -> Result<(), AssetError> {
        self.move_between(self.custody, to, amount)
    }

    fn transfer_from(&mut self, from: Address, to: Address, amount: u64)
        -> Result<(), AssetError> {
        self.move_between(from, to, amount)
    }

    fn balance_of(&self, account: Address) -> u64 {
        self.balances.get(&account).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTODY: Address = Address([0xCC; 20]);
    const ALICE: Address = Address([1; 20]);
    const BOB: Address = Address([2; 20]);

    #[test]
    fn credit_and_query() {
        let mut asset = MemoryAsset::new(CUSTODY);
        assert_eq!(asset.balance_of(ALICE), 0);
        asset.credit(ALICE, 500);
        assert_eq!(asset.balance_of(ALICE), 500);
    }

    #[test]
    fn transfer_spends_custody() {
        let mut asset = MemoryAsset::new(CUSTODY);
        asset.credit(CUSTODY, 1_000);
        asset.transfer(ALICE, 400).unwrap();
        assert_eq!(asset.balance_of(CUSTODY), 600);
        assert_eq!(asset.balance_of(ALICE), 400);
    }

    #[test]
    fn transfer_from_moves_third_party_funds() {
        let mut asset = MemoryAsset::new(CUSTODY);
        asset.credit(ALICE, 1_000);
        asset.transfer_from(ALICE, BOB, 250).unwrap();
        assert_eq!(asset.balance_of(ALICE), 750);
        assert_eq!(asset.balance_of(BOB), 250);
    }

    #[test]
    fn insufficient_funds_move_nothing() {
        let mut asset = MemoryAsset::new(CUSTODY);
        asset.credit(ALICE, 100);
        let err = asset.transfer_from(ALICE, BOB, 101).unwrap_err();
        assert_eq!(
            err,
            AssetError::TransferFailed { from: ALICE, to: BOB, amount: 101 }
        );
        assert_eq!(asset.balance_of(ALICE), 100);
        assert_eq!(asset.balance_of(BOB), 0);
    }
}
