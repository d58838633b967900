//! The share ledger: account state, decayed balances, transfers, and the
//! operator surface.
//!
//! Internally every account holds *shares*, a non-decaying unit. The
//! externally visible balance is `shares * factor / DECAY_DENOM` at the
//! current decay factor, so decay costs nothing to apply: it is derived, not
//! stored. Shares only move; they are created by mint and destroyed by
//! redeem (see the exchange module).
//!
//! Every operation takes exactly one decay-factor snapshot and reuses it for
//! all conversions within that operation, so rounding is consistent across a
//! single transfer.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use demur_core::clock::Clock;
use demur_core::constants::{
    DECAY_DENOM, DECIMALS, FLAT_FEE, TOKEN_NAME, TOKEN_SYMBOL, UNLIMITED_ALLOWANCE,
};
use demur_core::error::LedgerError;
use demur_core::events::Event;
use demur_core::traits::DecaySchedule;
use demur_core::types::Address;
use demur_decay::DecayEngine;

/// The demurrage-token ledger: a single owned aggregate holding all mutable
/// state. Methods are the only mutation path; there are no ambient globals.
pub struct Ledger {
    /// The ledger's own custody account in the backing-asset system.
    address: Address,
    /// Privileged identity for price and fee-recipient updates.
    operator: Address,
    /// Immutable timestamp decay is measured from.
    genesis_time: u64,
    /// Backing-asset units per whole token. Operator-mutable, always > 0.
    mint_price: u64,
    /// Receiver of every flat fee. Always non-null.
    fee_recipient: Address,
    /// Per-account share counts. Accounts spring into existence on first
    /// credit; a missing entry means zero.
    shares: HashMap<Address, u64>,
    /// Sum of all entries in `shares`, maintained by every mutation.
    total_shares: u64,
    /// (owner, spender) -> token-unit spending limit. Not decay-adjusted.
    allowances: HashMap<(Address, Address), u64>,
    /// In-progress flag for the mint/redeem reentrancy guard.
    pub(crate) in_flight: Arc<AtomicBool>,
    /// Append-only record of every state change.
    events: Vec<Event>,
    clock: Arc<dyn Clock>,
    schedule: Arc<dyn DecaySchedule>,
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("address", &self.address)
            .field("operator", &self.operator)
            .field("genesis_time", &self.genesis_time)
            .field("mint_price", &self.mint_price)
            .field("fee_recipient", &self.fee_recipient)
            .field("shares", &self.shares)
            .field("total_shares", &self.total_shares)
            .field("allowances", &self.allowances)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl Ledger {
    /// Create a ledger at genesis. `address` is the custody account in the
    /// backing-asset system; `operator` is the deployer.
    pub fn new(
        address: Address,
        operator: Address,
        mint_price: u64,
        fee_recipient: Address,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        Self::with_schedule(
            address,
            operator,
            mint_price,
            fee_recipient,
            clock,
            Arc::new(DecayEngine::new()),
        )
    }

    /// Create a ledger with an explicit decay schedule.
    pub fn with_schedule(
        address: Address,
        operator: Address,
        mint_price: u64,
        fee_recipient: Address,
        clock: Arc<dyn Clock>,
        schedule: Arc<dyn DecaySchedule>,
    ) -> Result<Self, LedgerError> {
        if address.is_zero() || operator.is_zero() || fee_recipient.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if mint_price == 0 {
            return Err(LedgerError::ZeroPrice);
        }
        let genesis_time = clock.now_unix();
        tracing::info!(%address, %operator, mint_price, genesis_time, "ledger created");
        Ok(Self {
            address,
            operator,
            genesis_time,
            mint_price,
            fee_recipient,
            shares: HashMap::new(),
            total_shares: 0,
            allowances: HashMap::new(),
            in_flight: Arc::new(AtomicBool::new(false)),
            events: Vec::new(),
            clock,
            schedule,
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    /// The ledger's custody account in the backing-asset system.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    pub fn genesis_time(&self) -> u64 {
        self.genesis_time
    }

    pub fn mint_price(&self) -> u64 {
        self.mint_price
    }

    pub fn fee_recipient(&self) -> Address {
        self.fee_recipient
    }

    /// Raw share count of an account (diagnostic; not decay-adjusted).
    pub fn shares_of(&self, account: Address) -> u64 {
        self.share_count(account)
    }

    /// Total shares outstanding (diagnostic).
    pub fn total_shares(&self) -> u64 {
        self.total_shares
    }

    /// Whole decay periods elapsed since genesis.
    pub fn periods_elapsed(&self) -> u64 {
        self.schedule.periods_elapsed(self.elapsed())
    }

    /// Current decay factor, scaled by [`DECAY_DENOM`].
    pub fn current_decay_factor(&self) -> Result<u64, LedgerError> {
        self.factor_now()
    }

    /// Decayed balance of an account at the current factor.
    pub fn balance_of(&self, account: Address) -> Result<u64, LedgerError> {
        Ok(Self::to_balance(self.share_count(account), self.factor_now()?))
    }

    /// Total decayed supply at the current factor.
    pub fn total_supply(&self) -> Result<u64, LedgerError> {
        Ok(Self::to_balance(self.total_shares, self.factor_now()?))
    }

    /// Remaining token-unit allowance granted by `owner` to `spender`.
    pub fn allowance(&self, owner: Address, spender: Address) -> u64 {
        self.allowances.get(&(owner, spender)).copied().unwrap_or(0)
    }

    /// Convert a share count to a decayed balance at the current factor.
    pub fn shares_to_balance(&self, shares: u64) -> Result<u64, LedgerError> {
        Ok(Self::to_balance(shares, self.factor_now()?))
    }

    /// Convert a decayed balance to a share count at the current factor.
    pub fn balance_to_shares(&self, balance: u64) -> Result<u64, LedgerError> {
        let factor = self.factor_now()?;
        Self::to_shares(balance, factor)
    }

    /// The event log since genesis, in emission order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    // ------------------------------------------------------------------
    // Transfers and allowances
    // ------------------------------------------------------------------

    /// Move `amount` token units from `from` to `to`, charging the flat fee
    /// to `from` in favor of the fee recipient. Total shares are unchanged.
    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if from.is_zero() || to.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        // One snapshot for the whole operation: principal and fee round
        // against the same factor.
        let factor = self.factor_now()?;
        let need = amount
            .checked_add(FLAT_FEE)
            .ok_or(LedgerError::ValueOverflow)?;

        let from_shares = self.share_count(from);
        let have = Self::to_balance(from_shares, factor);
        if have < need {
            return Err(LedgerError::InsufficientBalance { have, need });
        }

        let amount_shares = Self::to_shares(amount, factor)?;
        let fee_shares = Self::to_shares(FLAT_FEE, factor)?;
        let debit = amount_shares
            .checked_add(fee_shares)
            .ok_or(LedgerError::ValueOverflow)?;
        if from_shares < debit {
            return Err(LedgerError::InsufficientShares {
                have: from_shares,
                need: debit,
            });
        }

        let recipient = self.fee_recipient;
        self.shares.insert(from, from_shares - debit);
        self.credit_shares(to, amount_shares);
        self.credit_shares(recipient, fee_shares);

        self.emit(Event::Transfer { from, to, amount, shares: amount_shares });
        self.emit(Event::Transfer {
            from,
            to: recipient,
            amount: FLAT_FEE,
            shares: fee_shares,
        });
        tracing::debug!(%from, %to, amount, fee = FLAT_FEE, "transfer");
        Ok(())
    }

    /// Set `spender`'s allowance over `owner`'s tokens. Overwrite semantics:
    /// the previous value is discarded, never added to. The classic
    /// overwrite race between a spend and a re-approval is inherited from
    /// the standard allowance model and intentionally left as is.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if owner.is_zero() || spender.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        self.allowances.insert((owner, spender), amount);
        self.emit(Event::Approval { owner, spender, amount });
        tracing::debug!(%owner, %spender, amount, "approval");
        Ok(())
    }

    /// Transfer on behalf of `from`, spending `spender`'s allowance.
    /// An allowance of [`UNLIMITED_ALLOWANCE`] is never decremented.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let allowed = self.allowance(from, spender);
        if allowed != UNLIMITED_ALLOWANCE && allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                have: allowed,
                need: amount,
            });
        }
        self.transfer(from, to, amount)?;
        // Decrement only after the transfer has fully succeeded, so a failed
        // transfer leaves the allowance untouched.
        if allowed != UNLIMITED_ALLOWANCE {
            self.allowances.insert((from, spender), allowed - amount);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Operator surface
    // ------------------------------------------------------------------

    /// Replace the mint price. Effective immediately for all subsequent
    /// previews, mints, and redemptions.
    pub fn update_mint_price(
        &mut self,
        caller: Address,
        new_price: u64,
    ) -> Result<(), LedgerError> {
        self.require_operator(caller)?;
        if new_price == 0 {
            return Err(LedgerError::ZeroPrice);
        }
        let old = std::mem::replace(&mut self.mint_price, new_price);
        self.emit(Event::PriceUpdated { old, new: new_price });
        tracing::info!(old, new = new_price, "mint price updated");
        Ok(())
    }

    /// Replace the fee recipient, effective immediately.
    pub fn set_fee_recipient(
        &mut self,
        caller: Address,
        new_recipient: Address,
    ) -> Result<(), LedgerError> {
        self.require_operator(caller)?;
        if new_recipient.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let old = std::mem::replace(&mut self.fee_recipient, new_recipient);
        self.emit(Event::FeeRecipientUpdated { old, new: new_recipient });
        tracing::info!(%old, %new_recipient, "fee recipient updated");
        Ok(())
    }

    /// Hand the operator role to another account.
    pub fn transfer_operator(
        &mut self,
        caller: Address,
        new_operator: Address,
    ) -> Result<(), LedgerError> {
        self.require_operator(caller)?;
        if new_operator.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        let old = std::mem::replace(&mut self.operator, new_operator);
        self.emit(Event::OperatorTransferred { old, new: new_operator });
        tracing::info!(%old, %new_operator, "operator transferred");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals (shared with the exchange module)
    // ------------------------------------------------------------------

    pub(crate) fn require_operator(&self, caller: Address) -> Result<(), LedgerError> {
        if caller != self.operator {
            return Err(LedgerError::NotOperator);
        }
        Ok(())
    }

    pub(crate) fn elapsed(&self) -> u64 {
        self.clock.now_unix().saturating_sub(self.genesis_time)
    }

    /// One decay-factor snapshot. Callers take this once per operation.
    pub(crate) fn factor_now(&self) -> Result<u64, LedgerError> {
        Ok(self.schedule.decay_factor(self.elapsed())?)
    }

    pub(crate) fn share_count(&self, account: Address) -> u64 {
        self.shares.get(&account).copied().unwrap_or(0)
    }

    pub(crate) fn credit_shares(&mut self, account: Address, amount: u64) {
        *self.shares.entry(account).or_insert(0) += amount;
    }

    pub(crate) fn set_share_count(&mut self, account: Address, amount: u64) {
        self.shares.insert(account, amount);
    }

    pub(crate) fn set_total_shares(&mut self, total: u64) {
        self.total_shares = total;
    }

    pub(crate) fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    /// `shares * factor / DECAY_DENOM`, truncating. Always fits: the factor
    /// never exceeds the denominator.
    pub(crate) fn to_balance(shares: u64, factor: u64) -> u64 {
        (shares as u128 * factor as u128 / DECAY_DENOM as u128) as u64
    }

    /// `balance * DECAY_DENOM / factor`, truncating. Zero if the factor is
    /// zero (fully decayed; unreachable within the period cap, guarded
    /// anyway).
    pub(crate) fn to_shares(balance: u64, factor: u64) -> Result<u64, LedgerError> {
        if factor == 0 {
            return Ok(0);
        }
        let shares = balance as u128 * DECAY_DENOM as u128 / factor as u128;
        u64::try_from(shares).map_err(|_| LedgerError::ValueOverflow)
    }
}
