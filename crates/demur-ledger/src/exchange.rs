//! Exchange engine: mint, redeem, previews, and reserve reconciliation.
//!
//! Minting pulls backing asset from the caller and credits freshly created
//! shares at the current decay factor; redemption burns shares and pays
//! backing asset out of custody. Both charge the flat fee and hold the
//! reentrancy guard for their full duration.
//!
//! Ordering inside each operation is fixed: validate and compute everything
//! from one snapshot, perform the external backing-asset calls, and only
//! then commit local share state. A failed external call therefore leaves
//! the ledger exactly as it was.

use demur_core::asset::BackingAsset;
use demur_core::constants::{DECAY_DENOM, FLAT_FEE, TOKEN};
use demur_core::error::LedgerError;
use demur_core::events::Event;
use demur_core::types::Address;

use crate::guard::OpGuard;
use crate::ledger::Ledger;

impl Ledger {
    // ------------------------------------------------------------------
    // Previews
    // ------------------------------------------------------------------

    /// Token units a deposit of `asset_amount` would mint at the current
    /// price. Zero if the deposit does not clear the flat fee.
    pub fn preview_mint(&self, asset_amount: u64) -> Result<u64, LedgerError> {
        if asset_amount <= FLAT_FEE {
            return Ok(0);
        }
        Self::tokens_for_asset(asset_amount - FLAT_FEE, self.mint_price())
    }

    /// Backing-asset units redeeming `token_amount` would pay out at the
    /// current price, net of the flat fee. Zero if the gross value does not
    /// clear the fee.
    pub fn preview_redeem(&self, token_amount: u64) -> Result<u64, LedgerError> {
        let gross = Self::asset_for_tokens(token_amount, self.mint_price())?;
        if gross <= FLAT_FEE {
            return Ok(0);
        }
        Ok(gross - FLAT_FEE)
    }

    // ------------------------------------------------------------------
    // Mint
    // ------------------------------------------------------------------

    /// Exchange `asset_amount` of backing asset for freshly minted tokens.
    ///
    /// Pulls the full deposit into custody, routes the flat fee to the fee
    /// recipient, and credits the caller with shares converted at the
    /// current decay factor. Returns the token units minted.
    pub fn mint(
        &mut self,
        asset: &mut dyn BackingAsset,
        caller: Address,
        asset_amount: u64,
    ) -> Result<u64, LedgerError> {
        let _guard = OpGuard::acquire(self.in_flight.clone())?;

        if caller.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }
        if asset_amount <= FLAT_FEE {
            return Err(LedgerError::AmountBelowFee { amount: asset_amount, fee: FLAT_FEE });
        }

        let factor = self.factor_now()?;
        let tokens = Self::tokens_for_asset(asset_amount - FLAT_FEE, self.mint_price())?;
        if tokens == 0 {
            return Err(LedgerError::ZeroTokensOut);
        }
        let shares = Self::to_shares(tokens, factor)?;
        let new_total = self
            .total_shares()
            .checked_add(shares)
            .ok_or(LedgerError::ValueOverflow)?;

        // External effects. The pull must land before the fee can be routed
        // out of custody; if the fee leg fails, return the pull so a failed
        // mint leaves the caller whole.
        let custody = self.address();
        let fee_recipient = self.fee_recipient();
        asset.transfer_from(caller, custody, asset_amount)?;
        if let Err(fee_err) = asset.transfer(fee_recipient, FLAT_FEE) {
            asset.transfer(caller, asset_amount)?;
            return Err(fee_err.into());
        }

        // Commit.
        self.credit_shares(caller, shares);
        self.set_total_shares(new_total);
        self.emit(Event::Minted {
            account: caller,
            asset_in: asset_amount,
            fee: FLAT_FEE,
            tokens,
            shares,
        });
        self.emit(Event::Transfer { from: Address::ZERO, to: caller, amount: tokens, shares });
        tracing::info!(%caller, asset_in = asset_amount, tokens, shares, "mint");
        Ok(tokens)
    }

    // ------------------------------------------------------------------
    // Redeem
    // ------------------------------------------------------------------

    /// Burn `token_amount` of the caller's decayed balance for backing
    /// asset, net of the flat fee. Runs reserve reconciliation against the
    /// post-burn share total before anything is paid out. Returns the
    /// backing-asset units paid to the caller.
    pub fn redeem(
        &mut self,
        asset: &mut dyn BackingAsset,
        caller: Address,
        token_amount: u64,
    ) -> Result<u64, LedgerError> {
        let _guard = OpGuard::acquire(self.in_flight.clone())?;

        if caller.is_zero() {
            return Err(LedgerError::ZeroAddress);
        }

        let factor = self.factor_now()?;
        let caller_shares = self.share_count(caller);
        let have = Self::to_balance(caller_shares, factor);
        if have < token_amount {
            return Err(LedgerError::InsufficientBalance { have, need: token_amount });
        }

        let gross = Self::asset_for_tokens(token_amount, self.mint_price())?;
        if gross <= FLAT_FEE {
            return Err(LedgerError::AmountBelowFee { amount: gross, fee: FLAT_FEE });
        }
        let payout = gross - FLAT_FEE;

        let burn_shares = Self::to_shares(token_amount, factor)?;
        if caller_shares < burn_shares {
            return Err(LedgerError::InsufficientShares {
                have: caller_shares,
                need: burn_shares,
            });
        }
        let remaining_total = self
            .total_shares()
            .checked_sub(burn_shares)
            .ok_or(LedgerError::ValueOverflow)?;

        // Reconciliation: compare the custody balance to the value still
        // owed to the remaining shareholders at this snapshot. Anything
        // above that (plus this redemption's own outflows) was freed by
        // decay and is burned to the sink.
        let theoretical = Self::theoretical_reserve(remaining_total, self.mint_price(), factor)?;
        let actual = asset.balance_of(self.address());
        let owed = theoretical
            .checked_add(payout)
            .and_then(|v| v.checked_add(FLAT_FEE))
            .ok_or(LedgerError::ValueOverflow)?;
        let surplus = actual.saturating_sub(owed);

        // Every outflow must be covered before the first external call, so
        // a well-behaved asset cannot fail halfway through the sequence.
        let outflow = payout
            .checked_add(FLAT_FEE)
            .and_then(|v| v.checked_add(surplus))
            .ok_or(LedgerError::ValueOverflow)?;
        if actual < outflow {
            return Err(LedgerError::InsufficientReserve { have: actual, need: outflow });
        }

        // External effects: sink first, then fee, then the caller.
        if surplus > 0 {
            asset.transfer(Address::SINK, surplus)?;
        }
        let fee_recipient = self.fee_recipient();
        asset.transfer(fee_recipient, FLAT_FEE)?;
        asset.transfer(caller, payout)?;

        // Commit.
        self.set_share_count(caller, caller_shares - burn_shares);
        self.set_total_shares(remaining_total);
        if surplus > 0 {
            self.emit(Event::SurplusBurned { amount: surplus });
        }
        self.emit(Event::Redeemed {
            account: caller,
            tokens: token_amount,
            shares: burn_shares,
            asset_out: payout,
            fee: FLAT_FEE,
        });
        self.emit(Event::Transfer {
            from: caller,
            to: Address::ZERO,
            amount: token_amount,
            shares: burn_shares,
        });
        tracing::info!(%caller, tokens = token_amount, asset_out = payout, surplus, "redeem");
        Ok(payout)
    }

    // ------------------------------------------------------------------
    // Exchange arithmetic
    // ------------------------------------------------------------------

    /// `net_asset * TOKEN / price`, truncating.
    fn tokens_for_asset(net_asset: u64, price: u64) -> Result<u64, LedgerError> {
        let tokens = net_asset as u128 * TOKEN as u128 / price as u128;
        u64::try_from(tokens).map_err(|_| LedgerError::ValueOverflow)
    }

    /// `tokens * price / TOKEN`, truncating.
    fn asset_for_tokens(tokens: u64, price: u64) -> Result<u64, LedgerError> {
        let gross = tokens as u128 * price as u128 / TOKEN as u128;
        u64::try_from(gross).map_err(|_| LedgerError::ValueOverflow)
    }

    /// Backing-asset value still owed to `total_shares` at the given price
    /// and factor: `total_shares * price * factor / (DECAY_DENOM * TOKEN)`.
    fn theoretical_reserve(
        total_shares: u64,
        price: u64,
        factor: u64,
    ) -> Result<u64, LedgerError> {
        let numerator = (total_shares as u128)
            .checked_mul(price as u128)
            .and_then(|v| v.checked_mul(factor as u128))
            .ok_or(LedgerError::ValueOverflow)?;
        let reserve = numerator / (DECAY_DENOM as u128 * TOKEN as u128);
        u64::try_from(reserve).map_err(|_| LedgerError::ValueOverflow)
    }
}
