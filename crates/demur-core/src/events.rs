//! Ledger event records.
//!
//! Every state change appends exactly the events listed here, in order.
//! Each record carries both the token-unit amount and the share delta so the
//! full share ledger can be reconstructed from the event log alone, without
//! replaying decay math.

use serde::{Deserialize, Serialize};

use crate::types::Address;

/// An observable record of a single ledger state change.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Principal or fee leg of a transfer, or the null-counterparty leg of a
    /// mint (`from == ZERO`) or redeem (`to == ZERO`).
    Transfer {
        from: Address,
        to: Address,
        /// Token-unit amount at the decay factor in effect.
        amount: u64,
        /// Share delta applied to both accounts.
        shares: u64,
    },
    /// Allowance overwritten (never incremented).
    Approval {
        owner: Address,
        spender: Address,
        amount: u64,
    },
    /// Backing asset exchanged for freshly credited shares.
    Minted {
        account: Address,
        /// Backing-asset units pulled from the account.
        asset_in: u64,
        /// Flat fee routed to the fee recipient, in asset units.
        fee: u64,
        /// Token units credited at the snapshot decay factor.
        tokens: u64,
        shares: u64,
    },
    /// Shares burned in exchange for backing asset.
    Redeemed {
        account: Address,
        tokens: u64,
        shares: u64,
        /// Backing-asset units paid to the account, net of fee.
        asset_out: u64,
        fee: u64,
    },
    /// Decay-freed backing asset routed to the sink during reconciliation.
    SurplusBurned { amount: u64 },
    /// Operator changed the mint price.
    PriceUpdated { old: u64, new: u64 },
    /// Operator changed the fee recipient.
    FeeRecipientUpdated { old: Address, new: Address },
    /// Operator role handed over.
    OperatorTransferred { old: Address, new: Address },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip() {
        let ev = Event::Minted {
            account: Address([1; 20]),
            asset_in: 100_000_000,
            fee: 10_000,
            tokens: 2_697_329,
            shares: 2_697_329,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("\"kind\":\"minted\""));
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ev);
    }
}
