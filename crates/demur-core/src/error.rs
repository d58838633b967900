//! Error types for the Demur ledger.
use thiserror::Error;

use crate::types::Address;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecayError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid hex")] InvalidHex,
    #[error("invalid length")] InvalidLength,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    #[error("asset transfer of {amount} from {from} to {to} failed")]
    TransferFailed { from: Address, to: Address, amount: u64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("null address")] ZeroAddress,
    #[error("amount {amount} must cover fee {fee}")] AmountBelowFee { amount: u64, fee: u64 },
    #[error("amount too small: zero tokens out")] ZeroTokensOut,
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: u64, need: u64 },
    #[error("insufficient shares: have {have}, need {need}")] InsufficientShares { have: u64, need: u64 },
    #[error("insufficient allowance: have {have}, need {need}")] InsufficientAllowance { have: u64, need: u64 },
    #[error("insufficient reserve: have {have}, need {need}")] InsufficientReserve { have: u64, need: u64 },
    #[error("price must be positive")] ZeroPrice,
    #[error("caller is not the operator")] NotOperator,
    #[error("reentrant call")] ReentrantCall,
    #[error("value overflow")] ValueOverflow,
    #[error(transparent)] Decay(#[from] DecayError),
    #[error(transparent)] Asset(#[from] AssetError),
}

#[derive(Error, Debug)]
pub enum DemurError {
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Decay(#[from] DecayError),
    #[error(transparent)] Asset(#[from] AssetError),
    #[error(transparent)] Address(#[from] AddressError),
}
