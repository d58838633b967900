//! Account identifiers.
//!
//! An [`Address`] is an opaque 20-byte identifier. Two sentinels are part of
//! the protocol: [`Address::ZERO`] (the null address, used as the mint/burn
//! counterparty in transfer records and rejected as a real participant) and
//! [`Address::SINK`] (the well-known unspendable account that receives
//! decay-freed backing asset during reconciliation).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AddressError;

/// A 20-byte opaque account identifier.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null address. Used as the from/to leg of mint and burn records;
    /// never a valid transfer participant.
    pub const ZERO: Self = Self([0u8; 20]);

    /// The burn sink. A fixed identifier with no corresponding key; backing
    /// asset sent here is permanently out of circulation.
    pub const SINK: Self = Self([0xde; 20]);

    /// Create an address from raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check whether this is the null address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(hex_part).map_err(|_| AddressError::InvalidHex)?;
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength)?;
        Ok(Self(arr))
    }
}
