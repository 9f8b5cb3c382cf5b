//! Asset, account and pool identifiers.
//!
//! Identifiers are opaque integers. [`AssetId::Native`] is the reserved
//! sentinel for the chain's base coin; everything else is a token id.
//! For SSZ purposes an asset is encoded through its raw `u64` form
//! (0 = native, n+1 = token n).

use std::fmt;

// ============================================================================
// AssetId
// ============================================================================

/// Identifier of a transferable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssetId {
    /// The chain's base coin (the "no token contract" sentinel).
    #[default]
    Native,
    /// A fungible token, identified by an opaque registry index.
    Token(u64),
}

impl AssetId {
    /// Encode to the raw u64 wire form (0 = native, n+1 = token n).
    pub fn to_raw(self) -> u64 {
        match self {
            AssetId::Native => 0,
            AssetId::Token(n) => n + 1,
        }
    }

    /// Decode from the raw u64 wire form.
    pub fn from_raw(raw: u64) -> Self {
        match raw {
            0 => AssetId::Native,
            n => AssetId::Token(n - 1),
        }
    }

    /// Whether this is the base-coin sentinel.
    #[inline]
    pub fn is_native(self) -> bool {
        matches!(self, AssetId::Native)
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetId::Native => write!(f, "native"),
            AssetId::Token(n) => write!(f, "token#{}", n),
        }
    }
}

// ============================================================================
// AccountId / PoolId
// ============================================================================

/// Identifier of a principal (creator, bidder, player, fee sink, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a pool, sequence-assigned by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct PoolId(pub u64);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
