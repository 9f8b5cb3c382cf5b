//! Bid records, fill pairs and settlement receipts.
//!
//! ## SSZ Serialization
//!
//! `Bid` and `SettlementReceipt` derive `SimpleSerialize` from ssz_rs so
//! that identical sale outcomes always encode to identical bytes. The
//! settlement digest is SHA-256 over the concatenated SSZ encodings of the
//! final fill list, giving a single comparable fingerprint per pool.

use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

// ============================================================================
// Bid
// ============================================================================

/// A sealed-bid order as stored in the arena. Immutable once accepted.
///
/// The implied price is the exact rational `amount1 / amount0`; it is never
/// materialized as a number, all comparisons cross-multiply through `u128`.
///
/// ## SSZ Layout
///
/// Fixed-size container of four u64 fields, 32 bytes total.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Bid {
    /// Raw account id of the bidder.
    pub bidder: u64,

    /// Token0 the bidder asks for.
    pub amount0: u64,

    /// Token1 the bidder escrowed.
    pub amount1: u64,

    /// Arrival sequence within the pool; breaks price ties (earlier wins).
    pub sequence: u64,
}

impl Bid {
    /// Create a bid record.
    pub fn new(bidder: u64, amount0: u64, amount1: u64, sequence: u64) -> Self {
        Self {
            bidder,
            amount0,
            amount1,
            sequence,
        }
    }
}

// ============================================================================
// FilledAmount
// ============================================================================

/// A (token0, token1) pair: what a principal receives, pays or is refunded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, SimpleSerialize)]
pub struct FilledAmount {
    /// Token0 leg.
    pub amount0: u64,
    /// Token1 leg.
    pub amount1: u64,
}

impl FilledAmount {
    /// Construct a fill pair.
    pub fn new(amount0: u64, amount1: u64) -> Self {
        Self { amount0, amount1 }
    }

    /// The all-zero pair (unfilled, fully refunded elsewhere).
    pub fn zero() -> Self {
        Self::default()
    }

    /// True when both legs are zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.amount0 == 0 && self.amount1 == 0
    }
}

// ============================================================================
// SettlementReceipt
// ============================================================================

/// Audit summary of one pool's settlement.
///
/// The digest is SHA-256 over the SSZ encodings of every `(bidder, fill)`
/// in settlement order; two runs that settle identically produce identical
/// receipts. Purely informational, never consulted by the engines.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct SettlementReceipt {
    /// Raw pool id.
    pub pool_id: u64,

    /// Total token0 distributed to buyers.
    pub filled0: u64,

    /// Total token1 owed to the creator (gross of fee).
    pub filled1: u64,

    /// Number of distinct orders in the settlement.
    pub order_count: u64,

    /// SHA-256 digest of the SSZ-encoded fill list.
    pub digest: [u8; 32],
}

impl SettlementReceipt {
    /// Build a receipt from the per-order fill list, in settlement order.
    ///
    /// Orders that filled nothing still contribute to the digest; the
    /// receipt fingerprints the whole outcome, not just the winners.
    pub fn from_fills(pool_id: u64, fills: &[(u64, FilledAmount)]) -> Self {
        let mut hasher = Sha256::new();
        let mut filled0 = 0u64;
        let mut filled1 = 0u64;
        for (bidder, fill) in fills {
            hasher.update(bidder.to_le_bytes());
            // FilledAmount is fixed-size; encoding cannot fail.
            if let Ok(bytes) = ssz_rs::serialize(fill) {
                hasher.update(&bytes);
            }
            filled0 = filled0.saturating_add(fill.amount0);
            filled1 = filled1.saturating_add(fill.amount1);
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        Self {
            pool_id,
            filled0,
            filled1,
            order_count: fills.len() as u64,
            digest,
        }
    }

    /// Digest as a lowercase hex string.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
