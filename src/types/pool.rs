//! Pool records, per-engine terms and the time-window state machine.
//!
//! A pool is the unit of sale: the creator escrows `amount_total0` of
//! `token0` up front and buyers pay in `token1` under the rules of one of
//! four engines. The engine-specific parameters live in [`PoolTerms`]; the
//! fields every engine shares live directly on [`Pool`].
//!
//! ## Time windows
//!
//! Pools move through exactly three phases, derived from the caller-supplied
//! clock (`now`, Unix seconds) and never stored:
//!
//! - `Pending` (`now < open_at`): no participation yet
//! - `Open` (`open_at <= now < close_at`): bids/swaps/bets accepted
//! - `Closed` (`now >= close_at`): settlement and claims only

use crate::error::{PoolError, Result};
use crate::types::asset::{AccountId, AssetId, PoolId};

// ============================================================================
// PoolStatus
// ============================================================================

/// Lifecycle phase of a pool at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolStatus {
    /// Before `open_at`.
    Pending,
    /// Within `[open_at, close_at)`.
    Open,
    /// At or after `close_at`.
    Closed,
}

// ============================================================================
// PoolTerms
// ============================================================================

/// Engine-specific sale parameters. The variant selects the engine.
///
/// All amounts are in the asset's smallest unit, matching the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolTerms {
    /// Ascending clearing auction: every accepted bid must strictly
    /// outbid the last accepted price.
    Ascending {
        /// Ceiling on token1 committed per single bid.
        amount_max1: u64,
        /// Reserve: the first bid's price must be at least
        /// `amount_min1 / amount_total0`.
        amount_min1: u64,
    },
    /// Sealed-bid batch auction settled by price priority at close.
    SealedBid {
        /// Reserve: a bid's price must be at least
        /// `amount_min1 / amount_total0`.
        amount_min1: u64,
        /// Minimum token1 per bid.
        min_amount1_per_bid: u64,
    },
    /// First-come fixed-rate swap at `amount_total1 / amount_total0`.
    FixedSwap {
        /// Total token1 the creator asks for the whole lot.
        amount_total1: u64,
        /// Per-wallet cumulative token1 cap; 0 means unlimited.
        max_amount1_per_wallet: u64,
    },
    /// Lottery: fixed-price tickets, prize split among hash-drawn winners.
    Lottery {
        /// Ticket price in token1.
        amount1: u64,
        /// Hard cap on the number of players.
        max_player: u64,
        /// Entrants per winning share; `winner_count = floor(n / n_share)`.
        n_share: u64,
    },
}

impl PoolTerms {
    /// Short engine label, used in logs and the demo binary.
    pub fn kind(&self) -> &'static str {
        match self {
            PoolTerms::Ascending { .. } => "ascending",
            PoolTerms::SealedBid { .. } => "sealed-bid",
            PoolTerms::FixedSwap { .. } => "fixed-swap",
            PoolTerms::Lottery { .. } => "lottery",
        }
    }
}

// ============================================================================
// CreateReq
// ============================================================================

/// A request to open a new pool, validated by the registry before any
/// assets move.
#[derive(Debug, Clone)]
pub struct CreateReq {
    /// Account opening the pool; receives proceeds and unsold stock.
    pub creator: AccountId,
    /// Asset being sold (escrowed at creation).
    pub token0: AssetId,
    /// Asset buyers pay with.
    pub token1: AssetId,
    /// Total token0 on offer.
    pub amount_total0: u64,
    /// Unix seconds at which participation opens.
    pub open_at: u64,
    /// Window length; `close_at = open_at + duration_seconds`.
    pub duration_seconds: u64,
    /// Require a minimum governance-token balance to participate.
    pub only_bot_holder: bool,
    /// Restrict participation to the pool's access list.
    pub enable_white_list: bool,
    /// Restrict participation to KYC-verified accounts (stand-in: the
    /// same access list gates it).
    pub enable_kyc_list: bool,
    /// Engine selection and parameters.
    pub terms: PoolTerms,
}

impl CreateReq {
    /// Check the structural rules common to all engines plus the
    /// per-engine parameter constraints.
    ///
    /// Window and escrow checks (open_at vs. now, creator balance) are the
    /// registry's job; this only looks at the request itself.
    pub fn validate(&self) -> Result<()> {
        if self.amount_total0 == 0 {
            return Err(PoolError::InvalidTerms("amount_total0 must be positive"));
        }
        if self.duration_seconds == 0 {
            return Err(PoolError::InvalidTerms("duration_seconds must be positive"));
        }
        if self.token0 == self.token1 {
            return Err(PoolError::InvalidTerms("token0 and token1 must differ"));
        }
        if self.open_at.checked_add(self.duration_seconds).is_none() {
            return Err(PoolError::InvalidTerms("close_at overflows"));
        }
        match self.terms {
            PoolTerms::Ascending {
                amount_max1,
                amount_min1,
            } => {
                if amount_min1 == 0 {
                    return Err(PoolError::InvalidTerms("amount_min1 must be positive"));
                }
                if amount_min1 > amount_max1 {
                    return Err(PoolError::InvalidTerms(
                        "amount_min1 must not exceed amount_max1",
                    ));
                }
            }
            PoolTerms::SealedBid { amount_min1, .. } => {
                if amount_min1 == 0 {
                    return Err(PoolError::InvalidTerms("amount_min1 must be positive"));
                }
            }
            PoolTerms::FixedSwap { amount_total1, .. } => {
                if amount_total1 == 0 {
                    return Err(PoolError::InvalidTerms("amount_total1 must be positive"));
                }
            }
            PoolTerms::Lottery {
                amount1,
                max_player,
                n_share,
            } => {
                if amount1 == 0 {
                    return Err(PoolError::InvalidTerms("ticket price must be positive"));
                }
                if max_player == 0 {
                    return Err(PoolError::InvalidTerms("max_player must be positive"));
                }
                if n_share == 0 {
                    return Err(PoolError::InvalidTerms("n_share must be positive"));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Pool
// ============================================================================

/// An immutable pool record as stored by the registry.
///
/// Engine running state (accepted bids, swap totals, players) lives in the
/// engines; the registry record never changes after creation.
#[derive(Debug, Clone)]
pub struct Pool {
    /// Registry-assigned identifier.
    pub id: PoolId,
    /// Account that opened the pool.
    pub creator: AccountId,
    /// Asset being sold.
    pub token0: AssetId,
    /// Payment asset.
    pub token1: AssetId,
    /// Total token0 escrowed at creation.
    pub amount_total0: u64,
    /// Unix seconds at which participation opens.
    pub open_at: u64,
    /// Unix seconds at which participation closes.
    pub close_at: u64,
    /// Minimum governance-token holding gate.
    pub only_bot_holder: bool,
    /// Access-list gate.
    pub enable_white_list: bool,
    /// KYC gate (same access list stands in).
    pub enable_kyc_list: bool,
    /// Engine parameters.
    pub terms: PoolTerms,
}

impl Pool {
    /// Phase of the pool at `now`.
    pub fn status(&self, now: u64) -> PoolStatus {
        if now < self.open_at {
            PoolStatus::Pending
        } else if now < self.close_at {
            PoolStatus::Open
        } else {
            PoolStatus::Closed
        }
    }

    /// Error unless the pool is open at `now`.
    pub fn require_open(&self, now: u64) -> Result<()> {
        match self.status(now) {
            PoolStatus::Open => Ok(()),
            PoolStatus::Pending => Err(PoolError::PoolNotOpen(self.id)),
            PoolStatus::Closed => Err(PoolError::PoolClosed(self.id)),
        }
    }

    /// Error unless the pool is closed at `now`. Claims settle only after
    /// the window ends.
    pub fn require_closed(&self, now: u64) -> Result<()> {
        match self.status(now) {
            PoolStatus::Closed => Ok(()),
            _ => Err(PoolError::PoolNotClosed(self.id)),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
