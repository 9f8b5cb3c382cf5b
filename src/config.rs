//! House-wide configuration.
//!
//! A single value object shared by every engine. Updates go through
//! governor-gated setters; reads are plain field access. The library never
//! loads this from the environment, the embedding application decides where
//! the values come from.

use crate::error::{PoolError, Result};
use crate::types::{AccountId, AssetId};

/// Parameters shared across all pools.
#[derive(Debug, Clone)]
pub struct HouseConfig {
    /// Protocol fee skimmed from creator proceeds and forfeited tickets,
    /// in basis points of 10_000.
    pub tx_fee_ratio_bps: u64,
    /// Minimum governance-token balance required when a pool sets
    /// `only_bot_holder`.
    pub min_bot_holdings: u64,
    /// Floor on token1 per sealed bid, applied on top of each pool's own
    /// `min_amount1_per_bid`.
    pub min_bid_amount1: u64,
    /// Hard cap on live orders per sealed-bid pool; bounds the insertion
    /// walk.
    pub max_bid_count: u64,
    /// The governance token checked by the `only_bot_holder` gate.
    pub bot_token: AssetId,
    /// Account allowed to change these values.
    pub governor: AccountId,
}

impl HouseConfig {
    /// Config with the house defaults: 1.5% fee, 500-order bound, no
    /// holding or bid floors.
    pub fn new(governor: AccountId, bot_token: AssetId) -> Self {
        Self {
            tx_fee_ratio_bps: 150,
            min_bot_holdings: 0,
            min_bid_amount1: 0,
            max_bid_count: 500,
            bot_token,
            governor,
        }
    }

    fn require_governor(&self, caller: AccountId) -> Result<()> {
        if caller != self.governor {
            // Config is pool-independent; the sentinel pool id 0 keeps the
            // error shape uniform.
            return Err(PoolError::NotEligible(caller, crate::types::PoolId(0)));
        }
        Ok(())
    }

    /// Update the fee ratio. Rejects ratios at or above 100%.
    pub fn set_tx_fee_ratio_bps(&mut self, caller: AccountId, bps: u64) -> Result<()> {
        self.require_governor(caller)?;
        if bps >= crate::types::amount::BPS_DENOM {
            return Err(PoolError::InvalidTerms("fee ratio must be below 100%"));
        }
        self.tx_fee_ratio_bps = bps;
        Ok(())
    }

    /// Update the governance-token holding threshold.
    pub fn set_min_bot_holdings(&mut self, caller: AccountId, amount: u64) -> Result<()> {
        self.require_governor(caller)?;
        self.min_bot_holdings = amount;
        Ok(())
    }

    /// Update the house-wide minimum bid size.
    pub fn set_min_bid_amount1(&mut self, caller: AccountId, amount: u64) -> Result<()> {
        self.require_governor(caller)?;
        self.min_bid_amount1 = amount;
        Ok(())
    }

    /// Update the per-pool order bound. Must stay positive.
    pub fn set_max_bid_count(&mut self, caller: AccountId, count: u64) -> Result<()> {
        self.require_governor(caller)?;
        if count == 0 {
            return Err(PoolError::InvalidTerms("max_bid_count must be positive"));
        }
        self.max_bid_count = count;
        Ok(())
    }

    /// Hand governance to another account.
    pub fn set_governor(&mut self, caller: AccountId, new_governor: AccountId) -> Result<()> {
        self.require_governor(caller)?;
        self.governor = new_governor;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
