//! Ascending clearing auction.
//!
//! Every accepted bid must strictly outbid the price of the previous
//! accepted bid (the first must meet the reserve `amount_min1 /
//! amount_total0`), so the running `lowest_bid_price` is in fact the
//! highest so far and only ever rises. A bid pays its own quoted price;
//! when remaining supply is short the bid is truncated pro-rata and only
//! the truncated token1 is escrowed; the remainder never leaves the
//! bidder.
//!
//! There is no refund leg: bidders claim exactly their accepted token0
//! after close, the creator claims all collected token1 (minus fee) plus
//! any unsold token0.
//!
//! Eligibility gates run in the facade before any engine call.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::config::HouseConfig;
use crate::engine::claims::ClaimLedger;
use crate::error::{PoolError, Result};
use crate::ledger::AssetLedger;
use crate::types::amount::{checked_add, checked_sub, mul_div_down, price_cmp};
use crate::types::{AccountId, FilledAmount, Pool, PoolTerms};

/// Running state of one ascending pool.
#[derive(Debug, Default)]
pub struct AscendingPool {
    amount_swap0: u64,
    amount_swap1: u64,
    /// Quoted price `(amount1, amount0)` of the most recent accepted bid.
    last_price: Option<(u64, u64)>,
    /// Cumulative accepted amounts per bidder.
    positions: HashMap<AccountId, FilledAmount>,
}

fn terms(pool: &Pool) -> Result<(u64, u64)> {
    match pool.terms {
        PoolTerms::Ascending {
            amount_max1,
            amount_min1,
        } => Ok((amount_max1, amount_min1)),
        _ => Err(PoolError::InvalidTerms("not an ascending pool")),
    }
}

impl AscendingPool {
    /// Create empty running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Token0 sold so far.
    #[inline]
    pub fn amount_swap0(&self) -> u64 {
        self.amount_swap0
    }

    /// Token1 collected so far.
    #[inline]
    pub fn amount_swap1(&self) -> u64 {
        self.amount_swap1
    }

    /// Quoted price of the last accepted bid, as `(amount1, amount0)`.
    #[inline]
    pub fn last_price(&self) -> Option<(u64, u64)> {
        self.last_price
    }

    /// A bidder's cumulative accepted amounts.
    pub fn position_of(&self, bidder: AccountId) -> FilledAmount {
        self.positions.get(&bidder).copied().unwrap_or_default()
    }

    /// Place a bid of `amount1` token1 for `amount0` token0.
    ///
    /// Accepts up to the remaining supply, escrowing the pro-rated token1:
    /// `accepted1 = amount1 * accepted0 / amount0`, round down. Returns
    /// what was accepted.
    pub fn bid(
        &mut self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        bidder: AccountId,
        amount0: u64,
        amount1: u64,
        now: u64,
    ) -> Result<FilledAmount> {
        pool.require_open(now)?;
        let (amount_max1, amount_min1) = terms(pool)?;
        if amount0 == 0 {
            return Err(PoolError::InvalidTerms("amount0 must be positive"));
        }
        if amount1 > amount_max1 {
            return Err(PoolError::InvalidTerms("amount1 exceeds amount_max1"));
        }
        let remaining0 = checked_sub(pool.amount_total0, self.amount_swap0)?;
        if remaining0 == 0 {
            return Err(PoolError::PoolClosed(pool.id));
        }
        match self.last_price {
            // first bid: at least the reserve price
            None => {
                if price_cmp(amount1, amount0, amount_min1, pool.amount_total0)
                    == Ordering::Less
                {
                    return Err(PoolError::PriceTooLow);
                }
            }
            // later bids: strictly above the last accepted price
            Some((last1, last0)) => {
                if price_cmp(amount1, amount0, last1, last0) != Ordering::Greater {
                    return Err(PoolError::PriceTooLow);
                }
            }
        }

        let accepted0 = amount0.min(remaining0);
        let accepted1 = mul_div_down(amount1, accepted0, amount0)?;
        ledger.move_in(pool.id, bidder, pool.token1, accepted1)?;

        self.amount_swap0 = checked_add(self.amount_swap0, accepted0)?;
        self.amount_swap1 = checked_add(self.amount_swap1, accepted1)?;
        self.last_price = Some((amount1, amount0));
        let pos = self.positions.entry(bidder).or_default();
        pos.amount0 = checked_add(pos.amount0, accepted0)?;
        pos.amount1 = checked_add(pos.amount1, accepted1)?;

        debug!(pool = %pool.id, %bidder, accepted0, accepted1, "ascending bid accepted");
        Ok(FilledAmount::new(accepted0, accepted1))
    }

    /// Creator claim after close: collected token1 minus fee, plus the
    /// unsold token0 remainder.
    pub fn creator_claim(
        &self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        claims: &mut ClaimLedger,
        config: &HouseConfig,
        caller: AccountId,
        now: u64,
    ) -> Result<FilledAmount> {
        pool.require_closed(now)?;
        if caller != pool.creator {
            return Err(PoolError::NotCreator(caller, pool.id));
        }
        claims.record_creator(pool.id, caller)?;

        let unsold0 = checked_sub(pool.amount_total0, self.amount_swap0)?;
        let (net1, fee) = ledger.move_out_with_fee(
            pool.id,
            caller,
            pool.token1,
            self.amount_swap1,
            config.tx_fee_ratio_bps,
        )?;
        ledger.move_out(pool.id, caller, pool.token0, unsold0)?;

        debug!(pool = %pool.id, net1, fee, unsold0, "ascending creator claim");
        Ok(FilledAmount::new(unsold0, net1))
    }

    /// Bidder claim after close: exactly the cumulative accepted token0.
    /// Idempotence is enforced by the claim ledger.
    pub fn bidder_claim(
        &self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        claims: &mut ClaimLedger,
        bidder: AccountId,
        now: u64,
    ) -> Result<FilledAmount> {
        pool.require_closed(now)?;
        let pos = self.position_of(bidder);
        let payout = FilledAmount::new(pos.amount0, 0);
        claims.record(pool.id, bidder, payout)?;
        ledger.move_out(pool.id, bidder, pool.token0, payout.amount0)?;

        debug!(pool = %pool.id, %bidder, amount0 = payout.amount0, "ascending bidder claim");
        Ok(payout)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
