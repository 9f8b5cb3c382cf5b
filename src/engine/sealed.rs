//! Sealed-bid batch auction.
//!
//! ## Storage
//!
//! Bids live in a `slab::Slab` arena and are threaded into a singly-linked
//! list ordered by descending price. Insertion walks from the head while
//! the next node's price is greater than or equal to the new bid's, so
//! equal-price bids keep arrival order (earlier wins). The walk is bounded
//! by the house `max_bid_count`.
//!
//! ## Settlement
//!
//! A pure function over the final list: walk head to tail accumulating
//! token0. Orders strictly before the crossing point fill fully at their
//! own terms; the crossing order fills the remainder pro-rata at its own
//! price (`fill1 = amount1 * fill0 / amount0`, round down) and is refunded
//! the rest; later orders are refunded in full. The same list always
//! settles the same way, which the [`SettlementReceipt`] digest makes
//! checkable.
//!
//! Eligibility gates run in the facade before any engine call.

use std::cmp::Ordering;
use std::collections::HashMap;

use slab::Slab;
use tracing::debug;

use crate::config::HouseConfig;
use crate::engine::claims::ClaimLedger;
use crate::error::{PoolError, Result};
use crate::ledger::AssetLedger;
use crate::types::amount::{checked_add, checked_sub, mul_div_down, price_cmp};
use crate::types::{AccountId, Bid, FilledAmount, Pool, PoolTerms, SettlementReceipt};

// ============================================================================
// BidNode
// ============================================================================

/// Arena node: a bid plus its descending-price list link.
#[derive(Debug)]
struct BidNode {
    bid: Bid,
    /// Slab key of the next-lower-priority bid, `None` at the tail.
    next: Option<usize>,
}

// ============================================================================
// Settlement
// ============================================================================

/// Outcome of settling a sealed-bid pool. Pure data, derived from the
/// final list and the pool record alone.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// Per-order `(bidder, fill)` in settlement (price-priority) order.
    pub fills: Vec<(u64, FilledAmount)>,
    /// Token0 left unsold.
    pub unsold0: u64,
    /// Token1 owed to the creator, gross of fee.
    pub gross1: u64,
    /// Per-bidder aggregate: token0 won and token1 to refund.
    per_bidder: HashMap<AccountId, (u64, u64)>,
}

impl Settlement {
    /// A bidder's `(won token0, refunded token1)` across all their orders.
    pub fn bidder_outcome(&self, bidder: AccountId) -> (u64, u64) {
        self.per_bidder.get(&bidder).copied().unwrap_or((0, 0))
    }

    /// Audit receipt over the full fill list.
    pub fn receipt(&self, pool_id: u64) -> SettlementReceipt {
        SettlementReceipt::from_fills(pool_id, &self.fills)
    }
}

// ============================================================================
// SealedPool
// ============================================================================

/// Running state of one sealed-bid pool.
#[derive(Debug, Default)]
pub struct SealedPool {
    arena: Slab<BidNode>,
    head: Option<usize>,
    bid_count: u64,
    next_sequence: u64,
}

fn terms(pool: &Pool) -> Result<(u64, u64)> {
    match pool.terms {
        PoolTerms::SealedBid {
            amount_min1,
            min_amount1_per_bid,
        } => Ok((amount_min1, min_amount1_per_bid)),
        _ => Err(PoolError::InvalidTerms("not a sealed-bid pool")),
    }
}

impl SealedPool {
    /// Create empty running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live bids.
    #[inline]
    pub fn bid_count(&self) -> u64 {
        self.bid_count
    }

    /// Bids in descending-price order, highest priority first.
    pub fn bids_by_priority(&self) -> Vec<&Bid> {
        let mut out = Vec::with_capacity(self.arena.len());
        let mut cursor = self.head;
        while let Some(key) = cursor {
            let node = &self.arena[key];
            out.push(&node.bid);
            cursor = node.next;
        }
        out
    }

    /// Place a sealed bid of `amount1` token1 for `amount0` token0.
    ///
    /// The full `amount1` is escrowed; any refund happens at claim time
    /// after settlement.
    pub fn bid(
        &mut self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        config: &HouseConfig,
        bidder: AccountId,
        amount0: u64,
        amount1: u64,
        now: u64,
    ) -> Result<()> {
        pool.require_open(now)?;
        let (amount_min1, min_amount1_per_bid) = terms(pool)?;
        if amount0 == 0 {
            return Err(PoolError::InvalidTerms("amount0 must be positive"));
        }
        if amount1 < min_amount1_per_bid || amount1 < config.min_bid_amount1 {
            return Err(PoolError::BidBelowMinimum);
        }
        if price_cmp(amount1, amount0, amount_min1, pool.amount_total0) == Ordering::Less {
            return Err(PoolError::PriceTooLow);
        }
        if self.bid_count >= config.max_bid_count {
            return Err(PoolError::MaxBidCountReached(pool.id));
        }
        ledger.move_in(pool.id, bidder, pool.token1, amount1)?;

        let bid = Bid::new(bidder.0, amount0, amount1, self.next_sequence);
        self.next_sequence += 1;
        self.bid_count += 1;
        self.splice(bid);
        debug!(pool = %pool.id, %bidder, amount0, amount1, "sealed bid stored");
        Ok(())
    }

    /// Thread a bid into the descending-price list. Walks past every node
    /// whose price is >= the new bid's, so ties keep arrival order.
    fn splice(&mut self, bid: Bid) {
        let key = self.arena.insert(BidNode { bid, next: None });
        let (a1, a0) = {
            let b = &self.arena[key].bid;
            (b.amount1, b.amount0)
        };

        let beats = |arena: &Slab<BidNode>, at: usize| -> bool {
            let b = &arena[at].bid;
            price_cmp(b.amount1, b.amount0, a1, a0) != Ordering::Less
        };

        match self.head {
            Some(head_key) if beats(&self.arena, head_key) => {
                let mut prev = head_key;
                while let Some(next_key) = self.arena[prev].next {
                    if beats(&self.arena, next_key) {
                        prev = next_key;
                    } else {
                        break;
                    }
                }
                self.arena[key].next = self.arena[prev].next;
                self.arena[prev].next = Some(key);
            }
            other => {
                // empty list, or the new bid outprices the head
                self.arena[key].next = other;
                self.head = Some(key);
            }
        }
    }

    /// Settle the pool: pure, no state change, callable any number of
    /// times with identical results.
    pub fn settle(&self, pool: &Pool) -> Result<Settlement> {
        let mut fills = Vec::with_capacity(self.arena.len());
        let mut per_bidder: HashMap<AccountId, (u64, u64)> = HashMap::new();
        let mut cum0 = 0u64;
        let mut gross1 = 0u64;

        for bid in self.bids_by_priority() {
            let remaining0 = pool.amount_total0 - cum0;
            let fill0 = bid.amount0.min(remaining0);
            let fill1 = if fill0 == bid.amount0 {
                bid.amount1
            } else {
                // crossing order: pro-rata at its own price
                mul_div_down(bid.amount1, fill0, bid.amount0)?
            };
            let refund1 = checked_sub(bid.amount1, fill1)?;
            cum0 = checked_add(cum0, fill0)?;
            gross1 = checked_add(gross1, fill1)?;

            fills.push((bid.bidder, FilledAmount::new(fill0, fill1)));
            let acc = per_bidder.entry(AccountId(bid.bidder)).or_insert((0, 0));
            acc.0 = checked_add(acc.0, fill0)?;
            acc.1 = checked_add(acc.1, refund1)?;
        }

        Ok(Settlement {
            fills,
            unsold0: pool.amount_total0 - cum0,
            gross1,
            per_bidder,
        })
    }

    /// What the creator will receive: `(unsold token0, gross token1)`.
    /// Read view, valid at any time over the current list.
    pub fn creator_filled_amount(&self, pool: &Pool) -> Result<FilledAmount> {
        let s = self.settle(pool)?;
        Ok(FilledAmount::new(s.unsold0, s.gross1))
    }

    /// What a bidder will receive: `(won token0, refunded token1)`.
    pub fn bidder_filled_amount(&self, pool: &Pool, bidder: AccountId) -> Result<FilledAmount> {
        let s = self.settle(pool)?;
        let (fill0, refund1) = s.bidder_outcome(bidder);
        Ok(FilledAmount::new(fill0, refund1))
    }

    /// Creator claim after close: gross token1 minus fee plus unsold
    /// token0.
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
        let s = self.settle(pool)?;
        claims.record_creator(pool.id, caller)?;

        let (net1, fee) =
            ledger.move_out_with_fee(pool.id, caller, pool.token1, s.gross1, config.tx_fee_ratio_bps)?;
        ledger.move_out(pool.id, caller, pool.token0, s.unsold0)?;

        debug!(pool = %pool.id, net1, fee, unsold0 = s.unsold0, "sealed creator claim");
        Ok(FilledAmount::new(s.unsold0, net1))
    }

    /// Bidder claim after close: won token0 plus the token1 refund across
    /// all of the bidder's orders, exactly once.
    pub fn bidder_claim(
        &self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        claims: &mut ClaimLedger,
        bidder: AccountId,
        now: u64,
    ) -> Result<FilledAmount> {
        pool.require_closed(now)?;
        let s = self.settle(pool)?;
        let (fill0, refund1) = s.bidder_outcome(bidder);
        let payout = FilledAmount::new(fill0, refund1);
        claims.record(pool.id, bidder, payout)?;

        ledger.move_out(pool.id, bidder, pool.token0, fill0)?;
        ledger.move_out(pool.id, bidder, pool.token1, refund1)?;

        debug!(pool = %pool.id, %bidder, fill0, refund1, "sealed bidder claim");
        Ok(payout)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
