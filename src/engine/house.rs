//! The auction house facade.
//!
//! Owns the ledger, registry, config, claim ledger and per-pool engine
//! state, and exposes one entry point per operation. The facade is where
//! cross-cutting checks live: pool lookup, eligibility gates and logging.
//! Engine modules assume those already ran.
//!
//! Single-threaded by construction: callers serialize access (wrap in a
//! mutex to share across threads). All methods take `&mut self` and an
//! explicit `now`.

use std::collections::HashMap;

use tracing::info;

use crate::config::HouseConfig;
use crate::engine::ascending::AscendingPool;
use crate::engine::claims::ClaimLedger;
use crate::engine::lottery::LotteryPool;
use crate::engine::prorata::FixedSwapPool;
use crate::engine::sealed::SealedPool;
use crate::error::{PoolError, Result};
use crate::ledger::AssetLedger;
use crate::registry::PoolRegistry;
use crate::types::{
    AccountId, AssetId, Bid, CreateReq, FilledAmount, Pool, PoolId, PoolStatus, PoolTerms,
    SettlementReceipt,
};

/// All state of one auction house instance.
#[derive(Debug)]
pub struct AuctionHouse {
    config: HouseConfig,
    ledger: AssetLedger,
    registry: PoolRegistry,
    claims: ClaimLedger,
    ascending: HashMap<PoolId, AscendingPool>,
    sealed: HashMap<PoolId, SealedPool>,
    fixed: HashMap<PoolId, FixedSwapPool>,
    lottery: HashMap<PoolId, LotteryPool>,
}

impl AuctionHouse {
    /// A fresh house with default config.
    pub fn new(governor: AccountId, bot_token: AssetId) -> Self {
        Self {
            config: HouseConfig::new(governor, bot_token),
            ledger: AssetLedger::new(),
            registry: PoolRegistry::new(),
            claims: ClaimLedger::new(),
            ascending: HashMap::new(),
            sealed: HashMap::new(),
            fixed: HashMap::new(),
            lottery: HashMap::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The balance book.
    #[inline]
    pub fn ledger(&self) -> &AssetLedger {
        &self.ledger
    }

    /// House configuration.
    #[inline]
    pub fn config(&self) -> &HouseConfig {
        &self.config
    }

    /// Mutable config handle; updates go through its governor-gated
    /// setters.
    #[inline]
    pub fn config_mut(&mut self) -> &mut HouseConfig {
        &mut self.config
    }

    /// Claim history.
    #[inline]
    pub fn claims(&self) -> &ClaimLedger {
        &self.claims
    }

    /// Fund a wallet. Bootstrap/test helper.
    pub fn deposit(&mut self, account: AccountId, asset: AssetId, amount: u64) -> Result<()> {
        self.ledger.deposit(account, asset, amount)
    }

    /// Look up a pool record.
    pub fn pool(&self, id: PoolId) -> Result<&Pool> {
        self.registry.get(id)
    }

    /// A pool's phase at `now`.
    pub fn status(&self, id: PoolId, now: u64) -> Result<PoolStatus> {
        Ok(self.registry.get(id)?.status(now))
    }

    // ------------------------------------------------------------------------
    // Pool creation
    // ------------------------------------------------------------------------

    /// Open a new pool and initialize its engine state.
    pub fn create(
        &mut self,
        req: CreateReq,
        access_list: Vec<AccountId>,
        now: u64,
    ) -> Result<PoolId> {
        let terms = req.terms;
        let id = self.registry.create(&mut self.ledger, req, access_list, now)?;
        match terms {
            PoolTerms::Ascending { .. } => {
                self.ascending.insert(id, AscendingPool::new());
            }
            PoolTerms::SealedBid { .. } => {
                self.sealed.insert(id, SealedPool::new());
            }
            PoolTerms::FixedSwap { .. } => {
                self.fixed.insert(id, FixedSwapPool::new());
            }
            PoolTerms::Lottery { .. } => {
                self.lottery.insert(id, LotteryPool::new());
            }
        }
        Ok(id)
    }

    fn gated_pool(&self, id: PoolId, account: AccountId) -> Result<Pool> {
        let pool = self.registry.get(id)?;
        self.registry
            .ensure_eligible(pool, account, &self.config, &self.ledger)?;
        Ok(pool.clone())
    }

    // ------------------------------------------------------------------------
    // Participation
    // ------------------------------------------------------------------------

    /// Place a bid on an ascending or sealed-bid pool. Returns the
    /// accepted amounts (the full bid, for a sealed pool).
    pub fn bid(
        &mut self,
        id: PoolId,
        bidder: AccountId,
        amount0: u64,
        amount1: u64,
        now: u64,
    ) -> Result<FilledAmount> {
        let pool = self.gated_pool(id, bidder)?;
        let fill = match pool.terms {
            PoolTerms::Ascending { .. } => {
                let state = self.ascending.get_mut(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.bid(&pool, &mut self.ledger, bidder, amount0, amount1, now)?
            }
            PoolTerms::SealedBid { .. } => {
                let state = self.sealed.get_mut(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.bid(
                    &pool,
                    &mut self.ledger,
                    &self.config,
                    bidder,
                    amount0,
                    amount1,
                    now,
                )?;
                FilledAmount::new(amount0, amount1)
            }
            _ => return Err(PoolError::InvalidTerms("pool does not take bids")),
        };
        info!(pool = %id, %bidder, amount0 = fill.amount0, amount1 = fill.amount1, "bid");
        Ok(fill)
    }

    /// Swap on a fixed-swap pool; token0 is delivered in this call.
    pub fn swap(
        &mut self,
        id: PoolId,
        buyer: AccountId,
        amount1: u64,
        now: u64,
    ) -> Result<FilledAmount> {
        let pool = self.gated_pool(id, buyer)?;
        let state = match pool.terms {
            PoolTerms::FixedSwap { .. } => {
                self.fixed.get_mut(&id).ok_or(PoolError::PoolNotFound(id))?
            }
            _ => return Err(PoolError::InvalidTerms("pool does not take swaps")),
        };
        let fill = state.swap(&pool, &mut self.ledger, buyer, amount1, now)?;
        info!(pool = %id, %buyer, amount0 = fill.amount0, amount1 = fill.amount1, "swap");
        Ok(fill)
    }

    /// Buy a lottery ticket.
    pub fn bet(
        &mut self,
        id: PoolId,
        player: AccountId,
        entropy: [u8; 32],
        now: u64,
    ) -> Result<()> {
        let pool = self.gated_pool(id, player)?;
        let state = match pool.terms {
            PoolTerms::Lottery { .. } => {
                self.lottery.get_mut(&id).ok_or(PoolError::PoolNotFound(id))?
            }
            _ => return Err(PoolError::InvalidTerms("pool does not take bets")),
        };
        state.bet(&pool, &mut self.ledger, player, entropy, now)?;
        info!(pool = %id, %player, "bet");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Claims
    // ------------------------------------------------------------------------

    /// Creator-side claim after close. For a lottery this is the
    /// beneficiary claim and any caller may trigger it; funds always go
    /// to the creator.
    pub fn creator_claim(&mut self, id: PoolId, caller: AccountId, now: u64) -> Result<FilledAmount> {
        let pool = self.registry.get(id)?.clone();
        let fill = match pool.terms {
            PoolTerms::Ascending { .. } => {
                let state = self.ascending.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.creator_claim(&pool, &mut self.ledger, &mut self.claims, &self.config, caller, now)?
            }
            PoolTerms::SealedBid { .. } => {
                let state = self.sealed.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.creator_claim(&pool, &mut self.ledger, &mut self.claims, &self.config, caller, now)?
            }
            PoolTerms::FixedSwap { .. } => {
                let state = self.fixed.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.creator_claim(&pool, &mut self.ledger, &mut self.claims, &self.config, caller, now)?
            }
            PoolTerms::Lottery { .. } => {
                let state = self.lottery.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.creator_claim(&pool, &mut self.ledger, &mut self.claims, &self.config, now)?
            }
        };
        info!(pool = %id, amount0 = fill.amount0, amount1 = fill.amount1, "creator claim");
        Ok(fill)
    }

    /// Participant-side claim after close: a bidder's winnings, a sealed
    /// bidder's fills and refunds, or a lottery player's prize/refund.
    /// Fixed-swap pools settle at swap time and have none.
    pub fn participant_claim(
        &mut self,
        id: PoolId,
        caller: AccountId,
        now: u64,
    ) -> Result<FilledAmount> {
        let pool = self.registry.get(id)?.clone();
        let fill = match pool.terms {
            PoolTerms::Ascending { .. } => {
                let state = self.ascending.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.bidder_claim(&pool, &mut self.ledger, &mut self.claims, caller, now)?
            }
            PoolTerms::SealedBid { .. } => {
                let state = self.sealed.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.bidder_claim(&pool, &mut self.ledger, &mut self.claims, caller, now)?
            }
            PoolTerms::Lottery { .. } => {
                let state = self.lottery.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                state.player_claim(&pool, &mut self.ledger, &mut self.claims, &self.config, caller, now)?
            }
            PoolTerms::FixedSwap { .. } => {
                return Err(PoolError::InvalidTerms(
                    "fixed-swap pools settle at swap time",
                ))
            }
        };
        info!(pool = %id, %caller, amount0 = fill.amount0, amount1 = fill.amount1, "participant claim");
        Ok(fill)
    }

    // ------------------------------------------------------------------------
    // Read views
    // ------------------------------------------------------------------------

    /// Cumulative `(token0 sold, token1 collected)` of an ascending or
    /// fixed-swap pool.
    pub fn amount_swap(&self, id: PoolId) -> Result<FilledAmount> {
        let pool = self.registry.get(id)?;
        match pool.terms {
            PoolTerms::Ascending { .. } => {
                let state = self.ascending.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                Ok(FilledAmount::new(state.amount_swap0(), state.amount_swap1()))
            }
            PoolTerms::FixedSwap { .. } => {
                let state = self.fixed.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                Ok(FilledAmount::new(state.amount_swap0(), state.amount_swap1()))
            }
            _ => Err(PoolError::InvalidTerms("pool does not track swap totals")),
        }
    }

    /// One account's cumulative accepted `(token0, token1)` in an
    /// ascending or fixed-swap pool. Zero for accounts that never
    /// participated.
    pub fn my_amount_swap(&self, id: PoolId, account: AccountId) -> Result<FilledAmount> {
        let pool = self.registry.get(id)?;
        match pool.terms {
            PoolTerms::Ascending { .. } => {
                let state = self.ascending.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                Ok(state.position_of(account))
            }
            PoolTerms::FixedSwap { .. } => {
                let state = self.fixed.get(&id).ok_or(PoolError::PoolNotFound(id))?;
                Ok(state.wallet_position(account))
            }
            _ => Err(PoolError::InvalidTerms("pool does not track swap totals")),
        }
    }

    /// Number of entries in a pool's participant list: live orders for a
    /// sealed-bid pool, entrants for a lottery.
    pub fn bidder_list_count(&self, id: PoolId) -> Result<u64> {
        let pool = self.registry.get(id)?;
        match pool.terms {
            PoolTerms::SealedBid { .. } => Ok(self
                .sealed
                .get(&id)
                .ok_or(PoolError::PoolNotFound(id))?
                .bid_count()),
            PoolTerms::Lottery { .. } => Ok(self
                .lottery
                .get(&id)
                .ok_or(PoolError::PoolNotFound(id))?
                .cur_player()),
            _ => Err(PoolError::InvalidTerms("pool does not keep an entry list")),
        }
    }

    /// A sealed-bid pool's order book in descending-price (settlement)
    /// order.
    pub fn bidders_by_priority(&self, id: PoolId) -> Result<Vec<Bid>> {
        let pool = self.registry.get(id)?;
        match pool.terms {
            PoolTerms::SealedBid { .. } => Ok(self
                .sealed
                .get(&id)
                .ok_or(PoolError::PoolNotFound(id))?
                .bids_by_priority()
                .into_iter()
                .cloned()
                .collect()),
            _ => Err(PoolError::InvalidTerms("not a sealed-bid pool")),
        }
    }

    /// What the creator of a sealed-bid pool stands to receive, over the
    /// current order list. Never mutates.
    pub fn creator_filled_amount(&self, id: PoolId) -> Result<FilledAmount> {
        let pool = self.registry.get(id)?;
        match pool.terms {
            PoolTerms::SealedBid { .. } => self
                .sealed
                .get(&id)
                .ok_or(PoolError::PoolNotFound(id))?
                .creator_filled_amount(pool),
            _ => Err(PoolError::InvalidTerms("not a sealed-bid pool")),
        }
    }

    /// What a sealed bidder stands to receive (fills and refunds).
    pub fn bidder_filled_amount(&self, id: PoolId, bidder: AccountId) -> Result<FilledAmount> {
        let pool = self.registry.get(id)?;
        match pool.terms {
            PoolTerms::SealedBid { .. } => self
                .sealed
                .get(&id)
                .ok_or(PoolError::PoolNotFound(id))?
                .bidder_filled_amount(pool, bidder),
            _ => Err(PoolError::InvalidTerms("not a sealed-bid pool")),
        }
    }

    /// Audit receipt of a sealed-bid pool's settlement.
    pub fn settlement_receipt(&self, id: PoolId) -> Result<SettlementReceipt> {
        let pool = self.registry.get(id)?;
        match pool.terms {
            PoolTerms::SealedBid { .. } => Ok(self
                .sealed
                .get(&id)
                .ok_or(PoolError::PoolNotFound(id))?
                .settle(pool)?
                .receipt(id.0)),
            _ => Err(PoolError::InvalidTerms("not a sealed-bid pool")),
        }
    }

    /// Whether a lottery player is in the winner set.
    pub fn is_lottery_winner(&self, id: PoolId, player: AccountId) -> Result<bool> {
        let pool = self.registry.get(id)?;
        match pool.terms {
            PoolTerms::Lottery { .. } => self
                .lottery
                .get(&id)
                .ok_or(PoolError::PoolNotFound(id))?
                .player_won(pool, player),
            _ => Err(PoolError::InvalidTerms("not a lottery pool")),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
