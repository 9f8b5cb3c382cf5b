//! Lottery draw.
//!
//! Tickets sell at a fixed token1 price, one per account. Every bet folds
//! the bettor into a rolling SHA-256 hash chain; the chain's final value
//! seeds the draw. The last bettor can see (and thus influence) the final
//! chain value, the same way a block producer could on chain; callers
//! supply the `entropy` bytes that stand in for block data.
//!
//! ## Draw
//!
//! `winner_count = floor(cur_player / n_share)`. Each player's score is
//! the first 16 bytes of `sha256(last_hash || index)` read as a big-endian
//! `u128`, where `index` is the player's draw index encoded as 8
//! little-endian bytes; the lowest `winner_count` scores win, ties broken by lower
//! index. The selection is a pure function of `(last_hash, cur_player,
//! n_share)`, so any party can recompute the winner set.
//!
//! Eligibility gates run in the facade before any engine call.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::HouseConfig;
use crate::engine::claims::ClaimLedger;
use crate::error::{PoolError, Result};
use crate::ledger::AssetLedger;
use crate::types::amount::checked_sub;
use crate::types::{AccountId, FilledAmount, Pool, PoolTerms};

// ============================================================================
// Draw functions
// ============================================================================

/// A player's draw score: first 16 bytes of `sha256(last_hash || index)`
/// as a big-endian `u128`, with `index` encoded as 8 little-endian bytes.
pub fn draw_score(last_hash: &[u8; 32], index: u64) -> u128 {
    let mut hasher = Sha256::new();
    hasher.update(last_hash);
    hasher.update(index.to_le_bytes());
    let digest = hasher.finalize();
    let mut head = [0u8; 16];
    head.copy_from_slice(&digest[..16]);
    u128::from_be_bytes(head)
}

/// The winning player indices for a finished draw, ascending.
///
/// Pure and total: any `(last_hash, cur_player, n_share)` triple yields
/// the same set on every call.
pub fn winner_indices(last_hash: &[u8; 32], cur_player: u64, n_share: u64) -> Vec<u64> {
    if n_share == 0 {
        return Vec::new();
    }
    let winner_count = (cur_player / n_share) as usize;
    let mut ranked: Vec<(u128, u64)> = (0..cur_player)
        .map(|i| (draw_score(last_hash, i), i))
        .collect();
    ranked.sort();
    let mut winners: Vec<u64> = ranked.into_iter().take(winner_count).map(|(_, i)| i).collect();
    winners.sort();
    winners
}

/// Whether a single player index is in the winner set.
pub fn is_winner(last_hash: &[u8; 32], index: u64, cur_player: u64, n_share: u64) -> bool {
    winner_indices(last_hash, cur_player, n_share).contains(&index)
}

// ============================================================================
// LotteryPool
// ============================================================================

/// Running state of one lottery pool.
#[derive(Debug, Default)]
pub struct LotteryPool {
    players: Vec<AccountId>,
    index_of: HashMap<AccountId, u64>,
    last_hash: [u8; 32],
}

fn terms(pool: &Pool) -> Result<(u64, u64, u64)> {
    match pool.terms {
        PoolTerms::Lottery {
            amount1,
            max_player,
            n_share,
        } => Ok((amount1, max_player, n_share)),
        _ => Err(PoolError::InvalidTerms("not a lottery pool")),
    }
}

impl LotteryPool {
    /// Create empty running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entrants so far.
    #[inline]
    pub fn cur_player(&self) -> u64 {
        self.players.len() as u64
    }

    /// Final (current) value of the hash chain.
    #[inline]
    pub fn last_hash(&self) -> [u8; 32] {
        self.last_hash
    }

    /// A player's draw index, if they entered.
    pub fn index_of(&self, player: AccountId) -> Option<u64> {
        self.index_of.get(&player).copied()
    }

    /// Buy a ticket. One entry per account; `entropy` is folded into the
    /// hash chain together with the player's index and id.
    pub fn bet(
        &mut self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        player: AccountId,
        entropy: [u8; 32],
        now: u64,
    ) -> Result<()> {
        pool.require_open(now)?;
        let (amount1, max_player, _) = terms(pool)?;
        if self.index_of.contains_key(&player) {
            return Err(PoolError::AlreadyBet(player, pool.id));
        }
        if self.cur_player() >= max_player {
            return Err(PoolError::PoolClosed(pool.id));
        }
        ledger.move_in(pool.id, player, pool.token1, amount1)?;

        let index = self.cur_player();
        self.players.push(player);
        self.index_of.insert(player, index);

        let mut hasher = Sha256::new();
        hasher.update(self.last_hash);
        hasher.update(index.to_le_bytes());
        hasher.update(player.0.to_le_bytes());
        hasher.update(entropy);
        self.last_hash.copy_from_slice(&hasher.finalize());

        debug!(pool = %pool.id, %player, index, "lottery bet");
        Ok(())
    }

    /// Whether a player won, once the pool is closed.
    pub fn player_won(&self, pool: &Pool, player: AccountId) -> Result<bool> {
        let (_, _, n_share) = terms(pool)?;
        match self.index_of(player) {
            Some(index) => Ok(is_winner(&self.last_hash, index, self.cur_player(), n_share)),
            None => Err(PoolError::NotAPlayer(player, pool.id)),
        }
    }

    /// Player claim after close: a winner takes their prize share of
    /// token0; a non-winner reclaims the ticket net of fee.
    pub fn player_claim(
        &self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        claims: &mut ClaimLedger,
        config: &HouseConfig,
        player: AccountId,
        now: u64,
    ) -> Result<FilledAmount> {
        pool.require_closed(now)?;
        let (amount1, _, n_share) = terms(pool)?;
        let index = self
            .index_of(player)
            .ok_or(PoolError::NotAPlayer(player, pool.id))?;

        if is_winner(&self.last_hash, index, self.cur_player(), n_share) {
            // pot splits equally among the drawn winners; the division is
            // safe because a winner implies winner_count >= 1
            let winner_count = self.cur_player() / n_share;
            let prize0 = pool.amount_total0 / winner_count;
            let payout = FilledAmount::new(prize0, 0);
            claims.record(pool.id, player, payout)?;
            ledger.move_out(pool.id, player, pool.token0, prize0)?;
            debug!(pool = %pool.id, %player, prize0, "lottery winner claim");
            Ok(payout)
        } else {
            claims.record(pool.id, player, FilledAmount::zero())?;
            let (net1, fee) = ledger.move_out_with_fee(
                pool.id,
                player,
                pool.token1,
                amount1,
                config.tx_fee_ratio_bps,
            )?;
            debug!(pool = %pool.id, %player, net1, fee, "lottery refund claim");
            Ok(FilledAmount::new(0, net1))
        }
    }

    /// Beneficiary claim after close, callable by anyone: the winners'
    /// forfeited tickets minus fee plus the undistributed prize
    /// remainder, paid to the pool creator.
    pub fn creator_claim(
        &self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        claims: &mut ClaimLedger,
        config: &HouseConfig,
        now: u64,
    ) -> Result<FilledAmount> {
        pool.require_closed(now)?;
        let (amount1, _, n_share) = terms(pool)?;
        claims.record_creator(pool.id, pool.creator)?;

        let winner_count = self.cur_player() / n_share;
        let pot1 = winner_count
            .checked_mul(amount1)
            .ok_or(PoolError::AmountOverflow)?;
        let distributed0 = if winner_count == 0 {
            0
        } else {
            winner_count * (pool.amount_total0 / winner_count)
        };
        let remainder0 = checked_sub(pool.amount_total0, distributed0)?;

        let (net1, fee) = ledger.move_out_with_fee(
            pool.id,
            pool.creator,
            pool.token1,
            pot1,
            config.tx_fee_ratio_bps,
        )?;
        ledger.move_out(pool.id, pool.creator, pool.token0, remainder0)?;

        debug!(pool = %pool.id, net1, fee, remainder0, "lottery beneficiary claim");
        Ok(FilledAmount::new(remainder0, net1))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
