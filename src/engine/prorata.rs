//! Fixed-price pro-rata swap.
//!
//! The whole lot sells at one rate, `amount_total1 / amount_total0`,
//! first come first served. Delivery is immediate: a swap pulls the
//! accepted token1 and pays out the matching token0 in the same call, so
//! the buyer side is final at swap time and has no claim step. Only the
//! accepted token1 is ever pulled from the buyer, which is how the
//! "refund the difference in the same call" rule renders on a ledger
//! that debits lazily.
//!
//! Eligibility gates run in the facade before any engine call.

use std::collections::HashMap;

use tracing::debug;

use crate::config::HouseConfig;
use crate::engine::claims::ClaimLedger;
use crate::error::{PoolError, Result};
use crate::ledger::AssetLedger;
use crate::types::amount::{checked_add, checked_sub, mul_div_down};
use crate::types::{AccountId, FilledAmount, Pool, PoolTerms};

/// Running state of one fixed-swap pool.
#[derive(Debug, Default)]
pub struct FixedSwapPool {
    amount_swap0: u64,
    amount_swap1: u64,
    /// Cumulative accepted amounts per wallet; the token1 leg drives the
    /// per-wallet cap.
    per_wallet: HashMap<AccountId, FilledAmount>,
}

fn terms(pool: &Pool) -> Result<(u64, u64)> {
    match pool.terms {
        PoolTerms::FixedSwap {
            amount_total1,
            max_amount1_per_wallet,
        } => Ok((amount_total1, max_amount1_per_wallet)),
        _ => Err(PoolError::InvalidTerms("not a fixed-swap pool")),
    }
}

impl FixedSwapPool {
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

    /// A wallet's cumulative `(token0 received, token1 spent)`.
    pub fn wallet_position(&self, buyer: AccountId) -> FilledAmount {
        self.per_wallet.get(&buyer).copied().unwrap_or_default()
    }

    /// Token1 a wallet has spent in this pool.
    pub fn wallet_spent(&self, buyer: AccountId) -> u64 {
        self.wallet_position(buyer).amount1
    }

    /// Swap `amount1` token1 for token0 at the pool rate.
    ///
    /// Truncates to the per-wallet cap and to remaining supply; the
    /// token0 leg is delivered immediately. Returns what was exchanged.
    pub fn swap(
        &mut self,
        pool: &Pool,
        ledger: &mut AssetLedger,
        buyer: AccountId,
        amount1: u64,
        now: u64,
    ) -> Result<FilledAmount> {
        pool.require_open(now)?;
        let (amount_total1, max_amount1_per_wallet) = terms(pool)?;
        if amount1 == 0 {
            return Err(PoolError::InvalidTerms("amount1 must be positive"));
        }

        let mut accepted1 = amount1;
        if max_amount1_per_wallet > 0 {
            let spent = self.wallet_spent(buyer);
            if spent >= max_amount1_per_wallet {
                return Err(PoolError::NotEligible(buyer, pool.id));
            }
            accepted1 = accepted1.min(max_amount1_per_wallet - spent);
        }
        let remaining1 = checked_sub(amount_total1, self.amount_swap1)?;
        if remaining1 == 0 {
            return Err(PoolError::PoolClosed(pool.id));
        }
        accepted1 = accepted1.min(remaining1);
        let amount0 = mul_div_down(accepted1, pool.amount_total0, amount_total1)?;

        ledger.move_in(pool.id, buyer, pool.token1, accepted1)?;
        ledger.move_out(pool.id, buyer, pool.token0, amount0)?;

        self.amount_swap0 = checked_add(self.amount_swap0, amount0)?;
        self.amount_swap1 = checked_add(self.amount_swap1, accepted1)?;
        let pos = self.per_wallet.entry(buyer).or_default();
        pos.amount0 = checked_add(pos.amount0, amount0)?;
        pos.amount1 = checked_add(pos.amount1, accepted1)?;

        debug!(pool = %pool.id, %buyer, amount0, accepted1, "fixed swap");
        Ok(FilledAmount::new(amount0, accepted1))
    }

    /// Creator claim after close: collected token1 minus fee plus the
    /// unsold token0 remainder. The only claim this engine has.
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

        debug!(pool = %pool.id, net1, fee, unsold0, "fixed-swap creator claim");
        Ok(FilledAmount::new(unsold0, net1))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AssetId, PoolId};

    const T0: AssetId = AssetId::Token(0);
    const T1: AssetId = AssetId::Token(1);

    fn pool(amount_total1: u64, cap: u64) -> Pool {
        Pool {
            id: PoolId(0),
            creator: AccountId(1),
            token0: T0,
            token1: T1,
            amount_total0: 100,
            open_at: 10,
            close_at: 110,
            only_bot_holder: false,
            enable_white_list: false,
            enable_kyc_list: false,
            terms: PoolTerms::FixedSwap {
                amount_total1,
                max_amount1_per_wallet: cap,
            },
        }
    }

    fn setup(pool: &Pool) -> AssetLedger {
        let mut ledger = AssetLedger::new();
        ledger.deposit(pool.creator, T0, pool.amount_total0).unwrap();
        ledger
            .move_in(pool.id, pool.creator, T0, pool.amount_total0)
            .unwrap();
        for buyer in 2..=5 {
            ledger.deposit(AccountId(buyer), T1, 10_000).unwrap();
        }
        ledger
    }

    #[test]
    fn test_swap_delivers_immediately_at_fixed_rate() {
        // rate: 100 token0 for 50 token1, so 1 token1 buys 2 token0
        let pool = pool(50, 0);
        let mut ledger = setup(&pool);
        let mut state = FixedSwapPool::new();

        let fill = state
            .swap(&pool, &mut ledger, AccountId(2), 10, 50)
            .unwrap();
        assert_eq!(fill, FilledAmount::new(20, 10));
        assert_eq!(ledger.balance(AccountId(2), T0), 20);
        assert_eq!(ledger.balance(AccountId(2), T1), 10_000 - 10);
    }

    #[test]
    fn test_supply_truncation() {
        let pool = pool(50, 0);
        let mut ledger = setup(&pool);
        let mut state = FixedSwapPool::new();

        state
            .swap(&pool, &mut ledger, AccountId(2), 40, 50)
            .unwrap();
        // only 10 token1 of room left; the 30 asked for truncates
        let fill = state
            .swap(&pool, &mut ledger, AccountId(3), 30, 51)
            .unwrap();
        assert_eq!(fill, FilledAmount::new(20, 10));
        assert_eq!(ledger.balance(AccountId(3), T1), 10_000 - 10);

        // sold out
        assert_eq!(
            state.swap(&pool, &mut ledger, AccountId(4), 1, 52),
            Err(PoolError::PoolClosed(pool.id))
        );
        assert_eq!(state.amount_swap0(), 100);
    }

    #[test]
    fn test_wallet_position_tracks_both_legs() {
        // rate 2 token0 per token1
        let pool = pool(50, 0);
        let mut ledger = setup(&pool);
        let mut state = FixedSwapPool::new();

        state.swap(&pool, &mut ledger, AccountId(2), 10, 50).unwrap();
        state.swap(&pool, &mut ledger, AccountId(2), 5, 51).unwrap();

        assert_eq!(state.wallet_position(AccountId(2)), FilledAmount::new(30, 15));
        assert_eq!(state.wallet_spent(AccountId(2)), 15);
        assert_eq!(state.wallet_position(AccountId(3)), FilledAmount::zero());
    }

    #[test]
    fn test_per_wallet_cap() {
        let pool = pool(50, 8);
        let mut ledger = setup(&pool);
        let mut state = FixedSwapPool::new();

        // 12 asked, cap truncates to 8
        let fill = state
            .swap(&pool, &mut ledger, AccountId(2), 12, 50)
            .unwrap();
        assert_eq!(fill.amount1, 8);
        assert_eq!(state.wallet_spent(AccountId(2)), 8);

        // wallet exhausted
        assert_eq!(
            state.swap(&pool, &mut ledger, AccountId(2), 1, 51),
            Err(PoolError::NotEligible(AccountId(2), pool.id))
        );
        // other wallets unaffected
        assert!(state.swap(&pool, &mut ledger, AccountId(3), 8, 52).is_ok());
    }

    #[test]
    fn test_creator_claim_with_fee() {
        let pool = pool(1_000, 0);
        let mut ledger = setup(&pool);
        let mut state = FixedSwapPool::new();
        let mut claims = ClaimLedger::new();
        let config = HouseConfig::new(AccountId(9), AssetId::Native);

        state
            .swap(&pool, &mut ledger, AccountId(2), 1_000, 50)
            .unwrap();

        // 1.5% of 1000 = 15
        let fill = state
            .creator_claim(&pool, &mut ledger, &mut claims, &config, AccountId(1), 200)
            .unwrap();
        assert_eq!(fill, FilledAmount::new(0, 985));
        assert_eq!(ledger.fee_sink_balance(T1), 15);

        assert_eq!(
            state.creator_claim(&pool, &mut ledger, &mut claims, &config, AccountId(1), 200),
            Err(PoolError::AlreadyClaimed(AccountId(1), pool.id))
        );
    }

    #[test]
    fn test_unsold_remainder_returns_to_creator() {
        let pool = pool(50, 0);
        let mut ledger = setup(&pool);
        let mut state = FixedSwapPool::new();
        let mut claims = ClaimLedger::new();
        let config = HouseConfig::new(AccountId(9), AssetId::Native);

        state
            .swap(&pool, &mut ledger, AccountId(2), 10, 50)
            .unwrap();
        let fill = state
            .creator_claim(&pool, &mut ledger, &mut claims, &config, AccountId(1), 200)
            .unwrap();
        assert_eq!(fill.amount0, 80);
        assert_eq!(ledger.balance(AccountId(1), T0), 80);
        assert_eq!(ledger.escrow_balance(pool.id, T0), 0);
    }

    #[test]
    fn test_window_gates() {
        let pool = pool(50, 0);
        let mut ledger = setup(&pool);
        let mut state = FixedSwapPool::new();

        assert_eq!(
            state.swap(&pool, &mut ledger, AccountId(2), 1, 5),
            Err(PoolError::PoolNotOpen(pool.id))
        );
        assert_eq!(
            state.swap(&pool, &mut ledger, AccountId(2), 1, 110),
            Err(PoolError::PoolClosed(pool.id))
        );
    }
}
