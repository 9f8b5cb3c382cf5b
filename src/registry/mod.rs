//! Pool registry: creation, lookup and participation gates.
//!
//! Pools are append-only. Creation validates the request, pulls the full
//! token0 stock into the pool's escrow, then records the pool; any failure
//! along the way leaves both the book and the ledger untouched (the escrow
//! pull is the last fallible step before the append).

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::config::HouseConfig;
use crate::error::{PoolError, Result};
use crate::ledger::AssetLedger;
use crate::types::{AccountId, CreateReq, Pool, PoolId};

/// The append-only pool book plus per-pool access lists.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: Vec<Pool>,
    access_lists: HashMap<PoolId, HashSet<AccountId>>,
}

impl PoolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new pool.
    ///
    /// Validates the request, requires `open_at` strictly in the future,
    /// escrows `amount_total0` of token0 from the creator, then appends the
    /// record. `access_list` is stored only when the request enables a
    /// whitelist or KYC gate.
    pub fn create(
        &mut self,
        ledger: &mut AssetLedger,
        req: CreateReq,
        access_list: Vec<AccountId>,
        now: u64,
    ) -> Result<PoolId> {
        req.validate()?;
        if req.open_at <= now {
            return Err(PoolError::InvalidTerms("open_at must be in the future"));
        }
        let id = PoolId(self.pools.len() as u64);
        ledger.move_in(id, req.creator, req.token0, req.amount_total0)?;

        if req.enable_white_list || req.enable_kyc_list {
            self.access_lists
                .insert(id, access_list.into_iter().collect());
        }
        let pool = Pool {
            id,
            creator: req.creator,
            token0: req.token0,
            token1: req.token1,
            amount_total0: req.amount_total0,
            open_at: req.open_at,
            close_at: req.open_at + req.duration_seconds,
            only_bot_holder: req.only_bot_holder,
            enable_white_list: req.enable_white_list,
            enable_kyc_list: req.enable_kyc_list,
            terms: req.terms,
        };
        info!(
            pool = %id,
            creator = %pool.creator,
            kind = pool.terms.kind(),
            amount_total0 = pool.amount_total0,
            "pool created"
        );
        self.pools.push(pool);
        Ok(id)
    }

    /// Look up a pool.
    pub fn get(&self, id: PoolId) -> Result<&Pool> {
        self.pools
            .get(id.0 as usize)
            .ok_or(PoolError::PoolNotFound(id))
    }

    /// Number of pools ever created.
    #[inline]
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// True when no pool has been created yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// Single participation predicate for every engine entry point.
    ///
    /// Checks, in order: access-list membership when whitelist/KYC is
    /// enabled, then the governance-token holding floor when the pool sets
    /// `only_bot_holder`. The creator is not exempt.
    pub fn ensure_eligible(
        &self,
        pool: &Pool,
        account: AccountId,
        config: &HouseConfig,
        ledger: &AssetLedger,
    ) -> Result<()> {
        if pool.enable_white_list || pool.enable_kyc_list {
            let listed = self
                .access_lists
                .get(&pool.id)
                .is_some_and(|set| set.contains(&account));
            if !listed {
                return Err(PoolError::NotEligible(account, pool.id));
            }
        }
        if pool.only_bot_holder
            && ledger.balance(account, config.bot_token) < config.min_bot_holdings
        {
            return Err(PoolError::NotEligible(account, pool.id));
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
