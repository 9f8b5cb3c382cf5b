//! Claim ledger shared by every engine.
//!
//! One successful claim per principal per pool, plus a separate per-pool
//! creator flag. Claim handlers follow a fixed order: validate, compute
//! the payout, record it here, then move assets. The recorded
//! [`FilledAmount`] doubles as a read-back view of what a claim paid.

use std::collections::{HashMap, HashSet};

use crate::error::{PoolError, Result};
use crate::types::{AccountId, FilledAmount, PoolId};

/// Claimed-state book for all pools.
#[derive(Debug, Default)]
pub struct ClaimLedger {
    claimed: HashMap<(PoolId, AccountId), FilledAmount>,
    creator_claimed: HashSet<PoolId>,
}

impl ClaimLedger {
    /// Create an empty claim ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this principal already claimed this pool.
    pub fn is_claimed(&self, pool: PoolId, account: AccountId) -> bool {
        self.claimed.contains_key(&(pool, account))
    }

    /// What a past claim paid out, if any.
    pub fn claimed_amount(&self, pool: PoolId, account: AccountId) -> Option<FilledAmount> {
        self.claimed.get(&(pool, account)).copied()
    }

    /// Record a participant claim. Fails without side effects on repeat.
    pub fn record(&mut self, pool: PoolId, account: AccountId, fill: FilledAmount) -> Result<()> {
        if self.is_claimed(pool, account) {
            return Err(PoolError::AlreadyClaimed(account, pool));
        }
        self.claimed.insert((pool, account), fill);
        Ok(())
    }

    /// Whether the creator already claimed this pool.
    pub fn is_creator_claimed(&self, pool: PoolId) -> bool {
        self.creator_claimed.contains(&pool)
    }

    /// Record the creator claim. Fails without side effects on repeat.
    pub fn record_creator(&mut self, pool: PoolId, creator: AccountId) -> Result<()> {
        if !self.creator_claimed.insert(pool) {
            return Err(PoolError::AlreadyClaimed(creator, pool));
        }
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
