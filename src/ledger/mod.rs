//! In-memory asset ledger: wallets, per-pool escrow and the fee sink.
//!
//! ## Model
//!
//! A double-entry balance book keyed by `(holder, asset)`. Holders are
//! external accounts, one reserved escrow slot per pool, and a single fee
//! sink. Every operation either fully applies or returns an error with the
//! book untouched; both legs are checked before either is written.
//!
//! The ledger is the only place assets move. Engines express outcomes as
//! escrow moves and never touch balances directly, so a conservation check
//! (`total_supply` constant per asset) holds across any call sequence.
//!
//! ## Non-goals
//!
//! This is a stand-in for real token transfers: no approvals, no
//! reentrancy surface, no partial failure modes beyond a plain shortfall.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{PoolError, Result};
use crate::types::amount::{checked_add, checked_sub, fee_of};
use crate::types::{AccountId, AssetId, PoolId};

// ============================================================================
// Holder
// ============================================================================

/// Internal balance-book key: who holds an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Holder {
    /// An external wallet.
    Account(AccountId),
    /// The reserved escrow slot for one pool.
    Escrow(PoolId),
    /// The protocol fee sink.
    FeeSink,
}

// ============================================================================
// AssetLedger
// ============================================================================

/// The balance book.
#[derive(Debug, Default)]
pub struct AssetLedger {
    balances: HashMap<(Holder, AssetId), u64>,
}

impl AssetLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, holder: Holder, asset: AssetId) -> u64 {
        self.balances.get(&(holder, asset)).copied().unwrap_or(0)
    }

    /// Atomic transfer between two internal holders. Checks both legs
    /// before writing either.
    fn transfer(&mut self, from: Holder, to: Holder, asset: AssetId, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let from_bal = self.get(from, asset);
        if from_bal < amount {
            return Err(PoolError::TransferFailed);
        }
        let to_after = checked_add(self.get(to, asset), amount)?;
        self.balances.insert((from, asset), from_bal - amount);
        self.balances.insert((to, asset), to_after);
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Wallet operations
    // ------------------------------------------------------------------------

    /// Mint `amount` of `asset` into a wallet. Bootstrap/test helper; the
    /// embedding application funds wallets before pools open.
    pub fn deposit(&mut self, account: AccountId, asset: AssetId, amount: u64) -> Result<()> {
        let key = (Holder::Account(account), asset);
        let after = checked_add(self.get(Holder::Account(account), asset), amount)?;
        self.balances.insert(key, after);
        Ok(())
    }

    /// Wallet balance.
    pub fn balance(&self, account: AccountId, asset: AssetId) -> u64 {
        self.get(Holder::Account(account), asset)
    }

    /// Escrow held for a pool.
    pub fn escrow_balance(&self, pool: PoolId, asset: AssetId) -> u64 {
        self.get(Holder::Escrow(pool), asset)
    }

    /// Accumulated protocol fees.
    pub fn fee_sink_balance(&self, asset: AssetId) -> u64 {
        self.get(Holder::FeeSink, asset)
    }

    /// Total of an asset across wallets, escrows and the fee sink.
    /// Constant under every ledger operation except `deposit`.
    pub fn total_supply(&self, asset: AssetId) -> u64 {
        self.balances
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }

    // ------------------------------------------------------------------------
    // Escrow moves
    // ------------------------------------------------------------------------

    /// Pull `amount` of `asset` from a wallet into the pool's escrow.
    pub fn move_in(
        &mut self,
        pool: PoolId,
        from: AccountId,
        asset: AssetId,
        amount: u64,
    ) -> Result<()> {
        self.transfer(Holder::Account(from), Holder::Escrow(pool), asset, amount)?;
        debug!(%pool, %from, %asset, amount, "escrow in");
        Ok(())
    }

    /// Pay `amount` of `asset` from the pool's escrow to a wallet.
    pub fn move_out(
        &mut self,
        pool: PoolId,
        to: AccountId,
        asset: AssetId,
        amount: u64,
    ) -> Result<()> {
        self.transfer(Holder::Escrow(pool), Holder::Account(to), asset, amount)?;
        debug!(%pool, %to, %asset, amount, "escrow out");
        Ok(())
    }

    /// Pay `amount` from escrow, skimming `amount * ratio_bps / 10_000`
    /// (round down) to the fee sink. Returns `(net, fee)`.
    ///
    /// The escrow leg is checked for the full amount up front, so a
    /// shortfall fails before either payout happens.
    pub fn move_out_with_fee(
        &mut self,
        pool: PoolId,
        to: AccountId,
        asset: AssetId,
        amount: u64,
        ratio_bps: u64,
    ) -> Result<(u64, u64)> {
        let fee = fee_of(amount, ratio_bps)?;
        let net = checked_sub(amount, fee)?;
        if self.get(Holder::Escrow(pool), asset) < amount {
            return Err(PoolError::TransferFailed);
        }
        self.transfer(Holder::Escrow(pool), Holder::FeeSink, asset, fee)?;
        self.transfer(Holder::Escrow(pool), Holder::Account(to), asset, net)?;
        debug!(%pool, %to, %asset, net, fee, "escrow out with fee");
        Ok((net, fee))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
