//! Error taxonomy shared by every pool engine.
//!
//! Every failure is fatal for the call that raised it: the entry point
//! validates first and mutates only after all checks pass, so a returned
//! error always means "no state change". Nothing is retried internally;
//! the caller decides whether to resubmit.

use thiserror::Error;

use crate::types::{AccountId, PoolId};

/// Errors returned by pool creation, bidding, swapping, betting and claims.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Malformed create parameters (zero amounts, inverted windows, ...).
    #[error("invalid pool terms: {0}")]
    InvalidTerms(&'static str),

    /// Whitelist / KYC / governance-holding gate rejected the caller.
    #[error("account {0} is not eligible for pool {1}")]
    NotEligible(AccountId, PoolId),

    /// No pool with this id exists.
    #[error("pool {0} does not exist")]
    PoolNotFound(PoolId),

    /// Operation requires the pool to be open and it has not opened yet.
    #[error("pool {0} is not open yet")]
    PoolNotOpen(PoolId),

    /// Operation requires the pool to be open and it has already closed
    /// (or its supply is exhausted).
    #[error("pool {0} is closed")]
    PoolClosed(PoolId),

    /// Claim attempted before the close of the bidding window.
    #[error("pool {0} is not closed yet")]
    PoolNotClosed(PoolId),

    /// Bid price does not beat the pool's current price requirement.
    #[error("bid price is lower than the current price")]
    PriceTooLow,

    /// Committed amount1 is below the pool's per-bid minimum.
    #[error("bid amount is lower than the pool minimum")]
    BidBelowMinimum,

    /// Sealed-bid pool already holds the configured maximum of live orders.
    #[error("pool {0} reached the maximum bid count")]
    MaxBidCountReached(PoolId),

    /// A second claim by the same principal.
    #[error("account {0} has already claimed pool {1}")]
    AlreadyClaimed(AccountId, PoolId),

    /// A second lottery entry by the same account.
    #[error("account {0} has already bet in pool {1}")]
    AlreadyBet(AccountId, PoolId),

    /// Lottery claim by an account that never bet.
    #[error("account {0} has not bet in pool {1}")]
    NotAPlayer(AccountId, PoolId),

    /// Creator-only operation called by someone else.
    #[error("account {0} is not the creator of pool {1}")]
    NotCreator(AccountId, PoolId),

    /// The asset ledger refused a move (insufficient balance).
    #[error("asset transfer failed")]
    TransferFailed,

    /// Arithmetic left the representable range; the call aborts rather
    /// than settle on a wrong number.
    #[error("amount arithmetic overflow")]
    AmountOverflow,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PoolError>;
