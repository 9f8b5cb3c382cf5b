//! Matching and settlement engines.
//!
//! One module per sale mechanism, a shared claim ledger, and the
//! [`AuctionHouse`] facade that owns all state and dispatches entry
//! points by pool kind:
//!
//! - [`ascending`]: ascending clearing auction (each bid outbids the last)
//! - [`sealed`]: sealed-bid batch auction settled by price priority
//! - [`prorata`]: fixed-price swap with immediate delivery
//! - [`lottery`]: fixed-ticket draw over a rolling hash chain
//!
//! Engines hold per-pool running state only; pool records are the
//! registry's, balances the ledger's. Every engine entry point takes the
//! clock as an explicit `now` argument, nothing reads ambient time.

pub mod ascending;
pub mod claims;
pub mod house;
pub mod lottery;
pub mod prorata;
pub mod sealed;

pub use ascending::AscendingPool;
pub use claims::ClaimLedger;
pub use house::AuctionHouse;
pub use lottery::LotteryPool;
pub use prorata::FixedSwapPool;
pub use sealed::{SealedPool, Settlement};
