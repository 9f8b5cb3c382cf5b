//! # Auction House
//!
//! Deterministic matching and settlement engines for fixed-supply token
//! sales: ascending clearing auctions, sealed-bid batch auctions,
//! fixed-price swaps and lottery draws, all sharing one asset ledger,
//! pool registry and claim ledger.
//!
//! ## Architecture
//!
//! - **Types**: identifiers, exact integer amounts, pool terms, bids,
//!   settlement receipts
//! - **Ledger**: the balance book; the only place assets move
//! - **Registry**: pool records, time windows, access gates
//! - **Engine**: the four sale mechanisms behind the [`AuctionHouse`]
//!   facade
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs always settle identically; SSZ +
//!    SHA-256 receipts make outcomes comparable byte for byte
//! 2. **No Floating Point**: amounts are `u64` smallest units, prices are
//!    exact rationals compared via `u128` cross-multiplication
//! 3. **Validate Then Mutate**: an error return always means no state
//!    change
//! 4. **Explicit Clock**: every time-dependent call takes `now`; nothing
//!    reads ambient time
//!
//! ## Example
//!
//! ```
//! use auction_house::{AuctionHouse, CreateReq, PoolTerms};
//! use auction_house::types::{AccountId, AssetId};
//!
//! let mut house = AuctionHouse::new(AccountId(0), AssetId::Token(9));
//! house.deposit(AccountId(1), AssetId::Token(0), 100).unwrap();
//! house.deposit(AccountId(2), AssetId::Native, 1_000).unwrap();
//!
//! let id = house.create(
//!     CreateReq {
//!         creator: AccountId(1),
//!         token0: AssetId::Token(0),
//!         token1: AssetId::Native,
//!         amount_total0: 100,
//!         open_at: 10,
//!         duration_seconds: 3_600,
//!         only_bot_holder: false,
//!         enable_white_list: false,
//!         enable_kyc_list: false,
//!         terms: PoolTerms::FixedSwap {
//!             amount_total1: 50,
//!             max_amount1_per_wallet: 0,
//!         },
//!     },
//!     vec![],
//!     0,
//! ).unwrap();
//!
//! // 10 token1 buys 20 token0 at the fixed rate, delivered immediately
//! let fill = house.swap(id, AccountId(2), 10, 100).unwrap();
//! assert_eq!((fill.amount0, fill.amount1), (20, 10));
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// House-wide configuration and governor-gated updates
pub mod config;

/// Matching and settlement engines plus the facade
pub mod engine;

/// Error taxonomy shared by every operation
pub mod error;

/// Asset ledger: wallets, escrow, fee sink
pub mod ledger;

/// Pool registry: records, windows, access gates
pub mod registry;

/// Core data types: identifiers, amounts, pools, bids, receipts
pub mod types;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::HouseConfig;
pub use engine::{AuctionHouse, ClaimLedger};
pub use error::{PoolError, Result};
pub use ledger::AssetLedger;
pub use registry::PoolRegistry;
pub use types::{
    AccountId, AssetId, Bid, CreateReq, FilledAmount, Pool, PoolId, PoolStatus, PoolTerms,
    SettlementReceipt,
};
