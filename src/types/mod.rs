//! Core data types for the auction house.
//!
//! All wire-facing types implement SSZ serialization for deterministic
//! encoding. All amounts are `u64` integers in the asset's smallest unit;
//! prices are exact rationals compared by cross-multiplication, never
//! floating point.
//!
//! ## Types
//!
//! - [`AccountId`] / [`PoolId`] / [`AssetId`]: opaque identifiers
//! - [`Pool`] / [`PoolTerms`] / [`CreateReq`]: pool records and terms
//! - [`PoolStatus`]: the Pending/Open/Closed window machine
//! - [`Bid`]: a sealed-bid order
//! - [`FilledAmount`] / [`SettlementReceipt`]: settlement outputs

mod asset;
mod bid;
mod pool;
pub mod amount;

// Re-export all types at module level
pub use asset::{AccountId, AssetId, PoolId};
pub use bid::{Bid, FilledAmount, SettlementReceipt};
pub use pool::{CreateReq, Pool, PoolStatus, PoolTerms};
