//! Auction House - Demo Binary
//!
//! Walks one sealed-bid pool end to end: create, bid, settle, claim.
//! Installs a fmt tracing subscriber so the engine's log lines show up.

use auction_house::types::{AccountId, AssetId, CreateReq, PoolTerms};
use auction_house::{AuctionHouse, PoolError};

fn main() -> Result<(), PoolError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("===========================================");
    println!("  Auction House - Sealed-Bid Walkthrough");
    println!("===========================================");
    println!();

    let creator = AccountId(1);
    let alice = AccountId(2);
    let bob = AccountId(3);
    let sale_token = AssetId::Token(0);

    let mut house = AuctionHouse::new(AccountId(0), AssetId::Token(9));
    house.deposit(creator, sale_token, 20)?;
    house.deposit(alice, AssetId::Native, 1_000)?;
    house.deposit(bob, AssetId::Native, 1_000)?;

    println!("Creating sealed-bid pool: 20 token0, reserve 10...");
    let id = house.create(
        CreateReq {
            creator,
            token0: sale_token,
            token1: AssetId::Native,
            amount_total0: 20,
            open_at: 10,
            duration_seconds: 3_600,
            only_bot_holder: false,
            enable_white_list: false,
            enable_kyc_list: false,
            terms: PoolTerms::SealedBid {
                amount_min1: 10,
                min_amount1_per_bid: 0,
            },
        },
        vec![],
        0,
    )?;
    println!("  Pool: {}", id);
    println!();

    println!("Bidding...");
    house.bid(id, alice, 10, 10, 100)?; // price 1.0
    house.bid(id, bob, 40, 20, 101)?; // price 0.5
    println!("  alice: 10 token0 for 10 token1");
    println!("  bob:   40 token0 for 20 token1");
    println!();

    let receipt = house.settlement_receipt(id)?;
    println!("Settlement:");
    println!("  filled0: {}", receipt.filled0);
    println!("  filled1: {}", receipt.filled1);
    println!("  orders:  {}", receipt.order_count);
    println!("  digest:  {}", receipt.digest_hex());
    println!();

    println!("Claiming after close...");
    let creator_fill = house.creator_claim(id, creator, 10_000)?;
    let alice_fill = house.participant_claim(id, alice, 10_000)?;
    let bob_fill = house.participant_claim(id, bob, 10_000)?;
    println!(
        "  creator: {} token0 back, {} token1 net of fee",
        creator_fill.amount0, creator_fill.amount1
    );
    println!("  alice:   {} token0 won", alice_fill.amount0);
    println!(
        "  bob:     {} token0 won, {} token1 refunded",
        bob_fill.amount0, bob_fill.amount1
    );
    println!();
    println!(
        "Escrow drained: token0 {}, token1 {}",
        house.ledger().escrow_balance(id, sale_token),
        house.ledger().escrow_balance(id, AssetId::Native)
    );
    Ok(())
}
