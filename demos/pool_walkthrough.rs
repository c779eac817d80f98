//! Concentrated-liquidity pool walkthrough.
//!
//! Bootstraps a 0.8 - 1.25 pool over in-memory collaborators, provides
//! liquidity, trades both ways, skims protocol fees and withdraws.
//!
//! # Run
//!
//! ```bash
//! cargo run --example pool_walkthrough
//! ```

use clamm::config::PoolConfig;
use clamm::domain::{
    AccountId, Amount, Asset, AssetId, AssetPair, Decimals, FeeRate, Liquidity, PoolId, Price,
    PriceRange,
};
use clamm::math::scale::LP_TOTAL_SUPPLY;
use clamm::pools::ClammPool;
use clamm::testing::SimulatedServices;
use clamm::traits::{FromConfig, IdentityInfo};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Concentrated-liquidity pool ===\n");

    let (usdc, eurc, lp) = (AssetId::new(1), AssetId::new(2), AssetId::new(3));
    let executor = AccountId::from_bytes([9u8; 32]);
    let provider = AccountId::from_bytes([1u8; 32]);
    let trader = AccountId::from_bytes([2u8; 32]);

    // ── 1. Configure ────────────────────────────────────────────────────
    let six = Decimals::new(6)?;
    let pair = AssetPair::new(Asset::new(usdc, six), Asset::new(eurc, six))?;
    let range = PriceRange::new(Price::new(800_000_000), Price::new(1_250_000_000))?;
    let fee = FeeRate::new(3_000_000)?;

    let mut services = SimulatedServices::new(executor);
    // 10% of fee liquidity goes to the protocol.
    services.config.protocol_fee_fraction = 100_000_000;
    let config = PoolConfig::new(PoolId::new(1), pair, lp, range, fee, services.bindings())?;

    // ── 2. Bootstrap; the pool holds the whole LP supply ────────────────
    let mut pool = ClammPool::from_config(&config)?;
    services.transfer.receive(lp, Amount::new(LP_TOTAL_SUPPLY));
    println!("Pool {} created", pool.id());
    println!("  Range:  {} .. {}", range.price_min(), range.price_max());
    println!("  Fee:    {fee}");
    println!("  Price:  {}", pool.current_price());

    // ── 3. Provide 1000 USDC + 1000 EURC ────────────────────────────────
    let amount = Amount::new(1_000_000_000);
    services.transfer.receive(usdc, amount);
    services.transfer.receive(eurc, amount);
    let deposit = pool.deposit(&mut services.context(provider), amount, amount, Amount::ZERO)?;
    println!("\n--- Deposit ---");
    println!("  LP minted:  {}", deposit.lp_minted);
    println!("  Liquidity:  {}", deposit.liquidity_after);
    println!("  Price:      {}", deposit.price);

    // ── 4. Quote, then sell 10 USDC ─────────────────────────────────────
    let sell = Amount::new(10_000_000);
    let quoted = pool.quote_swap(usdc, sell, &IdentityInfo::default())?;
    services.transfer.receive(usdc, sell);
    let swap = pool.swap(&mut services.context(trader), usdc, sell, quoted)?;
    println!("\n--- Swap: sell {sell} USDC ---");
    println!("  Quoted:  {quoted}");
    println!("  {swap}");

    // ── 5. Sell the EURC back ───────────────────────────────────────────
    services.transfer.receive(eurc, swap.amount_out);
    let back = pool.swap(&mut services.context(trader), eurc, swap.amount_out, Amount::ZERO)?;
    println!("\n--- Swap: sell {} EURC ---", swap.amount_out);
    println!("  {back}");
    println!("  Round-trip loss:  {} USDC", sell.get().saturating_sub(back.amount_out.get()));

    // ── 6. Skim protocol fees ───────────────────────────────────────────
    let (skimmed, fee_a, fee_b) =
        pool.skim_protocol_fees(&mut services.context(executor), Liquidity::ZERO)?;
    println!("\n--- Protocol fees ---");
    println!("  Liquidity skimmed:  {skimmed}");
    println!("  Sent:               {fee_a} USDC + {fee_b} EURC");

    // ── 7. Withdraw everything ──────────────────────────────────────────
    services.transfer.receive(lp, deposit.lp_minted);
    let out = pool.withdraw(&mut services.context(provider), deposit.lp_minted)?;
    println!("\n--- Withdraw ---");
    println!("  Received:   {} USDC + {} EURC", out.sent_a, out.sent_b);
    println!("  Fee share:  {}", out.fee_share);

    let status = pool.status();
    println!("\nFinal liquidity:  {}", status.liquidity);
    println!("Trades recorded:  {}", services.stats.events.len());

    println!("\n=== Done ===");
    Ok(())
}
