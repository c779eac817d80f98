//! Property-based tests using `proptest` for pool invariant validation.
//!
//! Covers:
//!
//! 1. **Liquidity monotonicity**: adding reserves never lowers `L`.
//! 2. **Price bounds**: the spot price stays inside the range.
//! 3. **Swap liquidity**: a committed swap never lowers `L`.
//! 4. **Swap reversibility**: a round trip A→B→A returns at most the input.
//! 5. **Quote consistency**: quotes match executed swaps.
//! 6. **Withdrawal backing**: a sole provider never gets back more than
//!    they deposited.
//! 7. **Fee split exactness**: user and protocol shares add up.
//! 8. **Flat continuity**: a very narrow range trades like a flat one.
//! 9. **Reserve round trip**: reserves rebuilt from `(L, price)` match the
//!    reserves they came from.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use crate::config::PoolConfig;
use crate::domain::{
    AccountId, Amount, Asset, AssetId, AssetPair, Decimals, FeeRate, Liquidity, PoolId, Price,
    PriceRange,
};
use crate::error::ClammError;
use crate::ledger::split_fee_liquidity;
use crate::math::curve;
use crate::math::scale::{LP_TOTAL_SUPPLY, SCALE};
use crate::pools::ClammPool;
use crate::testing::SimulatedServices;
use crate::traits::{FromConfig, IdentityInfo};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

const A: AssetId = AssetId::new(1);
const B: AssetId = AssetId::new(2);
const LP: AssetId = AssetId::new(100);

fn provider() -> AccountId {
    AccountId::from_bytes([1u8; 32])
}

fn range(min: u128, max: u128) -> PriceRange {
    let Ok(r) = PriceRange::new(Price::new(min), Price::new(max)) else {
        panic!("valid range");
    };
    r
}

fn services() -> SimulatedServices {
    let mut s = SimulatedServices::new(AccountId::from_bytes([9u8; 32]));
    s.transfer.receive(LP, Amount::new(LP_TOTAL_SUPPLY));
    s
}

fn make_pool(s: &SimulatedServices, min: u128, max: u128, fee: u128) -> ClammPool {
    let Ok(d) = Decimals::new(6) else {
        panic!("valid decimals");
    };
    let Ok(pair) = AssetPair::new(Asset::new(A, d), Asset::new(B, d)) else {
        panic!("valid pair");
    };
    let Ok(fee) = FeeRate::new(fee) else {
        panic!("valid fee");
    };
    let Ok(cfg) = PoolConfig::new(PoolId::new(1), pair, LP, range(min, max), fee, s.bindings())
    else {
        panic!("valid config");
    };
    let Ok(pool) = ClammPool::from_config(&cfg) else {
        panic!("valid pool");
    };
    pool
}

/// Whether a pool call may reject this input outright: dust in or out, or
/// a trade that would drain one side past the range bound.
fn is_expected_rejection(e: &ClammError) -> bool {
    matches!(e, ClammError::ZeroOutput(_) | ClammError::InsufficientReserve(_))
}

/// Funds the pool and deposits. `None` only for a dust deposit that
/// mints nothing; any other error fails the case.
fn funded(
    s: &mut SimulatedServices,
    pool: &mut ClammPool,
    a: u128,
    b: u128,
) -> Result<Option<Amount>, TestCaseError> {
    s.transfer.receive(A, Amount::new(a));
    s.transfer.receive(B, Amount::new(b));
    let mut ctx = s.context(provider());
    match pool.deposit(&mut ctx, Amount::new(a), Amount::new(b), Amount::ZERO) {
        Ok(r) => Ok(Some(r.lp_minted)),
        Err(ClammError::ZeroOutput(_)) => Ok(None),
        Err(e) => Err(TestCaseError::fail(format!("deposit {a}/{b} failed: {e}"))),
    }
}

/// Swaps `amount` of `asset`. `None` for an expected rejection; any other
/// error fails the case.
fn swap(
    s: &mut SimulatedServices,
    pool: &mut ClammPool,
    asset: AssetId,
    amount: u128,
) -> Result<Option<Amount>, TestCaseError> {
    s.transfer.receive(asset, Amount::new(amount));
    let mut ctx = s.context(provider());
    match pool.swap(&mut ctx, asset, Amount::new(amount), Amount::ZERO) {
        Ok(r) => Ok(Some(r.amount_out)),
        Err(e) if is_expected_rejection(&e) => Ok(None),
        Err(e) => Err(TestCaseError::fail(format!("swap of {amount} failed: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Price bounds in [0.1, 10], at least 1% apart.
fn range_strategy() -> impl Strategy<Value = (u128, u128)> {
    (100_000_000u128..=5_000_000_000u128, 10u128..=100u128)
        .prop_map(|(min, pct)| (min, min + min * pct / 100))
}

/// Base-scale reserves in [1e6, 1e15].
fn base_reserve_strategy() -> impl Strategy<Value = u128> {
    1_000_000u128..=1_000_000_000_000_000u128
}

/// Native deposits for 6-decimal assets in [1e3, 1e10].
fn native_deposit_strategy() -> impl Strategy<Value = u128> {
    1_000u128..=10_000_000_000u128
}

// ---------------------------------------------------------------------------
// Curve properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_liquidity_monotone_in_reserves(
        (min, max) in range_strategy(),
        x in base_reserve_strategy(),
        y in base_reserve_strategy(),
        dx in 0u128..=1_000_000_000_000u128,
        dy in 0u128..=1_000_000_000_000u128,
    ) {
        let r = range(min, max);
        let Ok(before) = curve::liquidity_from_reserves(Amount::new(x), Amount::new(y), &r) else {
            return Ok(());
        };
        let Ok(after) = curve::liquidity_from_reserves(Amount::new(x + dx), Amount::new(y + dy), &r)
        else {
            return Ok(());
        };
        prop_assert!(
            after.get() + 2 >= before.get(),
            "liquidity fell: before={} after={}",
            before.get(), after.get()
        );
    }

    #[test]
    fn prop_price_inside_range(
        (min, max) in range_strategy(),
        x in 0u128..=1_000_000_000_000_000u128,
        y in 0u128..=1_000_000_000_000_000u128,
    ) {
        prop_assume!(x > 0 || y > 0);
        let r = range(min, max);
        let (x, y) = (Amount::new(x), Amount::new(y));
        let Ok(l) = curve::liquidity_from_reserves(x, y, &r) else {
            return Ok(());
        };
        prop_assume!(!l.is_zero());
        let Ok(p) = curve::price_from_reserves(x, y, &r, l) else {
            return Ok(());
        };
        prop_assert!(p.get() + 10 >= min, "price {} below {}", p.get(), min);
        prop_assert!(p.get() <= max + 10, "price {} above {}", p.get(), max);
    }

    #[test]
    fn prop_reserves_round_trip(
        (min, max) in range_strategy(),
        x in base_reserve_strategy(),
        y in base_reserve_strategy(),
    ) {
        let r = range(min, max);
        let (xa, ya) = (Amount::new(x), Amount::new(y));
        let l = curve::liquidity_from_reserves(xa, ya, &r)
            .map_err(|e| TestCaseError::fail(format!("liquidity: {e}")))?;
        let p = curve::price_from_reserves(xa, ya, &r, l)
            .map_err(|e| TestCaseError::fail(format!("price: {e}")))?;
        let sp = p.sqrt().map_err(|e| TestCaseError::fail(format!("sqrt: {e}")))?;
        // Rounding can land a price a hair outside the range.
        prop_assume!(sp >= r.sqrt_min() && sp <= r.sqrt_max());
        let (rx, ry) = curve::reserves_from_price(l, p, &r)
            .map_err(|e| TestCaseError::fail(format!("reserves: {e}")))?;
        let tol_x = 4 * l.get() * SCALE / (sp * sp) + 4;
        let tol_y = 4 * l.get() / SCALE + 4;
        prop_assert!(rx.get().abs_diff(x) <= tol_x, "x {} vs {} (tol {})", rx.get(), x, tol_x);
        prop_assert!(ry.get().abs_diff(y) <= tol_y, "y {} vs {} (tol {})", ry.get(), y, tol_y);
    }

    #[test]
    fn prop_fee_split_exact(
        delta in 0u128..=u128::from(u64::MAX),
        fraction in 0u128..=SCALE,
    ) {
        let Ok(split) = split_fee_liquidity(Liquidity::new(delta), fraction) else {
            panic!("split");
        };
        prop_assert_eq!(split.total(), delta);
        prop_assert!(split.protocol.get() <= delta * fraction / SCALE + 1);
    }

    #[test]
    fn prop_narrow_range_trades_like_flat(
        min in 100_000_000u128..=10_000_000_000u128,
        x in 1_000_000_000u128..=1_000_000_000_000_000u128,
        y in 1_000_000_000u128..=1_000_000_000_000_000u128,
        divisor in 10u128..=10_000u128,
    ) {
        let narrow = range(min, min + min / 1_000_000 + 1);
        let flat = range(min, min);
        let (xa, ya) = (Amount::new(x), Amount::new(y));
        let d = Amount::new((x / divisor).max(1));
        let Ok(l) = curve::liquidity_from_reserves(xa, ya, &narrow) else {
            return Ok(());
        };
        let Ok(w) = curve::swap_output_for_a_deposit(d, xa, ya, &narrow, l) else {
            return Ok(());
        };
        let Ok(w_flat) = curve::swap_output_for_a_deposit(d, xa, ya, &flat, Liquidity::ZERO) else {
            return Ok(());
        };
        let b = narrow.sqrt_max();
        let ceiling = d.get() * (b * b / SCALE) / SCALE + 2;
        let slack = w_flat.get() / 1_000_000_000 + 2;
        prop_assert!(w.get() + slack >= w_flat.get(), "narrow {} < flat {}", w.get(), w_flat.get());
        prop_assert!(w.get() <= ceiling, "narrow {} above {}", w.get(), ceiling);
    }
}

// ---------------------------------------------------------------------------
// Pool properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_swap_never_lowers_liquidity(
        (min, max) in range_strategy(),
        a in native_deposit_strategy(),
        b in native_deposit_strategy(),
        divisor in 2u128..=1_000u128,
        sell_b in any::<bool>(),
    ) {
        let mut s = services();
        let mut pool = make_pool(&s, min, max, 3_000_000);
        if funded(&mut s, &mut pool, a, b)?.is_none() {
            return Ok(());
        }
        let before = pool.ledger().liquidity();
        let (asset, amount) = if sell_b { (B, b / divisor) } else { (A, a / divisor) };
        if swap(&mut s, &mut pool, asset, amount)?.is_none() {
            return Ok(());
        }
        prop_assert!(pool.ledger().liquidity() >= before);
    }

    #[test]
    fn prop_swap_reversibility(
        (min, max) in range_strategy(),
        a in native_deposit_strategy(),
        b in native_deposit_strategy(),
        divisor in 2u128..=1_000u128,
    ) {
        let mut s = services();
        let mut pool = make_pool(&s, min, max, 3_000_000);
        if funded(&mut s, &mut pool, a, b)?.is_none() {
            return Ok(());
        }
        let swap_in = a / divisor;
        let Some(received_b) = swap(&mut s, &mut pool, A, swap_in)? else {
            return Ok(());
        };
        let Some(final_a) = swap(&mut s, &mut pool, B, received_b.get())? else {
            return Ok(());
        };
        prop_assert!(
            final_a.get() <= swap_in,
            "round-trip should lose value: final={} > original={}",
            final_a.get(), swap_in
        );
    }

    #[test]
    fn prop_quote_matches_swap(
        (min, max) in range_strategy(),
        a in native_deposit_strategy(),
        b in native_deposit_strategy(),
        divisor in 2u128..=1_000u128,
    ) {
        let mut s = services();
        let mut pool = make_pool(&s, min, max, 3_000_000);
        if funded(&mut s, &mut pool, a, b)?.is_none() {
            return Ok(());
        }
        let amount = b / divisor;
        let quoted = match pool.quote_swap(B, Amount::new(amount), &IdentityInfo::default()) {
            Ok(quoted) => quoted,
            Err(e) if is_expected_rejection(&e) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(format!("quote failed: {e}"))),
        };
        let out = swap(&mut s, &mut pool, B, amount)?;
        prop_assert_eq!(Some(quoted), out, "quoted swap must execute at the quote");
    }

    #[test]
    fn prop_sole_provider_withdrawal_is_backed(
        (min, max) in range_strategy(),
        a in native_deposit_strategy(),
        b in native_deposit_strategy(),
    ) {
        let mut s = services();
        let mut pool = make_pool(&s, min, max, 0);
        let Some(lp) = funded(&mut s, &mut pool, a, b)? else {
            return Ok(());
        };
        let mut ctx = s.context(provider());
        let r = match pool.withdraw(&mut ctx, lp) {
            Ok(r) => r,
            Err(ClammError::ZeroOutput(_)) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(format!("withdraw of {lp} failed: {e}"))),
        };
        prop_assert!(r.sent_a.get() <= a, "sent {} of {} A", r.sent_a.get(), a);
        prop_assert!(r.sent_b.get() <= b, "sent {} of {} B", r.sent_b.get(), b);
        prop_assert_eq!(pool.lp_outstanding(), Amount::ZERO);
    }
}
