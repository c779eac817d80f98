//! Base scale and decimal normalisation.
//!
//! Every reserve, price and liquidity value inside the engine is expressed
//! in the 9-decimal base scale. Assets with fewer native decimals are
//! multiplied up by `10^(9 - decimals)`; assets with more are rejected when
//! their [`Decimals`] is constructed.
//!
//! | Quantity | Native decimals | Factor to base |
//! |----------|-----------------|----------------|
//! | asset with 6 decimals | 6 | 1 000 |
//! | asset with 9 decimals | 9 | 1 |
//! | LP token | 6 | 1 000 |

use crate::domain::{Amount, Decimals};
use crate::error::{ClammError, Result};

/// Decimal digits of the base scale.
pub const SCALE_DECIMALS: u8 = 9;

/// `10^9`, the base-scale unit.
pub const SCALE: u128 = 1_000_000_000;

/// Native decimals of the LP token.
pub const LP_DECIMALS: u8 = 6;

/// Base-scale liquidity units per native LP token unit (`10^(9-6)`).
pub const LP_SCALE_FACTOR: u128 = 1_000;

/// Fixed LP token supply minted once at bootstrap; outstanding supply is
/// whatever is not held by the pool.
pub const LP_TOTAL_SUPPLY: u128 = u64::MAX as u128;

/// Converts a native amount to base scale: `native · 10^(9 - decimals)`.
///
/// # Errors
///
/// Returns [`ClammError::Overflow`] if the product does not fit in `u128`.
pub fn to_base(native: Amount, decimals: Decimals) -> Result<Amount> {
    native
        .get()
        .checked_mul(decimals.scale_factor())
        .map(Amount::new)
        .ok_or(ClammError::Overflow("native to base conversion"))
}

/// Converts a base-scale amount to native units, truncating the remainder.
pub fn from_base(base: Amount, decimals: Decimals) -> Amount {
    Amount::new(base.get() / decimals.scale_factor())
}

/// Rounds a base-scale payout down to whole native units.
///
/// Returns `(native, consumed_base)` where `consumed_base` is the base
/// amount the native payout actually accounts for, so the pool never pays
/// out more than it books.
pub fn round_down_to_native(base: Amount, decimals: Decimals) -> (Amount, Amount) {
    let factor = decimals.scale_factor();
    let native = base.get() / factor;
    (Amount::new(native), Amount::new(native * factor))
}

/// Converts native LP token units to base-scale liquidity units.
///
/// # Errors
///
/// Returns [`ClammError::Overflow`] if the product does not fit in `u128`.
pub fn lp_to_base(lp: Amount) -> Result<u128> {
    lp.get()
        .checked_mul(LP_SCALE_FACTOR)
        .ok_or(ClammError::Overflow("lp to base conversion"))
}

/// Converts base-scale liquidity units to native LP token units, truncating.
pub const fn base_to_lp(base: u128) -> Amount {
    Amount::new(base / LP_SCALE_FACTOR)
}

/// Maximum liquidity decrease treated as rounding noise:
/// `scale_a · scale_b + scale_a + scale_b`.
///
/// Bounds the error compounded by the two truncating divisions applied per
/// operation (one per asset).
#[must_use]
pub const fn allowed_drop(scale_a: u128, scale_b: u128) -> u128 {
    scale_a * scale_b + scale_a + scale_b
}
