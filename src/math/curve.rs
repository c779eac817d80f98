//! Bounded-range curve math.
//!
//! The pool curve is
//!
//! ```text
//! (x + L/√Pmax) · (y + L·√Pmin) = L²
//! ```
//!
//! where `x`, `y` are the reserves of asset A and B and `L` is the
//! liquidity. Expanding gives a quadratic in `L`:
//!
//! ```text
//! L²·(1 − √Pmin/√Pmax) − L·(x·√Pmin + y/√Pmax) − x·y = 0
//! ```
//!
//! All functions here are pure and take base-scale integers. Writing
//! `S = SCALE`, `a = √Pmin·S`, `b = √Pmax·S`, the real-valued formulas are
//! multiplied through by powers of `S`, `a` and `b` until every term is an
//! integer, evaluated in 512-bit arithmetic, and divided exactly once at the
//! end. That single division truncates, so a computed output never exceeds
//! what the curve allows.
//!
//! When `a == b` the range has collapsed to a single price and the curve
//! degenerates to a fixed exchange rate (`L = x·P + y`).

use primitive_types::U512;

use super::scale::SCALE;
use super::wide::{self, wide};
use crate::domain::{Amount, Liquidity, Price, PriceRange};
use crate::error::{ClammError, Result};

fn s() -> U512 {
    wide(SCALE)
}

/// `x·a·b + y·S²`, the linear coefficient `x·√Pmin + y/√Pmax` multiplied
/// by `b·S²`.
fn linear_term(x: U512, y: U512, a: U512, b: U512) -> Result<U512> {
    let xab = wide::product(&[x, a, b], "liquidity linear term")?;
    let ys2 = wide::product(&[y, s(), s()], "liquidity linear term")?;
    wide::add(xab, ys2, "liquidity linear term")
}

/// Liquidity of a flat-price pool: `x·price/S + y`.
///
/// # Errors
///
/// Returns [`ClammError::Overflow`] if the result does not fit in `u128`.
///
/// # Examples
///
/// ```
/// use clamm::domain::{Amount, Liquidity, Price};
/// use clamm::math::curve::liquidity_flat_price;
///
/// let l = liquidity_flat_price(Amount::new(1_000), Amount::new(1_000), Price::ONE);
/// assert_eq!(l, Ok(Liquidity::new(2_000)));
/// ```
pub fn liquidity_flat_price(x: Amount, y: Amount, price: Price) -> Result<Liquidity> {
    let weighted = wide::div(
        wide::mul(wide(x.get()), wide(price.get()), "flat liquidity")?,
        s(),
    )?;
    let l = wide::add(weighted, wide(y.get()), "flat liquidity")?;
    Ok(Liquidity::new(wide::narrow(l, "flat liquidity")?))
}

/// Discriminant of the liquidity quadratic, multiplied by `b²·S⁴`.
///
/// For `a < b`: `D' = N² + 4·x·y·S²·b·(b − a)`.
/// For `a > b`: `D' = N² − 4·x·y·S²·b·(a − b)`.
///
/// In real terms this is
/// `x²·Pmin + y²/Pmax + 2xy·√Pmin/√Pmax + 4xy − 4xy·√Pmin/√Pmax`.
///
/// # Errors
///
/// - [`ClammError::InvalidRange`] if the range is flat (no quadratic).
///   The reversed-range subtraction is also checked, although
///   `N² ≥ 4·x·a·b·y·S²` keeps it non-negative.
/// - [`ClammError::Overflow`] on intermediate overflow.
pub fn liquidity_discriminant(x: Amount, y: Amount, range: &PriceRange) -> Result<U512> {
    if range.is_flat() {
        return Err(ClammError::InvalidRange(
            "flat range has no liquidity quadratic",
        ));
    }
    let (xw, yw) = (wide(x.get()), wide(y.get()));
    let (a, b) = (wide(range.sqrt_min()), wide(range.sqrt_max()));
    let n = linear_term(xw, yw, a, b)?;
    let n2 = wide::mul(n, n, "liquidity discriminant")?;
    let width = if a < b { b - a } else { a - b };
    let cross = wide::product(
        &[wide(4), xw, yw, s(), s(), b, width],
        "liquidity discriminant",
    )?;
    if a < b {
        wide::add(n2, cross, "liquidity discriminant")
    } else {
        n2.checked_sub(cross).ok_or(ClammError::InvalidRange(
            "reversed range has no real liquidity root",
        ))
    }
}

/// Solves the liquidity quadratic given `√D'` (see
/// [`liquidity_discriminant`]).
///
/// - `a < b` (`2·S > 2·S·a/b`): `L = (N + √D') / (2·S·(b − a))`, the
///   positive root.
/// - `a > b`: numerator and denominator flip sign together,
///   `L = (N − √D') / (2·S·(a − b))`. The negated value is then the
///   non-positive root `(N − √D') / (2·S·(b − a))` of the same quadratic,
///   since both of its roots are `≤ 0` when the leading coefficient is
///   negative.
///
/// # Errors
///
/// - [`ClammError::InvalidRange`] if the range is flat.
/// - [`ClammError::Overflow`] if `L` does not fit in `u128`.
pub fn liquidity_with_discriminant(
    x: Amount,
    y: Amount,
    range: &PriceRange,
    sqrt_d: U512,
) -> Result<Liquidity> {
    if range.is_flat() {
        return Err(ClammError::InvalidRange(
            "flat range has no liquidity quadratic",
        ));
    }
    let (a, b) = (wide(range.sqrt_min()), wide(range.sqrt_max()));
    let n = linear_term(wide(x.get()), wide(y.get()), a, b)?;
    let (numerator, width) = if a < b {
        (wide::add(n, sqrt_d, "liquidity numerator")?, b - a)
    } else {
        (wide::sub(n, sqrt_d, "liquidity numerator")?, a - b)
    };
    let denominator = wide::product(&[wide(2), s(), width], "liquidity denominator")?;
    let l = wide::div(numerator, denominator)?;
    Ok(Liquidity::new(wide::narrow(l, "liquidity")?))
}

/// Liquidity of the reserves `(x, y)` over the given range.
///
/// Uses [`liquidity_flat_price`] with `P = a²/S` when the range is flat,
/// otherwise solves the quadratic.
///
/// # Errors
///
/// Propagates the errors of the underlying solve.
///
/// # Examples
///
/// ```
/// use clamm::domain::{Amount, Liquidity, Price, PriceRange};
/// use clamm::math::curve::liquidity_from_reserves;
///
/// // √Pmin = 1.0, √Pmax = 1.25
/// let range = PriceRange::new(Price::new(1_000_000_000), Price::new(1_562_500_000))
///     .expect("valid range");
/// let l = liquidity_from_reserves(Amount::new(20_000), Amount::ZERO, &range);
/// assert_eq!(l, Ok(Liquidity::new(100_000)));
/// ```
pub fn liquidity_from_reserves(x: Amount, y: Amount, range: &PriceRange) -> Result<Liquidity> {
    if range.is_flat() {
        return liquidity_flat_price(x, y, flat_price(range)?);
    }
    let d = liquidity_discriminant(x, y, range)?;
    liquidity_with_discriminant(x, y, range, wide::isqrt(d))
}

/// Fixed price of a flat range: `a²/S`.
fn flat_price(range: &PriceRange) -> Result<Price> {
    let a = wide(range.sqrt_min());
    let p = wide::div(wide::mul(a, a, "flat price")?, s())?;
    Ok(Price::new(wide::narrow(p, "flat price")?))
}

/// Spot price (B per A) implied by reserves and liquidity:
/// `(y·S + L·a)·b / (x·b + L·S)`; the real form is
/// `(y + L·√Pmin) / (x + L/√Pmax)`.
///
/// A flat range returns `a²/S` regardless of the reserves.
///
/// # Errors
///
/// - [`ClammError::DivisionByZero`] if both `x` and `L` are zero.
/// - [`ClammError::Overflow`] on intermediate overflow.
pub fn price_from_reserves(
    x: Amount,
    y: Amount,
    range: &PriceRange,
    liquidity: Liquidity,
) -> Result<Price> {
    if range.is_flat() {
        return flat_price(range);
    }
    let (a, b) = (wide(range.sqrt_min()), wide(range.sqrt_max()));
    let l = wide(liquidity.get());
    let y_side = wide::add(
        wide::mul(wide(y.get()), s(), "price numerator")?,
        wide::mul(l, a, "price numerator")?,
        "price numerator",
    )?;
    let numerator = wide::mul(y_side, b, "price numerator")?;
    let denominator = wide::add(
        wide::mul(wide(x.get()), b, "price denominator")?,
        wide::mul(l, s(), "price denominator")?,
        "price denominator",
    )?;
    let p = wide::div(numerator, denominator)?;
    Ok(Price::new(wide::narrow(p, "price")?))
}

/// Amount of asset B released for a deposit `d` of asset A.
///
/// Solves `(x + L/√Pmax)(y + L√Pmin) = (x + d + L/√Pmax)(y − w + L√Pmin)`:
///
/// ```text
/// w = d·(y·S + L·a)·b / (S·((x + d)·b + L·S))
/// ```
///
/// A flat range pays `w = d·a²/S²`.
///
/// # Errors
///
/// - [`ClammError::InsufficientReserve`] if `w` exceeds `y` (the deposit
///   would push the price below `Pmin`).
/// - [`ClammError::DivisionByZero`] / [`ClammError::Overflow`] from the
///   arithmetic.
pub fn swap_output_for_a_deposit(
    d: Amount,
    x: Amount,
    y: Amount,
    range: &PriceRange,
    liquidity: Liquidity,
) -> Result<Amount> {
    let dw = wide(d.get());
    let a = wide(range.sqrt_min());
    let w = if range.is_flat() {
        let n = wide::product(&[dw, a, a], "swap a->b")?;
        wide::div(n, wide::mul(s(), s(), "swap a->b")?)?
    } else {
        let b = wide(range.sqrt_max());
        let l = wide(liquidity.get());
        let y_side = wide::add(
            wide::mul(wide(y.get()), s(), "swap a->b")?,
            wide::mul(l, a, "swap a->b")?,
            "swap a->b",
        )?;
        let numerator = wide::product(&[dw, y_side, b], "swap a->b")?;
        let x_after = wide::add(wide(x.get()), dw, "swap a->b")?;
        let x_side = wide::add(
            wide::mul(x_after, b, "swap a->b")?,
            wide::mul(l, s(), "swap a->b")?,
            "swap a->b",
        )?;
        let denominator = wide::mul(s(), x_side, "swap a->b")?;
        wide::div(numerator, denominator)?
    };
    let w = Amount::new(wide::narrow(w, "swap a->b output")?);
    if w > y {
        return Err(ClammError::InsufficientReserve(
            "asset B reserve cannot cover the swap",
        ));
    }
    Ok(w)
}

/// Amount of asset A released for a deposit `d` of asset B.
///
/// The symmetric solve of [`swap_output_for_a_deposit`]:
///
/// ```text
/// w = d·(x·b + L·S)·S / (b·((y + d)·S + L·a))
/// ```
///
/// A flat range pays `w = d·S²/a²`.
///
/// # Errors
///
/// - [`ClammError::InsufficientReserve`] if `w` exceeds `x`.
/// - [`ClammError::DivisionByZero`] / [`ClammError::Overflow`] from the
///   arithmetic.
pub fn swap_output_for_b_deposit(
    d: Amount,
    x: Amount,
    y: Amount,
    range: &PriceRange,
    liquidity: Liquidity,
) -> Result<Amount> {
    let dw = wide(d.get());
    let a = wide(range.sqrt_min());
    let w = if range.is_flat() {
        let n = wide::product(&[dw, s(), s()], "swap b->a")?;
        wide::div(n, wide::mul(a, a, "swap b->a")?)?
    } else {
        let b = wide(range.sqrt_max());
        let l = wide(liquidity.get());
        let x_side = wide::add(
            wide::mul(wide(x.get()), b, "swap b->a")?,
            wide::mul(l, s(), "swap b->a")?,
            "swap b->a",
        )?;
        let numerator = wide::product(&[dw, x_side, s()], "swap b->a")?;
        let y_after = wide::add(wide(y.get()), dw, "swap b->a")?;
        let y_side = wide::add(
            wide::mul(y_after, s(), "swap b->a")?,
            wide::mul(l, a, "swap b->a")?,
            "swap b->a",
        )?;
        let denominator = wide::mul(b, y_side, "swap b->a")?;
        wide::div(numerator, denominator)?
    };
    let w = Amount::new(wide::narrow(w, "swap b->a output")?);
    if w > x {
        return Err(ClammError::InsufficientReserve(
            "asset A reserve cannot cover the swap",
        ));
    }
    Ok(w)
}

/// Proportional share of `reserve` released when `lp` base-scale
/// liquidity units are burned: `reserve · lp / L`.
///
/// # Errors
///
/// - [`ClammError::DivisionByZero`] if `liquidity` is zero.
/// - [`ClammError::Overflow`] if the share does not fit in `u128`.
pub fn withdraw_on_lp_burn(lp: u128, reserve: Amount, liquidity: Liquidity) -> Result<Amount> {
    wide::mul_div(reserve.get(), lp, liquidity.get(), "lp burn share").map(Amount::new)
}

/// Reserves `(x, y)` holding liquidity `L` at spot `price`.
///
/// Inverse of [`liquidity_from_reserves`] and [`price_from_reserves`] for a
/// ranged pool, with `p = sqrt(price·S)`:
///
/// ```text
/// x = L·S·(b − p) / (p·b)
/// y = L·(p − a) / S
/// ```
///
/// Off-chain tooling uses it to size a deposit that lands on a given price.
///
/// # Errors
///
/// - [`ClammError::InvalidRange`] if the range is flat (the split is not
///   determined by the price) or `price` lies outside the range.
/// - [`ClammError::Overflow`] if a reserve does not fit in `u128`.
pub fn reserves_from_price(
    liquidity: Liquidity,
    price: Price,
    range: &PriceRange,
) -> Result<(Amount, Amount)> {
    if range.is_flat() {
        return Err(ClammError::InvalidRange(
            "flat range does not determine the reserve split",
        ));
    }
    let p = price.sqrt()?;
    if p < range.sqrt_min() || p > range.sqrt_max() {
        return Err(ClammError::InvalidRange("price lies outside the range"));
    }
    let (a, b) = (wide(range.sqrt_min()), wide(range.sqrt_max()));
    let (pw, l) = (wide(p), wide(liquidity.get()));
    let n = wide::product(&[l, s(), b - pw], "reserves from price")?;
    let x = wide::div(n, wide::mul(pw, b, "reserves from price")?)?;
    let y = wide::div(wide::mul(l, pw - a, "reserves from price")?, s())?;
    Ok((
        Amount::new(wide::narrow(x, "reserve a")?),
        Amount::new(wide::narrow(y, "reserve b")?),
    ))
}
