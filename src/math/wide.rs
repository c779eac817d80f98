//! 512-bit intermediate arithmetic.
//!
//! Reserves and liquidity are stored as `u128`, but the curve math squares
//! products of them (the discriminant is of degree four in base-scale
//! quantities). All intermediate values are therefore carried in
//! [`U512`] and narrowed back with an explicit overflow check.
//!
//! The helpers wrap the checked `uint` operations so that every failure
//! maps onto a [`ClammError`] variant naming the step that failed.

use primitive_types::U512;

use crate::error::{ClammError, Result};

/// Widens a `u128` value.
#[inline]
#[must_use]
pub fn wide(value: u128) -> U512 {
    U512::from(value)
}

/// Checked addition.
///
/// # Errors
///
/// Returns [`ClammError::Overflow`] tagged with `what`.
#[inline]
pub fn add(a: U512, b: U512, what: &'static str) -> Result<U512> {
    a.checked_add(b).ok_or(ClammError::Overflow(what))
}

/// Checked subtraction.
///
/// # Errors
///
/// Returns [`ClammError::Underflow`] tagged with `what`.
#[inline]
pub fn sub(a: U512, b: U512, what: &'static str) -> Result<U512> {
    a.checked_sub(b).ok_or(ClammError::Underflow(what))
}

/// Checked multiplication.
///
/// # Errors
///
/// Returns [`ClammError::Overflow`] tagged with `what`.
#[inline]
pub fn mul(a: U512, b: U512, what: &'static str) -> Result<U512> {
    a.checked_mul(b).ok_or(ClammError::Overflow(what))
}

/// Truncating division.
///
/// # Errors
///
/// Returns [`ClammError::DivisionByZero`] if `d` is zero.
#[inline]
pub fn div(n: U512, d: U512) -> Result<U512> {
    n.checked_div(d).ok_or(ClammError::DivisionByZero)
}

/// Product of all `factors`, checked at every step.
///
/// # Errors
///
/// Returns [`ClammError::Overflow`] tagged with `what`.
pub fn product(factors: &[U512], what: &'static str) -> Result<U512> {
    factors
        .iter()
        .try_fold(U512::one(), |acc, f| mul(acc, *f, what))
}

/// Floor of the square root (Newton iteration).
#[must_use]
pub fn isqrt(n: U512) -> U512 {
    if n.is_zero() {
        return U512::zero();
    }
    let two = U512::from(2u8);
    // 2^ceil(bits/2) is an upper bound of the root, so the iteration
    // decreases monotonically until it reaches the floor.
    let mut x = U512::one() << n.bits().div_ceil(2);
    loop {
        let y = (x + n / x) / two;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// Narrows a wide value back to `u128`.
///
/// # Errors
///
/// Returns [`ClammError::Overflow`] tagged with `what` if the value needs
/// more than 128 bits.
#[inline]
pub fn narrow(value: U512, what: &'static str) -> Result<u128> {
    if value.bits() > 128 {
        return Err(ClammError::Overflow(what));
    }
    Ok(value.low_u128())
}

/// `a · b / d` truncated, computed without intermediate overflow.
///
/// # Errors
///
/// - [`ClammError::DivisionByZero`] if `d` is zero.
/// - [`ClammError::Overflow`] if the quotient exceeds `u128`.
pub fn mul_div(a: u128, b: u128, d: u128, what: &'static str) -> Result<u128> {
    let n = mul(wide(a), wide(b), what)?;
    narrow(div(n, wide(d))?, what)
}
