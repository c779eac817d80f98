//! Trading fee expressed as a base-scale fraction.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Rounding};
use crate::error::{ClammError, Result};
use crate::math::scale::SCALE;
use crate::math::wide;

/// Highest fee a pool may charge: 10% of the base scale.
const MAX_FEE: u128 = SCALE / 10;

/// A pool's trading fee as a fraction of [`SCALE`] (`10^9 == 100%`).
///
/// Valid range is `0..=100_000_000` (0% to 10%). The rate is fixed at
/// bootstrap; callers may pay a scaled version of it through an identity
/// fee multiplier (see [`FeeRate::effective`]).
///
/// # Examples
///
/// ```
/// use clamm::domain::{Amount, FeeRate, Rounding};
///
/// let fee = FeeRate::new(3_000_000).expect("0.3% is valid"); // 0.3%
/// let charged = fee.apply(Amount::new(1_000_000), Rounding::Down).expect("fits");
/// assert_eq!(charged, Amount::new(3_000));
/// assert!(FeeRate::new(200_000_000).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u128", into = "u128")]
pub struct FeeRate(u128);

impl FeeRate {
    /// No fee.
    pub const ZERO: Self = Self(0);

    /// The 10% cap.
    pub const MAX: Self = Self(MAX_FEE);

    /// Creates a validated fee rate.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::InvalidFee`] if `value` exceeds 10% of the
    /// base scale.
    pub const fn new(value: u128) -> Result<Self> {
        if value > MAX_FEE {
            return Err(ClammError::InvalidFee("fee rate must not exceed 10%"));
        }
        Ok(Self(value))
    }

    /// Returns the base-scale fraction.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` for a fee-free pool.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Fee charged to a caller with the given multiplier:
    /// `rate · multiplier / multiplier_base`, capped at 100%.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::DivisionByZero`] if `multiplier_base` is zero.
    pub fn effective(&self, multiplier: u128, multiplier_base: u128) -> Result<u128> {
        let scaled = wide::mul_div(self.0, multiplier, multiplier_base, "fee multiplier")?;
        Ok(scaled.min(SCALE))
    }

    /// Fee portion of `amount` at this rate.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::Overflow`] if the result does not fit.
    pub fn apply(&self, amount: Amount, rounding: Rounding) -> Result<Amount> {
        apply_fraction(self.0, amount, rounding)
    }
}

/// `amount · fraction / SCALE` with explicit rounding.
///
/// # Errors
///
/// Returns [`ClammError::Overflow`] if the result does not fit.
pub(crate) fn apply_fraction(fraction: u128, amount: Amount, rounding: Rounding) -> Result<Amount> {
    let n = wide::mul(
        wide::wide(amount.get()),
        wide::wide(fraction),
        "fee fraction",
    )?;
    let s = wide::wide(SCALE);
    let q = wide::div(n, s)?;
    let q = if rounding.is_up() && !(n % s).is_zero() {
        wide::add(q, wide::wide(1), "fee fraction")?
    } else {
        q
    };
    Ok(Amount::new(wide::narrow(q, "fee fraction")?))
}

impl TryFrom<u128> for FeeRate {
    type Error = ClammError;

    fn try_from(value: u128) -> Result<Self> {
        Self::new(value)
    }
}

impl From<FeeRate> for u128 {
    fn from(value: FeeRate) -> Self {
        value.0
    }
}

impl fmt::Display for FeeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 10^7 base units per percent.
        write!(f, "{}.{:07}%", self.0 / 10_000_000, self.0 % 10_000_000)
    }
}
