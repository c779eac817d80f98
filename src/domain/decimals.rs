//! Asset decimal places and their base-scale factor.

use serde::{Deserialize, Serialize};

use crate::error::ClammError;
use crate::math::scale::SCALE_DECIMALS;

/// Number of decimal places of an asset's native unit.
///
/// Valid range is `0..=9`: every amount is normalised to the 9-decimal base
/// scale, so an asset carrying more precision than the base scale cannot be
/// represented without loss and is rejected.
///
/// # Examples
///
/// ```
/// use clamm::domain::Decimals;
///
/// let d = Decimals::new(6).expect("6 is valid");
/// assert_eq!(d.scale_factor(), 1_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Decimals(u8);

impl Default for Decimals {
    fn default() -> Self {
        Self::BASE
    }
}

impl Decimals {
    /// Zero decimal places.
    pub const ZERO: Self = Self(0);

    /// Same precision as the base scale (factor 1).
    pub const BASE: Self = Self(SCALE_DECIMALS);

    /// Creates a new `Decimals` value after validating the range.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::InvalidDecimals`] if `value` exceeds 9.
    pub const fn new(value: u8) -> Result<Self, ClammError> {
        if value > SCALE_DECIMALS {
            return Err(ClammError::InvalidDecimals(
                "asset decimals must not exceed the 9-decimal base scale",
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw decimal count.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Returns `10^(9 - decimals)`, the multiplier from native units to
    /// base scale.
    #[must_use]
    pub const fn scale_factor(&self) -> u128 {
        10u128.pow((SCALE_DECIMALS - self.0) as u32)
    }
}

impl TryFrom<u8> for Decimals {
    type Error = ClammError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Decimals> for u8 {
    fn from(value: Decimals) -> Self {
        value.0
    }
}
