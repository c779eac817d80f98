//! Asset identity and native/base-scale conversion.

use serde::{Deserialize, Serialize};

use super::{Amount, AssetId, Decimals};
use crate::error::Result;
use crate::math::scale;

/// A pool asset: its id and the decimal count of its native unit.
///
/// # Examples
///
/// ```
/// use clamm::domain::{Amount, Asset, AssetId, Decimals};
///
/// let usdc = Asset::new(AssetId::new(10), Decimals::new(6).expect("valid"));
/// assert_eq!(usdc.to_base(Amount::new(1)).expect("fits"), Amount::new(1_000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    id: AssetId,
    decimals: Decimals,
}

impl Asset {
    /// Creates a new `Asset`.
    #[must_use]
    pub const fn new(id: AssetId, decimals: Decimals) -> Self {
        Self { id, decimals }
    }

    /// Returns the asset id.
    #[must_use]
    pub const fn id(&self) -> AssetId {
        self.id
    }

    /// Returns the native decimal count.
    #[must_use]
    pub const fn decimals(&self) -> Decimals {
        self.decimals
    }

    /// Returns the native-to-base multiplier.
    #[must_use]
    pub const fn scale_factor(&self) -> u128 {
        self.decimals.scale_factor()
    }

    /// Converts a native amount to base scale.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::Overflow`](crate::error::ClammError::Overflow)
    /// if the base amount does not fit in `u128`.
    pub fn to_base(&self, native: Amount) -> Result<Amount> {
        scale::to_base(native, self.decimals)
    }

    /// Converts a base-scale amount to native units, truncating.
    pub fn from_base(&self, base: Amount) -> Amount {
        scale::from_base(base, self.decimals)
    }
}
