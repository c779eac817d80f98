//! Ordered pair of distinct pool assets.

use serde::{Deserialize, Serialize};

use super::{Asset, AssetId};
use crate::error::{ClammError, Result};

/// Which side of the pool an asset sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Asset A (lower id).
    A,
    /// Asset B (higher id).
    B,
}

impl Side {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// An ordered pair of distinct assets, canonically sorted by id.
///
/// The canonical ordering guarantees `asset_a.id() < asset_b.id()`, so the
/// pool price is always quoted as units of B per unit of A.
///
/// # Examples
///
/// ```
/// use clamm::domain::{Asset, AssetId, AssetPair, Decimals};
///
/// let a = Asset::new(AssetId::new(1), Decimals::new(6).expect("valid"));
/// let b = Asset::new(AssetId::new(2), Decimals::new(8).expect("valid"));
///
/// let pair = AssetPair::new(b, a).expect("distinct assets");
/// assert_eq!(pair.asset_a(), a);
/// assert_eq!(pair.asset_b(), b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetPair {
    asset_a: Asset,
    asset_b: Asset,
}

impl AssetPair {
    /// Creates a canonically-ordered `AssetPair`.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::InvalidAsset`] if both assets share an id.
    pub fn new(first: Asset, second: Asset) -> Result<Self> {
        if first.id() == second.id() {
            return Err(ClammError::InvalidAsset(
                "asset A and asset B must be distinct",
            ));
        }
        let (asset_a, asset_b) = if first.id() < second.id() {
            (first, second)
        } else {
            (second, first)
        };
        Ok(Self { asset_a, asset_b })
    }

    /// Returns asset A (lower id).
    #[must_use]
    pub const fn asset_a(&self) -> Asset {
        self.asset_a
    }

    /// Returns asset B (higher id).
    #[must_use]
    pub const fn asset_b(&self) -> Asset {
        self.asset_b
    }

    /// Returns the asset on `side`.
    #[must_use]
    pub const fn asset(&self, side: Side) -> Asset {
        match side {
            Side::A => self.asset_a,
            Side::B => self.asset_b,
        }
    }

    /// Resolves which side `id` belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::InvalidAsset`] if `id` is not in the pair.
    pub fn side_of(&self, id: AssetId) -> Result<Side> {
        if id == self.asset_a.id() {
            Ok(Side::A)
        } else if id == self.asset_b.id() {
            Ok(Side::B)
        } else {
            Err(ClammError::InvalidAsset("asset is not part of this pool"))
        }
    }

    /// Returns `true` if `id` is one of the two assets.
    #[must_use]
    pub fn contains(&self, id: AssetId) -> bool {
        self.side_of(id).is_ok()
    }

    /// Rounding allowance of the pair:
    /// `scale_a · scale_b + scale_a + scale_b`.
    #[must_use]
    pub const fn allowed_drop(&self) -> u128 {
        crate::math::scale::allowed_drop(self.asset_a.scale_factor(), self.asset_b.scale_factor())
    }

    /// Returns `true` if the pair is in canonical order.
    ///
    /// Used to validate pairs that bypassed [`AssetPair::new`] through
    /// deserialisation.
    #[must_use]
    pub fn is_ordered_correctly(&self) -> bool {
        self.asset_a.id() < self.asset_b.id()
    }
}
