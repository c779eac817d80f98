//! Base-scale prices and the pool's price range.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClammError, Result};
use crate::math::scale::SCALE;
use crate::math::wide;

/// Price of asset A in units of asset B, in base scale (`1.0 == 10^9`).
///
/// # Examples
///
/// ```
/// use clamm::domain::Price;
///
/// assert_eq!(Price::ONE.get(), 1_000_000_000);
/// assert_eq!(Price::new(1_250_000_000).to_string(), "1.250000000");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Price(u128);

impl Price {
    /// Zero price.
    pub const ZERO: Self = Self(0);

    /// Price ratio of 1:1.
    pub const ONE: Self = Self(SCALE);

    /// Creates a price from its base-scale value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the base-scale value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// `sqrt(price · SCALE)`, the base-scale square root.
    ///
    /// # Errors
    ///
    /// Cannot fail for `u128` prices; the `Result` covers the narrowing step.
    pub fn sqrt(&self) -> Result<u128> {
        let radicand = wide::mul(wide::wide(self.0), wide::wide(SCALE), "sqrt price")?;
        wide::narrow(wide::isqrt(radicand), "sqrt price")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.0 / SCALE, self.0 % SCALE)
    }
}

/// The inclusive `[price_min, price_max]` range of a pool together with the
/// square roots the curve math consumes.
///
/// `sqrt_min == sqrt_max` is the flat-price pool: the curve collapses to a
/// fixed exchange rate of `price_min`.
///
/// # Examples
///
/// ```
/// use clamm::domain::{Price, PriceRange};
///
/// let range = PriceRange::new(Price::new(1_000_000_000), Price::new(1_562_500_000))
///     .expect("valid range");
/// assert_eq!(range.sqrt_min(), 1_000_000_000);
/// assert_eq!(range.sqrt_max(), 1_250_000_000);
/// assert!(!range.is_flat());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    price_min: Price,
    price_max: Price,
    sqrt_min: u128,
    sqrt_max: u128,
}

impl PriceRange {
    /// Builds a validated range and computes its square roots.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::InvalidRange`] if `price_max` is zero or
    /// `price_min` exceeds `price_max`.
    pub fn new(price_min: Price, price_max: Price) -> Result<Self> {
        if price_max.get() == 0 {
            return Err(ClammError::InvalidRange("price_max must be positive"));
        }
        if price_min > price_max {
            return Err(ClammError::InvalidRange(
                "price_min must not exceed price_max",
            ));
        }
        Ok(Self {
            price_min,
            price_max,
            sqrt_min: price_min.sqrt()?,
            sqrt_max: price_max.sqrt()?,
        })
    }

    /// Builds a range from precomputed parts without validation.
    ///
    /// Meant for off-chain simulation of arbitrary (including reversed)
    /// square-root bounds; pools only ever hold ranges built by
    /// [`PriceRange::new`].
    #[must_use]
    pub const fn from_raw_parts(
        price_min: Price,
        price_max: Price,
        sqrt_min: u128,
        sqrt_max: u128,
    ) -> Self {
        Self {
            price_min,
            price_max,
            sqrt_min,
            sqrt_max,
        }
    }

    /// Lower price bound.
    #[must_use]
    pub const fn price_min(&self) -> Price {
        self.price_min
    }

    /// Upper price bound.
    #[must_use]
    pub const fn price_max(&self) -> Price {
        self.price_max
    }

    /// `sqrt(price_min · SCALE)`.
    #[must_use]
    pub const fn sqrt_min(&self) -> u128 {
        self.sqrt_min
    }

    /// `sqrt(price_max · SCALE)`.
    #[must_use]
    pub const fn sqrt_max(&self) -> u128 {
        self.sqrt_max
    }

    /// Returns `true` for the single-price degenerate range.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.sqrt_min == self.sqrt_max
    }

    /// Returns `true` if `price` lies inside the range.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        price >= self.price_min && price <= self.price_max
    }

    /// Re-checks the invariants of [`PriceRange::new`], including that the
    /// stored square roots match the prices. Used on deserialised ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::InvalidRange`] on any mismatch.
    pub fn validate(&self) -> Result<()> {
        let rebuilt = Self::new(self.price_min, self.price_max)?;
        if rebuilt != *self {
            return Err(ClammError::InvalidRange(
                "square-root bounds do not match the prices",
            ));
        }
        Ok(())
    }
}
