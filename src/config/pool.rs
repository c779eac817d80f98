//! Bootstrap parameters of a pool.

use serde::{Deserialize, Serialize};

use crate::domain::{AssetId, AssetPair, FeeRate, PoolId, Price, PriceRange, ServiceId};
use crate::error::{ClammError, Result};

/// Collaborator instances a pool is bound to.
///
/// Fixed at bootstrap; every operation compares the collaborators it is
/// handed against these ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceBindings {
    /// Protocol configuration (pause flag, protocol fee, fee executor).
    pub protocol_config: ServiceId,
    /// Identity resolver.
    pub identity: ServiceId,
    /// Trade statistics sink.
    pub stats: ServiceId,
}

/// Configuration of a concentrated-liquidity pool.
///
/// Defines the immutable parameters fixed at bootstrap: the asset pair,
/// the LP token, the price range, the trading fee, the minimum verification
/// class and the collaborator bindings.
///
/// # Validation
///
/// - Assets A and B are distinct and canonically ordered.
/// - The LP token is neither asset A nor asset B.
/// - `price_max > 0` and `price_min ≤ price_max`; the stored square roots
///   match the prices.
/// - The initial price lies inside the range.
/// - Fee rate at most 10% and asset decimals at most 9 (enforced by
///   [`FeeRate`] and [`Decimals`](crate::domain::Decimals)).
///
/// # Examples
///
/// ```
/// use clamm::config::{PoolConfig, ServiceBindings};
/// use clamm::domain::{
///     Asset, AssetId, AssetPair, Decimals, FeeRate, PoolId, Price, PriceRange, ServiceId,
/// };
///
/// let pair = AssetPair::new(
///     Asset::new(AssetId::new(1), Decimals::new(6).expect("valid")),
///     Asset::new(AssetId::new(2), Decimals::new(6).expect("valid")),
/// )
/// .expect("distinct");
/// let range = PriceRange::new(Price::new(800_000_000), Price::new(1_250_000_000))
///     .expect("valid range");
/// let bindings = ServiceBindings {
///     protocol_config: ServiceId::new(1),
///     identity: ServiceId::new(2),
///     stats: ServiceId::new(3),
/// };
/// let cfg = PoolConfig::new(
///     PoolId::new(7),
///     pair,
///     AssetId::new(100),
///     range,
///     FeeRate::new(1_000_000).expect("0.1%"),
///     bindings,
/// )
/// .expect("valid config")
/// .with_initial_price(Price::ONE)
/// .expect("inside range");
/// assert_eq!(cfg.initial_price(), Price::ONE);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pool_id: PoolId,
    pair: AssetPair,
    lp_asset: AssetId,
    range: PriceRange,
    fee_rate: FeeRate,
    verification_class: u8,
    initial_price: Price,
    bindings: ServiceBindings,
}

impl PoolConfig {
    /// Creates a validated configuration.
    ///
    /// The verification class defaults to `0` and the initial price to
    /// `price_min`; see [`with_verification_class`](Self::with_verification_class)
    /// and [`with_initial_price`](Self::with_initial_price).
    ///
    /// # Errors
    ///
    /// - [`ClammError::InvalidAsset`] if the LP token collides with a pool
    ///   asset or the pair is malformed.
    /// - [`ClammError::InvalidRange`] if the range is inconsistent.
    pub fn new(
        pool_id: PoolId,
        pair: AssetPair,
        lp_asset: AssetId,
        range: PriceRange,
        fee_rate: FeeRate,
        bindings: ServiceBindings,
    ) -> Result<Self> {
        let config = Self {
            pool_id,
            pair,
            lp_asset,
            range,
            fee_rate,
            verification_class: 0,
            initial_price: range.price_min(),
            bindings,
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the minimum verification class required to interact.
    #[must_use]
    pub const fn with_verification_class(mut self, class: u8) -> Self {
        self.verification_class = class;
        self
    }

    /// Sets the price reported before the pool holds any liquidity.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::InvalidRange`] if `price` is outside the range.
    pub fn with_initial_price(mut self, price: Price) -> Result<Self> {
        self.initial_price = price;
        self.validate()?;
        Ok(self)
    }

    /// Validates all configuration invariants.
    ///
    /// # Errors
    ///
    /// See [`PoolConfig::new`].
    pub fn validate(&self) -> Result<()> {
        if !self.pair.is_ordered_correctly() {
            return Err(ClammError::InvalidAsset(
                "asset A must have a lower id than asset B",
            ));
        }
        if self.pair.contains(self.lp_asset) {
            return Err(ClammError::InvalidAsset(
                "LP token must differ from the pool assets",
            ));
        }
        FeeRate::new(self.fee_rate.get())?;
        self.range.validate()?;
        if !self.range.contains(self.initial_price) {
            return Err(ClammError::InvalidRange(
                "initial price must lie inside the range",
            ));
        }
        Ok(())
    }

    /// Pool identifier.
    #[must_use]
    pub const fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    /// Asset pair.
    #[must_use]
    pub const fn pair(&self) -> &AssetPair {
        &self.pair
    }

    /// LP token id.
    #[must_use]
    pub const fn lp_asset(&self) -> AssetId {
        self.lp_asset
    }

    /// Price range.
    #[must_use]
    pub const fn range(&self) -> &PriceRange {
        &self.range
    }

    /// Trading fee.
    #[must_use]
    pub const fn fee_rate(&self) -> FeeRate {
        self.fee_rate
    }

    /// Minimum verification class.
    #[must_use]
    pub const fn verification_class(&self) -> u8 {
        self.verification_class
    }

    /// Price reported while the pool is empty.
    #[must_use]
    pub const fn initial_price(&self) -> Price {
        self.initial_price
    }

    /// Collaborator bindings.
    #[must_use]
    pub const fn bindings(&self) -> &ServiceBindings {
        &self.bindings
    }
}
