//! Thread-safe registry of bootstrapped pools.
//!
//! The map itself sits behind a [`RwLock`]; each pool has its own
//! [`Mutex`], so operations on different pools never contend and an
//! operation on one pool holds its lock for the whole read-compute-write
//! sequence.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use crate::config::PoolConfig;
use crate::domain::PoolId;
use crate::error::{ClammError, Result};
use crate::pools::{ClammPool, PoolStatus};
use crate::traits::FromConfig;

/// Pools keyed by id.
///
/// # Example
///
/// ```rust
/// use clamm::config::PoolConfig;
/// use clamm::domain::{
///     AccountId, Asset, AssetId, AssetPair, Decimals, FeeRate, PoolId, Price, PriceRange,
/// };
/// use clamm::registry::PoolRegistry;
/// use clamm::testing::SimulatedServices;
///
/// let services = SimulatedServices::new(AccountId::from_bytes([9u8; 32]));
/// let pair = AssetPair::new(
///     Asset::new(AssetId::new(1), Decimals::BASE),
///     Asset::new(AssetId::new(2), Decimals::BASE),
/// )
/// .expect("distinct");
/// let range = PriceRange::new(Price::new(800_000_000), Price::new(1_250_000_000))
///     .expect("valid");
/// let cfg = PoolConfig::new(
///     PoolId::new(7),
///     pair,
///     AssetId::new(3),
///     range,
///     FeeRate::ZERO,
///     services.bindings(),
/// )
/// .expect("valid");
///
/// let registry = PoolRegistry::new();
/// registry.create(&cfg).expect("created");
/// assert!(registry.create(&cfg).is_err());
/// assert_eq!(registry.ids(), vec![PoolId::new(7)]);
/// ```
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: RwLock<HashMap<PoolId, Arc<Mutex<ClammPool>>>>,
}

impl PoolRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bootstraps a pool from `config` and registers it.
    ///
    /// # Errors
    ///
    /// - [`ClammError::AlreadyBootstrapped`] if the id is taken.
    /// - Any validation error from [`ClammPool::from_config`].
    pub fn create(&self, config: &PoolConfig) -> Result<PoolId> {
        let id = config.pool_id();
        let mut pools = self.pools.write();
        if pools.contains_key(&id) {
            return Err(ClammError::AlreadyBootstrapped);
        }
        let pool = ClammPool::from_config(config)?;
        pools.insert(id, Arc::new(Mutex::new(pool)));
        info!(pool = %id, count = pools.len(), "pool registered");
        Ok(id)
    }

    fn handle(&self, id: PoolId) -> Result<Arc<Mutex<ClammPool>>> {
        self.pools
            .read()
            .get(&id)
            .cloned()
            .ok_or(ClammError::PoolNotFound)
    }

    /// Runs `f` with exclusive access to pool `id`.
    ///
    /// The map lock is released before `f` runs; only the pool's own lock
    /// is held.
    ///
    /// # Errors
    ///
    /// [`ClammError::PoolNotFound`] for an unknown id, otherwise whatever
    /// `f` returns.
    pub fn with_pool_mut<T>(
        &self,
        id: PoolId,
        f: impl FnOnce(&mut ClammPool) -> Result<T>,
    ) -> Result<T> {
        let handle = self.handle(id)?;
        let mut pool = handle.lock();
        f(&mut pool)
    }

    /// Runs `f` with shared access to pool `id`.
    ///
    /// # Errors
    ///
    /// [`ClammError::PoolNotFound`] for an unknown id, otherwise whatever
    /// `f` returns.
    pub fn with_pool<T>(&self, id: PoolId, f: impl FnOnce(&ClammPool) -> Result<T>) -> Result<T> {
        let handle = self.handle(id)?;
        let pool = handle.lock();
        f(&pool)
    }

    /// Snapshot of pool `id`.
    ///
    /// # Errors
    ///
    /// [`ClammError::PoolNotFound`] for an unknown id.
    pub fn status(&self, id: PoolId) -> Result<PoolStatus> {
        self.with_pool(id, |pool| Ok(pool.status()))
    }

    /// Registered ids in ascending order.
    #[must_use]
    pub fn ids(&self) -> Vec<PoolId> {
        let mut ids: Vec<PoolId> = self.pools.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered pools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.read().len()
    }

    /// Returns `true` if no pool is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.read().is_empty()
    }
}
