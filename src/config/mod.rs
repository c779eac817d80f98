//! Pool configuration.
//!
//! [`PoolConfig`] is the declarative blueprint a pool is bootstrapped
//! from; [`ServiceBindings`] pins the collaborator instances it accepts.

mod pool;

pub use pool::{PoolConfig, ServiceBindings};
