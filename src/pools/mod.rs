//! The concentrated-liquidity pool and the per-call context it runs in.
//!
//! A [`ClammPool`] owns its state; everything outside it (pause switch,
//! identities, trade statistics, asset movement) is reached through a
//! [`PoolContext`] handed to each state-mutating call.

mod clamm;
mod context;

#[cfg(test)]
#[allow(clippy::panic)]
mod proptest_properties;

pub use clamm::{ClammPool, PoolStatus};
pub use context::PoolContext;
