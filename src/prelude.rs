//! Convenience re-exports for common types and traits.
//!
//! ```rust
//! use clamm::prelude::*;
//! ```

pub use crate::config::{PoolConfig, ServiceBindings};
pub use crate::domain::{
    AccountId, Amount, Asset, AssetId, AssetPair, Decimals, DepositReceipt, FeeRate, FeeSplit,
    Liquidity, PoolId, Price, PriceRange, Rounding, ServiceId, Side, SwapReceipt,
    WithdrawReceipt,
};
pub use crate::error::{ClammError, Result};
pub use crate::ledger::LiquidityLedger;
pub use crate::math::{LP_SCALE_FACTOR, SCALE};
pub use crate::pools::{ClammPool, PoolContext, PoolStatus};
#[cfg(feature = "registry")]
pub use crate::registry::PoolRegistry;
pub use crate::traits::{
    AssetTransfer, FromConfig, IdentityInfo, IdentityResolver, PauseGate, ProtocolConfig,
    TradeEvent, TradeStatsSink, Transfer,
};
