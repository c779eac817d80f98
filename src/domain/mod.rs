//! Value types of the pool domain.
//!
//! Quantities ([`Amount`], [`Liquidity`], [`Price`]), asset identity
//! ([`Asset`], [`AssetPair`]), validated parameters ([`Decimals`],
//! [`FeeRate`], [`PriceRange`]) and operation receipts. Types with an
//! invariant use validated constructors; the rest are plain newtypes.

mod amount;
mod asset;
mod asset_pair;
mod decimals;
mod fee_rate;
mod ids;
mod liquidity;
mod price;
mod receipts;
mod rounding;

pub use amount::Amount;
pub use asset::Asset;
pub use asset_pair::{AssetPair, Side};
pub use decimals::Decimals;
pub use fee_rate::FeeRate;
pub(crate) use fee_rate::apply_fraction;
pub use ids::{AccountId, AssetId, PoolId, ServiceId};
pub use liquidity::Liquidity;
pub use price::{Price, PriceRange};
pub use receipts::{DepositReceipt, FeeSplit, SwapReceipt, WithdrawReceipt};
pub use rounding::Rounding;
