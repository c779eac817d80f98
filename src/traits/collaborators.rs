//! Narrow interfaces to the services a pool depends on.
//!
//! The engine never talks to an identity registry, a statistics aggregator
//! or a payment rail directly. Each is injected per call through
//! [`PoolContext`](crate::pools::PoolContext) as a trait object, so the
//! numeric core runs unchanged against production adapters or the
//! in-memory fakes of [`testing`](crate::testing).
//!
//! # Binding
//!
//! A pool is bound at bootstrap to one [`ServiceId`] per service. Calls made
//! with a collaborator reporting a different id fail with
//! [`ClammError::ConfigMismatch`](crate::error::ClammError::ConfigMismatch).
//!
//! # Atomicity
//!
//! [`TradeStatsSink::record`] and [`AssetTransfer::send`] are called after
//! every invariant check has passed and before the pool commits its new
//! state. An error from either aborts the operation and the pool keeps its
//! previous state.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, AssetId, PoolId, Price, ServiceId};
use crate::error::Result;

/// Identity attributes of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityInfo {
    /// Verification tier reached by the account.
    pub verification_class: u8,
    /// Numerator applied to the pool fee rate.
    pub fee_multiplier: u128,
    /// Denominator applied to the pool fee rate.
    pub fee_multiplier_base: u128,
    /// Locked identities may not interact with any pool.
    pub is_locked: bool,
}

impl IdentityInfo {
    /// An unlocked identity of the given class paying the full fee.
    #[must_use]
    pub const fn verified(verification_class: u8) -> Self {
        Self {
            verification_class,
            fee_multiplier: 1,
            fee_multiplier_base: 1,
            is_locked: false,
        }
    }
}

impl Default for IdentityInfo {
    fn default() -> Self {
        Self::verified(0)
    }
}

/// Global pause switch.
pub trait PauseGate {
    /// Returns `true` while every state-mutating pool operation must fail.
    fn is_paused(&self) -> bool;
}

/// Protocol-wide configuration a pool is bound to.
pub trait ProtocolConfig: PauseGate {
    /// Instance id checked against the pool binding.
    fn service_id(&self) -> ServiceId;

    /// Share of fee-earned liquidity credited to the protocol, base scale
    /// (`0..=SCALE`).
    fn protocol_fee_fraction(&self) -> u128;

    /// Account allowed to run administrative operations.
    fn fee_executor(&self) -> AccountId;
}

/// Resolves caller identities.
pub trait IdentityResolver {
    /// Instance id checked against the pool binding.
    fn service_id(&self) -> ServiceId;

    /// Looks up `account`.
    ///
    /// # Errors
    ///
    /// Implementations report lookup failures as
    /// [`ClammError::Collaborator`](crate::error::ClammError::Collaborator).
    fn resolve(&self, account: &AccountId) -> Result<IdentityInfo>;
}

/// A completed trade, as reported to the statistics sink.
///
/// Amounts are native units of the respective asset; the side that was not
/// paid a fee reports zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Pool that executed the trade.
    pub pool: PoolId,
    /// Trader.
    pub trader: AccountId,
    /// Asset A of the pool.
    pub asset_a: AssetId,
    /// Asset B of the pool.
    pub asset_b: AssetId,
    /// Spot price before the trade.
    pub price_before: Price,
    /// Spot price after the trade.
    pub price_after: Price,
    /// Asset A moved (in or out).
    pub amount_a: Amount,
    /// Asset B moved (in or out).
    pub amount_b: Amount,
    /// Fee paid in asset A.
    pub fee_a: Amount,
    /// Fee paid in asset B.
    pub fee_b: Amount,
}

/// Receives trade statistics.
pub trait TradeStatsSink {
    /// Instance id checked against the pool binding.
    fn service_id(&self) -> ServiceId;

    /// Records a trade. Part of the swap transaction: an error aborts it.
    ///
    /// # Errors
    ///
    /// Implementation-defined; surfaced unchanged to the swap caller.
    fn record(&mut self, event: &TradeEvent) -> Result<()>;

    /// Withdraws `event`, the most recent record, after the swap it
    /// belonged to failed to pay out.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the swap still reports its own failure.
    fn retract(&mut self, event: &TradeEvent) -> Result<()>;
}

/// One leg of an outgoing payout: `amount` native units of `asset` to
/// `receiver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    /// Account credited.
    pub receiver: AccountId,
    /// Asset moved.
    pub asset: AssetId,
    /// Native amount.
    pub amount: Amount,
}

/// Moves assets held by the pool.
pub trait AssetTransfer {
    /// Executes every leg of `transfers` or none of them.
    ///
    /// Implementations validate all legs before moving anything, so an
    /// error leaves the pool's holdings untouched.
    ///
    /// # Errors
    ///
    /// Implementation-defined; surfaced unchanged to the caller.
    fn send_all(&mut self, transfers: &[Transfer]) -> Result<()>;

    /// Sends `amount` native units of `asset` from the pool to `receiver`.
    ///
    /// # Errors
    ///
    /// See [`send_all`](Self::send_all).
    fn send(&mut self, receiver: &AccountId, asset: AssetId, amount: Amount) -> Result<()> {
        self.send_all(&[Transfer {
            receiver: *receiver,
            asset,
            amount,
        }])
    }

    /// Native balance of `asset` currently held by the pool, including
    /// assets transferred in for the operation being processed.
    fn balance_of(&self, asset: AssetId) -> Amount;
}
