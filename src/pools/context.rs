//! Per-call bundle of caller and collaborators.

use crate::domain::AccountId;
use crate::traits::{AssetTransfer, IdentityResolver, ProtocolConfig, TradeStatsSink};

/// Everything a state-mutating pool operation needs besides the pool
/// itself.
///
/// Built fresh for every call; the pool checks each collaborator against
/// its [`ServiceBindings`](crate::config::ServiceBindings) before using it.
pub struct PoolContext<'a> {
    /// Account invoking the operation; receives LP tokens, withdrawals and
    /// swap output.
    pub caller: AccountId,
    /// Protocol configuration (pause switch, protocol fee, fee executor).
    pub config: &'a dyn ProtocolConfig,
    /// Identity resolver.
    pub identity: &'a dyn IdentityResolver,
    /// Trade statistics sink.
    pub stats: &'a mut dyn TradeStatsSink,
    /// Asset transfer executor for the pool's holdings.
    pub transfer: &'a mut dyn AssetTransfer,
}

impl<'a> PoolContext<'a> {
    /// Bundles the caller and collaborators.
    pub fn new(
        caller: AccountId,
        config: &'a dyn ProtocolConfig,
        identity: &'a dyn IdentityResolver,
        stats: &'a mut dyn TradeStatsSink,
        transfer: &'a mut dyn AssetTransfer,
    ) -> Self {
        Self {
            caller,
            config,
            identity,
            stats,
            transfer,
        }
    }
}
