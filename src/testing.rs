//! In-memory collaborators for simulation and tests.
//!
//! [`SimulatedServices`] bundles one fake of each collaborator trait and
//! hands out [`PoolContext`]s over them, so a pool can be driven end to end
//! without any external system:
//!
//! ```
//! use clamm::domain::{AccountId, AssetId, Amount};
//! use clamm::testing::SimulatedServices;
//!
//! let mut services = SimulatedServices::new(AccountId::from_bytes([9u8; 32]));
//! services.transfer.receive(AssetId::new(1), Amount::new(500));
//! assert_eq!(services.bindings().identity, services.identity.id);
//! let _ctx = services.context(AccountId::from_bytes([1u8; 32]));
//! ```

use std::collections::HashMap;

use crate::config::ServiceBindings;
use crate::domain::{AccountId, Amount, AssetId, ServiceId};
use crate::error::{ClammError, Result};
use crate::pools::PoolContext;
use crate::traits::{
    AssetTransfer, IdentityInfo, IdentityResolver, PauseGate, ProtocolConfig, TradeEvent,
    TradeStatsSink, Transfer,
};

/// Fixed protocol configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProtocolConfig {
    /// Service id reported to the pool.
    pub id: ServiceId,
    /// Pause switch.
    pub paused: bool,
    /// Protocol share of fee liquidity, base scale.
    pub protocol_fee_fraction: u128,
    /// Account allowed to run admin operations.
    pub fee_executor: AccountId,
}

impl PauseGate for StaticProtocolConfig {
    fn is_paused(&self) -> bool {
        self.paused
    }
}

impl ProtocolConfig for StaticProtocolConfig {
    fn service_id(&self) -> ServiceId {
        self.id
    }

    fn protocol_fee_fraction(&self) -> u128 {
        self.protocol_fee_fraction
    }

    fn fee_executor(&self) -> AccountId {
        self.fee_executor
    }
}

/// Identity table with an optional fallback for unknown accounts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticIdentityResolver {
    /// Service id reported to the pool.
    pub id: ServiceId,
    /// Identity returned for accounts not in the table; `None` makes
    /// unknown accounts an error.
    pub fallback: Option<IdentityInfo>,
    identities: HashMap<AccountId, IdentityInfo>,
}

impl StaticIdentityResolver {
    /// Registers or replaces the identity of `account`.
    pub fn set(&mut self, account: AccountId, info: IdentityInfo) {
        self.identities.insert(account, info);
    }
}

impl IdentityResolver for StaticIdentityResolver {
    fn service_id(&self) -> ServiceId {
        self.id
    }

    fn resolve(&self, account: &AccountId) -> Result<IdentityInfo> {
        self.identities
            .get(account)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| ClammError::Collaborator(format!("unknown identity {account}")))
    }
}

/// Stats sink keeping every event in memory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordingStatsSink {
    /// Service id reported to the pool.
    pub id: ServiceId,
    /// Recorded trades, oldest first.
    pub events: Vec<TradeEvent>,
    /// When set, `record` fails.
    pub fail: bool,
}

impl TradeStatsSink for RecordingStatsSink {
    fn service_id(&self) -> ServiceId {
        self.id
    }

    fn record(&mut self, event: &TradeEvent) -> Result<()> {
        if self.fail {
            return Err(ClammError::Collaborator("stats sink unavailable".to_owned()));
        }
        self.events.push(*event);
        Ok(())
    }

    fn retract(&mut self, event: &TradeEvent) -> Result<()> {
        match self.events.last() {
            Some(last) if last == event => {
                self.events.pop();
                Ok(())
            }
            _ => Err(ClammError::Collaborator(
                "retracted event is not the latest record".to_owned(),
            )),
        }
    }
}

/// Balances held by the pool and a log of outgoing transfers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InMemoryTransfer {
    balances: HashMap<AssetId, Amount>,
    /// Outgoing transfers, oldest first.
    pub sent: Vec<(AccountId, AssetId, Amount)>,
    /// When set, every payout with a leg in this asset is refused.
    pub rejected_asset: Option<AssetId>,
}

impl InMemoryTransfer {
    /// Simulates an incoming transfer to the pool.
    pub fn receive(&mut self, asset: AssetId, amount: Amount) {
        let balance = self.balances.entry(asset).or_default();
        *balance = Amount::new(balance.get().saturating_add(amount.get()));
    }

    /// Total sent to `receiver` in `asset`.
    pub fn total_sent(&self, receiver: &AccountId, asset: AssetId) -> Amount {
        Amount::new(
            self.sent
                .iter()
                .filter(|(to, id, _)| to == receiver && *id == asset)
                .map(|(_, _, amount)| amount.get())
                .sum(),
        )
    }
}

impl AssetTransfer for InMemoryTransfer {
    fn send_all(&mut self, transfers: &[Transfer]) -> Result<()> {
        let mut next = self.balances.clone();
        for leg in transfers {
            if self.rejected_asset == Some(leg.asset) {
                return Err(ClammError::Collaborator("receiver rejected".to_owned()));
            }
            let balance = next.get(&leg.asset).copied().unwrap_or_default();
            let remaining = balance.checked_sub(&leg.amount).ok_or_else(|| {
                ClammError::Collaborator(format!(
                    "pool holds {balance} of {}, cannot send {}",
                    leg.asset, leg.amount
                ))
            })?;
            next.insert(leg.asset, remaining);
        }
        self.balances = next;
        self.sent
            .extend(transfers.iter().map(|leg| (leg.receiver, leg.asset, leg.amount)));
        Ok(())
    }

    fn balance_of(&self, asset: AssetId) -> Amount {
        self.balances.get(&asset).copied().unwrap_or_default()
    }
}

/// One of each fake collaborator, with distinct service ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedServices {
    /// Protocol configuration.
    pub config: StaticProtocolConfig,
    /// Identity resolver; unknown accounts resolve to an unlocked class-0
    /// identity paying the full fee.
    pub identity: StaticIdentityResolver,
    /// Stats sink.
    pub stats: RecordingStatsSink,
    /// Pool holdings.
    pub transfer: InMemoryTransfer,
}

impl SimulatedServices {
    /// Creates the fakes with no protocol fee and the given fee executor.
    #[must_use]
    pub fn new(fee_executor: AccountId) -> Self {
        Self {
            config: StaticProtocolConfig {
                id: ServiceId::new(1),
                paused: false,
                protocol_fee_fraction: 0,
                fee_executor,
            },
            identity: StaticIdentityResolver {
                id: ServiceId::new(2),
                fallback: Some(IdentityInfo::default()),
                ..StaticIdentityResolver::default()
            },
            stats: RecordingStatsSink {
                id: ServiceId::new(3),
                ..RecordingStatsSink::default()
            },
            transfer: InMemoryTransfer::default(),
        }
    }

    /// Bindings matching these fakes.
    #[must_use]
    pub const fn bindings(&self) -> ServiceBindings {
        ServiceBindings {
            protocol_config: self.config.id,
            identity: self.identity.id,
            stats: self.stats.id,
        }
    }

    /// A context for `caller` over these fakes.
    pub fn context(&mut self, caller: AccountId) -> PoolContext<'_> {
        PoolContext::new(
            caller,
            &self.config,
            &self.identity,
            &mut self.stats,
            &mut self.transfer,
        )
    }
}
