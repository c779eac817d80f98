//! Trait seams of the engine.
//!
//! [`FromConfig`] for configuration-driven construction, and the
//! collaborator interfaces through which pool operations reach the pause
//! switch, identity resolution, trade statistics and asset transfers.

mod collaborators;
mod from_config;

pub use collaborators::{
    AssetTransfer, IdentityInfo, IdentityResolver, PauseGate, ProtocolConfig, TradeEvent,
    TradeStatsSink, Transfer,
};
pub use from_config::FromConfig;
