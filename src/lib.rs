//! # CLAMM
//!
//! Concentrated-liquidity AMM engine: a two-asset pool whose liquidity is
//! spread over one bounded price range `[Pmin, Pmax]`.
//!
//! The crate provides exact integer curve math, a liquidity ledger that
//! validates every reserve transition, and a pool type that orchestrates
//! deposits, withdrawals, swaps and fee administration against pluggable
//! collaborators (pause switch, identity, trade statistics, asset
//! transfers).
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `registry` | yes | Thread-safe [`PoolRegistry`](registry::PoolRegistry) |
//!
//! # Fixed-Point Conventions
//!
//! Every price, fee and fraction is an integer scaled by
//! [`SCALE`](math::SCALE) (`10^9`). Reserves are kept at 9 decimals
//! ("base scale") whatever the assets' own decimals; amounts crossing the
//! public API are native. Products are formed in 512-bit arithmetic and
//! every division truncates.
//!
//! ## Create a pool and trade
//!
//! ```rust
//! use clamm::config::PoolConfig;
//! use clamm::domain::{
//!     AccountId, Amount, Asset, AssetId, AssetPair, Decimals, FeeRate, PoolId, Price,
//!     PriceRange,
//! };
//! use clamm::math::scale::LP_TOTAL_SUPPLY;
//! use clamm::pools::ClammPool;
//! use clamm::testing::SimulatedServices;
//! use clamm::traits::FromConfig;
//!
//! let (usdc, eurc, lp) = (AssetId::new(1), AssetId::new(2), AssetId::new(3));
//! let six = Decimals::new(6).expect("valid decimals");
//!
//! // 1. Describe the pool: 0.8 - 1.25, 0.3% fee
//! let mut services = SimulatedServices::new(AccountId::from_bytes([9u8; 32]));
//! let pair = AssetPair::new(Asset::new(usdc, six), Asset::new(eurc, six)).expect("distinct");
//! let range = PriceRange::new(Price::new(800_000_000), Price::new(1_250_000_000))
//!     .expect("valid range");
//! let fee = FeeRate::new(3_000_000).expect("valid fee");
//! let config = PoolConfig::new(PoolId::new(1), pair, lp, range, fee, services.bindings())
//!     .expect("valid config");
//!
//! // 2. Bootstrap; the pool holds the whole LP supply
//! let mut pool = ClammPool::from_config(&config).expect("bootstrapped");
//! services.transfer.receive(lp, Amount::new(LP_TOTAL_SUPPLY));
//!
//! // 3. Provide liquidity
//! services.transfer.receive(usdc, Amount::new(1_000_000_000));
//! services.transfer.receive(eurc, Amount::new(1_000_000_000));
//! let provider = AccountId::from_bytes([1u8; 32]);
//! let deposit = pool
//!     .deposit(
//!         &mut services.context(provider),
//!         Amount::new(1_000_000_000),
//!         Amount::new(1_000_000_000),
//!         Amount::ZERO,
//!     )
//!     .expect("deposit");
//! assert!(deposit.lp_minted.get() > 0);
//!
//! // 4. Swap 10 USDC for EURC
//! services.transfer.receive(usdc, Amount::new(10_000_000));
//! let trader = AccountId::from_bytes([2u8; 32]);
//! let swap = pool
//!     .swap(&mut services.context(trader), usdc, Amount::new(10_000_000), Amount::ZERO)
//!     .expect("swap");
//! assert!(swap.amount_out.get() > 0);
//! assert!(swap.price_after < swap.price_before);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Consumer    │  PoolConfig + collaborators (PoolContext)
//! └──────┬──────┘
//!        │ from_config / deposit / withdraw / swap
//!        ▼
//! ┌─────────────┐
//! │  ClammPool   │  guards, orchestration, LP supply, transfers
//! └──────┬──────┘
//!        │ staged transitions
//!        ▼
//! ┌─────────────┐
//! │   Ledger     │  reserves, L, fee sub-accounts, drop tolerance
//! └──────┬──────┘
//!        │ closed forms
//!        ▼
//! ┌─────────────┐
//! │ Curve math   │  L from reserves, price, swap outputs (U512)
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Newtype value types: [`Amount`](domain::Amount), [`Price`](domain::Price), [`Liquidity`](domain::Liquidity), etc. |
//! | [`math`] | Scaling, 512-bit helpers and the bounded-range curve |
//! | [`ledger`] | [`LiquidityLedger`](ledger::LiquidityLedger): reserves and liquidity transitions |
//! | [`pools`] | [`ClammPool`](pools::ClammPool) and [`PoolContext`](pools::PoolContext) |
//! | [`config`] | [`PoolConfig`](config::PoolConfig) bootstrap parameters |
//! | [`traits`] | Collaborator traits and [`FromConfig`](traits::FromConfig) |
//! | [`registry`] | Thread-safe pool registry (feature `registry`) |
//! | [`testing`] | In-memory collaborators for simulation and tests |
//! | [`error`] | [`ClammError`](error::ClammError) unified error enum |
//! | [`prelude`] | Convenience re-exports |

pub mod config;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod math;
pub mod pools;
pub mod prelude;
#[cfg(feature = "registry")]
pub mod registry;
pub mod testing;
pub mod traits;
