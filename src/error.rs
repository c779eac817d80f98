//! Unified error types for the CLAMM engine.
//!
//! All fallible operations across the crate return [`ClammError`] as their
//! error type. Every variant is a local validation failure detected before
//! any pool field is written, so a failed operation leaves the pool exactly
//! as it was and the caller may retry with adjusted parameters.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, ClammError>;

/// Errors produced by the curve math, the liquidity ledger and the pool
/// operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClammError {
    /// A collaborator passed to the pool is not the one it was bound to.
    #[error("configuration mismatch: {0}")]
    ConfigMismatch(&'static str),

    /// The caller lacks the role required by the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    /// The protocol pause flag is set.
    #[error("services are paused")]
    ServicesPaused,

    /// The caller's identity is locked.
    #[error("identity is locked")]
    IdentityLocked,

    /// The caller's verification class is below the pool minimum.
    #[error("verification class {actual} is below the required {required}")]
    InsufficientVerification {
        /// Minimum class configured on the pool.
        required: u8,
        /// Class reported by the identity resolver.
        actual: u8,
    },

    /// Price bounds are not usable.
    #[error("invalid price range: {0}")]
    InvalidRange(&'static str),

    /// Asset decimals exceed the base scale.
    #[error("invalid decimals: {0}")]
    InvalidDecimals(&'static str),

    /// Fee or fee fraction out of range.
    #[error("invalid fee: {0}")]
    InvalidFee(&'static str),

    /// Asset not part of the pool or asset ids collide.
    #[error("invalid asset: {0}")]
    InvalidAsset(&'static str),

    /// The operation would move zero value to one of the parties.
    #[error("zero output: {0}")]
    ZeroOutput(&'static str),

    /// Liquidity fell by more than the rounding allowance.
    #[error("liquidity dropped by {drop}, allowance is {allowed}")]
    LiquidityDropExceeded {
        /// Observed decrease in base-scale liquidity units.
        drop: u128,
        /// Permitted rounding allowance.
        allowed: u128,
    },

    /// A withdrawal would have increased liquidity.
    #[error("liquidity increased from {before} to {after} on withdrawal")]
    LiquidityIncreased {
        /// Stored liquidity before the withdrawal.
        before: u128,
        /// Recomputed liquidity after the withdrawal.
        after: u128,
    },

    /// Output below the caller's minimum.
    #[error("slippage exceeded: minimum {minimum}, got {actual}")]
    SlippageExceeded {
        /// Minimum accepted by the caller (native units).
        minimum: u128,
        /// Amount the operation would deliver (native units).
        actual: u128,
    },

    /// Reserves or fee balances cannot cover the requested amount.
    #[error("insufficient reserve: {0}")]
    InsufficientReserve(&'static str),

    /// Recorded reserves would exceed the real balance.
    #[error("balance mismatch: {0}")]
    BalanceMismatch(&'static str),

    /// A pool with this id was already bootstrapped.
    #[error("pool already bootstrapped")]
    AlreadyBootstrapped,

    /// No pool registered under the id.
    #[error("pool not found")]
    PoolNotFound,

    /// Arithmetic overflow.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow.
    #[error("arithmetic underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// A collaborator (stats sink, transfer executor, identity service)
    /// reported a failure.
    #[error("collaborator failure: {0}")]
    Collaborator(String),
}

impl ClammError {
    /// Returns `true` for errors raised by configuration validation, which
    /// are fatal to a bootstrap attempt.
    #[must_use]
    pub const fn is_bootstrap_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRange(_)
                | Self::InvalidDecimals(_)
                | Self::InvalidFee(_)
                | Self::InvalidAsset(_)
                | Self::AlreadyBootstrapped
        )
    }
}
