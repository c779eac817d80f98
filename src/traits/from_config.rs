//! Construction of a pool from its validated configuration.
//!
//! [`FromConfig`] gives every configuration-driven constructor the same
//! shape. Implementations **must** re-validate the configuration: configs
//! can arrive through deserialisation, which bypasses the validating
//! constructors of the individual fields.
//!
//! ```text
//! PoolConfig ──validate()──► ClammPool::from_config(&cfg)
//! ```

use crate::error::ClammError;

/// Builds a value from a configuration `C`.
///
/// # Implementors
///
/// - `impl FromConfig<PoolConfig> for ClammPool`
///
/// # Errors
///
/// Returns a bootstrap error (see
/// [`ClammError::is_bootstrap_error`]) if the configuration is invalid.
pub trait FromConfig<C> {
    /// Creates a new instance from `config`.
    ///
    /// The configuration is taken by reference so it can be kept for
    /// logging or registry bookkeeping.
    ///
    /// # Errors
    ///
    /// - [`ClammError::InvalidRange`] for unusable price bounds.
    /// - [`ClammError::InvalidAsset`] for colliding asset ids.
    /// - [`ClammError::InvalidFee`] for a fee above the cap.
    fn from_config(config: &C) -> Result<Self, ClammError>
    where
        Self: Sized;
}
