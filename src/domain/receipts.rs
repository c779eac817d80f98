//! Outcomes of pool operations.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{Amount, Liquidity, Price, Side};

/// How a block of fee-earned liquidity was divided.
///
/// `users + protocol` always equals the liquidity that was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Portion credited to liquidity providers.
    pub users: Liquidity,
    /// Portion credited to the protocol fee recipient.
    pub protocol: Liquidity,
}

impl FeeSplit {
    /// Total liquidity split.
    #[must_use]
    pub const fn total(&self) -> u128 {
        self.users.get() + self.protocol.get()
    }
}

/// Result of [`ClammPool::deposit`](crate::pools::ClammPool::deposit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// LP tokens sent to the depositor (native, 6 decimals).
    pub lp_minted: Amount,
    /// Liquidity before the deposit.
    pub liquidity_before: Liquidity,
    /// Liquidity after the deposit.
    pub liquidity_after: Liquidity,
    /// Spot price after the deposit.
    pub price: Price,
}

/// Result of [`ClammPool::withdraw`](crate::pools::ClammPool::withdraw).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    /// LP tokens burned (native).
    pub lp_burned: Amount,
    /// Asset A sent to the provider (native).
    pub sent_a: Amount,
    /// Asset B sent to the provider (native).
    pub sent_b: Amount,
    /// User-fee liquidity claimed on top of the burned LP tokens.
    pub fee_share: Liquidity,
    /// Spot price after the withdrawal.
    pub price: Price,
}

/// Result of [`ClammPool::swap`](crate::pools::ClammPool::swap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapReceipt {
    /// Side of the asset the trader paid in.
    pub input_side: Side,
    /// Amount paid in (native units of the input asset).
    pub amount_in: Amount,
    /// Amount paid out (native units of the other asset).
    pub amount_out: Amount,
    /// Fee retained by the pool (native units of the input asset).
    pub fee: Amount,
    /// Spot price before the trade.
    pub price_before: Price,
    /// Spot price after the trade.
    pub price_after: Price,
    /// Liquidity earned by the trade and how it was split.
    pub fee_liquidity: FeeSplit,
}

impl fmt::Display for SwapReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Swap({:?} in={}, out={}, fee={}, price {} -> {})",
            self.input_side,
            self.amount_in,
            self.amount_out,
            self.fee,
            self.price_before,
            self.price_after
        )
    }
}
