//! Arithmetic for the bounded-range curve.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`scale`] | 9-decimal base scale, native/base conversion, rounding allowance |
//! | [`wide`] | 512-bit checked intermediates, integer square root |
//! | [`curve`] | liquidity, price and swap solutions of the curve equation |
//!
//! Everything here is pure; the pool state lives in
//! [`LiquidityLedger`](crate::ledger::LiquidityLedger).

pub mod curve;
pub mod scale;
pub mod wide;

pub use scale::{LP_SCALE_FACTOR, SCALE};
