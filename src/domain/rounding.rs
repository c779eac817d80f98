//! Explicit rounding direction for arithmetic operations.

/// Specifies the rounding direction for division on domain types.
///
/// Pool math always truncates (`Down`) so that computed outputs never
/// exceed what the curve allows; `Up` exists for callers computing
/// required inputs off-chain.
///
/// # Examples
///
/// ```
/// use clamm::domain::Rounding;
///
/// let r = Rounding::Down;
/// assert!(r.is_down());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

impl Rounding {
    /// Returns `true` if this is [`Rounding::Up`].
    #[must_use]
    pub const fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }

    /// Returns `true` if this is [`Rounding::Down`].
    #[must_use]
    pub const fn is_down(&self) -> bool {
        matches!(self, Self::Down)
    }
}
