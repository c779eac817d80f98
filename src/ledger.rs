//! Reserve and liquidity bookkeeping of a single pool.
//!
//! [`LiquidityLedger`] owns the tuple
//! `(reserve_a, reserve_b, L, users_from_fees, protocol_from_fees)` and is
//! the only place those values change. Every transition recomputes `L` from
//! the new reserves through [`curve`] and enforces the liquidity invariant:
//!
//! - a deposit-like transition (deposit, swap, excess distribution) may not
//!   lower `L` by more than the rounding allowance; a smaller drop is
//!   absorbed by keeping the old `L`;
//! - a withdrawal may not raise `L`.
//!
//! Each method computes all new values before assigning any field, so an
//! error leaves the ledger untouched.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
    apply_fraction, Amount, Decimals, FeeSplit, Liquidity, Price, PriceRange, Rounding,
};
use crate::error::{ClammError, Result};
use crate::math::scale::{self, SCALE};
use crate::math::{curve, wide};

/// Signed change applied to one reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReserveDelta {
    /// Assets added to the reserve.
    Credit(Amount),
    /// Assets removed from the reserve.
    Debit(Amount),
}

impl ReserveDelta {
    /// No change.
    pub const NONE: Self = Self::Credit(Amount::ZERO);

    fn apply(self, reserve: Amount) -> Result<Amount> {
        match self {
            Self::Credit(a) => reserve
                .checked_add(&a)
                .ok_or(ClammError::Overflow("reserve credit")),
            Self::Debit(a) => reserve
                .checked_sub(&a)
                .ok_or(ClammError::InsufficientReserve("reserve cannot cover the debit")),
        }
    }
}

/// Liquidity before and after a ledger transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiquidityTransition {
    /// Stored liquidity before the transition.
    pub before: Liquidity,
    /// Liquidity recomputed from the new reserves.
    pub computed: Liquidity,
    /// Liquidity stored after the transition.
    pub after: Liquidity,
}

impl LiquidityTransition {
    /// Increase of the stored liquidity (zero if it did not grow).
    #[must_use]
    pub const fn growth(&self) -> Liquidity {
        Liquidity::new(self.after.get().saturating_sub(self.before.get()))
    }

    /// Returns `true` if a rounding drop was absorbed.
    #[must_use]
    pub const fn absorbed_drop(&self) -> bool {
        self.computed.get() < self.after.get()
    }
}

/// Reserve share released for a block of burned liquidity.
///
/// `base_*` is what leaves the reserves; it is always `native_*` times the
/// asset's scale factor, so the pool never books less than it pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Withdrawal {
    /// Asset A paid out, native units.
    pub native_a: Amount,
    /// Asset B paid out, native units.
    pub native_b: Amount,
    /// Asset A removed from the reserve, base scale.
    pub base_a: Amount,
    /// Asset B removed from the reserve, base scale.
    pub base_b: Amount,
}

impl Withdrawal {
    /// Returns `true` if neither asset would be paid out.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.native_a.is_zero() && self.native_b.is_zero()
    }
}

/// Persistent reserve and liquidity state of one pool.
///
/// # Examples
///
/// ```
/// use clamm::domain::{Amount, Decimals, Liquidity, Price, PriceRange};
/// use clamm::ledger::{LiquidityLedger, ReserveDelta};
///
/// let range = PriceRange::new(Price::ONE, Price::ONE).expect("flat range");
/// let mut ledger = LiquidityLedger::new(range, Decimals::BASE, Decimals::BASE);
/// let t = ledger
///     .apply_reserve_delta(
///         ReserveDelta::Credit(Amount::new(1_000)),
///         ReserveDelta::Credit(Amount::new(1_000)),
///     )
///     .expect("deposit");
/// assert_eq!(t.after, Liquidity::new(2_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityLedger {
    range: PriceRange,
    decimals_a: Decimals,
    decimals_b: Decimals,
    reserve_a: Amount,
    reserve_b: Amount,
    liquidity: Liquidity,
    liquidity_users_from_fees: Liquidity,
    liquidity_protocol_from_fees: Liquidity,
}

impl LiquidityLedger {
    /// Creates an empty ledger for the given range and asset decimals.
    #[must_use]
    pub const fn new(range: PriceRange, decimals_a: Decimals, decimals_b: Decimals) -> Self {
        Self {
            range,
            decimals_a,
            decimals_b,
            reserve_a: Amount::ZERO,
            reserve_b: Amount::ZERO,
            liquidity: Liquidity::ZERO,
            liquidity_users_from_fees: Liquidity::ZERO,
            liquidity_protocol_from_fees: Liquidity::ZERO,
        }
    }

    /// Price range of the pool.
    #[must_use]
    pub const fn range(&self) -> &PriceRange {
        &self.range
    }

    /// Swappable reserve of asset A (base scale).
    pub const fn reserve_a(&self) -> Amount {
        self.reserve_a
    }

    /// Swappable reserve of asset B (base scale).
    pub const fn reserve_b(&self) -> Amount {
        self.reserve_b
    }

    /// Stored liquidity `L`.
    pub const fn liquidity(&self) -> Liquidity {
        self.liquidity
    }

    /// Liquidity earned by providers through fees and not yet claimed.
    pub const fn liquidity_users_from_fees(&self) -> Liquidity {
        self.liquidity_users_from_fees
    }

    /// Liquidity earned by the protocol through fees and not yet skimmed.
    pub const fn liquidity_protocol_from_fees(&self) -> Liquidity {
        self.liquidity_protocol_from_fees
    }

    /// Native-to-base factor of asset A.
    #[must_use]
    pub const fn scale_a(&self) -> u128 {
        self.decimals_a.scale_factor()
    }

    /// Native-to-base factor of asset B.
    #[must_use]
    pub const fn scale_b(&self) -> u128 {
        self.decimals_b.scale_factor()
    }

    /// Largest liquidity drop absorbed as rounding noise.
    #[must_use]
    pub const fn allowed_drop(&self) -> u128 {
        scale::allowed_drop(self.scale_a(), self.scale_b())
    }

    /// Liquidity of arbitrary reserves over this ledger's range.
    ///
    /// # Errors
    ///
    /// Propagates [`curve::liquidity_from_reserves`] errors.
    pub fn liquidity_for(&self, reserve_a: Amount, reserve_b: Amount) -> Result<Liquidity> {
        curve::liquidity_from_reserves(reserve_a, reserve_b, &self.range)
    }

    /// Spot price of the current reserves, or `None` for an empty ranged
    /// pool (the price is then undetermined).
    ///
    /// # Errors
    ///
    /// Propagates [`curve::price_from_reserves`] errors.
    pub fn spot_price(&self) -> Result<Option<Price>> {
        if self.liquidity.is_zero() && !self.range.is_flat() {
            return Ok(None);
        }
        curve::price_from_reserves(self.reserve_a, self.reserve_b, &self.range, self.liquidity)
            .map(Some)
    }

    /// Applies a reserve change that must not lower liquidity.
    ///
    /// Recomputes `L` from the new reserves. A higher `L` is stored; a drop
    /// within [`allowed_drop`](Self::allowed_drop) keeps the old `L` while
    /// the reserves still move; a larger drop is rejected.
    ///
    /// # Errors
    ///
    /// - [`ClammError::LiquidityDropExceeded`] for a drop beyond the
    ///   allowance.
    /// - [`ClammError::InsufficientReserve`] if a debit exceeds a reserve.
    /// - Arithmetic errors from the curve solve.
    pub fn apply_reserve_delta(
        &mut self,
        delta_a: ReserveDelta,
        delta_b: ReserveDelta,
    ) -> Result<LiquidityTransition> {
        let reserve_a = delta_a.apply(self.reserve_a)?;
        let reserve_b = delta_b.apply(self.reserve_b)?;
        let before = self.liquidity;
        let computed = self.liquidity_for(reserve_a, reserve_b)?;
        let after = if computed >= before {
            computed
        } else {
            let drop = before.abs_diff(&computed);
            let allowed = self.allowed_drop();
            if drop > allowed {
                warn!(
                    before = before.get(),
                    computed = computed.get(),
                    drop,
                    allowed,
                    "liquidity drop rejected"
                );
                return Err(ClammError::LiquidityDropExceeded { drop, allowed });
            }
            debug!(drop, allowed, "absorbed rounding drop in liquidity");
            before
        };
        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.liquidity = after;
        Ok(LiquidityTransition {
            before,
            computed,
            after,
        })
    }

    /// Removes assets from both reserves and stores the recomputed, lower
    /// liquidity.
    ///
    /// # Errors
    ///
    /// - [`ClammError::LiquidityIncreased`] if the new reserves would carry
    ///   more liquidity than before.
    /// - [`ClammError::InsufficientReserve`] if an amount exceeds a reserve.
    pub fn apply_withdrawal(
        &mut self,
        out_a: Amount,
        out_b: Amount,
    ) -> Result<LiquidityTransition> {
        let reserve_a = ReserveDelta::Debit(out_a).apply(self.reserve_a)?;
        let reserve_b = ReserveDelta::Debit(out_b).apply(self.reserve_b)?;
        let before = self.liquidity;
        let computed = self.liquidity_for(reserve_a, reserve_b)?;
        if computed > before {
            warn!(
                before = before.get(),
                after = computed.get(),
                "withdrawal would increase liquidity"
            );
            return Err(ClammError::LiquidityIncreased {
                before: before.get(),
                after: computed.get(),
            });
        }
        self.reserve_a = reserve_a;
        self.reserve_b = reserve_b;
        self.liquidity = computed;
        Ok(LiquidityTransition {
            before,
            computed,
            after: computed,
        })
    }

    /// Splits fee-earned liquidity between providers and the protocol and
    /// credits both sub-accounts.
    ///
    /// `users = delta · (SCALE − fraction) / SCALE`, the protocol receives
    /// the remainder. A zero fraction sends everything to users.
    ///
    /// # Errors
    ///
    /// - [`ClammError::InvalidFee`] if `protocol_fee_fraction > SCALE`.
    /// - [`ClammError::Overflow`] if a sub-account overflows.
    pub fn accrue_fee_liquidity(
        &mut self,
        delta: Liquidity,
        protocol_fee_fraction: u128,
    ) -> Result<FeeSplit> {
        let split = split_fee_liquidity(delta, protocol_fee_fraction)?;
        let users = self
            .liquidity_users_from_fees
            .checked_add(&split.users)
            .ok_or(ClammError::Overflow("user fee liquidity"))?;
        let protocol = self
            .liquidity_protocol_from_fees
            .checked_add(&split.protocol)
            .ok_or(ClammError::Overflow("protocol fee liquidity"))?;
        self.liquidity_users_from_fees = users;
        self.liquidity_protocol_from_fees = protocol;
        Ok(split)
    }

    /// Removes a claimed share from the user-fee sub-account.
    ///
    /// # Errors
    ///
    /// Returns [`ClammError::InsufficientReserve`] if `amount` exceeds the
    /// balance.
    pub fn claim_user_fees(&mut self, amount: Liquidity) -> Result<()> {
        self.liquidity_users_from_fees = self
            .liquidity_users_from_fees
            .checked_sub(&amount)
            .ok_or(ClammError::InsufficientReserve("user fee liquidity"))?;
        Ok(())
    }

    /// Reserve share released when `burned` base-scale liquidity units
    /// leave the pool, rounded down to whole native units of each asset.
    ///
    /// # Errors
    ///
    /// - [`ClammError::DivisionByZero`] if the pool has no liquidity.
    /// - [`ClammError::Overflow`] on arithmetic overflow.
    pub fn withdrawal_for(&self, burned: u128) -> Result<Withdrawal> {
        let share_a = curve::withdraw_on_lp_burn(burned, self.reserve_a, self.liquidity)?;
        let share_b = curve::withdraw_on_lp_burn(burned, self.reserve_b, self.liquidity)?;
        let (native_a, base_a) = scale::round_down_to_native(share_a, self.decimals_a);
        let (native_b, base_b) = scale::round_down_to_native(share_b, self.decimals_b);
        Ok(Withdrawal {
            native_a,
            native_b,
            base_a,
            base_b,
        })
    }

    /// Withdraws the protocol's fee liquidity from the reserves.
    ///
    /// `amount == 0` takes the whole balance.
    ///
    /// # Errors
    ///
    /// - [`ClammError::InsufficientReserve`] if `amount` exceeds the
    ///   protocol balance.
    /// - [`ClammError::ZeroOutput`] if nothing would be paid out.
    /// - Errors of [`apply_withdrawal`](Self::apply_withdrawal).
    pub fn skim_protocol_fees(&mut self, amount: Liquidity) -> Result<(Liquidity, Withdrawal)> {
        let balance = self.liquidity_protocol_from_fees;
        let amount = if amount.is_zero() { balance } else { amount };
        let remaining = balance
            .checked_sub(&amount)
            .ok_or(ClammError::InsufficientReserve("protocol fee liquidity"))?;
        let withdrawal = self.withdrawal_for(amount.get())?;
        if withdrawal.is_empty() {
            return Err(ClammError::ZeroOutput("protocol fee skim pays out nothing"));
        }
        let mut next = self.clone();
        next.apply_withdrawal(withdrawal.base_a, withdrawal.base_b)?;
        next.liquidity_protocol_from_fees = remaining;
        *self = next;
        Ok((amount, withdrawal))
    }
}

/// Pure fee split used by [`LiquidityLedger::accrue_fee_liquidity`].
///
/// # Errors
///
/// Returns [`ClammError::InvalidFee`] if `protocol_fee_fraction > SCALE`.
pub fn split_fee_liquidity(delta: Liquidity, protocol_fee_fraction: u128) -> Result<FeeSplit> {
    if protocol_fee_fraction > SCALE {
        return Err(ClammError::InvalidFee(
            "protocol fee fraction must not exceed 100%",
        ));
    }
    if protocol_fee_fraction == 0 {
        return Ok(FeeSplit {
            users: delta,
            protocol: Liquidity::ZERO,
        });
    }
    let users = apply_fraction(
        SCALE - protocol_fee_fraction,
        Amount::new(delta.get()),
        Rounding::Down,
    )?;
    let users = Liquidity::new(users.get());
    let protocol = delta
        .checked_sub(&users)
        .ok_or(ClammError::Underflow("protocol fee split"))?;
    Ok(FeeSplit { users, protocol })
}

/// `a · b / c` for liquidity shares.
pub(crate) fn share_of(a: u128, b: u128, c: u128) -> Result<u128> {
    wide::mul_div(a, b, c, "liquidity share")
}
