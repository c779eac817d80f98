//! Concentrated-liquidity pool over a single bounded price range.
//!
//! [`ClammPool`] orchestrates deposits, withdrawals and swaps as state
//! transitions over a [`LiquidityLedger`], with every amount solved by
//! [`curve`](crate::math::curve).
//!
//! # Operation Protocol
//!
//! Every state-mutating operation follows the same sequence:
//!
//! 1. Check the collaborators against the pool's bindings
//!    ([`ClammError::ConfigMismatch`]).
//! 2. Check the pause switch ([`ClammError::ServicesPaused`]).
//! 3. Check the caller: identity lock and verification class for user
//!    operations, the fee-executor role for administrative ones.
//! 4. Compute the new ledger state on a copy, validating every invariant.
//! 5. Report statistics, then pay out in one [`AssetTransfer::send_all`]
//!    call. A failed payout retracts the trade record.
//! 6. Commit the copy.
//!
//! Any error before step 6 leaves the pool and its holdings exactly as
//! they were.
//!
//! # LP Tokens
//!
//! A fixed supply of [`LP_TOTAL_SUPPLY`] is held by the pool at bootstrap.
//! Deposits send `ΔL / 1000` tokens out; withdrawals take them back. The
//! outstanding supply is the part held by providers.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::PoolContext;
use crate::config::PoolConfig;
use crate::domain::{
    apply_fraction, AccountId, Amount, AssetId, AssetPair, DepositReceipt, FeeRate, FeeSplit,
    Liquidity, PoolId, Price, Rounding, Side, SwapReceipt, WithdrawReceipt,
};
use crate::error::{ClammError, Result};
use crate::ledger::{share_of, LiquidityLedger, ReserveDelta, Withdrawal};
use crate::math::curve;
use crate::math::scale::{self, LP_TOTAL_SUPPLY, SCALE};
use crate::traits::{AssetTransfer, FromConfig, IdentityInfo, TradeEvent, Transfer};

/// Amounts of a swap before any state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SwapPlan {
    input_side: Side,
    in_base: Amount,
    fee_base: Amount,
    out_native: Amount,
    out_base: Amount,
}

/// Serialisable snapshot of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Pool id.
    pub pool: PoolId,
    /// Asset A id.
    pub asset_a: AssetId,
    /// Asset B id.
    pub asset_b: AssetId,
    /// LP token id.
    pub lp_asset: AssetId,
    /// Native-to-base factor of asset A.
    pub scale_a: u128,
    /// Native-to-base factor of asset B.
    pub scale_b: u128,
    /// Reserve of asset A, base scale.
    pub reserve_a: Amount,
    /// Reserve of asset B, base scale.
    pub reserve_b: Amount,
    /// Liquidity `L`.
    pub liquidity: Liquidity,
    /// Unclaimed provider fee liquidity.
    pub liquidity_users_from_fees: Liquidity,
    /// Unskimmed protocol fee liquidity.
    pub liquidity_protocol_from_fees: Liquidity,
    /// LP tokens held by providers.
    pub lp_outstanding: Amount,
    /// Cached spot price.
    pub current_price: Price,
    /// Lower price bound.
    pub price_min: Price,
    /// Upper price bound.
    pub price_max: Price,
    /// Trading fee.
    pub fee_rate: FeeRate,
    /// Minimum verification class.
    pub verification_class: u8,
}

/// A bootstrapped concentrated-liquidity pool.
///
/// Created from a [`PoolConfig`] via [`FromConfig`]. Holds the immutable
/// configuration, the [`LiquidityLedger`], the cached spot price and the
/// outstanding LP supply.
///
/// # Examples
///
/// ```
/// use clamm::config::PoolConfig;
/// use clamm::domain::{
///     AccountId, Amount, Asset, AssetId, AssetPair, Decimals, FeeRate, PoolId, Price,
///     PriceRange,
/// };
/// use clamm::pools::ClammPool;
/// use clamm::testing::SimulatedServices;
/// use clamm::traits::FromConfig;
///
/// let mut services = SimulatedServices::new(AccountId::from_bytes([9u8; 32]));
/// let pair = AssetPair::new(
///     Asset::new(AssetId::new(1), Decimals::BASE),
///     Asset::new(AssetId::new(2), Decimals::BASE),
/// )
/// .expect("distinct");
/// let range = PriceRange::new(Price::ONE, Price::ONE).expect("flat");
/// let cfg = PoolConfig::new(
///     PoolId::new(1),
///     pair,
///     AssetId::new(3),
///     range,
///     FeeRate::ZERO,
///     services.bindings(),
/// )
/// .expect("valid");
/// let mut pool = ClammPool::from_config(&cfg).expect("bootstrapped");
///
/// services.transfer.receive(AssetId::new(1), Amount::new(1_000_000));
/// services.transfer.receive(AssetId::new(2), Amount::new(1_000_000));
/// services.transfer.receive(AssetId::new(3), Amount::new(u64::MAX.into()));
/// let mut ctx = services.context(AccountId::from_bytes([1u8; 32]));
/// let receipt = pool
///     .deposit(&mut ctx, Amount::new(1_000_000), Amount::new(1_000_000), Amount::ZERO)
///     .expect("deposit");
/// assert_eq!(receipt.lp_minted, Amount::new(2_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClammPool {
    config: PoolConfig,
    ledger: LiquidityLedger,
    current_price: Price,
    lp_outstanding: Amount,
}

impl FromConfig<PoolConfig> for ClammPool {
    fn from_config(config: &PoolConfig) -> Result<Self> {
        config.validate()?;
        let pair = config.pair();
        let ledger = LiquidityLedger::new(
            *config.range(),
            pair.asset_a().decimals(),
            pair.asset_b().decimals(),
        );
        info!(
            pool = %config.pool_id(),
            price_min = %config.range().price_min(),
            price_max = %config.range().price_max(),
            fee = %config.fee_rate(),
            "pool bootstrapped"
        );
        Ok(Self {
            config: config.clone(),
            ledger,
            current_price: config.initial_price(),
            lp_outstanding: Amount::ZERO,
        })
    }
}

impl ClammPool {
    // -- accessors ------------------------------------------------------------

    /// Pool id.
    #[must_use]
    pub const fn id(&self) -> PoolId {
        self.config.pool_id()
    }

    /// Bootstrap configuration.
    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Asset pair.
    #[must_use]
    pub const fn pair(&self) -> &AssetPair {
        self.config.pair()
    }

    /// Reserve and liquidity state.
    #[must_use]
    pub const fn ledger(&self) -> &LiquidityLedger {
        &self.ledger
    }

    /// Last computed spot price. Re-derivable from the ledger; cached for
    /// readers.
    pub const fn current_price(&self) -> Price {
        self.current_price
    }

    /// LP tokens held by providers.
    pub const fn lp_outstanding(&self) -> Amount {
        self.lp_outstanding
    }

    /// Full snapshot of the pool.
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let range = self.config.range();
        PoolStatus {
            pool: self.id(),
            asset_a: self.pair().asset_a().id(),
            asset_b: self.pair().asset_b().id(),
            lp_asset: self.config.lp_asset(),
            scale_a: self.ledger.scale_a(),
            scale_b: self.ledger.scale_b(),
            reserve_a: self.ledger.reserve_a(),
            reserve_b: self.ledger.reserve_b(),
            liquidity: self.ledger.liquidity(),
            liquidity_users_from_fees: self.ledger.liquidity_users_from_fees(),
            liquidity_protocol_from_fees: self.ledger.liquidity_protocol_from_fees(),
            lp_outstanding: self.lp_outstanding,
            current_price: self.current_price,
            price_min: range.price_min(),
            price_max: range.price_max(),
            fee_rate: self.config.fee_rate(),
            verification_class: self.config.verification_class(),
        }
    }

    // -- guards ---------------------------------------------------------------

    fn check_bindings(&self, ctx: &PoolContext<'_>) -> Result<()> {
        let bindings = self.config.bindings();
        if ctx.config.service_id() != bindings.protocol_config {
            return Err(ClammError::ConfigMismatch(
                "protocol configuration is not the one the pool is bound to",
            ));
        }
        if ctx.identity.service_id() != bindings.identity {
            return Err(ClammError::ConfigMismatch(
                "identity resolver is not the one the pool is bound to",
            ));
        }
        if ctx.stats.service_id() != bindings.stats {
            return Err(ClammError::ConfigMismatch(
                "stats sink is not the one the pool is bound to",
            ));
        }
        if ctx.config.is_paused() {
            return Err(ClammError::ServicesPaused);
        }
        Ok(())
    }

    fn check_identity(&self, ctx: &PoolContext<'_>) -> Result<IdentityInfo> {
        self.check_bindings(ctx)?;
        let identity = ctx.identity.resolve(&ctx.caller)?;
        if identity.is_locked {
            return Err(ClammError::IdentityLocked);
        }
        let required = self.config.verification_class();
        if identity.verification_class < required {
            return Err(ClammError::InsufficientVerification {
                required,
                actual: identity.verification_class,
            });
        }
        Ok(identity)
    }

    fn check_fee_executor(&self, ctx: &PoolContext<'_>) -> Result<()> {
        self.check_bindings(ctx)?;
        if ctx.caller != ctx.config.fee_executor() {
            return Err(ClammError::Unauthorized(
                "only the fee executor may run this operation",
            ));
        }
        Ok(())
    }

    /// Recorded reserves must stay covered by the real balances once
    /// `outgoing_*` native units have left the pool.
    fn ensure_backed(
        &self,
        ledger: &LiquidityLedger,
        transfer: &dyn AssetTransfer,
        outgoing_a: Amount,
        outgoing_b: Amount,
    ) -> Result<()> {
        let pair = self.pair();
        let sides = [
            (pair.asset_a(), ledger.reserve_a(), outgoing_a, "asset A"),
            (pair.asset_b(), ledger.reserve_b(), outgoing_b, "asset B"),
        ];
        for (asset, reserve, outgoing, label) in sides {
            let held = transfer
                .balance_of(asset.id())
                .checked_sub(&outgoing)
                .ok_or(ClammError::BalanceMismatch(
                    "pool holds less than it is about to send",
                ))?;
            let held_base = asset.to_base(held)?;
            if reserve > held_base {
                debug!(asset = label, %reserve, %held_base, "reserve not backed");
                return Err(ClammError::BalanceMismatch(
                    "recorded reserve exceeds the real balance",
                ));
            }
        }
        Ok(())
    }

    fn price_of(&self, ledger: &LiquidityLedger) -> Result<Price> {
        Ok(ledger.spot_price()?.unwrap_or(self.current_price))
    }

    /// Payout legs for both assets, skipping zero amounts.
    fn payout(
        receiver: AccountId,
        pair: &AssetPair,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Vec<Transfer> {
        [(pair.asset_a().id(), amount_a), (pair.asset_b().id(), amount_b)]
            .into_iter()
            .filter(|(_, amount)| !amount.is_zero())
            .map(|(asset, amount)| Transfer {
                receiver,
                asset,
                amount,
            })
            .collect()
    }

    // -- deposit --------------------------------------------------------------

    /// LP tokens a deposit of native `amount_a` and `amount_b` would mint.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`deposit`](Self::deposit), minus the
    /// caller and collaborator checks.
    pub fn quote_deposit(&self, amount_a: Amount, amount_b: Amount) -> Result<Amount> {
        let (_, lp) = self.plan_deposit(amount_a, amount_b)?;
        Ok(lp)
    }

    fn plan_deposit(
        &self,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<(LiquidityLedger, Amount)> {
        if amount_a.is_zero() && amount_b.is_zero() {
            return Err(ClammError::ZeroOutput("nothing deposited"));
        }
        let pair = self.pair();
        let base_a = pair.asset_a().to_base(amount_a)?;
        let base_b = pair.asset_b().to_base(amount_b)?;
        let mut ledger = self.ledger.clone();
        let transition =
            ledger.apply_reserve_delta(ReserveDelta::Credit(base_a), ReserveDelta::Credit(base_b))?;
        let lp = scale::base_to_lp(transition.growth().get());
        if lp.is_zero() {
            return Err(ClammError::ZeroOutput("deposit mints no LP tokens"));
        }
        Ok((ledger, lp))
    }

    /// Adds native `amount_a` and `amount_b` to the reserves and sends the
    /// minted LP tokens to the caller.
    ///
    /// The assets must already be held by the pool (see
    /// [`AssetTransfer::balance_of`]). Any ratio is accepted; the resulting
    /// price shift is borne by the depositor and reported in the receipt.
    ///
    /// # Errors
    ///
    /// - Collaborator, pause and identity errors (see the module docs).
    /// - [`ClammError::ZeroOutput`] if nothing is deposited or no LP token
    ///   would be minted.
    /// - [`ClammError::SlippageExceeded`] if fewer than a non-zero
    ///   `min_lp_out` tokens would be minted.
    /// - [`ClammError::BalanceMismatch`] if the pool does not hold the
    ///   deposited assets.
    /// - [`ClammError::LiquidityDropExceeded`] from the ledger.
    pub fn deposit(
        &mut self,
        ctx: &mut PoolContext<'_>,
        amount_a: Amount,
        amount_b: Amount,
        min_lp_out: Amount,
    ) -> Result<DepositReceipt> {
        self.check_identity(ctx)?;
        let liquidity_before = self.ledger.liquidity();
        let (ledger, lp) = self.plan_deposit(amount_a, amount_b)?;
        if !min_lp_out.is_zero() && lp < min_lp_out {
            return Err(ClammError::SlippageExceeded {
                minimum: min_lp_out.get(),
                actual: lp.get(),
            });
        }
        let lp_outstanding = self
            .lp_outstanding
            .checked_add(&lp)
            .filter(|total| total.get() <= LP_TOTAL_SUPPLY)
            .ok_or(ClammError::InsufficientReserve("LP token supply exhausted"))?;
        self.ensure_backed(&ledger, &*ctx.transfer, Amount::ZERO, Amount::ZERO)?;
        let price = self.price_of(&ledger)?;

        ctx.transfer.send(&ctx.caller, self.config.lp_asset(), lp)?;

        let liquidity_after = ledger.liquidity();
        self.ledger = ledger;
        self.lp_outstanding = lp_outstanding;
        self.current_price = price;
        info!(
            pool = %self.id(),
            %amount_a,
            %amount_b,
            lp = lp.get(),
            liquidity = liquidity_after.get(),
            "deposit"
        );
        Ok(DepositReceipt {
            lp_minted: lp,
            liquidity_before,
            liquidity_after,
            price,
        })
    }

    // -- withdraw -------------------------------------------------------------

    /// Native amounts of A and B burning `lp_amount` LP tokens would pay.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`withdraw`](Self::withdraw), minus the
    /// caller and collaborator checks.
    pub fn quote_withdraw(&self, lp_amount: Amount) -> Result<(Amount, Amount)> {
        let (_, withdrawal, _) = self.plan_withdraw(lp_amount)?;
        Ok((withdrawal.native_a, withdrawal.native_b))
    }

    fn plan_withdraw(&self, lp_amount: Amount) -> Result<(LiquidityLedger, Withdrawal, Liquidity)> {
        if lp_amount.is_zero() {
            return Err(ClammError::ZeroOutput("no LP tokens burned"));
        }
        if lp_amount > self.lp_outstanding {
            return Err(ClammError::InsufficientReserve(
                "more LP tokens burned than outstanding",
            ));
        }
        let lp_base = scale::lp_to_base(lp_amount)?;
        let issued_base = scale::lp_to_base(self.lp_outstanding)?;
        let users_fees = self.ledger.liquidity_users_from_fees();
        let fee_share = Liquidity::new(share_of(users_fees.get(), lp_base, issued_base)?);
        let gross = lp_base
            .checked_add(fee_share.get())
            .ok_or(ClammError::Overflow("withdrawn liquidity"))?;
        let withdrawal = self.ledger.withdrawal_for(gross)?;
        if withdrawal.is_empty() {
            return Err(ClammError::ZeroOutput("withdrawal pays out nothing"));
        }
        let mut ledger = self.ledger.clone();
        ledger.apply_withdrawal(withdrawal.base_a, withdrawal.base_b)?;
        ledger.claim_user_fees(fee_share)?;
        Ok((ledger, withdrawal, fee_share))
    }

    /// Burns `lp_amount` LP tokens (already returned to the pool) and sends
    /// the caller their share of both reserves, including their pro-rata
    /// share of provider fee liquidity.
    ///
    /// # Errors
    ///
    /// - Collaborator, pause and identity errors (see the module docs).
    /// - [`ClammError::ZeroOutput`] if `lp_amount` is zero or both payouts
    ///   round to zero.
    /// - [`ClammError::InsufficientReserve`] if `lp_amount` exceeds the
    ///   outstanding supply.
    /// - [`ClammError::LiquidityIncreased`] from the ledger.
    pub fn withdraw(
        &mut self,
        ctx: &mut PoolContext<'_>,
        lp_amount: Amount,
    ) -> Result<WithdrawReceipt> {
        self.check_identity(ctx)?;
        let (ledger, withdrawal, fee_share) = self.plan_withdraw(lp_amount)?;
        let lp_outstanding = self
            .lp_outstanding
            .checked_sub(&lp_amount)
            .ok_or(ClammError::Underflow("outstanding LP supply"))?;
        self.ensure_backed(
            &ledger,
            &*ctx.transfer,
            withdrawal.native_a,
            withdrawal.native_b,
        )?;
        let price = self.price_of(&ledger)?;

        let legs = Self::payout(ctx.caller, self.pair(), withdrawal.native_a, withdrawal.native_b);
        ctx.transfer.send_all(&legs)?;

        self.ledger = ledger;
        self.lp_outstanding = lp_outstanding;
        self.current_price = price;
        info!(
            pool = %self.id(),
            lp = lp_amount.get(),
            sent_a = %withdrawal.native_a,
            sent_b = %withdrawal.native_b,
            fee_share = fee_share.get(),
            "withdraw"
        );
        Ok(WithdrawReceipt {
            lp_burned: lp_amount,
            sent_a: withdrawal.native_a,
            sent_b: withdrawal.native_b,
            fee_share,
            price,
        })
    }

    // -- swap -----------------------------------------------------------------

    fn plan_swap(
        &self,
        input_asset: AssetId,
        amount: Amount,
        fee_fraction: u128,
    ) -> Result<SwapPlan> {
        let pair = self.pair();
        let input_side = pair.side_of(input_asset)?;
        let output = pair.asset(input_side.opposite());
        let in_base = pair.asset(input_side).to_base(amount)?;
        if in_base.is_zero() {
            return Err(ClammError::ZeroOutput("nothing swapped in"));
        }
        let after_fee = apply_fraction(SCALE - fee_fraction, in_base, Rounding::Down)?;
        let fee_base = in_base
            .checked_sub(&after_fee)
            .ok_or(ClammError::Underflow("swap fee"))?;
        let (x, y) = (self.ledger.reserve_a(), self.ledger.reserve_b());
        let range = self.config.range();
        let liquidity = self.ledger.liquidity();
        let out = match input_side {
            Side::A => curve::swap_output_for_a_deposit(after_fee, x, y, range, liquidity)?,
            Side::B => curve::swap_output_for_b_deposit(after_fee, x, y, range, liquidity)?,
        };
        let (out_native, out_base) = scale::round_down_to_native(out, output.decimals());
        if out_native.is_zero() {
            return Err(ClammError::ZeroOutput("swap pays out nothing"));
        }
        Ok(SwapPlan {
            input_side,
            in_base,
            fee_base,
            out_native,
            out_base,
        })
    }

    fn fee_fraction(&self, identity: &IdentityInfo) -> Result<u128> {
        self.config
            .fee_rate()
            .effective(identity.fee_multiplier, identity.fee_multiplier_base)
    }

    /// Native output a swap of `amount` of `input_asset` would pay a caller
    /// with `identity`.
    ///
    /// # Errors
    ///
    /// Same validation errors as [`swap`](Self::swap), minus the caller and
    /// collaborator checks.
    pub fn quote_swap(
        &self,
        input_asset: AssetId,
        amount: Amount,
        identity: &IdentityInfo,
    ) -> Result<Amount> {
        let plan = self.plan_swap(input_asset, amount, self.fee_fraction(identity)?)?;
        debug!(pool = %self.id(), %amount, out = %plan.out_native, "swap quote");
        Ok(plan.out_native)
    }

    /// Swaps native `amount` of `input_asset` (already held by the pool)
    /// for the other asset.
    ///
    /// The fee (the pool rate scaled by the caller's fee multiplier) stays
    /// in the reserves; the liquidity it adds is split between providers
    /// and the protocol.
    ///
    /// # Errors
    ///
    /// - Collaborator, pause and identity errors (see the module docs).
    /// - [`ClammError::InvalidAsset`] if `input_asset` is not in the pool.
    /// - [`ClammError::ZeroOutput`] if the input or the output is zero.
    /// - [`ClammError::SlippageExceeded`] if the output is below a non-zero
    ///   `min_output`.
    /// - [`ClammError::InsufficientReserve`] if the output reserve cannot
    ///   cover the trade.
    /// - Errors reported by the stats sink or the transfer executor.
    pub fn swap(
        &mut self,
        ctx: &mut PoolContext<'_>,
        input_asset: AssetId,
        amount: Amount,
        min_output: Amount,
    ) -> Result<SwapReceipt> {
        let identity = self.check_identity(ctx)?;
        let plan = self.plan_swap(input_asset, amount, self.fee_fraction(&identity)?)?;
        if !min_output.is_zero() && plan.out_native < min_output {
            return Err(ClammError::SlippageExceeded {
                minimum: min_output.get(),
                actual: plan.out_native.get(),
            });
        }

        let (delta_a, delta_b, out_a, out_b) = match plan.input_side {
            Side::A => (
                ReserveDelta::Credit(plan.in_base),
                ReserveDelta::Debit(plan.out_base),
                Amount::ZERO,
                plan.out_native,
            ),
            Side::B => (
                ReserveDelta::Debit(plan.out_base),
                ReserveDelta::Credit(plan.in_base),
                plan.out_native,
                Amount::ZERO,
            ),
        };
        let mut ledger = self.ledger.clone();
        let transition = ledger.apply_reserve_delta(delta_a, delta_b)?;
        let fee_liquidity =
            ledger.accrue_fee_liquidity(transition.growth(), ctx.config.protocol_fee_fraction())?;
        self.ensure_backed(&ledger, &*ctx.transfer, out_a, out_b)?;
        let price_before = self.current_price;
        let price_after = self.price_of(&ledger)?;

        let pair = *self.pair();
        let input = pair.asset(plan.input_side);
        let fee_native = input.from_base(plan.fee_base);
        let (amount_a, amount_b, fee_a, fee_b) = match plan.input_side {
            Side::A => (amount, plan.out_native, fee_native, Amount::ZERO),
            Side::B => (plan.out_native, amount, Amount::ZERO, fee_native),
        };
        let event = TradeEvent {
            pool: self.id(),
            trader: ctx.caller,
            asset_a: pair.asset_a().id(),
            asset_b: pair.asset_b().id(),
            price_before,
            price_after,
            amount_a,
            amount_b,
            fee_a,
            fee_b,
        };
        ctx.stats.record(&event)?;
        let output = pair.asset(plan.input_side.opposite());
        if let Err(e) = ctx.transfer.send(&ctx.caller, output.id(), plan.out_native) {
            if let Err(retract) = ctx.stats.retract(&event) {
                warn!(pool = %self.id(), error = %retract, "trade record not retracted");
            }
            return Err(e);
        }

        self.ledger = ledger;
        self.current_price = price_after;
        let receipt = SwapReceipt {
            input_side: plan.input_side,
            amount_in: amount,
            amount_out: plan.out_native,
            fee: fee_native,
            price_before,
            price_after,
            fee_liquidity,
        };
        info!(pool = %self.id(), %receipt, "swap");
        Ok(receipt)
    }

    // -- administration -------------------------------------------------------

    /// Folds assets held beyond the recorded reserves into liquidity. The
    /// liquidity gained is split like trading fees.
    ///
    /// # Errors
    ///
    /// - [`ClammError::Unauthorized`] unless called by the fee executor.
    /// - [`ClammError::ZeroOutput`] if both amounts are zero.
    /// - [`ClammError::BalanceMismatch`] if the pool does not hold the
    ///   excess.
    pub fn distribute_excess_assets(
        &mut self,
        ctx: &mut PoolContext<'_>,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<FeeSplit> {
        self.check_fee_executor(ctx)?;
        if amount_a.is_zero() && amount_b.is_zero() {
            return Err(ClammError::ZeroOutput("nothing to distribute"));
        }
        let pair = self.pair();
        let base_a = pair.asset_a().to_base(amount_a)?;
        let base_b = pair.asset_b().to_base(amount_b)?;
        let mut ledger = self.ledger.clone();
        let transition =
            ledger.apply_reserve_delta(ReserveDelta::Credit(base_a), ReserveDelta::Credit(base_b))?;
        let split =
            ledger.accrue_fee_liquidity(transition.growth(), ctx.config.protocol_fee_fraction())?;
        self.ensure_backed(&ledger, &*ctx.transfer, Amount::ZERO, Amount::ZERO)?;
        let price = self.price_of(&ledger)?;

        self.ledger = ledger;
        self.current_price = price;
        info!(
            pool = %self.id(),
            %amount_a,
            %amount_b,
            users = split.users.get(),
            protocol = split.protocol.get(),
            "excess assets distributed"
        );
        Ok(split)
    }

    /// Sends assets held beyond the recorded reserves to the fee executor
    /// without touching liquidity.
    ///
    /// # Errors
    ///
    /// - [`ClammError::Unauthorized`] unless called by the fee executor.
    /// - [`ClammError::ZeroOutput`] if both amounts are zero.
    /// - [`ClammError::BalanceMismatch`] if the withdrawal would dig into
    ///   the recorded reserves.
    pub fn withdraw_excess_assets(
        &mut self,
        ctx: &mut PoolContext<'_>,
        amount_a: Amount,
        amount_b: Amount,
    ) -> Result<(Amount, Amount)> {
        self.check_fee_executor(ctx)?;
        if amount_a.is_zero() && amount_b.is_zero() {
            return Err(ClammError::ZeroOutput("nothing to withdraw"));
        }
        self.ensure_backed(&self.ledger, &*ctx.transfer, amount_a, amount_b)?;
        let legs = Self::payout(ctx.caller, self.pair(), amount_a, amount_b);
        ctx.transfer.send_all(&legs)?;
        info!(pool = %self.id(), %amount_a, %amount_b, "excess assets withdrawn");
        Ok((amount_a, amount_b))
    }

    /// Withdraws protocol fee liquidity (`0` = all of it) and sends the
    /// released reserves to the fee executor.
    ///
    /// Returns the liquidity skimmed and the native amounts sent.
    ///
    /// # Errors
    ///
    /// - [`ClammError::Unauthorized`] unless called by the fee executor.
    /// - [`ClammError::InsufficientReserve`] if `amount` exceeds the
    ///   protocol balance.
    /// - [`ClammError::ZeroOutput`] if nothing would be paid out.
    pub fn skim_protocol_fees(
        &mut self,
        ctx: &mut PoolContext<'_>,
        amount: Liquidity,
    ) -> Result<(Liquidity, Amount, Amount)> {
        self.check_fee_executor(ctx)?;
        let mut ledger = self.ledger.clone();
        let (taken, withdrawal) = ledger.skim_protocol_fees(amount)?;
        self.ensure_backed(
            &ledger,
            &*ctx.transfer,
            withdrawal.native_a,
            withdrawal.native_b,
        )?;
        let price = self.price_of(&ledger)?;

        let legs = Self::payout(ctx.caller, self.pair(), withdrawal.native_a, withdrawal.native_b);
        ctx.transfer.send_all(&legs)?;

        self.ledger = ledger;
        self.current_price = price;
        info!(
            pool = %self.id(),
            liquidity = taken.get(),
            sent_a = %withdrawal.native_a,
            sent_b = %withdrawal.native_b,
            "protocol fees skimmed"
        );
        Ok((taken, withdrawal.native_a, withdrawal.native_b))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Asset, Decimals, PriceRange, ServiceId};
    use crate::testing::SimulatedServices;

    // -- helpers --------------------------------------------------------------

    const A: AssetId = AssetId::new(1);
    const B: AssetId = AssetId::new(2);
    const LP: AssetId = AssetId::new(100);

    fn provider() -> AccountId {
        AccountId::from_bytes([1u8; 32])
    }

    fn trader() -> AccountId {
        AccountId::from_bytes([2u8; 32])
    }

    fn executor() -> AccountId {
        AccountId::from_bytes([9u8; 32])
    }

    fn services() -> SimulatedServices {
        let mut s = SimulatedServices::new(executor());
        s.transfer.receive(LP, Amount::new(LP_TOTAL_SUPPLY));
        s
    }

    fn config(s: &SimulatedServices, min: u128, max: u128, decimals: u8, fee: u128) -> PoolConfig {
        let Ok(d) = Decimals::new(decimals) else {
            panic!("valid decimals");
        };
        let Ok(pair) = AssetPair::new(Asset::new(A, d), Asset::new(B, d)) else {
            panic!("valid pair");
        };
        let Ok(range) = PriceRange::new(Price::new(min), Price::new(max)) else {
            panic!("valid range");
        };
        let Ok(fee) = FeeRate::new(fee) else {
            panic!("valid fee");
        };
        let Ok(cfg) = PoolConfig::new(PoolId::new(1), pair, LP, range, fee, s.bindings()) else {
            panic!("valid config");
        };
        cfg
    }

    fn pool(cfg: &PoolConfig) -> ClammPool {
        let Ok(p) = ClammPool::from_config(cfg) else {
            panic!("bootstrap");
        };
        p
    }

    /// 0.8 – 1.25, 6-decimal assets, 0.3% fee.
    fn ranged(s: &SimulatedServices) -> ClammPool {
        pool(&config(s, 800_000_000, 1_250_000_000, 6, 3_000_000))
    }

    fn flat(s: &SimulatedServices) -> ClammPool {
        pool(&config(s, SCALE, SCALE, 9, 0))
    }

    fn deposit(
        p: &mut ClammPool,
        s: &mut SimulatedServices,
        a: u128,
        b: u128,
    ) -> Result<DepositReceipt> {
        s.transfer.receive(A, Amount::new(a));
        s.transfer.receive(B, Amount::new(b));
        let mut ctx = s.context(provider());
        p.deposit(&mut ctx, Amount::new(a), Amount::new(b), Amount::ZERO)
    }

    fn swap(
        p: &mut ClammPool,
        s: &mut SimulatedServices,
        asset: AssetId,
        amount: u128,
        min: u128,
    ) -> Result<SwapReceipt> {
        s.transfer.receive(asset, Amount::new(amount));
        let mut ctx = s.context(trader());
        p.swap(&mut ctx, asset, Amount::new(amount), Amount::new(min))
    }

    fn funded(s: &mut SimulatedServices) -> (ClammPool, Amount) {
        let mut p = ranged(s);
        let Ok(r) = deposit(&mut p, s, 1_000_000_000, 1_000_000_000) else {
            panic!("deposit");
        };
        (p, r.lp_minted)
    }

    // -- bootstrap ------------------------------------------------------------

    #[test]
    fn bootstrap_state() {
        let s = services();
        let p = ranged(&s);
        assert_eq!(p.id(), PoolId::new(1));
        assert_eq!(p.current_price(), Price::new(800_000_000));
        assert_eq!(p.ledger().liquidity(), Liquidity::ZERO);
        assert_eq!(p.lp_outstanding(), Amount::ZERO);
        assert_eq!(p.ledger().allowed_drop(), 1_002_000);
    }

    // -- deposit --------------------------------------------------------------

    #[test]
    fn flat_deposit_scenario() {
        let mut s = services();
        let mut p = flat(&s);
        let Ok(r) = deposit(&mut p, &mut s, 1_000, 1_000) else {
            panic!("deposit");
        };
        assert_eq!(r.liquidity_after, Liquidity::new(2_000));
        assert_eq!(r.lp_minted, Amount::new(2));
        assert_eq!(r.price, Price::ONE);
        assert_eq!(s.transfer.total_sent(&provider(), LP), Amount::new(2));
    }

    #[test]
    fn dust_deposit_rejected() {
        let mut s = services();
        let mut p = flat(&s);
        let snapshot = p.clone();
        let Err(e) = deposit(&mut p, &mut s, 1, 0) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::ZeroOutput(_)));
        assert_eq!(p, snapshot);
        assert!(s.transfer.sent.is_empty());
    }

    #[test]
    fn balanced_deposit() {
        let mut s = services();
        let (p, lp) = funded(&mut s);
        assert_eq!(lp, Amount::new(9_472_135_937));
        assert_eq!(p.lp_outstanding(), lp);
        assert_eq!(p.ledger().reserve_a(), Amount::new(1_000_000_000_000));
        assert!(p.current_price().get().abs_diff(SCALE) <= 2);
    }

    #[test]
    fn single_asset_deposit_sits_at_lower_bound() {
        let mut s = services();
        let mut p = ranged(&s);
        let Ok(r) = deposit(&mut p, &mut s, 20_000, 0) else {
            panic!("deposit");
        };
        assert_eq!(r.lp_minted, Amount::new(89_442));
        assert!(r.price.get().abs_diff(800_000_000) <= 5);
    }

    #[test]
    fn deposit_requires_received_assets() {
        let mut s = services();
        let mut p = ranged(&s);
        let mut ctx = s.context(provider());
        let Err(e) = p.deposit(&mut ctx, Amount::new(1_000), Amount::new(1_000), Amount::ZERO)
        else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::BalanceMismatch(_)));
    }

    #[test]
    fn deposit_min_lp_guard() {
        let mut s = services();
        let mut p = ranged(&s);
        s.transfer.receive(A, Amount::new(20_000));
        let mut ctx = s.context(provider());
        let Err(e) = p.deposit(&mut ctx, Amount::new(20_000), Amount::ZERO, Amount::new(89_443))
        else {
            panic!("expected Err");
        };
        assert_eq!(
            e,
            ClammError::SlippageExceeded {
                minimum: 89_443,
                actual: 89_442
            }
        );
    }

    #[test]
    fn quote_deposit_matches() {
        let mut s = services();
        let mut p = ranged(&s);
        let Ok(quoted) = p.quote_deposit(Amount::new(20_000), Amount::ZERO) else {
            panic!("quote");
        };
        let Ok(r) = deposit(&mut p, &mut s, 20_000, 0) else {
            panic!("deposit");
        };
        assert_eq!(quoted, r.lp_minted);
    }

    // -- swap -----------------------------------------------------------------

    #[test]
    fn swap_a_for_b() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let before = p.ledger().liquidity();
        let Ok(r) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("swap");
        };
        assert_eq!(r.input_side, Side::A);
        assert_eq!(r.amount_out, Amount::new(9_959_516));
        assert_eq!(r.fee, Amount::new(30_000));
        assert!(r.price_after < r.price_before);
        assert_eq!(r.fee_liquidity.total(), 141_937_875);
        assert_eq!(p.ledger().liquidity().get(), before.get() + 141_937_875);
        assert_eq!(p.ledger().liquidity_users_from_fees().get(), 141_937_875);
        assert_eq!(s.transfer.total_sent(&trader(), B), Amount::new(9_959_516));

        let [event] = s.stats.events.as_slice() else {
            panic!("one trade recorded");
        };
        assert_eq!(event.amount_a, Amount::new(10_000_000));
        assert_eq!(event.amount_b, Amount::new(9_959_516));
        assert_eq!(event.fee_a, Amount::new(30_000));
        assert_eq!(event.fee_b, Amount::ZERO);
        assert_eq!(event.trader, trader());
    }

    #[test]
    fn round_trip_swaps_grow_liquidity() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let before = p.ledger().liquidity();
        let Ok(_) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("swap a");
        };
        let Ok(r) = swap(&mut p, &mut s, B, 10_000_000, 0) else {
            panic!("swap b");
        };
        assert_eq!(r.input_side, Side::B);
        assert!(p.ledger().liquidity() > before);
        assert!(p.current_price().get().abs_diff(SCALE) < 10_000);
    }

    #[test]
    fn protocol_share_of_swap_fee() {
        let mut s = services();
        s.config.protocol_fee_fraction = 500_000_000;
        let (mut p, _) = funded(&mut s);
        let Ok(r) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("swap");
        };
        assert_eq!(r.fee_liquidity.users.get(), 141_937_875 / 2);
        assert_eq!(r.fee_liquidity.total(), 141_937_875);
        assert_eq!(p.ledger().liquidity_protocol_from_fees(), r.fee_liquidity.protocol);
    }

    #[test]
    fn fee_multiplier_discount() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let Ok(full) = p.quote_swap(A, Amount::new(10_000_000), &IdentityInfo::default()) else {
            panic!("quote");
        };
        s.identity.set(
            trader(),
            IdentityInfo {
                fee_multiplier: 0,
                ..IdentityInfo::default()
            },
        );
        let Ok(r) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("swap");
        };
        assert_eq!(r.fee, Amount::ZERO);
        assert!(r.amount_out > full);
    }

    #[test]
    fn quote_swap_matches_swap() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let Ok(quoted) = p.quote_swap(B, Amount::new(5_000_000), &IdentityInfo::default()) else {
            panic!("quote");
        };
        let Ok(r) = swap(&mut p, &mut s, B, 5_000_000, 0) else {
            panic!("swap");
        };
        assert_eq!(quoted, r.amount_out);
    }

    #[test]
    fn slippage_guard_leaves_pool_untouched() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let snapshot = p.clone();
        let Err(e) = swap(&mut p, &mut s, A, 10_000_000, 9_959_517) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::SlippageExceeded { .. }));
        assert_eq!(p, snapshot);
        assert!(s.stats.events.is_empty());
    }

    #[test]
    fn unknown_asset_rejected() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let Err(e) = swap(&mut p, &mut s, AssetId::new(77), 1_000, 0) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::InvalidAsset(_)));
    }

    #[test]
    fn zero_swap_rejected() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let Err(e) = swap(&mut p, &mut s, A, 0, 0) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::ZeroOutput(_)));
    }

    #[test]
    fn stats_failure_aborts_swap() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        s.stats.fail = true;
        let snapshot = p.clone();
        let Err(e) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::Collaborator(_)));
        assert_eq!(p, snapshot);
        assert_eq!(s.transfer.total_sent(&trader(), B), Amount::ZERO);
    }

    // -- guards ---------------------------------------------------------------

    #[test]
    fn paused_pool_rejects_operations() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        s.config.paused = true;
        let Err(e) = swap(&mut p, &mut s, A, 1_000, 0) else {
            panic!("expected Err");
        };
        assert_eq!(e, ClammError::ServicesPaused);
        let Err(e) = deposit(&mut p, &mut s, 1_000, 1_000) else {
            panic!("expected Err");
        };
        assert_eq!(e, ClammError::ServicesPaused);
    }

    #[test]
    fn mismatched_collaborator_rejected() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        s.identity.id = ServiceId::new(99);
        let Err(e) = swap(&mut p, &mut s, A, 1_000, 0) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::ConfigMismatch(_)));
    }

    #[test]
    fn locked_identity_rejected() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        s.identity.set(
            trader(),
            IdentityInfo {
                is_locked: true,
                ..IdentityInfo::verified(5)
            },
        );
        let Err(e) = swap(&mut p, &mut s, A, 1_000, 0) else {
            panic!("expected Err");
        };
        assert_eq!(e, ClammError::IdentityLocked);
    }

    #[test]
    fn verification_class_enforced() {
        let mut s = services();
        let cfg = config(&s, 800_000_000, 1_250_000_000, 6, 0).with_verification_class(2);
        let mut p = pool(&cfg);
        s.identity.set(provider(), IdentityInfo::verified(1));
        let Err(e) = deposit(&mut p, &mut s, 1_000, 1_000) else {
            panic!("expected Err");
        };
        assert_eq!(
            e,
            ClammError::InsufficientVerification {
                required: 2,
                actual: 1
            }
        );
        s.identity.set(provider(), IdentityInfo::verified(2));
        assert!(deposit(&mut p, &mut s, 1_000, 1_000).is_ok());
    }

    // -- withdraw -------------------------------------------------------------

    #[test]
    fn full_withdrawal_returns_deposit() {
        let mut s = services();
        let (mut p, lp) = funded(&mut s);
        let mut ctx = s.context(provider());
        let Ok(r) = p.withdraw(&mut ctx, lp) else {
            panic!("withdraw");
        };
        assert!(r.sent_a.get() <= 1_000_000_000 && r.sent_a.get() >= 999_999_998);
        assert!(r.sent_b.get() <= 1_000_000_000 && r.sent_b.get() >= 999_999_998);
        assert_eq!(r.fee_share, Liquidity::ZERO);
        assert_eq!(p.lp_outstanding(), Amount::ZERO);
    }

    #[test]
    fn withdrawal_includes_fee_share() {
        let mut s = services();
        let (mut p, lp) = funded(&mut s);
        let Ok(_) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("swap a");
        };
        let Ok(_) = swap(&mut p, &mut s, B, 10_000_000, 0) else {
            panic!("swap b");
        };
        let fees = p.ledger().liquidity_users_from_fees();
        let Ok((qa, qb)) = p.quote_withdraw(lp) else {
            panic!("quote");
        };
        let mut ctx = s.context(provider());
        let Ok(r) = p.withdraw(&mut ctx, lp) else {
            panic!("withdraw");
        };
        assert_eq!((r.sent_a, r.sent_b), (qa, qb));
        assert_eq!(r.fee_share, fees);
        assert_eq!(r.sent_a, Amount::new(1_000_019_485));
        assert_eq!(r.sent_b, Amount::new(1_000_040_483));
        assert_eq!(p.ledger().liquidity_users_from_fees(), Liquidity::ZERO);
    }

    #[test]
    fn partial_withdrawal_lowers_liquidity() {
        let mut s = services();
        let (mut p, lp) = funded(&mut s);
        let before = p.ledger().liquidity();
        let mut ctx = s.context(provider());
        let Ok(_) = p.withdraw(&mut ctx, Amount::new(lp.get() / 3)) else {
            panic!("withdraw");
        };
        assert!(p.ledger().liquidity() < before);
        assert_eq!(p.lp_outstanding(), Amount::new(lp.get() - lp.get() / 3));
    }

    #[test]
    fn over_withdrawal_rejected() {
        let mut s = services();
        let (mut p, lp) = funded(&mut s);
        let mut ctx = s.context(provider());
        let Err(e) = p.withdraw(&mut ctx, Amount::new(lp.get() + 1)) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::InsufficientReserve(_)));
        let Err(e) = p.withdraw(&mut ctx, Amount::ZERO) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::ZeroOutput(_)));
    }

    #[test]
    fn dust_withdrawal_rejected() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let mut ctx = s.context(provider());
        // One LP unit is 1000 liquidity units, far below one native unit.
        let Err(e) = p.withdraw(&mut ctx, Amount::new(1)) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::ZeroOutput(_)));
    }

    // -- administration -------------------------------------------------------

    #[test]
    fn distribute_excess_requires_executor() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        s.transfer.receive(A, Amount::new(1_000_000));
        let mut ctx = s.context(provider());
        let Err(e) = p.distribute_excess_assets(&mut ctx, Amount::new(1_000_000), Amount::ZERO)
        else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::Unauthorized(_)));
    }

    #[test]
    fn distribute_excess_grows_liquidity() {
        let mut s = services();
        s.config.protocol_fee_fraction = 100_000_000;
        let (mut p, _) = funded(&mut s);
        let before = p.ledger().liquidity();
        s.transfer.receive(A, Amount::new(1_000_000));
        s.transfer.receive(B, Amount::new(1_000_000));
        let mut ctx = s.context(executor());
        let Ok(split) =
            p.distribute_excess_assets(&mut ctx, Amount::new(1_000_000), Amount::new(1_000_000))
        else {
            panic!("distribute");
        };
        let growth = p.ledger().liquidity().get() - before.get();
        assert!(growth > 0);
        assert_eq!(split.total(), growth);
        assert_eq!(split.users.get(), growth * 9 / 10);
    }

    #[test]
    fn distribute_beyond_balance_rejected() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let snapshot = p.clone();
        let mut ctx = s.context(executor());
        let Err(e) = p.distribute_excess_assets(&mut ctx, Amount::new(1), Amount::ZERO) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::BalanceMismatch(_)));
        assert_eq!(p, snapshot);
    }

    #[test]
    fn withdraw_excess_assets() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        s.transfer.receive(B, Amount::new(500));
        let liquidity = p.ledger().liquidity();
        let mut ctx = s.context(executor());
        let Err(e) = p.withdraw_excess_assets(&mut ctx, Amount::ZERO, Amount::new(501)) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::BalanceMismatch(_)));
        let Ok(sent) = p.withdraw_excess_assets(&mut ctx, Amount::ZERO, Amount::new(500)) else {
            panic!("withdraw excess");
        };
        assert_eq!(sent, (Amount::ZERO, Amount::new(500)));
        assert_eq!(p.ledger().liquidity(), liquidity);
        assert_eq!(s.transfer.total_sent(&executor(), B), Amount::new(500));
    }

    #[test]
    fn skim_protocol_fees_to_executor() {
        let mut s = services();
        s.config.protocol_fee_fraction = 500_000_000;
        let (mut p, _) = funded(&mut s);
        let Ok(_) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("swap");
        };
        let owed = p.ledger().liquidity_protocol_from_fees();
        assert!(!owed.is_zero());
        let mut ctx = s.context(executor());
        let Ok((taken, sent_a, sent_b)) = p.skim_protocol_fees(&mut ctx, Liquidity::ZERO) else {
            panic!("skim");
        };
        assert_eq!(taken, owed);
        assert!(sent_a.get() > 0 && sent_b.get() > 0);
        assert_eq!(p.ledger().liquidity_protocol_from_fees(), Liquidity::ZERO);
        assert_eq!(s.transfer.total_sent(&executor(), A), sent_a);
    }

    // -- payout atomicity -----------------------------------------------------

    #[test]
    fn refused_withdrawal_payout_moves_nothing() {
        let mut s = services();
        let (mut p, lp) = funded(&mut s);
        let snapshot = p.clone();
        s.transfer.rejected_asset = Some(B);
        let mut ctx = s.context(provider());
        let Err(e) = p.withdraw(&mut ctx, lp) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::Collaborator(_)));
        assert_eq!(p, snapshot);
        assert_eq!(s.transfer.total_sent(&provider(), A), Amount::ZERO);
        assert_eq!(s.transfer.balance_of(A), Amount::new(1_000_000_000));

        // The pool stays usable once the receiver accepts again.
        s.transfer.rejected_asset = None;
        assert!(deposit(&mut p, &mut s, 1_000, 1_000).is_ok());
        let mut ctx = s.context(provider());
        let Ok(r) = p.withdraw(&mut ctx, lp) else {
            panic!("withdraw");
        };
        assert!(r.sent_a.get() >= 999_999_000);
        assert!(r.sent_b.get() >= 999_999_000);
    }

    #[test]
    fn refused_swap_payout_retracts_trade_record() {
        let mut s = services();
        let (mut p, _) = funded(&mut s);
        let snapshot = p.clone();
        s.transfer.rejected_asset = Some(B);
        let Err(e) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::Collaborator(_)));
        assert_eq!(p, snapshot);
        assert!(s.stats.events.is_empty());
        assert!(s.transfer.sent.iter().all(|(to, _, _)| *to != trader()));

        s.transfer.rejected_asset = None;
        let Ok(r) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("swap");
        };
        assert!(r.amount_out.get() > 0);
        assert_eq!(s.stats.events.len(), 1);
    }

    #[test]
    fn refused_admin_payouts_move_nothing() {
        let mut s = services();
        s.config.protocol_fee_fraction = 500_000_000;
        let (mut p, _) = funded(&mut s);
        let Ok(_) = swap(&mut p, &mut s, A, 10_000_000, 0) else {
            panic!("swap");
        };
        s.transfer.receive(A, Amount::new(1_000));
        s.transfer.receive(B, Amount::new(1_000));
        let snapshot = p.clone();
        s.transfer.rejected_asset = Some(B);
        let mut ctx = s.context(executor());
        let Err(e) = p.skim_protocol_fees(&mut ctx, Liquidity::ZERO) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::Collaborator(_)));
        let Err(e) = p.withdraw_excess_assets(&mut ctx, Amount::new(300), Amount::new(300)) else {
            panic!("expected Err");
        };
        assert!(matches!(e, ClammError::Collaborator(_)));
        assert_eq!(p, snapshot);
        assert_eq!(s.transfer.total_sent(&executor(), A), Amount::ZERO);
    }

    #[test]
    fn status_snapshot_serializes() {
        let mut s = services();
        let (p, lp) = funded(&mut s);
        let status = p.status();
        assert_eq!(status.lp_outstanding, lp);
        assert_eq!(status.scale_a, 1_000);
        assert_eq!(status.fee_rate.get(), 3_000_000);
        let Ok(json) = serde_json::to_string(&status) else {
            panic!("serialize");
        };
        let Ok(back) = serde_json::from_str::<PoolStatus>(&json) else {
            panic!("deserialize");
        };
        assert_eq!(back, status);
    }
}
