//! Multiplier engine.
//!
//! Combines the cached time multiplier with the achievements multiplier,
//! floors at zero, clamps to the configured maximum and turns raw principal
//! into the scaled balance used for voting and rewards. Both multipliers come
//! from pluggable contracts reached through the client traits below.

use soroban_sdk::{contractclient, Address, Env};

use crate::balances::BalanceRecord;
use crate::config::StakingConfig;
use crate::ContractError;

/// Fixed-point denominator shared by every multiplier (`1.0 == 10^12`).
pub const MULTIPLIER_DENOMINATOR: i128 = 1_000_000_000_000;

/// Ceiling used when none is configured: 5×.
pub const DEFAULT_MAX_MULTIPLIER: i128 = 5 * MULTIPLIER_DENOMINATOR;

// ── Collaborator seams ───────────────────────────────────────────────────────

/// Strategy mapping a weighted stake timestamp to a time multiplier.
#[contractclient(name = "TimeMultiplierClient")]
pub trait TimeMultiplier {
    fn calculate(env: Env, weighted_timestamp: u64) -> i128;
}

/// Oracle owning achievement seasons; returns the account's current
/// achievements multiplier, closing a finished season on the way.
#[contractclient(name = "AchievementsOracleClient")]
pub trait AchievementsOracle {
    fn check_for_season_finish(env: Env, account: Address) -> i128;
}

/// Whether a time-multiplier refresh may write back the value already cached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RefreshPolicy {
    /// Balance-changing and cooldown paths: refresh unconditionally.
    AllowUnchanged,
    /// Explicit pokes: fail when the strategy has nothing new to say.
    RequireChange,
}

// ── Pure math ────────────────────────────────────────────────────────────────

/// Multiplier actually applied to raw principal: `0` when the combined
/// multiplier is not positive, otherwise `min(combined, max_multiplier)`.
pub fn effective_multiplier(
    time_multiplier: i128,
    achievements_multiplier: i128,
    max_multiplier: i128,
) -> i128 {
    let combined = time_multiplier.saturating_add(achievements_multiplier);
    if combined <= 0 {
        return 0;
    }
    combined.min(max_multiplier.max(0))
}

/// `raw * effective / MULTIPLIER_DENOMINATOR` without wrapping.
///
/// Both factors are split around the denominator, so every partial product
/// is bounded by the final result. The value is exact whenever it fits in an
/// `i128` and saturates only when it does not.
pub fn scaled_balance(
    raw: i128,
    time_multiplier: i128,
    achievements_multiplier: i128,
    max_multiplier: i128,
) -> i128 {
    if raw <= 0 {
        return 0;
    }
    let multiplier = effective_multiplier(time_multiplier, achievements_multiplier, max_multiplier);
    if multiplier == 0 {
        return 0;
    }

    // raw = a·D + b, multiplier = c·D + d, with b, d < D:
    // raw·multiplier / D = a·c·D + a·d + b·c + ⌊b·d / D⌋
    let (a, b) = (raw / MULTIPLIER_DENOMINATOR, raw % MULTIPLIER_DENOMINATOR);
    let (c, d) = (
        multiplier / MULTIPLIER_DENOMINATOR,
        multiplier % MULTIPLIER_DENOMINATOR,
    );
    a.saturating_mul(c)
        .saturating_mul(MULTIPLIER_DENOMINATOR)
        .saturating_add(a.saturating_mul(d))
        .saturating_add(b.saturating_mul(c))
        .saturating_add(b * d / MULTIPLIER_DENOMINATOR)
}

/// Scaled balance of a stored record under `max_multiplier`.
pub fn scaled_of(record: &BalanceRecord, max_multiplier: i128) -> i128 {
    scaled_balance(
        record.raw,
        record.time_multiplier,
        record.achievements_multiplier,
        max_multiplier,
    )
}

// ── Refresh ──────────────────────────────────────────────────────────────────

/// Ask the configured strategy for the multiplier at the record's stored
/// weighted timestamp and cache it on the record.
pub fn refresh_time_multiplier(
    env: &Env,
    config: &StakingConfig,
    record: &mut BalanceRecord,
    policy: RefreshPolicy,
) -> Result<(), ContractError> {
    let fresh = TimeMultiplierClient::new(env, &config.time_multiplier)
        .calculate(&record.weighted_timestamp);

    if policy == RefreshPolicy::RequireChange && fresh == record.time_multiplier {
        return Err(ContractError::MultiplierUnchanged);
    }
    record.time_multiplier = fresh;
    Ok(())
}

/// Pull the account's achievements multiplier from the oracle. A failing
/// oracle aborts the whole invocation.
pub fn refresh_achievements(
    env: &Env,
    config: &StakingConfig,
    account: &Address,
    record: &mut BalanceRecord,
) {
    record.achievements_multiplier =
        AchievementsOracleClient::new(env, &config.achievements_oracle)
            .check_for_season_finish(account);
}

/// Both refreshes, in the order every mutation path uses.
pub fn refresh_all(
    env: &Env,
    config: &StakingConfig,
    account: &Address,
    record: &mut BalanceRecord,
) -> Result<(), ContractError> {
    refresh_time_multiplier(env, config, record, RefreshPolicy::AllowUnchanged)?;
    refresh_achievements(env, config, account, record);
    Ok(())
}
