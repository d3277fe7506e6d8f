#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{contracttype, symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the engine is bootstrapped.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub stake_token: Address,
    pub time_multiplier: Address,
    pub achievements_oracle: Address,
    pub max_multiplier: i128,
    pub cooldown_seconds: u64,
    pub unstake_window: u64,
    pub timestamp: u64,
}

/// Fired when principal is added to an account.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub account: Address,
    pub funder: Address,
    pub amount: i128,
    pub raw: i128,
    pub scaled: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CooldownStartedEvent {
    pub account: Address,
    pub units: i128,
    pub timestamp: u64,
}

/// Why a cooldown ended.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CooldownExit {
    /// `exit_cooldown` was called.
    Voluntary,
    /// A stake arrived after the unstake window closed.
    Expired,
    /// A withdrawal consumed or released the earmark.
    Withdrawn,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CooldownExitedEvent {
    pub account: Address,
    pub reason: CooldownExit,
    /// Earmarked units returned to active stake.
    pub released_units: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub account: Address,
    pub recipient: Address,
    pub amount: i128,
    pub immediate: bool,
    pub timestamp: u64,
}

/// Fired only when the delegatee actually changes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegateChangedEvent {
    pub delegator: Address,
    pub from_delegatee: Address,
    pub to_delegatee: Address,
    pub timestamp: u64,
}

/// Fired on every scaled-balance movement, zero included.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegateVotesChangedEvent {
    pub delegatee: Address,
    pub previous_votes: i128,
    pub new_votes: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimestampReviewedEvent {
    pub account: Address,
    pub weighted_timestamp: u64,
    pub time_multiplier: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AchievementsAppliedEvent {
    pub account: Address,
    pub multiplier: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StrategySetEvent {
    pub strategy: Address,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaxMultiplierSetEvent {
    pub max_multiplier: i128,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImmediateWithdrawalsSetEvent {
    pub enabled: bool,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn publish_initialized(
    env: &Env,
    admin: Address,
    stake_token: Address,
    time_multiplier: Address,
    achievements_oracle: Address,
    max_multiplier: i128,
    cooldown_seconds: u64,
    unstake_window: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            stake_token,
            time_multiplier,
            achievements_oracle,
            max_multiplier,
            cooldown_seconds,
            unstake_window,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(
    env: &Env,
    account: Address,
    funder: Address,
    amount: i128,
    raw: i128,
    scaled: i128,
) {
    env.events().publish(
        (symbol_short!("STAKED"), account.clone()),
        StakedEvent {
            account,
            funder,
            amount,
            raw,
            scaled,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_cooldown_started(env: &Env, account: Address, units: i128) {
    env.events().publish(
        (symbol_short!("CD_START"), account.clone()),
        CooldownStartedEvent {
            account,
            units,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_cooldown_exited(
    env: &Env,
    account: Address,
    reason: CooldownExit,
    released_units: i128,
) {
    env.events().publish(
        (symbol_short!("CD_EXIT"), account.clone()),
        CooldownExitedEvent {
            account,
            reason,
            released_units,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_withdrawn(
    env: &Env,
    account: Address,
    recipient: Address,
    amount: i128,
    immediate: bool,
) {
    env.events().publish(
        (symbol_short!("WITHDRAWN"), account.clone()),
        WithdrawnEvent {
            account,
            recipient,
            amount,
            immediate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_delegate_changed(
    env: &Env,
    delegator: Address,
    from_delegatee: Address,
    to_delegatee: Address,
) {
    env.events().publish(
        (symbol_short!("DEL_CHG"), delegator.clone()),
        DelegateChangedEvent {
            delegator,
            from_delegatee,
            to_delegatee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_delegate_votes_changed(
    env: &Env,
    delegatee: Address,
    previous_votes: i128,
    new_votes: i128,
) {
    env.events().publish(
        (symbol_short!("DEL_VOTES"), delegatee.clone()),
        DelegateVotesChangedEvent {
            delegatee,
            previous_votes,
            new_votes,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_timestamp_reviewed(
    env: &Env,
    account: Address,
    weighted_timestamp: u64,
    time_multiplier: i128,
) {
    env.events().publish(
        (symbol_short!("TS_REVIEW"), account.clone()),
        TimestampReviewedEvent {
            account,
            weighted_timestamp,
            time_multiplier,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_achievements_applied(env: &Env, account: Address, multiplier: i128) {
    env.events().publish(
        (symbol_short!("ACH_SET"), account.clone()),
        AchievementsAppliedEvent {
            account,
            multiplier,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_time_multiplier_set(env: &Env, strategy: Address) {
    env.events().publish(
        (symbol_short!("STRAT_SET"),),
        StrategySetEvent {
            strategy,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_achievements_oracle_set(env: &Env, oracle: Address) {
    env.events().publish(
        (symbol_short!("ORCL_SET"),),
        StrategySetEvent {
            strategy: oracle,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_max_multiplier_set(env: &Env, max_multiplier: i128) {
    env.events().publish(
        (symbol_short!("MAX_MULT"),),
        MaxMultiplierSetEvent {
            max_multiplier,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_immediate_withdrawals_set(env: &Env, enabled: bool) {
    env.events().publish(
        (symbol_short!("IMMED_SET"),),
        ImmediateWithdrawalsSetEvent {
            enabled,
            timestamp: env.ledger().timestamp(),
        },
    );
}
