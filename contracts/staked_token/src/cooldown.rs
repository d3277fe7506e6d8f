//! Cooldown / unstake-window state machine.
//!
//! ```text
//! Active ──start──▶ Cooldown ──cooldown_seconds──▶ UnstakeWindow ──unstake_window──▶ Expired
//!   ▲                  │                               │                              │
//!   └──── exit / withdraw of the whole earmark ────────┴──── next stake folds back ───┘
//! ```
//!
//! Everything here is pure over a [`BalanceRecord`]; the engine takes care of
//! weighted timestamps, multipliers and votes around these transitions.

use soroban_sdk::contracttype;

use crate::balances::BalanceRecord;
use crate::config::StakingConfig;
use crate::ContractError;

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CooldownState {
    Active,
    Cooldown,
    UnstakeWindow,
    Expired,
}

/// Cooldown timing, copied out of the configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Schedule {
    pub cooldown_seconds: u64,
    pub unstake_window: u64,
}

impl Schedule {
    pub fn from_config(config: &StakingConfig) -> Self {
        Self {
            cooldown_seconds: config.cooldown_seconds,
            unstake_window: config.unstake_window,
        }
    }

    pub fn state(&self, record: &BalanceRecord, now: u64) -> CooldownState {
        if !record.is_cooling_down() {
            return CooldownState::Active;
        }
        let window_opens = record.cooldown_timestamp.saturating_add(self.cooldown_seconds);
        let window_closes = window_opens.saturating_add(self.unstake_window);

        if now < window_opens {
            CooldownState::Cooldown
        } else if now < window_closes {
            CooldownState::UnstakeWindow
        } else {
            CooldownState::Expired
        }
    }
}

/// Result of a successful withdrawal against the earmark.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WithdrawOutcome {
    /// The cooldown ended with this withdrawal.
    pub cooldown_cleared: bool,
    /// Earmarked units handed back to active stake because of `exit_cooldown`.
    pub released_units: i128,
}

/// Earmark `units` of the record's raw balance.
///
/// Re-entering with the amount already earmarked changes nothing and returns
/// `Ok(false)`; a different amount while cooling down is rejected. An
/// expired earmark counts as cooling down here, so callers run
/// [`fold_back_if_expired`] first.
pub fn start(record: &mut BalanceRecord, units: i128, now: u64) -> Result<bool, ContractError> {
    if units <= 0 {
        return Err(ContractError::InvalidInput);
    }
    if units > record.raw {
        return Err(ContractError::InsufficientBalance);
    }
    if record.is_cooling_down() {
        if record.cooldown_units != units {
            return Err(ContractError::CooldownAmountMismatch);
        }
        return Ok(false);
    }

    // 0 marks "no cooldown", so a genesis-time start is recorded one second in.
    record.cooldown_timestamp = now.max(1);
    record.cooldown_units = units;
    Ok(true)
}

/// Voluntary cancel. Returns the units released from the earmark.
pub fn exit(record: &mut BalanceRecord) -> Result<i128, ContractError> {
    if !record.is_cooling_down() {
        return Err(ContractError::NotCoolingDown);
    }
    let released = record.cooldown_units;
    record.release_cooldown();
    Ok(released)
}

/// Auto-exit performed by `stake`: an expired earmark is folded back into
/// active stake. Returns the folded units, if any.
pub fn fold_back_if_expired(
    record: &mut BalanceRecord,
    schedule: &Schedule,
    now: u64,
) -> Option<i128> {
    if schedule.state(record, now) != CooldownState::Expired {
        return None;
    }
    let folded = record.cooldown_units;
    record.release_cooldown();
    Some(folded)
}

/// Take `amount` out of the record.
///
/// Normal withdrawals need the unstake window to be open and stay within the
/// earmark. With `immediate` (only honoured while `immediate_enabled`) the
/// window is skipped and any raw principal may leave; the earmark shrinks
/// by whatever part of it was withdrawn.
pub fn withdraw(
    record: &mut BalanceRecord,
    schedule: &Schedule,
    amount: i128,
    exit_cooldown: bool,
    immediate: bool,
    immediate_enabled: bool,
    now: u64,
) -> Result<WithdrawOutcome, ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidInput);
    }

    let was_cooling = record.is_cooling_down();
    if immediate {
        if !immediate_enabled {
            return Err(ContractError::ImmediateWithdrawDisabled);
        }
        if amount > record.raw {
            return Err(ContractError::InsufficientBalance);
        }
        record.raw -= amount;
        record.cooldown_units -= amount.min(record.cooldown_units);
    } else {
        match schedule.state(record, now) {
            CooldownState::Active => return Err(ContractError::NotCoolingDown),
            CooldownState::Cooldown | CooldownState::Expired => {
                return Err(ContractError::OutsideUnstakeWindow)
            }
            CooldownState::UnstakeWindow => {}
        }
        if amount > record.cooldown_units {
            return Err(ContractError::ExceedsCooldownUnits);
        }
        record.raw -= amount;
        record.cooldown_units -= amount;
    }

    let mut outcome = WithdrawOutcome::default();
    if was_cooling && (exit_cooldown || record.cooldown_units == 0) {
        outcome.cooldown_cleared = true;
        outcome.released_units = record.cooldown_units;
        record.release_cooldown();
    }
    Ok(outcome)
}
