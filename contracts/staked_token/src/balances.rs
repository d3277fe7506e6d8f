use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ── Storage key prefixes ─────────────────────────────────────────────────────

const BALANCE: Symbol = symbol_short!("BAL");

// ~60 days / ~120 days of ledgers
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

// ── Types ────────────────────────────────────────────────────────────────────

/// Per-account staking position.
///
/// `cooldown_units` is an earmark inside `raw`, never on top of it.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BalanceRecord {
    /// Staked principal, withdrawals already deducted.
    pub raw: i128,
    /// Blended stake start used to look up the time multiplier.
    pub weighted_timestamp: u64,
    /// Last value returned by the time-multiplier strategy.
    pub time_multiplier: i128,
    /// Bonus (positive) or penalty (negative) from achievements.
    pub achievements_multiplier: i128,
    /// Start of the current cooldown, `0` when none is running.
    pub cooldown_timestamp: u64,
    /// Principal earmarked for withdrawal.
    pub cooldown_units: i128,
}

impl BalanceRecord {
    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_timestamp != 0
    }

    /// Drop the cooldown earmark; the units stay in `raw`.
    pub fn release_cooldown(&mut self) {
        self.cooldown_timestamp = 0;
        self.cooldown_units = 0;
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn balance_key(account: &Address) -> (Symbol, Address) {
    (BALANCE, account.clone())
}

/// Stored record, or the idle zero record for unseen accounts.
pub(crate) fn load(env: &Env, account: &Address) -> BalanceRecord {
    env.storage()
        .persistent()
        .get(&balance_key(account))
        .unwrap_or_default()
}

pub(crate) fn store(env: &Env, account: &Address, record: &BalanceRecord) {
    let key = balance_key(account);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
