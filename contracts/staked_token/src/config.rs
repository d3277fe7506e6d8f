use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

const CONFIG: Symbol = symbol_short!("CONFIG");

const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Three weeks.
pub const DEFAULT_COOLDOWN_SECONDS: u64 = 21 * 86_400;
/// Two weeks.
pub const DEFAULT_UNSTAKE_WINDOW: u64 = 14 * 86_400;

/// Engine-wide settings; written by `initialize` and the guarded setters.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingConfig {
    /// Token accepted by `stake` and paid out by `withdraw`.
    pub stake_token: Address,
    /// Current time-multiplier strategy contract.
    pub time_multiplier: Address,
    /// Current achievements oracle contract.
    pub achievements_oracle: Address,
    /// Ceiling on the combined multiplier, in `MULTIPLIER_DENOMINATOR` units.
    pub max_multiplier: i128,
    pub cooldown_seconds: u64,
    pub unstake_window: u64,
    /// Emergency switch letting `withdraw(.., immediate = true)` skip the window.
    pub immediate_withdrawals: bool,
}

pub(crate) fn is_set(env: &Env) -> bool {
    env.storage().instance().has(&CONFIG)
}

pub(crate) fn load(env: &Env) -> Result<StakingConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub(crate) fn save(env: &Env, config: &StakingConfig) {
    env.storage().instance().set(&CONFIG, config);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// A usable ceiling must be positive.
pub(crate) fn validate_max_multiplier(max_multiplier: i128) -> Result<(), ContractError> {
    if max_multiplier <= 0 {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}
