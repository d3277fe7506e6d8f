#![no_std]

pub mod balances;
pub mod checkpoints;
pub mod config;
pub mod cooldown;
pub mod events;
pub mod ledger;
pub mod multiplier;
pub mod weighted;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

use common::admin_tiers::{self, AdminTier};
use soroban_sdk::{contract, contractimpl, token, Address, Env};

pub use balances::BalanceRecord;
pub use checkpoints::Checkpoint;
pub use config::StakingConfig;
pub use cooldown::CooldownState;

use cooldown::Schedule;
use events::CooldownExit;
use ledger::BalanceLedger;
use multiplier::RefreshPolicy;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InsufficientBalance = 5,
    NotCoolingDown = 6,
    CooldownAmountMismatch = 7,
    OutsideUnstakeWindow = 8,
    ExceedsCooldownUnits = 9,
    ImmediateWithdrawDisabled = 10,
    MultiplierUnchanged = 11,
    FutureLookup = 12,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingEngine;

#[contractimpl]
impl StakingEngine {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the engine.
    ///
    /// * `stake_token`         – token accepted by `stake` and paid by `withdraw`.
    /// * `time_multiplier`     – strategy contract implementing `TimeMultiplier`.
    /// * `achievements_oracle` – contract implementing `AchievementsOracle`.
    /// * `cooldown_seconds`    – wait between `start_cooldown` and the unstake window.
    /// * `unstake_window`      – how long withdrawals stay open afterwards.
    /// * `max_multiplier`      – ceiling on the combined multiplier (`10^12` = 1×).
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        time_multiplier: Address,
        achievements_oracle: Address,
        cooldown_seconds: u64,
        unstake_window: u64,
        max_multiplier: i128,
    ) -> Result<(), ContractError> {
        if config::is_set(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        admin.require_auth();

        config::validate_max_multiplier(max_multiplier)?;
        if unstake_window == 0 {
            return Err(ContractError::InvalidInput);
        }

        config::save(
            &env,
            &StakingConfig {
                stake_token: stake_token.clone(),
                time_multiplier: time_multiplier.clone(),
                achievements_oracle: achievements_oracle.clone(),
                max_multiplier,
                cooldown_seconds,
                unstake_window,
                immediate_withdrawals: false,
            },
        );
        admin_tiers::install_super_admin(&env, &admin);

        events::publish_initialized(
            &env,
            admin,
            stake_token,
            time_multiplier,
            achievements_oracle,
            max_multiplier,
            cooldown_seconds,
            unstake_window,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Pull `amount` stake tokens from `funder` and credit them to `recipient`.
    ///
    /// A zero amount is accepted and does nothing. An expired cooldown on the
    /// recipient is folded back before the deposit lands.
    pub fn stake(
        env: Env,
        funder: Address,
        recipient: Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        funder.require_auth();
        Self::deposit(&env, &funder, &recipient, amount)
    }

    /// Stake for oneself and delegate the resulting votes in one go.
    pub fn stake_and_delegate(
        env: Env,
        staker: Address,
        amount: i128,
        delegatee: Address,
    ) -> Result<(), ContractError> {
        staker.require_auth();
        Self::deposit(&env, &staker, &staker, amount)?;
        BalanceLedger::new(&env).redelegate(&staker, &delegatee);
        Ok(())
    }

    // ── Cooldown ────────────────────────────────────────────────────────────

    /// Earmark `units` of the staker's raw balance for withdrawal.
    pub fn start_cooldown(env: Env, staker: Address, units: i128) -> Result<(), ContractError> {
        staker.require_auth();
        let config = config::load(&env)?;
        let ledger = BalanceLedger::new(&env);

        let now = env.ledger().timestamp();
        let mut record = ledger.record(&staker);
        let folded = cooldown::fold_back_if_expired(
            &mut record,
            &Schedule::from_config(&config),
            now,
        );
        if !cooldown::start(&mut record, units, now)? {
            return Ok(());
        }
        multiplier::refresh_all(&env, &config, &staker, &mut record)?;
        let scaled = multiplier::scaled_of(&record, config.max_multiplier);
        ledger.commit(&staker, &record, scaled);

        if let Some(released) = folded {
            events::publish_cooldown_exited(
                &env,
                staker.clone(),
                CooldownExit::Expired,
                released,
            );
        }
        events::publish_cooldown_started(&env, staker, units);

        Ok(())
    }

    /// Cancel a running cooldown at any point of its lifecycle.
    pub fn exit_cooldown(env: Env, staker: Address) -> Result<(), ContractError> {
        staker.require_auth();
        let config = config::load(&env)?;
        let ledger = BalanceLedger::new(&env);

        let mut record = ledger.record(&staker);
        let released = cooldown::exit(&mut record)?;
        multiplier::refresh_all(&env, &config, &staker, &mut record)?;
        let scaled = multiplier::scaled_of(&record, config.max_multiplier);
        ledger.commit(&staker, &record, scaled);

        events::publish_cooldown_exited(&env, staker, CooldownExit::Voluntary, released);

        Ok(())
    }

    /// Withdraw `amount` of earmarked principal to `recipient`.
    ///
    /// Only possible inside the unstake window, unless `immediate` is set
    /// while a guardian has enabled immediate withdrawals. `exit_cooldown`
    /// hands any earmark left over back to active stake.
    pub fn withdraw(
        env: Env,
        staker: Address,
        amount: i128,
        recipient: Address,
        exit_cooldown: bool,
        immediate: bool,
    ) -> Result<(), ContractError> {
        staker.require_auth();
        let config = config::load(&env)?;
        let ledger = BalanceLedger::new(&env);
        let now = env.ledger().timestamp();

        // 1. Apply the withdrawal to the earmark and raw balance.
        let mut record = ledger.record(&staker);
        let (old_raw, old_weighted) = (record.raw, record.weighted_timestamp);
        let outcome = cooldown::withdraw(
            &mut record,
            &Schedule::from_config(&config),
            amount,
            exit_cooldown,
            immediate,
            config.immediate_withdrawals,
            now,
        )?;

        // 2. Re-blend the stake age, then refresh multipliers at the new age.
        record.weighted_timestamp =
            weighted::weighted_timestamp(old_weighted, now, old_raw, amount, false);
        multiplier::refresh_all(&env, &config, &staker, &mut record)?;
        let scaled = multiplier::scaled_of(&record, config.max_multiplier);
        ledger.commit(&staker, &record, scaled);

        // 3. Pay out.
        token::Client::new(&env, &config.stake_token).transfer(
            &env.current_contract_address(),
            &recipient,
            &amount,
        );

        if outcome.cooldown_cleared {
            events::publish_cooldown_exited(
                &env,
                staker.clone(),
                CooldownExit::Withdrawn,
                outcome.released_units,
            );
        }
        events::publish_withdrawn(&env, staker, recipient, amount, immediate);

        Ok(())
    }

    // ── Multipliers ─────────────────────────────────────────────────────────

    /// Re-query the time multiplier for `account` at its current weighted
    /// timestamp, then the achievements oracle. Anyone may call this; it
    /// fails when the time multiplier would not change.
    pub fn review_timestamp(env: Env, account: Address) -> Result<(), ContractError> {
        let config = config::load(&env)?;
        let ledger = BalanceLedger::new(&env);

        let mut record = ledger.record(&account);
        multiplier::refresh_time_multiplier(
            &env,
            &config,
            &mut record,
            RefreshPolicy::RequireChange,
        )?;
        multiplier::refresh_achievements(&env, &config, &account, &mut record);
        let scaled = multiplier::scaled_of(&record, config.max_multiplier);
        ledger.commit(&account, &record, scaled);

        events::publish_timestamp_reviewed(
            &env,
            account,
            record.weighted_timestamp,
            record.time_multiplier,
        );

        Ok(())
    }

    /// Push path for the achievements oracle: overwrite an account's
    /// achievements multiplier outside of a season check.
    pub fn apply_achievements_multiplier(
        env: Env,
        account: Address,
        value: i128,
    ) -> Result<(), ContractError> {
        let config = config::load(&env)?;
        config.achievements_oracle.require_auth();
        let ledger = BalanceLedger::new(&env);

        let mut record = ledger.record(&account);
        record.achievements_multiplier = value;
        let scaled = multiplier::scaled_of(&record, config.max_multiplier);
        ledger.commit(&account, &record, scaled);

        events::publish_achievements_applied(&env, account, value);

        Ok(())
    }

    // ── Delegation ──────────────────────────────────────────────────────────

    /// Delegate the caller's votes; `None` delegates back to self.
    ///
    /// Multipliers are refreshed before the weight moves. Naming the current
    /// delegatee again does nothing.
    pub fn delegate(
        env: Env,
        delegator: Address,
        delegatee: Option<Address>,
    ) -> Result<(), ContractError> {
        delegator.require_auth();
        let config = config::load(&env)?;
        let ledger = BalanceLedger::new(&env);

        let target = delegatee.unwrap_or_else(|| delegator.clone());
        if ledger.delegatee(&delegator) == target {
            return Ok(());
        }

        // Re-book at current multipliers so the weight that moves is fresh.
        let mut record = ledger.record(&delegator);
        multiplier::refresh_all(&env, &config, &delegator, &mut record)?;
        let scaled = multiplier::scaled_of(&record, config.max_multiplier);
        ledger.commit(&delegator, &record, scaled);

        ledger.redelegate(&delegator, &target);
        Ok(())
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Scaled balance: what the account votes and earns with.
    ///
    /// This is the value booked at the account's last mutation. After an
    /// admin changes the strategy, the oracle or the max multiplier it can
    /// differ from the formula applied to `balance_data` until the account
    /// is next touched.
    pub fn balance_of(env: Env, account: Address) -> i128 {
        BalanceLedger::new(&env).scaled(&account)
    }

    pub fn balance_data(env: Env, account: Address) -> BalanceRecord {
        BalanceLedger::new(&env).record(&account)
    }

    pub fn cooldown_state(env: Env, account: Address) -> Result<CooldownState, ContractError> {
        let config = config::load(&env)?;
        let record = BalanceLedger::new(&env).record(&account);
        Ok(Schedule::from_config(&config).state(&record, env.ledger().timestamp()))
    }

    /// Sum of all scaled balances.
    pub fn total_supply(env: Env) -> i128 {
        BalanceLedger::new(&env).total_supply()
    }

    pub fn delegates(env: Env, account: Address) -> Address {
        BalanceLedger::new(&env).delegatee(&account)
    }

    pub fn get_votes(env: Env, account: Address) -> i128 {
        BalanceLedger::new(&env).votes(&account)
    }

    /// Votes held by `account` at the end of ledger `sequence`, which must
    /// already be closed.
    pub fn get_past_votes(env: Env, account: Address, sequence: u32) -> Result<i128, ContractError> {
        BalanceLedger::new(&env).past_votes(&account, sequence)
    }

    pub fn get_past_total_supply(env: Env, sequence: u32) -> Result<i128, ContractError> {
        BalanceLedger::new(&env).past_total_supply(sequence)
    }

    pub fn num_checkpoints(env: Env, account: Address) -> u32 {
        BalanceLedger::new(&env).num_checkpoints(&account)
    }

    pub fn checkpoint(env: Env, account: Address, index: u32) -> Option<Checkpoint> {
        BalanceLedger::new(&env).checkpoint(&account, index)
    }

    pub fn get_config(env: Env) -> Result<StakingConfig, ContractError> {
        config::load(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        config::is_set(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        admin_tiers::super_admin(&env).ok_or(ContractError::NotInitialized)
    }

    // ── Admin functions ──────────────────────────────────────────────────────

    /// Swap the time-multiplier strategy. Requires `Governor`.
    ///
    /// Cached multipliers are left alone; each account picks up the new
    /// strategy on its next mutation or `review_timestamp`.
    pub fn set_time_multiplier(
        env: Env,
        caller: Address,
        strategy: Address,
    ) -> Result<(), ContractError> {
        let mut config = Self::authorize(&env, &caller, AdminTier::Governor)?;
        config.time_multiplier = strategy.clone();
        config::save(&env, &config);

        events::publish_time_multiplier_set(&env, strategy);
        Ok(())
    }

    /// Swap the achievements oracle. Requires `Governor`.
    pub fn set_achievements_oracle(
        env: Env,
        caller: Address,
        oracle: Address,
    ) -> Result<(), ContractError> {
        let mut config = Self::authorize(&env, &caller, AdminTier::Governor)?;
        config.achievements_oracle = oracle.clone();
        config::save(&env, &config);

        events::publish_achievements_oracle_set(&env, oracle);
        Ok(())
    }

    /// Change the multiplier ceiling. Requires `Governor`.
    ///
    /// Booked balances are re-scaled lazily, on each account's next mutation.
    pub fn set_max_multiplier(
        env: Env,
        caller: Address,
        max_multiplier: i128,
    ) -> Result<(), ContractError> {
        let mut config = Self::authorize(&env, &caller, AdminTier::Governor)?;
        config::validate_max_multiplier(max_multiplier)?;
        config.max_multiplier = max_multiplier;
        config::save(&env, &config);

        events::publish_max_multiplier_set(&env, max_multiplier);
        Ok(())
    }

    /// Toggle the emergency path letting `withdraw(.., immediate = true)`
    /// ignore the unstake window. Requires `Guardian`.
    pub fn set_immediate_withdrawals(
        env: Env,
        caller: Address,
        enabled: bool,
    ) -> Result<(), ContractError> {
        let mut config = Self::authorize(&env, &caller, AdminTier::Guardian)?;
        config.immediate_withdrawals = enabled;
        config::save(&env, &config);

        events::publish_immediate_withdrawals_set(&env, enabled);
        Ok(())
    }

    // ── Admin tier management ────────────────────────────────────────────────

    /// Assign `tier` to `target`. Only a `SuperAdmin` may call this.
    pub fn promote_admin(
        env: Env,
        caller: Address,
        target: Address,
        tier: AdminTier,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::promote(&env, &caller, &target, tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    /// Remove every tier from `target`. Only a `SuperAdmin` may call this.
    pub fn demote_admin(env: Env, caller: Address, target: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !admin_tiers::demote(&env, &caller, &target) {
            return Err(ContractError::Unauthorized);
        }
        Ok(())
    }

    pub fn get_admin_tier(env: Env, admin: Address) -> Option<AdminTier> {
        admin_tiers::tier_of(&env, &admin)
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────────

impl StakingEngine {
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !config::is_set(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Authenticate `caller`, check it holds `min_tier`, and hand back the
    /// configuration for modification.
    fn authorize(
        env: &Env,
        caller: &Address,
        min_tier: AdminTier,
    ) -> Result<StakingConfig, ContractError> {
        let config = config::load(env)?;
        caller.require_auth();
        if !admin_tiers::has_tier(env, caller, min_tier) {
            return Err(ContractError::Unauthorized);
        }
        Ok(config)
    }

    /// Shared body of `stake` and `stake_and_delegate`; auth already checked.
    fn deposit(
        env: &Env,
        funder: &Address,
        recipient: &Address,
        amount: i128,
    ) -> Result<(), ContractError> {
        let config = config::load(env)?;
        if amount < 0 {
            return Err(ContractError::InvalidInput);
        }
        if amount == 0 {
            return Ok(());
        }

        // 1. Pull tokens from the funder into the engine.
        token::Client::new(env, &config.stake_token).transfer(
            funder,
            &env.current_contract_address(),
            &amount,
        );

        // 2. Fold back an expired earmark, then re-blend the stake age.
        let ledger = BalanceLedger::new(env);
        let now = env.ledger().timestamp();
        let mut record = ledger.record(recipient);
        let folded = cooldown::fold_back_if_expired(
            &mut record,
            &Schedule::from_config(&config),
            now,
        );
        record.weighted_timestamp =
            weighted::weighted_timestamp(record.weighted_timestamp, now, record.raw, amount, true);
        record.raw = record
            .raw
            .checked_add(amount)
            .ok_or(ContractError::InvalidInput)?;

        // 3. Refresh multipliers at the new age and book the scaled balance.
        multiplier::refresh_all(env, &config, recipient, &mut record)?;
        let scaled = multiplier::scaled_of(&record, config.max_multiplier);
        ledger.commit(recipient, &record, scaled);

        if let Some(units) = folded {
            events::publish_cooldown_exited(env, recipient.clone(), CooldownExit::Expired, units);
        }
        events::publish_staked(
            env,
            recipient.clone(),
            funder.clone(),
            amount,
            record.raw,
            scaled,
        );

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_cooldown;
