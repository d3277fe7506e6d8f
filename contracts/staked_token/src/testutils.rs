//! Test doubles for the engine's collaborators and a ready-made harness.
//!
//! Compiled for unit tests and behind the `testutils` feature (fuzzing).

use soroban_sdk::{
    contract, contractimpl, symbol_short,
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env, Symbol,
};

use crate::config::{DEFAULT_COOLDOWN_SECONDS, DEFAULT_UNSTAKE_WINDOW};
use crate::multiplier::{
    AchievementsOracle, TimeMultiplier, DEFAULT_MAX_MULTIPLIER, MULTIPLIER_DENOMINATOR,
};
use crate::{BalanceRecord, StakingEngine, StakingEngineClient};

const OVERRIDE: Symbol = symbol_short!("OVERRIDE");
const LAST_TS: Symbol = symbol_short!("LAST_TS");
const FAILING: Symbol = symbol_short!("FAILING");
const ACHIEVED: Symbol = symbol_short!("ACHIEVED");

pub const WEEK: u64 = 7 * 86_400;
pub const ONE_X: i128 = MULTIPLIER_DENOMINATOR;

// ── Time multiplier ──────────────────────────────────────────────────────────

/// Stepped schedule: 1.0× below 13 weeks, then 1.2× / 1.3× / 1.4× / 1.5× /
/// 1.6× from 13 / 26 / 52 / 78 / 104 weeks. A fixed override wins when set.
#[contract]
pub struct SteppedTimeMultiplier;

#[contractimpl]
impl SteppedTimeMultiplier {
    pub fn set_override(env: Env, value: Option<i128>) {
        match value {
            Some(v) => env.storage().instance().set(&OVERRIDE, &v),
            None => env.storage().instance().remove(&OVERRIDE),
        }
    }

    /// Weighted timestamp passed to the most recent `calculate`.
    pub fn last_queried(env: Env) -> Option<u64> {
        env.storage().instance().get(&LAST_TS)
    }
}

#[contractimpl]
impl TimeMultiplier for SteppedTimeMultiplier {
    fn calculate(env: Env, weighted_timestamp: u64) -> i128 {
        env.storage().instance().set(&LAST_TS, &weighted_timestamp);
        if let Some(value) = env.storage().instance().get::<_, i128>(&OVERRIDE) {
            return value;
        }

        let held = env.ledger().timestamp().saturating_sub(weighted_timestamp);
        let bonus_percent = match held / WEEK {
            0..=12 => 0,
            13..=25 => 20,
            26..=51 => 30,
            52..=77 => 40,
            78..=103 => 50,
            _ => 60,
        };
        ONE_X + ONE_X * bonus_percent / 100
    }
}

// ── Achievements oracle ──────────────────────────────────────────────────────

/// Oracle answering from a per-account table; can be switched off to
/// simulate a failing collaborator.
#[contract]
pub struct MockAchievements;

#[contractimpl]
impl MockAchievements {
    pub fn set_multiplier(env: Env, account: Address, value: i128) {
        env.storage().persistent().set(&(ACHIEVED, account), &value);
    }

    pub fn set_failing(env: Env, failing: bool) {
        env.storage().instance().set(&FAILING, &failing);
    }
}

#[contractimpl]
impl AchievementsOracle for MockAchievements {
    fn check_for_season_finish(env: Env, account: Address) -> i128 {
        if env.storage().instance().get(&FAILING).unwrap_or(false) {
            panic!("achievements season unavailable");
        }
        env.storage()
            .persistent()
            .get(&(ACHIEVED, account))
            .unwrap_or(0)
    }
}

// ── Harness ──────────────────────────────────────────────────────────────────

/// A deployed engine wired to a Stellar asset and both mocks.
pub struct Harness {
    pub env: Env,
    pub engine: StakingEngineClient<'static>,
    pub admin: Address,
    pub token: Address,
    pub timer: SteppedTimeMultiplierClient<'static>,
    pub oracle: MockAchievementsClient<'static>,
}

impl Harness {
    /// Genesis time for every harness; far from zero so cooldown maths is realistic.
    pub const START: u64 = 1_700_000_000;
    pub const START_SEQUENCE: u32 = 100;

    pub fn new() -> Self {
        Self::with_schedule(DEFAULT_COOLDOWN_SECONDS, DEFAULT_UNSTAKE_WINDOW)
    }

    pub fn with_schedule(cooldown_seconds: u64, unstake_window: u64) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(Self::START);
        env.ledger().set_sequence_number(Self::START_SEQUENCE);

        let token = env
            .register_stellar_asset_contract_v2(Address::generate(&env))
            .address();
        let timer = SteppedTimeMultiplierClient::new(&env, &env.register(SteppedTimeMultiplier, ()));
        let oracle = MockAchievementsClient::new(&env, &env.register(MockAchievements, ()));

        let engine = StakingEngineClient::new(&env, &env.register(StakingEngine, ()));
        let admin = Address::generate(&env);
        engine.initialize(
            &admin,
            &token,
            &timer.address,
            &oracle.address,
            &cooldown_seconds,
            &unstake_window,
            &DEFAULT_MAX_MULTIPLIER,
        );

        Self {
            env,
            engine,
            admin,
            token,
            timer,
            oracle,
        }
    }

    /// Fresh address holding `amount` stake tokens.
    pub fn funded(&self, amount: i128) -> Address {
        let who = Address::generate(&self.env);
        self.mint(&who, amount);
        who
    }

    pub fn mint(&self, who: &Address, amount: i128) {
        StellarAssetClient::new(&self.env, &self.token).mint(who, &amount);
    }

    pub fn token_balance(&self, who: &Address) -> i128 {
        TokenClient::new(&self.env, &self.token).balance(who)
    }

    pub fn now(&self) -> u64 {
        self.env.ledger().timestamp()
    }

    pub fn sequence(&self) -> u32 {
        self.env.ledger().sequence()
    }

    /// Move the clock forward by `seconds` and close the current ledger.
    pub fn advance(&self, seconds: u64) {
        self.env.ledger().set_timestamp(self.now() + seconds);
        self.next_ledger();
    }

    pub fn next_ledger(&self) {
        self.env.ledger().set_sequence_number(self.sequence() + 1);
    }

    pub fn record(&self, who: &Address) -> BalanceRecord {
        self.engine.balance_data(who)
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
