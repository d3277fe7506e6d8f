//! Balance ledger: record store, booked scaled balances, delegation and vote
//! checkpoints behind one handle. The staking engine composes this and only
//! talks to storage through it.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::balances::{self, BalanceRecord};
use crate::checkpoints::{self, Checkpoint, Series};
use crate::events;
use crate::ContractError;

const DELEGATE: Symbol = symbol_short!("DELEGATE");
const SCALED: Symbol = symbol_short!("SCALED");

const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

pub struct BalanceLedger<'a> {
    env: &'a Env,
}

impl<'a> BalanceLedger<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    // ── Records ─────────────────────────────────────────────────────────────

    pub fn record(&self, account: &Address) -> BalanceRecord {
        balances::load(self.env, account)
    }

    /// Scaled balance last booked for `account`; what its delegatee holds
    /// on the account's behalf.
    pub fn scaled(&self, account: &Address) -> i128 {
        self.env
            .storage()
            .persistent()
            .get(&(SCALED, account.clone()))
            .unwrap_or(0)
    }

    /// Persist `record` and book `scaled` as the account's new scaled
    /// balance, moving the difference onto its delegatee and the total supply.
    ///
    /// The delegatee is notified even when nothing moved.
    pub fn commit(&self, account: &Address, record: &BalanceRecord, scaled: i128) {
        let previous = self.scaled(account);
        balances::store(self.env, account, record);

        let key = (SCALED, account.clone());
        self.env.storage().persistent().set(&key, &scaled);
        self.env
            .storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

        let delta = scaled.saturating_sub(previous);
        self.shift_votes(&self.delegatee(account), delta);
        if delta != 0 {
            let total = checkpoints::latest(self.env, &Series::TotalSupply);
            checkpoints::push(self.env, &Series::TotalSupply, total.saturating_add(delta));
        }
    }

    // ── Delegation ──────────────────────────────────────────────────────────

    /// Current delegatee; accounts that never delegated vote for themselves.
    pub fn delegatee(&self, account: &Address) -> Address {
        self.env
            .storage()
            .persistent()
            .get(&(DELEGATE, account.clone()))
            .unwrap_or_else(|| account.clone())
    }

    /// Point `delegator` at `to`, carrying its booked scaled balance along.
    ///
    /// Returns `false` and does nothing when `to` is already the delegatee.
    pub fn redelegate(&self, delegator: &Address, to: &Address) -> bool {
        let from = self.delegatee(delegator);
        if from == *to {
            return false;
        }

        let key = (DELEGATE, delegator.clone());
        self.env.storage().persistent().set(&key, to);
        self.env
            .storage()
            .persistent()
            .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);

        events::publish_delegate_changed(self.env, delegator.clone(), from.clone(), to.clone());

        let weight = self.scaled(delegator);
        self.shift_votes(&from, weight.saturating_neg());
        self.shift_votes(to, weight);
        true
    }

    // ── Votes ───────────────────────────────────────────────────────────────

    pub fn votes(&self, delegatee: &Address) -> i128 {
        checkpoints::latest(self.env, &Series::Delegatee(delegatee.clone()))
    }

    pub fn past_votes(&self, delegatee: &Address, sequence: u32) -> Result<i128, ContractError> {
        self.require_past(sequence)?;
        Ok(checkpoints::votes_at(
            self.env,
            &Series::Delegatee(delegatee.clone()),
            sequence,
        ))
    }

    pub fn total_supply(&self) -> i128 {
        checkpoints::latest(self.env, &Series::TotalSupply)
    }

    pub fn past_total_supply(&self, sequence: u32) -> Result<i128, ContractError> {
        self.require_past(sequence)?;
        Ok(checkpoints::votes_at(self.env, &Series::TotalSupply, sequence))
    }

    pub fn num_checkpoints(&self, delegatee: &Address) -> u32 {
        checkpoints::len(self.env, &Series::Delegatee(delegatee.clone()))
    }

    pub fn checkpoint(&self, delegatee: &Address, index: u32) -> Option<Checkpoint> {
        checkpoints::get(self.env, &Series::Delegatee(delegatee.clone()), index)
    }

    fn require_past(&self, sequence: u32) -> Result<(), ContractError> {
        if sequence >= self.env.ledger().sequence() {
            return Err(ContractError::FutureLookup);
        }
        Ok(())
    }

    fn shift_votes(&self, delegatee: &Address, delta: i128) {
        let series = Series::Delegatee(delegatee.clone());
        let previous = checkpoints::latest(self.env, &series);
        let updated = previous.saturating_add(delta);
        if delta != 0 {
            checkpoints::push(self.env, &series, updated);
        }
        events::publish_delegate_votes_changed(self.env, delegatee.clone(), previous, updated);
    }
}
