extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::config::{DEFAULT_COOLDOWN_SECONDS as COOLDOWN, DEFAULT_UNSTAKE_WINDOW as WINDOW};
use crate::testutils::Harness;
use crate::weighted::weighted_timestamp;
use crate::{ContractError, CooldownState};

fn assert_earmark_invariants(h: &Harness, who: &Address) {
    let record = h.record(who);
    assert!(record.cooldown_units <= record.raw, "earmark exceeds raw");
    assert!(record.raw >= 0);
    assert_eq!(record.cooldown_timestamp == 0, record.cooldown_units == 0);
}

fn staked(h: &Harness, amount: i128) -> Address {
    let staker = h.funded(amount);
    h.engine.stake(&staker, &staker, &amount);
    staker
}

// ── Entering cooldown ─────────────────────────────────────────────────────────

#[test]
fn test_start_cooldown_earmarks_units() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);

    h.engine.start_cooldown(&staker, &400);

    let record = h.record(&staker);
    assert_eq!(record.cooldown_timestamp, Harness::START);
    assert_eq!(record.cooldown_units, 400);
    assert_eq!(record.raw, 1_000);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Cooldown);
    assert_eq!(h.engine.balance_of(&staker), 1_000);
    assert_earmark_invariants(&h, &staker);
}

#[test]
fn test_start_cooldown_validates_units() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);

    let result = h.engine.try_start_cooldown(&staker, &0);
    assert_eq!(result, Err(Ok(ContractError::InvalidInput)));
    let result = h.engine.try_start_cooldown(&staker, &1_001);
    assert_eq!(result, Err(Ok(ContractError::InsufficientBalance)));

    let stranger = Address::generate(&h.env);
    let result = h.engine.try_start_cooldown(&stranger, &1);
    assert_eq!(result, Err(Ok(ContractError::InsufficientBalance)));

    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Active);
}

#[test]
fn test_restarting_cooldown() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &400);

    h.advance(86_400);
    // Same amount: nothing moves, the first clock keeps running.
    h.engine.start_cooldown(&staker, &400);
    assert_eq!(h.record(&staker).cooldown_timestamp, Harness::START);

    let result = h.engine.try_start_cooldown(&staker, &500);
    assert_eq!(result, Err(Ok(ContractError::CooldownAmountMismatch)));
    assert_eq!(h.record(&staker).cooldown_units, 400);
}

#[test]
fn test_start_cooldown_after_window_closed_replaces_earmark() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &400);

    h.advance(COOLDOWN + WINDOW);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Expired);
    let restarted_at = h.now();
    h.engine.start_cooldown(&staker, &300);

    let record = h.record(&staker);
    assert_eq!(record.raw, 1_000);
    assert_eq!(record.cooldown_units, 300);
    assert_eq!(record.cooldown_timestamp, restarted_at);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Cooldown);
    assert_eq!(h.engine.balance_of(&staker), 1_000);
    assert_earmark_invariants(&h, &staker);
}

#[test]
fn test_same_amount_after_window_closed_restarts_the_clock() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &400);

    h.advance(COOLDOWN + WINDOW + 60);
    h.engine.start_cooldown(&staker, &400);

    assert_eq!(h.record(&staker).cooldown_timestamp, h.now());
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Cooldown);
}

// ── Leaving cooldown ──────────────────────────────────────────────────────────

#[test]
fn test_exit_cooldown_is_not_time_gated() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);

    h.engine.start_cooldown(&staker, &400);
    h.advance(60);
    h.engine.exit_cooldown(&staker);

    let record = h.record(&staker);
    assert_eq!(record.cooldown_timestamp, 0);
    assert_eq!(record.cooldown_units, 0);
    assert_eq!(record.raw, 1_000);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Active);

    let result = h.engine.try_exit_cooldown(&staker);
    assert_eq!(result, Err(Ok(ContractError::NotCoolingDown)));
}

#[test]
fn test_state_walks_through_the_window() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &1_000);

    h.advance(COOLDOWN - 1);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Cooldown);
    h.advance(1);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::UnstakeWindow);
    h.advance(WINDOW - 1);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::UnstakeWindow);
    h.advance(1);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Expired);
}

#[test]
fn test_stake_after_window_ends_cooldown() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.mint(&staker, 500);

    h.engine.start_cooldown(&staker, &600);
    h.advance(COOLDOWN + WINDOW);
    h.engine.stake(&staker, &staker, &500);

    let record = h.record(&staker);
    assert_eq!(record.raw, 1_500);
    assert_eq!(record.cooldown_timestamp, 0);
    assert_eq!(record.cooldown_units, 0);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::Active);
    assert_eq!(h.engine.balance_of(&staker), 1_500);
    assert_earmark_invariants(&h, &staker);
}

#[test]
fn test_stake_during_cooldown_keeps_earmark() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.mint(&staker, 1_000);
    h.engine.start_cooldown(&staker, &600);

    h.advance(COOLDOWN / 2);
    h.engine.stake(&staker, &staker, &500);
    let record = h.record(&staker);
    assert_eq!(record.raw, 1_500);
    assert_eq!(record.cooldown_units, 600);
    assert_eq!(record.cooldown_timestamp, Harness::START);

    h.advance(COOLDOWN);
    assert_eq!(h.engine.cooldown_state(&staker), CooldownState::UnstakeWindow);
    h.engine.stake(&staker, &staker, &500);
    let record = h.record(&staker);
    assert_eq!(record.raw, 2_000);
    assert_eq!(record.cooldown_units, 600);
    assert_earmark_invariants(&h, &staker);
}

// ── Withdrawals ───────────────────────────────────────────────────────────────

#[test]
fn test_withdraw_inside_window() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    let recipient = Address::generate(&h.env);
    h.engine.start_cooldown(&staker, &400);

    h.advance(COOLDOWN + 1);
    let before = h.record(&staker);
    h.engine.withdraw(&staker, &150, &recipient, &false, &false);

    let record = h.record(&staker);
    assert_eq!(record.raw, 850);
    assert_eq!(record.cooldown_units, 250);
    assert_eq!(record.cooldown_timestamp, Harness::START);
    assert_eq!(
        record.weighted_timestamp,
        weighted_timestamp(before.weighted_timestamp, h.now(), 1_000, 150, false)
    );
    assert_eq!(h.token_balance(&recipient), 150);
    assert_eq!(h.token_balance(&h.engine.address), 850);
    assert_eq!(h.engine.balance_of(&staker), 850);
    assert_eq!(h.engine.get_votes(&staker), 850);
    assert_earmark_invariants(&h, &staker);
}

#[test]
fn test_withdrawing_the_whole_earmark_clears_cooldown() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &400);

    h.advance(COOLDOWN);
    h.engine.withdraw(&staker, &400, &staker, &false, &false);

    let record = h.record(&staker);
    assert_eq!(record.raw, 600);
    assert_eq!(record.cooldown_timestamp, 0);
    assert_eq!(record.cooldown_units, 0);
    assert_eq!(h.token_balance(&staker), 400);
}

#[test]
fn test_withdraw_with_exit_flag_releases_remaining_earmark() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &400);

    h.advance(COOLDOWN);
    h.engine.withdraw(&staker, &100, &staker, &true, &false);

    let record = h.record(&staker);
    assert_eq!(record.raw, 900);
    assert_eq!(record.cooldown_timestamp, 0);
    assert_eq!(record.cooldown_units, 0);
}

#[test]
fn test_withdraw_outside_window_fails() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);

    let result = h.engine.try_withdraw(&staker, &100, &staker, &false, &false);
    assert_eq!(result, Err(Ok(ContractError::NotCoolingDown)));

    h.engine.start_cooldown(&staker, &400);
    h.advance(COOLDOWN - 1);
    let result = h.engine.try_withdraw(&staker, &100, &staker, &false, &false);
    assert_eq!(result, Err(Ok(ContractError::OutsideUnstakeWindow)));

    h.advance(1 + WINDOW);
    let result = h.engine.try_withdraw(&staker, &100, &staker, &false, &false);
    assert_eq!(result, Err(Ok(ContractError::OutsideUnstakeWindow)));

    assert_eq!(h.record(&staker).raw, 1_000);
    assert_eq!(h.token_balance(&staker), 0);
}

#[test]
fn test_withdraw_more_than_earmark_fails() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &400);
    h.advance(COOLDOWN);

    let result = h.engine.try_withdraw(&staker, &401, &staker, &false, &false);
    assert_eq!(result, Err(Ok(ContractError::ExceedsCooldownUnits)));
    let result = h.engine.try_withdraw(&staker, &0, &staker, &false, &false);
    assert_eq!(result, Err(Ok(ContractError::InvalidInput)));
    assert_earmark_invariants(&h, &staker);
}

#[test]
fn test_immediate_withdrawal_needs_guardian_switch() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &400);

    let result = h.engine.try_withdraw(&staker, &100, &staker, &false, &true);
    assert_eq!(result, Err(Ok(ContractError::ImmediateWithdrawDisabled)));

    h.engine.set_immediate_withdrawals(&h.admin, &true);
    assert!(h.engine.get_config().immediate_withdrawals);

    // Still in cooldown, and more than the earmark.
    h.engine.withdraw(&staker, &700, &staker, &false, &true);

    let record = h.record(&staker);
    assert_eq!(record.raw, 300);
    assert_eq!(record.cooldown_units, 0);
    assert_eq!(record.cooldown_timestamp, 0);
    assert_eq!(h.token_balance(&staker), 700);
    assert_eq!(h.engine.balance_of(&staker), 300);

    let result = h.engine.try_withdraw(&staker, &301, &staker, &false, &true);
    assert_eq!(result, Err(Ok(ContractError::InsufficientBalance)));
    assert_earmark_invariants(&h, &staker);
}

#[test]
fn test_partial_immediate_withdrawal_shrinks_earmark() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.set_immediate_withdrawals(&h.admin, &true);
    h.engine.start_cooldown(&staker, &400);

    h.engine.withdraw(&staker, &100, &staker, &false, &true);

    let record = h.record(&staker);
    assert_eq!(record.raw, 900);
    assert_eq!(record.cooldown_units, 300);
    assert_eq!(record.cooldown_timestamp, Harness::START);
    assert_earmark_invariants(&h, &staker);
}

#[test]
fn test_withdraw_to_zero_then_restake_restarts_the_clock() {
    let h = Harness::new();
    let staker = staked(&h, 1_000);
    h.engine.start_cooldown(&staker, &1_000);
    h.advance(COOLDOWN);
    h.engine.withdraw(&staker, &1_000, &staker, &false, &false);

    let record = h.record(&staker);
    assert_eq!(record.raw, 0);
    assert_eq!(h.engine.balance_of(&staker), 0);
    assert_eq!(h.engine.get_votes(&staker), 0);

    h.advance(60);
    h.engine.stake(&staker, &staker, &1_000);
    assert_eq!(h.record(&staker).weighted_timestamp, h.now());
}
