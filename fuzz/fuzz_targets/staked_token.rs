#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address};
use staked_token::testutils::{Harness, ONE_X};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Stake { amount: u64 },
    StartCooldown { units: u64 },
    ExitCooldown,
    Withdraw { amount: u64, exit: bool, immediate: bool },
    Delegate { to: Option<u8> },
    Review,
    Achievements { value: i64 },
    Advance { seconds: u32 },
    SetMax { value: u64 },
    ToggleImmediate { enabled: bool },
}

fuzz_target!(|actions: Vec<FuzzAction>| {
    let h = Harness::with_schedule(3_600, 1_800);

    let users: Vec<Address> = (0..4).map(|_| Address::generate(&h.env)).collect();

    // Looking for panics and broken bookkeeping, not business outcomes:
    // rejected calls are expected and ignored.
    for (i, action) in actions.into_iter().enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Stake { amount } => {
                let amount = i128::from(amount);
                h.mint(caller, amount);
                let _ = h.engine.try_stake(caller, caller, &amount);
            }
            FuzzAction::StartCooldown { units } => {
                let _ = h.engine.try_start_cooldown(caller, &i128::from(units));
            }
            FuzzAction::ExitCooldown => {
                let _ = h.engine.try_exit_cooldown(caller);
            }
            FuzzAction::Withdraw { amount, exit, immediate } => {
                let _ = h
                    .engine
                    .try_withdraw(caller, &i128::from(amount), caller, &exit, &immediate);
            }
            FuzzAction::Delegate { to } => {
                let target = to.map(|t| users[usize::from(t) % users.len()].clone());
                let _ = h.engine.try_delegate(caller, &target);
            }
            FuzzAction::Review => {
                let _ = h.engine.try_review_timestamp(caller);
            }
            FuzzAction::Achievements { value } => {
                // Per-mille of 1x.
                let value = i128::from(value) * ONE_X / 1_000;
                h.oracle.set_multiplier(caller, &value);
                let _ = h.engine.try_apply_achievements_multiplier(caller, &value);
            }
            FuzzAction::Advance { seconds } => h.advance(u64::from(seconds)),
            FuzzAction::SetMax { value } => {
                let _ = h.engine.try_set_max_multiplier(&h.admin, &i128::from(value));
            }
            FuzzAction::ToggleImmediate { enabled } => {
                h.engine.set_immediate_withdrawals(&h.admin, &enabled);
            }
        }

        let mut raw = 0i128;
        let mut scaled = 0i128;
        let mut votes = 0i128;
        for user in &users {
            let record = h.record(user);
            assert!(record.cooldown_units <= record.raw);
            raw += record.raw;
            scaled += h.engine.balance_of(user);
            votes += h.engine.get_votes(user);
        }
        assert_eq!(h.token_balance(&h.engine.address), raw);
        assert_eq!(h.engine.total_supply(), scaled);
        assert_eq!(votes, scaled);
    }
});
