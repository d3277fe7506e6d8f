//! Properties of the pure stake-age and scaling maths.
//!
//! Invariants tested:
//! - A weighted timestamp never moves before the previous one or past `now`
//! - Larger deposits never make a stake look older
//! - An empty balance always restarts the clock
//! - The scaled balance is exactly `raw × clamp(multiplier) / 10^12` in range

use proptest::prelude::*;
use staked_token::multiplier::{effective_multiplier, scaled_balance, MULTIPLIER_DENOMINATOR};
use staked_token::weighted::weighted_timestamp;

const MAX_RAW: i128 = 1_000_000_000_000_000_000_000_000; // 10^24
const YEARS: u64 = 20 * 365 * 86_400;

proptest! {
    #[test]
    fn prop_weighted_timestamp_stays_between_old_and_now(
        now in YEARS..(2 * YEARS),
        held in 0u64..YEARS,
        old_raw in 1i128..MAX_RAW,
        delta in 0i128..MAX_RAW,
        is_deposit in any::<bool>(),
    ) {
        let old = now - held;
        let next = weighted_timestamp(old, now, old_raw, delta, is_deposit);
        prop_assert!(next <= now);
        prop_assert!(next >= old, "balance change aged the stake: {} < {}", next, old);
    }

    #[test]
    fn prop_bigger_deposits_never_look_older(
        now in YEARS..(2 * YEARS),
        held in 0u64..YEARS,
        old_raw in 1i128..MAX_RAW,
        small in 0i128..MAX_RAW,
        extra in 0i128..MAX_RAW,
    ) {
        let old = now - held;
        let a = weighted_timestamp(old, now, old_raw, small, true);
        let b = weighted_timestamp(old, now, old_raw, small + extra, true);
        prop_assert!(b >= a);
    }

    #[test]
    fn prop_empty_balance_restarts_the_clock(
        now in 0u64..u64::MAX,
        old in 0u64..u64::MAX,
        delta in 0i128..MAX_RAW,
        is_deposit in any::<bool>(),
    ) {
        prop_assert_eq!(weighted_timestamp(old, now, 0, delta, is_deposit), now);
    }

    #[test]
    fn prop_effective_multiplier_is_clamped(
        time in -10 * MULTIPLIER_DENOMINATOR..10 * MULTIPLIER_DENOMINATOR,
        achievements in -10 * MULTIPLIER_DENOMINATOR..10 * MULTIPLIER_DENOMINATOR,
        max in 1i128..10 * MULTIPLIER_DENOMINATOR,
    ) {
        let effective = effective_multiplier(time, achievements, max);
        prop_assert!(effective >= 0);
        prop_assert!(effective <= max);
        if time + achievements > 0 && time + achievements <= max {
            prop_assert_eq!(effective, time + achievements);
        }
    }

    #[test]
    fn prop_scaled_balance_is_exact_in_range(
        raw in 0i128..MAX_RAW,
        time in 0i128..5 * MULTIPLIER_DENOMINATOR,
        achievements in -MULTIPLIER_DENOMINATOR..MULTIPLIER_DENOMINATOR,
        max in 1i128..5 * MULTIPLIER_DENOMINATOR,
    ) {
        let effective = effective_multiplier(time, achievements, max);
        let expected = raw * effective / MULTIPLIER_DENOMINATOR;
        prop_assert_eq!(scaled_balance(raw, time, achievements, max), expected);
    }

    #[test]
    fn prop_scaled_balance_never_wraps(
        raw in 0i128..=i128::MAX,
        time in any::<i128>(),
        achievements in any::<i128>(),
        max in 1i128..=i128::MAX,
    ) {
        prop_assert!(scaled_balance(raw, time, achievements, max) >= 0);
    }
}
