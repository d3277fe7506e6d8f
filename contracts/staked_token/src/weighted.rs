//! Weighted stake timestamp.
//!
//! Instead of keeping one entry per deposit, each account carries a single
//! synthetic "stake start" that is re-blended whenever its raw balance moves.
//! New deposits count as having been held for half as long as existing
//! principal; withdrawals cost an eighth of their size in accrued weight.

/// New principal is diluted at half weight.
pub const DEPOSIT_WEIGHT: u128 = 2;
/// Withdrawn principal is penalised at an eighth of its size.
pub const WITHDRAW_WEIGHT: u128 = 8;

/// Recompute the weighted timestamp after a raw-balance change of `delta`.
///
/// * `old_weighted_timestamp` – value stored before the change.
/// * `now`                    – current ledger timestamp.
/// * `old_raw`                – raw balance before the change.
/// * `delta`                  – magnitude of the change (never negative).
/// * `is_deposit`             – `true` for deposits, `false` for withdrawals.
///
/// The result never lies after `now`.
pub fn weighted_timestamp(
    old_weighted_timestamp: u64,
    now: u64,
    old_raw: i128,
    delta: i128,
    is_deposit: bool,
) -> u64 {
    let old_raw = non_negative(old_raw);
    if old_raw == 0 {
        return now;
    }
    let delta = non_negative(delta);
    let held = now.saturating_sub(old_weighted_timestamp);

    let held_after = if is_deposit {
        let diluted = old_raw.saturating_add(delta / DEPOSIT_WEIGHT);
        scale_seconds(held, old_raw, diluted)
    } else {
        let retained = old_raw.saturating_sub(delta / WITHDRAW_WEIGHT);
        scale_seconds(held, retained, old_raw)
    };

    now - held_after
}

fn non_negative(value: i128) -> u128 {
    u128::try_from(value).unwrap_or(0)
}

/// `seconds * numerator / denominator`, truncating, for `numerator <= denominator`.
///
/// Balances close to the integer limit would overflow the product; in that
/// case both sides of the ratio are shifted right by the bit length of
/// `seconds` first, which keeps the ratio and fits the product in 128 bits.
fn scale_seconds(seconds: u64, numerator: u128, denominator: u128) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let numerator = numerator.min(denominator);
    let secs = u128::from(seconds);

    let scaled = match numerator.checked_mul(secs) {
        Some(product) => product / denominator,
        None => {
            let shift = u128::BITS - secs.leading_zeros();
            let den = denominator >> shift;
            if den == 0 {
                secs
            } else {
                (numerator >> shift) * secs / den
            }
        }
    };

    // numerator <= denominator, so scaled <= seconds.
    u64::try_from(scaled).unwrap_or(seconds).min(seconds)
}
