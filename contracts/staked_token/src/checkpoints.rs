//! Append-only vote checkpoints.
//!
//! Every series (one per delegatee, plus the total supply) is a counter and
//! one persistent entry per checkpoint, so appends never rewrite history and
//! historical reads only touch `O(log n)` entries.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

const CKPT_LEN: Symbol = symbol_short!("CKPT_LEN");
const CKPT: Symbol = symbol_short!("CKPT");

const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Votes held by a series as of a ledger sequence.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Checkpoint {
    pub sequence: u32,
    pub votes: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Series {
    Delegatee(Address),
    TotalSupply,
}

fn len_key(series: &Series) -> (Symbol, Series) {
    (CKPT_LEN, series.clone())
}

fn entry_key(series: &Series, index: u32) -> (Symbol, Series, u32) {
    (CKPT, series.clone(), index)
}

pub(crate) fn len(env: &Env, series: &Series) -> u32 {
    env.storage().persistent().get(&len_key(series)).unwrap_or(0)
}

pub(crate) fn get(env: &Env, series: &Series, index: u32) -> Option<Checkpoint> {
    env.storage().persistent().get(&entry_key(series, index))
}

/// Votes in the most recent checkpoint, `0` for an empty series.
pub(crate) fn latest(env: &Env, series: &Series) -> i128 {
    match len(env, series) {
        0 => 0,
        n => get(env, series, n - 1).map_or(0, |c| c.votes),
    }
}

/// Append `votes` stamped with the current ledger sequence.
pub(crate) fn push(env: &Env, series: &Series, votes: i128) {
    let index = len(env, series);
    let checkpoint = Checkpoint {
        sequence: env.ledger().sequence(),
        votes,
    };

    let entry = entry_key(series, index);
    env.storage().persistent().set(&entry, &checkpoint);
    env.storage()
        .persistent()
        .extend_ttl(&entry, TTL_THRESHOLD, TTL_EXTEND_TO);

    let counter = len_key(series);
    env.storage().persistent().set(&counter, &(index + 1));
    env.storage()
        .persistent()
        .extend_ttl(&counter, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Votes recorded at or before `sequence`; `0` before the first checkpoint.
pub(crate) fn votes_at(env: &Env, series: &Series, sequence: u32) -> i128 {
    let count = len(env, series);
    let position = upper_bound(count, sequence, |index| {
        get(env, series, index).map_or(u32::MAX, |c| c.sequence)
    });
    match position {
        0 => 0,
        p => get(env, series, p - 1).map_or(0, |c| c.votes),
    }
}

/// Index of the first checkpoint stamped after `sequence`.
///
/// Checkpoints sharing a sequence all sit before the returned index, so the
/// entry just before it is the last one written at or before `sequence`.
fn upper_bound(count: u32, sequence: u32, sequence_at: impl Fn(u32) -> u32) -> u32 {
    let mut low = 0;
    let mut high = count;
    while low < high {
        let mid = low + (high - low) / 2;
        if sequence_at(mid) > sequence {
            high = mid;
        } else {
            low = mid + 1;
        }
    }
    high
}
