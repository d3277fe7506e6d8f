use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// ── Storage ──────────────────────────────────────────────────────────────────

const ADMIN_TIER: Symbol = symbol_short!("ADM_TIER");
const SUPER_ADMIN: Symbol = symbol_short!("S_ADMIN");

const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

// ── Tiers ────────────────────────────────────────────────────────────────────

/// Administrative tiers, ordered by reach.
///
/// - `Guardian`   – may flip emergency switches such as immediate withdrawals.
/// - `Governor`   – may swap strategy contracts and tune multiplier limits.
/// - `SuperAdmin` – everything above, plus granting and revoking tiers.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum AdminTier {
    Guardian = 1,
    Governor = 2,
    SuperAdmin = 3,
}

impl AdminTier {
    /// True when a holder of `self` may act where `required` is demanded.
    pub fn covers(self, required: AdminTier) -> bool {
        self as u32 >= required as u32
    }
}

fn tier_key(account: &Address) -> (Symbol, Address) {
    (ADMIN_TIER, account.clone())
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// Record `tier` for `account`. Callers check authorization first.
pub fn grant(env: &Env, account: &Address, tier: AdminTier) {
    let key = tier_key(account);
    env.storage().persistent().set(&key, &tier);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn revoke(env: &Env, account: &Address) {
    env.storage().persistent().remove(&tier_key(account));
}

pub fn tier_of(env: &Env, account: &Address) -> Option<AdminTier> {
    env.storage().persistent().get(&tier_key(account))
}

/// Whether `account` holds `required` or a higher tier.
pub fn has_tier(env: &Env, account: &Address, required: AdminTier) -> bool {
    tier_of(env, account).is_some_and(|tier| tier.covers(required))
}

/// Bootstrap the first super admin. Only used from `initialize`.
pub fn install_super_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&SUPER_ADMIN, admin);
    grant(env, admin, AdminTier::SuperAdmin);
}

pub fn super_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&SUPER_ADMIN)
}

/// Assign `tier` to `target` on behalf of `caller`.
///
/// Returns `false` without writing anything when `caller` is not a
/// `SuperAdmin`. `caller.require_auth()` is the caller's responsibility.
pub fn promote(env: &Env, caller: &Address, target: &Address, tier: AdminTier) -> bool {
    if !has_tier(env, caller, AdminTier::SuperAdmin) {
        return false;
    }
    grant(env, target, tier);
    true
}

/// Strip every tier from `target`. Same authorization rule as [`promote`].
pub fn demote(env: &Env, caller: &Address, target: &Address) -> bool {
    if !has_tier(env, caller, AdminTier::SuperAdmin) {
        return false;
    }
    revoke(env, target);
    true
}
