//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the registry.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key            | Type      | Description                          |
//! |----------------|-----------|--------------------------------------|
//! | `Token`        | `Address` | Funding asset, set by the constructor |
//! | `RequestCount` | `u64`     | Next request ID / number of requests |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                   | Type            | Description                     |
//! |-----------------------|-----------------|---------------------------------|
//! | `ReqConfig(id)`       | `RequestConfig` | Immutable request parameters    |
//! | `ReqState(id)`        | `RequestState`  | Raised amount + disbursed flag  |
//! | `Patron(id, address)` | `i128`          | Contributor's current pledge    |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! A `Patron` entry exists only while its balance is positive; refunds remove it.
//! After disbursement the entries stay behind as a historical record.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{RequestConfig, RequestState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Funding asset for every request in this registry (Instance).
    Token,
    /// Number of requests created so far (Instance).
    RequestCount,
    /// Immutable request configuration keyed by ID (Persistent).
    ReqConfig(u64),
    /// Mutable request state keyed by ID (Persistent).
    ReqState(u64),
    /// Contributor balance for a request (Persistent).
    Patron(u64, Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

/// The funding asset. Always present once the constructor has run.
pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("token not set")
}

pub fn get_request_count(env: &Env) -> u64 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::RequestCount)
        .unwrap_or(0)
}

/// Reads, increments, and stores the request counter.
/// Returns the ID to use for the new request (pre-increment value).
pub fn get_and_increment_request_id(env: &Env) -> u64 {
    let current = get_request_count(env);
    env.storage()
        .instance()
        .set(&DataKey::RequestCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save the config and the initial state of a freshly created request.
pub fn save_request(env: &Env, config: &RequestConfig, state: &RequestState) {
    let config_key = DataKey::ReqConfig(config.id);
    env.storage().persistent().set(&config_key, config);
    bump_persistent(env, &config_key);
    save_request_state(env, config.id, state);
}

pub fn load_request_config(env: &Env, id: u64) -> Result<RequestConfig, Error> {
    let key = DataKey::ReqConfig(id);
    let config: RequestConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::RequestNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

pub fn load_request_state(env: &Env, id: u64) -> Result<RequestState, Error> {
    let key = DataKey::ReqState(id);
    let state: RequestState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::RequestNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

pub fn save_request_state(env: &Env, id: u64, state: &RequestState) {
    let key = DataKey::ReqState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Current pledge of `patron` to request `id`; `0` when there is none.
pub fn load_patron_balance(env: &Env, id: u64, patron: &Address) -> i128 {
    let key = DataKey::Patron(id, patron.clone());
    let balance: Option<i128> = env.storage().persistent().get(&key);
    match balance {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Store a positive balance, or drop the entry when it reaches zero.
pub fn save_patron_balance(env: &Env, id: u64, patron: &Address, amount: i128) {
    let key = DataKey::Patron(id, patron.clone());
    if amount > 0 {
        env.storage().persistent().set(&key, &amount);
        bump_persistent(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}
