//! Per-request state machine and contribution ledger.
//!
//! Every operation recomputes expiry and target status from the ledger clock
//! at call time; nothing about the lifecycle is cached.
//!
//! Operations that pay out (`refund`, `get_money`) commit their ledger change
//! before calling the token contract. Any nested call made while the
//! transfer is in flight observes the zeroed balance or the disbursed flag.

use soroban_sdk::{token, Address, Env};

use crate::events::{self, Disbursed, Donated, Refunded};
use crate::storage;
use crate::types::{Request, RequestStatus};
use crate::Error;

fn now(env: &Env) -> u64 {
    env.ledger().timestamp()
}

fn token_client(env: &Env) -> token::Client<'_> {
    token::Client::new(env, &storage::get_token(env))
}

pub fn load(env: &Env, id: u64) -> Result<Request, Error> {
    let config = storage::load_request_config(env, id)?;
    let state = storage::load_request_state(env, id)?;
    Ok(Request::from_parts(config, state, now(env)))
}

pub fn status(env: &Env, id: u64) -> Result<RequestStatus, Error> {
    Ok(load(env, id)?.status)
}

/// `raised_amount >= required_amount`.
pub fn has_reached_limit(env: &Env, id: u64) -> Result<bool, Error> {
    let config = storage::load_request_config(env, id)?;
    let state = storage::load_request_state(env, id)?;
    Ok(state.has_reached(config.required_amount))
}

/// Ledger time is strictly past `expires_at`.
pub fn has_expired(env: &Env, id: u64) -> Result<bool, Error> {
    let config = storage::load_request_config(env, id)?;
    Ok(config.has_expired_at(now(env)))
}

pub fn contribution_of(env: &Env, id: u64, patron: &Address) -> Result<i128, Error> {
    storage::load_request_config(env, id)?;
    Ok(storage::load_patron_balance(env, id, patron))
}

/// Accept a pledge of `amount` from `contributor`.
///
/// Overshooting the target in a single pledge is allowed; only pledges made
/// once the target is already met are refused.
pub fn donate(env: &Env, id: u64, contributor: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let config = storage::load_request_config(env, id)?;
    let mut state = storage::load_request_state(env, id)?;

    if state.funds_disbursed {
        return Err(Error::AlreadyDisbursed);
    }
    if config.has_expired_at(now(env)) || state.has_reached(config.required_amount) {
        return Err(Error::FundingClosed);
    }

    let balance = storage::load_patron_balance(env, id, contributor)
        .checked_add(amount)
        .ok_or(Error::InvalidAmount)?;
    state.raised_amount = state
        .raised_amount
        .checked_add(amount)
        .ok_or(Error::InvalidAmount)?;

    storage::save_patron_balance(env, id, contributor, balance);
    storage::save_request_state(env, id, &state);

    token_client(env).transfer(contributor, &env.current_contract_address(), &amount);

    events::emit_donated(
        env,
        Donated {
            request_id: id,
            contributor: contributor.clone(),
            amount,
        },
    );
    Ok(())
}

/// Return the whole pledge of `contributor` from an expired, unfunded request.
///
/// Succeeds once per pledge: the balance entry is removed before the
/// transfer, so a repeat call fails with `NoContribution`.
pub fn refund(env: &Env, id: u64, contributor: &Address) -> Result<i128, Error> {
    let config = storage::load_request_config(env, id)?;
    let mut state = storage::load_request_state(env, id)?;

    if state.funds_disbursed {
        return Err(Error::AlreadyDisbursed);
    }
    if !config.has_expired_at(now(env)) {
        return Err(Error::NotExpired);
    }
    if state.has_reached(config.required_amount) {
        return Err(Error::LimitReached);
    }

    let amount = storage::load_patron_balance(env, id, contributor);
    if amount <= 0 {
        return Err(Error::NoContribution);
    }

    storage::save_patron_balance(env, id, contributor, 0);
    state.raised_amount -= amount;
    storage::save_request_state(env, id, &state);

    token_client(env).transfer(&env.current_contract_address(), contributor, &amount);

    events::emit_refunded(
        env,
        Refunded {
            request_id: id,
            contributor: contributor.clone(),
            amount,
        },
    );
    Ok(amount)
}

/// Pay the full raised amount to the owner of a funded request.
///
/// Patron balances are left in place as a record; the disbursed flag alone
/// blocks every later pledge, refund and withdrawal.
pub fn get_money(env: &Env, id: u64, caller: &Address) -> Result<i128, Error> {
    let config = storage::load_request_config(env, id)?;
    let mut state = storage::load_request_state(env, id)?;

    if *caller != config.owner {
        return Err(Error::NotOwner);
    }
    if state.funds_disbursed {
        return Err(Error::AlreadyDisbursed);
    }
    if !state.has_reached(config.required_amount) {
        return Err(Error::LimitNotReached);
    }

    state.funds_disbursed = true;
    storage::save_request_state(env, id, &state);

    let amount = state.raised_amount;
    token_client(env).transfer(&env.current_contract_address(), caller, &amount);

    events::emit_disbursed(
        env,
        Disbursed {
            request_id: id,
            owner: config.owner,
            amount,
        },
    );
    Ok(amount)
}
