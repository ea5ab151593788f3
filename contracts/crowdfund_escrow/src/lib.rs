//! # Crowdfund Escrow Contract
//!
//! A registry of independent crowdfunding requests. Each request collects
//! pledges in the registry's funding token toward a target before a deadline,
//! then resolves into exactly one outcome: the owner withdraws everything
//! raised, or contributors reclaim their own pledges.
//!
//! | Phase      | Entry Point(s)                                        |
//! |------------|-------------------------------------------------------|
//! | Deployment | `__constructor`                                       |
//! | Registry   | [`RequestFactory::create_request`], `get_requests`    |
//! | Funding    | [`RequestFactory::donate`]                            |
//! | Resolution | [`RequestFactory::refund`], [`RequestFactory::get_money`] |
//! | Queries    | `has_reached_limit`, `has_expired`, `get_request`, `contribution_of` |
//!
//! ## Architecture
//!
//! Registry rules live in [`factory`], the per-request state machine in
//! [`request`], storage layout in `storage`. This file contains only the
//! public entry points and their authorization checks.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, String, Vec};

pub mod events;
pub mod factory;
pub mod request;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_auth;
#[cfg(test)]
mod test_events;

pub use types::{Request, RequestConfig, RequestState, RequestStatus};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Non-positive target or a deadline that is not in the future.
    InvalidParameters = 1,
    /// Pledge of zero or less, or one that would overflow the ledger.
    InvalidAmount     = 2,
    /// Pledge after the deadline or after the target was met.
    FundingClosed     = 3,
    /// Refund before the deadline.
    NotExpired        = 4,
    /// Refund from a request that met its target.
    LimitReached      = 5,
    /// Refund by an address with no outstanding pledge.
    NoContribution    = 6,
    /// Withdrawal by someone other than the owner.
    NotOwner          = 7,
    /// Withdrawal before the target was met.
    LimitNotReached   = 8,
    /// Any value movement after the owner has withdrawn.
    AlreadyDisbursed  = 9,
    /// Unknown request handle.
    RequestNotFound   = 10,
}

#[contract]
pub struct RequestFactory;

#[contractimpl]
impl RequestFactory {
    /// Bind the registry to its funding token. Runs once, at deployment.
    pub fn __constructor(env: Env, token: Address) {
        storage::set_token(&env, &token);
    }

    // ─────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────

    /// Create a request owned by `owner` and return its handle.
    ///
    /// Fails with `InvalidParameters` unless `required_amount > 0` and
    /// `expires_at` is strictly later than the current ledger timestamp.
    pub fn create_request(
        env: Env,
        owner: Address,
        title: String,
        description: String,
        required_amount: i128,
        expires_at: u64,
    ) -> Result<u64, Error> {
        owner.require_auth();
        factory::create_request(&env, owner, title, description, required_amount, expires_at)
    }

    /// Every request handle, in creation order.
    pub fn get_requests(env: Env) -> Vec<u64> {
        factory::list_requests(&env)
    }

    pub fn request_count(env: Env) -> u64 {
        storage::get_request_count(&env)
    }

    pub fn token(env: Env) -> Address {
        storage::get_token(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Per-request operations
    // ─────────────────────────────────────────────────────────

    /// Pledge `amount` of the funding token from `contributor`.
    pub fn donate(env: Env, request_id: u64, contributor: Address, amount: i128) -> Result<(), Error> {
        contributor.require_auth();
        request::donate(&env, request_id, &contributor, amount)
    }

    /// Reclaim the caller's pledge from an expired request that missed its
    /// target. Returns the amount sent back.
    pub fn refund(env: Env, request_id: u64, contributor: Address) -> Result<i128, Error> {
        contributor.require_auth();
        request::refund(&env, request_id, &contributor)
    }

    /// Withdraw the full raised amount to the owner. Returns the amount paid.
    pub fn get_money(env: Env, request_id: u64, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        request::get_money(&env, request_id, &caller)
    }

    pub fn has_reached_limit(env: Env, request_id: u64) -> Result<bool, Error> {
        request::has_reached_limit(&env, request_id)
    }

    pub fn has_expired(env: Env, request_id: u64) -> Result<bool, Error> {
        request::has_expired(&env, request_id)
    }

    /// Full view of a request, including the status derived at call time.
    pub fn get_request(env: Env, request_id: u64) -> Result<Request, Error> {
        request::load(&env, request_id)
    }

    pub fn status(env: Env, request_id: u64) -> Result<RequestStatus, Error> {
        request::status(&env, request_id)
    }

    /// Outstanding pledge of `patron`; `0` if none or already refunded.
    pub fn contribution_of(env: Env, request_id: u64, patron: Address) -> Result<i128, Error> {
        request::contribution_of(&env, request_id, &patron)
    }
}
