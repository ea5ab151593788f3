//! # Types
//!
//! Data structures shared by the factory, the request state machine and
//! storage.
//!
//! ## Config / State split
//!
//! A request is stored as two ledger entries:
//!
//! - [`RequestConfig`]: written once by the factory, never mutated.
//! - [`RequestState`]: rewritten on every donation, refund and disbursement.
//!
//! Per-contributor balances live under their own keys (see `storage`), so
//! neither struct grows with the number of patrons.
//!
//! ## Derived status
//!
//! There is no stored status field. [`RequestStatus::derive`] recomputes the
//! lifecycle position from the raised amount, the disbursement flag and the
//! ledger clock every time it is needed:
//!
//! ```text
//! Active ──► Funded ──► Disbursed
//!    └─────► ExpiredUnfunded
//! ```

use soroban_sdk::{contracttype, Address, String};

/// Lifecycle position of a request, derived at read time.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RequestStatus {
    /// Before the deadline and below target: accepting pledges.
    Active,
    /// Target met; waiting for the owner to withdraw.
    Funded,
    /// Deadline passed below target; contributors may reclaim pledges.
    ExpiredUnfunded,
    /// Owner withdrew the raised amount. No further value movement.
    Disbursed,
}

impl RequestStatus {
    /// Compute the status from immutable config, mutable state and `now`.
    pub fn derive(config: &RequestConfig, state: &RequestState, now: u64) -> Self {
        if state.funds_disbursed {
            Self::Disbursed
        } else if state.has_reached(config.required_amount) {
            Self::Funded
        } else if config.has_expired_at(now) {
            Self::ExpiredUnfunded
        } else {
            Self::Active
        }
    }
}

/// Immutable request parameters, fixed at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestConfig {
    pub id: u64,
    pub owner: Address,
    pub title: String,
    pub description: String,
    pub required_amount: i128,
    pub expires_at: u64,
}

impl RequestConfig {
    /// Strictly after the deadline. A call at exactly `expires_at` is still on time.
    pub fn has_expired_at(&self, now: u64) -> bool {
        now > self.expires_at
    }
}

/// Mutable request state. Kept small because every value-moving call rewrites it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestState {
    /// Sum of all currently held, non-refunded pledges.
    pub raised_amount: i128,
    /// Set once, by the owner's successful withdrawal.
    pub funds_disbursed: bool,
}

impl RequestState {
    pub fn new() -> Self {
        Self {
            raised_amount: 0,
            funds_disbursed: false,
        }
    }

    pub fn has_reached(&self, required_amount: i128) -> bool {
        self.raised_amount >= required_amount
    }
}

impl Default for RequestState {
    fn default() -> Self {
        Self::new()
    }
}

/// Full read view of a request, reconstructed from config and state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    /// Handle returned by `create_request`.
    pub id: u64,
    /// Creator; the only address allowed to withdraw.
    pub owner: Address,
    pub title: String,
    pub description: String,
    /// Target in the funding token's smallest unit.
    pub required_amount: i128,
    /// Ledger timestamp after which pledges are rejected.
    pub expires_at: u64,
    pub raised_amount: i128,
    pub funds_disbursed: bool,
    /// Derived from the fields above and the ledger clock at read time.
    pub status: RequestStatus,
}

impl Request {
    pub fn from_parts(config: RequestConfig, state: RequestState, now: u64) -> Self {
        let status = RequestStatus::derive(&config, &state, now);
        Self {
            id: config.id,
            owner: config.owner,
            title: config.title,
            description: config.description,
            required_amount: config.required_amount,
            expires_at: config.expires_at,
            raised_amount: state.raised_amount,
            funds_disbursed: state.funds_disbursed,
            status,
        }
    }
}
