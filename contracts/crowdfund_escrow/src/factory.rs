//! Request registry: validates creation parameters, allocates handles and
//! enumerates every request ever created.

use soroban_sdk::{Address, Env, String, Vec};

use crate::events::{self, RequestCreated};
use crate::storage;
use crate::types::{RequestConfig, RequestState};
use crate::Error;

/// Validate and register a new request owned by `owner`.
///
/// Both checks run before anything is written, so a rejected call leaves the
/// registry untouched.
pub fn create_request(
    env: &Env,
    owner: Address,
    title: String,
    description: String,
    required_amount: i128,
    expires_at: u64,
) -> Result<u64, Error> {
    if required_amount <= 0 {
        return Err(Error::InvalidParameters);
    }
    if expires_at <= env.ledger().timestamp() {
        return Err(Error::InvalidParameters);
    }

    let id = storage::get_and_increment_request_id(env);
    let config = RequestConfig {
        id,
        owner: owner.clone(),
        title,
        description,
        required_amount,
        expires_at,
    };
    storage::save_request(env, &config, &RequestState::new());

    events::emit_request_created(
        env,
        RequestCreated {
            request_id: id,
            owner,
            required_amount,
            expires_at,
        },
    );
    Ok(id)
}

/// All request handles in creation order.
///
/// IDs are allocated sequentially and only on successful creation, so the
/// counter alone describes the registry.
pub fn list_requests(env: &Env) -> Vec<u64> {
    let count = storage::get_request_count(env);
    let mut ids = Vec::new(env);
    for id in 0..count {
        ids.push_back(id);
    }
    ids
}
