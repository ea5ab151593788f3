//! Contract events. Each is published only after its operation has fully
//! succeeded, with topics `(symbol, request_id)`.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestCreated {
    pub request_id: u64,
    pub owner: Address,
    pub required_amount: i128,
    pub expires_at: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Donated {
    pub request_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Refunded {
    pub request_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Disbursed {
    pub request_id: u64,
    pub owner: Address,
    pub amount: i128,
}

pub fn emit_request_created(env: &Env, event: RequestCreated) {
    env.events()
        .publish((symbol_short!("created"), event.request_id), event);
}

pub fn emit_donated(env: &Env, event: Donated) {
    env.events()
        .publish((symbol_short!("donated"), event.request_id), event);
}

pub fn emit_refunded(env: &Env, event: Refunded) {
    env.events()
        .publish((symbol_short!("refunded"), event.request_id), event);
}

pub fn emit_disbursed(env: &Env, event: Disbursed) {
    env.events()
        .publish((symbol_short!("disbursed"), event.request_id), event);
}
