extern crate std;

use soroban_sdk::{
    testutils::{Address as _, AuthorizedFunction, Ledger, MockAuth, MockAuthInvoke},
    token, Address, Env, IntoVal, String, Symbol,
};

use crate::{RequestFactory, RequestFactoryClient};

const GOAL: i128 = 1_000;

fn setup() -> (Env, RequestFactoryClient<'static>, token::StellarAssetClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let token_admin = Address::generate(&env);
    let asset = env.register_stellar_asset_contract_v2(token_admin);
    let contract_id = env.register(RequestFactory, (asset.address(),));
    let client = RequestFactoryClient::new(&env, &contract_id);
    let minter = token::StellarAssetClient::new(&env, &asset.address());
    (env, client, minter)
}

fn create(env: &Env, client: &RequestFactoryClient, owner: &Address) -> u64 {
    client.create_request(
        owner,
        &String::from_str(env, "Well"),
        &String::from_str(env, "Village well pump"),
        &GOAL,
        &(env.ledger().timestamp() + 3_600),
    )
}

/// The last top-level call was authorized by `signer` alone, for `function`
/// on the registry.
fn assert_signed_by(env: &Env, client: &RequestFactoryClient, signer: &Address, function: &str) {
    let auths = env.auths();
    assert_eq!(auths.len(), 1, "expected exactly one signer for {function}");
    let (address, invocation) = &auths[0];
    assert_eq!(address, signer);
    match &invocation.function {
        AuthorizedFunction::Contract((contract, name, _)) => {
            assert_eq!(contract, &client.address);
            assert_eq!(name, &Symbol::new(env, function));
        }
        _ => panic!("{function} was not authorized as a contract call"),
    }
}

#[test]
fn test_create_request_is_signed_by_owner() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);

    create(&env, &client, &owner);
    assert_signed_by(&env, &client, &owner, "create_request");
}

#[test]
fn test_donate_is_signed_by_contributor() {
    let (env, client, minter) = setup();
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    minter.mint(&contributor, &GOAL);
    let id = create(&env, &client, &owner);

    client.donate(&id, &contributor, &400);
    assert_signed_by(&env, &client, &contributor, "donate");
}

#[test]
fn test_refund_is_signed_by_contributor() {
    let (env, client, minter) = setup();
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    minter.mint(&contributor, &GOAL);
    let id = create(&env, &client, &owner);
    client.donate(&id, &contributor, &400);

    env.ledger().with_mut(|li| li.timestamp += 3_601);
    client.refund(&id, &contributor);
    assert_signed_by(&env, &client, &contributor, "refund");
}

#[test]
fn test_get_money_is_signed_by_owner() {
    let (env, client, minter) = setup();
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    minter.mint(&contributor, &GOAL);
    let id = create(&env, &client, &owner);
    client.donate(&id, &contributor, &GOAL);

    client.get_money(&id, &owner);
    assert_signed_by(&env, &client, &owner, "get_money");
}

#[test]
fn test_donate_without_contributor_signature_fails() {
    let (env, client, minter) = setup();
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    let stranger = Address::generate(&env);
    minter.mint(&contributor, &GOAL);
    let id = create(&env, &client, &owner);

    // Only the stranger signs; the pledge names the contributor.
    env.mock_auths(&[MockAuth {
        address: &stranger,
        invoke: &MockAuthInvoke {
            contract: &client.address,
            fn_name: "donate",
            args: (id, contributor.clone(), 400i128).into_val(&env),
            sub_invokes: &[],
        },
    }]);
    assert!(client.try_donate(&id, &contributor, &400).is_err());

    env.mock_all_auths();
    assert_eq!(client.contribution_of(&id, &contributor), 0);
    assert_eq!(client.get_request(&id).raised_amount, 0);
}

#[test]
fn test_get_money_without_owner_signature_fails() {
    let (env, client, minter) = setup();
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    minter.mint(&contributor, &GOAL);
    let id = create(&env, &client, &owner);
    client.donate(&id, &contributor, &GOAL);

    env.set_auths(&[]);
    assert!(client.try_get_money(&id, &owner).is_err());

    env.mock_all_auths();
    assert!(!client.get_request(&id).funds_disbursed);
}
