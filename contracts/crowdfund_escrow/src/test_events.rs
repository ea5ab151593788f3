extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{Disbursed, Donated, RequestCreated, Refunded};
use crate::{RequestFactory, RequestFactoryClient};

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

fn create(env: &Env, client: &RequestFactoryClient, owner: &Address, goal: i128) -> u64 {
    client.create_request(
        owner,
        &String::from_str(env, "Roof repair"),
        &String::from_str(env, "New roof for the community hall"),
        &goal,
        &(env.ledger().timestamp() + 3_600),
    )
}

#[test]
fn test_request_created_event() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let goal = 5_000i128;
    let expires_at = env.ledger().timestamp() + 3_600;

    let id = create(&env, &client, &owner, goal);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RequestCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RequestCreated {
            request_id: id,
            owner,
            required_amount: goal,
            expires_at,
        }
    );
}

#[test]
fn test_donated_event() {
    let (env, client, minter) = setup();
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    let id = create(&env, &client, &owner, 10_000);

    minter.mint(&contributor, &1_000);
    client.donate(&id, &contributor, &1_000);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("donated").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Donated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Donated {
            request_id: id,
            contributor,
            amount: 1_000,
        }
    );
}

#[test]
fn test_refunded_event() {
    let (env, client, minter) = setup();
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    let id = create(&env, &client, &owner, 10_000);

    minter.mint(&contributor, &400);
    client.donate(&id, &contributor, &400);
    env.ledger().with_mut(|li| li.timestamp += 86_400);
    client.refund(&id, &contributor);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("refunded").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Refunded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Refunded {
            request_id: id,
            contributor,
            amount: 400,
        }
    );
}

#[test]
fn test_disbursed_event() {
    let (env, client, minter) = setup();
    let owner = Address::generate(&env);
    let contributor = Address::generate(&env);
    let id = create(&env, &client, &owner, 1_000);

    minter.mint(&contributor, &1_500);
    client.donate(&id, &contributor, &1_500);
    client.get_money(&id, &owner);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("disbursed").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Disbursed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Disbursed {
            request_id: id,
            owner,
            amount: 1_500,
        }
    );
}
