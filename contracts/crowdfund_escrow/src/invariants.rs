#![allow(dead_code)]

extern crate std;

use crate::types::{Request, RequestStatus};

/// INV-1: The raised amount equals the sum of all outstanding patron balances.
pub fn assert_conservation(request: &Request, patron_balances: &[i128]) {
    let sum: i128 = patron_balances.iter().sum();
    assert_eq!(
        request.raised_amount, sum,
        "INV-1 violated: request {} raised {} but patrons hold {}",
        request.id, request.raised_amount, sum
    );
}

/// INV-2: No balance, total or individual, is ever negative.
pub fn assert_balances_non_negative(request: &Request, patron_balances: &[i128]) {
    assert!(
        request.raised_amount >= 0,
        "INV-2 violated: request {} has negative raised amount ({})",
        request.id,
        request.raised_amount
    );
    for balance in patron_balances {
        assert!(
            *balance >= 0,
            "INV-2 violated: request {} has a negative patron balance ({})",
            request.id,
            balance
        );
    }
}

/// INV-3: The target is always positive.
pub fn assert_required_positive(request: &Request) {
    assert!(
        request.required_amount > 0,
        "INV-3 violated: request {} has non-positive target ({})",
        request.id,
        request.required_amount
    );
}

/// INV-4: The reported status agrees with the stored fields.
pub fn assert_status_consistent(request: &Request, now: u64) {
    let expected = if request.funds_disbursed {
        RequestStatus::Disbursed
    } else if request.raised_amount >= request.required_amount {
        RequestStatus::Funded
    } else if now > request.expires_at {
        RequestStatus::ExpiredUnfunded
    } else {
        RequestStatus::Active
    };
    assert_eq!(
        request.status, expected,
        "INV-4 violated: request {} reports {:?}, fields imply {:?}",
        request.id, request.status, expected
    );
}

/// INV-5: Status only moves forward:
///   Active          -> Funded | ExpiredUnfunded
///   Funded          -> Disbursed
///   ExpiredUnfunded -> (none)
///   Disbursed       -> (none)
///
/// Staying put is always allowed.
pub fn assert_valid_status_transition(from: &RequestStatus, to: &RequestStatus) {
    let valid = from == to
        || matches!(
            (from, to),
            (RequestStatus::Active, RequestStatus::Funded)
                | (RequestStatus::Active, RequestStatus::ExpiredUnfunded)
                | (RequestStatus::Funded, RequestStatus::Disbursed)
        );

    assert!(
        valid,
        "INV-5 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-6: Fields fixed at creation never change.
pub fn assert_immutable_fields(original: &Request, current: &Request) {
    assert_eq!(original.id, current.id, "INV-6 violated: request id changed");
    assert_eq!(
        original.owner, current.owner,
        "INV-6 violated: request owner changed"
    );
    assert_eq!(
        original.title, current.title,
        "INV-6 violated: request title changed"
    );
    assert_eq!(
        original.description, current.description,
        "INV-6 violated: request description changed"
    );
    assert_eq!(
        original.required_amount, current.required_amount,
        "INV-6 violated: request required_amount changed"
    );
    assert_eq!(
        original.expires_at, current.expires_at,
        "INV-6 violated: request expires_at changed"
    );
}

/// INV-7: A request never both refunds a contributor and pays its owner.
pub fn assert_exclusive_fates(refunded_any: bool, disbursed: bool) {
    assert!(
        !(refunded_any && disbursed),
        "INV-7 violated: request both refunded a contributor and disbursed to its owner"
    );
}

/// Run all stateless request invariants.
pub fn assert_all_request_invariants(request: &Request, patron_balances: &[i128], now: u64) {
    assert_conservation(request, patron_balances);
    assert_balances_non_negative(request, patron_balances);
    assert_required_positive(request);
    assert_status_consistent(request, now);
}
