//! Replays a request's stored event history into a ledger snapshot and
//! flags any history the escrow contract should never have produced.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::events::{EventKind, EventRecord};

/// Resolution reached so far, judged from events alone.
///
/// Expiry is a clock condition, not an event, so an expired request that
/// nobody has refunded yet still reads as `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Open,
    Refunding,
    Disbursed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestAudit {
    pub request_id: String,
    pub owner: Option<String>,
    pub required_amount: Option<i128>,
    pub raised_amount: i128,
    pub total_pledged: i128,
    pub total_refunded: i128,
    pub disbursed_amount: Option<i128>,
    /// Outstanding pledge per contributor, refunded patrons removed.
    pub patrons: BTreeMap<String, i128>,
    pub outcome: Outcome,
    pub violations: Vec<String>,
}

impl RequestAudit {
    fn new(request_id: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            owner: None,
            required_amount: None,
            raised_amount: 0,
            total_pledged: 0,
            total_refunded: 0,
            disbursed_amount: None,
            patrons: BTreeMap::new(),
            outcome: Outcome::Open,
            violations: Vec::new(),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }

    fn flag(&mut self, record: &EventRecord, message: String) {
        self.violations
            .push(format!("ledger {}: {}", record.ledger, message));
    }
}

/// Replay `records` (already ordered by ledger) for a single request.
pub fn replay(request_id: &str, records: &[EventRecord]) -> RequestAudit {
    let mut audit = RequestAudit::new(request_id);

    for record in records {
        match record.kind() {
            EventKind::RequestCreated => apply_created(&mut audit, record),
            EventKind::Donated => apply_donated(&mut audit, record),
            EventKind::Refunded => apply_refunded(&mut audit, record),
            EventKind::Disbursed => apply_disbursed(&mut audit, record),
            EventKind::Unknown => {}
        }
    }

    if audit.disbursed_amount.is_none() {
        let held = audit
            .patrons
            .values()
            .try_fold(0i128, |sum, pledge| sum.checked_add(*pledge));
        match held {
            Some(held) if held == audit.raised_amount => {}
            Some(held) => audit.violations.push(format!(
                "raised amount {} differs from outstanding pledges {}",
                audit.raised_amount, held
            )),
            None => audit
                .violations
                .push("outstanding pledges overflow the ledger".to_string()),
        }
    }
    audit
}

fn apply_created(audit: &mut RequestAudit, record: &EventRecord) {
    if audit.owner.is_some() {
        audit.flag(record, "request created twice".to_string());
        return;
    }
    audit.owner = record.actor.clone();
    audit.required_amount = record.amount_value();
}

fn apply_donated(audit: &mut RequestAudit, record: &EventRecord) {
    let Some((patron, amount)) = actor_and_amount(audit, record) else {
        return;
    };
    if audit.disbursed_amount.is_some() {
        audit.flag(record, format!("donation of {amount} after disbursement"));
    }
    if let Some(required) = audit.required_amount {
        if audit.raised_amount >= required {
            audit.flag(record, format!("donation of {amount} after target was met"));
        }
    }
    let pledged = audit.patrons.get(&patron).copied().unwrap_or(0);
    let (Some(pledged), Some(raised), Some(total)) = (
        pledged.checked_add(amount),
        audit.raised_amount.checked_add(amount),
        audit.total_pledged.checked_add(amount),
    ) else {
        audit.flag(record, format!("donation of {amount} overflows ledger"));
        return;
    };
    audit.patrons.insert(patron, pledged);
    audit.raised_amount = raised;
    audit.total_pledged = total;
}

fn apply_refunded(audit: &mut RequestAudit, record: &EventRecord) {
    let Some((patron, amount)) = actor_and_amount(audit, record) else {
        return;
    };
    if audit.disbursed_amount.is_some() {
        audit.flag(record, format!("refund of {amount} after disbursement"));
    }
    let (Some(raised), Some(total)) = (
        audit.raised_amount.checked_sub(amount),
        audit.total_refunded.checked_add(amount),
    ) else {
        audit.flag(record, format!("refund of {amount} overflows ledger"));
        return;
    };
    let pledged = audit.patrons.remove(&patron).unwrap_or(0);
    if pledged != amount {
        audit.flag(
            record,
            format!("refund of {amount} to {patron} who had pledged {pledged}"),
        );
    }
    audit.raised_amount = raised;
    audit.total_refunded = total;
    if audit.outcome == Outcome::Open {
        audit.outcome = Outcome::Refunding;
    }
}

fn apply_disbursed(audit: &mut RequestAudit, record: &EventRecord) {
    let amount = record.amount_value().unwrap_or(0);
    if audit.disbursed_amount.is_some() {
        audit.flag(record, "second disbursement".to_string());
        return;
    }
    if audit.outcome == Outcome::Refunding {
        audit.flag(record, "disbursement after refunds".to_string());
    }
    if record.actor.is_some() && record.actor != audit.owner {
        audit.flag(record, "disbursement to an address other than the owner".to_string());
    }
    if amount != audit.raised_amount {
        audit.flag(
            record,
            format!("disbursed {amount} but {} was raised", audit.raised_amount),
        );
    }
    if let Some(required) = audit.required_amount {
        if audit.raised_amount < required {
            audit.flag(record, "disbursement before target was met".to_string());
        }
    }
    audit.disbursed_amount = Some(amount);
    audit.outcome = Outcome::Disbursed;
}

fn actor_and_amount(audit: &mut RequestAudit, record: &EventRecord) -> Option<(String, i128)> {
    match (record.actor.clone(), record.amount_value()) {
        (Some(actor), Some(amount)) if amount > 0 => Some((actor, amount)),
        _ => {
            audit.flag(
                record,
                format!("{} event without a contributor or positive amount", record.event_type),
            );
            None
        }
    }
}
