//! Canonical event types emitted by the crowdfund escrow contract.
//!
//! These mirror the Soroban events defined in
//! `contracts/crowdfund_escrow/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the escrow contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new request was registered (`created` topic).
    RequestCreated,
    /// A contributor pledged to a request (`donated` topic).
    Donated,
    /// A contributor reclaimed a pledge (`refunded` topic).
    Refunded,
    /// The owner withdrew the raised amount (`disbursed` topic).
    Disbursed,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::RequestCreated,
            "donated" => Self::Donated,
            "refunded" => Self::Refunded,
            "disbursed" => Self::Disbursed,
            _ => Self::Unknown,
        }
    }

    /// Short identifier stored in the `event_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequestCreated => "request_created",
            Self::Donated => "donated",
            Self::Refunded => "refunded",
            Self::Disbursed => "disbursed",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`], used when replaying stored rows.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "request_created" => Self::RequestCreated,
            "donated" => Self::Donated,
            "refunded" => Self::Refunded,
            "disbursed" => Self::Disbursed,
            _ => Self::Unknown,
        }
    }
}

/// A fully decoded escrow event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowEvent {
    pub event_type: String,
    pub request_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    /// Unique per on-chain event; re-inserting the same key is a no-op.
    pub event_key: String,
}

/// An event row as read back from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_type: String,
    pub request_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

impl EventRecord {
    pub fn kind(&self) -> EventKind {
        EventKind::from_stored(&self.event_type)
    }

    /// Amount column parsed as a token quantity.
    pub fn amount_value(&self) -> Option<i128> {
        self.amount.as_deref().and_then(|a| a.parse().ok())
    }
}
