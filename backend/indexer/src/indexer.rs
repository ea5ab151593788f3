//! Background task that follows the registry's event stream: polls
//! `getEvents`, keeps the four escrow event kinds, and records where it got to.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db;
use crate::errors::Result;
use crate::events::{EscrowEvent, EventKind};
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Position in the event stream: the ledger to scan from, plus the RPC's
/// pagination cursor when a page boundary fell inside that ledger range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub ledger: u32,
    pub cursor: Option<String>,
}

/// Escrow events from one poll, with everything else already dropped.
#[derive(Debug, Default)]
pub struct Batch {
    pub events: Vec<EscrowEvent>,
    pub dropped: usize,
    pub kinds: BTreeMap<&'static str, usize>,
    pub requests: BTreeSet<String>,
}

impl Batch {
    pub fn sort(decoded: Vec<EscrowEvent>) -> Self {
        let mut batch = Batch::default();
        for event in decoded {
            let kind = EventKind::from_stored(&event.event_type);
            if kind == EventKind::Unknown {
                batch.dropped += 1;
                continue;
            }
            *batch.kinds.entry(kind.as_str()).or_insert(0) += 1;
            if let Some(id) = &event.request_id {
                batch.requests.insert(id.clone());
            }
            batch.events.push(event);
        }
        batch
    }

    /// `donated=2 refunded=1`
    pub fn describe_kinds(&self) -> String {
        self.kinds
            .iter()
            .map(|(kind, n)| format!("{kind}={n}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub async fn run(state: Arc<IndexerState>) {
    let configured_start = state.config.start_ledger;
    info!(
        "Indexer following registry {} from ledger {configured_start}",
        state.config.contract_id
    );

    let mut checkpoint = match resume(&state.pool, configured_start).await {
        Ok(checkpoint) => checkpoint,
        Err(e) => {
            warn!("Cannot read persisted checkpoint, starting at ledger {configured_start}: {e}");
            Checkpoint {
                ledger: configured_start,
                cursor: None,
            }
        }
    };
    info!(
        "Resuming at ledger {} (cursor: {})",
        checkpoint.ledger,
        checkpoint.cursor.as_deref().unwrap_or("none")
    );

    loop {
        match poll_once(&state.pool, &state.client, &state.config, &checkpoint).await {
            Ok(next) => checkpoint = next,
            Err(e) => error!("Poll from ledger {} failed: {e}", checkpoint.ledger),
        }
        tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)).await;
    }
}

/// The stored checkpoint, or `configured_start` when nothing has been indexed.
pub async fn resume(pool: &SqlitePool, configured_start: u32) -> Result<Checkpoint> {
    let persisted = db::get_last_ledger(pool).await?;
    let cursor = db::get_cursor_string(pool).await?;
    let ledger = match u32::try_from(persisted) {
        Ok(ledger) if ledger > 0 => ledger,
        _ => configured_start,
    };
    Ok(Checkpoint { ledger, cursor })
}

/// Store the escrow events of a decoded page. Returns the sorted batch and
/// how many of its events were new.
pub async fn store_batch(pool: &SqlitePool, decoded: Vec<EscrowEvent>) -> Result<(Batch, usize)> {
    let batch = Batch::sort(decoded);
    if batch.dropped > 0 {
        debug!("Dropped {} events of unrecognised kind", batch.dropped);
    }
    let inserted = if batch.events.is_empty() {
        0
    } else {
        db::insert_events(pool, &batch.events).await?
    };
    Ok((batch, inserted))
}

async fn poll_once(
    pool: &SqlitePool,
    client: &Client,
    config: &Config,
    from: &Checkpoint,
) -> Result<Checkpoint> {
    let (raw_events, next_cursor, latest_ledger) = rpc::fetch_events(
        client,
        &config.rpc_url,
        &config.contract_id,
        from.ledger,
        from.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !raw_events.is_empty() {
        let decoded = rpc::decode_events(&raw_events, &config.contract_id);
        let (batch, inserted) = store_batch(pool, decoded).await?;
        if !batch.events.is_empty() {
            info!(
                "Stored {inserted}/{} escrow events [{}] for requests {:?}",
                batch.events.len(),
                batch.describe_kinds(),
                batch.requests
            );
        }
    }

    let next = Checkpoint {
        ledger: latest_ledger
            .and_then(|l| u32::try_from(l).ok())
            .map_or(from.ledger, |l| l.max(from.ledger)),
        cursor: next_cursor,
    };
    db::save_cursor(pool, i64::from(next.ledger), next.cursor.as_deref()).await?;
    Ok(next)
}
