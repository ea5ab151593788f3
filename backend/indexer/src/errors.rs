//! Failure modes of the escrow indexer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    /// Reading or writing the SQLite event store.
    #[error("event store: {0}")]
    Store(#[from] sqlx::Error),

    #[error("event store migration: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// The RPC endpoint could not be reached or its body could not be read.
    #[error("RPC transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// `getEvents` was refused with an error that retrying will not fix.
    #[error("RPC rejected getEvents ({code}): {message}")]
    RpcRejected { code: i64, message: String },

    #[error("RPC returned neither a result nor an error for getEvents")]
    EmptyResponse,

    #[error("{0} is required")]
    MissingSetting(&'static str),

    #[error("{key} has invalid value {value:?}")]
    InvalidSetting { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, IndexerError>;
