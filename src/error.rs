//! Top-level error taxonomy for the ingestion pipeline.
//!
//! Classified by blast radius:
//! - auth/config problems abort before any message is processed
//! - source transport problems abort the running batch
//! - store failures at message granularity never reach this type; the
//!   orchestrator records them as skip reasons and moves on

use thiserror::Error;

use crate::gmail::GoogleApiError;
use crate::message::SourceError;
use crate::store::sqlite::DbError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("mail account not linked or token invalid")]
    Auth,

    #[error("message source: {0}")]
    Source(String),

    #[error("store: {0}")]
    Store(#[from] StoreError),

    #[error("database: {0}")]
    Db(#[from] DbError),

    #[error("google api: {0}")]
    Google(#[from] GoogleApiError),

    #[error("config: {0}")]
    Config(String),
}

impl From<SourceError> for IngestError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Auth => IngestError::Auth,
            SourceError::Transport(message) => IngestError::Source(message),
        }
    }
}
