//! Ingest errors

use thiserror::Error;

use crate::pending::PendingConflict;

/// Errors raised while reading and reconstructing the event logs.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error reading log: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed log line {line}: {detail}")]
    Malformed { line: usize, detail: String },

    #[error("bad timestamp on log line {line}: {source}")]
    Timestamp {
        line: usize,
        source: chrono::format::ParseError,
    },

    /// The log violated the at-most-one-pending-owner ordering assumption
    #[error(transparent)]
    PendingConflict(#[from] PendingConflict),
}
