//! Render errors

use thiserror::Error;

use scribe_core::{DomainError, Snowflake};

/// Errors raised while serializing the transcript.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A mention or author lookup hit an id the guild log never recorded
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No stored payload exists for an attachment; there is no placeholder
    #[error("no stored payload for attachment {attachment} in channel {channel}")]
    MissingAttachment {
        channel: Snowflake,
        attachment: Snowflake,
    },

    #[error("I/O error writing transcript: {0}")]
    Io(#[from] std::io::Error),
}
