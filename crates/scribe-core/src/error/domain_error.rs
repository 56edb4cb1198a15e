//! Domain errors - lookup failures against reconstructed timelines

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors.
///
/// An id that was never logged indicates an inconsistent export; lookups
/// surface that to the caller instead of recovering.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Member not found: {0}")]
    UnknownMember(Snowflake),

    #[error("Role not found: {0}")]
    UnknownRole(Snowflake),

    #[error("Channel not found: {0}")]
    UnknownChannel(Snowflake),

    #[error("Guild not found: {0}")]
    UnknownGuild(Snowflake),
}

impl DomainError {
    /// The id the failed lookup was for
    pub fn entity_id(&self) -> Snowflake {
        match self {
            Self::UnknownMember(id)
            | Self::UnknownRole(id)
            | Self::UnknownChannel(id)
            | Self::UnknownGuild(id) => *id,
        }
    }
}
