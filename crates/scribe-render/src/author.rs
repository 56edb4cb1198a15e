//! Author resolution and message grouping
//!
//! Both output modes resolve an author's display fields as of the send
//! time and group consecutive messages from the same author into one
//! visual block; only the serialization differs.

use chrono::{DateTime, Utc};

use scribe_core::{DomainError, Message, Snowflake};
use scribe_ingest::GuildDirectory;

/// Timestamp format used by both transcript modes.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An author's display fields as they stood at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorView {
    pub display_name: String,
    pub name: String,
    pub discriminator: u16,
    pub avatar: Option<String>,
    /// Color of the member's highest-positioned role, when non-zero
    pub color: Option<i32>,
}

/// Resolve an author's display fields as of `at`.
///
/// The member's roles are ranked by position; the highest position wins
/// for color, and a zero color means unset. Role ids the guild log never
/// recorded are fatal, like any other reference.
pub fn author_view(
    guild: &GuildDirectory,
    author_id: Snowflake,
    at: DateTime<Utc>,
) -> Result<AuthorView, DomainError> {
    let member = guild.member_at(author_id, at)?;

    let mut top: Option<&scribe_core::RoleRecord> = None;
    for role_id in &member.role_ids {
        let role = guild.role_at(*role_id, at)?;
        if top.map_or(true, |t: &_| role.position > t.position) {
            top = Some(role);
        }
    }
    let color = top.filter(|r| r.has_color()).map(|r| r.color);

    Ok(AuthorView {
        display_name: member.display_name().to_string(),
        name: member.name.clone(),
        discriminator: member.discriminator,
        avatar: member.avatar.clone(),
        color,
    })
}

/// Split a time-ordered message slice into runs of consecutive messages
/// sharing one author.
pub fn group_by_author(messages: &[Message]) -> impl Iterator<Item = &[Message]> {
    messages.chunk_by(|a, b| a.author_id == b.author_id)
}
