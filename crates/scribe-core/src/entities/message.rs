//! Message entity - a live message assembled from channel log events

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// An assembled chat message.
///
/// There is no creation-time column in the log; the send time is read from
/// the snowflake id. Attachments arrive as separate events and are attached
/// post-hoc, in log order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub author_id: Snowflake,
    pub content: Option<String>,
    pub edited_at: Option<DateTime<Utc>>,
    pub attachment_ids: Vec<Snowflake>,
    /// Consumed from the log but never rendered
    pub reaction_ids: Vec<Snowflake>,
}

impl Message {
    /// Create a new message with no content yet
    pub fn new(id: Snowflake, author_id: Snowflake) -> Self {
        Self {
            id,
            author_id,
            content: None,
            edited_at: None,
            attachment_ids: Vec::new(),
            reaction_ids: Vec::new(),
        }
    }

    /// Send time embedded in the message id
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.id.created_at()
    }

    /// Check if the message has been edited
    #[inline]
    pub fn is_edited(&self) -> bool {
        self.edited_at.is_some()
    }

    /// Overwrite content and edited timestamp, leaving attachments intact
    pub fn apply_edit(&mut self, content: Option<String>, edited_at: Option<DateTime<Utc>>) {
        self.content = content;
        self.edited_at = edited_at;
    }
}
