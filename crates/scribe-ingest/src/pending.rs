//! Pending buffer - holding area for companion events that precede their owner
//!
//! Attachment (and reaction) events may appear in the channel log before
//! the creation event of the message that owns them. The upstream writer
//! guarantees at most one message's companions are in flight at a time;
//! the buffer asserts that invariant rather than enforcing ordering.

use thiserror::Error;

use scribe_core::Snowflake;

/// A second owner id arrived while another owner's items were buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pending {kind} owner mismatch ({held} != {got})")]
pub struct PendingConflict {
    pub kind: &'static str,
    pub held: Snowflake,
    pub got: Snowflake,
}

/// Single-owner buffer of companion item ids.
///
/// While non-empty, every buffered item belongs to the one recorded owner.
#[derive(Debug)]
pub struct PendingBuffer {
    kind: &'static str,
    owner: Option<Snowflake>,
    items: Vec<Snowflake>,
}

impl PendingBuffer {
    /// Create an empty buffer; `kind` names the companion event in errors
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            owner: None,
            items: Vec::new(),
        }
    }

    /// Buffer `item` for `owner`.
    ///
    /// Opens the buffer when empty; appends when the owner matches;
    /// fails on a different owner.
    pub fn try_attach(&mut self, owner: Snowflake, item: Snowflake) -> Result<(), PendingConflict> {
        match self.owner {
            None => {
                self.owner = Some(owner);
                self.items.push(item);
                Ok(())
            }
            Some(held) if held == owner => {
                self.items.push(item);
                Ok(())
            }
            Some(held) => Err(PendingConflict {
                kind: self.kind,
                held,
                got: owner,
            }),
        }
    }

    /// Drain all buffered items if they belong to `owner`
    pub fn take(&mut self, owner: Snowflake) -> Option<Vec<Snowflake>> {
        if self.owner == Some(owner) {
            self.owner = None;
            Some(std::mem::take(&mut self.items))
        } else {
            None
        }
    }

    /// The owner whose items are currently buffered, if any
    pub fn owner(&self) -> Option<Snowflake> {
        self.owner
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_none()
    }
}
