//! Channel log assembly - ordered live messages from interleaved events
//!
//! The channel log interleaves message, attachment, and reaction events.
//! Companion events may precede the creation event of the message they
//! belong to; the pending buffers reconcile that, under the writer's
//! guarantee that at most one message's companions are in flight at once.

use std::io::BufRead;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use scribe_core::{Message, Snowflake};

use crate::error::IngestError;
use crate::pending::PendingBuffer;
use crate::record::{parse_line, EntityKind, Op, RawRecord};

/// Undo the writer's escaping of message content.
///
/// Exactly three sequences are escaped upstream: newline, tab, and
/// backslash. A single forward scan inverts them; any other backslash
/// pair is preserved verbatim.
pub fn unescape_content(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Consumes channel log events into an ordered collection of live messages.
///
/// Messages keep log order (which is creation order); deletion removes a
/// message outright, so later events see no trace of it.
#[derive(Debug)]
pub struct ChannelAssembler {
    messages: IndexMap<Snowflake, Message>,
    pending_attachments: PendingBuffer,
    pending_reactions: PendingBuffer,
}

impl Default for ChannelAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelAssembler {
    pub fn new() -> Self {
        Self {
            messages: IndexMap::new(),
            pending_attachments: PendingBuffer::new("attachment"),
            pending_reactions: PendingBuffer::new("reaction"),
        }
    }

    /// Assemble a whole channel log.
    pub fn from_reader(reader: impl BufRead) -> Result<Vec<Message>, IngestError> {
        let mut assembler = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let Some(rec) = parse_line(&line, line_no)? else {
                continue;
            };
            assembler.apply(rec, line_no)?;
        }
        Ok(assembler.finish())
    }

    /// Apply one parsed event.
    pub fn apply(&mut self, rec: RawRecord, line_no: usize) -> Result<(), IngestError> {
        match rec.kind {
            EntityKind::Message => self.apply_message(rec, line_no),
            EntityKind::Attachment => self.apply_companion(rec, line_no, Companion::Attachment),
            EntityKind::Reaction => self.apply_companion(rec, line_no, Companion::Reaction),
            // guild-scope events do not belong in the channel log
            _ => Ok(()),
        }
    }

    /// Extract the assembled messages, dropping any unmatched pending items.
    pub fn finish(self) -> Vec<Message> {
        if let Some(owner) = self.pending_attachments.owner() {
            warn!(%owner, "attachment events never matched a message creation");
        }
        if let Some(owner) = self.pending_reactions.owner() {
            warn!(%owner, "reaction events never matched a message creation");
        }
        info!(messages = self.messages.len(), "channel log assembled");
        self.messages.into_values().collect()
    }

    fn apply_message(&mut self, rec: RawRecord, line_no: usize) -> Result<(), IngestError> {
        if rec.op == Op::Del {
            // removed outright: no tombstone, edit history unrecoverable
            if self.messages.shift_remove(&rec.id).is_some() {
                debug!(id = %rec.id, "message deleted");
            }
            return Ok(());
        }

        let Some((author_id, rest)) = rec.fields.split_first() else {
            return Err(IngestError::Malformed {
                line: line_no,
                detail: "message line needs an author id".to_string(),
            });
        };
        let body = parse_message_body(rest, line_no)?;

        if let Some(existing) = self.messages.get_mut(&rec.id) {
            // edit: content and edited timestamp only, attachments untouched
            existing.apply_edit(body.content, body.edited_at);
            return Ok(());
        }

        let author_id = Snowflake::parse(author_id).map_err(|_| IngestError::Malformed {
            line: line_no,
            detail: format!("bad author id: {author_id:?}"),
        })?;

        let mut message = Message::new(rec.id, author_id);
        message.content = body.content;
        message.edited_at = body.edited_at;
        if let Some(items) = self.pending_attachments.take(rec.id) {
            message.attachment_ids = items;
        }
        if let Some(items) = self.pending_reactions.take(rec.id) {
            message.reaction_ids = items;
        }
        self.messages.insert(rec.id, message);
        Ok(())
    }

    fn apply_companion(
        &mut self,
        rec: RawRecord,
        line_no: usize,
        companion: Companion,
    ) -> Result<(), IngestError> {
        if rec.op == Op::Del {
            debug!(id = %rec.id, "ignoring companion removal event");
            return Ok(());
        }

        let Some(owner) = rec.fields.first() else {
            return Err(IngestError::Malformed {
                line: line_no,
                detail: "companion line needs an owning message id".to_string(),
            });
        };
        let owner = Snowflake::parse(owner).map_err(|_| IngestError::Malformed {
            line: line_no,
            detail: format!("bad owning message id: {owner:?}"),
        })?;

        if let Some(message) = self.messages.get_mut(&owner) {
            match companion {
                Companion::Attachment => message.attachment_ids.push(rec.id),
                Companion::Reaction => message.reaction_ids.push(rec.id),
            }
            return Ok(());
        }

        // owner not created yet: hold until its creation event arrives
        let buffer = match companion {
            Companion::Attachment => &mut self.pending_attachments,
            Companion::Reaction => &mut self.pending_reactions,
        };
        buffer.try_attach(owner, rec.id)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Companion {
    Attachment,
    Reaction,
}

struct MessageBody {
    content: Option<String>,
    edited_at: Option<DateTime<Utc>>,
}

/// Message columns after the author id: nothing, or `edited \t tts \t
/// content` (tts is read and ignored; empty edited means never edited).
fn parse_message_body(rest: &[String], line_no: usize) -> Result<MessageBody, IngestError> {
    if rest.is_empty() {
        return Ok(MessageBody {
            content: None,
            edited_at: None,
        });
    }

    let [edited, _tts, content, ..] = rest else {
        return Err(IngestError::Malformed {
            line: line_no,
            detail: "message line with body needs edited, tts, and content columns".to_string(),
        });
    };

    let edited_at = if edited.is_empty() {
        None
    } else {
        Some(
            DateTime::parse_from_str(edited, "%+")
                .map_err(|source| IngestError::Timestamp {
                    line: line_no,
                    source,
                })?
                .with_timezone(&Utc),
        )
    };

    Ok(MessageBody {
        content: Some(unescape_content(content)),
        edited_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn assemble(log: &str) -> Vec<Message> {
        ChannelAssembler::from_reader(Cursor::new(log)).unwrap()
    }

    #[test]
    fn test_unescape_three_rules() {
        assert_eq!(unescape_content(r"a\nb\tc"), "a\nb\tc");
        assert_eq!(unescape_content(r"back\\slash"), r"back\slash");
    }

    #[test]
    fn test_unescape_leaves_other_pairs() {
        assert_eq!(unescape_content(r"not \x escaped"), r"not \x escaped");
        assert_eq!(unescape_content("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_unescape_escaped_backslash_before_n() {
        // writer escaped a literal backslash, then a literal 'n' follows
        assert_eq!(unescape_content(r"a\\nb"), r"a\nb");
    }

    #[test]
    fn test_message_created_with_content() {
        let msgs = assemble(
            "2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t100\t10\t\tfalse\thello\\nworld\n",
        );
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].author_id, Snowflake::new(10));
        assert_eq!(msgs[0].content.as_deref(), Some("hello\nworld"));
        assert!(msgs[0].edited_at.is_none());
    }

    #[test]
    fn test_message_without_body() {
        let msgs = assemble("2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t100\t10\n");
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].content.is_none());
    }

    #[test]
    fn test_edit_overwrites_content_only() {
        let log = "\
2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t100\t10\t\tfalse\tfirst
2020-01-01T00:01:00+00:00\t-\tadd\tattachment\t200\t100
2020-01-01T00:02:00+00:00\t-\tadd\tmessage\t100\t10\t2020-01-01T00:02:00+00:00\tfalse\tsecond
";
        let msgs = assemble(log);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].content.as_deref(), Some("second"));
        assert!(msgs[0].is_edited());
        // attachments survive the edit
        assert_eq!(msgs[0].attachment_ids, vec![Snowflake::new(200)]);
    }

    #[test]
    fn test_edit_is_idempotent() {
        let edit =
            "2020-01-01T00:02:00+00:00\t-\tadd\tmessage\t100\t10\t2020-01-01T00:02:00+00:00\tfalse\tfinal";
        let once = assemble(&format!(
            "2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t100\t10\t\tfalse\tfirst\n{edit}\n"
        ));
        let twice = assemble(&format!(
            "2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t100\t10\t\tfalse\tfirst\n{edit}\n{edit}\n"
        ));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_delete_removes_entirely() {
        let log = "\
2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t100\t10\t\tfalse\tsoon gone
2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t101\t10\t\tfalse\tstays
2020-01-01T00:05:00+00:00\t-\tdel\tmessage\t100\t10
";
        let msgs = assemble(log);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].id, Snowflake::new(101));
    }

    #[test]
    fn test_attachment_after_creation() {
        let log = "\
2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t100\t10
2020-01-01T00:00:01+00:00\t-\tadd\tattachment\t200\t100
";
        let msgs = assemble(log);
        assert_eq!(msgs[0].attachment_ids, vec![Snowflake::new(200)]);
    }

    #[test]
    fn test_attachment_before_creation_is_reconciled() {
        let log = "\
2020-01-01T00:00:00+00:00\t-\tadd\tattachment\t200\t100
2020-01-01T00:00:00+00:00\t-\tadd\tattachment\t201\t100
2020-01-01T00:00:01+00:00\t-\tadd\tmessage\t100\t10
";
        let msgs = assemble(log);
        assert_eq!(
            msgs[0].attachment_ids,
            vec![Snowflake::new(200), Snowflake::new(201)]
        );
    }

    #[test]
    fn test_attachment_ordering_equivalence() {
        let before = assemble(
            "2020-01-01T00:00:00+00:00\t-\tadd\tattachment\t200\t100\n\
             2020-01-01T00:00:01+00:00\t-\tadd\tmessage\t100\t10\n",
        );
        let after = assemble(
            "2020-01-01T00:00:01+00:00\t-\tadd\tmessage\t100\t10\n\
             2020-01-01T00:00:02+00:00\t-\tadd\tattachment\t200\t100\n",
        );
        assert_eq!(before[0].attachment_ids, after[0].attachment_ids);
    }

    #[test]
    fn test_pending_conflict_is_fatal() {
        let log = "\
2020-01-01T00:00:00+00:00\t-\tadd\tattachment\t200\t100
2020-01-01T00:00:00+00:00\t-\tadd\tattachment\t201\t999
";
        let err = ChannelAssembler::from_reader(Cursor::new(log)).unwrap_err();
        assert!(matches!(err, IngestError::PendingConflict(_)));
    }

    #[test]
    fn test_reactions_consumed_but_inert() {
        let log = "\
2020-01-01T00:00:00+00:00\t-\tadd\treaction\t300\t100
2020-01-01T00:00:01+00:00\t-\tadd\tmessage\t100\t10
";
        let msgs = assemble(log);
        assert_eq!(msgs[0].reaction_ids, vec![Snowflake::new(300)]);
    }

    #[test]
    fn test_messages_keep_log_order() {
        let log = "\
2020-01-01T00:00:00+00:00\t-\tadd\tmessage\t100\t10\t\tfalse\tone
2020-01-01T00:00:01+00:00\t-\tadd\tmessage\t101\t11\t\tfalse\ttwo
2020-01-01T00:00:02+00:00\t-\tadd\tmessage\t102\t10\t\tfalse\tthree
";
        let ids: Vec<_> = assemble(log).into_iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec![Snowflake::new(100), Snowflake::new(101), Snowflake::new(102)]
        );
    }
}
