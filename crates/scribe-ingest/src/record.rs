//! Raw log records - one parsed TSV line
//!
//! Line layout: `timestamp \t reserved \t op \t kind \t id \t fields...`.
//! Timestamps are ISO-8601 with a timezone offset and normalise to UTC.

use chrono::{DateTime, Utc};

use scribe_core::Snowflake;

use crate::error::IngestError;

/// Log operation. Anything other than `add` counts as a removal, matching
/// the writer's two-valued column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Del,
}

impl Op {
    fn from_column(s: &str) -> Self {
        if s == "add" {
            Op::Add
        } else {
            Op::Del
        }
    }

    /// Whether this operation records a tombstone
    #[inline]
    pub fn is_tombstone(self) -> bool {
        matches!(self, Op::Del)
    }
}

/// Entity kind named in a log line's fourth column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Guild,
    Channel,
    Member,
    Role,
    Emoji,
    Message,
    Attachment,
    Reaction,
}

impl EntityKind {
    fn from_column(s: &str) -> Option<Self> {
        match s {
            "guild" => Some(Self::Guild),
            "channel" => Some(Self::Channel),
            "member" => Some(Self::Member),
            "role" => Some(Self::Role),
            "emoji" => Some(Self::Emoji),
            "message" => Some(Self::Message),
            "attachment" => Some(Self::Attachment),
            "reaction" => Some(Self::Reaction),
            _ => None,
        }
    }
}

/// One parsed log line, fields not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub timestamp: DateTime<Utc>,
    pub op: Op,
    pub kind: EntityKind,
    pub id: Snowflake,
    pub fields: Vec<String>,
}

/// Parse a single log line.
///
/// Returns `Ok(None)` for blank lines and for entity kinds this build does
/// not know (forward compatibility). A short or unparseable line for a
/// recognised layout fails fast.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<RawRecord>, IngestError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut columns = line.split('\t');
    let ts = next_column(&mut columns, line_no, "timestamp")?;
    let _reserved = next_column(&mut columns, line_no, "reserved")?;
    let op = next_column(&mut columns, line_no, "operation")?;
    let kind = next_column(&mut columns, line_no, "entity kind")?;
    let id = next_column(&mut columns, line_no, "entity id")?;

    let Some(kind) = EntityKind::from_column(kind) else {
        return Ok(None);
    };

    let timestamp = DateTime::parse_from_str(ts, "%+")
        .map_err(|source| IngestError::Timestamp {
            line: line_no,
            source,
        })?
        .with_timezone(&Utc);

    let id = Snowflake::parse(id).map_err(|_| IngestError::Malformed {
        line: line_no,
        detail: format!("entity id is not a snowflake: {id:?}"),
    })?;

    Ok(Some(RawRecord {
        timestamp,
        op: Op::from_column(op),
        kind,
        id,
        fields: columns.map(str::to_owned).collect(),
    }))
}

fn next_column<'a>(
    columns: &mut impl Iterator<Item = &'a str>,
    line_no: usize,
    what: &str,
) -> Result<&'a str, IngestError> {
    columns.next().ok_or_else(|| IngestError::Malformed {
        line: line_no,
        detail: format!("missing {what} column"),
    })
}
