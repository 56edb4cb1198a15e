//! Guild log ingestion - builds per-entity timelines
//!
//! One full pass over the guild log must complete before any message is
//! resolved: a message at time T may need a member version recorded
//! anywhere in the file relative to T, so only timestamps matter, never
//! file position.

use std::io::BufRead;

use tracing::info;

use scribe_core::{
    DomainError, MemberRecord, OpaqueRecord, Permissions, RoleRecord, Snowflake, TimelineMap,
    Version,
};

use crate::error::IngestError;
use crate::record::{parse_line, EntityKind};

/// All timelines reconstructed from one guild log.
///
/// Timelines are read-only once built; the renderer only issues as-of
/// queries against them.
#[derive(Debug, Default)]
pub struct GuildDirectory {
    pub guilds: TimelineMap<OpaqueRecord>,
    pub channels: TimelineMap<OpaqueRecord>,
    pub members: TimelineMap<MemberRecord>,
    pub roles: TimelineMap<RoleRecord>,
    pub emojis: TimelineMap<OpaqueRecord>,
}

impl GuildDirectory {
    /// Ingest a guild log, feeding each timeline its entries in file order.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, IngestError> {
        let mut dir = Self::default();

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let line = line?;
            let Some(rec) = parse_line(&line, line_no)? else {
                continue;
            };

            let tombstone = rec.op.is_tombstone();
            match rec.kind {
                EntityKind::Member => {
                    let member = parse_member_fields(&rec.fields, line_no)?;
                    dir.members
                        .record(rec.id, Version::new(rec.timestamp, tombstone, member));
                }
                EntityKind::Role => {
                    let role = parse_role_fields(&rec.fields, line_no)?;
                    dir.roles
                        .record(rec.id, Version::new(rec.timestamp, tombstone, role));
                }
                EntityKind::Guild => {
                    dir.guilds.record(
                        rec.id,
                        Version::new(rec.timestamp, tombstone, OpaqueRecord::new(rec.fields)),
                    );
                }
                EntityKind::Channel => {
                    dir.channels.record(
                        rec.id,
                        Version::new(rec.timestamp, tombstone, OpaqueRecord::new(rec.fields)),
                    );
                }
                EntityKind::Emoji => {
                    dir.emojis.record(
                        rec.id,
                        Version::new(rec.timestamp, tombstone, OpaqueRecord::new(rec.fields)),
                    );
                }
                // message-scope events do not belong in the guild log
                EntityKind::Message | EntityKind::Attachment | EntityKind::Reaction => {}
            }
        }

        info!(
            members = dir.members.len(),
            roles = dir.roles.len(),
            channels = dir.channels.len(),
            emojis = dir.emojis.len(),
            "guild log ingested"
        );
        Ok(dir)
    }

    /// Member fields in effect at `at`
    pub fn member_at(
        &self,
        id: Snowflake,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<&MemberRecord, DomainError> {
        Ok(&self
            .members
            .get(id, DomainError::UnknownMember)?
            .as_of(at)
            .data)
    }

    /// Role fields in effect at `at`
    pub fn role_at(
        &self,
        id: Snowflake,
        at: chrono::DateTime<chrono::Utc>,
    ) -> Result<&RoleRecord, DomainError> {
        Ok(&self.roles.get(id, DomainError::UnknownRole)?.as_of(at).data)
    }
}

/// Member columns: `name, discriminator[, avatar[, nickname[, role_ids]]]`.
/// Empty optional columns mean absent; `role_ids` is comma-separated.
fn parse_member_fields(fields: &[String], line_no: usize) -> Result<MemberRecord, IngestError> {
    let [name, discriminator, rest @ ..] = fields else {
        return Err(IngestError::Malformed {
            line: line_no,
            detail: "member line needs name and discriminator".to_string(),
        });
    };

    let discriminator = discriminator
        .parse::<u16>()
        .map_err(|_| IngestError::Malformed {
            line: line_no,
            detail: format!("bad discriminator: {discriminator:?}"),
        })?;

    let mut member = MemberRecord::new(name.clone(), discriminator);
    member.avatar = rest.first().filter(|s| !s.is_empty()).cloned();
    member.nickname = rest.get(1).filter(|s| !s.is_empty()).cloned();
    if let Some(roles) = rest.get(2) {
        for part in roles.split(',').filter(|p| !p.is_empty()) {
            let role_id = Snowflake::parse(part).map_err(|_| IngestError::Malformed {
                line: line_no,
                detail: format!("bad role id in member roles: {part:?}"),
            })?;
            member.role_ids.push(role_id);
        }
    }
    Ok(member)
}

/// Role columns: `name[, color[, position[, permissions[, hoist]]]]`.
/// Missing trailing columns default; `hoist` is truthy when non-empty.
fn parse_role_fields(fields: &[String], line_no: usize) -> Result<RoleRecord, IngestError> {
    let Some(name) = fields.first() else {
        return Err(IngestError::Malformed {
            line: line_no,
            detail: "role line needs a name".to_string(),
        });
    };

    let color = parse_numeric_column(fields.get(1), 0, line_no, "color")?;
    let position = parse_numeric_column(fields.get(2), 0, line_no, "position")?;
    let permissions = match fields.get(3).filter(|s| !s.is_empty()) {
        Some(raw) => Permissions::parse(raw).map_err(|_| IngestError::Malformed {
            line: line_no,
            detail: format!("bad permissions mask: {raw:?}"),
        })?,
        None => Permissions::empty(),
    };

    let mut role = RoleRecord::new(name.clone(), color, position, permissions);
    role.hoist = fields.get(4).is_some_and(|s| !s.is_empty());
    Ok(role)
}

fn parse_numeric_column(
    value: Option<&String>,
    default: i32,
    line_no: usize,
    what: &str,
) -> Result<i32, IngestError> {
    match value.filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse::<i32>().map_err(|_| IngestError::Malformed {
            line: line_no,
            detail: format!("bad {what}: {raw:?}"),
        }),
        None => Ok(default),
    }
}
