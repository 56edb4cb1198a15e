//! Plain-text transcript output
//!
//! One line per message: `[timestamp] name: content url...`. Content
//! passes through mention resolution only; markup stays as the author
//! typed it.

use std::io::Write;

use scribe_core::{Message, Snowflake};
use scribe_ingest::GuildDirectory;

use crate::assets::{AssetKind, AssetResolver};
use crate::author::{group_by_author, TIMESTAMP_FORMAT};
use crate::error::RenderError;
use crate::mention::ReferenceResolver;

/// Base URL prefixed to resolved attachment paths in text mode.
pub const DEFAULT_CDN_BASE: &str = "https://cdn.discordapp.com/";

/// Line-oriented transcript serializer.
pub struct TextRenderer {
    mentions: ReferenceResolver,
    cdn_base: String,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_CDN_BASE)
    }
}

impl TextRenderer {
    pub fn new(cdn_base: impl Into<String>) -> Self {
        Self {
            mentions: ReferenceResolver::new(),
            cdn_base: cdn_base.into(),
        }
    }

    /// Write the transcript of `messages` to `out`.
    pub fn render(
        &self,
        guild: &GuildDirectory,
        channel_id: Snowflake,
        messages: &[Message],
        assets: &dyn AssetResolver,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        for group in group_by_author(messages) {
            for message in group {
                self.render_message(guild, channel_id, message, assets, out)?;
            }
        }
        Ok(())
    }

    fn render_message(
        &self,
        guild: &GuildDirectory,
        channel_id: Snowflake,
        message: &Message,
        assets: &dyn AssetResolver,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        let sent = message.created_at();
        let author = guild.member_at(message.author_id, sent)?;
        write!(
            out,
            "[{}] {}: ",
            sent.format(TIMESTAMP_FORMAT),
            author.display_name()
        )?;

        if let Some(content) = &message.content {
            let resolved = self
                .mentions
                .resolve(guild, sent, content, |s| s.to_string())?;
            write!(out, "{resolved} ")?;
        }

        for attachment in &message.attachment_ids {
            let path = assets
                .resolve(AssetKind::Attachment, channel_id, &attachment.to_string())
                .ok_or(RenderError::MissingAttachment {
                    channel: channel_id,
                    attachment: *attachment,
                })?;
            write!(out, "{}{} ", self.cdn_base, path.display())?;
        }
        writeln!(out)?;
        Ok(())
    }
}
