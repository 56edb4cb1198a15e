//! HTML transcript output
//!
//! Emits a fragment of `msg` blocks; the caller wraps it in a complete
//! page and supplies the styling. Consecutive messages from one author
//! share a block: one avatar and author header, several content and
//! attachment regions.

use std::io::Write;

use scribe_core::{Message, Snowflake};
use scribe_ingest::GuildDirectory;

use crate::assets::{default_avatar_path, AssetKind, AssetResolver};
use crate::author::{author_view, group_by_author, AuthorView, TIMESTAMP_FORMAT};
use crate::emoji::EmojiRewriter;
use crate::error::RenderError;
use crate::escape::escape_html;
use crate::markup::MarkupPipeline;
use crate::mention::ReferenceResolver;

/// HTML fragment serializer.
pub struct HtmlRenderer {
    mentions: ReferenceResolver,
    emoji: EmojiRewriter,
    markup: MarkupPipeline,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self {
            mentions: ReferenceResolver::new(),
            emoji: EmojiRewriter::new(),
            markup: MarkupPipeline::new(),
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
            self.render_group(guild, channel_id, group, assets, out)?;
        }
        Ok(())
    }

    fn render_group(
        &self,
        guild: &GuildDirectory,
        channel_id: Snowflake,
        group: &[Message],
        assets: &dyn AssetResolver,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        let first = &group[0];
        let started = first.created_at();
        let author = author_view(guild, first.author_id, started)?;

        writeln!(out, "<div class=\"msg\">")?;
        writeln!(out, "\t<div class=\"msg-left\">")?;
        let avatar = avatar_path(&author, first.author_id, assets);
        writeln!(out, "\t\t<img class=\"msg-avatar\" src=\"{}\">", escape_html(&avatar))?;
        writeln!(out, "\t</div>")?;
        writeln!(out, "\t<div class=\"msg-right\">")?;

        write!(out, "\t\t<span class=\"msg-user\"")?;
        if let Some(color) = author.color {
            write!(out, " style=\"color: #{color:06x}\"")?;
        }
        writeln!(
            out,
            " title=\"{}#{}\">{}</span>",
            escape_html(&author.name),
            author.discriminator,
            escape_html(&author.display_name)
        )?;
        writeln!(
            out,
            "\t\t<span class=\"msg-date\">{}</span>",
            started.format(TIMESTAMP_FORMAT)
        )?;

        for message in group {
            self.render_body(guild, channel_id, message, assets, out)?;
        }

        writeln!(out, "\t</div>")?;
        writeln!(out, "</div>")?;
        Ok(())
    }

    fn render_body(
        &self,
        guild: &GuildDirectory,
        channel_id: Snowflake,
        message: &Message,
        assets: &dyn AssetResolver,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        if let Some(content) = &message.content {
            let sent = message.created_at();
            let rewritten = self.emoji.rewrite(content);
            let resolved = self.mentions.resolve(guild, sent, &rewritten, |s| {
                format!("<span class=\"mention\">{s}</span>")
            })?;
            writeln!(
                out,
                "\t\t<div class=\"msg-content\">{}</div>",
                self.markup.to_html(&resolved)
            )?;
        }

        for attachment in &message.attachment_ids {
            let path = assets
                .resolve(AssetKind::Attachment, channel_id, &attachment.to_string())
                .ok_or(RenderError::MissingAttachment {
                    channel: channel_id,
                    attachment: *attachment,
                })?;
            let path = escape_html(&path.display().to_string());
            writeln!(out, "\t\t<div class=\"msg-attachment\">")?;
            writeln!(out, "\t\t\t<a href=\"{path}\">")?;
            writeln!(out, "\t\t\t\t<img class=\"msg-attachment\" src=\"{path}\">")?;
            writeln!(out, "\t\t\t</a>")?;
            writeln!(out, "\t\t</div>")?;
        }
        Ok(())
    }
}

/// Stored avatar when one exists, default-avatar path otherwise.
fn avatar_path(author: &AuthorView, author_id: Snowflake, assets: &dyn AssetResolver) -> String {
    author
        .avatar
        .as_deref()
        .and_then(|hash| assets.resolve(AssetKind::Avatar, author_id, hash))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| default_avatar_path(author.discriminator))
}
