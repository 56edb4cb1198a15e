//! Inline entity references - user and role mentions
//!
//! Mention tokens embed an entity id; the display text is whatever that
//! entity looked like when the message was sent, so resolution runs
//! against the guild timelines as of the message timestamp.

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use tracing::debug;

use scribe_core::{DomainError, Snowflake};
use scribe_ingest::GuildDirectory;

/// Substitutes mention tokens in message text.
///
/// Patterns are compiled once at construction. An id that was never logged
/// is an inconsistent export and the lookup error propagates.
pub struct ReferenceResolver {
    member_re: Regex,
    role_re: Regex,
    channel_re: Regex,
}

impl Default for ReferenceResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceResolver {
    pub fn new() -> Self {
        Self {
            member_re: Regex::new("<@!?([0-9]+)>").expect("static pattern"),
            role_re: Regex::new("<@&([0-9]+)>").expect("static pattern"),
            channel_re: Regex::new("<#([0-9]+)>").expect("static pattern"),
        }
    }

    /// Replace user and role mentions with their as-of display names.
    ///
    /// Every replacement is passed through `wrap` (the HTML renderer marks
    /// mentions with a span; the text renderer wraps with identity).
    /// Channel mentions are left in place unresolved.
    pub fn resolve(
        &self,
        guild: &GuildDirectory,
        at: DateTime<Utc>,
        text: &str,
        wrap: impl Fn(&str) -> String,
    ) -> Result<String, DomainError> {
        let text = substitute(&self.member_re, text, |caps| {
            let Some(id) = mention_id(caps) else {
                return Ok(caps[0].to_string());
            };
            let member = guild.member_at(id, at)?;
            Ok(wrap(&format!("@{}", member.display_name())))
        })?;

        let text = substitute(&self.role_re, &text, |caps| {
            let Some(id) = mention_id(caps) else {
                return Ok(caps[0].to_string());
            };
            let role = guild.role_at(id, at)?;
            Ok(wrap(&format!("@{}", role.name)))
        })?;

        // TODO: resolve channel mentions once channel names are interpreted
        if self.channel_re.is_match(&text) {
            debug!("channel mention left unresolved");
        }
        Ok(text)
    }
}

/// The numeric id captured by a mention pattern, if it fits a snowflake.
fn mention_id(caps: &Captures<'_>) -> Option<Snowflake> {
    Snowflake::parse(&caps[1]).ok()
}

/// `Regex::replace_all` with a fallible replacer.
fn substitute(
    re: &Regex,
    text: &str,
    mut repl: impl FnMut(&Captures<'_>) -> Result<String, DomainError>,
) -> Result<String, DomainError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        out.push_str(&text[last..m.start()]);
        out.push_str(&repl(&caps)?);
        last = m.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}
