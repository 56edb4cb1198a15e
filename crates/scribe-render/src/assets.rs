//! Asset resolution seam
//!
//! Locating avatar images and attachment payloads on disk belongs to the
//! caller; the renderers only need this lookup capability.

use std::path::PathBuf;

use scribe_core::Snowflake;

/// What kind of stored asset is being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Avatar,
    Attachment,
}

/// Lookup of stored asset payloads.
///
/// For avatars, `owner` is the user id and `asset` the avatar hash; for
/// attachments, `owner` is the channel id and `asset` the attachment id.
/// `None` means no payload exists; the caller decides whether that is
/// recoverable (avatars fall back to a default image, attachments do not).
pub trait AssetResolver {
    fn resolve(&self, kind: AssetKind, owner: Snowflake, asset: &str) -> Option<PathBuf>;
}

/// Default-avatar path for a member with no stored avatar.
pub(crate) fn default_avatar_path(discriminator: u16) -> String {
    format!("embed/avatars/{}.png", discriminator % 5)
}
