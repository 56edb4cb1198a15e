//! Member record - one logged version of a guild member

use crate::value_objects::Snowflake;

/// A member's fields as they stood at one point in the guild log.
///
/// Trailing columns (avatar, nickname, roles) are optional in the log and
/// default to absent/empty when the line is short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub name: String,
    pub discriminator: u16,
    pub avatar: Option<String>,
    pub nickname: Option<String>,
    pub role_ids: Vec<Snowflake>,
}

impl MemberRecord {
    /// Create a record with only the mandatory columns set
    pub fn new(name: impl Into<String>, discriminator: u16) -> Self {
        Self {
            name: name.into(),
            discriminator,
            avatar: None,
            nickname: None,
            role_ids: Vec::new(),
        }
    }

    /// Get display name (nickname if set, otherwise username)
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.name)
    }

    /// Default-avatar bucket used when no avatar asset exists
    #[inline]
    pub fn default_avatar_index(&self) -> u16 {
        self.discriminator % 5
    }

    /// Check if member holds a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }
}
