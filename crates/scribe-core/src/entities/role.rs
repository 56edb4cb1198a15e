//! Role record - one logged version of a guild role

use crate::value_objects::Permissions;

/// A role's fields as they stood at one point in the guild log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    pub name: String,
    /// Packed RGB color; 0 means unset
    pub color: i32,
    /// Display priority; the highest position wins for member coloring
    pub position: i32,
    pub permissions: Permissions,
    pub hoist: bool,
}

impl RoleRecord {
    /// Create a role record
    pub fn new(name: impl Into<String>, color: i32, position: i32, permissions: Permissions) -> Self {
        Self {
            name: name.into(),
            color,
            position,
            permissions,
            hoist: false,
        }
    }

    /// Check if the role carries a display color
    #[inline]
    pub fn has_color(&self) -> bool {
        self.color != 0
    }

    /// Get the color as a 6-digit hex string (without #)
    pub fn color_hex(&self) -> String {
        format!("{:06x}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex() {
        let mut role = RoleRecord::new("Red", 0xFF0000, 1, Permissions::empty());
        assert_eq!(role.color_hex(), "ff0000");

        role.color = 0x00FF00;
        assert_eq!(role.color_hex(), "00ff00");
    }

    #[test]
    fn test_has_color() {
        let role = RoleRecord::new("Plain", 0, 1, Permissions::empty());
        assert!(!role.has_color());

        let role = RoleRecord::new("Red", 0xFF0000, 1, Permissions::empty());
        assert!(role.has_color());
    }
}
