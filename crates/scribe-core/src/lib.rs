//! # scribe-core
//!
//! Domain layer for the transcript exporter: versioned entity records,
//! per-entity timelines with as-of lookup, and shared value objects.
//! This crate has zero dependencies on log parsing or rendering.

pub mod entities;
pub mod error;
pub mod timeline;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{MemberRecord, Message, OpaqueRecord, RoleRecord};
pub use error::DomainError;
pub use timeline::{Timeline, TimelineMap, Version};
pub use value_objects::{Permissions, Snowflake, SnowflakeParseError};
