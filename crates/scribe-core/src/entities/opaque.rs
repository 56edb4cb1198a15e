//! Opaque record - uninterpreted entity payloads
//!
//! Guild, channel, and emoji events are tracked for presence but their
//! columns are never interpreted by the exporter.

/// Pass-through fields of an entity the exporter does not interpret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpaqueRecord {
    pub fields: Vec<String>,
}

impl OpaqueRecord {
    /// Wrap raw log columns
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }
}
