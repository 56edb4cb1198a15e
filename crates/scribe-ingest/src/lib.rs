//! # scribe-ingest
//!
//! Log layer: parses the tab-separated event logs and reconstructs state
//! from them. The guild log becomes a set of per-entity timelines; the
//! channel log becomes an ordered collection of live messages.
//!
//! Both logs are trusted to be chronologically append-ordered; ingestion
//! neither sorts nor validates order.

pub mod channel;
pub mod error;
pub mod guild;
pub mod pending;
pub mod record;

pub use channel::{unescape_content, ChannelAssembler};
pub use error::IngestError;
pub use guild::GuildDirectory;
pub use pending::{PendingBuffer, PendingConflict};
pub use record::{parse_line, EntityKind, Op, RawRecord};
