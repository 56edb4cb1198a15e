//! Entity records - typed field-snapshots parsed from the event logs

mod member;
mod message;
mod opaque;
mod role;

pub use member::MemberRecord;
pub use message::Message;
pub use opaque::OpaqueRecord;
pub use role::RoleRecord;
