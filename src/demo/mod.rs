//! Recording source: the `.dlog` format exported from match demos
//!
//! A recording holds a session header, one JSON record per frame, and compact
//! event lines interleaved in the order the demo produced them.

mod error;
mod events;
pub mod format;
mod source;
mod types;

pub use error::{DemoError, FormatError, RecordError};
pub use events::{DomainEvent, EffectKind, EventKind, GrenadeDetonation};
pub use format::{Record, parse_record, serialize_record};
pub use source::{DemoSource, Events, Frames, RecordReader, SourceItem};
pub use types::{
    Equipment, RawBomb, RawFrame, RawGrenade, RawInferno, RawParticipant, RawTeam, SessionHeader,
    Team, Weapon,
};
