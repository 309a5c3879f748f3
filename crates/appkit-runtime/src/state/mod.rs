//! Process-wide key/value state shared by every surface.
//!
//! Conflicts are resolved last-write-wins on the value's `updatedAt`
//! timestamp. Applied writes are announced to callback listeners and to
//! broadcast subscribers; rejected writes are silent.

mod store;
mod value;

pub use store::{GlobalStateStore, ListenerId, StateChange};
pub use value::{timestamp_now, GlobalStateValue};
