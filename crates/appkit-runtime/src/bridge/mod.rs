//! Request/response plumbing between surfaces and registered actions.
//!
//! - [`IpcBridge`] runs incoming [`InvokeRequest`](crate::protocol::InvokeRequest)s
//!   under the caller's context and answers exactly once per request.
//! - [`InvokeClient`] is the renderer-side half: it numbers calls and settles
//!   them by `invokeId` as responses arrive, in any order.
//! - [`spawn_state_fanout`] pushes global-state changes to every live surface.

mod client;
mod dispatch;
mod fanout;
mod sink;

pub use client::{InvokeClient, PendingCall};
pub use dispatch::IpcBridge;
pub use fanout::spawn_state_fanout;
pub use sink::{ChannelSink, ResponseSink};
