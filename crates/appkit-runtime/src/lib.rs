//! Main-process runtime for appkit.
//!
//! Exposes named async actions to sandboxed renderer surfaces:
//! - Action registry keyed by `(namespace, source, name)` with hot-swappable
//!   `user` namespace
//! - Caller context that tells an action which surface invoked it
//! - Window manager that addresses surfaces by logical channel
//! - Global state store with last-write-wins conflict resolution
//! - IPC bridge that correlates requests and responses by `invokeId`

pub mod actions;
pub mod app;
pub mod bridge;
pub mod builtin;
pub mod context;
pub mod protocol;
pub mod state;
pub mod windows;

pub use actions::{action, Action, ActionFn, ActionModule, ActionsRegistry, Args, Export};
pub use app::{AppRuntime, AppRuntimeBuilder};
pub use bridge::{ChannelSink, InvokeClient, IpcBridge, PendingCall, ResponseSink};
pub use builtin::{register_builtin_actions, Services};
pub use context::{current_caller, run_with_context, run_with_context_sync, spawn_with_caller};
pub use protocol::{ActionError, InvokeRequest, InvokeResponse, OutboundMessage};
pub use state::{GlobalStateStore, GlobalStateValue, StateChange};
pub use windows::{HeadlessHost, OpenOptions, SurfaceHost, SurfaceSelector, WindowManager};
