//! Action definitions and the registry that owns them.

mod args;
mod export;
mod registry;

#[cfg(test)]
mod tests;

pub use args::Args;
pub use export::{action, sync_fn, Action, ActionFn, ActionFuture, ActionModule, ActionResult, Export, SyncFn};
pub use registry::{ActionKey, ActionsRegistry};
