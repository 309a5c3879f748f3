//! Caller context: which surface issued the invocation being executed.
//!
//! Backed by a tokio task-local, so the value follows the invocation across
//! every `.await` inside it and is invisible to concurrently running
//! invocations. Scopes nest; the innermost caller wins for its extent and
//! the outer one is restored afterwards, including when the inner future
//! panics.

use std::future::Future;

use appkit_common::{ContextError, SurfaceId};
use tokio::task::JoinHandle;

tokio::task_local! {
    static CALLER: SurfaceId;
}

/// Run `fut` with `surface` as the current caller.
pub fn run_with_context<F>(surface: SurfaceId, fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    CALLER.scope(surface, fut)
}

/// Synchronous counterpart of [`run_with_context`].
pub fn run_with_context_sync<R>(surface: SurfaceId, f: impl FnOnce() -> R) -> R {
    CALLER.sync_scope(surface, f)
}

/// The surface that triggered the current invocation.
pub fn current_caller() -> Result<SurfaceId, ContextError> {
    CALLER.try_with(|surface| *surface).map_err(|_| ContextError::NoContext)
}

/// Spawn a task that keeps the current caller, if any.
///
/// Task-locals are not inherited by `tokio::spawn`; background work started
/// from inside an action should go through here.
pub fn spawn_with_caller<F>(fut: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match current_caller() {
        Ok(surface) => tokio::spawn(CALLER.scope(surface, fut)),
        Err(_) => tokio::spawn(fut),
    }
}
