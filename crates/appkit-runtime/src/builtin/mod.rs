//! Actions every app gets under the `builtin` namespace.

mod app;
mod devtools;
mod dialog;
mod global;
mod window;

use std::future::Future;
use std::sync::Arc;

use appkit_common::{ActionNamespace, EventBus, RegistryError, SurfaceId};
use serde_json::Value;
use tracing::info;

use crate::actions::{ActionModule, ActionResult, ActionsRegistry, Args};
use crate::context::current_caller;
use crate::protocol::ActionError;
use crate::state::GlobalStateStore;
use crate::windows::WindowManager;

/// Shared runtime services handed to action providers.
#[derive(Clone)]
pub struct Services {
    pub windows: Arc<WindowManager>,
    pub store: Arc<GlobalStateStore>,
    pub events: Arc<EventBus>,
}

/// Every builtin module, keyed by source id.
pub fn builtin_modules(services: &Services) -> Vec<ActionModule> {
    vec![
        app::module(services),
        devtools::module(services),
        dialog::module(services),
        global::module(services),
        window::module(services),
    ]
}

/// Register all builtin actions. Returns how many were registered.
pub fn register_builtin_actions(
    registry: &ActionsRegistry,
    services: &Services,
) -> Result<usize, RegistryError> {
    let count = registry.replace_namespace(ActionNamespace::Builtin, &builtin_modules(services))?;
    info!(count, "builtin actions registered");
    Ok(count)
}

/// Adapt `f(shared, args)` into an action handler that owns a clone of `shared`.
fn bind<S, F, Fut>(shared: &Arc<S>, f: F) -> impl Fn(Vec<Value>) -> Fut + Send + Sync + 'static
where
    S: Send + Sync + ?Sized + 'static,
    F: Fn(Arc<S>, Args) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    let shared = Arc::clone(shared);
    move |params| f(Arc::clone(&shared), Args::new(params))
}

/// The caller's surface if there is a live one. Never fails.
fn caller_surface_if_exists(windows: &WindowManager) -> Option<SurfaceId> {
    current_caller()
        .ok()
        .and_then(|caller| windows.get_by_id(caller).ok())
}

/// The live surface that issued the current invocation.
fn current_surface(windows: &WindowManager) -> Result<SurfaceId, ActionError> {
    let caller = current_caller()?;
    windows.get_by_id(caller).map_err(|_| {
        ActionError::new(
            "NoWindowContextError",
            "cannot find the current window context; was this action called from a window?",
        )
    })
}
