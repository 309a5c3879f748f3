//! Demo `user` actions served by the binary.
//!
//! The provider is compiled in, so a reload registers the same actions again.
//! It exercises the registry's atomic swap rather than picking up new code.

use std::sync::Arc;

use appkit_runtime::actions::ActionResult;
use appkit_runtime::{current_caller, ActionModule, AppRuntime, Args, GlobalStateStore, Services};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub fn modules(services: &Services) -> Vec<ActionModule> {
    let store = Arc::clone(&services.store);
    vec![
        ActionModule::new("actions/greeting").action("hello", hello),
        ActionModule::new("actions/counter")
            .action("increment", move |_| increment(Arc::clone(&store))),
        ActionModule::new("actions/system").action("info", system_info),
    ]
}

async fn hello(params: Vec<Value>) -> ActionResult {
    let name: Option<String> = Args::new(params).optional(0, "name")?;
    Ok(json!(format!("Hello, {}!", name.as_deref().unwrap_or("world"))))
}

/// Bump the shared `counter` key and return the new value. A counter holding
/// anything but an integer restarts from zero.
async fn increment(store: Arc<GlobalStateStore>) -> ActionResult {
    let written = store.update("counter", |current| {
        let n = current.and_then(|value| value.data.as_i64()).unwrap_or(0);
        json!(n.saturating_add(1))
    });
    Ok(written.data)
}

/// Re-register the `user` actions once per trigger until every sender is gone.
pub async fn reload_on(runtime: Arc<AppRuntime>, mut triggers: mpsc::Receiver<()>) {
    while triggers.recv().await.is_some() {
        match runtime.reload_user_actions() {
            Ok(count) => info!(count, "user actions reloaded"),
            Err(e) => warn!(error = %e, "user action reload rejected, keeping previous actions"),
        }
    }
}

async fn system_info(_params: Vec<Value>) -> ActionResult {
    Ok(json!({
        "os": std::env::consts::OS,
        "arch": std::env::consts::ARCH,
        "version": env!("CARGO_PKG_VERSION"),
        "caller": current_caller()?.get(),
    }))
}
