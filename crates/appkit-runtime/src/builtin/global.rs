use std::sync::Arc;

use serde_json::Value;

use super::{bind, Services};
use crate::actions::{ActionModule, ActionResult, Args};
use crate::state::{GlobalStateStore, GlobalStateValue};

pub(super) const SOURCE: &str = "global";

pub(super) fn module(services: &Services) -> ActionModule {
    let store = &services.store;
    ActionModule::new(SOURCE)
        .action("getGlobalState", bind(store, get_global_state))
        .action("setGlobalState", bind(store, set_global_state))
        .action("getEntireGlobalState", bind(store, get_entire_global_state))
}

async fn get_global_state(store: Arc<GlobalStateStore>, args: Args) -> ActionResult {
    let key: String = args.required(0, "key")?;
    match store.get(&key) {
        Some(value) => Ok(serde_json::to_value(value)?),
        None => Ok(Value::Null),
    }
}

/// Returns whether the write won.
async fn set_global_state(store: Arc<GlobalStateStore>, args: Args) -> ActionResult {
    let key: String = args.required(0, "key")?;
    let value: GlobalStateValue = args.required(1, "value")?;
    Ok(Value::Bool(store.set(&key, value)))
}

async fn get_entire_global_state(store: Arc<GlobalStateStore>, _args: Args) -> ActionResult {
    Ok(serde_json::to_value(store.get_all())?)
}
