use std::sync::Arc;

use appkit_common::{Event, EventBus};
use serde_json::Value;
use tracing::info;

use super::{bind, Services};
use crate::actions::{ActionModule, ActionResult, Args};

pub(super) const SOURCE: &str = "app";

pub(super) fn module(services: &Services) -> ActionModule {
    let events = &services.events;
    ActionModule::new(SOURCE)
        .action("env", bind(events, env))
        .action("quit", bind(events, quit))
}

async fn env(_events: Arc<EventBus>, args: Args) -> ActionResult {
    let key: String = args.required(0, "key")?;
    Ok(std::env::var(&key).map(Value::String).unwrap_or(Value::Null))
}

async fn quit(events: Arc<EventBus>, _args: Args) -> ActionResult {
    info!("quit requested by a surface");
    events.publish(Event::QuitRequested);
    Ok(Value::Null)
}
