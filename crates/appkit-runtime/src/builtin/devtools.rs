use std::sync::Arc;

use serde_json::Value;

use super::{bind, current_surface, Services};
use crate::actions::{ActionModule, ActionResult, Args};
use crate::windows::WindowManager;

pub(super) const SOURCE: &str = "devtools";

pub(super) fn module(services: &Services) -> ActionModule {
    let windows = &services.windows;
    ActionModule::new(SOURCE)
        .action("openDevTools", bind(windows, open_dev_tools))
        .action("closeDevTools", bind(windows, close_dev_tools))
}

async fn open_dev_tools(windows: Arc<WindowManager>, _args: Args) -> ActionResult {
    windows.open_devtools(current_surface(&windows)?)?;
    Ok(Value::Null)
}

async fn close_dev_tools(windows: Arc<WindowManager>, _args: Args) -> ActionResult {
    windows.close_devtools(current_surface(&windows)?)?;
    Ok(Value::Null)
}
