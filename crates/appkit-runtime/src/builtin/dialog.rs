use std::sync::Arc;

use appkit_common::{SurfaceId, WindowError};
use serde_json::{json, Value};

use super::{bind, caller_surface_if_exists, Services};
use crate::actions::{ActionModule, ActionResult, Args};
use crate::protocol::ActionError;
use crate::windows::{AlertOptions, MessageBox, OpenDialogOptions, SaveDialogOptions, WindowManager};

pub(super) const SOURCE: &str = "dialog";

pub(super) fn module(services: &Services) -> ActionModule {
    let windows = &services.windows;
    ActionModule::new(SOURCE)
        .action("showOpenDialog", bind(windows, show_open_dialog))
        .action("showSaveDialog", bind(windows, show_save_dialog))
        .action("alert", bind(windows, alert))
}

// Dialogs attach to the caller's surface when there is one, unless the
// options say otherwise. No caller means an unattached dialog, not an error.
fn parent(windows: &WindowManager, attach_to_window: Option<bool>) -> Option<SurfaceId> {
    if attach_to_window == Some(false) {
        return None;
    }
    caller_surface_if_exists(windows)
}

// Host dialogs may block until the user answers.
async fn blocking<T, F>(windows: Arc<WindowManager>, f: F) -> Result<T, ActionError>
where
    T: Send + 'static,
    F: FnOnce(&WindowManager) -> Result<T, WindowError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&windows))
        .await
        .map_err(|e| ActionError::new("DialogFailedError", e.to_string()))?
        .map_err(ActionError::from)
}

async fn show_open_dialog(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    let options: OpenDialogOptions = args.optional(0, "opts")?.unwrap_or_default();
    let parent = parent(&windows, options.file.attach_to_window);
    let result = blocking(windows, move |w| w.show_open_dialog(parent, &options)).await?;
    Ok(serde_json::to_value(result)?)
}

async fn show_save_dialog(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    let options: SaveDialogOptions = args.optional(0, "opts")?.unwrap_or_default();
    let parent = parent(&windows, options.attach_to_window);
    let result = blocking(windows, move |w| w.show_save_dialog(parent, &options)).await?;
    Ok(serde_json::to_value(result)?)
}

async fn alert(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    let message = match args.optional::<Value>(0, "message")? {
        Some(Value::String(text)) => text,
        Some(other) => other.to_string(),
        None => String::new(),
    };
    let options: AlertOptions = args.optional(1, "opts")?.unwrap_or_default();
    let parent = parent(&windows, options.attach_to_window);
    let message_box = MessageBox {
        message,
        title: options.title,
        buttons: options.buttons.unwrap_or_default(),
        skin: options.skin,
    };
    let outcome = blocking(windows, move |w| w.show_message_box(parent, &message_box)).await?;
    Ok(json!({ "result": outcome }))
}
