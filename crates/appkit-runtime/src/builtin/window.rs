use std::sync::Arc;

use appkit_common::{SurfaceHandle, SurfaceId};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{bind, current_surface, Services};
use crate::actions::{ActionModule, ActionResult, Args};
use crate::protocol::ActionError;
use crate::windows::{Dimensions, OpenOptions, SurfaceSelector, WindowFlag, WindowManager};

pub(super) const SOURCE: &str = "window";

/// `(action, flag, argument name)`. Every flag action takes one bool and
/// acts on the caller.
const FLAG_ACTIONS: [(&str, WindowFlag, &str); 10] = [
    ("setResizable", WindowFlag::Resizable, "resizable"),
    ("setMovable", WindowFlag::Movable, "movable"),
    ("setAlwaysOnTop", WindowFlag::AlwaysOnTop, "alwaysOnTop"),
    ("setFullScreen", WindowFlag::FullScreen, "fullScreen"),
    ("setShowInTaskbar", WindowFlag::ShowInTaskbar, "show"),
    ("setClosable", WindowFlag::Closable, "closable"),
    ("setMinimizable", WindowFlag::Minimizable, "minimizable"),
    ("setMaximizable", WindowFlag::Maximizable, "maximizable"),
    ("setMenuBarVisibility", WindowFlag::MenuBarVisible, "visible"),
    ("setWindowControlsVisibility", WindowFlag::WindowControlsVisible, "visible"),
];

#[derive(Debug, Default, Deserialize)]
struct CreateOptions {
    channel: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CloseOptions {
    window: Option<SurfaceHandle>,
    window_at_channel: Option<String>,
}

pub(super) fn module(services: &Services) -> ActionModule {
    let windows = &services.windows;
    let module = ActionModule::new(SOURCE)
        .action("createNewWindow", bind(windows, create_new_window))
        .action("close", bind(windows, close))
        .action("show", bind(windows, show))
        .action("hide", bind(windows, hide))
        .action("focus", bind(windows, focus))
        .action("setTitle", bind(windows, set_title))
        .action("currentWindow", bind(windows, current_window))
        .action("setDimensions", bind(windows, set_dimensions))
        .action("centerWindow", bind(windows, center_window));

    FLAG_ACTIONS
        .into_iter()
        .fold(module, |module, (name, flag, arg)| {
            module.action(
                name,
                bind(windows, move |windows, args| set_flag(windows, args, flag, arg)),
            )
        })
}

async fn create_new_window(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    let path: String = args.required(0, "windowPath")?;
    let options: CreateOptions = args.optional(1, "opts")?.unwrap_or_default();
    let id = windows.open(
        &path,
        OpenOptions {
            channel: options.channel,
        },
    )?;
    Ok(serde_json::to_value(SurfaceHandle::from(id))?)
}

async fn close(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    let options: CloseOptions = args.optional(0, "opts")?.unwrap_or_default();
    let selector = match (options.window, options.window_at_channel) {
        (Some(handle), _) => SurfaceSelector::Id(handle.id),
        (None, Some(channel)) => SurfaceSelector::Channel(channel),
        (None, None) => SurfaceSelector::Id(current_surface(&windows)?),
    };
    windows.close(&selector)?;
    Ok(Value::Null)
}

async fn show(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    windows.show(target(&windows, &args)?)?;
    Ok(Value::Null)
}

async fn hide(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    windows.hide(target(&windows, &args)?)?;
    Ok(Value::Null)
}

async fn focus(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    windows.focus(target(&windows, &args)?)?;
    Ok(Value::Null)
}

async fn set_title(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    let title: String = args.required(0, "title")?;
    windows.set_title(current_surface(&windows)?, &title)?;
    Ok(Value::Null)
}

async fn set_dimensions(windows: Arc<WindowManager>, args: Args) -> ActionResult {
    let dimensions: Dimensions = args.optional(0, "dimensions")?.unwrap_or_default();
    windows.set_dimensions(current_surface(&windows)?, &dimensions)?;
    Ok(Value::Null)
}

async fn center_window(windows: Arc<WindowManager>, _args: Args) -> ActionResult {
    windows.center(current_surface(&windows)?)?;
    Ok(Value::Null)
}

async fn set_flag(windows: Arc<WindowManager>, args: Args, flag: WindowFlag, arg: &'static str) -> ActionResult {
    let enabled: bool = args.required(0, arg)?;
    windows.set_flag(current_surface(&windows)?, flag, enabled)?;
    Ok(Value::Null)
}

async fn current_window(windows: Arc<WindowManager>, _args: Args) -> ActionResult {
    let id = current_surface(&windows)?;
    Ok(json!({ "id": id, "channel": windows.channel_of(id) }))
}

/// The handler passed as the first argument, or the caller's own surface.
fn target(windows: &WindowManager, args: &Args) -> Result<SurfaceId, ActionError> {
    match args.optional::<SurfaceHandle>(0, "windowHandler")? {
        Some(handle) => Ok(handle.id),
        None => current_surface(windows),
    }
}
