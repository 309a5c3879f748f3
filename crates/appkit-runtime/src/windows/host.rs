use appkit_common::{HostError, SurfaceId};

use super::dialog::{MessageBox, OpenDialogOptions, OpenDialogResult, SaveDialogOptions, SaveDialogResult};
use super::geometry::{Bounds, Size, WindowFlag};

/// Called once by the host when a surface goes away through [`SurfaceHost::close`]
/// or user action.
pub type CloseHook = Box<dyn FnOnce(SurfaceId) + Send>;

/// The windowing collaborator.
///
/// `create` must not run `on_closed` before it returns. `close` may run it
/// synchronously, so implementations must not hold their own locks while
/// doing so.
///
/// Geometry, flags and dialogs default to [`HostError::Unsupported`]. Dialog
/// calls may block until the user answers; `parent` is `None` for a dialog
/// not attached to any surface.
pub trait SurfaceHost: Send + Sync {
    /// Open a new, hidden surface showing `path`.
    fn create(&self, path: &str, on_closed: CloseHook) -> Result<SurfaceId, HostError>;

    fn navigate(&self, id: SurfaceId, path: &str) -> Result<(), HostError>;

    fn show(&self, id: SurfaceId) -> Result<(), HostError>;

    fn hide(&self, id: SurfaceId) -> Result<(), HostError>;

    fn focus(&self, id: SurfaceId) -> Result<(), HostError>;

    fn close(&self, id: SurfaceId) -> Result<(), HostError>;

    fn set_title(&self, id: SurfaceId, title: &str) -> Result<(), HostError>;

    fn open_devtools(&self, _id: SurfaceId) -> Result<(), HostError> {
        Ok(())
    }

    fn close_devtools(&self, _id: SurfaceId) -> Result<(), HostError> {
        Ok(())
    }

    fn is_alive(&self, id: SurfaceId) -> bool;

    fn bounds(&self, _id: SurfaceId) -> Result<Bounds, HostError> {
        Err(HostError::Unsupported("surface geometry"))
    }

    fn set_bounds(&self, _id: SurfaceId, _bounds: Bounds) -> Result<(), HostError> {
        Err(HostError::Unsupported("surface geometry"))
    }

    /// Work area of the display the surface is on.
    fn work_area(&self, _id: SurfaceId) -> Result<Size, HostError> {
        Err(HostError::Unsupported("surface geometry"))
    }

    fn center(&self, _id: SurfaceId) -> Result<(), HostError> {
        Err(HostError::Unsupported("surface geometry"))
    }

    fn set_flag(&self, _id: SurfaceId, _flag: WindowFlag, _enabled: bool) -> Result<(), HostError> {
        Err(HostError::Unsupported("window flags"))
    }

    fn show_open_dialog(
        &self,
        _parent: Option<SurfaceId>,
        _options: &OpenDialogOptions,
    ) -> Result<OpenDialogResult, HostError> {
        Err(HostError::Unsupported("dialogs"))
    }

    fn show_save_dialog(
        &self,
        _parent: Option<SurfaceId>,
        _options: &SaveDialogOptions,
    ) -> Result<SaveDialogResult, HostError> {
        Err(HostError::Unsupported("dialogs"))
    }

    /// Returns the index of the pressed button, `0` meaning cancel.
    fn show_message_box(&self, _parent: Option<SurfaceId>, _message: &MessageBox) -> Result<usize, HostError> {
        Err(HostError::Unsupported("dialogs"))
    }
}
