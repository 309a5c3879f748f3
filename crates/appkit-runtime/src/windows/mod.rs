//! Renderer surfaces addressed by logical channel.
//!
//! `WindowManager` keeps a symmetric channel <-> surface binding on top of a
//! [`SurfaceHost`], the collaborator that actually creates and destroys
//! surfaces. `HeadlessHost` is the in-memory host used by the binary and
//! tests.

mod dialog;
mod geometry;
mod headless;
mod host;
mod manager;

pub use dialog::{
    AlertOptions, AlertSkin, FileDialogOptions, MessageBox, OpenDialogOptions, OpenDialogResult, OpenMode,
    SaveDialogOptions, SaveDialogResult,
};
pub use geometry::{Bounds, Dimensions, Length, Origin, Size, WindowFlag};
pub use headless::{DialogAnswer, DialogKind, HeadlessHost, HostEvent, SurfaceSnapshot};
pub use host::{CloseHook, SurfaceHost};
pub use manager::{OpenOptions, SurfaceSelector, WindowManager};
