use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use appkit_common::{HostError, SurfaceId};
use tracing::debug;

use super::dialog::{MessageBox, OpenDialogOptions, OpenDialogResult, SaveDialogOptions, SaveDialogResult};
use super::geometry::{Bounds, Size, WindowFlag};
use super::host::{CloseHook, SurfaceHost};
use crate::bridge::ResponseSink;
use crate::protocol::OutboundMessage;

/// Something that happened to a headless surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Created { id: SurfaceId, path: String },
    Navigated { id: SurfaceId, path: String },
    Shown(SurfaceId),
    Hidden(SurfaceId),
    Focused(SurfaceId),
    TitleChanged { id: SurfaceId, title: String },
    DevtoolsOpened(SurfaceId),
    DevtoolsClosed(SurfaceId),
    BoundsChanged { id: SurfaceId, bounds: Bounds },
    Centered(SurfaceId),
    FlagChanged { id: SurfaceId, flag: WindowFlag, enabled: bool },
    DialogShown { parent: Option<SurfaceId>, kind: DialogKind, title: Option<String> },
    Closed(SurfaceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Open,
    Save,
    MessageBox,
}

/// Scripted answer for the next dialog of the matching kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAnswer {
    Open(OpenDialogResult),
    Save(SaveDialogResult),
    /// Response index as returned by [`SurfaceHost::show_message_box`].
    MessageBox(usize),
}

/// Point-in-time view of one headless surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceSnapshot {
    pub id: SurfaceId,
    pub path: String,
    pub title: String,
    pub visible: bool,
    pub focused: bool,
    pub devtools_open: bool,
    pub bounds: Bounds,
    /// Flags set at least once; unset flags keep the host default.
    pub flags: BTreeMap<WindowFlag, bool>,
}

impl SurfaceSnapshot {
    pub fn flag(&self, flag: WindowFlag) -> Option<bool> {
        self.flags.get(&flag).copied()
    }
}

struct Surface {
    snapshot: SurfaceSnapshot,
    on_closed: Option<CloseHook>,
    outbox: Vec<OutboundMessage>,
}

struct HostState {
    last_id: u32,
    surfaces: BTreeMap<SurfaceId, Surface>,
    events: Vec<HostEvent>,
    work_area: Size,
    answers: VecDeque<DialogAnswer>,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            last_id: 0,
            surfaces: BTreeMap::new(),
            events: Vec::new(),
            work_area: Size {
                width: 1920,
                height: 1080,
            },
            answers: VecDeque::new(),
        }
    }
}

impl HostState {
    fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut Surface, HostError> {
        self.surfaces
            .get_mut(&id)
            .ok_or(HostError::UnknownSurface(id))
    }

    fn check_parent(&self, parent: Option<SurfaceId>) -> Result<(), HostError> {
        match parent {
            Some(id) if !self.surfaces.contains_key(&id) => Err(HostError::UnknownSurface(id)),
            _ => Ok(()),
        }
    }

    // Pops the front answer only when it is for this kind of dialog.
    fn take_answer(&mut self, kind: DialogKind) -> Option<DialogAnswer> {
        let matches = matches!(
            (self.answers.front()?, kind),
            (DialogAnswer::Open(_), DialogKind::Open)
                | (DialogAnswer::Save(_), DialogKind::Save)
                | (DialogAnswer::MessageBox(_), DialogKind::MessageBox)
        );
        if matches {
            self.answers.pop_front()
        } else {
            None
        }
    }
}

/// In-memory [`SurfaceHost`] with no GUI.
///
/// Records every host call as a [`HostEvent`] and queues messages delivered
/// to each surface, so the whole runtime can be driven without a display.
/// Dialogs return scripted [`DialogAnswer`]s and cancel when none is queued.
#[derive(Default)]
pub struct HeadlessHost {
    state: Mutex<HostState>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<SurfaceSnapshot> {
        self.lock().surfaces.get(&id).map(|s| s.snapshot.clone())
    }

    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        self.lock().surfaces.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().surfaces.is_empty()
    }

    /// Use `work_area` as the display size of every surface.
    pub fn with_work_area(self, work_area: Size) -> Self {
        self.lock().work_area = work_area;
        self
    }

    /// Queue the answer for an upcoming dialog.
    pub fn queue_dialog_answer(&self, answer: DialogAnswer) {
        self.lock().answers.push_back(answer);
    }

    /// Drop a surface without running its close hook, as when the
    /// renderer crashes.
    pub fn destroy_out_of_band(&self, id: SurfaceId) -> bool {
        let removed = self.lock().surfaces.remove(&id).is_some();
        if removed {
            debug!(surface = %id, "surface destroyed out of band");
        }
        removed
    }

    /// Drain all pending host events.
    pub fn drain_events(&self) -> Vec<HostEvent> {
        std::mem::take(&mut self.lock().events)
    }

    /// Take every message delivered to `id` so far.
    pub fn take_outbox(&self, id: SurfaceId) -> Vec<OutboundMessage> {
        self.lock()
            .surfaces
            .get_mut(&id)
            .map(|s| std::mem::take(&mut s.outbox))
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SurfaceHost for HeadlessHost {
    fn create(&self, path: &str, on_closed: CloseHook) -> Result<SurfaceId, HostError> {
        let mut state = self.lock();
        state.last_id += 1;
        let id = SurfaceId::new(state.last_id);
        state.surfaces.insert(
            id,
            Surface {
                snapshot: SurfaceSnapshot {
                    id,
                    path: path.to_string(),
                    title: String::new(),
                    visible: false,
                    focused: false,
                    devtools_open: false,
                    bounds: Bounds::default(),
                    flags: BTreeMap::new(),
                },
                on_closed: Some(on_closed),
                outbox: Vec::new(),
            },
        );
        state.events.push(HostEvent::Created {
            id,
            path: path.to_string(),
        });
        debug!(surface = %id, path, "headless surface created");
        Ok(id)
    }

    fn navigate(&self, id: SurfaceId, path: &str) -> Result<(), HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?.snapshot.path = path.to_string();
        state.events.push(HostEvent::Navigated {
            id,
            path: path.to_string(),
        });
        Ok(())
    }

    fn show(&self, id: SurfaceId) -> Result<(), HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?.snapshot.visible = true;
        state.events.push(HostEvent::Shown(id));
        Ok(())
    }

    fn hide(&self, id: SurfaceId) -> Result<(), HostError> {
        let mut state = self.lock();
        let surface = state.surface_mut(id)?;
        surface.snapshot.visible = false;
        surface.snapshot.focused = false;
        state.events.push(HostEvent::Hidden(id));
        Ok(())
    }

    fn focus(&self, id: SurfaceId) -> Result<(), HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?;
        for surface in state.surfaces.values_mut() {
            surface.snapshot.focused = surface.snapshot.id == id;
        }
        state.events.push(HostEvent::Focused(id));
        Ok(())
    }

    fn close(&self, id: SurfaceId) -> Result<(), HostError> {
        let hook = {
            let mut state = self.lock();
            let mut surface = state
                .surfaces
                .remove(&id)
                .ok_or(HostError::UnknownSurface(id))?;
            state.events.push(HostEvent::Closed(id));
            surface.on_closed.take()
        };
        debug!(surface = %id, "headless surface closed");
        if let Some(hook) = hook {
            hook(id);
        }
        Ok(())
    }

    fn set_title(&self, id: SurfaceId, title: &str) -> Result<(), HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?.snapshot.title = title.to_string();
        state.events.push(HostEvent::TitleChanged {
            id,
            title: title.to_string(),
        });
        Ok(())
    }

    fn open_devtools(&self, id: SurfaceId) -> Result<(), HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?.snapshot.devtools_open = true;
        state.events.push(HostEvent::DevtoolsOpened(id));
        Ok(())
    }

    fn close_devtools(&self, id: SurfaceId) -> Result<(), HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?.snapshot.devtools_open = false;
        state.events.push(HostEvent::DevtoolsClosed(id));
        Ok(())
    }

    fn is_alive(&self, id: SurfaceId) -> bool {
        self.lock().surfaces.contains_key(&id)
    }

    fn bounds(&self, id: SurfaceId) -> Result<Bounds, HostError> {
        Ok(self.lock().surface_mut(id)?.snapshot.bounds)
    }

    fn set_bounds(&self, id: SurfaceId, bounds: Bounds) -> Result<(), HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?.snapshot.bounds = bounds;
        state.events.push(HostEvent::BoundsChanged { id, bounds });
        Ok(())
    }

    fn work_area(&self, id: SurfaceId) -> Result<Size, HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?;
        Ok(state.work_area)
    }

    fn center(&self, id: SurfaceId) -> Result<(), HostError> {
        let mut state = self.lock();
        let work_area = state.work_area;
        let bounds = &mut state.surface_mut(id)?.snapshot.bounds;
        bounds.x = (i64::from(work_area.width) - i64::from(bounds.width)).div_euclid(2) as i32;
        bounds.y = (i64::from(work_area.height) - i64::from(bounds.height)).div_euclid(2) as i32;
        state.events.push(HostEvent::Centered(id));
        Ok(())
    }

    fn set_flag(&self, id: SurfaceId, flag: WindowFlag, enabled: bool) -> Result<(), HostError> {
        let mut state = self.lock();
        state.surface_mut(id)?.snapshot.flags.insert(flag, enabled);
        state.events.push(HostEvent::FlagChanged { id, flag, enabled });
        Ok(())
    }

    fn show_open_dialog(
        &self,
        parent: Option<SurfaceId>,
        options: &OpenDialogOptions,
    ) -> Result<OpenDialogResult, HostError> {
        let mut state = self.lock();
        state.check_parent(parent)?;
        state.events.push(HostEvent::DialogShown {
            parent,
            kind: DialogKind::Open,
            title: options.file.title.clone(),
        });
        match state.take_answer(DialogKind::Open) {
            Some(DialogAnswer::Open(result)) => Ok(result),
            _ => Ok(OpenDialogResult::Canceled),
        }
    }

    fn show_save_dialog(
        &self,
        parent: Option<SurfaceId>,
        options: &SaveDialogOptions,
    ) -> Result<SaveDialogResult, HostError> {
        let mut state = self.lock();
        state.check_parent(parent)?;
        state.events.push(HostEvent::DialogShown {
            parent,
            kind: DialogKind::Save,
            title: options.title.clone(),
        });
        match state.take_answer(DialogKind::Save) {
            Some(DialogAnswer::Save(result)) => Ok(result),
            _ => Ok(SaveDialogResult::Canceled),
        }
    }

    fn show_message_box(&self, parent: Option<SurfaceId>, message: &MessageBox) -> Result<usize, HostError> {
        let mut state = self.lock();
        state.check_parent(parent)?;
        state.events.push(HostEvent::DialogShown {
            parent,
            kind: DialogKind::MessageBox,
            title: message.title.clone(),
        });
        match state.take_answer(DialogKind::MessageBox) {
            Some(DialogAnswer::MessageBox(response)) => Ok(response),
            _ => Ok(0),
        }
    }
}

impl ResponseSink for HeadlessHost {
    fn deliver(&self, surface: SurfaceId, message: OutboundMessage) {
        match self.lock().surfaces.get_mut(&surface) {
            Some(target) => target.outbox.push(message),
            None => debug!(surface = %surface, "message for closed surface dropped"),
        }
    }
}
