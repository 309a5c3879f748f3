use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use appkit_common::{Event, EventBus, HostError, SurfaceId, WindowError};
use tracing::{debug, info, warn};

use super::dialog::{MessageBox, OpenDialogOptions, OpenDialogResult, SaveDialogOptions, SaveDialogResult};
use super::geometry::{Bounds, Dimensions, WindowFlag};
use super::host::{CloseHook, SurfaceHost};

/// Options for [`WindowManager::open`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenOptions {
    pub channel: Option<String>,
}

impl OpenOptions {
    pub fn channel(channel: impl Into<String>) -> Self {
        Self {
            channel: Some(channel.into()),
        }
    }
}

/// How a caller names a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceSelector {
    Id(SurfaceId),
    Channel(String),
}

impl From<SurfaceId> for SurfaceSelector {
    fn from(id: SurfaceId) -> Self {
        SurfaceSelector::Id(id)
    }
}

impl From<&str> for SurfaceSelector {
    fn from(channel: &str) -> Self {
        SurfaceSelector::Channel(channel.to_string())
    }
}

impl fmt::Display for SurfaceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceSelector::Id(id) => write!(f, "{id}"),
            SurfaceSelector::Channel(channel) => write!(f, "channel {channel}"),
        }
    }
}

#[derive(Debug, Default)]
struct Bindings {
    channel_to_id: HashMap<String, SurfaceId>,
    id_to_channel: HashMap<SurfaceId, String>,
    live: HashSet<SurfaceId>,
    created_any: bool,
}

impl Bindings {
    fn bind(&mut self, channel: String, id: SurfaceId) {
        if let Some(previous) = self.channel_to_id.insert(channel.clone(), id) {
            if previous != id {
                self.id_to_channel.remove(&previous);
            }
        }
        if let Some(old_channel) = self.id_to_channel.insert(id, channel.clone()) {
            if old_channel != channel && self.channel_to_id.get(&old_channel) == Some(&id) {
                self.channel_to_id.remove(&old_channel);
            }
        }
    }

    /// Forget `id`. Its channel is released only while it still points at `id`.
    fn release(&mut self, id: SurfaceId) -> Option<String> {
        self.live.remove(&id);
        let channel = self.id_to_channel.remove(&id)?;
        if self.channel_to_id.get(&channel) == Some(&id) {
            self.channel_to_id.remove(&channel);
        }
        Some(channel)
    }
}

fn lock(bindings: &Mutex<Bindings>) -> MutexGuard<'_, Bindings> {
    bindings.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tracks live surfaces and the channels they are bound to.
pub struct WindowManager {
    host: Arc<dyn SurfaceHost>,
    bindings: Arc<Mutex<Bindings>>,
    // Held for the whole of `open`, never by the close hook.
    opening: Mutex<()>,
    default_channel: String,
    events: Arc<EventBus>,
}

impl WindowManager {
    pub fn new(
        host: Arc<dyn SurfaceHost>,
        default_channel: impl Into<String>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            host,
            bindings: Arc::new(Mutex::new(Bindings::default())),
            opening: Mutex::new(()),
            default_channel: default_channel.into(),
            events,
        }
    }

    pub fn default_channel(&self) -> &str {
        &self.default_channel
    }

    pub fn host(&self) -> &Arc<dyn SurfaceHost> {
        &self.host
    }

    /// Open `path`, reusing the surface bound to `options.channel` if it is
    /// still alive. A reused surface is hidden and renavigated.
    ///
    /// Opens are serialized, so two opens on one channel never both create.
    /// A bound surface that closes while being reused leaves the channel
    /// unbound and a new surface is created in its place.
    pub fn open(&self, path: &str, options: OpenOptions) -> Result<SurfaceId, WindowError> {
        let _opening = self.opening.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(channel) = &options.channel {
            if let Some(id) = self.live_at_channel(channel) {
                match self.host.hide(id).and_then(|()| self.host.navigate(id, path)) {
                    Ok(()) => {
                        debug!(surface = %id, channel, path, "surface reused");
                        return Ok(id);
                    }
                    Err(HostError::UnknownSurface(gone)) => {
                        lock(&self.bindings).release(gone);
                        warn!(surface = %gone, channel, "bound surface closed during reuse, creating a new one");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        let id = self.host.create(path, self.close_hook())?;

        let bound = {
            let mut bindings = lock(&self.bindings);
            bindings.live.insert(id);
            let channel = options.channel.or_else(|| {
                (!bindings.created_any).then(|| self.default_channel.clone())
            });
            bindings.created_any = true;
            if let Some(channel) = &channel {
                bindings.bind(channel.clone(), id);
            }
            channel
        };

        info!(surface = %id, channel = ?bound, path, "surface opened");
        self.events.publish(Event::SurfaceOpened(id));
        if let Some(channel) = bound {
            self.events.publish(Event::ChannelBound {
                channel,
                surface: id,
            });
        }
        Ok(id)
    }

    pub fn get_by_id(&self, id: SurfaceId) -> Result<SurfaceId, WindowError> {
        let mut bindings = lock(&self.bindings);
        if !bindings.live.contains(&id) {
            return Err(WindowError::no_surface_with_id(id));
        }
        if !self.host.is_alive(id) {
            let channel = bindings.release(id);
            warn!(surface = %id, channel = ?channel, "pruned surface destroyed out of band");
            return Err(WindowError::no_surface_with_id(id));
        }
        Ok(id)
    }

    pub fn get_by_channel(&self, channel: &str) -> Result<SurfaceId, WindowError> {
        self.live_at_channel(channel)
            .ok_or_else(|| WindowError::no_surface_at_channel(channel))
    }

    pub fn get(&self, selector: &SurfaceSelector) -> Result<SurfaceId, WindowError> {
        match selector {
            SurfaceSelector::Id(id) => self.get_by_id(*id),
            SurfaceSelector::Channel(channel) => self.get_by_channel(channel),
        }
    }

    /// Close the selected surface. Its binding is released by the close hook.
    pub fn close(&self, selector: &SurfaceSelector) -> Result<SurfaceId, WindowError> {
        let id = self.get(selector)?;
        self.host.close(id)?;
        Ok(id)
    }

    pub fn show(&self, id: SurfaceId) -> Result<(), WindowError> {
        self.host.show(self.get_by_id(id)?)?;
        Ok(())
    }

    pub fn hide(&self, id: SurfaceId) -> Result<(), WindowError> {
        self.host.hide(self.get_by_id(id)?)?;
        Ok(())
    }

    pub fn focus(&self, id: SurfaceId) -> Result<(), WindowError> {
        self.host.focus(self.get_by_id(id)?)?;
        Ok(())
    }

    pub fn set_title(&self, id: SurfaceId, title: &str) -> Result<(), WindowError> {
        self.host.set_title(self.get_by_id(id)?, title)?;
        Ok(())
    }

    pub fn open_devtools(&self, id: SurfaceId) -> Result<(), WindowError> {
        self.host.open_devtools(self.get_by_id(id)?)?;
        Ok(())
    }

    pub fn close_devtools(&self, id: SurfaceId) -> Result<(), WindowError> {
        self.host.close_devtools(self.get_by_id(id)?)?;
        Ok(())
    }

    /// Resize and move `id` against its display's work area. Returns the
    /// bounds that were applied.
    pub fn set_dimensions(&self, id: SurfaceId, dimensions: &Dimensions) -> Result<Bounds, WindowError> {
        let id = self.get_by_id(id)?;
        let work_area = self.host.work_area(id)?;
        let bounds = dimensions.apply(self.host.bounds(id)?, work_area);
        self.host.set_bounds(id, bounds)?;
        debug!(surface = %id, ?bounds, "surface dimensions set");
        Ok(bounds)
    }

    pub fn center(&self, id: SurfaceId) -> Result<(), WindowError> {
        self.host.center(self.get_by_id(id)?)?;
        Ok(())
    }

    pub fn set_flag(&self, id: SurfaceId, flag: WindowFlag, enabled: bool) -> Result<(), WindowError> {
        self.host.set_flag(self.get_by_id(id)?, flag, enabled)?;
        Ok(())
    }

    /// Show an open dialog, attached to `parent` when given.
    pub fn show_open_dialog(
        &self,
        parent: Option<SurfaceId>,
        options: &OpenDialogOptions,
    ) -> Result<OpenDialogResult, WindowError> {
        Ok(self.host.show_open_dialog(parent, options)?)
    }

    pub fn show_save_dialog(
        &self,
        parent: Option<SurfaceId>,
        options: &SaveDialogOptions,
    ) -> Result<SaveDialogResult, WindowError> {
        Ok(self.host.show_save_dialog(parent, options)?)
    }

    /// Show `message` and return the label of the chosen outcome.
    pub fn show_message_box(&self, parent: Option<SurfaceId>, message: &MessageBox) -> Result<String, WindowError> {
        let response = self.host.show_message_box(parent, message)?;
        Ok(message.outcome(response))
    }

    pub fn channel_of(&self, id: SurfaceId) -> Option<String> {
        lock(&self.bindings).id_to_channel.get(&id).cloned()
    }

    /// Live surface ids in ascending order.
    pub fn surfaces(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<SurfaceId> = lock(&self.bindings).live.iter().copied().collect();
        ids.sort();
        ids
    }

    /// Close every live surface. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let mut closed = 0;
        for id in self.surfaces() {
            match self.host.close(id) {
                Ok(()) => closed += 1,
                Err(e) => {
                    warn!(surface = %id, error = %e, "failed to close surface");
                    lock(&self.bindings).release(id);
                }
            }
        }
        closed
    }

    fn live_at_channel(&self, channel: &str) -> Option<SurfaceId> {
        let mut bindings = lock(&self.bindings);
        let id = *bindings.channel_to_id.get(channel)?;
        if bindings.live.contains(&id) && self.host.is_alive(id) {
            return Some(id);
        }
        bindings.release(id);
        warn!(surface = %id, channel, "pruned stale channel binding");
        None
    }

    fn close_hook(&self) -> CloseHook {
        let bindings = Arc::clone(&self.bindings);
        let events = Arc::clone(&self.events);
        Box::new(move |id| {
            let channel = lock(&bindings).release(id);
            info!(surface = %id, channel = ?channel, "surface closed");
            events.publish(Event::SurfaceClosed(id));
        })
    }
}

impl fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = lock(&self.bindings);
        f.debug_struct("WindowManager")
            .field("default_channel", &self.default_channel)
            .field("channels", &bindings.channel_to_id)
            .field("live", &bindings.live.len())
            .finish_non_exhaustive()
    }
}
