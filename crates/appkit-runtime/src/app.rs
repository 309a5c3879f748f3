//! Runtime assembly: wires registry, store, windows and bridge together.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use appkit_common::{
    ActionNamespace, AppkitError, Event, EventBus, RegistryError, SurfaceId, WindowError,
};
use appkit_config::AppConfig;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actions::{ActionModule, ActionsRegistry};
use crate::bridge::{spawn_state_fanout, IpcBridge, ResponseSink};
use crate::builtin::{register_builtin_actions, Services};
use crate::protocol::{InvokeRequest, InvokeResponse};
use crate::state::GlobalStateStore;
use crate::windows::{OpenOptions, SurfaceHost, WindowManager};

type UserActionsProvider = Arc<dyn Fn(&Services) -> Vec<ActionModule> + Send + Sync>;

/// Builder returned by [`AppRuntime::builder`].
pub struct AppRuntimeBuilder {
    config: AppConfig,
    host: Arc<dyn SurfaceHost>,
    sink: Arc<dyn ResponseSink>,
    user_actions: Option<UserActionsProvider>,
}

impl AppRuntimeBuilder {
    /// Source of the `user` namespace. Called once at build time and again
    /// on every [`AppRuntime::reload_user_actions`].
    pub fn user_actions<F>(mut self, provider: F) -> Self
    where
        F: Fn(&Services) -> Vec<ActionModule> + Send + Sync + 'static,
    {
        self.user_actions = Some(Arc::new(provider));
        self
    }

    /// Assemble the runtime and start the state fan-out.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<Arc<AppRuntime>, AppkitError> {
        let runtime_handle = Handle::try_current()
            .map_err(|e| AppkitError::Other(format!("app runtime needs a tokio runtime: {e}")))?;

        let settings = &self.config.runtime;
        let events = Arc::new(EventBus::new(settings.event_bus_capacity));
        let store = Arc::new(GlobalStateStore::new(settings.state_channel_capacity));
        let windows = Arc::new(WindowManager::new(
            self.host,
            settings.default_channel.clone(),
            Arc::clone(&events),
        ));
        let services = Services {
            windows: Arc::clone(&windows),
            store: Arc::clone(&store),
            events,
        };

        let registry = Arc::new(ActionsRegistry::new());
        register_builtin_actions(&registry, &services)?;
        if let Some(provider) = &self.user_actions {
            let count = registry.replace_namespace(ActionNamespace::User, &provider(&services))?;
            info!(count, "user actions registered");
        }

        let bridge = Arc::new(
            IpcBridge::new(Arc::clone(&registry), Arc::clone(&self.sink))
                .with_invoke_timeout(settings.invoke_timeout_ms.map(Duration::from_millis)),
        );

        let fanout = {
            let _guard = runtime_handle.enter();
            spawn_state_fanout(&store, windows, Arc::clone(&self.sink))
        };

        info!(app_id = %self.config.app.id, "app runtime assembled");
        Ok(Arc::new(AppRuntime {
            config: RwLock::new(self.config),
            registry,
            services,
            bridge,
            user_actions: self.user_actions,
            fanout: Mutex::new(Some(fanout)),
        }))
    }
}

/// A fully wired main-process runtime.
pub struct AppRuntime {
    config: RwLock<AppConfig>,
    registry: Arc<ActionsRegistry>,
    services: Services,
    bridge: Arc<IpcBridge>,
    user_actions: Option<UserActionsProvider>,
    fanout: Mutex<Option<JoinHandle<()>>>,
}

impl AppRuntime {
    pub fn builder(
        config: AppConfig,
        host: Arc<dyn SurfaceHost>,
        sink: Arc<dyn ResponseSink>,
    ) -> AppRuntimeBuilder {
        AppRuntimeBuilder {
            config,
            host,
            sink,
            user_actions: None,
        }
    }

    /// Open the root surface if the app is configured to show one on startup.
    pub fn start(&self) -> Result<Option<SurfaceId>, WindowError> {
        if !self.config().app.open_window_on_startup {
            info!("starting in the background, no surface opened");
            return Ok(None);
        }
        self.services
            .windows
            .open("/", OpenOptions::default())
            .map(Some)
    }

    /// Run one invocation as its own task.
    pub fn dispatch(&self, surface: SurfaceId, request: InvokeRequest) -> JoinHandle<InvokeResponse> {
        self.bridge.spawn(surface, request)
    }

    /// Parse and run a raw request body; see [`IpcBridge::dispatch_raw`].
    pub fn dispatch_raw(&self, surface: SurfaceId, body: &str) -> Option<JoinHandle<InvokeResponse>> {
        self.bridge.dispatch_raw(surface, body)
    }

    /// Re-run the user action provider and swap the `user` namespace in one
    /// step. On error the previous actions stay registered.
    pub fn reload_user_actions(&self) -> Result<usize, RegistryError> {
        let modules = self
            .user_actions
            .as_ref()
            .map(|provider| provider(&self.services))
            .unwrap_or_default();
        let count = self
            .registry
            .replace_namespace(ActionNamespace::User, &modules)?;
        self.services.events.publish(Event::ActionsReloaded {
            namespace: ActionNamespace::User,
            count,
        });
        Ok(count)
    }

    /// Apply a reloaded config. Only the invoke timeout takes effect live;
    /// other runtime settings are read once at build time.
    pub fn apply_config(&self, config: AppConfig) {
        let mut current = self.config.write().unwrap_or_else(PoisonError::into_inner);
        if config.runtime.default_channel != current.runtime.default_channel
            || config.runtime.state_channel_capacity != current.runtime.state_channel_capacity
            || config.runtime.event_bus_capacity != current.runtime.event_bus_capacity
        {
            warn!("changed runtime channel or capacity settings apply after restart");
        }
        self.bridge
            .set_invoke_timeout(config.runtime.invoke_timeout_ms.map(Duration::from_millis));
        *current = config;
        drop(current);

        info!("config applied");
        self.services.events.publish(Event::ConfigReloaded);
    }

    /// Close every surface and stop the state fan-out.
    pub fn shutdown(&self) {
        let closed = self.services.windows.close_all();
        if let Some(fanout) = self
            .fanout
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            fanout.abort();
        }
        info!(closed, "app runtime shut down");
        self.services.events.publish(Event::Shutdown);
    }

    pub fn config(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn registry(&self) -> &Arc<ActionsRegistry> {
        &self.registry
    }

    pub fn bridge(&self) -> &Arc<IpcBridge> {
        &self.bridge
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn windows(&self) -> &Arc<WindowManager> {
        &self.services.windows
    }

    pub fn store(&self) -> &Arc<GlobalStateStore> {
        &self.services.store
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.services.events
    }
}

impl fmt::Debug for AppRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRuntime")
            .field("actions", &self.registry.len())
            .field("windows", &self.services.windows)
            .finish_non_exhaustive()
    }
}
