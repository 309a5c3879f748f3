pub mod errors;
pub mod events;
pub mod types;

pub use errors::{
    AppkitError, ConfigError, ContextError, HostError, RegistryError, WindowError,
};
pub use events::{Event, EventBus};
pub use types::{ActionNamespace, SurfaceHandle, SurfaceId, DEFAULT_CHANNEL};

pub type Result<T> = std::result::Result<T, AppkitError>;
