use std::path::PathBuf;

use crate::types::{ActionNamespace, SurfaceId};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

/// Rejected action registrations. Fatal to the registration attempt only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error(
        "the exported value \"{name}\" from \"{namespace}:{source_id}\" is not an action; \
         only actions can be exported from action modules"
    )]
    NotAnAction {
        namespace: ActionNamespace,
        source_id: String,
        name: String,
    },

    #[error(
        "the action \"{name}\" (from \"{namespace}:{source_id}\") is a function, but is not async; \
         rewrite it as an async function"
    )]
    NotAsync {
        namespace: ActionNamespace,
        source_id: String,
        name: String,
    },
}

impl RegistryError {
    pub fn name(&self) -> &'static str {
        match self {
            RegistryError::NotAnAction { .. } => "ValueNotAnActionError",
            RegistryError::NotAsync { .. } => "ActionNotAsyncError",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("no caller context found")]
    NoContext,
}

impl ContextError {
    pub fn name(&self) -> &'static str {
        match self {
            ContextError::NoContext => "NoContextError",
        }
    }
}

/// Failures reported by the windowing collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("surface {0} does not exist")]
    UnknownSurface(SurfaceId),

    #[error("surface host unavailable: {0}")]
    Unavailable(String),

    #[error("surface host does not support {0}")]
    Unsupported(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("no surface found{}{}", fmt_id(.id), fmt_channel(.channel))]
    NoSurface {
        id: Option<SurfaceId>,
        channel: Option<String>,
    },

    #[error(transparent)]
    Host(#[from] HostError),
}

fn fmt_id(id: &Option<SurfaceId>) -> String {
    id.map(|id| format!(" with id {}", id.get()))
        .unwrap_or_default()
}

fn fmt_channel(channel: &Option<String>) -> String {
    channel
        .as_ref()
        .map(|c| format!(" at channel {c}"))
        .unwrap_or_default()
}

impl WindowError {
    pub fn no_surface_with_id(id: SurfaceId) -> Self {
        WindowError::NoSurface {
            id: Some(id),
            channel: None,
        }
    }

    pub fn no_surface_at_channel(channel: impl Into<String>) -> Self {
        WindowError::NoSurface {
            id: None,
            channel: Some(channel.into()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WindowError::NoSurface { .. } => "NoSurfaceError",
            WindowError::Host(_) => "SurfaceHostError",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppkitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ValidationError("runtime.default_channel is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: runtime.default_channel is empty"
        );
    }

    #[test]
    fn registry_errors_name_export_and_source() {
        let err = RegistryError::NotAsync {
            namespace: ActionNamespace::User,
            source_id: "actions/file".into(),
            name: "readFile".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("readFile"));
        assert!(msg.contains("user:actions/file"));
        assert_eq!(err.name(), "ActionNotAsyncError");

        let err = RegistryError::NotAnAction {
            namespace: ActionNamespace::Builtin,
            source_id: "window".into(),
            name: "VERSION".into(),
        };
        assert!(err.to_string().contains("is not an action"));
        assert_eq!(err.name(), "ValueNotAnActionError");
    }

    #[test]
    fn no_surface_mentions_what_was_queried() {
        let err = WindowError::no_surface_with_id(SurfaceId::new(7));
        assert_eq!(err.to_string(), "no surface found with id 7");

        let err = WindowError::no_surface_at_channel("settings");
        assert_eq!(err.to_string(), "no surface found at channel settings");
        assert_eq!(err.name(), "NoSurfaceError");
    }

    #[test]
    fn host_error_wraps_into_window_error() {
        let err: WindowError = HostError::UnknownSurface(SurfaceId::new(3)).into();
        assert!(matches!(err, WindowError::Host(_)));
        assert_eq!(err.to_string(), "surface 3 does not exist");
        assert_eq!(err.name(), "SurfaceHostError");

        let err = HostError::Unsupported("dialogs");
        assert_eq!(err.to_string(), "surface host does not support dialogs");
    }

    #[test]
    fn appkit_error_from_variants() {
        let err: AppkitError = ContextError::NoContext.into();
        assert!(matches!(err, AppkitError::Context(_)));
        assert_eq!(err.to_string(), "no caller context found");

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: AppkitError = io_err.into();
        assert!(matches!(err, AppkitError::Io(_)));
        assert!(err.to_string().contains("file missing"));

        let err = AppkitError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
