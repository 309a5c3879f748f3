//! Configuration schema types for appkit.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod app;
mod logging;
mod runtime;

pub use app::*;
pub use logging::*;
pub use runtime::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
///
/// Only override what you want to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct AppConfig {
    pub app: AppSection,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_app_section() {
        let config = AppConfig::default();
        assert_eq!(config.app.id, "com.appkit.app");
        assert_eq!(config.app.display_name, "Appkit App");
        assert!(config.app.build_targets.is_empty());
        assert!(!config.app.single_instance);
        assert!(config.app.open_window_on_startup);
    }

    #[test]
    fn default_runtime_section() {
        let config = AppConfig::default();
        assert_eq!(config.runtime.default_channel, "_top");
        assert_eq!(config.runtime.invoke_timeout_ms, None);
        assert_eq!(config.runtime.state_channel_capacity, 256);
        assert_eq!(config.runtime.event_bus_capacity, 64);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
[app]
display_name = "Notes"
build_targets = ["mac", "linux"]
"#,
        )
        .unwrap();
        assert_eq!(config.app.display_name, "Notes");
        assert_eq!(
            config.app.build_targets,
            vec![BuildTarget::Mac, BuildTarget::Linux]
        );
        assert_eq!(config.app.id, "com.appkit.app");
        assert_eq!(config.runtime, RuntimeConfig::default());
    }

    #[test]
    fn unknown_build_target_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[app]\nbuild_targets = [\"amiga\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn invoke_timeout_parses() {
        let config: AppConfig = toml::from_str("[runtime]\ninvoke_timeout_ms = 1500\n").unwrap();
        assert_eq!(config.runtime.invoke_timeout_ms, Some(1500));
    }

    #[test]
    fn log_level_directive() {
        let config: AppConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.directive(), "appkit=debug");
        assert_eq!(LoggingConfig::default().directive(), "appkit=info");
    }
}
