//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Appkit Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[app]
# id = "com.appkit.app"
# display_name = "Appkit App"
# build_targets = ["mac", "win", "linux"]
# single_instance = false
# open_window_on_startup = true

[runtime]
# default_channel = "_top"
# invoke_timeout_ms = 30000   # unset: invocations never time out
# state_channel_capacity = 256
# event_bus_capacity = 64

[logging]
# level = "info"              # trace, debug, info, warn, error
"##
    .to_string()
}
