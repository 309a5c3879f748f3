//! Application identity and startup behavior.

use serde::{Deserialize, Serialize};

/// Platform an app bundle is built for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BuildTarget {
    Win,
    Mac,
    Linux,
}

/// The `[app]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    /// Reverse-DNS identifier, e.g. `com.my-company.my-app`.
    pub id: String,
    /// Shown in the UI and used as the process name.
    pub display_name: String,
    pub build_targets: Vec<BuildTarget>,
    /// When set, relaunching focuses the running instance.
    pub single_instance: bool,
    /// When unset, the app starts in the background with no surface open.
    pub open_window_on_startup: bool,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            id: "com.appkit.app".to_string(),
            display_name: "Appkit App".to_string(),
            build_targets: Vec::new(),
            single_instance: false,
            open_window_on_startup: true,
        }
    }
}
