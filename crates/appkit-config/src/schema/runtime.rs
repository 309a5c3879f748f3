//! Runtime tuning for the invocation bridge and state fan-out.

use appkit_common::DEFAULT_CHANNEL;
use serde::{Deserialize, Serialize};

/// The `[runtime]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Channel implicitly bound to the first surface of the process.
    pub default_channel: String,
    /// Upper bound for a single invocation. `None` waits forever.
    pub invoke_timeout_ms: Option<u64>,
    /// Buffered global-state change notifications per subscriber.
    pub state_channel_capacity: usize,
    /// Buffered lifecycle events per subscriber.
    pub event_bus_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            default_channel: DEFAULT_CHANNEL.to_string(),
            invoke_timeout_ms: None,
            state_channel_capacity: 256,
            event_bus_capacity: 64,
        }
    }
}
