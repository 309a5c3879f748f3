use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::sink::ResponseSink;
use crate::protocol::OutboundMessage;
use crate::state::GlobalStateStore;
use crate::windows::WindowManager;

/// Forward every applied state change to all live surfaces.
///
/// A lagging subscriber sends `key: None` so surfaces refetch everything
/// instead of silently missing updates.
pub fn spawn_state_fanout(
    store: &GlobalStateStore,
    windows: Arc<WindowManager>,
    sink: Arc<dyn ResponseSink>,
) -> JoinHandle<()> {
    let mut changes = store.subscribe();
    tokio::spawn(async move {
        loop {
            let key = match changes.recv().await {
                Ok(change) => Some(change.key),
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "state fan-out lagged, surfaces will refetch");
                    None
                }
                Err(RecvError::Closed) => break,
            };
            for surface in windows.surfaces() {
                sink.deliver(surface, OutboundMessage::GlobalStateChange { key: key.clone() });
            }
        }
        debug!("state fan-out stopped");
    })
}
