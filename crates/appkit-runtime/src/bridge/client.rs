use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use appkit_common::ActionNamespace;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::debug;

use crate::protocol::{ActionError, InvokeRequest, InvokeResponse, OutboundMessage};

type Transport = Arc<dyn Fn(InvokeRequest) + Send + Sync>;
type StateListener = Arc<dyn Fn(Option<&str>) + Send + Sync>;
type Settle = oneshot::Sender<Result<Value, ActionError>>;

/// Renderer-side caller.
///
/// Every call gets the next `invokeId` and waits in a pending table until a
/// response with that id arrives. Arrival order does not matter.
pub struct InvokeClient {
    next_invoke_id: AtomicU64,
    pending: Mutex<HashMap<u64, Settle>>,
    state_listeners: Mutex<Vec<StateListener>>,
    transport: Transport,
}

impl InvokeClient {
    /// `transport` posts a request to the main process.
    pub fn new<F>(transport: F) -> Self
    where
        F: Fn(InvokeRequest) + Send + Sync + 'static,
    {
        Self {
            next_invoke_id: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
            state_listeners: Mutex::new(Vec::new()),
            transport: Arc::new(transport),
        }
    }

    pub fn invoke(
        &self,
        namespace: ActionNamespace,
        source_id: &str,
        function_name: &str,
        params: Vec<Value>,
    ) -> PendingCall {
        let invoke_id = self.next_invoke_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.lock_pending().insert(invoke_id, tx);

        (self.transport)(InvokeRequest {
            namespace,
            source_id: source_id.to_string(),
            function_name: function_name.to_string(),
            params,
            invoke_id,
        });

        PendingCall { invoke_id, rx }
    }

    /// Settle the pending call matching `response`. Returns false for ids
    /// that are unknown or already settled.
    pub fn handle_response(&self, response: InvokeResponse) -> bool {
        let invoke_id = response.invoke_id();
        match self.lock_pending().remove(&invoke_id) {
            Some(tx) => {
                let _ = tx.send(response.into_result());
                true
            }
            None => {
                debug!(invoke_id, "response for unknown invoke id ignored");
                false
            }
        }
    }

    /// Route any message pushed by the main process.
    pub fn handle_message(&self, message: OutboundMessage) {
        match message {
            OutboundMessage::InvokeResponse(response) => {
                self.handle_response(response);
            }
            OutboundMessage::GlobalStateChange { key } => {
                let listeners: Vec<StateListener> = self
                    .state_listeners
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                for listener in listeners {
                    listener(key.as_deref());
                }
            }
        }
    }

    /// `listener` receives the changed key, or `None` for "refetch everything".
    pub fn on_global_state_change<F>(&self, listener: F)
    where
        F: Fn(Option<&str>) + Send + Sync + 'static,
    {
        self.state_listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    pub fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<u64, Settle>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An outstanding call made through [`InvokeClient::invoke`].
#[derive(Debug)]
pub struct PendingCall {
    invoke_id: u64,
    rx: oneshot::Receiver<Result<Value, ActionError>>,
}

impl PendingCall {
    pub fn invoke_id(&self) -> u64 {
        self.invoke_id
    }

    pub async fn wait(self) -> Result<Value, ActionError> {
        self.rx.await.unwrap_or_else(|_| {
            Err(ActionError::new(
                "InvokeAbandonedError",
                "the client was dropped before a response arrived",
            ))
        })
    }
}
