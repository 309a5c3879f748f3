use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use appkit_common::SurfaceId;
use futures_util::FutureExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use super::sink::ResponseSink;
use crate::actions::ActionsRegistry;
use crate::context::run_with_context;
use crate::protocol::{ActionError, InvokeRequest, InvokeResponse, OutboundMessage};

/// Resolves invocations against the registry and answers the caller.
pub struct IpcBridge {
    registry: Arc<ActionsRegistry>,
    sink: Arc<dyn ResponseSink>,
    invoke_timeout: RwLock<Option<Duration>>,
}

impl IpcBridge {
    pub fn new(registry: Arc<ActionsRegistry>, sink: Arc<dyn ResponseSink>) -> Self {
        Self {
            registry,
            sink,
            invoke_timeout: RwLock::new(None),
        }
    }

    pub fn with_invoke_timeout(self, timeout: Option<Duration>) -> Self {
        self.set_invoke_timeout(timeout);
        self
    }

    pub fn set_invoke_timeout(&self, timeout: Option<Duration>) {
        *self
            .invoke_timeout
            .write()
            .unwrap_or_else(PoisonError::into_inner) = timeout;
    }

    pub fn invoke_timeout(&self) -> Option<Duration> {
        *self
            .invoke_timeout
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn registry(&self) -> &Arc<ActionsRegistry> {
        &self.registry
    }

    /// Run `request` for `surface` and deliver the response to it.
    pub async fn handle(&self, surface: SurfaceId, request: InvokeRequest) -> InvokeResponse {
        let response = self.execute(surface, request).await;
        self.sink
            .deliver(surface, OutboundMessage::InvokeResponse(response.clone()));
        response
    }

    /// Run `request` for `surface` without delivering the response.
    pub async fn execute(&self, surface: SurfaceId, request: InvokeRequest) -> InvokeResponse {
        let InvokeRequest {
            namespace,
            source_id,
            function_name,
            params,
            invoke_id,
        } = request;

        debug!(
            surface = %surface,
            invoke_id,
            %namespace,
            source_id = %source_id,
            function = %function_name,
            "invoke received"
        );

        let Some(action) = self.registry.lookup(namespace, &source_id, &function_name) else {
            warn!(
                surface = %surface,
                invoke_id,
                %namespace,
                source_id = %source_id,
                function = %function_name,
                "invoked action is not registered"
            );
            return InvokeResponse::error(
                invoke_id,
                ActionError::not_found(&function_name, &source_id),
            );
        };

        // The handler itself is called inside the scope so that any
        // synchronous prelude also sees the caller.
        let call = run_with_context(surface, async move { action.call(params).await });
        let call = AssertUnwindSafe(call).catch_unwind();

        let outcome = match self.invoke_timeout() {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(surface = %surface, invoke_id, function = %function_name, ?limit, "invoke timed out");
                    return InvokeResponse::error(
                        invoke_id,
                        ActionError::new(
                            "InvokeTimeoutError",
                            format!("{function_name} did not finish within {}ms", limit.as_millis()),
                        ),
                    );
                }
            },
            None => call.await,
        };

        match outcome {
            Ok(Ok(value)) => InvokeResponse::result(invoke_id, value),
            Ok(Err(err)) => {
                debug!(surface = %surface, invoke_id, error = %err, "action returned error");
                InvokeResponse::error(invoke_id, err)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(surface = %surface, invoke_id, function = %function_name, panic = %message, "action panicked");
                InvokeResponse::error(invoke_id, ActionError::new("ActionPanickedError", message))
            }
        }
    }

    /// Run `request` as its own task. Nothing is held across the action.
    pub fn spawn(self: &Arc<Self>, surface: SurfaceId, request: InvokeRequest) -> JoinHandle<InvokeResponse> {
        let bridge = Arc::clone(self);
        tokio::spawn(async move { bridge.handle(surface, request).await })
    }

    /// Parse a raw request body and spawn it.
    ///
    /// A body that does not parse is answered with `InvalidRequestError` when
    /// an `invokeId` can still be recovered from it, and dropped otherwise.
    pub fn dispatch_raw(self: &Arc<Self>, surface: SurfaceId, body: &str) -> Option<JoinHandle<InvokeResponse>> {
        match serde_json::from_str::<InvokeRequest>(body) {
            Ok(request) => Some(self.spawn(surface, request)),
            Err(err) => {
                let invoke_id = serde_json::from_str::<Value>(body)
                    .ok()
                    .and_then(|v| v.get("invokeId").and_then(Value::as_u64));
                match invoke_id {
                    Some(invoke_id) => {
                        warn!(surface = %surface, invoke_id, error = %err, "malformed invoke request");
                        let response = InvokeResponse::error(
                            invoke_id,
                            ActionError::invalid_request(err.to_string()),
                        );
                        self.sink
                            .deliver(surface, OutboundMessage::InvokeResponse(response));
                    }
                    None => warn!(surface = %surface, error = %err, "unparseable message dropped"),
                }
                None
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "action panicked".to_string()
    }
}
