//! Wire protocol between the main process and renderer surfaces.
//!
//! Messages flow in both directions:
//! - **Surface -> main**: an [`InvokeRequest`] posted by the renderer shim
//!   (`window.appkit.ipc.invoke(...)`), delivered by the transport together
//!   with the id of the surface it came from.
//! - **Main -> surface**: an [`OutboundMessage`], either the correlated
//!   response to one request or a global-state change notification.

use std::error::Error as StdError;

use appkit_common::{ActionNamespace, ContextError, HostError, RegistryError, WindowError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request to run one action on behalf of a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeRequest {
    pub namespace: ActionNamespace,
    pub source_id: String,
    pub function_name: String,
    #[serde(default)]
    pub params: Vec<Value>,
    /// Caller-scoped id; unique only among the caller's outstanding calls.
    pub invoke_id: u64,
}

/// Structured error relayed across the process boundary.
///
/// `name` and `message` always survive the round-trip; `stack` is
/// best-effort diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{name}: {message}")]
pub struct ActionError {
    pub name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ActionError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Build from any error, recording its source chain as the stack.
    pub fn from_error(name: impl Into<String>, err: &(dyn StdError + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name: name.into(),
            message: err.to_string(),
            stack: (!chain.is_empty()).then(|| chain.join("\n")),
        }
    }

    pub fn not_found(function_name: &str, source_id: &str) -> Self {
        Self::new(
            "MainProcessApiNotFoundError",
            format!(
                "You tried to invoke {function_name} (from \"{source_id}\") in the main process, \
                 but it was never exposed from it"
            ),
        )
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new("InvalidArgumentsError", message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new("InvalidRequestError", message)
    }
}

impl From<RegistryError> for ActionError {
    fn from(err: RegistryError) -> Self {
        Self::from_error(err.name(), &err)
    }
}

impl From<ContextError> for ActionError {
    fn from(err: ContextError) -> Self {
        Self::from_error(err.name(), &err)
    }
}

impl From<WindowError> for ActionError {
    fn from(err: WindowError) -> Self {
        Self::from_error(err.name(), &err)
    }
}

impl From<HostError> for ActionError {
    fn from(err: HostError) -> Self {
        WindowError::from(err).into()
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_error("SerializationError", &err)
    }
}

/// Exactly one of these is produced per [`InvokeRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InvokeResponse {
    Result {
        #[serde(rename = "invokeId")]
        invoke_id: u64,
        #[serde(default)]
        value: Value,
    },
    Error {
        #[serde(rename = "invokeId")]
        invoke_id: u64,
        error: ActionError,
    },
}

impl InvokeResponse {
    pub fn result(invoke_id: u64, value: Value) -> Self {
        Self::Result { invoke_id, value }
    }

    pub fn error(invoke_id: u64, error: ActionError) -> Self {
        Self::Error { invoke_id, error }
    }

    pub fn invoke_id(&self) -> u64 {
        match self {
            Self::Result { invoke_id, .. } | Self::Error { invoke_id, .. } => *invoke_id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn into_result(self) -> Result<Value, ActionError> {
        match self {
            Self::Result { value, .. } => Ok(value),
            Self::Error { error, .. } => Err(error),
        }
    }
}

/// Everything the main process pushes to a surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum OutboundMessage {
    InvokeResponse(InvokeResponse),
    /// `key` is `None` when the receiver missed notifications and should
    /// refetch the whole state.
    GlobalStateChange { key: Option<String> },
}

/// JavaScript shim injected into every web surface.
///
/// Keeps a pending-call table keyed by `invokeId` and settles calls purely
/// by that id, never by arrival order.
pub const RENDERER_BRIDGE_SCRIPT: &str = r#"
(function() {
    window.appkit = window.appkit || {};
    var pending = {};
    var nextInvokeId = 0;
    var stateListeners = [];
    window.appkit.ipc = {
        invoke: function(namespace, sourceId, functionName, params) {
            var invokeId = nextInvokeId++;
            return new Promise(function(resolve, reject) {
                pending[invokeId] = { resolve: resolve, reject: reject };
                window.ipc.postMessage(JSON.stringify({
                    namespace: namespace,
                    sourceId: sourceId,
                    functionName: functionName,
                    params: params || [],
                    invokeId: invokeId
                }));
            });
        },
        onGlobalStateChange: function(callback) {
            stateListeners.push(callback);
            return function() {
                stateListeners = stateListeners.filter(function(cb) { return cb !== callback; });
            };
        },
        _dispatch: function(message) {
            if (message.event === 'invokeResponse') {
                var response = message.payload;
                var call = pending[response.invokeId];
                if (!call) {
                    return;
                }
                delete pending[response.invokeId];
                if (response.kind === 'result') {
                    call.resolve(response.value);
                } else {
                    var error = new Error(response.error.message);
                    error.name = response.error.name;
                    if (response.error.stack) {
                        error.stack = response.error.stack;
                    }
                    call.reject(error);
                }
            } else if (message.event === 'globalStateChange') {
                stateListeners.forEach(function(cb) { cb(message.payload.key); });
            }
        }
    };
})();
"#;

/// Generate a JS snippet that hands `message` to the renderer shim.
pub fn js_dispatch_message(message: &OutboundMessage) -> String {
    let json = serde_json::to_string(message).unwrap_or_else(|_| "null".to_string());
    format!("window.appkit.ipc._dispatch({json});")
}

#[cfg(test)]
mod tests {
    use super::*;
    use appkit_common::SurfaceId;
    use serde_json::json;

    #[test]
    fn request_uses_camel_case_fields() {
        let raw = r#"{
            "namespace": "user",
            "sourceId": "actions/file",
            "functionName": "readFile",
            "params": ["/tmp/a.txt"],
            "invokeId": 4
        }"#;
        let req: InvokeRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(req.namespace, ActionNamespace::User);
        assert_eq!(req.source_id, "actions/file");
        assert_eq!(req.function_name, "readFile");
        assert_eq!(req.params, vec![json!("/tmp/a.txt")]);
        assert_eq!(req.invoke_id, 4);
    }

    #[test]
    fn request_params_default_to_empty() {
        let raw = r#"{"namespace":"builtin","sourceId":"app","functionName":"quit","invokeId":0}"#;
        let req: InvokeRequest = serde_json::from_str(raw).unwrap();
        assert!(req.params.is_empty());
    }

    #[test]
    fn response_wire_shapes() {
        let ok = InvokeResponse::result(1, json!({"a": 1}));
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"kind": "result", "invokeId": 1, "value": {"a": 1}})
        );

        let err = InvokeResponse::error(2, ActionError::new("TypeError", "boom"));
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"kind": "error", "invokeId": 2, "error": {"name": "TypeError", "message": "boom"}})
        );
    }

    #[test]
    fn response_decode_encode_is_lossless() {
        let samples = [
            json!({"kind": "result", "invokeId": 9, "value": null}),
            json!({"kind": "result", "invokeId": 10, "value": [1, "two", {"three": 3.5}]}),
            json!({"kind": "error", "invokeId": 11, "error": {"name": "E", "message": "m"}}),
            json!({"kind": "error", "invokeId": 12, "error": {"name": "E", "message": "m", "stack": "at x"}}),
        ];
        for sample in samples {
            let decoded: InvokeResponse = serde_json::from_value(sample.clone()).unwrap();
            assert_eq!(serde_json::to_value(&decoded).unwrap(), sample);
        }
    }

    #[test]
    fn response_accessors() {
        let err = InvokeResponse::error(3, ActionError::new("E", "m"));
        assert_eq!(err.invoke_id(), 3);
        assert!(err.is_error());
        assert_eq!(err.into_result().unwrap_err().name, "E");

        let ok = InvokeResponse::result(4, json!(true));
        assert_eq!(ok.into_result().unwrap(), json!(true));
    }

    #[test]
    fn outbound_messages_are_adjacently_tagged() {
        let msg = OutboundMessage::GlobalStateChange {
            key: Some("theme".into()),
        };
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"event": "globalStateChange", "payload": {"key": "theme"}})
        );

        let msg = OutboundMessage::InvokeResponse(InvokeResponse::result(0, json!(1)));
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["event"], "invokeResponse");
        assert_eq!(value["payload"]["kind"], "result");
        let back: OutboundMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn crate_errors_keep_their_names() {
        let err: ActionError = ContextError::NoContext.into();
        assert_eq!(err.name, "NoContextError");
        assert_eq!(err.message, "no caller context found");

        let err: ActionError = WindowError::no_surface_at_channel("prefs").into();
        assert_eq!(err.name, "NoSurfaceError");
        assert!(err.message.contains("prefs"));

        let err: ActionError = HostError::UnknownSurface(SurfaceId::new(2)).into();
        assert_eq!(err.name, "SurfaceHostError");
    }

    #[test]
    fn from_error_records_source_chain() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer failure")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::new(std::io::ErrorKind::Other, "disk gone"));
        let action_err = ActionError::from_error("ReadError", &err);
        assert_eq!(action_err.message, "outer failure");
        assert_eq!(action_err.stack.as_deref(), Some("caused by: disk gone"));
    }

    #[test]
    fn not_found_names_function_and_source() {
        let err = ActionError::not_found("deleteAll", "actions/files");
        assert_eq!(err.name, "MainProcessApiNotFoundError");
        assert!(err.message.contains("deleteAll"));
        assert!(err.message.contains("actions/files"));
    }

    #[test]
    fn js_dispatch_embeds_message_json() {
        let msg = OutboundMessage::GlobalStateChange { key: None };
        let js = js_dispatch_message(&msg);
        assert!(js.starts_with("window.appkit.ipc._dispatch("));
        assert!(js.contains(r#""event":"globalStateChange""#));
        assert!(js.ends_with(");"));
    }

    #[test]
    fn renderer_script_matches_wire_names() {
        for needle in ["invokeId", "sourceId", "functionName", "invokeResponse", "globalStateChange"] {
            assert!(RENDERER_BRIDGE_SCRIPT.contains(needle), "missing {needle}");
        }
    }
}
