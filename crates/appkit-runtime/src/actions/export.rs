use std::fmt;
use std::future::Future;
use std::sync::Arc;

use appkit_common::ActionNamespace;
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::protocol::ActionError;

pub type ActionResult = Result<Value, ActionError>;
pub type ActionFuture = BoxFuture<'static, ActionResult>;

/// An async callable exposed to surfaces.
pub type ActionFn = Arc<dyn Fn(Vec<Value>) -> ActionFuture + Send + Sync>;

/// A plain function. Exportable, but never registrable as an action.
pub type SyncFn = Arc<dyn Fn(Vec<Value>) -> ActionResult + Send + Sync>;

/// Wrap an async closure as an [`ActionFn`].
pub fn action<F, Fut>(f: F) -> ActionFn
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActionResult> + Send + 'static,
{
    Arc::new(move |params| f(params).boxed())
}

/// Wrap a synchronous closure as a [`SyncFn`].
pub fn sync_fn<F>(f: F) -> SyncFn
where
    F: Fn(Vec<Value>) -> ActionResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A value exported by an action module.
#[derive(Clone)]
pub enum Export {
    Async(ActionFn),
    Sync(SyncFn),
    Value(Value),
}

impl Export {
    pub fn action<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        Export::Async(action(f))
    }

    fn kind(&self) -> &'static str {
        match self {
            Export::Async(_) => "async fn",
            Export::Sync(_) => "fn",
            Export::Value(_) => "value",
        }
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Export::Value(v) => f.debug_tuple("Value").field(v).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

/// A registered action. Cloning shares the same handler.
#[derive(Clone)]
pub struct Action {
    pub(super) namespace: ActionNamespace,
    pub(super) source_id: String,
    pub(super) name: String,
    pub(super) handler: ActionFn,
}

impl Action {
    pub fn namespace(&self) -> ActionNamespace {
        self.namespace
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handler(&self) -> &ActionFn {
        &self.handler
    }

    /// Start the action. Nothing runs until the returned future is polled.
    pub fn call(&self, params: Vec<Value>) -> ActionFuture {
        (self.handler)(params)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("namespace", &self.namespace)
            .field("source_id", &self.source_id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The exports of one source module, registered together.
#[derive(Debug, Clone)]
pub struct ActionModule {
    pub source_id: String,
    pub exports: Vec<(String, Export)>,
}

impl ActionModule {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            exports: Vec::new(),
        }
    }

    pub fn export(mut self, name: impl Into<String>, export: Export) -> Self {
        self.exports.push((name.into(), export));
        self
    }

    /// Shorthand for exporting an async closure.
    pub fn action<F, Fut>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ActionResult> + Send + 'static,
    {
        self.export(name, Export::action(f))
    }
}
