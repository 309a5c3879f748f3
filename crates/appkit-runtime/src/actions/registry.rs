use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use appkit_common::{ActionNamespace, RegistryError};
use tracing::{debug, info};

use super::export::{Action, ActionFn, ActionModule, Export};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub namespace: ActionNamespace,
    pub source_id: String,
    pub name: String,
}

impl ActionKey {
    pub fn new(namespace: ActionNamespace, source_id: &str, name: &str) -> Self {
        Self {
            namespace,
            source_id: source_id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Maps `(namespace, source_id, name)` to an async action.
///
/// Readers only hold the lock long enough to clone the matching entry, so
/// invocations never serialize on the registry.
#[derive(Default)]
pub struct ActionsRegistry {
    actions: RwLock<HashMap<ActionKey, Action>>,
}

impl ActionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one export, overwriting any entry under the same key.
    pub fn register(
        &self,
        namespace: ActionNamespace,
        source_id: &str,
        name: &str,
        export: Export,
    ) -> Result<(), RegistryError> {
        let action = validate(namespace, source_id, name, export)?;
        self.write().insert(ActionKey::new(namespace, source_id, name), action);
        debug!(%namespace, source_id, name, "action registered");
        Ok(())
    }

    /// Register a handler that is already known to be async.
    pub fn register_action(
        &self,
        namespace: ActionNamespace,
        source_id: &str,
        name: &str,
        handler: ActionFn,
    ) {
        let action = Action {
            namespace,
            source_id: source_id.to_string(),
            name: name.to_string(),
            handler,
        };
        self.write().insert(ActionKey::new(namespace, source_id, name), action);
    }

    /// Register every export of `module`. Nothing is inserted if any export
    /// is rejected.
    pub fn register_module(
        &self,
        namespace: ActionNamespace,
        module: &ActionModule,
    ) -> Result<usize, RegistryError> {
        let actions = validate_module(namespace, module)?;
        let count = actions.len();
        let mut map = self.write();
        for action in actions {
            map.insert(
                ActionKey::new(namespace, &action.source_id, &action.name),
                action,
            );
        }
        debug!(%namespace, source_id = %module.source_id, count, "module registered");
        Ok(count)
    }

    pub fn lookup(&self, namespace: ActionNamespace, source_id: &str, name: &str) -> Option<Action> {
        self.read()
            .get(&ActionKey::new(namespace, source_id, name))
            .cloned()
    }

    /// Remove every action under `namespace`, returning how many were dropped.
    pub fn unregister_all(&self, namespace: ActionNamespace) -> usize {
        let mut map = self.write();
        let before = map.len();
        map.retain(|key, _| key.namespace != namespace);
        let removed = before - map.len();
        info!(%namespace, removed, "namespace unregistered");
        removed
    }

    /// Atomically swap the contents of `namespace` for `modules`.
    ///
    /// All exports are validated before the write lock is taken; on error
    /// the registry is untouched. Lookups observe either the old or the
    /// new namespace, never a mix.
    pub fn replace_namespace(
        &self,
        namespace: ActionNamespace,
        modules: &[ActionModule],
    ) -> Result<usize, RegistryError> {
        let mut replacement = Vec::new();
        for module in modules {
            replacement.extend(validate_module(namespace, module)?);
        }
        let count = replacement.len();

        let mut map = self.write();
        map.retain(|key, _| key.namespace != namespace);
        for action in replacement {
            map.insert(
                ActionKey::new(namespace, &action.source_id, &action.name),
                action,
            );
        }
        drop(map);

        info!(%namespace, count, "namespace replaced");
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Sorted `source_id.name` entries under `namespace`.
    pub fn names(&self, namespace: ActionNamespace) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .keys()
            .filter(|key| key.namespace == namespace)
            .map(|key| format!("{}.{}", key.source_id, key.name))
            .collect();
        names.sort();
        names
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ActionKey, Action>> {
        self.actions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ActionKey, Action>> {
        self.actions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn validate(
    namespace: ActionNamespace,
    source_id: &str,
    name: &str,
    export: Export,
) -> Result<Action, RegistryError> {
    match export {
        Export::Async(handler) => Ok(Action {
            namespace,
            source_id: source_id.to_string(),
            name: name.to_string(),
            handler,
        }),
        Export::Sync(_) => Err(RegistryError::NotAsync {
            namespace,
            source_id: source_id.to_string(),
            name: name.to_string(),
        }),
        Export::Value(_) => Err(RegistryError::NotAnAction {
            namespace,
            source_id: source_id.to_string(),
            name: name.to_string(),
        }),
    }
}

fn validate_module(
    namespace: ActionNamespace,
    module: &ActionModule,
) -> Result<Vec<Action>, RegistryError> {
    module
        .exports
        .iter()
        .map(|(name, export)| validate(namespace, &module.source_id, name, export.clone()))
        .collect()
}
