use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::protocol::ActionError;

/// Positional parameters of one invocation.
#[derive(Debug, Clone, Default)]
pub struct Args(Vec<Value>);

impl Args {
    pub fn new(params: Vec<Value>) -> Self {
        Self(params)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode parameter `index`; missing or mistyped is an `InvalidArgumentsError`.
    pub fn required<T: DeserializeOwned>(&self, index: usize, name: &str) -> Result<T, ActionError> {
        let value = self.0.get(index).ok_or_else(|| {
            ActionError::invalid_arguments(format!("missing argument #{index} ({name})"))
        })?;
        serde_json::from_value(value.clone()).map_err(|e| {
            ActionError::invalid_arguments(format!("argument #{index} ({name}): {e}"))
        })
    }

    /// Decode parameter `index`, treating absent and `null` as `None`.
    pub fn optional<T: DeserializeOwned>(&self, index: usize, name: &str) -> Result<Option<T>, ActionError> {
        match self.0.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.required(index, name).map(Some),
        }
    }
}

impl From<Vec<Value>> for Args {
    fn from(params: Vec<Value>) -> Self {
        Self::new(params)
    }
}
