use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel the first surface of a process is bound to when opened without one.
pub const DEFAULT_CHANNEL: &str = "_top";

/// Opaque identity of a renderer surface, assigned by the surface host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SurfaceId(u32);

impl SurfaceId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Wire form of a surface reference handed to renderers: `{ "id": 3 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle {
    pub id: SurfaceId,
}

impl From<SurfaceId> for SurfaceHandle {
    fn from(id: SurfaceId) -> Self {
        Self { id }
    }
}

/// Which family of actions an entry belongs to.
///
/// `User` is swapped wholesale on hot reload; `Builtin` is registered once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionNamespace {
    Builtin,
    User,
}

impl ActionNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionNamespace::Builtin => "builtin",
            ActionNamespace::User => "user",
        }
    }
}

impl fmt::Display for ActionNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
