use crate::{SpawnedWorker, WorkerError};
use serde_json::Value as JsonValue;
use std::rc::Rc;

/// Type alias for a zero-argument handle factory
///
/// Note: `Rc` rather than `Arc` because the controller lives on the host's
/// single control thread; factory identity is compared by pointer, never by
/// the closure's contents.
pub type WorkerFactory<T = JsonValue, R = JsonValue> =
    Rc<dyn Fn() -> Result<SpawnedWorker<T, R>, WorkerError>>;

/// Source descriptor: how to (re)create a worker
///
/// Immutable per controller cycle. A change of identity (value equality for
/// script references, pointer identity for factories) is the trigger for a
/// full teardown-and-recreate.
pub enum WorkerSource<T = JsonValue, R = JsonValue> {
    /// Reference to a script resource (URL or path), instantiated through
    /// the injected spawner
    Script(String),

    /// Factory producing a new handle on demand, bypassing the spawner
    Factory(WorkerFactory<T, R>),
}

impl<T, R> WorkerSource<T, R> {
    /// Create a script-reference source
    pub fn script(reference: impl Into<String>) -> Self {
        Self::Script(reference.into())
    }

    /// Create a factory source
    pub fn factory(
        make: impl Fn() -> Result<SpawnedWorker<T, R>, WorkerError> + 'static,
    ) -> Self {
        Self::Factory(Rc::new(make))
    }

    /// Get the script reference if this is a script source
    pub fn as_script(&self) -> Option<&str> {
        match self {
            Self::Script(s) => Some(s),
            Self::Factory(_) => None,
        }
    }

    /// Identity comparison: script references by value, factories by pointer
    pub fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Script(a), Self::Script(b)) => a == b,
            (Self::Factory(a), Self::Factory(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T, R> Clone for WorkerSource<T, R> {
    fn clone(&self) -> Self {
        match self {
            Self::Script(s) => Self::Script(s.clone()),
            Self::Factory(f) => Self::Factory(Rc::clone(f)),
        }
    }
}

impl<T, R> std::fmt::Debug for WorkerSource<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Script(s) => f.debug_tuple("Script").field(s).finish(),
            Self::Factory(_) => f.debug_tuple("Factory").field(&"<closure>").finish(),
        }
    }
}

// Convenience: &str / String -> script reference
impl<T, R> From<&str> for WorkerSource<T, R> {
    fn from(s: &str) -> Self {
        Self::Script(s.to_string())
    }
}

impl<T, R> From<String> for WorkerSource<T, R> {
    fn from(s: String) -> Self {
        Self::Script(s)
    }
}
