use crate::{EventReceiver, WorkerError};
use serde_json::Value as JsonValue;

/// Exclusive ownership token for one live execution unit
///
/// Implemented by the worker-host integration. The controller is the only
/// holder; it never shares the handle and drops it on termination.
pub trait WorkerHandle<T = JsonValue> {
    /// Forward a payload to the worker, verbatim and fire-and-forget.
    /// Issue order is preserved; delivery ordering is the host's concern.
    fn send(&mut self, payload: T);

    /// Stop the execution unit as soon as possible.
    /// After calling terminate(), the handle is not used again.
    fn terminate(&mut self);
}

/// A freshly spawned worker: the handle plus the receiving end of its
/// message/error relay
pub struct SpawnedWorker<T = JsonValue, R = JsonValue> {
    pub handle: Box<dyn WorkerHandle<T>>,
    pub events: EventReceiver<R>,
}

impl<T, R> SpawnedWorker<T, R> {
    pub fn new(handle: Box<dyn WorkerHandle<T>>, events: EventReceiver<R>) -> Self {
        Self { handle, events }
    }
}

/// The spawn capability consumed from the worker-host environment
///
/// Injected into the controller at construction time so test suites and
/// alternative hosts substitute it explicitly instead of patching an
/// ambient global.
pub trait WorkerSpawner<T = JsonValue, R = JsonValue> {
    /// Instantiate an execution unit from a script reference (URL or path)
    ///
    /// Fails with [`WorkerError::Construction`] if the resource cannot be
    /// loaded or instantiated.
    fn spawn(&self, script: &str) -> Result<SpawnedWorker<T, R>, WorkerError>;
}
