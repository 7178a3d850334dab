//! Deterministic in-process fakes for the spawn seam
//!
//! `MockSpawner` stands in for a real worker host: every spawn produces a
//! `MockHandle` the controller owns plus a [`WorkerProbe`] the test keeps,
//! through which it can inject messages/errors and observe what the
//! controller forwarded or terminated.
//!
//! ```ignore
//! let spawner = MockSpawner::new();
//! let mut controller = WorkerController::new(spawner.clone(), None);
//! controller.reconcile(Some("worker.js".into()), ControllerOptions::default());
//!
//! spawner.latest().post_result(json!({"result": 84}));
//! controller.next_transition().await;
//! ```

use crate::{
    EventSender, SpawnedWorker, WorkerError, WorkerEvent, WorkerHandle, WorkerSpawner,
};
use serde_json::Value as JsonValue;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Fake execution-unit handle
///
/// Records forwarded payloads and terminate calls into probe-shared cells.
pub struct MockHandle<T = JsonValue> {
    sent: Rc<RefCell<Vec<T>>>,
    terminations: Rc<Cell<u32>>,
}

impl<T> MockHandle<T> {
    /// Handle with nothing observing it, for tests that only need something
    /// live to own
    pub fn detached() -> Self {
        Self {
            sent: Rc::new(RefCell::new(Vec::new())),
            terminations: Rc::new(Cell::new(0)),
        }
    }
}

impl<T> WorkerHandle<T> for MockHandle<T> {
    fn send(&mut self, payload: T) {
        self.sent.borrow_mut().push(payload);
    }

    fn terminate(&mut self) {
        self.terminations.set(self.terminations.get() + 1);
    }
}

/// Test-side view of one spawned mock worker
pub struct WorkerProbe<T = JsonValue, R = JsonValue> {
    sent: Rc<RefCell<Vec<T>>>,
    terminations: Rc<Cell<u32>>,
    events: EventSender<R>,
}

impl<T, R> WorkerProbe<T, R> {
    /// Inject a message, as if the worker posted a result
    pub fn post_result(&self, payload: R) {
        let _ = self.events.send(WorkerEvent::Message(payload));
    }

    /// Inject a worker-side fault
    pub fn post_error(&self, message: impl Into<String>) {
        let _ = self.events.send(WorkerEvent::Error(message.into()));
    }

    /// Payloads the controller forwarded to this worker, in issue order
    pub fn sent(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.sent.borrow().clone()
    }

    /// Number of payloads forwarded so far
    pub fn sent_count(&self) -> usize {
        self.sent.borrow().len()
    }

    /// Number of times the controller terminated this worker
    pub fn terminations(&self) -> u32 {
        self.terminations.get()
    }
}

impl<T, R> Clone for WorkerProbe<T, R> {
    fn clone(&self) -> Self {
        Self {
            sent: Rc::clone(&self.sent),
            terminations: Rc::clone(&self.terminations),
            events: self.events.clone(),
        }
    }
}

/// Fake spawn capability
///
/// Clone it before handing it to the controller; all clones share the same
/// probe list, so the test side keeps visibility into every spawn.
pub struct MockSpawner<T = JsonValue, R = JsonValue> {
    workers: Rc<RefCell<Vec<WorkerProbe<T, R>>>>,
    fail_with: Option<String>,
}

impl<T, R> MockSpawner<T, R> {
    /// Spawner whose every spawn succeeds
    pub fn new() -> Self {
        Self {
            workers: Rc::new(RefCell::new(Vec::new())),
            fail_with: None,
        }
    }

    /// Spawner whose every spawn fails with a construction error
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            workers: Rc::new(RefCell::new(Vec::new())),
            fail_with: Some(message.into()),
        }
    }

    /// Number of workers spawned so far
    pub fn spawn_count(&self) -> usize {
        self.workers.borrow().len()
    }

    /// Probe for the most recently spawned worker
    ///
    /// Panics if nothing has been spawned; only meaningful in tests.
    pub fn latest(&self) -> WorkerProbe<T, R> {
        self.workers
            .borrow()
            .last()
            .expect("no worker spawned yet")
            .clone()
    }

    /// Probe for the nth spawned worker (0-based)
    pub fn probe(&self, index: usize) -> WorkerProbe<T, R> {
        self.workers.borrow()[index].clone()
    }

    /// Build one mock worker and register its probe
    ///
    /// Used by the spawner trait impl and directly by factory-source tests.
    pub fn make_worker(&self) -> SpawnedWorker<T, R>
    where
        T: 'static,
    {
        let (events_tx, events_rx) = WorkerEvent::channel();
        let handle = MockHandle::detached();
        self.workers.borrow_mut().push(WorkerProbe {
            sent: Rc::clone(&handle.sent),
            terminations: Rc::clone(&handle.terminations),
            events: events_tx,
        });
        SpawnedWorker::new(Box::new(handle), events_rx)
    }
}

impl<T, R> Default for MockSpawner<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Clone for MockSpawner<T, R> {
    fn clone(&self) -> Self {
        Self {
            workers: Rc::clone(&self.workers),
            fail_with: self.fail_with.clone(),
        }
    }
}

impl<T: 'static, R> WorkerSpawner<T, R> for MockSpawner<T, R> {
    fn spawn(&self, script: &str) -> Result<SpawnedWorker<T, R>, WorkerError> {
        if let Some(msg) = &self.fail_with {
            return Err(WorkerError::Construction(format!("{script}: {msg}")));
        }
        Ok(self.make_worker())
    }
}
