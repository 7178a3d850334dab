//! Worker lifecycle state machine
//!
//! `WorkerController` owns exactly one execution unit per active
//! configuration: it spawns the worker from a source descriptor, folds the
//! worker's messages and errors into observable state, enforces an optional
//! first-event deadline, and guarantees deterministic teardown on
//! termination, source change, or drop.
//!
//! All state transitions happen on the host's control thread: the embedding
//! calls [`WorkerController::reconcile`] whenever its inputs change and
//! drives inbound events through [`WorkerController::next_transition`] (or
//! the non-blocking [`WorkerController::pump`]). Nothing here blocks and
//! nothing is locked; the worker side only ever talks to the controller
//! through the event channel.

use crate::{
    ControllerOptions, EventReceiver, LogEvent, LogLevel, LogSender, SpawnedWorker, WorkerError,
    WorkerEvent, WorkerHandle, WorkerSource, WorkerSpawner, WorkerStatus,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::time::Instant;

/// Owned snapshot of the controller's observable record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerState<R = JsonValue> {
    /// Last received payload, if the current cycle has produced one
    pub data: Option<R>,
    /// Last captured failure, if the current cycle has produced one
    pub error: Option<WorkerError>,
    /// Current lifecycle state
    pub status: WorkerStatus,
}

/// Lifecycle controller for a single off-thread worker
///
/// `T` is the outbound message type, `R` the inbound result payload type.
/// At most one live handle and at most one pending deadline exist per
/// controller at any time.
///
/// Note: not `Send` because the factory descriptor is `Rc`-based and the
/// controller is only ever driven from the host's single control thread.
pub struct WorkerController<T = JsonValue, R = JsonValue> {
    spawner: Box<dyn WorkerSpawner<T, R>>,
    log_tx: Option<LogSender>,

    source: Option<WorkerSource<T, R>>,
    options: ControllerOptions,

    status: WorkerStatus,
    data: Option<R>,
    error: Option<WorkerError>,

    handle: Option<Box<dyn WorkerHandle<T>>>,
    events: Option<EventReceiver<R>>,
    deadline: Option<Instant>,
}

impl<T, R> WorkerController<T, R> {
    /// Create a controller in `Idle` with no source configured
    ///
    /// The spawn capability is injected here rather than looked up from the
    /// environment, so tests and alternative hosts substitute it explicitly.
    pub fn new(spawner: impl WorkerSpawner<T, R> + 'static, log_tx: Option<LogSender>) -> Self {
        Self {
            spawner: Box::new(spawner),
            log_tx,
            source: None,
            options: ControllerOptions::default(),
            status: WorkerStatus::Idle,
            data: None,
            error: None,
            handle: None,
            events: None,
            deadline: None,
        }
    }

    // === Observables ===

    /// Current lifecycle state
    pub fn status(&self) -> WorkerStatus {
        self.status
    }

    /// Last received payload, if any
    pub fn data(&self) -> Option<&R> {
        self.data.as_ref()
    }

    /// Last captured failure, if any
    pub fn error(&self) -> Option<&WorkerError> {
        self.error.as_ref()
    }

    /// Returns true if a live handle is currently owned
    pub fn has_live_worker(&self) -> bool {
        self.handle.is_some()
    }

    /// Owned copy of the observable record
    pub fn snapshot(&self) -> WorkerState<R>
    where
        R: Clone,
    {
        WorkerState {
            data: self.data.clone(),
            error: self.error.clone(),
            status: self.status,
        }
    }

    // === Commands ===

    /// Re-initialize against the current inputs
    ///
    /// The embedding calls this whenever its own source or options change;
    /// the controller compares identity (value equality for script
    /// references, pointer identity for factories) and no-ops when nothing
    /// changed, so calling it unconditionally from a render-style loop is
    /// safe.
    ///
    /// On change: the previous cycle is torn down exactly as in
    /// [`terminate_worker`](Self::terminate_worker), then a fresh cycle
    /// starts: `Idle` for an empty source, `Running` with a new handle on
    /// successful spawn, `Error` with a construction failure otherwise.
    pub fn reconcile(&mut self, source: Option<WorkerSource<T, R>>, options: ControllerOptions) {
        let same_source = match (&self.source, &source) {
            (None, None) => true,
            (Some(a), Some(b)) => a.same_identity(b),
            _ => false,
        };
        if same_source && self.options == options {
            return;
        }

        self.teardown();
        self.source = source;
        self.options = options;
        self.initialize();
    }

    /// Forward a payload to the live worker
    ///
    /// Fire-and-forget; issue order is preserved. Calling this with no live
    /// worker (never spawned, spawn failed, timed out, or terminated) never
    /// drops the payload silently: it emits a diagnostic notice and puts the
    /// controller in the error state with [`WorkerError::NotRunning`].
    pub fn post_message(&mut self, payload: T) {
        match &mut self.handle {
            Some(handle) if self.status != WorkerStatus::Terminated => handle.send(payload),
            _ => {
                self.log(LogLevel::Warn, WorkerError::NotRunning.description());
                self.data = None;
                self.error = Some(WorkerError::NotRunning);
                self.status = WorkerStatus::Error;
            }
        }
    }

    /// Terminate the live worker, if any
    ///
    /// Idempotent. Issues termination to the handle exactly once, releases
    /// it, uninstalls the relay, cancels any pending deadline and enters
    /// `Terminated` with both observables cleared. `Terminated` is absorbing
    /// until the next source change.
    pub fn terminate_worker(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };
        handle.terminate();
        self.events = None;
        self.deadline = None;
        self.data = None;
        self.error = None;
        self.status = WorkerStatus::Terminated;
        self.log(LogLevel::Debug, "worker terminated");
    }

    // === Event dispatch ===

    /// Await the next worker event or the deadline, apply it, and return the
    /// resulting status
    ///
    /// Biased toward events: a message or error that has already arrived
    /// always wins against a deadline lapsing in the same instant. Returns
    /// `None` when the current cycle can no longer produce a transition (no
    /// relay installed and no deadline pending).
    pub async fn next_transition(&mut self) -> Option<WorkerStatus> {
        loop {
            match (self.events.take(), self.deadline) {
                (None, None) => return None,
                (None, Some(at)) => {
                    tokio::time::sleep_until(at).await;
                    self.fire_timeout();
                    return Some(self.status);
                }
                (Some(mut events), None) => match events.recv().await {
                    Some(ev) => {
                        self.events = Some(events);
                        self.apply(ev);
                        return Some(self.status);
                    }
                    // Relay hung up with nothing else armed; drop it.
                    None => {}
                },
                (Some(mut events), Some(at)) => {
                    let received = tokio::select! {
                        biased;
                        ev = events.recv() => Some(ev),
                        _ = tokio::time::sleep_until(at) => None,
                    };
                    match received {
                        Some(Some(ev)) => {
                            self.events = Some(events);
                            self.apply(ev);
                            return Some(self.status);
                        }
                        // Relay hung up; the deadline is still armed.
                        Some(None) => {}
                        None => {
                            self.events = Some(events);
                            self.fire_timeout();
                            return Some(self.status);
                        }
                    }
                }
            }
        }
    }

    /// Drain queued worker events without waiting, then fire the deadline if
    /// it has lapsed
    ///
    /// Returns the number of callbacks dispatched. Queued events are applied
    /// before the deadline check, so a message or error always wins a
    /// same-instant race against the timeout.
    pub fn pump(&mut self) -> usize {
        let mut dispatched = 0;
        if let Some(mut events) = self.events.take() {
            loop {
                match events.try_recv() {
                    Ok(ev) => {
                        self.apply(ev);
                        dispatched += 1;
                    }
                    Err(TryRecvError::Empty) => {
                        self.events = Some(events);
                        break;
                    }
                    Err(TryRecvError::Disconnected) => break,
                }
            }
        }
        if let Some(at) = self.deadline {
            if Instant::now() >= at {
                self.fire_timeout();
                dispatched += 1;
            }
        }
        dispatched
    }

    // === Internals ===

    /// Fold one inbound event into observable state, cancelling the deadline
    fn apply(&mut self, event: WorkerEvent<R>) {
        self.deadline = None;
        match event {
            WorkerEvent::Message(payload) => {
                self.data = Some(payload);
                self.error = None;
                self.status = WorkerStatus::Success;
            }
            WorkerEvent::Error(message) => {
                self.data = None;
                self.error = Some(WorkerError::Worker(message));
                self.status = WorkerStatus::Error;
            }
        }
    }

    /// Deadline lapsed with no event: the one error path that terminates the
    /// worker as a side effect. The relay stays installed, so a late event
    /// that was already in flight still dispatches and overrides this state.
    fn fire_timeout(&mut self) {
        self.deadline = None;
        if let Some(mut handle) = self.handle.take() {
            handle.terminate();
        }
        self.data = None;
        self.error = Some(WorkerError::Timeout);
        self.status = WorkerStatus::Error;
        self.log(
            LogLevel::Warn,
            format!("worker timed out after {}ms", self.options.timeout_ms),
        );
    }

    /// Terminate whatever cycle was in flight, without entering `Terminated`
    fn teardown(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.terminate();
        }
        self.events = None;
        self.deadline = None;
    }

    /// Start a fresh cycle from the stored source and options
    fn initialize(&mut self) {
        self.data = None;
        self.error = None;

        let Some(source) = &self.source else {
            self.status = WorkerStatus::Idle;
            return;
        };

        let spawned = match source {
            WorkerSource::Script(reference) => self.spawner.spawn(reference),
            WorkerSource::Factory(make) => make(),
        };

        match spawned {
            Ok(SpawnedWorker { handle, events }) => {
                self.handle = Some(handle);
                self.events = Some(events);
                self.status = WorkerStatus::Running;
                if self.options.timeout_enabled() {
                    self.deadline =
                        Some(Instant::now() + Duration::from_millis(self.options.timeout_ms));
                }
                self.log(LogLevel::Debug, "worker spawned");
            }
            Err(err) => {
                self.log(LogLevel::Error, err.description());
                self.error = Some(err);
                self.status = WorkerStatus::Error;
            }
        }
    }

    fn log(&self, level: LogLevel, message: impl Into<String>) {
        if let Some(tx) = &self.log_tx {
            let _ = tx.send(LogEvent {
                level,
                message: message.into(),
            });
        }
    }
}

impl<T, R> Drop for WorkerController<T, R> {
    /// Controller disposal never leaks an execution unit
    fn drop(&mut self) {
        self.teardown();
    }
}
