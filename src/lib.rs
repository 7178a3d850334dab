//! Lifecycle management for a single off-main-thread worker
//!
//! This crate manages exactly one isolated execution unit per active
//! configuration: spawn it from a source descriptor, relay its messages and
//! errors into an observable `{ data, error, status }` record, enforce an
//! optional first-event timeout, and tear everything down deterministically
//! on termination, source change, or drop.
//!
//! The worker host is abstracted behind the [`WorkerSpawner`] /
//! [`WorkerHandle`] seam and injected at construction time, so tests and
//! alternative hosts substitute it explicitly. The controller itself lives
//! on the host's single control thread; see [`WorkerController`].

mod controller;
mod error;
mod event;
mod log;
mod options;
mod source;
mod spawn;
mod status;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use controller::{WorkerController, WorkerState};
pub use error::WorkerError;
pub use event::{EventReceiver, EventSender, WorkerEvent};
pub use log::{LogEvent, LogLevel, LogSender};
pub use options::ControllerOptions;
pub use source::{WorkerFactory, WorkerSource};
pub use spawn::{SpawnedWorker, WorkerHandle, WorkerSpawner};
pub use status::WorkerStatus;
