use serde_json::Value as JsonValue;
use tokio::sync::mpsc;

/// Type alias for the worker-to-controller event sender
pub type EventSender<R = JsonValue> = mpsc::UnboundedSender<WorkerEvent<R>>;

/// Type alias for the worker-to-controller event receiver
pub type EventReceiver<R = JsonValue> = mpsc::UnboundedReceiver<WorkerEvent<R>>;

/// Inbound event relayed from the worker to the controller
///
/// Everything the worker produces crosses the isolation boundary as one of
/// these; the controller folds them into its observable state.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent<R = JsonValue> {
    /// The worker posted a result payload
    Message(R),

    /// The worker signaled a fault; the text is relayed unmodified
    Error(String),
}

impl<R> WorkerEvent<R> {
    /// Create an event channel pair for a freshly spawned worker
    pub fn channel() -> (EventSender<R>, EventReceiver<R>) {
        mpsc::unbounded_channel()
    }
}
