use serde::{Deserialize, Serialize};

/// Lifecycle state of the managed worker, as observed by the embedding
/// application
///
/// Exactly one variant is active at any time. `Success` and `Error` are
/// re-enterable (a worker may keep sending messages, each resetting the
/// state); `Terminated` is absorbing until the next source change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// No source configured, no worker exists
    Idle,

    /// A worker is live and no message or error has arrived yet
    Running,

    /// The last inbound event was a message
    Success,

    /// The last event was a failure (construction, relayed, timeout, misuse)
    Error,

    /// The worker was explicitly terminated; only a source change exits this
    Terminated,
}

impl WorkerStatus {
    /// Returns true if a worker is live and still awaiting its first event
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns true if the current cycle has produced a message or a failure
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    /// Returns true if the worker was explicitly terminated
    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Terminated => write!(f, "terminated"),
        }
    }
}
