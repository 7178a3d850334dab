use serde::{Deserialize, Serialize};

/// Failure captured in the controller's observable error state
///
/// Errors are terminal for the current cycle only: they update observable
/// state for the embedding to react to and are never thrown across the
/// component boundary. Recovery is the embedding's responsibility (supply a
/// new source descriptor to force re-initialization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerError {
    // === Spawn-time failures ===
    /// Spawning the worker failed (bad script reference, factory error)
    Construction(String),

    // === Worker-side failures ===
    /// The worker signaled a fault during execution; the original message is
    /// passed through unmodified for caller inspection
    Worker(String),

    // === Controller-side failures ===
    /// No message or error arrived before the configured deadline; the
    /// worker was terminated as a side effect
    Timeout,

    /// `post_message` was called with no live worker or after termination
    NotRunning,
}

impl WorkerError {
    /// Returns true if the worker never came up
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Construction(_))
    }

    /// Returns true if this is a fault relayed from the worker itself
    pub fn is_worker_fault(&self) -> bool {
        matches!(self, Self::Worker(_))
    }

    /// Returns true if the configured deadline lapsed
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns true if the caller misused the controller API
    pub fn is_misuse(&self) -> bool {
        matches!(self, Self::NotRunning)
    }

    /// Get a human-readable description
    pub fn description(&self) -> &str {
        match self {
            Self::Construction(msg) => msg,
            Self::Worker(msg) => msg,
            Self::Timeout => "Worker timed out",
            Self::NotRunning => "Worker is not running or has been terminated.",
        }
    }
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for WorkerError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_messages() {
        assert_eq!(WorkerError::Timeout.description(), "Worker timed out");
        assert_eq!(
            WorkerError::NotRunning.description(),
            "Worker is not running or has been terminated."
        );
    }

    #[test]
    fn relayed_text_passes_through_unmodified() {
        let err = WorkerError::Worker("ReferenceError: x is not defined".into());
        assert_eq!(err.description(), "ReferenceError: x is not defined");
        assert_eq!(err.to_string(), "ReferenceError: x is not defined");
        assert!(err.is_worker_fault());
        assert!(!err.is_timeout());
    }

    #[test]
    fn classification() {
        assert!(WorkerError::Construction("nope".into()).is_construction());
        assert!(WorkerError::Timeout.is_timeout());
        assert!(WorkerError::NotRunning.is_misuse());
    }
}
