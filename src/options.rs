/// Controller configuration accepted at (re)initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Maximum wall-clock time in milliseconds to wait for the first message
    /// or error of a cycle (default: 0 = disabled).
    /// When the deadline lapses the worker is terminated and the controller
    /// enters the error state.
    pub timeout_ms: u64,
}

impl ControllerOptions {
    /// Options with a timeout, in milliseconds
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    /// Returns true if a deadline should be armed on spawn
    pub fn timeout_enabled(&self) -> bool {
        self.timeout_ms > 0
    }
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self { timeout_ms: 0 }
    }
}
