/// Type alias for the diagnostic event sender
pub type LogSender = std::sync::mpsc::Sender<LogEvent>;

/// Diagnostic event emitted by the controller
///
/// The embedding attaches a channel at construction time and decides how to
/// surface these (stderr, structured logger, test assertions).
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
}

/// Severity of a diagnostic event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Trace => write!(f, "TRACE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_render_as_log_lines() {
        let ev = LogEvent {
            level: LogLevel::Warn,
            message: "worker timed out after 100ms".into(),
        };
        assert_eq!(
            format!("[{}] {}", ev.level, ev.message),
            "[WARN] worker timed out after 100ms"
        );
        assert_eq!(LogLevel::Debug.to_string(), "DEBUG");
    }
}
