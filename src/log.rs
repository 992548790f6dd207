//! Injectable log sinks.
//!
//! The toolkit never logs to a process-wide handle. An [`Application`]
//! carries an optional [`LogSink`]; when none is installed, log calls cost a
//! branch and nothing else.
//!
//! [`Application`]: crate::app::Application

/// Log level for sink messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Destination for toolkit log messages.
pub trait LogSink {
    /// Record one message.
    fn log(&self, level: LogLevel, message: &str);
}

/// Sink backed by a closure.
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(LogLevel, &str),
{
    /// Wrap a closure as a sink.
    pub fn new(callback: F) -> Self {
        Self(callback)
    }
}

impl<F> LogSink for FnSink<F>
where
    F: Fn(LogLevel, &str),
{
    fn log(&self, level: LogLevel, message: &str) {
        (self.0)(level, message);
    }
}

/// Sink that forwards to the `tracing` macros under the `ebfe_tui` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "ebfe_tui", "{message}"),
            LogLevel::Info => tracing::info!(target: "ebfe_tui", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "ebfe_tui", "{message}"),
            LogLevel::Error => tracing::error!(target: "ebfe_tui", "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_fn_sink_receives_messages() {
        let seen = RefCell::new(Vec::new());
        let sink = FnSink::new(|level, msg: &str| seen.borrow_mut().push((level, msg.to_string())));
        sink.log(LogLevel::Info, "hello");
        sink.log(LogLevel::Warn, "careful");
        assert_eq!(
            seen.into_inner(),
            vec![
                (LogLevel::Info, "hello".to_string()),
                (LogLevel::Warn, "careful".to_string())
            ]
        );
    }

    #[test]
    fn test_tracing_sink_without_subscriber() {
        // No subscriber installed: must be a silent no-op.
        TracingSink.log(LogLevel::Error, "dropped");
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
