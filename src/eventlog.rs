//! Structured records for the platform event log.

use std::io;

/// Severity of an event log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSeverity {
    Success,
    Information,
    Warning,
    Error,
}

#[derive(thiserror::Error, Debug)]
pub enum EventLogError {
    /// The record was handed to the event log but it refused it.
    #[error("Failed to report the event")]
    ReportFailed(#[source] io::Error),

    /// The event source could not be opened.
    #[error("Failed to register the event source")]
    SourceUnavailable(#[source] io::Error),

    #[error("Refusing to write an empty event log message")]
    EmptyMessage,

    /// The message cannot be passed to the system.
    #[error("Event log message contains a nul character at position {0}")]
    InvalidMessage(usize),

    #[error("Event source name contains a nul character at position {0}")]
    InvalidSource(usize),
}

impl EventLogError {
    pub fn code(&self) -> i32 {
        match self {
            EventLogError::ReportFailed(_) => -1,
            EventLogError::SourceUnavailable(_) => -2,
            EventLogError::EmptyMessage => -3,
            EventLogError::InvalidMessage(_) => -4,
            EventLogError::InvalidSource(_) => -5,
        }
    }
}

/// Writer of event log records. Failures are reported but callers are not required to act on
/// them.
pub trait EventLog: Send {
    fn write_event(&self, severity: EventSeverity, message: &str) -> Result<(), EventLogError>;
}

/// Rejects messages the event log would not accept.
#[cfg(any(windows, test))]
pub(crate) fn validate_message(message: &str) -> Result<(), EventLogError> {
    if message.is_empty() {
        return Err(EventLogError::EmptyMessage);
    }
    match message.find('\0') {
        Some(position) => Err(EventLogError::InvalidMessage(position)),
        None => Ok(()),
    }
}

/// Rejects event source names that cannot be registered.
#[cfg(any(windows, test))]
pub(crate) fn validate_source(source_name: &str) -> Result<(), EventLogError> {
    match source_name.find('\0') {
        Some(position) => Err(EventLogError::InvalidSource(position)),
        None => Ok(()),
    }
}
