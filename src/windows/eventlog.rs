use std::{io, ptr};

use widestring::WideCString;
use windows_sys::Win32::System::EventLog::{
    DeregisterEventSource, RegisterEventSourceW, ReportEventW, EVENTLOG_ERROR_TYPE,
    EVENTLOG_INFORMATION_TYPE, EVENTLOG_SUCCESS, EVENTLOG_WARNING_TYPE, REPORT_EVENT_TYPE,
};

use crate::eventlog::{
    validate_message, validate_source, EventLog, EventLogError, EventSeverity,
};

fn to_event_type(severity: EventSeverity) -> REPORT_EVENT_TYPE {
    match severity {
        EventSeverity::Success => EVENTLOG_SUCCESS,
        EventSeverity::Information => EVENTLOG_INFORMATION_TYPE,
        EventSeverity::Warning => EVENTLOG_WARNING_TYPE,
        EventSeverity::Error => EVENTLOG_ERROR_TYPE,
    }
}

/// Writes records to the Application event log under `source_name`.
///
/// The event source is registered for each record and deregistered right after.
pub struct WindowsEventLog {
    source_name: WideCString,
}

impl WindowsEventLog {
    pub fn new(source_name: &str) -> Result<Self, EventLogError> {
        validate_source(source_name)?;
        let source_name = WideCString::from_str(source_name)
            .map_err(|e| EventLogError::InvalidSource(e.nul_position()))?;
        Ok(WindowsEventLog { source_name })
    }
}

impl EventLog for WindowsEventLog {
    fn write_event(&self, severity: EventSeverity, message: &str) -> Result<(), EventLogError> {
        validate_message(message)?;
        let wide_message = WideCString::from_str(message)
            .map_err(|e| EventLogError::InvalidMessage(e.nul_position()))?;

        let event_source = unsafe { RegisterEventSourceW(ptr::null(), self.source_name.as_ptr()) };
        if event_source.is_null() {
            return Err(EventLogError::SourceUnavailable(io::Error::last_os_error()));
        }

        let strings = [wide_message.as_ptr()];
        let reported = unsafe {
            ReportEventW(
                event_source,
                to_event_type(severity),
                0,
                0,
                ptr::null_mut(),
                1,
                0,
                strings.as_ptr(),
                ptr::null(),
            )
        };
        let result = if reported == 0 {
            Err(EventLogError::ReportFailed(io::Error::last_os_error()))
        } else {
            Ok(())
        };

        unsafe { DeregisterEventSource(event_source) };
        result
    }
}
