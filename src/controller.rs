use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::console::Console;
use crate::eventlog::{EventLog, EventSeverity};
use crate::lifecycle::{self, InvalidTransition, LifecycleEvent};
use crate::service::{ServiceExitCode, ServiceState};
use crate::status_reporter::StatusReporter;
use crate::supervisor::StatusHandle;

pub type SharedController<H> = Arc<Mutex<ServiceController<H>>>;

#[derive(thiserror::Error, Debug)]
pub enum LifecycleError {
    /// The control handler could not be registered, so the service has no identity to report
    /// status with.
    #[error("Failed to register the service control handler")]
    Register(#[source] crate::Error),

    #[error("Invalid lifecycle transition")]
    Transition(#[from] InvalidTransition),

    /// The service body failed and the service was stopped with the given exit code.
    #[error("Service body failed with {0:?}")]
    Body(ServiceExitCode),
}

impl LifecycleError {
    pub fn code(&self) -> i32 {
        match self {
            LifecycleError::Register(_) => -2,
            LifecycleError::Transition(_) => -3,
            LifecycleError::Body(_) => -4,
        }
    }
}

/// Service specific work run around the lifecycle transitions.
///
/// An error carries the exit code reported to the system along with the `Stopped` state.
pub trait ServiceBody: Send {
    fn on_start(&mut self) -> Result<(), ServiceExitCode> {
        Ok(())
    }

    fn on_stop(&mut self) -> Result<(), ServiceExitCode> {
        Ok(())
    }
}

/// Body of a service that does nothing besides reporting that it started and stopped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopBody;

impl ServiceBody for NoopBody {}

/// Owns the status record of the hosted service and drives it through the lifecycle.
pub struct ServiceController<H> {
    reporter: StatusReporter<H>,
    state: Option<ServiceState>,
    body: Box<dyn ServiceBody>,
    event_log: Box<dyn EventLog>,
    console: Arc<dyn Console>,
}

impl<H: StatusHandle> ServiceController<H> {
    pub fn new(
        reporter: StatusReporter<H>,
        body: Box<dyn ServiceBody>,
        event_log: Box<dyn EventLog>,
        console: Arc<dyn Console>,
    ) -> Self {
        ServiceController {
            reporter,
            state: None,
            body,
            event_log,
            console,
        }
    }

    /// Current state, `None` until [`start`](Self::start) has been called.
    pub fn state(&self) -> Option<ServiceState> {
        self.state
    }

    pub fn reporter(&self) -> &StatusReporter<H> {
        &self.reporter
    }

    /// `StartPending -> Running`.
    pub fn start(&mut self) -> Result<(), LifecycleError> {
        self.advance(LifecycleEvent::StartRequested, ServiceExitCode::NO_ERROR)?;

        match self.body.on_start() {
            Ok(()) => {
                self.write_event(EventSeverity::Success, "[WSVC] Service is running.");
                self.advance(LifecycleEvent::Started, ServiceExitCode::NO_ERROR)?;
                Ok(())
            }
            Err(exit_code) => {
                log::error!("Service failed to start: {:?}", exit_code);
                self.write_event(EventSeverity::Error, "[WSVC] Service failed to start.");
                self.advance(LifecycleEvent::StartFailed, exit_code)?;
                Err(LifecycleError::Body(exit_code))
            }
        }
    }

    /// `Running -> StopPending -> Stopped`.
    pub fn stop(&mut self) -> Result<(), LifecycleError> {
        self.advance(LifecycleEvent::StopRequested, ServiceExitCode::NO_ERROR)?;

        let result = self.body.on_stop();
        match result {
            Ok(()) => self.write_event(EventSeverity::Success, "[WSVC] Service is stopping."),
            Err(exit_code) => {
                log::error!("Service failed to stop cleanly: {:?}", exit_code);
                self.write_event(EventSeverity::Error, "[WSVC] Service failed to stop cleanly.")
            }
        }

        let exit_code = result.err().unwrap_or(ServiceExitCode::NO_ERROR);
        self.advance(LifecycleEvent::Stopped, exit_code)?;
        if exit_code == ServiceExitCode::NO_ERROR {
            Ok(())
        } else {
            Err(LifecycleError::Body(exit_code))
        }
    }

    fn advance(
        &mut self,
        event: LifecycleEvent,
        exit_code: ServiceExitCode,
    ) -> Result<ServiceState, LifecycleError> {
        let next_state = lifecycle::transition(self.state, event)?;
        self.state = Some(next_state);
        log::info!("Service state: {:?}", next_state);

        // There is nothing to recover locally: the system decides whether it still tracks us.
        if let Err(e) = self.reporter.report(next_state, exit_code) {
            log::error!("Failed to set service status {:?}: {}", next_state, e);
            let _ = self
                .console
                .write_stderr("[WSVC RUN] ERROR: Failed to set service status.");
        }
        Ok(next_state)
    }

    fn write_event(&self, severity: EventSeverity, message: &str) {
        if let Err(e) = self.event_log.write_event(severity, message) {
            log::warn!("Failed to write event log record (code {}): {}", e.code(), e);
        }
    }
}

/// Lock the controller, recovering it if a previous holder panicked.
pub fn lock<H>(controller: &Mutex<ServiceController<H>>) -> MutexGuard<'_, ServiceController<H>> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}
