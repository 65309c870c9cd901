//! The capability the hosted service needs from its supervisor.
//!
//! On Windows the supervisor is the service control manager, see `windows::ScmSupervisor`. Tests
//! substitute a fake that records status reports and delivers controls synchronously.

use std::sync::{Arc, Mutex, OnceLock};

use crate::console::Console;
use crate::controller::{lock, LifecycleError, ServiceBody, ServiceController, SharedController};
use crate::definition::ServiceDefinition;
use crate::eventlog::EventLog;
use crate::service::{ServiceControl, ServiceStatus};
use crate::service_control_handler::{ControlCallback, ServiceControlHandlerResult};
use crate::status_reporter::StatusReporter;
use crate::Result;

/// Token for updating the status of the registered service.
pub trait StatusHandle: Send + Sync + 'static {
    fn set_service_status(&self, service_status: ServiceStatus) -> Result<()>;
}

/// Closure receiving control events on a thread owned by the supervisor.
pub type ControlHandlerFn =
    Box<dyn FnMut(ServiceControl) -> ServiceControlHandlerResult + Send + 'static>;

pub trait Supervisor {
    type Handle: StatusHandle;

    /// Register `event_handler` for the service called `service_name`.
    ///
    /// Controls are only routed to the handler once this call has returned a handle.
    fn register_control_handler(
        &self,
        service_name: &str,
        event_handler: ControlHandlerFn,
    ) -> Result<Self::Handle>;
}

/// Entry point of an activated service.
///
/// Registers the control callback, builds the controller and drives it to `Running`. The
/// returned controller stays reachable from the control callback, which performs the stop
/// sequence when the supervisor delivers a stop control.
pub fn service_main<S: Supervisor>(
    supervisor: &S,
    definition: &ServiceDefinition,
    body: impl ServiceBody + 'static,
    event_log: impl EventLog + 'static,
    console: Arc<dyn Console>,
) -> std::result::Result<SharedController<S::Handle>, LifecycleError> {
    let slot: Arc<OnceLock<SharedController<S::Handle>>> = Arc::new(OnceLock::new());
    let callback = ControlCallback::new(Arc::clone(&slot));
    let event_handler: ControlHandlerFn =
        Box::new(move |control_event| callback.on_control(control_event));

    let handle = match supervisor.register_control_handler(definition.name, event_handler) {
        Ok(handle) => handle,
        Err(e) => {
            log::error!("Failed to register service control handler: {}", e);
            let _ = console
                .write_stderr("[WSVC RUN] ERROR: Failed to register service control handler.");
            return Err(LifecycleError::Register(e));
        }
    };

    let reporter = StatusReporter::new(
        handle,
        definition.service_type,
        definition.pending_wait_hint,
    );
    let controller = Arc::new(Mutex::new(ServiceController::new(
        reporter,
        Box::new(body),
        Box::new(event_log),
        console,
    )));
    // The slot is only ever filled here.
    let _ = slot.set(Arc::clone(&controller));

    lock(&controller).start()?;
    Ok(controller)
}
