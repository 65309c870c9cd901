use std::sync::{Arc, OnceLock};

use crate::controller::{lock, LifecycleError, SharedController};
use crate::service::ServiceControl;
use crate::supervisor::StatusHandle;
use crate::winsvc_vendored::{
    ERROR_CALL_NOT_IMPLEMENTED, ERROR_SERVICE_CANNOT_ACCEPT_CTRL, NO_ERROR,
};

/// Abstraction over the return value of service control handler.
/// The meaning of each of variants in this enum depends on the type of received event.
///
/// See the "Return value" section of corresponding MSDN article for more info:
///
/// <https://msdn.microsoft.com/en-us/library/windows/desktop/ms683241(v=vs.85).aspx>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceControlHandlerResult {
    /// Either used to aknowledge the call or grant the permission in advanced events.
    NoError,
    /// The received event is not implemented.
    NotImplemented,
    /// This variant is used to deny permission and return the reason error code in advanced
    /// events.
    Other(u32),
}

impl ServiceControlHandlerResult {
    pub fn to_raw(&self) -> u32 {
        match *self {
            ServiceControlHandlerResult::NoError => NO_ERROR,
            ServiceControlHandlerResult::NotImplemented => ERROR_CALL_NOT_IMPLEMENTED,
            ServiceControlHandlerResult::Other(code) => code,
        }
    }
}

/// Demultiplexes control events onto the service controller.
///
/// The controller is looked up through a slot that is filled once the supervisor has handed out
/// the status handle, because the handler has to exist before the handle does.
pub struct ControlCallback<H> {
    controller: Arc<OnceLock<SharedController<H>>>,
}

impl<H: StatusHandle> ControlCallback<H> {
    pub fn new(controller: Arc<OnceLock<SharedController<H>>>) -> Self {
        ControlCallback { controller }
    }

    pub fn on_control(&self, control_event: ServiceControl) -> ServiceControlHandlerResult {
        log::debug!("Received service control event: {:?}", control_event);
        match control_event {
            ServiceControl::Stop => self.stop(),
            _ => ServiceControlHandlerResult::NotImplemented,
        }
    }

    fn stop(&self) -> ServiceControlHandlerResult {
        let Some(controller) = self.controller.get() else {
            log::warn!("Stop received before the service finished registering");
            return ServiceControlHandlerResult::Other(ERROR_SERVICE_CANNOT_ACCEPT_CTRL);
        };

        match lock(controller).stop() {
            Ok(()) => ServiceControlHandlerResult::NoError,
            // Stopped anyway, the exit code went out with the final status.
            Err(LifecycleError::Body(_)) => ServiceControlHandlerResult::NoError,
            Err(e) => {
                log::error!("Failed to stop the service: {}", e);
                ServiceControlHandlerResult::Other(ERROR_SERVICE_CANNOT_ACCEPT_CTRL)
            }
        }
    }
}
