use std::ffi::c_void;
use std::io;

use widestring::WideCString;
use windows_sys::Win32::System::Services;

use super::service_manager::status_to_raw;
use crate::service::{ServiceControl, ServiceStatus};
use crate::service_control_handler::ServiceControlHandlerResult;
use crate::supervisor::{ControlHandlerFn, StatusHandle, Supervisor};
use crate::{Error, Result};

/// Handle for reporting status of the registered service.
#[derive(Debug, Clone, Copy)]
pub struct ServiceStatusHandle(Services::SERVICE_STATUS_HANDLE);

impl StatusHandle for ServiceStatusHandle {
    fn set_service_status(&self, service_status: ServiceStatus) -> Result<()> {
        let raw_service_status = status_to_raw(&service_status);
        let result = unsafe { Services::SetServiceStatus(self.0, &raw_service_status) };
        if result == 0 {
            Err(Error::Winapi(io::Error::last_os_error()))
        } else {
            Ok(())
        }
    }
}

// Underlying SERVICE_STATUS_HANDLE is thread safe.
// See remarks section for more info:
// https://msdn.microsoft.com/en-us/library/windows/desktop/ms686241(v=vs.85).aspx
unsafe impl Send for ServiceStatusHandle {}
unsafe impl Sync for ServiceStatusHandle {}

/// The service control manager as seen from inside a running service.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScmSupervisor;

impl Supervisor for ScmSupervisor {
    type Handle = ServiceStatusHandle;

    fn register_control_handler(
        &self,
        service_name: &str,
        event_handler: ControlHandlerFn,
    ) -> Result<ServiceStatusHandle> {
        let service_name =
            WideCString::from_str(service_name).map_err(|e| Error::InvalidServiceName(e.into()))?;

        // The system may deliver controls until the process exits, so the handler is never freed
        // once registration succeeds.
        let context: *mut ControlHandlerFn = Box::into_raw(Box::new(event_handler));

        let status_handle = unsafe {
            Services::RegisterServiceCtrlHandlerExW(
                service_name.as_ptr(),
                Some(service_control_handler),
                context as *const c_void,
            )
        };

        if status_handle.is_null() {
            let error = io::Error::last_os_error();
            // Release the `event_handler` in case of an error.
            drop(unsafe { Box::from_raw(context) });
            Err(Error::Winapi(error))
        } else {
            Ok(ServiceStatusHandle(status_handle))
        }
    }
}

/// Static callback used by the system to deliver control events.
unsafe extern "system" fn service_control_handler(
    control: u32,
    _event_type: u32,
    _event_data: *mut c_void,
    context: *mut c_void,
) -> u32 {
    // Important: cast context to &mut without taking ownership.
    let event_handler = unsafe { &mut *(context as *mut ControlHandlerFn) };

    match ServiceControl::from_raw(control) {
        Ok(service_control) => event_handler(service_control).to_raw(),
        // Report all unknown control commands as unimplemented
        Err(_) => {
            log::debug!("Ignoring unknown control code {}", control);
            ServiceControlHandlerResult::NotImplemented.to_raw()
        }
    }
}
