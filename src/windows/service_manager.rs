use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;
use std::{io, mem, ptr};

use widestring::{WideCString, WideString};
use windows_sys::Win32::System::Services;

use super::sc_handle::ScHandle;
use crate::error::NulError;
use crate::service::{
    ServiceAccess, ServiceControlAccept, ServiceExitCode, ServiceInfo, ServiceState,
    ServiceStatus, ServiceType,
};
use crate::service_manager::{
    ManagedService, ManagerConnector, ServiceControlManager, ServiceManagerAccess,
};
use crate::shell_escape;
use crate::{Error, Result};

/// Connects to the service control manager on the local computer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalServiceManager;

impl ManagerConnector for LocalServiceManager {
    type Manager = ServiceManager;

    fn connect(&self, request_access: ServiceManagerAccess) -> Result<ServiceManager> {
        ServiceManager::local_computer(request_access)
    }
}

/// Open connection to the active services database.
pub struct ServiceManager {
    manager_handle: ScHandle,
}

impl ServiceManager {
    pub fn local_computer(request_access: ServiceManagerAccess) -> Result<Self> {
        let handle =
            unsafe { Services::OpenSCManagerW(ptr::null(), ptr::null(), request_access.bits()) };

        if handle.is_null() {
            Err(Error::Winapi(io::Error::last_os_error()))
        } else {
            Ok(ServiceManager {
                manager_handle: unsafe { ScHandle::new(handle) },
            })
        }
    }
}

impl ServiceControlManager for ServiceManager {
    type Service = Service;

    fn create_service(
        &self,
        service_info: &ServiceInfo,
        service_access: ServiceAccess,
    ) -> Result<Service> {
        let service_name = WideCString::from_os_str(&service_info.name)
            .map_err(|e| Error::InvalidServiceName(e.into()))?;
        let display_name = WideCString::from_os_str(&service_info.display_name)
            .map_err(|e| Error::InvalidDisplayName(e.into()))?;
        let account_name =
            to_wide(service_info.account_name.as_ref()).map_err(Error::InvalidAccountName)?;
        let account_password =
            to_wide(service_info.account_password.as_ref()).map_err(Error::InvalidAccountPassword)?;

        // escape executable path and arguments and combine them into single command
        let mut launch_command_buffer =
            escape_wide(&service_info.executable_path).map_err(Error::InvalidExecutablePath)?;
        for (i, launch_argument) in service_info.launch_arguments.iter().enumerate() {
            let wide =
                escape_wide(launch_argument).map_err(|e| Error::InvalidLaunchArgument(i, e))?;
            launch_command_buffer.push_str(" ");
            launch_command_buffer.push(wide);
        }
        let launch_command = WideCString::from_ustr(launch_command_buffer)
            .map_err(|e| Error::InvalidExecutablePath(e.into()))?;

        let service_handle = unsafe {
            Services::CreateServiceW(
                self.manager_handle.raw_handle(),
                service_name.as_ptr(),
                display_name.as_ptr(),
                service_access.bits(),
                service_info.service_type.bits(),
                service_info.start_type.to_raw(),
                service_info.error_control.to_raw(),
                launch_command.as_ptr(),
                ptr::null(),     // load ordering group
                ptr::null_mut(), // tag id within the load ordering group
                ptr::null(),     // dependencies
                account_name.as_ref().map_or(ptr::null(), |s| s.as_ptr()),
                account_password
                    .as_ref()
                    .map_or(ptr::null(), |s| s.as_ptr()),
            )
        };

        if service_handle.is_null() {
            Err(Error::Winapi(io::Error::last_os_error()))
        } else {
            Ok(Service::new(unsafe { ScHandle::new(service_handle) }))
        }
    }

    fn open_service(&self, name: &str, request_access: ServiceAccess) -> Result<Service> {
        let service_name =
            WideCString::from_str(name).map_err(|e| Error::InvalidServiceName(e.into()))?;
        let service_handle = unsafe {
            Services::OpenServiceW(
                self.manager_handle.raw_handle(),
                service_name.as_ptr(),
                request_access.bits(),
            )
        };

        if service_handle.is_null() {
            Err(Error::Winapi(io::Error::last_os_error()))
        } else {
            Ok(Service::new(unsafe { ScHandle::new(service_handle) }))
        }
    }
}

/// Open handle to a registered service.
pub struct Service {
    service_handle: ScHandle,
}

impl Service {
    fn new(service_handle: ScHandle) -> Self {
        Service { service_handle }
    }
}

impl ManagedService for Service {
    fn query_status(&self) -> Result<ServiceStatus> {
        let mut raw_status = unsafe { mem::zeroed::<Services::SERVICE_STATUS>() };
        let success = unsafe {
            Services::QueryServiceStatus(self.service_handle.raw_handle(), &mut raw_status)
        };
        if success == 0 {
            Err(Error::Winapi(io::Error::last_os_error()))
        } else {
            status_from_raw(&raw_status)
        }
    }

    fn delete(self) -> Result<()> {
        let success = unsafe { Services::DeleteService(self.service_handle.raw_handle()) };
        if success == 0 {
            Err(Error::Winapi(io::Error::last_os_error()))
        } else {
            Ok(())
        }
    }
}

pub(crate) fn status_to_raw(status: &ServiceStatus) -> Services::SERVICE_STATUS {
    let (win32_exit_code, service_specific_exit_code) = status.exit_code.to_raw_parts();
    Services::SERVICE_STATUS {
        dwServiceType: status.service_type.bits(),
        dwCurrentState: status.current_state.to_raw(),
        dwControlsAccepted: status.controls_accepted.bits(),
        dwWin32ExitCode: win32_exit_code,
        dwServiceSpecificExitCode: service_specific_exit_code,
        dwCheckPoint: status.checkpoint,
        dwWaitHint: u32::try_from(status.wait_hint.as_millis()).unwrap_or(u32::MAX),
    }
}

fn status_from_raw(raw_status: &Services::SERVICE_STATUS) -> Result<ServiceStatus> {
    Ok(ServiceStatus {
        service_type: ServiceType::from_bits_truncate(raw_status.dwServiceType),
        current_state: ServiceState::from_raw(raw_status.dwCurrentState)
            .map_err(Error::InvalidServiceState)?,
        controls_accepted: ServiceControlAccept::from_bits_truncate(
            raw_status.dwControlsAccepted,
        ),
        exit_code: ServiceExitCode::from_raw_parts(
            raw_status.dwWin32ExitCode,
            raw_status.dwServiceSpecificExitCode,
        ),
        checkpoint: raw_status.dwCheckPoint,
        wait_hint: std::time::Duration::from_millis(u64::from(raw_status.dwWaitHint)),
    })
}

fn to_wide<T: AsRef<OsStr>>(s: Option<T>) -> std::result::Result<Option<WideCString>, NulError> {
    match s {
        Some(s) => Ok(Some(WideCString::from_os_str(s)?)),
        None => Ok(None),
    }
}

fn escape_wide<T: AsRef<OsStr>>(s: T) -> std::result::Result<WideString, NulError> {
    let wide: Vec<u16> = s.as_ref().encode_wide().collect();
    if let Some(position) = wide.iter().position(|&c| c == 0) {
        return Err(NulError::new(position));
    }
    Ok(WideString::from_vec(shell_escape::escape(&wide).into_owned()))
}
