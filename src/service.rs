use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::winsvc_vendored as winsvc;

bitflags::bitflags! {
    /// Type of a Windows service.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ServiceType: u32 {
        /// Service that runs in its own process.
        const OWN_PROCESS = winsvc::SERVICE_WIN32_OWN_PROCESS;
    }
}

bitflags::bitflags! {
    /// Access rights requested when opening or creating a service.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ServiceAccess: u32 {
        /// Can query the service status
        const QUERY_STATUS = winsvc::SERVICE_QUERY_STATUS;

        /// Can delete the service
        const DELETE = winsvc::DELETE;
    }
}

/// Error returned when a raw integer does not map onto one of the typed service enums.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseRawError {
    #[error("Invalid integer value: {0}")]
    InvalidInteger(u32),
}

/// How the system starts the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ServiceStartType {
    /// Started by an explicit request, never at boot.
    OnDemand = winsvc::SERVICE_DEMAND_START,
}

impl ServiceStartType {
    pub fn to_raw(&self) -> u32 {
        *self as u32
    }
}

/// Error handling strategy for service failures.
///
/// See <https://msdn.microsoft.com/en-us/library/windows/desktop/ms682450(v=vs.85).aspx>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ServiceErrorControl {
    /// The failure is logged and startup continues.
    Normal = winsvc::SERVICE_ERROR_NORMAL,
}

impl ServiceErrorControl {
    pub fn to_raw(&self) -> u32 {
        *self as u32
    }
}

/// A struct that describes the service registration kept by the service control manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceInfo {
    /// Service name
    pub name: OsString,

    /// User-friendly service name
    pub display_name: OsString,

    /// The service type
    pub service_type: ServiceType,

    /// The service startup options
    pub start_type: ServiceStartType,

    /// The severity of the error, and action taken, if this service fails to start.
    pub error_control: ServiceErrorControl,

    /// Path to the service binary
    pub executable_path: PathBuf,

    /// Launch arguments passed to `main` when system starts the service.
    /// This is not the same as arguments passed to `service_main`.
    pub launch_arguments: Vec<OsString>,

    /// Account to use for running the service.
    /// for example: NT AUTHORITY\LocalService.
    /// use `None` to run as LocalSystem.
    pub account_name: Option<OsString>,

    /// Account password.
    /// For system accounts this should normally be `None`.
    pub account_password: Option<OsString>,
}

/// Enum describing the service control operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ServiceControl {
    Continue = winsvc::SERVICE_CONTROL_CONTINUE,
    Interrogate = winsvc::SERVICE_CONTROL_INTERROGATE,
    NetBindAdd = winsvc::SERVICE_CONTROL_NETBINDADD,
    NetBindDisable = winsvc::SERVICE_CONTROL_NETBINDDISABLE,
    NetBindEnable = winsvc::SERVICE_CONTROL_NETBINDENABLE,
    NetBindRemove = winsvc::SERVICE_CONTROL_NETBINDREMOVE,
    ParamChange = winsvc::SERVICE_CONTROL_PARAMCHANGE,
    Pause = winsvc::SERVICE_CONTROL_PAUSE,
    Preshutdown = winsvc::SERVICE_CONTROL_PRESHUTDOWN,
    Shutdown = winsvc::SERVICE_CONTROL_SHUTDOWN,
    Stop = winsvc::SERVICE_CONTROL_STOP,
}

impl ServiceControl {
    pub fn from_raw(raw_value: u32) -> Result<Self, ParseRawError> {
        match raw_value {
            x if x == ServiceControl::Continue.to_raw() => Ok(ServiceControl::Continue),
            x if x == ServiceControl::Interrogate.to_raw() => Ok(ServiceControl::Interrogate),
            x if x == ServiceControl::NetBindAdd.to_raw() => Ok(ServiceControl::NetBindAdd),
            x if x == ServiceControl::NetBindDisable.to_raw() => Ok(ServiceControl::NetBindDisable),
            x if x == ServiceControl::NetBindEnable.to_raw() => Ok(ServiceControl::NetBindEnable),
            x if x == ServiceControl::NetBindRemove.to_raw() => Ok(ServiceControl::NetBindRemove),
            x if x == ServiceControl::ParamChange.to_raw() => Ok(ServiceControl::ParamChange),
            x if x == ServiceControl::Pause.to_raw() => Ok(ServiceControl::Pause),
            x if x == ServiceControl::Preshutdown.to_raw() => Ok(ServiceControl::Preshutdown),
            x if x == ServiceControl::Shutdown.to_raw() => Ok(ServiceControl::Shutdown),
            x if x == ServiceControl::Stop.to_raw() => Ok(ServiceControl::Stop),
            other => Err(ParseRawError::InvalidInteger(other)),
        }
    }

    pub fn to_raw(&self) -> u32 {
        *self as u32
    }
}

/// Service state returned as a part of [`ServiceStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ServiceState {
    Stopped = winsvc::SERVICE_STOPPED,
    StartPending = winsvc::SERVICE_START_PENDING,
    StopPending = winsvc::SERVICE_STOP_PENDING,
    Running = winsvc::SERVICE_RUNNING,
    ContinuePending = winsvc::SERVICE_CONTINUE_PENDING,
    PausePending = winsvc::SERVICE_PAUSE_PENDING,
    Paused = winsvc::SERVICE_PAUSED,
}

impl ServiceState {
    pub fn from_raw(raw_state: u32) -> Result<Self, ParseRawError> {
        match raw_state {
            x if x == ServiceState::Stopped.to_raw() => Ok(ServiceState::Stopped),
            x if x == ServiceState::StartPending.to_raw() => Ok(ServiceState::StartPending),
            x if x == ServiceState::StopPending.to_raw() => Ok(ServiceState::StopPending),
            x if x == ServiceState::Running.to_raw() => Ok(ServiceState::Running),
            x if x == ServiceState::ContinuePending.to_raw() => Ok(ServiceState::ContinuePending),
            x if x == ServiceState::PausePending.to_raw() => Ok(ServiceState::PausePending),
            x if x == ServiceState::Paused.to_raw() => Ok(ServiceState::Paused),
            other => Err(ParseRawError::InvalidInteger(other)),
        }
    }

    pub fn to_raw(&self) -> u32 {
        *self as u32
    }

    /// Returns `true` for the transitional states in which the system expects the checkpoint
    /// to advance.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            ServiceState::StartPending
                | ServiceState::StopPending
                | ServiceState::ContinuePending
                | ServiceState::PausePending
        )
    }
}

/// Service exit code abstraction.
///
/// The service can either return a win32 error code or a custom error code. In case of custom
/// error, `dwWin32ExitCode` has to be set to `ERROR_SERVICE_SPECIFIC_ERROR` and the
/// `dwServiceSpecificExitCode` assigned with custom error code.
///
/// Refer to the corresponding MSDN article for more info:\
/// <https://msdn.microsoft.com/en-us/library/windows/desktop/ms685996(v=vs.85).aspx>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceExitCode {
    Win32(u32),
    ServiceSpecific(u32),
}

impl ServiceExitCode {
    /// A `ServiceExitCode` indicating success, no errors.
    pub const NO_ERROR: Self = ServiceExitCode::Win32(winsvc::NO_ERROR);

    /// Splits the exit code into the `(dwWin32ExitCode, dwServiceSpecificExitCode)` pair.
    pub fn to_raw_parts(&self) -> (u32, u32) {
        match *self {
            ServiceExitCode::Win32(win32_error_code) => (win32_error_code, 0),
            ServiceExitCode::ServiceSpecific(service_error_code) => {
                (winsvc::ERROR_SERVICE_SPECIFIC_ERROR, service_error_code)
            }
        }
    }

    pub fn from_raw_parts(win32_exit_code: u32, service_specific_exit_code: u32) -> Self {
        if win32_exit_code == winsvc::ERROR_SERVICE_SPECIFIC_ERROR {
            ServiceExitCode::ServiceSpecific(service_specific_exit_code)
        } else {
            ServiceExitCode::Win32(win32_exit_code)
        }
    }
}

impl Default for ServiceExitCode {
    fn default() -> Self {
        Self::NO_ERROR
    }
}

bitflags::bitflags! {
    /// Flags describing accepted types of service control events.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ServiceControlAccept: u32 {
        /// The service can be stopped.
        const STOP = winsvc::SERVICE_ACCEPT_STOP;
    }
}

/// Service status.
///
/// Mirrors the lower level `SERVICE_STATUS`. Please refer to the corresponding MSDN article and
/// in particular how to fill in the `exit_code`, `checkpoint`, `wait_hint` fields:\
/// <https://msdn.microsoft.com/en-us/library/windows/desktop/ms685996(v=vs.85).aspx>
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceStatus {
    /// Type of service.
    pub service_type: ServiceType,

    /// Current state of the service.
    pub current_state: ServiceState,

    /// Control commands that service accepts.
    pub controls_accepted: ServiceControlAccept,

    /// The error code the service uses to report an error that occurs when it is starting or
    /// stopping.
    pub exit_code: ServiceExitCode,

    /// Service initialization progress value that should be increased during a lengthy start,
    /// stop, pause or continue operations.
    /// This value must be zero if the service does not have any pending start, stop, pause or
    /// continue operations.
    pub checkpoint: u32,

    /// Estimated time for pending operation.
    /// This basically works as a timeout until the system assumes that the service hung.
    /// This could be either circumvented by updating the [`ServiceStatus::current_state`] or
    /// incrementing a [`ServiceStatus::checkpoint`] value.
    pub wait_hint: Duration,
}
