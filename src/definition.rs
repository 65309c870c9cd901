use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::service::{ServiceErrorControl, ServiceInfo, ServiceStartType, ServiceType};

/// Fixed identity of the hosted service.
///
/// The same definition must be used by the install, uninstall and run paths of one build,
/// otherwise control handler registration and uninstallation target the wrong entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Key of the registration in the service control manager.
    pub name: &'static str,
    pub display_name: &'static str,
    /// Account the service process runs under.
    pub account_name: &'static str,
    pub service_type: ServiceType,
    pub start_type: ServiceStartType,
    pub error_control: ServiceErrorControl,
    /// Wait hint sent along with pending status reports.
    pub pending_wait_hint: Duration,
    /// Source name used for event log records.
    pub event_source: &'static str,
}

pub const WSVC: ServiceDefinition = ServiceDefinition {
    name: "wsvc",
    display_name: "wsvc",
    account_name: r"NT AUTHORITY\LocalService",
    service_type: ServiceType::OWN_PROCESS,
    start_type: ServiceStartType::OnDemand,
    error_control: ServiceErrorControl::Normal,
    pending_wait_hint: Duration::from_secs(3),
    event_source: "wsvc",
};

impl ServiceDefinition {
    /// Builds the registration record pointing at `executable_path`.
    pub fn service_info(&self, executable_path: PathBuf) -> ServiceInfo {
        ServiceInfo {
            name: OsString::from(self.name),
            display_name: OsString::from(self.display_name),
            service_type: self.service_type,
            start_type: self.start_type,
            error_control: self.error_control,
            executable_path,
            launch_arguments: vec![],
            account_name: Some(OsString::from(self.account_name)),
            account_password: None,
        }
    }
}
