use std::io;
use std::path::PathBuf;

use crate::console::Console;
use crate::definition::ServiceDefinition;
use crate::service::ServiceAccess;
use crate::service_manager::{ManagerConnector, ServiceControlManager, ServiceManagerAccess};
use crate::winsvc_vendored::ERROR_SERVICE_EXISTS;

#[derive(thiserror::Error, Debug)]
pub enum InstallError {
    #[error("Failed to resolve the path of the running executable")]
    ExecutablePath(#[source] io::Error),

    #[error("Failed to connect to the service control manager")]
    Connect(#[source] crate::Error),

    #[error("Failed to create the service")]
    CreateService(#[source] crate::Error),

    /// A registration with the same name exists already.
    #[error("The service is already installed")]
    AlreadyInstalled(#[source] crate::Error),
}

impl InstallError {
    pub fn code(&self) -> i32 {
        match self {
            InstallError::ExecutablePath(_) => -2,
            InstallError::Connect(_) => -3,
            InstallError::CreateService(_) => -4,
            InstallError::AlreadyInstalled(_) => -5,
        }
    }
}

/// Register `definition` with the service control manager, pointing at the executable returned by
/// `resolve_executable`.
///
/// The manager creates the registration atomically, so a failure leaves nothing behind. The
/// connection and the new service handle are released when they go out of scope.
pub fn install<C: ManagerConnector>(
    connector: &C,
    definition: &ServiceDefinition,
    resolve_executable: impl FnOnce() -> io::Result<PathBuf>,
    console: &dyn Console,
) -> Result<(), InstallError> {
    let _ = console.write_stdout("[WSVC INSTALL] Starting installation process.");

    let executable_path = resolve_executable().map_err(|e| {
        let _ = console.write_stderr(
            "[WSVC INSTALL] ERROR: Failed to get module filename during installation.",
        );
        InstallError::ExecutablePath(e)
    })?;
    log::debug!("Installing {} from {}", definition.name, executable_path.display());

    let manager_access = ServiceManagerAccess::CONNECT | ServiceManagerAccess::CREATE_SERVICE;
    let service_manager = connector.connect(manager_access).map_err(|e| {
        let _ = console.write_stderr("[WSVC INSTALL] ERROR: Failed to get the handle to the SCM.");
        InstallError::Connect(e)
    })?;

    let service_info = definition.service_info(executable_path);
    let _service = service_manager
        .create_service(&service_info, ServiceAccess::QUERY_STATUS)
        .map_err(|e| {
            if e.raw_os_error() == Some(ERROR_SERVICE_EXISTS) {
                let _ = console
                    .write_stderr("[WSVC INSTALL] ERROR: Service is already installed.");
                InstallError::AlreadyInstalled(e)
            } else {
                let _ = console.write_stderr("[WSVC INSTALL] ERROR: Failed to create service.");
                InstallError::CreateService(e)
            }
        })?;

    log::info!("Installed the service.");
    let _ = console.write_stdout("[WSVC INSTALL] Service successfully installed.");
    Ok(())
}
