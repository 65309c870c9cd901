use crate::console::Console;
use crate::definition::ServiceDefinition;
use crate::service::{ServiceAccess, ServiceState};
use crate::service_manager::{
    ManagedService, ManagerConnector, ServiceControlManager, ServiceManagerAccess,
};

#[derive(thiserror::Error, Debug)]
pub enum UninstallError {
    #[error("Failed to connect to the service control manager")]
    Connect(#[source] crate::Error),

    #[error("Failed to open service")]
    OpenService(#[source] crate::Error),

    #[error("Failed to query service status")]
    QueryStatus(#[source] crate::Error),

    /// Deleting a registration whose process may still run would orphan that process.
    #[error("Service not stopped (current state: {0:?})")]
    NotStopped(ServiceState),

    #[error("Failed to delete service")]
    Delete(#[source] crate::Error),
}

impl UninstallError {
    pub fn code(&self) -> i32 {
        match self {
            UninstallError::Connect(_) => -2,
            UninstallError::OpenService(_) => -3,
            UninstallError::QueryStatus(_) => -4,
            UninstallError::NotStopped(_) => -5,
            UninstallError::Delete(_) => -6,
        }
    }
}

/// Remove the registration of `definition`. The service has to be stopped first.
pub fn uninstall<C: ManagerConnector>(
    connector: &C,
    definition: &ServiceDefinition,
    console: &dyn Console,
) -> Result<(), UninstallError> {
    let _ = console.write_stdout("[WSVC UNINSTALL] Starting uninstallation process.");

    let service_manager = connector
        .connect(ServiceManagerAccess::CONNECT)
        .map_err(|e| {
            let _ = console
                .write_stderr("[WSVC UNINSTALL] ERROR: Failed to get the handle to the SCM.");
            UninstallError::Connect(e)
        })?;

    let service_access = ServiceAccess::QUERY_STATUS | ServiceAccess::DELETE;
    let service = service_manager
        .open_service(definition.name, service_access)
        .map_err(|e| {
            let _ = console.write_stderr("[WSVC UNINSTALL] ERROR: Failed to open service.");
            UninstallError::OpenService(e)
        })?;

    let service_status = service.query_status().map_err(|e| {
        let _ = console.write_stderr("[WSVC UNINSTALL] ERROR: Failed to query service status.");
        UninstallError::QueryStatus(e)
    })?;

    if service_status.current_state != ServiceState::Stopped {
        let _ = console.write_stderr(
            "[WSVC UNINSTALL] ERROR: Service is not stopped. \
             Please stop the service first before uninstalling.",
        );
        return Err(UninstallError::NotStopped(service_status.current_state));
    }

    log::info!("Removing the service...");
    service.delete().map_err(|e| {
        let _ = console.write_stderr("[WSVC UNINSTALL] ERROR: Failed to delete service.");
        UninstallError::Delete(e)
    })?;

    let _ = console.write_stdout("[WSVC UNINSTALL] Service successfully uninstalled.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::WSVC;
    use crate::fakes::{FakeConsole, FakeServiceManager};
    use assert_matches::assert_matches;

    #[test]
    fn test_uninstall_stopped_service() {
        let manager = FakeServiceManager::with_registration(&WSVC, ServiceState::Stopped);
        let console = FakeConsole::default();

        uninstall(&manager, &WSVC, &console).unwrap();

        assert_eq!(manager.registration_count(), 0);
        assert_eq!(manager.delete_calls(), 1);
        assert_eq!(manager.open_handles(), 0);
        assert_eq!(
            manager.last_manager_access(),
            Some(ServiceManagerAccess::CONNECT)
        );
    }

    #[test]
    fn test_refuses_unless_stopped() {
        for state in [
            ServiceState::Running,
            ServiceState::StartPending,
            ServiceState::StopPending,
            ServiceState::Paused,
        ] {
            let manager = FakeServiceManager::with_registration(&WSVC, state);
            let console = FakeConsole::default();

            let result = uninstall(&manager, &WSVC, &console);

            assert_matches!(result, Err(UninstallError::NotStopped(s)) if s == state);
            assert_eq!(manager.delete_calls(), 0);
            assert_eq!(manager.registration_count(), 1);
            assert_eq!(manager.open_handles(), 0);
            assert!(console.stderr().contains("Service is not stopped"));
        }
    }

    #[test]
    fn test_missing_registration() {
        let manager = FakeServiceManager::default();
        let result = uninstall(&manager, &WSVC, &FakeConsole::default());
        assert_matches!(
            result,
            Err(UninstallError::OpenService(e)) if e.raw_os_error() == Some(1060)
        );
        assert_eq!(manager.open_handles(), 0);
    }

    #[test]
    fn test_query_failure() {
        let manager = FakeServiceManager::with_registration(&WSVC, ServiceState::Stopped);
        manager.fail_queries();
        let result = uninstall(&manager, &WSVC, &FakeConsole::default());
        assert_matches!(result, Err(UninstallError::QueryStatus(_)));
        assert_eq!(manager.delete_calls(), 0);
    }

    #[test]
    fn test_connection_failure() {
        let manager = FakeServiceManager::with_registration(&WSVC, ServiceState::Stopped);
        manager.refuse_connections();
        let result = uninstall(&manager, &WSVC, &FakeConsole::default());
        assert_matches!(result, Err(UninstallError::Connect(_)));
        assert_eq!(manager.registration_count(), 1);
    }

    #[test]
    fn test_delete_failure_has_its_own_code() {
        let manager = FakeServiceManager::with_registration(&WSVC, ServiceState::Stopped);
        manager.fail_deletes();
        let result = uninstall(&manager, &WSVC, &FakeConsole::default());
        let error = result.unwrap_err();
        assert_matches!(error, UninstallError::Delete(_));
        assert_eq!(error.code(), -6);
        assert_eq!(UninstallError::NotStopped(ServiceState::Running).code(), -5);
        assert_eq!(manager.open_handles(), 0);
    }
}
