use crate::service::{ServiceAccess, ServiceInfo, ServiceStatus};
use crate::winsvc_vendored as winsvc;
use crate::Result;

bitflags::bitflags! {
    /// Flags describing access permissions for a service control manager connection.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ServiceManagerAccess: u32 {
        /// Can connect to service control manager.
        const CONNECT = winsvc::SC_MANAGER_CONNECT;

        /// Can create services.
        const CREATE_SERVICE = winsvc::SC_MANAGER_CREATE_SERVICE;
    }
}

/// Opens connections to the local services database.
pub trait ManagerConnector {
    type Manager: ServiceControlManager;

    fn connect(&self, request_access: ServiceManagerAccess) -> Result<Self::Manager>;
}

/// An open connection to the services database. Dropping it releases the connection.
pub trait ServiceControlManager {
    type Service: ManagedService;

    /// Create a service registration from `service_info`.
    fn create_service(
        &self,
        service_info: &ServiceInfo,
        service_access: ServiceAccess,
    ) -> Result<Self::Service>;

    /// Open an existing service registration.
    fn open_service(&self, name: &str, request_access: ServiceAccess) -> Result<Self::Service>;
}

/// An open handle to a registered service. Dropping it releases the handle.
pub trait ManagedService {
    /// Get the service status from the system.
    fn query_status(&self) -> Result<ServiceStatus>;

    /// Mark the service for deletion from the system registry.
    fn delete(self) -> Result<()>;
}
