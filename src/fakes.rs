//! In-memory stand-ins for the service control manager and the output collaborators.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::console::{Console, ConsoleError};
use crate::controller::{lock, NoopBody};
use crate::definition::{ServiceDefinition, WSVC};
use crate::eventlog::{self, EventLog, EventLogError, EventSeverity};
use crate::lifecycle;
use crate::service::{
    ServiceAccess, ServiceControl, ServiceExitCode, ServiceInfo, ServiceState, ServiceStatus,
};
use crate::service_control_handler::ServiceControlHandlerResult;
use crate::service_dispatcher::ServiceDispatcher;
use crate::service_manager::{
    ManagedService, ManagerConnector, ServiceControlManager, ServiceManagerAccess,
};
use crate::supervisor::{self, ControlHandlerFn, StatusHandle, Supervisor};
use crate::winsvc_vendored as winsvc;
use crate::{Error, Result};

fn win32_error(code: u32) -> Error {
    Error::Winapi(io::Error::from_raw_os_error(code as i32))
}

const ERROR_ACCESS_DENIED: u32 = 5;
const ERROR_INVALID_HANDLE: u32 = 6;
const ERROR_SERVICE_DOES_NOT_EXIST: u32 = 1060;
const ERROR_FAILED_SERVICE_CONTROLLER_CONNECT: u32 = 1063;

/// Records every status submission. Clones share the same record.
#[derive(Clone, Default)]
pub struct FakeStatusHandle {
    submitted: Arc<Mutex<Vec<ServiceStatus>>>,
    attempted: Arc<Mutex<Vec<ServiceStatus>>>,
    failures: Arc<AtomicUsize>,
}

impl FakeStatusHandle {
    /// Statuses the fake system accepted.
    pub fn submitted(&self) -> Vec<ServiceStatus> {
        self.submitted.lock().unwrap().clone()
    }

    /// Every status handed to the fake, accepted or not.
    pub fn attempted(&self) -> Vec<ServiceStatus> {
        self.attempted.lock().unwrap().clone()
    }

    pub fn fail_next_submissions(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }
}

impl StatusHandle for FakeStatusHandle {
    fn set_service_status(&self, service_status: ServiceStatus) -> Result<()> {
        self.attempted.lock().unwrap().push(service_status.clone());
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(win32_error(ERROR_INVALID_HANDLE));
        }
        self.submitted.lock().unwrap().push(service_status);
        Ok(())
    }
}

/// Supervisor that keeps the registered handler and delivers controls on the calling thread.
#[derive(Default)]
pub struct FakeSupervisor {
    handle: FakeStatusHandle,
    registered_names: Mutex<Vec<String>>,
    event_handler: Mutex<Option<ControlHandlerFn>>,
    fail_registration: AtomicBool,
}

impl FakeSupervisor {
    pub fn registered_names(&self) -> Vec<String> {
        self.registered_names.lock().unwrap().clone()
    }

    /// Returns `None` if no handler is registered.
    pub fn deliver(&self, control: ServiceControl) -> Option<ServiceControlHandlerResult> {
        let mut event_handler = self.event_handler.lock().unwrap();
        event_handler.as_mut().map(|handler| handler(control))
    }

    pub fn submitted(&self) -> Vec<ServiceStatus> {
        self.handle.submitted()
    }

    pub fn attempted_exit_codes(&self) -> Vec<ServiceExitCode> {
        self.handle
            .attempted()
            .iter()
            .map(|status| status.exit_code)
            .collect()
    }

    pub fn fail_registration(&self) {
        self.fail_registration.store(true, Ordering::SeqCst);
    }

    pub fn fail_status_submissions(&self, count: usize) {
        self.handle.fail_next_submissions(count);
    }
}

impl Supervisor for FakeSupervisor {
    type Handle = FakeStatusHandle;

    fn register_control_handler(
        &self,
        service_name: &str,
        event_handler: ControlHandlerFn,
    ) -> Result<FakeStatusHandle> {
        if self.fail_registration.load(Ordering::SeqCst) {
            return Err(win32_error(ERROR_SERVICE_DOES_NOT_EXIST));
        }
        self.registered_names
            .lock()
            .unwrap()
            .push(service_name.to_owned());
        *self.event_handler.lock().unwrap() = Some(event_handler);
        Ok(self.handle.clone())
    }
}

#[derive(Default)]
pub struct FakeConsole {
    stdout: Mutex<Vec<String>>,
    stderr: Mutex<Vec<String>>,
}

impl FakeConsole {
    pub fn stdout(&self) -> String {
        self.stdout.lock().unwrap().join("\n")
    }

    pub fn stderr(&self) -> String {
        self.stderr.lock().unwrap().join("\n")
    }
}

impl Console for FakeConsole {
    fn write_stdout(&self, text: &str) -> std::result::Result<(), ConsoleError> {
        self.stdout.lock().unwrap().push(text.to_owned());
        Ok(())
    }

    fn write_stderr(&self, text: &str) -> std::result::Result<(), ConsoleError> {
        self.stderr.lock().unwrap().push(text.to_owned());
        Ok(())
    }
}

/// Event log keeping its records in memory. Clones share the same record.
#[derive(Clone, Default)]
pub struct RecordingEventLog {
    entries: Arc<Mutex<Vec<(EventSeverity, String)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingEventLog {
    pub fn entries(&self) -> Vec<(EventSeverity, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }

    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl EventLog for RecordingEventLog {
    fn write_event(
        &self,
        severity: EventSeverity,
        message: &str,
    ) -> std::result::Result<(), EventLogError> {
        eventlog::validate_message(message)?;
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventLogError::ReportFailed(io::Error::from_raw_os_error(
                ERROR_ACCESS_DENIED as i32,
            )));
        }
        self.entries
            .lock()
            .unwrap()
            .push((severity, message.to_owned()));
        Ok(())
    }
}

/// Dispatcher that either fails like a process not launched by the system, or activates the
/// service once and stops it again before returning.
pub struct FakeDispatcher {
    supervisor: Option<FakeSupervisor>,
    service_main_calls: AtomicUsize,
    final_state: Mutex<Option<ServiceState>>,
}

impl FakeDispatcher {
    pub fn without_supervisor() -> Self {
        FakeDispatcher {
            supervisor: None,
            service_main_calls: AtomicUsize::new(0),
            final_state: Mutex::new(None),
        }
    }

    pub fn with_supervisor() -> Self {
        FakeDispatcher {
            supervisor: Some(FakeSupervisor::default()),
            ..FakeDispatcher::without_supervisor()
        }
    }

    pub fn service_main_calls(&self) -> usize {
        self.service_main_calls.load(Ordering::SeqCst)
    }

    pub fn final_state(&self) -> Option<ServiceState> {
        *self.final_state.lock().unwrap()
    }
}

impl ServiceDispatcher for FakeDispatcher {
    fn start(&self, service_name: &str) -> Result<()> {
        let Some(supervisor) = &self.supervisor else {
            return Err(win32_error(ERROR_FAILED_SERVICE_CONTROLLER_CONNECT));
        };
        assert_eq!(service_name, WSVC.name);

        self.service_main_calls.fetch_add(1, Ordering::SeqCst);
        let console = Arc::new(FakeConsole::default());
        if let Ok(controller) = supervisor::service_main(
            supervisor,
            &WSVC,
            NoopBody,
            RecordingEventLog::default(),
            console,
        ) {
            supervisor.deliver(ServiceControl::Stop);
            *self.final_state.lock().unwrap() = lock(&controller).state();
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub info: ServiceInfo,
    pub state: ServiceState,
}

#[derive(Default)]
struct Registry {
    registrations: BTreeMap<String, Registration>,
    connections: usize,
    open_handles: usize,
    delete_calls: usize,
    last_manager_access: Option<ServiceManagerAccess>,
    refuse_connections: bool,
    create_error: Option<u32>,
    fail_queries: bool,
    fail_deletes: bool,
}

/// Services database kept in memory. Tracks open handles so tests can check that every
/// connection and service handle is released.
#[derive(Clone, Default)]
pub struct FakeServiceManager {
    registry: Arc<Mutex<Registry>>,
}

impl FakeServiceManager {
    pub fn with_registration(definition: &ServiceDefinition, state: ServiceState) -> Self {
        let manager = FakeServiceManager::default();
        let info = definition.service_info(PathBuf::from(r"C:\wsvc\wsvc.exe"));
        manager
            .registry()
            .registrations
            .insert(definition.name.to_owned(), Registration { info, state });
        manager
    }

    pub fn set_state(&self, name: &str, state: ServiceState) {
        if let Some(registration) = self.registry().registrations.get_mut(name) {
            registration.state = state;
        }
    }

    pub fn registration(&self, name: &str) -> Option<Registration> {
        self.registry().registrations.get(name).cloned()
    }

    pub fn registration_count(&self) -> usize {
        self.registry().registrations.len()
    }

    /// Number of connections ever opened.
    pub fn connection_count(&self) -> usize {
        self.registry().connections
    }

    /// Connections and service handles not yet released.
    pub fn open_handles(&self) -> usize {
        self.registry().open_handles
    }

    pub fn delete_calls(&self) -> usize {
        self.registry().delete_calls
    }

    pub fn last_manager_access(&self) -> Option<ServiceManagerAccess> {
        self.registry().last_manager_access
    }

    pub fn refuse_connections(&self) {
        self.registry().refuse_connections = true;
    }

    pub fn fail_create_with(&self, code: u32) {
        self.registry().create_error = Some(code);
    }

    pub fn fail_queries(&self) {
        self.registry().fail_queries = true;
    }

    pub fn fail_deletes(&self) {
        self.registry().fail_deletes = true;
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap()
    }
}

impl ManagerConnector for FakeServiceManager {
    type Manager = FakeConnection;

    fn connect(&self, request_access: ServiceManagerAccess) -> Result<FakeConnection> {
        let mut registry = self.registry();
        registry.last_manager_access = Some(request_access);
        if registry.refuse_connections {
            return Err(win32_error(ERROR_ACCESS_DENIED));
        }
        registry.connections += 1;
        registry.open_handles += 1;
        Ok(FakeConnection {
            registry: Arc::clone(&self.registry),
        })
    }
}

pub struct FakeConnection {
    registry: Arc<Mutex<Registry>>,
}

impl FakeConnection {
    fn open_handle(&self, registry: &mut Registry, name: &str) -> FakeService {
        registry.open_handles += 1;
        FakeService {
            registry: Arc::clone(&self.registry),
            name: name.to_owned(),
        }
    }
}

impl ServiceControlManager for FakeConnection {
    type Service = FakeService;

    fn create_service(
        &self,
        service_info: &ServiceInfo,
        _service_access: ServiceAccess,
    ) -> Result<FakeService> {
        let mut registry = self.registry.lock().unwrap();
        if let Some(code) = registry.create_error {
            return Err(win32_error(code));
        }
        let name = service_info.name.to_string_lossy().into_owned();
        if registry.registrations.contains_key(&name) {
            return Err(win32_error(winsvc::ERROR_SERVICE_EXISTS));
        }
        registry.registrations.insert(
            name.clone(),
            Registration {
                info: service_info.clone(),
                state: ServiceState::Stopped,
            },
        );
        Ok(self.open_handle(&mut registry, &name))
    }

    fn open_service(&self, name: &str, _request_access: ServiceAccess) -> Result<FakeService> {
        let mut registry = self.registry.lock().unwrap();
        if !registry.registrations.contains_key(name) {
            return Err(win32_error(ERROR_SERVICE_DOES_NOT_EXIST));
        }
        Ok(self.open_handle(&mut registry, name))
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.registry.lock().unwrap().open_handles -= 1;
    }
}

pub struct FakeService {
    registry: Arc<Mutex<Registry>>,
    name: String,
}

impl ManagedService for FakeService {
    fn query_status(&self) -> Result<ServiceStatus> {
        let registry = self.registry.lock().unwrap();
        if registry.fail_queries {
            return Err(win32_error(ERROR_ACCESS_DENIED));
        }
        let registration = registry
            .registrations
            .get(&self.name)
            .ok_or_else(|| win32_error(ERROR_SERVICE_DOES_NOT_EXIST))?;
        Ok(ServiceStatus {
            service_type: registration.info.service_type,
            current_state: registration.state,
            controls_accepted: lifecycle::accepted_controls(registration.state),
            exit_code: ServiceExitCode::NO_ERROR,
            checkpoint: 0,
            wait_hint: Duration::default(),
        })
    }

    fn delete(self) -> Result<()> {
        let mut registry = self.registry.lock().unwrap();
        registry.delete_calls += 1;
        if registry.fail_deletes {
            return Err(win32_error(ERROR_ACCESS_DENIED));
        }
        registry.registrations.remove(&self.name);
        Ok(())
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.registry.lock().unwrap().open_handles -= 1;
    }
}
