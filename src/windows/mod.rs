//! Backends talking to the Windows service control manager and event log.

use std::ffi::OsString;
use std::sync::Arc;

use crate::cli::Host;
use crate::console::{Console, StdConsole};
use crate::controller::NoopBody;
use crate::definition::WSVC;
use crate::supervisor;

mod eventlog;
mod sc_handle;
mod service_control_handler;
pub mod service_dispatcher;
mod service_manager;

pub use self::eventlog::WindowsEventLog;
pub use self::service_control_handler::{ScmSupervisor, ServiceStatusHandle};
pub use self::service_dispatcher::{ScmDispatcher, ServiceMainFn};
pub use self::service_manager::{LocalServiceManager, Service, ServiceManager};

crate::define_windows_service!(ffi_service_main, wsvc_service_main);

/// Platform wiring for the command line.
pub fn host(console: &dyn Console) -> Host<'_, LocalServiceManager, ScmDispatcher> {
    Host {
        definition: &WSVC,
        connector: LocalServiceManager,
        dispatcher: ScmDispatcher::new(ffi_service_main),
        resolve_executable: std::env::current_exe,
        console,
    }
}

fn wsvc_service_main(arguments: Vec<OsString>) {
    log::info!("Received arguments: {:?}", arguments);

    let event_log = match WindowsEventLog::new(WSVC.event_source) {
        Ok(event_log) => event_log,
        Err(e) => {
            log::error!("Invalid event source: {}", e);
            return;
        }
    };

    // On success the controller stays reachable from the registered control handler, which
    // drives the stop sequence. Returning here hands the thread back to the dispatcher.
    if let Err(e) = supervisor::service_main(
        &ScmSupervisor,
        &WSVC,
        NoopBody,
        event_log,
        Arc::new(StdConsole),
    ) {
        log::error!("Service failed to run (code {}): {}", e.code(), e);
    }
}
