use crate::console::Console;

/// Blocking connection to the system's service control dispatcher.
pub trait ServiceDispatcher {
    /// Register the service entry for `service_name` and block until the system reports that
    /// every service in the process has stopped.
    ///
    /// On failure: immediately returns an error and the service entry is never invoked.
    fn start(&self, service_name: &str) -> crate::Result<()>;
}

#[derive(thiserror::Error, Debug)]
pub enum RunError {
    /// Typically the process was not launched by the service control manager.
    #[error("Failed to start service control dispatcher")]
    Dispatch(#[source] crate::Error),
}

impl RunError {
    pub fn code(&self) -> i32 {
        match self {
            RunError::Dispatch(_) => -1,
        }
    }
}

/// Run the process as the service called `service_name`.
pub fn run(
    dispatcher: &impl ServiceDispatcher,
    service_name: &str,
    console: &dyn Console,
) -> Result<(), RunError> {
    let _ = console.write_stdout("[WSVC RUN] Registering service table entries.");

    if let Err(e) = dispatcher.start(service_name) {
        log::error!("Failed to start service control dispatcher: {}", e);
        let _ = console
            .write_stderr("[WSVC RUN] Error: Failed to start service control dispatcher.");
        return Err(RunError::Dispatch(e));
    }

    let _ = console.write_stdout("[WSVC RUN] Service control dispatcher has started.");
    log::info!("Service dispatcher exited.");
    Ok(())
}
