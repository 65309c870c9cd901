//! Command line surface of the executable.
//!
//! | Argument    | Action                                   |
//! |-------------|------------------------------------------|
//! | *(none)*    | run under the service control dispatcher |
//! | `install`   | register the service                     |
//! | `uninstall` | remove the registration                  |
//!
//! Commands are matched case-insensitively.

use std::io;
use std::path::PathBuf;

use crate::console::Console;
use crate::definition::ServiceDefinition;
use crate::installer::{self, InstallError};
use crate::service_dispatcher::{self, RunError, ServiceDispatcher};
use crate::service_manager::ManagerConnector;
use crate::uninstaller::{self, UninstallError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Install,
    Uninstall,
    Unknown(String),
}

impl Command {
    /// Parse the first command line argument.
    pub fn parse(argument: Option<&str>) -> Command {
        match argument {
            None => Command::Run,
            Some(token) if token.eq_ignore_ascii_case("install") => Command::Install,
            Some(token) if token.eq_ignore_ascii_case("uninstall") => Command::Uninstall,
            Some(token) => Command::Unknown(token.to_owned()),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("Service failed to run")]
    Run(#[from] RunError),

    #[error("Failed to install service")]
    Install(#[from] InstallError),

    #[error("Failed to uninstall service")]
    Uninstall(#[from] UninstallError),

    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),
}

impl CliError {
    pub fn code(&self) -> i32 {
        match self {
            CliError::Run(e) => e.code(),
            CliError::Install(e) => e.code(),
            CliError::Uninstall(e) => e.code(),
            CliError::UnknownCommand(_) => -1,
        }
    }
}

/// Everything a command needs from the platform.
pub struct Host<'a, C, D> {
    pub definition: &'a ServiceDefinition,
    pub connector: C,
    pub dispatcher: D,
    pub resolve_executable: fn() -> io::Result<PathBuf>,
    pub console: &'a dyn Console,
}

impl<C: ManagerConnector, D: ServiceDispatcher> Host<'_, C, D> {
    /// Execute `command`. Every failure has been described by exactly one stderr line when this
    /// returns.
    pub fn execute(&self, command: Command) -> Result<(), CliError> {
        log::debug!("Executing {:?}", command);
        let result = match command {
            Command::Run => {
                service_dispatcher::run(&self.dispatcher, self.definition.name, self.console)
                    .map_err(CliError::from)
            }
            Command::Install => installer::install(
                &self.connector,
                self.definition,
                self.resolve_executable,
                self.console,
            )
            .map_err(CliError::from),
            Command::Uninstall => {
                uninstaller::uninstall(&self.connector, self.definition, self.console)
                    .map_err(CliError::from)
            }
            Command::Unknown(token) => Err(CliError::UnknownCommand(token)),
        };

        match &result {
            Err(e @ CliError::UnknownCommand(_)) => {
                log::error!("{} (code {})", e, e.code());
                let _ = self.console.write_stderr(&format!("[WSVC] Error: {}.", e));
            }
            // The failing component has already written its own line.
            Err(e) => log::error!("{} (code {})", e, e.code()),
            Ok(()) => (),
        }
        result
    }
}
