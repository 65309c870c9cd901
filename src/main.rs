use std::env;
use std::process::ExitCode;

use wsvc::cli::Command;
use wsvc::console::{Console, StdConsole};
use wsvc::logging;

fn main() -> ExitCode {
    if let Some(log_file) = logging::log_file_path() {
        if let Err(e) = logging::init_logger(log::LevelFilter::Trace, Some(&log_file)) {
            let _ = StdConsole.write_stderr(&format!("[WSVC] Warning: {}", e));
        }
    }

    let argument = env::args_os().nth(1);
    let command = Command::parse(argument.as_ref().map(|a| a.to_string_lossy()).as_deref());
    log::debug!("Parsed command {:?}", command);

    match execute(command, &StdConsole) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => {
            log::debug!("Exiting with code {}", code);
            ExitCode::FAILURE
        }
    }
}

#[cfg(windows)]
fn execute(command: Command, console: &dyn Console) -> Result<(), i32> {
    wsvc::windows::host(console)
        .execute(command)
        .map_err(|e| e.code())
}

#[cfg(not(windows))]
fn execute(command: Command, console: &dyn Console) -> Result<(), i32> {
    log::error!("Cannot execute {:?} outside of Windows", command);
    let _ = console.write_stderr("[WSVC] Error: Windows services are only supported on Windows.");
    Err(-1)
}
