//! Diagnostic log file for the service process.
//!
//! A service started by the system has no console, so debug builds on Windows trace into a file
//! at the root of the system drive. Other builds install no sink and the `log` macros are no-ops.

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum LoggingError {
    #[error("Unable to open log file for writing: {}", .0.display())]
    WriteLogFile(PathBuf, #[source] std::io::Error),

    #[error("Unable to install the logger")]
    SetLoggerError(#[from] log::SetLoggerError),
}

/// Location of the log file, if this build writes one.
pub fn log_file_path() -> Option<PathBuf> {
    if cfg!(all(windows, debug_assertions)) {
        Some(PathBuf::from(r"C:\wsvc.log"))
    } else {
        None
    }
}

/// Install the global logger. Without `log_file` nothing is recorded.
pub fn init_logger(
    log_level: log::LevelFilter,
    log_file: Option<&Path>,
) -> Result<(), LoggingError> {
    dispatcher(log_level, log_file)?.apply()?;
    Ok(())
}

fn dispatcher(
    log_level: log::LevelFilter,
    log_file: Option<&Path>,
) -> Result<fern::Dispatch, LoggingError> {
    let mut top_dispatcher = fern::Dispatch::new().level(log_level);

    if let Some(log_file) = log_file {
        let f = fern::log_file(log_file)
            .map_err(|e| LoggingError::WriteLogFile(log_file.to_path_buf(), e))?;
        let file_dispatcher = fern::Dispatch::new()
            .format(|out, message, record| format_log_message(out, message, record))
            .chain(f);
        top_dispatcher = top_dispatcher.chain(file_dispatcher);
    }
    Ok(top_dispatcher)
}

fn format_log_message(
    out: fern::FormatCallback<'_>,
    message: &fmt::Arguments<'_>,
    record: &log::Record<'_>,
) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    out.finish(format_args!(
        "[{}][{}][{}] {}",
        timestamp,
        record.target(),
        record.level(),
        message
    ))
}
