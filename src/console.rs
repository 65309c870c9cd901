//! Human readable output for the operator running the executable.
//!
//! Writes are best-effort: a service launched by the system has no console attached, so every
//! caller is free to ignore the returned status.

use std::io::{self, Write};

#[derive(thiserror::Error, Debug)]
pub enum ConsoleError {
    /// No stream is attached to the process.
    #[error("No console is attached to the process")]
    Unavailable,

    #[error("Failed to write to the console")]
    Write(#[source] io::Error),
}

impl ConsoleError {
    pub fn code(&self) -> i32 {
        match self {
            ConsoleError::Unavailable => -2,
            ConsoleError::Write(_) => -3,
        }
    }
}

pub trait Console: Send + Sync {
    fn write_stdout(&self, text: &str) -> Result<(), ConsoleError>;

    fn write_stderr(&self, text: &str) -> Result<(), ConsoleError>;
}

/// Console writer backed by the process standard streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_stdout(&self, text: &str) -> Result<(), ConsoleError> {
        log::debug!("stdout: {}", text.trim_end());
        write_line(io::stdout().lock(), text)
    }

    fn write_stderr(&self, text: &str) -> Result<(), ConsoleError> {
        log::debug!("stderr: {}", text.trim_end());
        write_line(io::stderr().lock(), text)
    }
}

fn write_line(mut out: impl Write, text: &str) -> Result<(), ConsoleError> {
    if text.is_empty() {
        return Ok(());
    }
    let result = writeln!(out, "{}", text.trim_end_matches('\n')).and_then(|_| out.flush());
    match result {
        Ok(()) => Ok(()),
        // A detached service process gets an invalid standard handle.
        Err(e) if is_detached(&e) => Err(ConsoleError::Unavailable),
        Err(e) => Err(ConsoleError::Write(e)),
    }
}

fn is_detached(error: &io::Error) -> bool {
    // ERROR_INVALID_HANDLE on Windows, EBADF elsewhere.
    const ERROR_INVALID_HANDLE: i32 = 6;
    const EBADF: i32 = 9;
    match error.raw_os_error() {
        Some(code) if cfg!(windows) => code == ERROR_INVALID_HANDLE,
        Some(code) => code == EBADF,
        None => false,
    }
}
