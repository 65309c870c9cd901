use crate::service;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to the service control manager.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid account name.
    #[error("Invalid account name")]
    InvalidAccountName(#[source] NulError),

    /// Invalid account password.
    #[error("Invalid account password")]
    InvalidAccountPassword(#[source] NulError),

    /// Invalid display name.
    #[error("Invalid display name")]
    InvalidDisplayName(#[source] NulError),

    /// Invalid executable path.
    #[error("Invalid executable path")]
    InvalidExecutablePath(#[source] NulError),

    /// Invalid launch arguments.
    #[error("Invalid launch argument at index {0}")]
    InvalidLaunchArgument(usize, #[source] NulError),

    /// Invalid service name.
    #[error("Invalid service name")]
    InvalidServiceName(#[source] NulError),

    /// Invalid raw representation of [`ServiceState`](service::ServiceState).
    #[error("Invalid service state value")]
    InvalidServiceState(#[source] service::ParseRawError),

    /// IO error when calling winapi
    #[error("IO error in winapi call")]
    Winapi(#[source] std::io::Error),
}

impl Error {
    /// Returns the raw Win32 error code if this error came out of a system call.
    pub fn raw_os_error(&self) -> Option<u32> {
        match self {
            Error::Winapi(io_error) => io_error.raw_os_error().map(|code| code as u32),
            _ => None,
        }
    }
}

/// Indicates a invalid nul value was found when converting a string to a wide string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NulError(usize);

impl NulError {
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn new(nul_position: usize) -> Self {
        NulError(nul_position)
    }

    /// Returns the position of the nul value in the slice that was provided to `U16CString`.
    pub fn nul_position(&self) -> usize {
        self.0
    }
}

impl core::fmt::Display for NulError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "nul value found at position {}", self.0)
    }
}

impl std::error::Error for NulError {}

#[cfg(windows)]
impl From<widestring::error::ContainsNul<u16>> for NulError {
    fn from(s: widestring::error::ContainsNul<u16>) -> NulError {
        NulError(s.nul_position())
    }
}
