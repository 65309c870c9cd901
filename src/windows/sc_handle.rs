use windows_sys::Win32::System::Services;

/// Owner of an `SC_HANDLE`, closed on drop.
pub(crate) struct ScHandle(Services::SC_HANDLE);

impl ScHandle {
    /// # Safety
    ///
    /// `handle` must be a valid, non-null handle returned by the service control manager that
    /// nothing else closes.
    pub(crate) unsafe fn new(handle: Services::SC_HANDLE) -> Self {
        ScHandle(handle)
    }

    pub(crate) fn raw_handle(&self) -> Services::SC_HANDLE {
        self.0
    }
}

impl Drop for ScHandle {
    fn drop(&mut self) {
        if unsafe { Services::CloseServiceHandle(self.0) } == 0 {
            log::warn!(
                "Failed to close service handle: {}",
                std::io::Error::last_os_error()
            );
        }
    }
}
