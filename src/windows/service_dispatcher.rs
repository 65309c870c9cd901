use std::ffi::OsString;
use std::{io, ptr};

use widestring::{WideCStr, WideCString};
use windows_sys::Win32::System::Services;

use crate::service_dispatcher::ServiceDispatcher;
use crate::{Error, Result};

/// A macro to generate an entry point function (aka "service_main") for Windows service.
///
/// The `$function_name` function parses service arguments provided by the system
/// and passes them with a call to `$service_main_handler`.
///
/// `$function_name` - name of the "service_main" callback.
///
/// `$service_main_handler` - function with a signature `fn(Vec<OsString>)` that's called from
/// generated `$function_name`.
#[macro_export]
macro_rules! define_windows_service {
    ($function_name:ident, $service_main_handler:ident) => {
        /// Static callback used by the system to bootstrap the service.
        /// Do not call it directly.
        unsafe extern "system" fn $function_name(
            num_service_arguments: u32,
            service_arguments: *mut *mut u16,
        ) {
            let arguments = unsafe {
                $crate::windows::service_dispatcher::parse_service_arguments(
                    num_service_arguments,
                    service_arguments,
                )
            };

            $service_main_handler(arguments);
        }
    };
}

/// Entry point of a service as generated by [`define_windows_service!`].
pub type ServiceMainFn = unsafe extern "system" fn(u32, *mut *mut u16);

/// Connects the calling thread to the service control manager.
#[derive(Clone, Copy)]
pub struct ScmDispatcher {
    service_main: ServiceMainFn,
}

impl ScmDispatcher {
    pub fn new(service_main: ServiceMainFn) -> Self {
        ScmDispatcher { service_main }
    }
}

impl ServiceDispatcher for ScmDispatcher {
    fn start(&self, service_name: &str) -> Result<()> {
        let service_name =
            WideCString::from_str(service_name).map_err(|e| Error::InvalidServiceName(e.into()))?;
        let service_table: &[Services::SERVICE_TABLE_ENTRYW] = &[
            Services::SERVICE_TABLE_ENTRYW {
                lpServiceName: service_name.as_ptr() as _,
                lpServiceProc: Some(self.service_main),
            },
            // the last item has to be { null, null }
            Services::SERVICE_TABLE_ENTRYW {
                lpServiceName: ptr::null_mut(),
                lpServiceProc: None,
            },
        ];

        let result = unsafe { Services::StartServiceCtrlDispatcherW(service_table.as_ptr()) };
        if result == 0 {
            Err(Error::Winapi(io::Error::last_os_error()))
        } else {
            Ok(())
        }
    }
}

/// Parse raw arguments received from the system into a vector of `OsString`.
///
/// # Safety
///
/// `argv` must point to `argc` valid nul terminated wide strings.
#[doc(hidden)]
pub unsafe fn parse_service_arguments(argc: u32, argv: *mut *mut u16) -> Vec<OsString> {
    (0..argc)
        .map(|i| {
            let array_element_ptr: *mut *mut u16 = unsafe { argv.add(i as usize) };
            unsafe { WideCStr::from_ptr_str(*array_element_ptr) }.to_os_string()
        })
        .collect()
}
