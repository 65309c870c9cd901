//! Vendored values of the winsvc/winerror constants used by the portable parts of the crate.
//!
//! The service model, the lifecycle controller and the installer logic are platform independent
//! so they can be exercised against fakes on any host. They only need the raw numbers, which are
//! mirrored here. On Windows the `tests` module checks them against `windows-sys`.

// SERVICE_STATUS::dwServiceType
pub const SERVICE_WIN32_OWN_PROCESS: u32 = 0x0000_0010;

// SERVICE_STATUS::dwCurrentState
pub const SERVICE_STOPPED: u32 = 1;
pub const SERVICE_START_PENDING: u32 = 2;
pub const SERVICE_STOP_PENDING: u32 = 3;
pub const SERVICE_RUNNING: u32 = 4;
pub const SERVICE_CONTINUE_PENDING: u32 = 5;
pub const SERVICE_PAUSE_PENDING: u32 = 6;
pub const SERVICE_PAUSED: u32 = 7;

// SERVICE_STATUS::dwControlsAccepted
pub const SERVICE_ACCEPT_STOP: u32 = 0x0000_0001;

// Control codes delivered to HandlerEx
pub const SERVICE_CONTROL_STOP: u32 = 0x0000_0001;
pub const SERVICE_CONTROL_PAUSE: u32 = 0x0000_0002;
pub const SERVICE_CONTROL_CONTINUE: u32 = 0x0000_0003;
pub const SERVICE_CONTROL_INTERROGATE: u32 = 0x0000_0004;
pub const SERVICE_CONTROL_SHUTDOWN: u32 = 0x0000_0005;
pub const SERVICE_CONTROL_PARAMCHANGE: u32 = 0x0000_0006;
pub const SERVICE_CONTROL_NETBINDADD: u32 = 0x0000_0007;
pub const SERVICE_CONTROL_NETBINDREMOVE: u32 = 0x0000_0008;
pub const SERVICE_CONTROL_NETBINDENABLE: u32 = 0x0000_0009;
pub const SERVICE_CONTROL_NETBINDDISABLE: u32 = 0x0000_000A;
pub const SERVICE_CONTROL_PRESHUTDOWN: u32 = 0x0000_000F;

// CreateServiceW::dwStartType
pub const SERVICE_DEMAND_START: u32 = 0x0000_0003;

// CreateServiceW::dwErrorControl
pub const SERVICE_ERROR_NORMAL: u32 = 0x0000_0001;

// Access rights
pub const SC_MANAGER_CONNECT: u32 = 0x0001;
pub const SC_MANAGER_CREATE_SERVICE: u32 = 0x0002;
pub const SERVICE_QUERY_STATUS: u32 = 0x0004;
pub const DELETE: u32 = 0x0001_0000;

// winerror.h
pub const NO_ERROR: u32 = 0;
pub const ERROR_CALL_NOT_IMPLEMENTED: u32 = 120;
pub const ERROR_SERVICE_CANNOT_ACCEPT_CTRL: u32 = 1061;
pub const ERROR_SERVICE_SPECIFIC_ERROR: u32 = 1066;
pub const ERROR_SERVICE_EXISTS: u32 = 1073;
