// Copyright 2017 Amagicom AB.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A minimal Windows service host.
//!
//! The `wsvc` executable registers itself with the service control manager, removes that
//! registration again, or runs as the registered service:
//!
//! ```text
//! wsvc.exe install     # register "wsvc", demand start, NT AUTHORITY\LocalService
//! wsvc.exe             # launched by the system: run the service
//! wsvc.exe uninstall   # remove the registration, the service must be stopped
//! ```
//!
//! # Lifecycle
//!
//! Once the system activates the service, [`supervisor::service_main`] registers a control
//! handler and drives a [`controller::ServiceController`] through
//! `StartPending -> Running`. A stop control later drives it through
//! `StopPending -> Stopped`. Every transition is reported with
//! [`status_reporter::StatusReporter`], which owns the checkpoint counter, and recorded in the
//! event log.
//!
//! The transition rules live in [`lifecycle`] and do not touch the system. The system facing
//! parts sit behind the [`supervisor::Supervisor`], [`service_dispatcher::ServiceDispatcher`]
//! and [`service_manager::ManagerConnector`] traits, implemented for the real service control
//! manager in the `windows` module.
//!
//! # Installation
//!
//! [`installer::install`] creates the registration pointing at the running executable.
//! [`uninstaller::uninstall`] refuses to delete a registration whose service is not stopped.
//! Both release every handle they open on every path.

pub mod cli;
pub mod console;
pub mod controller;
pub mod definition;
mod error;
pub mod eventlog;
pub mod installer;
pub mod lifecycle;
pub mod logging;
pub mod service;
pub mod service_control_handler;
pub mod service_dispatcher;
pub mod service_manager;
pub mod shell_escape;
pub mod status_reporter;
pub mod supervisor;
pub mod uninstaller;

mod winsvc_vendored;

#[cfg(windows)]
pub mod windows;

#[cfg(test)]
mod fakes;

pub use error::{Error, NulError, Result};
