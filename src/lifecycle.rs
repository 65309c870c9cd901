//! Pure service state machine.
//!
//! The hosted service walks `StartPending -> Running -> StopPending -> Stopped`. A body that fails
//! during startup may also go straight from `StartPending` to `Stopped` to report its exit code.
//! Nothing here talks to the system, which keeps the transition rules testable on any host.

use crate::service::{ServiceControlAccept, ServiceState};

/// Event that drives the lifecycle forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// The system activated the service and the control handler is registered.
    StartRequested,
    /// Service specific startup completed.
    Started,
    /// Service specific startup failed.
    StartFailed,
    /// A stop control was received.
    StopRequested,
    /// Service specific shutdown completed.
    Stopped,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Cannot apply {event:?} in state {from:?}")]
pub struct InvalidTransition {
    /// `None` when the service has not entered the state machine yet.
    pub from: Option<ServiceState>,
    pub event: LifecycleEvent,
}

/// Computes the state that follows `current` when `event` happens.
pub fn transition(
    current: Option<ServiceState>,
    event: LifecycleEvent,
) -> Result<ServiceState, InvalidTransition> {
    use LifecycleEvent::*;
    match (current, event) {
        (None, StartRequested) => Ok(ServiceState::StartPending),
        (Some(ServiceState::StartPending), Started) => Ok(ServiceState::Running),
        (Some(ServiceState::StartPending), StartFailed) => Ok(ServiceState::Stopped),
        (Some(ServiceState::Running), StopRequested) => Ok(ServiceState::StopPending),
        (Some(ServiceState::StopPending), Stopped) => Ok(ServiceState::Stopped),
        (from, event) => Err(InvalidTransition { from, event }),
    }
}

/// Controls the service accepts while in `state`. Stop is only accepted while running.
pub fn accepted_controls(state: ServiceState) -> ServiceControlAccept {
    match state {
        ServiceState::Running => ServiceControlAccept::STOP,
        _ => ServiceControlAccept::empty(),
    }
}
