use std::time::Duration;

use crate::lifecycle;
use crate::service::{ServiceExitCode, ServiceState, ServiceStatus, ServiceType};
use crate::supervisor::StatusHandle;
use crate::Result;

/// Submits status snapshots through a registration handle and owns the checkpoint counter.
///
/// The checkpoint is `0` in stable states. The first report of a pending state carries `1` and
/// every further report in the same pending state increments it, so the system can tell the
/// service is making progress.
pub struct StatusReporter<H> {
    handle: H,
    service_type: ServiceType,
    pending_wait_hint: Duration,
    checkpoint: u32,
    last_state: Option<ServiceState>,
}

impl<H: StatusHandle> StatusReporter<H> {
    pub fn new(handle: H, service_type: ServiceType, pending_wait_hint: Duration) -> Self {
        StatusReporter {
            handle,
            service_type,
            pending_wait_hint,
            checkpoint: 0,
            last_state: None,
        }
    }

    /// Report `state` to the system. The counter advances even if the submission fails so that a
    /// later report never goes below a value the system might have seen.
    pub fn report(
        &mut self,
        state: ServiceState,
        exit_code: ServiceExitCode,
    ) -> Result<ServiceStatus> {
        let status = ServiceStatus {
            service_type: self.service_type,
            current_state: state,
            controls_accepted: lifecycle::accepted_controls(state),
            exit_code,
            checkpoint: self.next_checkpoint(state),
            wait_hint: if state.is_pending() {
                self.pending_wait_hint
            } else {
                Duration::default()
            },
        };

        log::trace!(
            "Reporting {:?} with checkpoint {}",
            status.current_state,
            status.checkpoint
        );
        self.handle.set_service_status(status.clone())?;
        Ok(status)
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    fn next_checkpoint(&mut self, state: ServiceState) -> u32 {
        if !state.is_pending() {
            self.checkpoint = 0;
        } else if self.last_state == Some(state) {
            self.checkpoint = self.checkpoint.saturating_add(1);
        } else {
            self.checkpoint = 1;
        }
        self.last_state = Some(state);
        self.checkpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeStatusHandle;
    use crate::service::ServiceControlAccept;

    fn reporter() -> StatusReporter<FakeStatusHandle> {
        StatusReporter::new(
            FakeStatusHandle::default(),
            ServiceType::OWN_PROCESS,
            Duration::from_secs(3),
        )
    }

    #[test]
    fn test_checkpoint_advances_within_pending_state() {
        let mut reporter = reporter();
        let checkpoints: Vec<u32> = (0..3)
            .map(|_| {
                reporter
                    .report(ServiceState::StartPending, ServiceExitCode::NO_ERROR)
                    .unwrap()
                    .checkpoint
            })
            .collect();
        assert_eq!(checkpoints, vec![1, 2, 3]);
    }

    #[test]
    fn test_checkpoint_resets_on_stable_state() {
        let mut reporter = reporter();
        let sequence = [
            ServiceState::StartPending,
            ServiceState::StartPending,
            ServiceState::Running,
            ServiceState::StopPending,
            ServiceState::Stopped,
        ];
        for state in sequence {
            reporter.report(state, ServiceExitCode::NO_ERROR).unwrap();
        }

        let submitted = reporter.handle().submitted();
        let checkpoints: Vec<u32> = submitted.iter().map(|s| s.checkpoint).collect();
        assert_eq!(checkpoints, vec![1, 2, 0, 1, 0]);
    }

    #[test]
    fn test_wait_hint_and_controls_follow_state() {
        let mut reporter = reporter();
        let pending = reporter
            .report(ServiceState::StartPending, ServiceExitCode::NO_ERROR)
            .unwrap();
        assert_eq!(pending.wait_hint, Duration::from_secs(3));
        assert!(pending.controls_accepted.is_empty());

        let running = reporter
            .report(ServiceState::Running, ServiceExitCode::NO_ERROR)
            .unwrap();
        assert_eq!(running.wait_hint, Duration::default());
        assert_eq!(running.controls_accepted, ServiceControlAccept::STOP);
        assert_eq!(running.service_type, ServiceType::OWN_PROCESS);
    }

    #[test]
    fn test_failed_submission_still_advances_checkpoint() {
        let mut reporter = reporter();
        reporter.handle().fail_next_submissions(1);
        assert!(reporter
            .report(ServiceState::StopPending, ServiceExitCode::NO_ERROR)
            .is_err());
        let status = reporter
            .report(ServiceState::StopPending, ServiceExitCode::NO_ERROR)
            .unwrap();
        assert_eq!(status.checkpoint, 2);
    }
}
