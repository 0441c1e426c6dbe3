/*
 * Single-flight orchestration of the "archive and deliver" request. The
 * orchestrator is a small state machine: idle -> in-flight -> succeeded or
 * failed, and back to in-flight on the next submission. At most one
 * submission is in flight process-wide; concurrent attempts are rejected
 * outright, never queued. Every entry into in-flight is matched by exactly
 * one exit, so no fault can leave the host locked forever.
 */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    InFlight,
    /// Delivery finished; carries the locator the gateway returned
    /// (e.g. a download reference), passed through uninterpreted.
    Succeeded { locator: String },
    Failed { message: String },
}

// Why a submission attempt was refused before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    EmptySelection,
    AlreadyInFlight,
}

impl std::fmt::Display for SubmitRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitRejection::EmptySelection => {
                write!(f, "No files or folders are selected")
            }
            SubmitRejection::AlreadyInFlight => {
                write!(f, "A delivery request is already in flight")
            }
        }
    }
}

impl std::error::Error for SubmitRejection {}

#[derive(Debug, Default)]
pub struct SubmissionOrchestrator {
    state: SubmissionState,
}

impl Default for SubmissionState {
    fn default() -> Self {
        SubmissionState::Idle
    }
}

impl SubmissionOrchestrator {
    pub fn new() -> Self {
        SubmissionOrchestrator::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == SubmissionState::InFlight
    }

    /*
     * Gate for a new submission. Fails fast on an empty selection (no state
     * change) and while another submission is outstanding. Otherwise enters
     * in-flight, clearing any prior terminal status; the caller must follow
     * up with exactly one `complete_success` or `complete_failure`.
     */
    pub fn begin(&mut self, selection_is_empty: bool) -> Result<(), SubmitRejection> {
        if selection_is_empty {
            return Err(SubmitRejection::EmptySelection);
        }
        if self.is_in_flight() {
            log::warn!("Submission: Rejecting concurrent submit attempt.");
            return Err(SubmitRejection::AlreadyInFlight);
        }
        log::info!("Submission: Entering in-flight.");
        self.state = SubmissionState::InFlight;
        Ok(())
    }

    pub fn complete_success(&mut self, locator: String) {
        if !self.is_in_flight() {
            log::error!("Submission: Success completion while not in flight; dropped.");
            return;
        }
        log::info!("Submission: Succeeded with locator '{locator}'.");
        self.state = SubmissionState::Succeeded { locator };
    }

    pub fn complete_failure(&mut self, message: String) {
        if !self.is_in_flight() {
            log::error!("Submission: Failure completion while not in flight; dropped.");
            return;
        }
        log::warn!("Submission: Failed: {message}");
        self.state = SubmissionState::Failed { message };
    }

    /*
     * Drops a terminal status back to idle, used when the session or site
     * changes. An in-flight submission is never reset from here; it must
     * run to completion so the in-flight invariant holds.
     */
    pub fn reset(&mut self) {
        if self.is_in_flight() {
            log::warn!("Submission: Reset requested while in flight; ignored.");
            return;
        }
        self.state = SubmissionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_is_rejected_without_state_change() {
        let mut orchestrator = SubmissionOrchestrator::new();
        assert_eq!(orchestrator.begin(true), Err(SubmitRejection::EmptySelection));
        assert_eq!(*orchestrator.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_second_submit_while_in_flight_is_rejected() {
        let mut orchestrator = SubmissionOrchestrator::new();
        assert!(orchestrator.begin(false).is_ok());
        assert_eq!(orchestrator.begin(false), Err(SubmitRejection::AlreadyInFlight));
        assert!(orchestrator.is_in_flight());
    }

    #[test]
    fn test_success_path_and_direct_resubmission() {
        let mut orchestrator = SubmissionOrchestrator::new();
        orchestrator.begin(false).unwrap();
        orchestrator.complete_success("/downloads/batch.zip".to_string());
        assert_eq!(
            *orchestrator.state(),
            SubmissionState::Succeeded {
                locator: "/downloads/batch.zip".to_string()
            }
        );

        // A terminal state transitions straight back to in-flight.
        orchestrator.begin(false).unwrap();
        assert!(orchestrator.is_in_flight());
    }

    #[test]
    fn test_failure_path_is_retriable() {
        let mut orchestrator = SubmissionOrchestrator::new();
        orchestrator.begin(false).unwrap();
        orchestrator.complete_failure("backend unavailable".to_string());
        assert_eq!(
            *orchestrator.state(),
            SubmissionState::Failed {
                message: "backend unavailable".to_string()
            }
        );
        assert!(orchestrator.begin(false).is_ok());
    }

    #[test]
    fn test_completion_without_in_flight_is_dropped() {
        let mut orchestrator = SubmissionOrchestrator::new();
        orchestrator.complete_success("/downloads/ghost.zip".to_string());
        assert_eq!(*orchestrator.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_reset_clears_terminal_but_not_in_flight() {
        let mut orchestrator = SubmissionOrchestrator::new();
        orchestrator.begin(false).unwrap();
        orchestrator.complete_failure("boom".to_string());
        orchestrator.reset();
        assert_eq!(*orchestrator.state(), SubmissionState::Idle);

        orchestrator.begin(false).unwrap();
        orchestrator.reset();
        assert!(orchestrator.is_in_flight());
    }
}
