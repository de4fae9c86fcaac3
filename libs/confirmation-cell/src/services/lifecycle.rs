// libs/confirmation-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{ConfirmationError, ConfirmationStatus};

pub struct ConfirmationLifecycleService;

impl ConfirmationLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: &ConfirmationStatus,
        new_status: &ConfirmationStatus,
    ) -> Result<(), ConfirmationError> {
        debug!(
            "Validating confirmation transition from {} to {}",
            current_status, new_status
        );

        let valid_transitions = self.get_valid_transitions(current_status);

        if !valid_transitions.contains(new_status) {
            warn!(
                "Invalid confirmation transition attempted: {} -> {}",
                current_status, new_status
            );
            return Err(ConfirmationError::InvalidState(current_status.clone()));
        }

        Ok(())
    }

    /// Get all valid next statuses for a given current status
    pub fn get_valid_transitions(
        &self,
        current_status: &ConfirmationStatus,
    ) -> Vec<ConfirmationStatus> {
        match current_status {
            ConfirmationStatus::Pending => vec![
                ConfirmationStatus::Confirmed,
                ConfirmationStatus::Cancelled,
                ConfirmationStatus::RescheduleRequested,
            ],
            // Terminal states - no self-service transitions allowed
            ConfirmationStatus::Confirmed => vec![],
            ConfirmationStatus::Cancelled => vec![],
            ConfirmationStatus::RescheduleRequested => vec![],
        }
    }
}

impl Default for ConfirmationLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn pending_reaches_all_three_terminal_states() {
        let lifecycle = ConfirmationLifecycleService::new();

        for target in [
            ConfirmationStatus::Confirmed,
            ConfirmationStatus::Cancelled,
            ConfirmationStatus::RescheduleRequested,
        ] {
            assert!(lifecycle
                .validate_status_transition(&ConfirmationStatus::Pending, &target)
                .is_ok());
        }
    }

    #[test]
    fn terminal_states_allow_no_transition() {
        let lifecycle = ConfirmationLifecycleService::new();

        for current in [
            ConfirmationStatus::Confirmed,
            ConfirmationStatus::Cancelled,
            ConfirmationStatus::RescheduleRequested,
        ] {
            for target in [
                ConfirmationStatus::Pending,
                ConfirmationStatus::Confirmed,
                ConfirmationStatus::Cancelled,
                ConfirmationStatus::RescheduleRequested,
            ] {
                let result = lifecycle.validate_status_transition(&current, &target);
                assert_matches!(result, Err(ConfirmationError::InvalidState(s)) => {
                    assert_eq!(s, current);
                });
            }
        }
    }

    #[test]
    fn pending_cannot_transition_to_itself() {
        let lifecycle = ConfirmationLifecycleService::new();
        let result = lifecycle
            .validate_status_transition(&ConfirmationStatus::Pending, &ConfirmationStatus::Pending);
        assert_matches!(result, Err(ConfirmationError::InvalidState(_)));
    }
}
