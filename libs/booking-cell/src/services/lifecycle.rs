// libs/booking-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::models::{BookingError, BookingStatus};

/// Booking lifecycle rules. The status column is not free-form: every
/// transition goes through `validate_status_transition`, and anything not
/// listed in `valid_transitions` is rejected.
pub struct BookingLifecycleService;

impl BookingLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_status_transition(
        &self,
        current_status: &BookingStatus,
        new_status: &BookingStatus,
    ) -> Result<(), BookingError> {
        debug!(
            "Validating status transition from {} to {}",
            current_status, new_status
        );

        let valid_transitions = self.valid_transitions(current_status);

        if !valid_transitions.contains(new_status) {
            warn!(
                "Invalid status transition attempted: {} -> {}",
                current_status, new_status
            );
            return Err(BookingError::InvalidStatusTransition(current_status.clone()));
        }

        Ok(())
    }

    /// Therapist decides on a request, then closes out the session:
    /// pending resolves to accepted or rejected, accepted resolves to
    /// completed or cancelled. Leaving an active status frees both the
    /// slot and the patient's one-active-booking allowance.
    pub fn valid_transitions(&self, current_status: &BookingStatus) -> Vec<BookingStatus> {
        match current_status {
            BookingStatus::Pending => vec![BookingStatus::Accepted, BookingStatus::Rejected],
            BookingStatus::Accepted => vec![BookingStatus::Completed, BookingStatus::Cancelled],
            // Terminal states - no transitions allowed
            BookingStatus::Rejected => vec![],
            BookingStatus::Completed => vec![],
            BookingStatus::Cancelled => vec![],
        }
    }
}

impl Default for BookingLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
