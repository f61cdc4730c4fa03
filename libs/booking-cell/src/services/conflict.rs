// libs/booking-cell/src/services/conflict.rs
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_database::StoreClient;

use crate::models::{Booking, BookingError, BookingStatus, SlotState};

/// Classify one candidate slot for one viewing patient against a ledger
/// snapshot already filtered to the therapist. First match wins:
///
/// 1. the instant is at or before `now`;
/// 2. the patient holds ANY active booking with this therapist - reported
///    as their own slot when it is this exact one, otherwise as a blanket
///    block. An outstanding request anywhere stops a second one before the
///    clicked slot is even considered;
/// 3. another patient actively holds this exact slot;
/// 4. free.
///
/// Pure over its inputs: the same snapshot always yields the same state.
pub fn classify_slot(
    slot_date: NaiveDate,
    slot_time: NaiveTime,
    patient_id: Uuid,
    ledger: &[Booking],
    now: DateTime<Utc>,
) -> SlotState {
    let slot_instant = slot_date.and_time(slot_time).and_utc();
    if slot_instant <= now {
        return SlotState::Past;
    }

    if let Some(own) = ledger
        .iter()
        .find(|b| b.patient_id == patient_id && b.status.is_active())
    {
        if own.slot_date == slot_date && own.slot_time == slot_time {
            return match own.status {
                BookingStatus::Accepted => SlotState::OwnAccepted,
                _ => SlotState::OwnPending,
            };
        }
        return SlotState::BlockedByActiveBooking {
            status: own.status.clone(),
        };
    }

    let taken_by_other = ledger.iter().any(|b| {
        b.slot_date == slot_date
            && b.slot_time == slot_time
            && b.patient_id != patient_id
            && b.status.is_active()
    });
    if taken_by_other {
        return SlotState::TakenByOther;
    }

    SlotState::Free
}

/// Convert a classification into the error a booking attempt surfaces, or
/// Ok for a bookable slot.
pub fn ensure_bookable(state: &SlotState) -> Result<(), BookingError> {
    match state {
        SlotState::Free => Ok(()),
        SlotState::Past => Err(BookingError::SlotInPast),
        SlotState::TakenByOther => Err(BookingError::SlotTaken),
        SlotState::OwnPending => Err(BookingError::OwnActiveBooking {
            status: BookingStatus::Pending,
        }),
        SlotState::OwnAccepted => Err(BookingError::OwnActiveBooking {
            status: BookingStatus::Accepted,
        }),
        SlotState::BlockedByActiveBooking { status } => Err(BookingError::OwnActiveBooking {
            status: status.clone(),
        }),
    }
}

pub struct ConflictService {
    store: Arc<StoreClient>,
}

impl ConflictService {
    pub fn new(store: Arc<StoreClient>) -> Self {
        Self { store }
    }

    /// Fetch the active ledger rows for one therapist - the snapshot every
    /// classification runs against. Callers that are about to write MUST
    /// fetch a fresh snapshot rather than reuse the one that rendered the
    /// slot board; the gap between render and confirmation is where
    /// concurrent tabs and patients race each other.
    pub async fn active_ledger(
        &self,
        therapist_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Booking>, BookingError> {
        debug!("Fetching active ledger for therapist {}", therapist_id);

        let path = format!(
            "/rest/v1/bookings?therapist_id=eq.{}&status=in.(pending,accepted)&order=slot_date.asc,slot_time.asc",
            therapist_id
        );

        let bookings: Vec<Booking> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        Ok(bookings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatientDetails, ProblemArea};
    use chrono::TimeZone;

    fn details() -> PatientDetails {
        PatientDetails {
            patient_name: "Ada Lovelace".to_string(),
            patient_email: "ada@example.com".to_string(),
            patient_phone: "+1 555 0101".to_string(),
            patient_gender: "female".to_string(),
            patient_date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            patient_address: "12 Analytical Way".to_string(),
            problem_area: ProblemArea::FocusAttention,
            reason_for_booking: "Difficulty concentrating".to_string(),
        }
    }

    fn booking(
        therapist_id: Uuid,
        patient_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        status: BookingStatus,
    ) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            therapist_id,
            therapist_name: "Dr. Example".to_string(),
            patient_id,
            details: details(),
            slot_date: date,
            slot_time: time,
            status,
            booking_timestamp: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_past_takes_precedence_over_everything() {
        let therapist = Uuid::new_v4();
        let me = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let ledger = vec![booking(therapist, me, date, t(10, 0), BookingStatus::Pending)];

        // Evaluation instant after the slot: Past wins even over own booking.
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();
        assert_eq!(
            classify_slot(date, t(10, 0), me, &ledger, now),
            SlotState::Past
        );
    }

    #[test]
    fn test_slot_at_exact_evaluation_instant_is_past() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let now = date.and_time(t(10, 0)).and_utc();
        assert_eq!(
            classify_slot(date, t(10, 0), Uuid::new_v4(), &[], now),
            SlotState::Past
        );
    }

    #[test]
    fn test_own_active_booking_blocks_other_slots() {
        let therapist = Uuid::new_v4();
        let me = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let ledger = vec![booking(therapist, me, date, t(10, 0), BookingStatus::Pending)];
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

        // A different, otherwise free slot is still blocked.
        assert_eq!(
            classify_slot(date, t(11, 0), me, &ledger, now),
            SlotState::BlockedByActiveBooking {
                status: BookingStatus::Pending
            }
        );
    }

    #[test]
    fn test_own_exact_slot_reports_specific_state() {
        let therapist = Uuid::new_v4();
        let me = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

        let pending = vec![booking(therapist, me, date, t(10, 0), BookingStatus::Pending)];
        assert_eq!(
            classify_slot(date, t(10, 0), me, &pending, now),
            SlotState::OwnPending
        );

        let accepted = vec![booking(therapist, me, date, t(10, 0), BookingStatus::Accepted)];
        assert_eq!(
            classify_slot(date, t(10, 0), me, &accepted, now),
            SlotState::OwnAccepted
        );
    }

    #[test]
    fn test_other_patients_active_booking_takes_slot() {
        let therapist = Uuid::new_v4();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let ledger = vec![booking(therapist, other, date, t(10, 0), BookingStatus::Accepted)];
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

        assert_eq!(
            classify_slot(date, t(10, 0), me, &ledger, now),
            SlotState::TakenByOther
        );
        // The neighbouring slot is unaffected.
        assert_eq!(
            classify_slot(date, t(11, 0), me, &ledger, now),
            SlotState::Free
        );
    }

    #[test]
    fn test_terminal_statuses_do_not_block() {
        let therapist = Uuid::new_v4();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();

        let ledger = vec![
            booking(therapist, me, date, t(10, 0), BookingStatus::Rejected),
            booking(therapist, other, date, t(10, 0), BookingStatus::Cancelled),
            booking(therapist, other, date, t(11, 0), BookingStatus::Completed),
        ];

        assert_eq!(
            classify_slot(date, t(10, 0), me, &ledger, now),
            SlotState::Free
        );
        assert_eq!(
            classify_slot(date, t(11, 0), me, &ledger, now),
            SlotState::Free
        );
    }

    #[test]
    fn test_classification_is_idempotent_over_snapshot() {
        let therapist = Uuid::new_v4();
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap();
        let ledger = vec![booking(therapist, other, date, t(10, 0), BookingStatus::Pending)];

        let first = classify_slot(date, t(10, 0), me, &ledger, now);
        let second = classify_slot(date, t(10, 0), me, &ledger, now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_ensure_bookable_maps_states() {
        use assert_matches::assert_matches;

        assert!(ensure_bookable(&SlotState::Free).is_ok());
        assert_matches!(
            ensure_bookable(&SlotState::Past),
            Err(BookingError::SlotInPast)
        );
        assert_matches!(
            ensure_bookable(&SlotState::TakenByOther),
            Err(BookingError::SlotTaken)
        );
        assert_matches!(
            ensure_bookable(&SlotState::OwnPending),
            Err(BookingError::OwnActiveBooking {
                status: BookingStatus::Pending
            })
        );
        assert_matches!(
            ensure_bookable(&SlotState::BlockedByActiveBooking {
                status: BookingStatus::Accepted
            }),
            Err(BookingError::OwnActiveBooking {
                status: BookingStatus::Accepted
            })
        );
    }
}
