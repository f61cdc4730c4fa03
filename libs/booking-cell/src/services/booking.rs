// libs/booking-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::{StoreClient, StoreError};
use therapist_cell::models::TherapistError;
use therapist_cell::services::profile::TherapistService;

use crate::models::{
    BookSessionRequest, Booking, BookingError, BookingStatus, SlotView,
};
use crate::services::conflict::{classify_slot, ensure_bookable, ConflictService};
use crate::services::lifecycle::BookingLifecycleService;
use crate::services::slots::{self, BOOKING_HORIZON_DAYS};

pub struct BookingService {
    store: Arc<StoreClient>,
    conflict_service: ConflictService,
    lifecycle_service: BookingLifecycleService,
    therapist_service: TherapistService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        let store = Arc::new(StoreClient::new(config));

        Self {
            conflict_service: ConflictService::new(Arc::clone(&store)),
            lifecycle_service: BookingLifecycleService::new(),
            therapist_service: TherapistService::with_store(Arc::clone(&store)),
            store,
        }
    }

    fn map_therapist_error(e: TherapistError) -> BookingError {
        match e {
            TherapistError::NotFound => BookingError::TherapistNotFound,
            TherapistError::NoAvailability => BookingError::NoAvailability,
            other => BookingError::DatabaseError(other.to_string()),
        }
    }

    /// Dates within the booking horizon that still carry at least one
    /// future slot for this therapist.
    pub async fn available_dates(
        &self,
        therapist_id: Uuid,
        now: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<NaiveDate>, BookingError> {
        let template = self
            .therapist_service
            .get_availability(therapist_id, auth_token)
            .await
            .map_err(Self::map_therapist_error)?;

        Ok(slots::available_dates(&template, BOOKING_HORIZON_DAYS, now))
    }

    /// Render-time view of one date: every slot of the template classified
    /// against a single ledger snapshot. This is the optimistic half of the
    /// two-phase check; `attempt_booking` repeats it against fresh data.
    pub async fn slot_board(
        &self,
        therapist_id: Uuid,
        date: NaiveDate,
        patient_id: Uuid,
        now: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Vec<SlotView>, BookingError> {
        let template = self
            .therapist_service
            .get_availability(therapist_id, auth_token)
            .await
            .map_err(Self::map_therapist_error)?;

        let ledger = self
            .conflict_service
            .active_ledger(therapist_id, auth_token)
            .await?;

        let board = slots::slots_for_date(&template, date)
            .into_iter()
            .map(|time| SlotView {
                time,
                state: classify_slot(date, time, patient_id, &ledger, now),
            })
            .collect();

        Ok(board)
    }

    /// Create a pending booking for the authenticated patient.
    ///
    /// The conflict check runs against a ledger snapshot fetched HERE, not
    /// the one that rendered the slot board: two tabs, or two patients,
    /// can act between selection and confirmation. The store's partial
    /// unique indexes over active rows are the final arbiter - an insert
    /// that loses the remaining race comes back as a conflict instead of a
    /// second active row.
    pub async fn attempt_booking(
        &self,
        request: BookSessionRequest,
        patient_id: Uuid,
        now: DateTime<Utc>,
        auth_token: &str,
    ) -> Result<Booking, BookingError> {
        info!(
            "Booking attempt by patient {} with therapist {} at {} {}",
            patient_id, request.therapist_id, request.slot_date, request.slot_time
        );

        request.details.validate()?;

        let ledger = self
            .conflict_service
            .active_ledger(request.therapist_id, auth_token)
            .await?;

        let state = classify_slot(
            request.slot_date,
            request.slot_time,
            patient_id,
            &ledger,
            now,
        );
        if let Err(conflict) = ensure_bookable(&state) {
            warn!(
                "Booking attempt rejected for patient {} at {} {}: {}",
                patient_id, request.slot_date, request.slot_time, conflict
            );
            return Err(conflict);
        }

        let therapist = self
            .therapist_service
            .get_profile(request.therapist_id, auth_token)
            .await
            .map_err(Self::map_therapist_error)?;

        let mut record = serde_json::Map::new();
        record.insert("therapist_id".to_string(), json!(request.therapist_id));
        record.insert("therapist_name".to_string(), json!(therapist.full_name));
        record.insert("patient_id".to_string(), json!(patient_id));
        record.insert("slot_date".to_string(), json!(request.slot_date));
        record.insert("slot_time".to_string(), json!(request.slot_time));
        record.insert("status".to_string(), json!(BookingStatus::Pending));
        if let Value::Object(details) = serde_json::to_value(&request.details)
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?
        {
            record.extend(details);
        }

        let created: Booking = self
            .store
            .insert_returning("bookings", Value::Object(record), auth_token)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => BookingError::SlotTaken,
                other => BookingError::DatabaseError(other.to_string()),
            })?;

        info!(
            "Booking {} created for patient {} with therapist {}",
            created.id, patient_id, created.therapist_id
        );
        Ok(created)
    }

    pub async fn get_booking(
        &self,
        booking_id: Uuid,
        auth_token: &str,
    ) -> Result<Booking, BookingError> {
        debug!("Fetching booking: {}", booking_id);

        let path = format!("/rest/v1/bookings?id=eq.{}", booking_id);
        let result: Vec<Booking> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        result.into_iter().next().ok_or(BookingError::NotFound)
    }

    /// All of a patient's bookings across statuses, ordered by slot.
    pub async fn list_patient_bookings(
        &self,
        patient_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Booking>, BookingError> {
        debug!("Listing bookings for patient {}", patient_id);

        let path = format!(
            "/rest/v1/bookings?patient_id=eq.{}&order=slot_date.asc,slot_time.asc",
            patient_id
        );
        let bookings: Vec<Booking> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        Ok(bookings)
    }

    /// The therapist's full ledger, newest slot first.
    pub async fn list_therapist_bookings(
        &self,
        therapist_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Booking>, BookingError> {
        debug!("Listing bookings for therapist {}", therapist_id);

        let path = format!(
            "/rest/v1/bookings?therapist_id=eq.{}&order=slot_date.desc,slot_time.desc",
            therapist_id
        );
        let bookings: Vec<Booking> = self
            .store
            .request(Method::GET, &path, Some(auth_token), None)
            .await
            .map_err(|e| BookingError::DatabaseError(e.to_string()))?;

        Ok(bookings)
    }

    /// Drive a booking through its lifecycle. Only the owning therapist may
    /// transition, and only along the legal edges; the patch releases the
    /// uniqueness constraints automatically because the partial indexes
    /// cover active rows only.
    pub async fn transition_booking(
        &self,
        booking_id: Uuid,
        new_status: BookingStatus,
        acting_therapist_id: Uuid,
        auth_token: &str,
    ) -> Result<Booking, BookingError> {
        debug!("Transitioning booking {} to {}", booking_id, new_status);

        let booking = self.get_booking(booking_id, auth_token).await?;

        if booking.therapist_id != acting_therapist_id {
            return Err(BookingError::Unauthorized);
        }

        self.lifecycle_service
            .validate_status_transition(&booking.status, &new_status)?;

        let patch = json!({ "status": new_status });
        let updated: Booking = self
            .store
            .update_returning("bookings", &booking_id.to_string(), patch, auth_token)
            .await
            .map_err(|e| match e {
                StoreError::NotFound(_) => BookingError::NotFound,
                other => BookingError::DatabaseError(other.to_string()),
            })?;

        info!(
            "Booking {} transitioned {} -> {}",
            booking_id, booking.status, updated.status
        );
        Ok(updated)
    }
}
