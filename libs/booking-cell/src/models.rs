// libs/booking-cell/src/models.rs
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

/// Lifecycle state of a booking. Only the owning therapist moves a booking
/// out of `Pending` or `Accepted`; the remaining states are terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl BookingStatus {
    /// Active bookings are the ones that hold a slot and block the patient
    /// from opening another request with the same therapist.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Accepted)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Completed | BookingStatus::Cancelled
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Accepted => write!(f, "accepted"),
            BookingStatus::Rejected => write!(f, "rejected"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ProblemArea {
    #[serde(rename = "Focus & Attention")]
    FocusAttention,
    #[serde(rename = "Anxiety & Depression")]
    AnxietyDepression,
    #[serde(rename = "Learning & Memory")]
    LearningMemory,
}

impl fmt::Display for ProblemArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemArea::FocusAttention => write!(f, "Focus & Attention"),
            ProblemArea::AnxietyDepression => write!(f, "Anxiety & Depression"),
            ProblemArea::LearningMemory => write!(f, "Learning & Memory"),
        }
    }
}

/// Patient contact details captured at booking time. This is a snapshot:
/// later profile edits must not retroactively alter historical bookings,
/// so the value is embedded in the booking row and never re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDetails {
    pub patient_name: String,
    pub patient_email: String,
    pub patient_phone: String,
    pub patient_gender: String,
    pub patient_date_of_birth: NaiveDate,
    pub patient_address: String,
    pub problem_area: ProblemArea,
    pub reason_for_booking: String,
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email regex is valid"))
}

impl PatientDetails {
    /// Field-level validation; collected so a form can highlight every
    /// problem at once instead of failing on the first.
    pub fn validate(&self) -> Result<(), BookingError> {
        let mut errors = Vec::new();

        if self.patient_name.trim().is_empty() {
            errors.push(FieldError::new("patient_name", "Full name is required"));
        }
        if self.patient_email.trim().is_empty() {
            errors.push(FieldError::new("patient_email", "Email is required"));
        } else if !email_regex().is_match(self.patient_email.trim()) {
            errors.push(FieldError::new("patient_email", "Email is invalid"));
        }
        if self.patient_phone.trim().is_empty() {
            errors.push(FieldError::new("patient_phone", "Phone number is required"));
        }
        if self.patient_gender.trim().is_empty() {
            errors.push(FieldError::new("patient_gender", "Gender is required"));
        }
        if self.patient_address.trim().is_empty() {
            errors.push(FieldError::new("patient_address", "Address is required"));
        }
        if self.reason_for_booking.trim().is_empty() {
            errors.push(FieldError::new(
                "reason_for_booking",
                "Reason for booking is required",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(BookingError::Validation(errors))
        }
    }
}

/// A ledger row. `slot_date`/`slot_time` duplicate the chosen slot's
/// coordinates at creation time so the ledger can be queried without
/// re-deriving slots from the availability template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub therapist_id: Uuid,
    pub therapist_name: String,
    pub patient_id: Uuid,
    #[serde(flatten)]
    pub details: PatientDetails,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
    pub status: BookingStatus,
    pub booking_timestamp: DateTime<Utc>,
}

impl Booking {
    pub fn slot_instant(&self) -> DateTime<Utc> {
        self.slot_date.and_time(self.slot_time).and_utc()
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSessionRequest {
    pub therapist_id: Uuid,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
    #[serde(flatten)]
    pub details: PatientDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

// ==============================================================================
// SLOT CLASSIFICATION MODELS
// ==============================================================================

/// Mutually exclusive states a candidate slot can be in for one viewing
/// patient. Classification order is part of the contract: a patient with an
/// outstanding request anywhere with this therapist is stopped before the
/// specific slot is even considered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotState {
    Past,
    BlockedByActiveBooking { status: BookingStatus },
    OwnPending,
    OwnAccepted,
    TakenByOther,
    Free,
}

impl SlotState {
    pub fn is_bookable(&self) -> bool {
        matches!(self, SlotState::Free)
    }
}

/// One entry of the rendered slot board for a chosen date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotView {
    pub time: NaiveTime,
    #[serde(flatten)]
    pub state: SlotState,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Booking not found")]
    NotFound,

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("You already have a {status} session with this therapist. Only one active session at a time is allowed")]
    OwnActiveBooking { status: BookingStatus },

    #[error("This time slot is already taken by another patient")]
    SlotTaken,

    #[error("This time slot has already passed")]
    SlotInPast,

    #[error("Therapist has not configured availability")]
    NoAvailability,

    #[error("Therapist not found")]
    TherapistNotFound,

    #[error("Booking cannot be modified in current status: {0}")]
    InvalidStatusTransition(BookingStatus),

    #[error("Unauthorized access to booking")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
