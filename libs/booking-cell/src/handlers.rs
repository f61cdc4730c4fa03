// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{NaiveDate, Utc};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{BookSessionRequest, BookingError, UpdateBookingStatusRequest};
use crate::services::booking::BookingService;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct SlotBoardQuery {
    pub date: NaiveDate,
}

// ==============================================================================
// ERROR MAPPING
// ==============================================================================

fn map_booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::NotFound => AppError::NotFound("Booking not found".to_string()),
        BookingError::TherapistNotFound => AppError::NotFound("Therapist not found".to_string()),
        BookingError::NoAvailability => {
            AppError::NotFound("Therapist has not configured availability".to_string())
        }
        BookingError::Validation(fields) => AppError::Validation(json!(fields)),
        BookingError::OwnActiveBooking { .. } => AppError::Conflict(e.to_string()),
        BookingError::SlotTaken => AppError::Conflict(e.to_string()),
        BookingError::SlotInPast => AppError::BadRequest(e.to_string()),
        BookingError::InvalidStatusTransition(status) => {
            AppError::BadRequest(format!("Cannot transition from current status: {}", status))
        }
        BookingError::Unauthorized => {
            AppError::Auth("Not authorized to access this booking".to_string())
        }
        BookingError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn parse_user_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid user ID".to_string()))
}

// ==============================================================================
// SLOT BROWSING HANDLERS
// ==============================================================================

/// Dates within the booking horizon that still have future slots.
#[axum::debug_handler]
pub async fn get_available_dates(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let booking_service = BookingService::new(&state);

    let dates = booking_service
        .available_dates(therapist_id, Utc::now(), auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "therapist_id": therapist_id,
        "dates": dates
    })))
}

/// Every slot of the chosen date, classified for the viewing patient.
#[axum::debug_handler]
pub async fn get_slot_board(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<Uuid>,
    Query(params): Query<SlotBoardQuery>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_user_id(&user)?;
    let booking_service = BookingService::new(&state);

    let slots = booking_service
        .slot_board(therapist_id, params.date, patient_id, Utc::now(), auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "therapist_id": therapist_id,
        "date": params.date,
        "slots": slots
    })))
}

// ==============================================================================
// BOOKING HANDLERS
// ==============================================================================

/// Patient requests a session. The identity on the booking is always the
/// authenticated caller, never a body field.
#[axum::debug_handler]
pub async fn book_session(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookSessionRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_patient() {
        return Err(AppError::Auth("Only patients can book sessions".to_string()));
    }
    let patient_id = parse_user_id(&user)?;

    let booking_service = BookingService::new(&state);

    let booking = booking_service
        .attempt_booking(request, patient_id, Utc::now(), auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": booking,
        "message": "Booking request sent and pending therapist approval"
    })))
}

#[axum::debug_handler]
pub async fn get_my_bookings(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_user_id(&user)?;
    let booking_service = BookingService::new(&state);

    let bookings = booking_service
        .list_patient_bookings(patient_id, auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "bookings": bookings,
        "total": bookings.len()
    })))
}

/// The therapist's own ledger view.
#[axum::debug_handler]
pub async fn get_therapist_bookings(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let is_own_ledger = therapist_id.to_string() == user.id && user.is_therapist();

    if !is_own_ledger {
        return Err(AppError::Auth(
            "Not authorized to view bookings for this therapist".to_string(),
        ));
    }

    let booking_service = BookingService::new(&state);

    let bookings = booking_service
        .list_therapist_bookings(therapist_id, auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "therapist_id": therapist_id,
        "bookings": bookings,
        "total": bookings.len()
    })))
}

/// Lifecycle transition, driven by the owning therapist.
#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<AppConfig>>,
    Path(booking_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_therapist() {
        return Err(AppError::Auth(
            "Only therapists can update booking status".to_string(),
        ));
    }
    let therapist_id = parse_user_id(&user)?;

    let booking_service = BookingService::new(&state);

    let booking = booking_service
        .transition_booking(booking_id, request.status, therapist_id, auth.token())
        .await
        .map_err(map_booking_error)?;

    Ok(Json(json!({
        "success": true,
        "booking": booking,
        "message": "Booking status updated successfully"
    })))
}
