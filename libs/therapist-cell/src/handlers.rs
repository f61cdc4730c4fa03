use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AvailabilityTemplate, TherapistError};
use crate::services::profile::TherapistService;

fn map_error(e: TherapistError) -> AppError {
    match e {
        TherapistError::NotFound => AppError::NotFound("Therapist not found".to_string()),
        TherapistError::InvalidSchedule(msg) => AppError::BadRequest(msg),
        TherapistError::NoAvailability => {
            AppError::NotFound("Therapist has not configured availability".to_string())
        }
        TherapistError::Unauthorized => {
            AppError::Auth("Not authorized to modify this profile".to_string())
        }
        TherapistError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_therapists(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = TherapistService::new(&state);

    let therapists = service
        .list_therapists(auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "therapists": therapists,
        "total": therapists.len()
    })))
}

#[axum::debug_handler]
pub async fn get_therapist(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = TherapistService::new(&state);

    let profile = service
        .get_profile(therapist_id, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!(profile)))
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(_user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = TherapistService::new(&state);

    let template = service
        .get_availability(therapist_id, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!(template)))
}

/// Only the therapist may edit their own schedule.
#[axum::debug_handler]
pub async fn update_availability(
    State(state): State<Arc<AppConfig>>,
    Path(therapist_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(template): Json<AvailabilityTemplate>,
) -> Result<Json<Value>, AppError> {
    let is_owner = therapist_id.to_string() == user.id;

    if !is_owner || !user.is_therapist() {
        return Err(AppError::Auth(
            "Not authorized to update availability for this therapist".to_string(),
        ));
    }

    let service = TherapistService::new(&state);

    let profile = service
        .update_availability(therapist_id, template, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "profile": profile,
        "message": "Availability updated successfully"
    })))
}
