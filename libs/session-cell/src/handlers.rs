// libs/session-cell/src/handlers.rs
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

use crate::models::{AppendEegRequest, SessionError, StartSessionRequest};
use crate::services::session::SessionService;

fn map_error(e: SessionError) -> AppError {
    match e {
        SessionError::NotFound => AppError::NotFound("Session not found".to_string()),
        SessionError::SessionEnded => AppError::BadRequest("Session has already ended".to_string()),
        SessionError::Unauthorized => {
            AppError::Auth("Not authorized to access this session".to_string())
        }
        SessionError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn parse_user_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid user ID".to_string()))
}

#[axum::debug_handler]
pub async fn start_session(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_user_id(&user)?;
    let service = SessionService::new(&state);

    let session = service
        .start_session(patient_id, request, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "session": session,
        "message": "Therapy session started"
    })))
}

#[axum::debug_handler]
pub async fn append_eeg(
    State(state): State<Arc<AppConfig>>,
    Path(session_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<AppendEegRequest>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_user_id(&user)?;
    let service = SessionService::new(&state);

    let session = service
        .append_eeg(session_id, patient_id, request, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "focus_alert": session.focus_alert,
        "samples": session.eeg_data.len()
    })))
}

#[axum::debug_handler]
pub async fn end_session(
    State(state): State<Arc<AppConfig>>,
    Path(session_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_user_id(&user)?;
    let service = SessionService::new(&state);

    let session = service
        .end_session(session_id, patient_id, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "session": session,
        "message": "Session ended"
    })))
}

#[axum::debug_handler]
pub async fn get_my_sessions(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_user_id(&user)?;
    let service = SessionService::new(&state);

    let sessions = service
        .list_patient_sessions(patient_id, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "sessions": sessions,
        "total": sessions.len()
    })))
}
