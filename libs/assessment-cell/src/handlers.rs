// libs/assessment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{AssessmentError, AssessmentResponses};
use crate::services::assessment::AssessmentService;

fn map_error(e: AssessmentError) -> AppError {
    match e {
        AssessmentError::NotFound => AppError::NotFound("Assessment not found".to_string()),
        AssessmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

fn parse_user_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id).map_err(|_| AppError::BadRequest("Invalid user ID".to_string()))
}

#[axum::debug_handler]
pub async fn submit_assessment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(responses): Json<AssessmentResponses>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_user_id(&user)?;
    let service = AssessmentService::new(&state);

    let assessment = service
        .submit(patient_id, responses, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "assessment": assessment
    })))
}

#[axum::debug_handler]
pub async fn get_my_assessments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let patient_id = parse_user_id(&user)?;
    let service = AssessmentService::new(&state);

    let assessments = service
        .list_patient_assessments(patient_id, auth.token())
        .await
        .map_err(map_error)?;

    Ok(Json(json!({
        "assessments": assessments,
        "total": assessments.len()
    })))
}
