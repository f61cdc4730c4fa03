use std::sync::Arc;

use axum::{routing::get, Router};

use assessment_cell::router::assessment_routes;
use booking_cell::router::booking_routes;
use session_cell::router::session_routes;
use shared_config::AppConfig;
use therapist_cell::router::therapist_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "NeuroFlex API is running!" }))
        .nest("/therapists", therapist_routes(state.clone()))
        .nest("/bookings", booking_routes(state.clone()))
        .nest("/sessions", session_routes(state.clone()))
        .nest("/assessments", assessment_routes(state.clone()))
}
