// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    // All booking operations require authentication
    let protected_routes = Router::new()
        .route("/", post(handlers::book_session))
        .route("/mine", get(handlers::get_my_bookings))
        .route("/therapists/{therapist_id}/dates", get(handlers::get_available_dates))
        .route("/therapists/{therapist_id}/slots", get(handlers::get_slot_board))
        .route("/therapists/{therapist_id}/list", get(handlers::get_therapist_bookings))
        .route("/{booking_id}/status", patch(handlers::update_booking_status))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
