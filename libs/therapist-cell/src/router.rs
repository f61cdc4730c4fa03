use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn therapist_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::list_therapists))
        .route("/{therapist_id}", get(handlers::get_therapist))
        .route("/{therapist_id}/availability", get(handlers::get_availability))
        .route("/{therapist_id}/availability", put(handlers::update_availability))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
