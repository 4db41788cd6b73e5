//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Doctor CRUD
        .route("/doctor", get(handlers::list_doctors))
        .route("/doctor/add", post(handlers::register_doctor))
        .route("/doctor/{id}", get(handlers::get_doctor))
        .route(
            "/doctor/{id}",
            put(handlers::update_doctor).patch(handlers::update_doctor),
        )
        .route("/doctor/{id}", delete(handlers::delete_doctor))
        // Patient CRUD
        .route("/patient", get(handlers::list_patients))
        .route("/patient/add", post(handlers::register_patient))
        .route("/patient/{id}", get(handlers::get_patient))
        .route(
            "/patient/{id}",
            put(handlers::update_patient).patch(handlers::update_patient),
        )
        .route("/patient/{id}", delete(handlers::delete_patient))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
        // If we got here, router was created successfully
    }
}
