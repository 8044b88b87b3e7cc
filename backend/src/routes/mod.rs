//! Route definitions for the Farm Advisory API

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/irrigation", irrigation_routes())
}

/// Irrigation advisory routes (public)
fn irrigation_routes() -> Router<AppState> {
    Router::new().route("/advice", post(handlers::advise_observation))
}
