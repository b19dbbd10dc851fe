use axum::{
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};
use crate::state::AppState;

pub mod movies;
pub mod ratings;
pub mod recommendations;
pub mod search;
pub mod watchlist;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Catalog
        .route("/movies", get(movies::query).post(movies::create))
        .route("/movies/:id", get(movies::get_by_id))
        // Blended search
        .route("/search", get(search::search))
        // Watchlist
        .route(
            "/watchlist",
            get(watchlist::list)
                .post(watchlist::add)
                .put(watchlist::set_watched)
                .delete(watchlist::remove),
        )
        // Ratings
        .route("/ratings", get(ratings::list).post(ratings::rate))
        // Recommendations
        .route("/recommendations", get(recommendations::recommend))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Validates a required text parameter: present and non-blank
pub(crate) fn required_text(value: Option<String>, name: &str) -> AppResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{} is required", name)))
}

/// Validates a required id parameter
pub(crate) fn required_id(value: Option<i64>, name: &str) -> AppResult<i64> {
    value.ok_or_else(|| AppError::InvalidInput(format!("{} is required", name)))
}
