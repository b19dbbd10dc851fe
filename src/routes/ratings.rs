use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    db::ratings,
    error::{AppError, AppResult},
    models::{Rating, RatingEntry},
    state::AppState,
};

use super::{required_id, required_text};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub user_id: Option<String>,
}

/// Handler for listing a user's ratings
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<RatingEntry>>> {
    let user_id = required_text(params.user_id, "user_id")?;

    let entries = ratings::list(&state.db, &user_id).await?;
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub user_id: Option<String>,
    pub movie_id: Option<i64>,
    pub rating: Option<String>,
}

/// Handler for rating a movie (upsert semantics)
pub async fn rate(
    State(state): State<AppState>,
    Json(request): Json<RateRequest>,
) -> AppResult<StatusCode> {
    let user_id = required_text(request.user_id, "user_id")?;
    let movie_id = required_id(request.movie_id, "movie_id")?;
    let rating = request
        .rating
        .as_deref()
        .and_then(Rating::parse)
        .ok_or_else(|| AppError::InvalidInput("Invalid rating value".to_string()))?;

    ratings::upsert(&state.db, &user_id, movie_id, rating).await?;
    Ok(StatusCode::NO_CONTENT)
}
