use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    db::watchlist,
    error::AppResult,
    models::WatchlistMovie,
    state::AppState,
};

use super::{required_id, required_text};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub user_id: Option<String>,
}

/// Handler for listing a user's watchlist
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<WatchlistMovie>>> {
    let user_id = required_text(params.user_id, "user_id")?;

    let movies = watchlist::list(&state.db, &user_id).await?;
    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub user_id: Option<String>,
    pub movie_id: Option<i64>,
}

/// Handler for adding a movie to the watchlist (idempotent)
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddRequest>,
) -> AppResult<(StatusCode, Json<WatchlistMovie>)> {
    let user_id = required_text(request.user_id, "user_id")?;
    let movie_id = required_id(request.movie_id, "movie_id")?;

    let movie = watchlist::add(&state.db, &user_id, movie_id).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

#[derive(Debug, Deserialize)]
pub struct SetWatchedRequest {
    pub user_id: Option<String>,
    pub movie_id: Option<i64>,
    pub watched: Option<bool>,
}

/// Handler for flagging a watchlist entry as watched (or not)
pub async fn set_watched(
    State(state): State<AppState>,
    Json(request): Json<SetWatchedRequest>,
) -> AppResult<StatusCode> {
    let user_id = required_text(request.user_id, "user_id")?;
    let movie_id = required_id(request.movie_id, "movie_id")?;
    let watched = request.watched.unwrap_or(true);

    watchlist::set_watched(&state.db, &user_id, movie_id, watched).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct RemoveParams {
    pub user_id: Option<String>,
    pub movie_id: Option<i64>,
}

/// Handler for removing a watchlist entry, keyed by (user, movie)
pub async fn remove(
    State(state): State<AppState>,
    Query(params): Query<RemoveParams>,
) -> AppResult<StatusCode> {
    let user_id = required_text(params.user_id, "user_id")?;
    let movie_id = required_id(params.movie_id, "movie_id")?;

    watchlist::remove(&state.db, &user_id, movie_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
