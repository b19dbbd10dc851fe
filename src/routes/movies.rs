use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    db::catalog,
    error::{AppError, AppResult},
    models::{Movie, MovieFilter},
    state::AppState,
};

use super::required_text;

#[derive(Debug, Deserialize)]
pub struct MovieQueryParams {
    pub query: Option<String>,
    pub director: Option<String>,
    pub actor: Option<String>,
    pub genre: Option<String>,
}

/// Handler for filtered catalog queries
pub async fn query(
    State(state): State<AppState>,
    Query(params): Query<MovieQueryParams>,
) -> AppResult<Json<Vec<Movie>>> {
    let filter = MovieFilter {
        title: non_blank(params.query),
        director: non_blank(params.director),
        actor: non_blank(params.actor),
        genre: non_blank(params.genre),
    };

    let movies = catalog::query(&state.db, &filter).await?;
    Ok(Json(movies))
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub imdb_id: Option<String>,
}

/// Handler for fetch-and-persist by external identifier.
///
/// Returns the stored row directly when the id is already in the catalog
/// (200); otherwise fetches the detail record from the provider, persists it
/// and responds 201.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateMovieRequest>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    let imdb_id = required_text(request.imdb_id, "imdb_id")?;

    if let Some(existing) = catalog::find_by_imdb_id(&state.db, &imdb_id).await? {
        return Ok((StatusCode::OK, Json(existing)));
    }

    let record = state.provider.fetch_by_imdb_id(&imdb_id).await?;
    let movie = catalog::upsert_by_imdb_id(&state.db, &record).await?;

    Ok((StatusCode::CREATED, Json(movie)))
}

/// Handler for fetching one movie by catalog id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Movie>> {
    let movie = catalog::get(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(Json(movie))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
