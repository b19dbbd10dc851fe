use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::MovieDetails,
    services::search::{blended_search, DEFAULT_MAX_RESULTS},
    state::AppState,
};

use super::required_text;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub max_results: Option<usize>,
}

/// Handler for blended title search
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<MovieDetails>>> {
    let query = required_text(params.query, "query")?;

    let max_results = params.max_results.unwrap_or(DEFAULT_MAX_RESULTS);
    if max_results == 0 {
        return Err(AppError::InvalidInput(
            "max_results must be positive".to_string(),
        ));
    }

    let movies = blended_search(&state.db, state.provider.clone(), &query, max_results).await?;
    Ok(Json(movies))
}
