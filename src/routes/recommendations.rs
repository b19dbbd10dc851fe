use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::ScoredMovie,
    services::recommendations::{self, DEFAULT_TOP_N},
    state::AppState,
};

use super::required_text;

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub user_id: Option<String>,
    pub top_n: Option<usize>,
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<Vec<ScoredMovie>>> {
    let user_id = required_text(params.user_id, "user_id")?;

    let top_n = params.top_n.unwrap_or(DEFAULT_TOP_N);
    if top_n == 0 {
        return Err(AppError::InvalidInput(
            "top_n must be positive".to_string(),
        ));
    }

    let movies = recommendations::recommend(&state.db, &user_id, top_n).await?;
    Ok(Json(movies))
}
