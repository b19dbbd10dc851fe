use std::collections::HashSet;
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{
    db::catalog,
    error::{AppError, AppResult},
    models::MovieDetails,
    services::providers::{self, MetadataProvider},
};

/// Default cap on blended search results
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Blended title search: local catalog matches first, provider remainder.
///
/// Local matches are cheap, so they fill the result first; a full local hit
/// set short-circuits without consulting the provider at all. Otherwise the
/// provider tops up the list: hits whose external id is already stored are
/// excluded, and detail records for the remainder are fetched as independent
/// parallel tasks whose individual failures are dropped.
pub async fn blended_search(
    pool: &SqlitePool,
    provider: Arc<dyn MetadataProvider>,
    query: &str,
    max_results: usize,
) -> AppResult<Vec<MovieDetails>> {
    let local = catalog::search_by_title(pool, query, max_results).await?;
    let local_count = local.len();
    let mut combined: Vec<MovieDetails> = local.into_iter().map(MovieDetails::from).collect();

    if local_count >= max_results {
        tracing::debug!(
            query = %query,
            local_count,
            "Local matches reached the cap, provider skipped"
        );
        return Ok(combined);
    }

    let hits = match provider.search_by_title(query).await {
        Ok(hits) => hits,
        Err(AppError::NotFound(msg)) => {
            if combined.is_empty() {
                return Err(AppError::NotFound(msg));
            }
            return Ok(combined);
        }
        Err(e) if !combined.is_empty() => {
            tracing::warn!(
                error = %e,
                query = %query,
                "Provider search failed, returning local matches"
            );
            return Ok(combined);
        }
        Err(e) => return Err(e),
    };

    let hit_ids: Vec<String> = hits.iter().map(|hit| hit.imdb_id.clone()).collect();
    let mut seen: HashSet<String> = catalog::existing_imdb_ids(pool, &hit_ids).await?;

    let remaining = max_results - local_count;
    let mut candidates = Vec::new();
    for hit in hits {
        if candidates.len() == remaining {
            break;
        }
        if seen.insert(hit.imdb_id.clone()) {
            candidates.push(hit.imdb_id);
        }
    }

    let details = providers::fetch_details_batch(provider, candidates).await;
    combined.extend(details.into_iter().map(MovieDetails::from));

    tracing::info!(
        query = %query,
        local_count,
        provider_count = combined.len() - local_count,
        "Blended search completed"
    );

    Ok(combined)
}
