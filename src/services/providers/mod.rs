use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

/// Movie metadata provider abstraction
///
/// The external metadata service is an uncontrolled network dependency:
/// rate-limited, occasionally unavailable. Callers must treat failures as
/// recoverable, and the blended search degrades to local results where it
/// can.
use crate::{
    error::AppResult,
    models::{OmdbMovie, OmdbSearchHit},
};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Trait for movie metadata providers
///
/// Providers implement title search (summary hits) and detail lookup by
/// external identifier. A "no results" answer from the provider surfaces as
/// `AppError::NotFound`, distinct from transport failures.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Search for movies by title text
    async fn search_by_title(&self, query: &str) -> AppResult<Vec<OmdbSearchHit>>;

    /// Fetch the full detail record for one external identifier
    async fn fetch_by_imdb_id(&self, imdb_id: &str) -> AppResult<OmdbMovie>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Fetches detail records for multiple identifiers in parallel.
///
/// Each identifier gets an independent task; the tasks are joined before
/// returning. A failed fetch is logged and dropped, never fatal to the
/// batch, and the relative order of successful results is preserved.
pub async fn fetch_details_batch(
    provider: Arc<dyn MetadataProvider>,
    imdb_ids: Vec<String>,
) -> Vec<OmdbMovie> {
    let mut tasks = Vec::new();

    for imdb_id in imdb_ids {
        let provider = provider.clone();
        let task = tokio::spawn(async move { provider.fetch_by_imdb_id(&imdb_id).await });
        tasks.push(task);
    }

    let mut results = Vec::new();
    let mut failures = 0usize;

    for task in tasks {
        match task.await {
            Ok(Ok(detail)) => results.push(detail),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Detail fetch failed for title");
                failures += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Task join error");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        tracing::warn!(
            success_count = results.len(),
            error_count = failures,
            "Partial detail fetch failure"
        );
    }

    results
}
