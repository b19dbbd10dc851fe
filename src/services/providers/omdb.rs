/// OMDb API provider
///
/// One endpoint, two query shapes: `?s=` returns summary search hits,
/// `?i=` returns the full detail record for an IMDb id. The API signals
/// "no results" in-band with `Response: "False"` rather than an HTTP error.
use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{OmdbMovie, OmdbSearchHit, OmdbSearchResponse},
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    /// Creates an OMDb provider with a request timeout.
    ///
    /// The provider is an uncontrolled network dependency, so every call
    /// carries the configured client-level timeout.
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    async fn search_by_title(&self, query: &str) -> AppResult<Vec<OmdbSearchHit>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("s", query),
                ("type", "movie"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let search: OmdbSearchResponse = response.json().await?;

        if search.response != "True" {
            return Err(AppError::NotFound(
                search.error.unwrap_or_else(|| "Movie not found!".to_string()),
            ));
        }

        tracing::info!(
            query = %query,
            results = search.search.len(),
            provider = "omdb",
            "Title search completed"
        );

        Ok(search.search)
    }

    async fn fetch_by_imdb_id(&self, imdb_id: &str) -> AppResult<OmdbMovie> {
        let response = self
            .http_client
            .get(self.endpoint())
            .query(&[("apikey", self.api_key.as_str()), ("i", imdb_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let detail: OmdbMovie = response.json().await?;

        if detail.response == "False" {
            return Err(AppError::NotFound(format!(
                "No movie found for IMDb ID {}",
                imdb_id
            )));
        }

        tracing::debug!(imdb_id = %imdb_id, title = %detail.title, provider = "omdb", "Detail fetched");

        Ok(detail)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_provider() -> OmdbProvider {
        OmdbProvider::new(
            "test_key".to_string(),
            "http://test.local".to_string(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_provider_name() {
        let provider = create_test_provider();
        assert_eq!(provider.name(), "omdb");
    }

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let provider = OmdbProvider::new(
            "test_key".to_string(),
            "http://test.local/".to_string(),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.endpoint(), "http://test.local/");
    }

    #[test]
    fn test_search_hit_deserialization() {
        let json = r#"{
            "Title": "Batman Begins",
            "Year": "2005",
            "imdbID": "tt0372784",
            "Type": "movie",
            "Poster": "https://example.com/batman.jpg"
        }"#;

        let hit: OmdbSearchHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.imdb_id, "tt0372784");
        assert_eq!(hit.title, "Batman Begins");
        assert_eq!(hit.year, "2005");
    }
}
