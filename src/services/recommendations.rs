use sqlx::SqlitePool;

use crate::{
    db::catalog,
    error::AppResult,
    models::ScoredMovie,
};

/// Default number of recommendations returned
pub const DEFAULT_TOP_N: usize = 5;

/// Generates personalized watch recommendations.
///
/// Candidates are every catalog movie outside the user's watchlist, scored
/// by feature-text similarity against the watchlist: the score is the mean
/// Dice similarity between the candidate's feature string and each watchlist
/// movie's feature string. Feature text is a cheap proxy for "movies like
/// the ones you already track" without an embedding model or cross-user
/// data.
///
/// With an empty watchlist there is no signal yet, so the result degrades to
/// the globally top-rated movies (positive provider rating only), with the
/// rating itself as the score.
pub async fn recommend(
    pool: &SqlitePool,
    user_id: &str,
    top_n: usize,
) -> AppResult<Vec<ScoredMovie>> {
    let watchlist = catalog::watchlist_features(pool, user_id).await?;

    if watchlist.is_empty() {
        let top = catalog::top_rated(pool, top_n).await?;
        return Ok(top
            .into_iter()
            .map(|movie| {
                let score = movie.imdb_rating.unwrap_or(0.0);
                ScoredMovie { movie, score }
            })
            .collect());
    }

    let watchlist_ids: Vec<i64> = watchlist.iter().map(|m| m.id).collect();
    let profiles: Vec<String> = watchlist
        .iter()
        .map(|m| feature_string(&m.genre, &m.director, &m.actors, &m.plot))
        .collect();

    let candidates = catalog::candidates_excluding(pool, &watchlist_ids).await?;

    let mut scored: Vec<ScoredMovie> = candidates
        .into_iter()
        .map(|movie| {
            let features = feature_string(&movie.genre, &movie.director, &movie.actors, &movie.plot);
            let total: f64 = profiles
                .iter()
                .map(|profile| strsim::sorensen_dice(&features, profile))
                .sum();
            let score = total / profiles.len() as f64;
            ScoredMovie { movie, score }
        })
        .collect();

    // Stable sort: candidates with equal scores keep their relative order
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_n);

    tracing::debug!(
        user_id = %user_id,
        watchlist_size = watchlist_ids.len(),
        recommendations = scored.len(),
        "Recommendations computed"
    );

    Ok(scored)
}

/// Builds a movie's feature string: the non-empty feature fields joined with
/// spaces and lower-cased
fn feature_string(
    genre: &Option<String>,
    director: &str,
    actors: &Option<String>,
    plot: &Option<String>,
) -> String {
    [
        genre.as_deref().unwrap_or(""),
        director,
        actors.as_deref().unwrap_or(""),
        plot.as_deref().unwrap_or(""),
    ]
    .iter()
    .filter(|field| !field.is_empty())
    .cloned()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::test_pool;
    use crate::db::watchlist;
    use crate::models::OmdbMovie;

    fn omdb_movie(imdb_id: &str, title: &str, genre: &str, director: &str) -> OmdbMovie {
        OmdbMovie {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "2000".to_string(),
            genre: genre.to_string(),
            director: director.to_string(),
            response: "True".to_string(),
            ..Default::default()
        }
    }

    async fn seed(pool: &SqlitePool, record: &OmdbMovie) -> i64 {
        catalog::upsert_by_imdb_id(pool, record).await.unwrap().id
    }

    #[test]
    fn test_feature_string_skips_empty_fields() {
        let features = feature_string(
            &Some("Drama".to_string()),
            "Nolan",
            &None,
            &Some("A heist.".to_string()),
        );
        assert_eq!(features, "drama nolan a heist.");
    }

    #[test]
    fn test_feature_string_lowercases() {
        let features = feature_string(&None, "NOLAN", &None, &None);
        assert_eq!(features, "nolan");
    }

    #[tokio::test]
    async fn test_shared_genre_ranks_higher() {
        let pool = test_pool().await;

        let a = seed(&pool, &omdb_movie("tt0001", "A", "Drama", "X")).await;
        seed(&pool, &omdb_movie("tt0002", "B", "Drama", "Y")).await;
        seed(&pool, &omdb_movie("tt0003", "C", "Comedy", "Z")).await;

        watchlist::add(&pool, "u1", a).await.unwrap();

        let recs = recommend(&pool, "u1", 2).await.unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].movie.title, "B");
        assert!(recs[0].score > recs[1].score);
    }

    #[tokio::test]
    async fn test_never_recommends_watchlist_movies() {
        let pool = test_pool().await;

        let a = seed(&pool, &omdb_movie("tt0001", "A", "Drama", "X")).await;
        let b = seed(&pool, &omdb_movie("tt0002", "B", "Drama", "X")).await;
        seed(&pool, &omdb_movie("tt0003", "C", "Drama", "X")).await;

        watchlist::add(&pool, "u1", a).await.unwrap();
        watchlist::add(&pool, "u1", b).await.unwrap();

        let recs = recommend(&pool, "u1", 10).await.unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie.title, "C");
    }

    #[tokio::test]
    async fn test_score_is_mean_over_watchlist() {
        let pool = test_pool().await;

        let a = seed(&pool, &omdb_movie("tt0001", "A", "Drama", "X")).await;
        let b = seed(&pool, &omdb_movie("tt0002", "B", "Comedy", "Y")).await;
        seed(&pool, &omdb_movie("tt0003", "C", "Drama", "X")).await;

        watchlist::add(&pool, "u1", a).await.unwrap();
        watchlist::add(&pool, "u1", b).await.unwrap();

        let recs = recommend(&pool, "u1", 1).await.unwrap();
        // C matches A exactly (1.0) and B not at all (0.0); the mean is 0.5
        assert!((recs[0].score - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_watchlist_falls_back_to_top_rated() {
        let pool = test_pool().await;

        let mut low = omdb_movie("tt0001", "Low", "Drama", "X");
        low.imdb_rating = "6.1".to_string();
        seed(&pool, &low).await;

        let mut high = omdb_movie("tt0002", "High", "Drama", "X");
        high.imdb_rating = "9.2".to_string();
        seed(&pool, &high).await;

        let mut unrated = omdb_movie("tt0003", "Unrated", "Drama", "X");
        unrated.imdb_rating = "N/A".to_string();
        seed(&pool, &unrated).await;

        let recs = recommend(&pool, "u1", 5).await.unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].movie.title, "High");
        assert_eq!(recs[0].score, 9.2);
        assert_eq!(recs[1].movie.title, "Low");
    }

    #[tokio::test]
    async fn test_empty_catalog_empty_watchlist_yields_empty() {
        let pool = test_pool().await;

        let recs = recommend(&pool, "u1", 5).await.unwrap();
        assert!(recs.is_empty());
    }

    #[tokio::test]
    async fn test_top_n_caps_results() {
        let pool = test_pool().await;

        let a = seed(&pool, &omdb_movie("tt0001", "A", "Drama", "X")).await;
        for i in 2..8 {
            seed(
                &pool,
                &omdb_movie(&format!("tt000{}", i), &format!("M{}", i), "Drama", "X"),
            )
            .await;
        }

        watchlist::add(&pool, "u1", a).await.unwrap();

        let recs = recommend(&pool, "u1", 3).await.unwrap();
        assert_eq!(recs.len(), 3);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }
}
