use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::WatchlistMovie,
};

/// Movie summary columns returned by watchlist listings
const SUMMARY_COLUMNS: &str = "m.id, m.title, m.year, m.director, m.plot, m.poster_url, \
     m.imdb_rating, m.rotten_tomatoes_rating, w.watched";

/// Lists the user's watchlist joined with movie summaries
pub async fn list(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<WatchlistMovie>> {
    let movies = sqlx::query_as::<_, WatchlistMovie>(&format!(
        "SELECT {} FROM movies m \
         INNER JOIN user_watchlist w ON m.id = w.movie_id \
         WHERE w.user_id = ?",
        SUMMARY_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

/// Adds a movie to the user's watchlist.
///
/// Rejects unknown movie ids before writing. Idempotent: re-adding an
/// existing (user, movie) pair succeeds without creating a second row, backed
/// by the table's uniqueness constraint.
pub async fn add(pool: &SqlitePool, user_id: &str, movie_id: i64) -> AppResult<WatchlistMovie> {
    ensure_movie_exists(pool, movie_id).await?;

    sqlx::query("INSERT OR IGNORE INTO user_watchlist (user_id, movie_id) VALUES (?, ?)")
        .bind(user_id)
        .bind(movie_id)
        .execute(pool)
        .await?;

    tracing::info!(user_id = %user_id, movie_id, "Watchlist add");

    let movie = sqlx::query_as::<_, WatchlistMovie>(&format!(
        "SELECT {} FROM movies m \
         INNER JOIN user_watchlist w ON m.id = w.movie_id \
         WHERE w.user_id = ? AND w.movie_id = ?",
        SUMMARY_COLUMNS
    ))
    .bind(user_id)
    .bind(movie_id)
    .fetch_one(pool)
    .await?;

    Ok(movie)
}

/// Removes a watchlist entry, always keyed by the (user, movie) pair
pub async fn remove(pool: &SqlitePool, user_id: &str, movie_id: i64) -> AppResult<()> {
    ensure_movie_exists(pool, movie_id).await?;

    sqlx::query("DELETE FROM user_watchlist WHERE user_id = ? AND movie_id = ?")
        .bind(user_id)
        .bind(movie_id)
        .execute(pool)
        .await?;

    tracing::info!(user_id = %user_id, movie_id, "Watchlist remove");

    Ok(())
}

/// Sets the watched flag on an entry, stamping `watched_at` when it turns on
pub async fn set_watched(
    pool: &SqlitePool,
    user_id: &str,
    movie_id: i64,
    watched: bool,
) -> AppResult<()> {
    let watched_at: Option<DateTime<Utc>> = watched.then(Utc::now);

    let result = sqlx::query(
        "UPDATE user_watchlist SET watched = ?, watched_at = ? \
         WHERE user_id = ? AND movie_id = ?",
    )
    .bind(watched)
    .bind(watched_at)
    .bind(user_id)
    .bind(movie_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Watchlist entry not found".to_string()));
    }

    Ok(())
}

async fn ensure_movie_exists(pool: &SqlitePool, movie_id: i64) -> AppResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM movies WHERE id = ?")
        .bind(movie_id)
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog;
    use crate::db::sqlite::test_pool;
    use crate::models::OmdbMovie;

    async fn seed_movie(pool: &SqlitePool, imdb_id: &str, title: &str) -> i64 {
        let record = OmdbMovie {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "2010".to_string(),
            director: "Christopher Nolan".to_string(),
            response: "True".to_string(),
            ..Default::default()
        };
        catalog::upsert_by_imdb_id(pool, &record).await.unwrap().id
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let pool = test_pool().await;
        let movie_id = seed_movie(&pool, "tt1375666", "Inception").await;

        add(&pool, "u1", movie_id).await.unwrap();
        add(&pool, "u1", movie_id).await.unwrap();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_watchlist WHERE user_id = 'u1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);

        let listed = list(&pool, "u1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, movie_id);
        assert!(!listed[0].watched);
    }

    #[tokio::test]
    async fn test_add_unknown_movie_is_not_found() {
        let pool = test_pool().await;

        let err = add(&pool, "u1", 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_is_scoped_to_user() {
        let pool = test_pool().await;
        let movie_id = seed_movie(&pool, "tt1375666", "Inception").await;

        add(&pool, "u1", movie_id).await.unwrap();
        add(&pool, "u2", movie_id).await.unwrap();

        remove(&pool, "u1", movie_id).await.unwrap();

        assert!(list(&pool, "u1").await.unwrap().is_empty());
        assert_eq!(list(&pool, "u2").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_watched_stamps_entry() {
        let pool = test_pool().await;
        let movie_id = seed_movie(&pool, "tt1375666", "Inception").await;
        add(&pool, "u1", movie_id).await.unwrap();

        set_watched(&pool, "u1", movie_id, true).await.unwrap();

        let listed = list(&pool, "u1").await.unwrap();
        assert!(listed[0].watched);

        let watched_at: Option<String> = sqlx::query_scalar(
            "SELECT watched_at FROM user_watchlist WHERE user_id = 'u1' AND movie_id = ?",
        )
        .bind(movie_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(watched_at.is_some());
    }

    #[tokio::test]
    async fn test_set_watched_missing_entry_is_not_found() {
        let pool = test_pool().await;
        let movie_id = seed_movie(&pool, "tt1375666", "Inception").await;

        let err = set_watched(&pool, "u1", movie_id, true).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
