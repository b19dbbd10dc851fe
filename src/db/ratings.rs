use sqlx::SqlitePool;

use crate::{
    error::{AppError, AppResult},
    models::{Rating, RatingEntry},
};

/// Lists the user's ratings
pub async fn list(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<RatingEntry>> {
    let ratings = sqlx::query_as::<_, RatingEntry>(
        "SELECT movie_id, rating FROM user_ratings WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ratings)
}

/// Records a rating, one row per (user, movie).
///
/// Rejects unknown movie ids before writing. A second rating for the same
/// pair updates the stored value in place.
pub async fn upsert(
    pool: &SqlitePool,
    user_id: &str,
    movie_id: i64,
    rating: Rating,
) -> AppResult<()> {
    let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM movies WHERE id = ?")
        .bind(movie_id)
        .fetch_optional(pool)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    sqlx::query(
        "INSERT INTO user_ratings (user_id, movie_id, rating) VALUES (?, ?, ?) \
         ON CONFLICT (user_id, movie_id) \
         DO UPDATE SET rating = excluded.rating, updated_at = CURRENT_TIMESTAMP",
    )
    .bind(user_id)
    .bind(movie_id)
    .bind(rating)
    .execute(pool)
    .await?;

    tracing::info!(user_id = %user_id, movie_id, rating = ?rating, "Rating upserted");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::catalog;
    use crate::db::sqlite::test_pool;
    use crate::models::OmdbMovie;

    async fn seed_movie(pool: &SqlitePool) -> i64 {
        let record = OmdbMovie {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            director: "Christopher Nolan".to_string(),
            response: "True".to_string(),
            ..Default::default()
        };
        catalog::upsert_by_imdb_id(pool, &record).await.unwrap().id
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_with_latest_value() {
        let pool = test_pool().await;
        let movie_id = seed_movie(&pool).await;

        upsert(&pool, "u1", movie_id, Rating::Liked).await.unwrap();
        upsert(&pool, "u1", movie_id, Rating::Disliked)
            .await
            .unwrap();

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_ratings WHERE user_id = 'u1'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);

        let ratings = list(&pool, "u1").await.unwrap();
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].rating, Rating::Disliked);
    }

    #[tokio::test]
    async fn test_upsert_unknown_movie_is_not_found() {
        let pool = test_pool().await;

        let err = upsert(&pool, "u1", 999, Rating::Liked).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_ratings")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_ratings_are_scoped_to_user() {
        let pool = test_pool().await;
        let movie_id = seed_movie(&pool).await;

        upsert(&pool, "u1", movie_id, Rating::Liked).await.unwrap();
        upsert(&pool, "u2", movie_id, Rating::Neutral)
            .await
            .unwrap();

        let u1 = list(&pool, "u1").await.unwrap();
        assert_eq!(u1[0].rating, Rating::Liked);

        let u2 = list(&pool, "u2").await.unwrap();
        assert_eq!(u2[0].rating, Rating::Neutral);
    }
}
