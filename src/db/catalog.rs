use std::collections::HashSet;

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieFeatures, MovieFilter, NewMovie, OmdbMovie},
};

/// Column list shared by every movie select; timestamps stay in the table
const MOVIE_COLUMNS: &str = "id, imdb_id, title, year, rated, released, runtime, genre, director, \
     writer, actors, plot, language, country, awards, poster_url, imdb_rating, \
     rotten_tomatoes_rating, metascore, imdb_votes, type, dvd, box_office, production, website";

/// Fetches a movie by its catalog id
pub async fn get(pool: &SqlitePool, id: i64) -> AppResult<Option<Movie>> {
    let movie = sqlx::query_as::<_, Movie>(&format!(
        "SELECT {} FROM movies WHERE id = ?",
        MOVIE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(movie)
}

/// Fetches a movie by its external identifier
pub async fn find_by_imdb_id(pool: &SqlitePool, imdb_id: &str) -> AppResult<Option<Movie>> {
    let movie = sqlx::query_as::<_, Movie>(&format!(
        "SELECT {} FROM movies WHERE imdb_id = ?",
        MOVIE_COLUMNS
    ))
    .bind(imdb_id)
    .fetch_optional(pool)
    .await?;

    Ok(movie)
}

/// Persists a provider record, keyed by external identifier.
///
/// Returns the existing row when the external id is already stored; otherwise
/// inserts the movie, links its genres and actors (created lazily on first
/// reference, matched by exact name), and returns the new row.
pub async fn upsert_by_imdb_id(pool: &SqlitePool, record: &OmdbMovie) -> AppResult<Movie> {
    if let Some(existing) = find_by_imdb_id(pool, &record.imdb_id).await? {
        tracing::debug!(imdb_id = %record.imdb_id, movie_id = existing.id, "Movie already stored");
        return Ok(existing);
    }

    let new = NewMovie::from(record);

    let result = sqlx::query(
        "INSERT INTO movies (imdb_id, title, year, rated, released, runtime, genre, director, \
         writer, actors, plot, language, country, awards, poster_url, imdb_rating, \
         rotten_tomatoes_rating, metascore, imdb_votes, type, dvd, box_office, production, website) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&new.imdb_id)
    .bind(&new.title)
    .bind(new.year)
    .bind(&new.rated)
    .bind(&new.released)
    .bind(&new.runtime)
    .bind(&new.genre)
    .bind(&new.director)
    .bind(&new.writer)
    .bind(&new.actors)
    .bind(&new.plot)
    .bind(&new.language)
    .bind(&new.country)
    .bind(&new.awards)
    .bind(&new.poster_url)
    .bind(new.imdb_rating)
    .bind(new.rotten_tomatoes_rating)
    .bind(new.metascore)
    .bind(&new.imdb_votes)
    .bind(&new.kind)
    .bind(&new.dvd)
    .bind(&new.box_office)
    .bind(&new.production)
    .bind(&new.website)
    .execute(pool)
    .await?;

    let movie_id = result.last_insert_rowid();

    if let Some(genre) = &new.genre {
        link_genres(pool, movie_id, genre).await?;
    }
    if let Some(actors) = &new.actors {
        link_actors(pool, movie_id, actors).await?;
    }

    tracing::info!(imdb_id = %new.imdb_id, movie_id, title = %new.title, "Movie persisted");

    get(pool, movie_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Inserted movie {} not found", movie_id)))
}

/// Splits a comma-separated provider field into clean names
fn split_names(field: &str) -> Vec<&str> {
    field
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

async fn link_genres(pool: &SqlitePool, movie_id: i64, genre_field: &str) -> AppResult<()> {
    for name in split_names(genre_field) {
        sqlx::query("INSERT OR IGNORE INTO genres (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;

        let genre_id: i64 = sqlx::query_scalar("SELECT id FROM genres WHERE name = ?")
            .bind(name)
            .fetch_one(pool)
            .await?;

        sqlx::query("INSERT OR IGNORE INTO movie_genres (movie_id, genre_id) VALUES (?, ?)")
            .bind(movie_id)
            .bind(genre_id)
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn link_actors(pool: &SqlitePool, movie_id: i64, actors_field: &str) -> AppResult<()> {
    for name in split_names(actors_field) {
        sqlx::query("INSERT OR IGNORE INTO actors (name) VALUES (?)")
            .bind(name)
            .execute(pool)
            .await?;

        let actor_id: i64 = sqlx::query_scalar("SELECT id FROM actors WHERE name = ?")
            .bind(name)
            .fetch_one(pool)
            .await?;

        sqlx::query("INSERT OR IGNORE INTO movie_actors (movie_id, actor_id) VALUES (?, ?)")
            .bind(movie_id)
            .bind(actor_id)
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// Filtered catalog query with AND semantics across the provided filters.
///
/// The actor and genre filters resolve through their join tables first; a
/// join-based filter matching zero rows short-circuits the whole query to an
/// empty result instead of being ignored.
pub async fn query(pool: &SqlitePool, filter: &MovieFilter) -> AppResult<Vec<Movie>> {
    let actor_ids = match &filter.actor {
        Some(actor) => {
            let ids: Vec<i64> = sqlx::query_scalar(
                "SELECT ma.movie_id FROM movie_actors ma \
                 INNER JOIN actors a ON a.id = ma.actor_id \
                 WHERE a.name LIKE ?",
            )
            .bind(format!("%{}%", actor))
            .fetch_all(pool)
            .await?;

            if ids.is_empty() {
                return Ok(Vec::new());
            }
            Some(ids)
        }
        None => None,
    };

    let genre_ids = match &filter.genre {
        Some(genre) => {
            let ids: Vec<i64> = sqlx::query_scalar(
                "SELECT mg.movie_id FROM movie_genres mg \
                 INNER JOIN genres g ON g.id = mg.genre_id \
                 WHERE g.name LIKE ?",
            )
            .bind(format!("%{}%", genre))
            .fetch_all(pool)
            .await?;

            if ids.is_empty() {
                return Ok(Vec::new());
            }
            Some(ids)
        }
        None => None,
    };

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {} FROM movies WHERE 1 = 1", MOVIE_COLUMNS));

    if let Some(title) = &filter.title {
        builder.push(" AND title LIKE ");
        builder.push_bind(format!("%{}%", title));
    }

    if let Some(director) = &filter.director {
        builder.push(" AND director LIKE ");
        builder.push_bind(format!("%{}%", director));
    }

    if let Some(ids) = actor_ids {
        builder.push(" AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");
    }

    if let Some(ids) = genre_ids {
        builder.push(" AND id IN (");
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");
    }

    let movies = builder
        .build_query_as::<Movie>()
        .fetch_all(pool)
        .await?;

    Ok(movies)
}

/// Case-insensitive substring match against stored titles, capped at `limit`
pub async fn search_by_title(pool: &SqlitePool, query: &str, limit: usize) -> AppResult<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(&format!(
        "SELECT {} FROM movies WHERE title LIKE ? LIMIT ?",
        MOVIE_COLUMNS
    ))
    .bind(format!("%{}%", query))
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

/// Returns the subset of the given external ids that are already stored
pub async fn existing_imdb_ids(
    pool: &SqlitePool,
    imdb_ids: &[String],
) -> AppResult<HashSet<String>> {
    if imdb_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT imdb_id FROM movies WHERE imdb_id IN (");
    let mut separated = builder.separated(", ");
    for id in imdb_ids {
        separated.push_bind(id.as_str());
    }
    separated.push_unseparated(")");

    let known: Vec<String> = builder.build_query_scalar().fetch_all(pool).await?;

    Ok(known.into_iter().collect())
}

/// Globally top-rated movies, restricted to a positive provider rating
pub async fn top_rated(pool: &SqlitePool, limit: usize) -> AppResult<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(&format!(
        "SELECT {} FROM movies \
         WHERE imdb_rating IS NOT NULL AND imdb_rating > 0 \
         ORDER BY imdb_rating DESC LIMIT ?",
        MOVIE_COLUMNS
    ))
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

/// Feature fields of every movie in the user's watchlist
pub async fn watchlist_features(
    pool: &SqlitePool,
    user_id: &str,
) -> AppResult<Vec<MovieFeatures>> {
    let features = sqlx::query_as::<_, MovieFeatures>(
        "SELECT m.id, m.genre, m.director, m.actors, m.plot FROM movies m \
         INNER JOIN user_watchlist w ON m.id = w.movie_id \
         WHERE w.user_id = ?",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(features)
}

/// Every catalog movie except the given ids (the recommendation candidates)
pub async fn candidates_excluding(pool: &SqlitePool, exclude: &[i64]) -> AppResult<Vec<Movie>> {
    if exclude.is_empty() {
        let movies = sqlx::query_as::<_, Movie>(&format!("SELECT {} FROM movies", MOVIE_COLUMNS))
            .fetch_all(pool)
            .await?;
        return Ok(movies);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
        "SELECT {} FROM movies WHERE id NOT IN (",
        MOVIE_COLUMNS
    ));
    let mut separated = builder.separated(", ");
    for id in exclude {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let movies = builder.build_query_as::<Movie>().fetch_all(pool).await?;

    Ok(movies)
}
