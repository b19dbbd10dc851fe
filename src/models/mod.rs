use serde::{Deserialize, Serialize};

/// A movie stored in the local catalog.
///
/// `imdb_id` is the deduplication key against the metadata provider;
/// `id` is the primary key for all associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i64,
    pub imdb_id: String,
    pub title: String,
    pub year: i64,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: String,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub poster_url: Option<String>,
    pub imdb_rating: Option<f64>,
    pub rotten_tomatoes_rating: Option<i64>,
    pub metascore: Option<i64>,
    pub imdb_votes: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub dvd: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub website: Option<String>,
}

/// Insert payload for the movies table, normalized from a provider record
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub imdb_id: String,
    pub title: String,
    pub year: i64,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: String,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub poster_url: Option<String>,
    pub imdb_rating: Option<f64>,
    pub rotten_tomatoes_rating: Option<i64>,
    pub metascore: Option<i64>,
    pub imdb_votes: Option<String>,
    pub kind: Option<String>,
    pub dvd: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub website: Option<String>,
}

/// A movie in a blended search result.
///
/// Local catalog rows and freshly fetched provider records are both
/// normalized to this shape; provider-only entries have no catalog `id` yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: Option<i64>,
    pub imdb_id: String,
    pub title: String,
    pub year: i64,
    pub rated: Option<String>,
    pub released: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: String,
    pub writer: Option<String>,
    pub actors: Option<String>,
    pub plot: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub awards: Option<String>,
    pub poster_url: Option<String>,
    pub imdb_rating: Option<f64>,
    pub rotten_tomatoes_rating: Option<i64>,
    pub metascore: Option<i64>,
    pub imdb_votes: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub dvd: Option<String>,
    pub box_office: Option<String>,
    pub production: Option<String>,
    pub website: Option<String>,
}

/// A recommendation candidate with its similarity (or fallback rating) score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMovie {
    #[serde(flatten)]
    pub movie: Movie,
    pub score: f64,
}

/// Filters for catalog queries; absent filter = no constraint
#[derive(Debug, Clone, Default)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub director: Option<String>,
    pub actor: Option<String>,
    pub genre: Option<String>,
}

/// The feature fields the recommendation engine scores on
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MovieFeatures {
    pub id: i64,
    pub genre: Option<String>,
    pub director: String,
    pub actors: Option<String>,
    pub plot: Option<String>,
}

/// A watchlist entry joined with its movie summary
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchlistMovie {
    pub id: i64,
    pub title: String,
    pub year: i64,
    pub director: String,
    pub plot: Option<String>,
    pub poster_url: Option<String>,
    pub imdb_rating: Option<f64>,
    pub rotten_tomatoes_rating: Option<i64>,
    pub watched: bool,
}

/// User verdict on a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Rating {
    Liked,
    Disliked,
    Neutral,
}

impl Rating {
    /// Parses a rating from its wire form; anything outside the enumerated
    /// domain is rejected rather than coerced.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "liked" => Some(Rating::Liked),
            "disliked" => Some(Rating::Disliked),
            "neutral" => Some(Rating::Neutral),
            _ => None,
        }
    }
}

/// One user rating row as returned by the ratings listing
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RatingEntry {
    pub movie_id: i64,
    pub rating: Rating,
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// OMDb search response envelope (`?s=` endpoint)
///
/// OMDb signals "no results" in-band: `Response` is the string `"False"`
/// and `Error` carries the message.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    pub search: Vec<OmdbSearchHit>,
    #[serde(rename = "totalResults", default)]
    pub total_results: Option<String>,
    #[serde(rename = "Response", default)]
    pub response: String,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

/// A single OMDb search hit (summary shape, no feature fields)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmdbSearchHit {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

/// Full OMDb detail record (`?i=` endpoint)
///
/// Every field is a string on the wire; absent values are the literal "N/A".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmdbMovie {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Rated", default)]
    pub rated: String,
    #[serde(rename = "Released", default)]
    pub released: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Writer", default)]
    pub writer: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Language", default)]
    pub language: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Awards", default)]
    pub awards: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<OmdbRating>,
    #[serde(rename = "Metascore", default)]
    pub metascore: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "imdbVotes", default)]
    pub imdb_votes: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "DVD", default)]
    pub dvd: String,
    #[serde(rename = "BoxOffice", default)]
    pub box_office: String,
    #[serde(rename = "Production", default)]
    pub production: String,
    #[serde(rename = "Website", default)]
    pub website: String,
    #[serde(rename = "Response", default)]
    pub response: String,
}

/// One entry of the OMDb `Ratings` array, e.g. Rotten Tomatoes "87%"
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OmdbRating {
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Value", default)]
    pub value: String,
}

/// Normalizes an OMDb field: the "N/A" sentinel (and empty) becomes None
fn clean_field(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == "N/A" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses the leading year out of OMDb's `Year` string ("2010", "2010–2012")
fn parse_year(value: &str) -> i64 {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Extracts the Rotten Tomatoes percentage from the `Ratings` array
fn parse_rotten_tomatoes(ratings: &[OmdbRating]) -> Option<i64> {
    ratings
        .iter()
        .find(|r| r.source == "Rotten Tomatoes")
        .and_then(|r| r.value.trim_end_matches('%').parse().ok())
}

impl From<&OmdbMovie> for NewMovie {
    fn from(movie: &OmdbMovie) -> Self {
        NewMovie {
            imdb_id: movie.imdb_id.clone(),
            title: movie.title.clone(),
            year: parse_year(&movie.year),
            rated: clean_field(&movie.rated),
            released: clean_field(&movie.released),
            runtime: clean_field(&movie.runtime),
            genre: clean_field(&movie.genre),
            director: movie.director.clone(),
            writer: clean_field(&movie.writer),
            actors: clean_field(&movie.actors),
            plot: clean_field(&movie.plot),
            language: clean_field(&movie.language),
            country: clean_field(&movie.country),
            awards: clean_field(&movie.awards),
            poster_url: clean_field(&movie.poster),
            imdb_rating: movie.imdb_rating.trim().parse().ok(),
            rotten_tomatoes_rating: parse_rotten_tomatoes(&movie.ratings),
            metascore: movie.metascore.trim().parse().ok(),
            imdb_votes: clean_field(&movie.imdb_votes),
            kind: clean_field(&movie.kind),
            dvd: clean_field(&movie.dvd),
            box_office: clean_field(&movie.box_office),
            production: clean_field(&movie.production),
            website: clean_field(&movie.website),
        }
    }
}

impl From<Movie> for MovieDetails {
    fn from(movie: Movie) -> Self {
        MovieDetails {
            id: Some(movie.id),
            imdb_id: movie.imdb_id,
            title: movie.title,
            year: movie.year,
            rated: movie.rated,
            released: movie.released,
            runtime: movie.runtime,
            genre: movie.genre,
            director: movie.director,
            writer: movie.writer,
            actors: movie.actors,
            plot: movie.plot,
            language: movie.language,
            country: movie.country,
            awards: movie.awards,
            poster_url: movie.poster_url,
            imdb_rating: movie.imdb_rating,
            rotten_tomatoes_rating: movie.rotten_tomatoes_rating,
            metascore: movie.metascore,
            imdb_votes: movie.imdb_votes,
            kind: movie.kind,
            dvd: movie.dvd,
            box_office: movie.box_office,
            production: movie.production,
            website: movie.website,
        }
    }
}

impl From<OmdbMovie> for MovieDetails {
    fn from(movie: OmdbMovie) -> Self {
        let new = NewMovie::from(&movie);
        MovieDetails {
            id: None,
            imdb_id: new.imdb_id,
            title: new.title,
            year: new.year,
            rated: new.rated,
            released: new.released,
            runtime: new.runtime,
            genre: new.genre,
            director: new.director,
            writer: new.writer,
            actors: new.actors,
            plot: new.plot,
            language: new.language,
            country: new.country,
            awards: new.awards,
            poster_url: new.poster_url,
            imdb_rating: new.imdb_rating,
            rotten_tomatoes_rating: new.rotten_tomatoes_rating,
            metascore: new.metascore,
            imdb_votes: new.imdb_votes,
            kind: new.kind,
            dvd: new.dvd,
            box_office: new.box_office,
            production: new.production,
            website: new.website,
        }
    }
}
