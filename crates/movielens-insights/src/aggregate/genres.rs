use super::join::{KeyIndex, text_series};
use super::plan::ExecutionPlan;
use super::ranking::rank_top_per_partition;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::source::require_columns;
use crate::types::GenreFrequency;
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

/// Separator inside the `genres` field.
pub const GENRE_DELIMITER: char = '|';

/// Individual genres of a `genres` field. Empty tokens are dropped;
/// placeholders like `(no genres listed)` are kept as ordinary genres.
pub fn split_genres(genres: &str) -> impl Iterator<Item = &str> {
    genres
        .split(GENRE_DELIMITER)
        .filter(|genre| !genre.is_empty())
}

/// Most frequent genre per user.
///
/// `ratings` is left-joined to `movies` on `movieId`; each joined row
/// contributes one count per genre token. Ratings of unknown movies and
/// rows without a user id produce no output.
pub(crate) fn most_common_genre_per_user(
    ratings: &DataFrame,
    movies: &DataFrame,
    config: &AnalysisConfig,
) -> Result<Vec<GenreFrequency>> {
    require_columns(ratings, "ratings", &["userId", "movieId"])?;
    require_columns(movies, "movies", &["movieId", "genres"])?;

    let user_ids = text_series(ratings, "ratings", "userId")?;
    let rated_movie_ids = text_series(ratings, "ratings", "movieId")?;
    let movie_ids = text_series(movies, "movies", "movieId")?;
    let genres = text_series(movies, "movies", "genres")?;

    let index = KeyIndex::build(movie_ids.str()?, genres.str()?);
    debug!("Indexed genres of {} movies", index.len());

    let mut pairs = Vec::new();
    let mut anonymous = 0usize;
    for (user_id, movie_id) in user_ids.str()?.into_iter().zip(rated_movie_ids.str()?) {
        let Some(user_id) = user_id else {
            anonymous += 1;
            continue;
        };
        for genres in index.lookup(movie_id).iter().flatten() {
            pairs.extend(split_genres(*genres).map(|genre| (user_id, genre)));
        }
    }
    if anonymous > 0 {
        warn!("Skipped {} ratings without a user id", anonymous);
    }

    let plan = ExecutionPlan::for_rows(config, pairs.len());
    let rows = pairs.len();
    let ranked: Vec<GenreFrequency> = rank_top_per_partition(pairs, &plan);

    info!(
        "Most common genre per user: {} users from {} genre rows ({} partitions)",
        ranked.len(),
        rows,
        plan.partitions()
    );
    Ok(ranked)
}
