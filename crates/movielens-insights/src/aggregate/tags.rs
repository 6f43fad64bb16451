use super::join::{KeyIndex, text_series};
use super::plan::ExecutionPlan;
use super::ranking::rank_top_per_partition;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::source::require_columns;
use crate::types::TagFrequency;
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

/// Most frequent tag per movie title.
///
/// `movies` is left-joined to `tags` on `movieId`; each `(title, tag)` pair
/// produced by the join counts once. Untagged movies and rows without a
/// title produce no output.
pub(crate) fn most_common_tag_per_title(
    tags: &DataFrame,
    movies: &DataFrame,
    config: &AnalysisConfig,
) -> Result<Vec<TagFrequency>> {
    require_columns(movies, "movies", &["movieId", "title"])?;
    require_columns(tags, "tags", &["movieId", "tag"])?;

    let movie_ids = text_series(movies, "movies", "movieId")?;
    let titles = text_series(movies, "movies", "title")?;
    let tag_movie_ids = text_series(tags, "tags", "movieId")?;
    let tag_values = text_series(tags, "tags", "tag")?;

    let index = KeyIndex::build(tag_movie_ids.str()?, tag_values.str()?);
    debug!("Indexed tags of {} movies", index.len());

    let mut pairs = Vec::new();
    let mut untitled = 0usize;
    for (movie_id, title) in movie_ids.str()?.into_iter().zip(titles.str()?) {
        let Some(title) = title else {
            untitled += 1;
            continue;
        };
        pairs.extend(index.lookup(movie_id).iter().flatten().map(|tag| (title, *tag)));
    }
    if untitled > 0 {
        warn!("Skipped {} movies without a title", untitled);
    }

    let plan = ExecutionPlan::for_rows(config, pairs.len());
    let rows = pairs.len();
    let ranked: Vec<TagFrequency> = rank_top_per_partition(pairs, &plan);

    info!(
        "Most common tag per title: {} titles from {} tagged rows ({} partitions)",
        ranked.len(),
        rows,
        plan.partitions()
    );
    Ok(ranked)
}
