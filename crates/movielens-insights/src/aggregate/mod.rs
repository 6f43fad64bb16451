//! Ranked aggregations over the joined MovieLens tables.
//!
//! Both aggregations follow the same shape: left join on `movieId`, emit
//! one `(partition key, value)` pair per joined row (or per genre token),
//! count pairs, and keep the top value per partition key. The grouping
//! stage is hash-partitioned according to an [`ExecutionPlan`]; results do
//! not depend on the partition count.

mod genres;
mod join;
mod plan;
mod ranking;
mod tags;

pub use genres::{GENRE_DELIMITER, split_genres};
pub use plan::{ExecutionPlan, ROWS_PER_ADAPTIVE_PARTITION};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::types::{GenreFrequency, RankedRow, TagFrequency};
use polars::prelude::*;

/// Runs the ranked aggregations under one [`AnalysisConfig`].
#[derive(Debug, Clone, Default)]
pub struct RankedAggregator {
    config: AnalysisConfig,
}

impl RankedAggregator {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Most frequent tag per movie title. See [`most_common_tag_per_title`].
    pub fn most_common_tag_per_title(
        &self,
        tags: &DataFrame,
        movies: &DataFrame,
    ) -> Result<Vec<TagFrequency>> {
        tags::most_common_tag_per_title(tags, movies, &self.config)
    }

    /// Most frequent genre per user. See [`most_common_genre_per_user`].
    pub fn most_common_genre_per_user(
        &self,
        ratings: &DataFrame,
        movies: &DataFrame,
    ) -> Result<Vec<GenreFrequency>> {
        genres::most_common_genre_per_user(ratings, movies, &self.config)
    }
}

/// For every movie title that has tags, the tag applied most often.
///
/// Requires `tags(movieId, tag)` and `movies(movieId, title)`. Ties go to
/// the alphabetically first tag; rows come back ordered by `tag_count`
/// descending, then title.
pub fn most_common_tag_per_title(tags: &DataFrame, movies: &DataFrame) -> Result<Vec<TagFrequency>> {
    RankedAggregator::default().most_common_tag_per_title(tags, movies)
}

/// For every user with rated movies of known genre, the genre rated most
/// often.
///
/// Requires `ratings(userId, movieId)` and `movies(movieId, genres)`.
/// Multi-genre movies count once per genre. Ties go to the alphabetically
/// first genre; rows come back ordered by `genre_count` descending, then
/// user id.
pub fn most_common_genre_per_user(
    ratings: &DataFrame,
    movies: &DataFrame,
) -> Result<Vec<GenreFrequency>> {
    RankedAggregator::default().most_common_genre_per_user(ratings, movies)
}

/// Ranked rows as a three-column frame named after `R::COLUMNS`.
pub fn to_frame<R: RankedRow>(rows: &[R]) -> Result<DataFrame> {
    let [partition, value, count] = R::COLUMNS;

    let partitions: Vec<&str> = rows.iter().map(|r| r.partition()).collect();
    let values: Vec<&str> = rows.iter().map(|r| r.value()).collect();
    let counts: Vec<u32> = rows.iter().map(|r| r.count()).collect();

    DataFrame::new(vec![
        Column::from(Series::new(partition.into(), partitions)),
        Column::from(Series::new(value.into(), values)),
        Column::from(Series::new(count.into(), counts)),
    ])
    .map_err(|e| AnalysisError::computation("building result frame", e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_aggregator_respects_fixed_partitions() {
        let movies = df![
            "movieId" => ["1", "2", "3"],
            "title" => ["A", "B", "C"],
            "genres" => ["Drama", "Comedy|Drama", "Comedy"]
        ]
        .unwrap();
        let ratings = df![
            "userId" => ["1", "1", "2", "3", "3", "3"],
            "movieId" => ["1", "2", "3", "1", "3", "3"]
        ]
        .unwrap();

        let single = AnalysisConfig::builder()
            .adaptive_execution(false)
            .partition_count(1)
            .build()
            .unwrap();
        let many = AnalysisConfig::builder()
            .adaptive_execution(false)
            .partition_count(16)
            .build()
            .unwrap();

        let expected = RankedAggregator::new(&single)
            .most_common_genre_per_user(&ratings, &movies)
            .unwrap();
        let actual = RankedAggregator::new(&many)
            .most_common_genre_per_user(&ratings, &movies)
            .unwrap();

        assert_eq!(actual, expected);
        assert_eq!(
            expected,
            vec![
                GenreFrequency::new("1".into(), "Drama".into(), 2),
                GenreFrequency::new("3".into(), "Comedy".into(), 2),
                GenreFrequency::new("2".into(), "Comedy".into(), 1),
            ]
        );
    }

    #[test]
    fn test_to_frame_uses_output_column_names() {
        let rows = vec![
            TagFrequency::new("Memento (2000)".into(), "nonlinear".into(), 2),
            TagFrequency::new("Heat (1995)".into(), "heist".into(), 1),
        ];

        let frame = to_frame(&rows).unwrap();

        assert_eq!(frame.shape(), (2, 3));
        let names: Vec<&str> = frame.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["title", "tag", "tag_count"]);
        assert_eq!(frame.column("tag_count").unwrap().dtype(), &DataType::UInt32);
    }

    #[test]
    fn test_to_frame_empty() {
        let frame = to_frame::<GenreFrequency>(&[]).unwrap();

        assert_eq!(frame.height(), 0);
        assert_eq!(frame.width(), 3);
        assert!(frame.column("userId").is_ok());
    }
}
