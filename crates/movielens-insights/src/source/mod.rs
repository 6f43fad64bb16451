//! Tabular data source for the three MovieLens inputs.
//!
//! Tables are loaded by kind through the [`TableSource`] trait so the
//! pipeline does not care whether they come from CSV files on disk
//! ([`CsvDirectorySource`]) or are already in memory ([`MovieLensTables`]).

mod loader;

pub use loader::TableLoader;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The three input tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// `userId, movieId, rating, timestamp`
    Ratings,
    /// `userId, movieId, tag, timestamp`
    Tags,
    /// `movieId, title, genres`
    Movies,
}

impl TableKind {
    /// All kinds, in load and report order.
    pub const ALL: [TableKind; 3] = [TableKind::Ratings, TableKind::Tags, TableKind::Movies];

    /// Short name used in reports and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ratings => "ratings",
            Self::Tags => "tags",
            Self::Movies => "movies",
        }
    }

    /// Columns of the standard MovieLens layout for this table.
    pub fn expected_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Ratings => &["userId", "movieId", "rating", "timestamp"],
            Self::Tags => &["userId", "movieId", "tag", "timestamp"],
            Self::Movies => &["movieId", "title", "genres"],
        }
    }

    /// File name configured for this table.
    pub fn file_name<'a>(&self, config: &'a AnalysisConfig) -> &'a str {
        match self {
            Self::Ratings => &config.ratings_file,
            Self::Tags => &config.tags_file,
            Self::Movies => &config.movies_file,
        }
    }
}

/// Something that can produce the input tables.
pub trait TableSource: Send + Sync {
    /// Load the table of the given kind.
    fn load(&self, kind: TableKind) -> Result<DataFrame>;

    /// Human-readable origin of the table (a path, or "in-memory").
    fn describe(&self, kind: TableKind) -> String;
}

/// Reads `ratings.csv`, `tags.csv` and `movies.csv` from one directory.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    config: AnalysisConfig,
    loader: TableLoader,
}

impl CsvDirectorySource {
    /// Source over `data_dir` with the default file names.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let config = AnalysisConfig {
            data_dir: data_dir.into(),
            ..AnalysisConfig::default()
        };
        Self::from_config(&config)
    }

    /// Source using the directory, file names and null markers of `config`.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            config: config.clone(),
            loader: TableLoader::with_null_markers(config.null_markers.iter().cloned()),
        }
    }

    /// Full path of the file backing `kind`.
    pub fn path_for(&self, kind: TableKind) -> PathBuf {
        self.config.data_dir.join(kind.file_name(&self.config))
    }
}

impl TableSource for CsvDirectorySource {
    fn load(&self, kind: TableKind) -> Result<DataFrame> {
        self.loader.load(&self.path_for(kind))
    }

    fn describe(&self, kind: TableKind) -> String {
        self.path_for(kind).display().to_string()
    }
}

/// The three loaded input tables.
#[derive(Debug, Clone)]
pub struct MovieLensTables {
    pub ratings: DataFrame,
    pub tags: DataFrame,
    pub movies: DataFrame,
}

impl MovieLensTables {
    /// Load all three tables from `source`, stopping at the first failure.
    pub fn load(source: &dyn TableSource) -> Result<Self> {
        Ok(Self {
            ratings: source.load(TableKind::Ratings)?,
            tags: source.load(TableKind::Tags)?,
            movies: source.load(TableKind::Movies)?,
        })
    }

    /// Borrow the table of the given kind.
    pub fn get(&self, kind: TableKind) -> &DataFrame {
        match kind {
            TableKind::Ratings => &self.ratings,
            TableKind::Tags => &self.tags,
            TableKind::Movies => &self.movies,
        }
    }
}

impl TableSource for MovieLensTables {
    fn load(&self, kind: TableKind) -> Result<DataFrame> {
        Ok(self.get(kind).clone())
    }

    fn describe(&self, kind: TableKind) -> String {
        format!("in-memory {}", kind.label())
    }
}

/// Check that `df` carries every column in `columns`.
///
/// # Errors
///
/// Returns [`AnalysisError::MissingColumn`] naming `table` and the first
/// absent column.
pub fn require_columns(df: &DataFrame, table: &str, columns: &[&str]) -> Result<()> {
    for column in columns {
        if df.column(column).is_err() {
            return Err(AnalysisError::missing_column(table, *column));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tables() -> MovieLensTables {
        MovieLensTables {
            ratings: df![
                "userId" => ["1"],
                "movieId" => ["1"],
                "rating" => ["4.0"],
                "timestamp" => ["964982703"]
            ]
            .unwrap(),
            tags: df![
                "userId" => ["2"],
                "movieId" => ["1"],
                "tag" => ["pixar"],
                "timestamp" => ["1445714994"]
            ]
            .unwrap(),
            movies: df![
                "movieId" => ["1"],
                "title" => ["Toy Story (1995)"],
                "genres" => ["Adventure|Animation|Children|Comedy|Fantasy"]
            ]
            .unwrap(),
        }
    }

    #[test]
    fn test_table_kind_labels() {
        let labels: Vec<_> = TableKind::ALL.iter().map(|k| k.label()).collect();
        assert_eq!(labels, vec!["ratings", "tags", "movies"]);
    }

    #[test]
    fn test_table_kind_expected_columns() {
        assert_eq!(TableKind::Movies.expected_columns(), &["movieId", "title", "genres"]);
        assert!(TableKind::Tags.expected_columns().contains(&"tag"));
    }

    #[test]
    fn test_table_kind_file_names_follow_config() {
        let config = AnalysisConfig::builder()
            .tags_file("tags_v2.csv")
            .build()
            .unwrap();
        assert_eq!(TableKind::Ratings.file_name(&config), "ratings.csv");
        assert_eq!(TableKind::Tags.file_name(&config), "tags_v2.csv");
    }

    #[test]
    fn test_csv_directory_source_paths() {
        let config = AnalysisConfig::builder()
            .data_dir("input_data")
            .movies_file("films.csv")
            .build()
            .unwrap();
        let source = CsvDirectorySource::from_config(&config);

        assert_eq!(
            source.path_for(TableKind::Ratings),
            PathBuf::from("input_data").join("ratings.csv")
        );
        assert_eq!(
            source.path_for(TableKind::Movies),
            PathBuf::from("input_data").join("films.csv")
        );
        assert!(source.describe(TableKind::Movies).contains("films.csv"));
    }

    #[test]
    fn test_csv_directory_source_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDirectorySource::new(dir.path().join("nope"));

        let err = MovieLensTables::load(&source).unwrap_err();

        assert!(err.is_load_error());
        assert!(err.to_string().contains("ratings.csv"));
    }

    #[test]
    fn test_in_memory_tables_as_source() {
        let tables = sample_tables();

        let reloaded = MovieLensTables::load(&tables).unwrap();

        assert_eq!(reloaded.movies.height(), 1);
        assert!(reloaded.tags.equals(&tables.tags));
        assert_eq!(tables.describe(TableKind::Tags), "in-memory tags");
    }

    #[test]
    fn test_require_columns() {
        let tables = sample_tables();

        assert!(require_columns(&tables.movies, "movies", &["movieId", "title"]).is_ok());

        let err = require_columns(&tables.movies, "movies", &["movieId", "year"]).unwrap_err();
        assert!(err.is_schema_error());
        assert_eq!(err.to_string(), "Column 'year' not found in movies table");
    }
}
