//! Configuration for the analysis pipeline.
//!
//! A single [`AnalysisConfig`] value is built up front and passed to the
//! pipeline entry point. There is no global session state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of hash partitions used by the grouping stage.
pub const DEFAULT_PARTITION_COUNT: usize = 8;

/// Default number of rows shown in each input preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Configuration for an analysis run.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use movielens_insights::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .data_dir("input_data")
///     .partition_count(4)
///     .adaptive_execution(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Coalesce grouping partitions for small inputs.
    /// Default: true
    pub adaptive_execution: bool,

    /// Upper bound on hash partitions for the grouping stage. Affects
    /// performance only, never results.
    /// Default: 8
    pub partition_count: usize,

    /// Directory holding the three input files.
    /// Default: "."
    pub data_dir: PathBuf,

    /// File name of the ratings table inside `data_dir`.
    /// Default: "ratings.csv"
    pub ratings_file: String,

    /// File name of the tags table inside `data_dir`.
    /// Default: "tags.csv"
    pub tags_file: String,

    /// File name of the movies table inside `data_dir`.
    /// Default: "movies.csv"
    pub movies_file: String,

    /// Extra field values read as null, in addition to empty fields.
    /// Default: none
    pub null_markers: Vec<String>,

    /// Number of rows kept in each input preview.
    /// Default: 5
    pub preview_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            adaptive_execution: true,
            partition_count: DEFAULT_PARTITION_COUNT,
            data_dir: PathBuf::from("."),
            ratings_file: "ratings.csv".to_string(),
            tags_file: "tags.csv".to_string(),
            movies_file: "movies.csv".to_string(),
            null_markers: Vec::new(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.partition_count == 0 {
            return Err(ConfigValidationError::InvalidPartitionCount(
                self.partition_count,
            ));
        }

        for (field, value) in [
            ("ratings_file", &self.ratings_file),
            ("tags_file", &self.tags_file),
            ("movies_file", &self.movies_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigValidationError::EmptyFileName(field.to_string()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid partition count: {0} (must be at least 1)")]
    InvalidPartitionCount(usize),

    #[error("File name for '{0}' must not be empty")]
    EmptyFileName(String),
}

impl From<ConfigValidationError> for crate::error::AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    adaptive_execution: Option<bool>,
    partition_count: Option<usize>,
    data_dir: Option<PathBuf>,
    ratings_file: Option<String>,
    tags_file: Option<String>,
    movies_file: Option<String>,
    null_markers: Vec<String>,
    preview_rows: Option<usize>,
}

impl AnalysisConfigBuilder {
    /// Enable or disable partition coalescing for small inputs.
    pub fn adaptive_execution(mut self, enable: bool) -> Self {
        self.adaptive_execution = Some(enable);
        self
    }

    /// Set the maximum number of hash partitions used when grouping.
    pub fn partition_count(mut self, count: usize) -> Self {
        self.partition_count = Some(count);
        self
    }

    /// Set the directory holding the input files.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Override the ratings file name.
    pub fn ratings_file(mut self, name: impl Into<String>) -> Self {
        self.ratings_file = Some(name.into());
        self
    }

    /// Override the tags file name.
    pub fn tags_file(mut self, name: impl Into<String>) -> Self {
        self.tags_file = Some(name.into());
        self
    }

    /// Override the movies file name.
    pub fn movies_file(mut self, name: impl Into<String>) -> Self {
        self.movies_file = Some(name.into());
        self
    }

    /// Add a field value that should be read as null.
    pub fn null_marker(mut self, marker: impl Into<String>) -> Self {
        self.null_markers.push(marker.into());
        self
    }

    /// Set the number of rows kept in each preview.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            adaptive_execution: self
                .adaptive_execution
                .unwrap_or(defaults.adaptive_execution),
            partition_count: self.partition_count.unwrap_or(defaults.partition_count),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            ratings_file: self.ratings_file.unwrap_or(defaults.ratings_file),
            tags_file: self.tags_file.unwrap_or(defaults.tags_file),
            movies_file: self.movies_file.unwrap_or(defaults.movies_file),
            null_markers: self.null_markers,
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
        };

        config.validate()?;
        Ok(config)
    }
}
