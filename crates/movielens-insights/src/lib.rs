//! MovieLens Insights Library
//!
//! Data-quality checks and ranked aggregations over the MovieLens
//! `ratings`, `tags` and `movies` tables, built on Polars.
//!
//! # Overview
//!
//! - **Loading**: every column is read as text; empty fields and configured
//!   markers become null
//! - **Null Audit**: missing-value counts per column, in schema order
//! - **Most Common Tag per Title**: the tag applied most often to each title
//! - **Most Common Genre per User**: the genre a user rated most often,
//!   counting multi-genre movies once per genre
//! - **Progress Reporting**: staged updates through a callback
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use movielens_insights::{AnalysisConfig, Pipeline};
//!
//! let config = AnalysisConfig::builder()
//!     .data_dir("data/ml-latest-small")
//!     .partition_count(8)
//!     .build()?;
//!
//! let report = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run_directory()?;
//!
//! for audit in &report.null_audits {
//!     println!("{audit}");
//! }
//! println!("{}", report.tags_table(Some(20)));
//! ```
//!
//! # Library Functions
//!
//! The aggregations are also usable on frames you already hold:
//!
//! ```rust,ignore
//! use movielens_insights::{audit_nulls, most_common_genre_per_user, most_common_tag_per_title};
//!
//! println!("{}", audit_nulls(&ratings, "ratings"));
//! let tags = most_common_tag_per_title(&tags, &movies)?;
//! let genres = most_common_genre_per_user(&ratings, &movies)?;
//! ```

pub mod aggregate;
pub mod audit;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod reporting;
pub mod source;
pub mod types;

// Re-exports for convenient access
pub use aggregate::{
    ExecutionPlan, RankedAggregator, most_common_genre_per_user, most_common_tag_per_title,
    split_genres, to_frame,
};
pub use audit::{NullAuditor, audit_nulls};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, Pipeline, PipelineBuilder, ProgressReporter,
    ProgressUpdate,
};
pub use reporting::{AnalysisReport, TablePreview, ranked_table};
pub use source::{CsvDirectorySource, MovieLensTables, TableKind, TableLoader, TableSource};
pub use types::{
    ColumnNullCount, GenreFrequency, NullAudit, RankedRow, TableSummary, TagFrequency,
};
