//! Error types for the MovieLens analysis run.
//!
//! Every failure aborts the run: there is no local recovery and no
//! partial-result mode, so each variant carries enough context (file path,
//! table and column, or operation name) to diagnose the problem.
//!
//! Errors are serializable so the `--json` output mode can emit them as
//! structured `{code, message}` objects.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the analysis pipeline.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A delimited-text input could not be read into a table.
    #[error("Failed to load '{}': {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    /// A column needed for a join or grouping is absent from a table.
    #[error("Column '{column}' not found in {table} table")]
    MissingColumn { table: String, column: String },

    /// The join or aggregation itself failed.
    #[error("{operation} failed: {reason}")]
    Computation { operation: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Build a load error for `path`.
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a schema error for a missing column.
    pub fn missing_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Build a computation error for the named operation.
    pub fn computation(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Computation {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for machine-readable output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::MissingColumn { .. } => "SCHEMA_ERROR",
            Self::Computation { .. } => "COMPUTATION_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from loading an input file.
    pub fn is_load_error(&self) -> bool {
        match self {
            Self::Load { .. } => true,
            Self::WithContext { source, .. } => source.is_load_error(),
            _ => false,
        }
    }

    /// Check if this error is a schema mismatch.
    pub fn is_schema_error(&self) -> bool {
        match self {
            Self::MissingColumn { .. } => true,
            Self::WithContext { source, .. } => source.is_schema_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            AnalysisError::load("ratings.csv", "file is empty").error_code(),
            "LOAD_ERROR"
        );
        assert_eq!(
            AnalysisError::missing_column("movies", "title").error_code(),
            "SCHEMA_ERROR"
        );
        assert_eq!(
            AnalysisError::computation("genre expansion", "boom").error_code(),
            "COMPUTATION_ERROR"
        );
    }

    #[test]
    fn test_load_error_mentions_path() {
        let error = AnalysisError::load("data/tags.csv", "No such file or directory");
        let message = error.to_string();
        assert!(message.contains("data/tags.csv"));
        assert!(message.contains("No such file"));
    }

    #[test]
    fn test_missing_column_message() {
        let error = AnalysisError::missing_column("tags", "movieId");
        assert_eq!(error.to_string(), "Column 'movieId' not found in tags table");
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalysisError::missing_column("ratings", "userId");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("SCHEMA_ERROR"));
        assert!(json.contains("userId"));
    }

    #[test]
    fn test_with_context() {
        let error = AnalysisError::missing_column("movies", "genres")
            .with_context("Computing most common genre per user");
        assert!(error.to_string().contains("most common genre"));
        assert_eq!(error.error_code(), "SCHEMA_ERROR"); // Preserves original code
        assert!(error.is_schema_error());
        assert!(!error.is_load_error());
    }
}
