//! CSV loading into all-text tables.

use crate::error::{AnalysisError, Result};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Reads comma-delimited files with a header row into [`DataFrame`]s whose
/// columns are all `String`.
///
/// Empty fields are read as null. Any configured null markers are read as
/// null as well; everything else stays opaque text, including numbers and
/// timestamps.
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    null_markers: Vec<String>,
}

impl TableLoader {
    /// Create a loader that only treats empty fields as null.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader that also treats each of `markers` as null.
    pub fn with_null_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            null_markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Load`] if the path is missing, unreadable,
    /// not a regular file, zero bytes long, or rejected by the CSV parser
    /// (for instance a row with more fields than the header).
    pub fn load(&self, path: &Path) -> Result<DataFrame> {
        let metadata =
            std::fs::metadata(path).map_err(|e| AnalysisError::load(path, e.to_string()))?;
        if !metadata.is_file() {
            return Err(AnalysisError::load(path, "not a regular file"));
        }
        if metadata.len() == 0 {
            return Err(AnalysisError::load(path, "file is empty"));
        }

        debug!("Reading {} ({} bytes)", path.display(), metadata.len());

        let df = CsvReadOptions::default()
            .with_has_header(true)
            // no inference: every column is read as String
            .with_infer_schema_length(Some(0))
            .with_parse_options(self.parse_options())
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|e| AnalysisError::load(path, e.to_string()))?;

        info!(
            "Loaded {}: {} rows x {} columns",
            path.display(),
            df.height(),
            df.width()
        );
        Ok(df)
    }

    fn parse_options(&self) -> CsvParseOptions {
        let options = CsvParseOptions::default()
            .with_separator(b',')
            .with_quote_char(Some(b'"'));

        if self.null_markers.is_empty() {
            options
        } else {
            options.with_null_values(Some(NullValues::AllColumns(
                self.null_markers.iter().map(|m| m.as_str().into()).collect(),
            )))
        }
    }
}
