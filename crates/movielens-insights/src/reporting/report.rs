use crate::error::Result;
use crate::types::{GenreFrequency, NullAudit, RankedRow, TableSummary, TagFrequency};
use chrono::Local;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};

// ============================================================================
// Report Types
// ============================================================================

/// Everything one analysis run produced.
///
/// Serializes to the JSON printed by `--json`. Previews are raw frames and
/// are left out of the JSON.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Local time the report was generated
    pub generated_at: String,
    /// Wall-clock time of the run in milliseconds
    pub duration_ms: u64,
    /// Shape and origin of each input table
    pub tables: Vec<TableSummary>,
    /// Null audits of ratings, tags and movies, in that order
    pub null_audits: Vec<NullAudit>,
    /// First rows of each input table
    #[serde(skip)]
    pub previews: Vec<TablePreview>,
    pub most_common_tags: Vec<TagFrequency>,
    pub most_common_genres: Vec<GenreFrequency>,
}

impl AnalysisReport {
    /// Current local time in the report's timestamp format.
    pub fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Null audit of the table labelled `label`.
    pub fn null_audit(&self, label: &str) -> Option<&NullAudit> {
        self.null_audits.iter().find(|audit| audit.label == label)
    }

    /// Most-common-tag rows as a table, truncated to `limit` rows.
    pub fn tags_table(&self, limit: Option<usize>) -> Table {
        ranked_table(&self.most_common_tags, limit)
    }

    /// Most-common-genre rows as a table, truncated to `limit` rows.
    pub fn genres_table(&self, limit: Option<usize>) -> Table {
        ranked_table(&self.most_common_genres, limit)
    }
}

/// First rows of one input table.
#[derive(Debug, Clone)]
pub struct TablePreview {
    pub label: String,
    pub frame: DataFrame,
}

impl TablePreview {
    pub fn new(label: impl Into<String>, df: &DataFrame, rows: usize) -> Self {
        Self {
            label: label.into(),
            frame: df.head(Some(rows)),
        }
    }
}

impl fmt::Display for TablePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} DataFrame:", self.label)?;
        writeln!(f, "{}", self.frame)
    }
}

/// Ranked rows as an ASCII table, at most `limit` rows.
pub fn ranked_table<R: RankedRow + Tabled>(rows: &[R], limit: Option<usize>) -> Table {
    let mut table = Table::new(rows.iter().take(limit.unwrap_or(usize::MAX)));
    table.with(Style::ascii()).with(Alignment::center());
    table
}
