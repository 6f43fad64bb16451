use serde::{Deserialize, Serialize};
use tabled::Tabled;

// ============================================================================
// Null audit
// ============================================================================

/// Missing-value count for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tabled)]
pub struct ColumnNullCount {
    #[tabled(rename = "Column")]
    pub column: String,
    #[tabled(rename = "Null Count")]
    pub null_count: usize,
    /// Share of rows that are null, 0.0 - 100.0. Zero for an empty table.
    #[tabled(skip)]
    pub null_percentage: f64,
}

/// Per-column missing-value counts for one table, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullAudit {
    /// Name of the audited table (e.g. "ratings").
    pub label: String,
    pub row_count: usize,
    pub columns: Vec<ColumnNullCount>,
}

impl NullAudit {
    /// Sum of null counts over every column.
    pub fn total_nulls(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }

    /// Names of the columns holding at least one null.
    pub fn columns_with_nulls(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.null_count > 0)
            .map(|c| c.column.as_str())
            .collect()
    }

    /// Null count of `column`, if the table has it.
    pub fn null_count(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.null_count)
    }
}

// ============================================================================
// Ranked aggregation results
// ============================================================================

/// A winning row of a ranked aggregation: one value per partition key with
/// its occurrence count.
pub trait RankedRow: Sized {
    /// Output column names: partition key, value, count.
    const COLUMNS: [&'static str; 3];

    fn new(partition: String, value: String, count: u32) -> Self;
    fn partition(&self) -> &str;
    fn value(&self) -> &str;
    fn count(&self) -> u32;
}

/// Most common tag of a movie title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Tabled)]
pub struct TagFrequency {
    pub title: String,
    pub tag: String,
    pub tag_count: u32,
}

impl RankedRow for TagFrequency {
    const COLUMNS: [&'static str; 3] = ["title", "tag", "tag_count"];

    fn new(partition: String, value: String, count: u32) -> Self {
        Self {
            title: partition,
            tag: value,
            tag_count: count,
        }
    }

    fn partition(&self) -> &str {
        &self.title
    }

    fn value(&self) -> &str {
        &self.tag
    }

    fn count(&self) -> u32 {
        self.tag_count
    }
}

/// Most common genre among a user's ratings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Tabled)]
pub struct GenreFrequency {
    #[serde(rename = "userId")]
    #[tabled(rename = "userId")]
    pub user_id: String,
    pub genre: String,
    pub genre_count: u32,
}

impl RankedRow for GenreFrequency {
    const COLUMNS: [&'static str; 3] = ["userId", "genre", "genre_count"];

    fn new(partition: String, value: String, count: u32) -> Self {
        Self {
            user_id: partition,
            genre: value,
            genre_count: count,
        }
    }

    fn partition(&self) -> &str {
        &self.user_id
    }

    fn value(&self) -> &str {
        &self.genre
    }

    fn count(&self) -> u32 {
        self.genre_count
    }
}

// ============================================================================
// Run summary
// ============================================================================

/// Shape and origin of one loaded input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub label: String,
    pub source: String,
    pub rows: usize,
    pub columns: Vec<String>,
}
